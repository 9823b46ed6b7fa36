// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Process lifecycle acknowledgements

use serde::{Deserialize, Serialize};

/// Status returned once a shutdown has been scheduled
pub const SHUTDOWN_STATUS: &str = "shutting down";

/// Acknowledgement returned by `POST /shutdown`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownAck {
    /// Always `"shutting down"` when produced by the server
    pub status: String,
}

impl ShutdownAck {
    /// Acknowledge a scheduled shutdown
    pub fn scheduled() -> Self {
        Self {
            status: SHUTDOWN_STATUS.to_string(),
        }
    }
}
