// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! JSON body carried by every error response

use serde::{Deserialize, Serialize};

/// Error document: `{"error": <message>}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure message
    pub error: String,
}

impl ErrorBody {
    /// Wrap a message in an error document
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
