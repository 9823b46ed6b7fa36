// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Connection status derived from a health probe

use serde::{Deserialize, Serialize};
use shared_types::HealthReport;

/// Outcome of probing `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HealthProbe {
    /// The backend answered with a success status and a health report
    Connected {
        /// Report returned by the backend
        report: HealthReport,
    },
    /// The backend could not be reached or answered with an error status
    Disconnected {
        /// `HTTP <code>` for error statuses, the transport error otherwise
        error: String,
    },
}

impl HealthProbe {
    /// Probe result for a non-success HTTP status
    pub fn from_status(status: u16) -> Self {
        Self::Disconnected {
            error: format!("HTTP {status}"),
        }
    }

    /// Whether the backend is reachable
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// The health report, if connected
    pub fn report(&self) -> Option<&HealthReport> {
        match self {
            Self::Connected { report } => Some(report),
            Self::Disconnected { .. } => None,
        }
    }
}
