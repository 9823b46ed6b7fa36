// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Typed HTTP client for the local backend
//!
//! The desktop shell polls the backend's health endpoint to show a connection
//! indicator and asks it to stop when the window closes. This crate wraps
//! those calls, plus the process-data echo, behind [`BackendClient`].
//!
//! - [`BackendClient::probe`] never fails: it folds transport and status
//!   errors into [`HealthProbe::Disconnected`], which is what a status
//!   indicator wants.
//! - The remaining calls return [`ClientError`], with server-side rejections
//!   carrying the backend's `error` message.

use thiserror::Error;

pub mod client;
pub mod health;

pub use client::{BackendClient, BackendClientConfig, DEFAULT_BASE_URL};
pub use health::HealthProbe;
pub use shared_types::{ErrorBody, HealthReport, ProcessDataReply, ShutdownAck};

/// Errors returned by [`BackendClient`]
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL cannot address the backend
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        /// URL as configured
        url: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },

    /// The request could not be sent or the response not decoded
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("backend rejected the request with HTTP {status}: {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// The backend's `error` message, or the raw body if it had none
        message: String,
    },
}

impl ClientError {
    /// HTTP status of a rejection, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Http(error) => error.status().map(|status| status.as_u16()),
            Self::InvalidBaseUrl { .. } => None,
        }
    }
}
