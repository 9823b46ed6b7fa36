// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error handling module
//!
//! This module provides the server's error types and their mapping onto HTTP
//! responses. Request errors always render as `{"error": <message>}`.

use std::net::SocketAddr;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared_types::ErrorBody;
use thiserror::Error;

/// Error types for server operations
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Network binding errors
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        /// Socket address that failed to bind
        address: SocketAddr,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server startup errors
    #[error("Server startup failed: {source}")]
    Startup {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server shutdown errors
    #[error("Server shutdown failed: {source}")]
    Shutdown {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The request carried no usable JSON object
    #[error("No data provided")]
    NoData,

    /// Any other failure while handling a request
    #[error("{message}")]
    InvalidRequest {
        /// Failure description returned to the client
        message: String,
    },

    /// No route matches the request path
    #[error("Not Found: {path}")]
    NotFound {
        /// Requested path
        path: String,
    },
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// HTTP status this error renders with
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Config { .. }
            | ServerError::Bind { .. }
            | ServerError::Startup { .. }
            | ServerError::Shutdown { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::NoData | ServerError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ServerError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(error: ServerError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        (
            status,
            serde_json::from_slice(&bytes).expect("body is JSON"),
        )
    }

    #[tokio::test]
    async fn no_data_renders_fixed_message() {
        let (status, body) = render(ServerError::NoData).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "No data provided"}));
    }

    #[tokio::test]
    async fn invalid_request_renders_message_verbatim() {
        let (status, body) = render(ServerError::InvalidRequest {
            message: "stream closed".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "stream closed"}));
    }

    #[tokio::test]
    async fn not_found_renders_404() {
        let (status, body) = render(ServerError::NotFound {
            path: "/missing".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not Found: /missing");
    }

    #[test]
    fn process_errors_are_internal() {
        let error = ServerError::Config {
            message: "bad port".to_string(),
        };
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
