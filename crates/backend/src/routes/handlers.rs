// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! This module provides the backend's HTTP request handlers: the health check,
//! the deferred shutdown trigger and the process-data echo.

use axum::{Json, extract::State, http::Uri};
use shared_types::{HealthReport, ProcessDataReply, ShutdownAck};
use tracing::{debug, info};

use crate::{error::ServerError, extractors::JsonObject, state::ServerState};

/// Health check endpoint handler
///
/// Reports `"ok"` with the current Unix time in seconds. No side effects.
pub async fn health_handler() -> Json<HealthReport> {
    Json(HealthReport::now())
}

/// Shutdown endpoint handler
///
/// Answers immediately and leaves termination to a background task, so the
/// client receives the acknowledgement before the process exits.
pub async fn shutdown_handler(State(state): State<ServerState>) -> Json<ShutdownAck> {
    info!(
        delay = ?state.shutdown().delay(),
        "shutdown requested, stopping server"
    );
    state.shutdown().schedule();
    Json(ShutdownAck::scheduled())
}

/// Process data endpoint handler
///
/// Greets the submitted `name` (default `Guest`) and echoes the object back.
/// Bodies that are not a JSON object are rejected by [`JsonObject`].
pub async fn process_data_handler(JsonObject(data): JsonObject) -> Json<ProcessDataReply> {
    debug!(fields = data.len(), "processing submitted data");
    Json(ProcessDataReply::for_object(data))
}

/// Fallback for unknown routes
pub async fn not_found_handler(uri: Uri) -> ServerError {
    ServerError::NotFound {
        path: uri.path().to_string(),
    }
}
