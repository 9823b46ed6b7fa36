// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides route configuration and handlers for the backend.

pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use handlers::{health_handler, not_found_handler, process_data_handler, shutdown_handler};

use crate::state::ServerState;

/// Create application routes
pub fn create_routes() -> Router<ServerState> {
    let lifecycle_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/shutdown", post(shutdown_handler));

    let api_routes = Router::new().route("/process_data", post(process_data_handler));

    Router::new()
        .merge(lifecycle_routes)
        .nest("/api", api_routes)
        .fallback(not_found_handler)
}
