// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Local Backend Server Implementation
//!
//! This crate provides the loopback HTTP server that runs alongside the desktop
//! shell, built with Axum. It answers health probes, echoes submitted JSON with
//! a greeting, and stops itself on request.
//!
//! # Module Structure
//!
//! - [`config`]: Compiled-in bind address with `BACKEND_*` overrides, shutdown timing
//! - [`error`]: Error types and their `{"error": ...}` HTTP responses
//! - [`extractors`]: Request body extraction onto the error contract
//! - [`lifecycle`]: Deferred self-termination behind `POST /shutdown`
//! - [`middleware`]: Panic-to-response conversion
//! - [`routes`]: Route configuration and HTTP request handlers
//! - [`server`]: Main server implementation, lifecycle, and coordinated shutdown
//! - [`state`]: Shared application state
//!
//! # Routes
//!
//! | Method | Path | Response |
//! |---|---|---|
//! | GET | `/health` | `{"status": "ok", "timestamp": <epoch seconds>}` |
//! | POST | `/shutdown` | `{"status": "shutting down"}`, then exits after 0.5 s |
//! | POST | `/api/process_data` | `{"message": ..., "received_data": <body>}` |
//!
//! Every response carries permissive CORS headers.

pub mod config;
pub mod error;
pub mod extractors;
pub mod lifecycle;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, ServerConfig, ShutdownConfig};
pub use error::{ServerError, ServerResult};
pub use lifecycle::ShutdownScheduler;
pub use server::Server;
pub use state::ServerState;
