// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Middleware module for HTTP request processing
//!
//! Handler failures must reach the client as `400 {"error": ...}` and never
//! take the connection down, so panics are caught here and rendered through
//! [`ServerError`].

use std::any::Any;

use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::ServerError;

const UNKNOWN_PANIC_MESSAGE: &str = "unexpected error while handling the request";

/// Convert a handler panic into the backend's error response
///
/// Used with `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(payload.as_ref());
    error!(%message, "request handler panicked");
    ServerError::InvalidRequest { message }.into_response()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        UNKNOWN_PANIC_MESSAGE.to_string()
    }
}
