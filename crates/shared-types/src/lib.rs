// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared wire types for the local backend
//!
//! This crate provides the JSON documents exchanged between the backend server
//! and its clients, so both sides agree on field names and fixed strings.

pub mod error_body;
pub mod health;
pub mod lifecycle;
pub mod process_data;

pub use error_body::ErrorBody;
pub use health::{HEALTH_STATUS_OK, HealthReport};
pub use lifecycle::{SHUTDOWN_STATUS, ShutdownAck};
pub use process_data::{DEFAULT_NAME, ProcessDataReply, greeting};
