// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Health report returned by `GET /health`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status reported by a running backend
pub const HEALTH_STATUS_OK: &str = "ok";

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Liveness report with the server's wall-clock time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Always `"ok"` when produced by the server
    pub status: String,
    /// Unix epoch seconds with sub-second precision
    pub timestamp: f64,
}

impl HealthReport {
    /// Build a report stamped with the current time
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Build a report stamped with the given instant
    #[allow(clippy::cast_precision_loss)]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            status: HEALTH_STATUS_OK.to_string(),
            timestamp: instant.timestamp_micros() as f64 / MICROS_PER_SECOND,
        }
    }

    /// Whether the report describes a healthy backend
    pub fn is_ok(&self) -> bool {
        self.status == HEALTH_STATUS_OK
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn timestamp_keeps_sub_second_precision() {
        let instant = Utc
            .timestamp_opt(1_700_000_000, 250_000_000)
            .single()
            .expect("valid timestamp");
        let report = HealthReport::at(instant);

        assert!(report.is_ok());
        assert!((report.timestamp - 1_700_000_000.25).abs() < 1e-6);
    }

    #[test]
    fn serializes_status_and_numeric_timestamp() {
        let instant = Utc
            .timestamp_opt(1_700_000_000, 500_000_000)
            .single()
            .expect("valid timestamp");
        let value = serde_json::to_value(HealthReport::at(instant)).expect("serializable");

        assert_eq!(value["status"], "ok");
        assert_eq!(value["timestamp"].as_f64(), Some(1_700_000_000.5));
    }

    #[test]
    fn foreign_status_is_not_ok() {
        let report = HealthReport {
            status: "starting".to_string(),
            timestamp: 0.0,
        };
        assert!(!report.is_ok());
    }
}
