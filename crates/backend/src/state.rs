// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! Handlers are stateless apart from the shutdown trigger, which needs the
//! server's cancellation token.

use tokio_util::sync::CancellationToken;

use crate::{
    config::{ServerConfig, ShutdownConfig},
    lifecycle::ShutdownScheduler,
};

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Deferred termination for `POST /shutdown`
    shutdown: ShutdownScheduler,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `shutdown_config` - Delay applied by the shutdown trigger
    /// * `cancellation_token` - Token cancelled to stop the server
    pub fn new(
        config: ServerConfig,
        shutdown_config: &ShutdownConfig,
        cancellation_token: CancellationToken,
    ) -> Self {
        let shutdown =
            ShutdownScheduler::new(shutdown_config.shutdown_delay, cancellation_token.clone());
        Self {
            config,
            shutdown,
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Scheduler behind `POST /shutdown`
    pub fn shutdown(&self) -> &ShutdownScheduler {
        &self.shutdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_state_creation() {
        let state = ServerState::new(
            ServerConfig::default(),
            &ShutdownConfig::default(),
            CancellationToken::new(),
        );

        assert!(!state.cancellation_token.is_cancelled());
        assert!(!state.shutdown().is_terminating());
        assert_eq!(state.config().port.value(), crate::config::DEFAULT_PORT);
        assert_eq!(
            state.shutdown().delay(),
            ShutdownConfig::default().shutdown_delay
        );
    }

    #[test]
    fn scheduler_shares_the_state_token() {
        let token = CancellationToken::new();
        let state = ServerState::new(
            ServerConfig::default(),
            &ShutdownConfig::default(),
            token.clone(),
        );

        token.cancel();
        assert!(state.cancellation_token.is_cancelled());
        assert!(state.shutdown().is_terminating());
    }
}
