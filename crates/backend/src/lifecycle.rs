// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Deferred self-termination
//!
//! `POST /shutdown` must answer before the process goes away, so termination
//! runs on a detached task that waits out a short delay and then cancels the
//! server's token. The server observes the same token for OS signals.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Schedules single-shot shutdowns of the running server
#[derive(Debug, Clone)]
pub struct ShutdownScheduler {
    delay: Duration,
    token: CancellationToken,
}

impl ShutdownScheduler {
    /// Create a scheduler that cancels `token` `delay` after each request
    pub fn new(delay: Duration, token: CancellationToken) -> Self {
        Self { delay, token }
    }

    /// Delay applied before termination
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a shutdown has already fired
    pub fn is_terminating(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Spawn a task that terminates the server once the delay has elapsed
    ///
    /// Every call spawns its own task and none can be called off. The first
    /// task to fire stops the server; cancelling an already cancelled token is
    /// a no-op, so later tasks change nothing.
    pub fn schedule(&self) -> JoinHandle<()> {
        let delay = self.delay;
        let token = self.token.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if token.is_cancelled() {
                return;
            }
            info!("server shut down");
            token.cancel();
        })
    }
}
