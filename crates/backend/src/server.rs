// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server implementation module
//!
//! This module provides the main server struct for the backend, including
//! server lifecycle management, router configuration, and coordinated graceful
//! shutdown using `CancellationToken`.

use std::{future::IntoFuture, net::SocketAddr, time::Duration};

use axum::{Router, http::HeaderName};
use hyper::Request;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, info_span, warn};

use crate::{
    config::{ServerConfig, ShutdownConfig},
    error::{ServerError, ServerResult},
    middleware::handle_panic,
    routes::create_routes,
    state::ServerState,
};

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Main server struct
#[derive(Debug)]
pub struct Server {
    /// Server configuration
    config: ServerConfig,
    /// Application router
    router: Router,
    /// Server state
    state: ServerState,
    /// Cancellation token for coordinated shutdown
    cancellation_token: CancellationToken,
    /// Configuration for coordinated shutdown
    shutdown_config: ShutdownConfig,
}

impl Server {
    /// Create new server instance
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if the configuration is invalid.
    pub fn new(config: ServerConfig, shutdown_config: ShutdownConfig) -> ServerResult<Self> {
        let cancellation_token = CancellationToken::new();
        // `POST /shutdown` must stop the whole server, so the state holds the root token
        let state = ServerState::new(
            config.clone(),
            &shutdown_config,
            cancellation_token.clone(),
        );
        let router = Self::create_router(state.clone());

        Ok(Self {
            config,
            router,
            state,
            cancellation_token,
            shutdown_config,
        })
    }

    /// Create application router with middleware
    fn create_router(state: ServerState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
                    if let Some(request_id) = req.headers().get(REQUEST_ID_HEADER) {
                        info_span!("http_request", ?request_id)
                    } else {
                        error!("failed to extract id from request");
                        info_span!("http_request", request_id = "unknown")
                    }
                }),
            )
            .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
            .layer(CorsLayer::permissive())
            .layer(CatchPanicLayer::custom(handle_panic));

        create_routes().layer(middleware).with_state(state)
    }

    /// Run the server with coordinated graceful shutdown
    ///
    /// Returns once a termination signal or `POST /shutdown` cancels the
    /// server and open connections have drained, or the graceful timeout
    /// has elapsed.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if unable to bind to the configured address,
    /// or `ServerError::Startup` if the server fails to start.
    pub async fn run(self) -> ServerResult<()> {
        let (listener, actual_addr) = self.bind().await?;

        info!(
            address = %actual_addr,
            environment = %self.config.environment,
            "backend server starting",
        );

        self.serve(listener).await
    }

    /// Serve on an already bound listener until cancelled and drained
    async fn serve(self, listener: TcpListener) -> ServerResult<()> {
        let cancellation_token = self.cancellation_token.clone();
        let shutdown_token = cancellation_token.clone();
        tokio::spawn(async move {
            Self::shutdown_signal_handler(shutdown_token).await;
        });

        let drain_token = cancellation_token.clone();
        let graceful_timeout = self.shutdown_config.graceful_timeout;

        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                cancellation_token.cancelled().await;
                info!("backend server draining connections");
            })
            .into_future();

        tokio::select! {
            server_result = serve => {
                if let Err(e) = server_result {
                    error!(error = ?e, "Server error during shutdown");
                    return Err(ServerError::Shutdown { source: e });
                }
                info!("backend server shut down gracefully");
                Ok(())
            }
            () = Self::drain_deadline(drain_token, graceful_timeout) => {
                warn!(
                    timeout_seconds = graceful_timeout.as_secs_f64(),
                    "graceful shutdown timed out, dropping open connections"
                );
                Ok(())
            }
        }
    }

    /// Resolves `timeout` after the token is cancelled
    async fn drain_deadline(token: CancellationToken, timeout: Duration) {
        token.cancelled().await;
        tokio::time::sleep(timeout).await;
    }

    async fn bind(&self) -> ServerResult<(TcpListener, SocketAddr)> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                address: addr,
                source,
            })?;

        let actual_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Startup { source })?;

        Ok((listener, actual_addr))
    }

    /// Handle shutdown signals and trigger coordinated cancellation
    ///
    /// This function listens for SIGINT (Ctrl+C) and SIGTERM signals,
    /// and cancels the provided cancellation token when received.
    async fn shutdown_signal_handler(cancellation_token: CancellationToken) {
        let signal_received = async {
            #[cfg(unix)]
            #[allow(clippy::expect_used)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let mut sigterm =
                    signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
                let mut sigint =
                    signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

                tokio::select! {
                    _ = sigterm.recv() => "SIGTERM",
                    _ = sigint.recv() => "SIGINT",
                }
            }

            #[cfg(not(unix))]
            #[allow(clippy::expect_used)]
            {
                tokio::signal::ctrl_c()
                    .await
                    .expect("Failed to install CTRL+C signal handler");
                "CTRL+C"
            }
        };

        tokio::select! {
            signal_name = signal_received => {
                warn!("Shutdown signal {} received, stopping server", signal_name);
                cancellation_token.cancel();
            },
            () = cancellation_token.cancelled() => {}
        }
    }

    /// Returns a clone of the cancellation token for coordinated shutdown
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Initiates graceful shutdown by cancelling the server's cancellation token
    pub fn shutdown(&self) {
        info!("programmatic shutdown requested");
        self.cancellation_token.cancel();
    }

    /// Run server for testing, returns the bound address
    ///
    /// The returned token stops the server when cancelled and is also
    /// cancelled by `POST /shutdown`.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if unable to bind to the configured address.
    pub async fn run_for_testing(self) -> ServerResult<(SocketAddr, CancellationToken)> {
        let (listener, actual_addr) = self.bind().await?;

        let token = self.cancellation_token.clone();
        let task = token.clone();
        tokio::spawn(async move {
            let _ = axum::serve(listener, self.router)
                .with_graceful_shutdown(async move { task.cancelled().await })
                .await;
        });

        Ok((actual_addr, token))
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get server state for testing
    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Get the application router, middleware included
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[tokio::test]
    async fn server_creation() -> ServerResult<()> {
        let config = ServerConfig::for_testing();
        let server = Server::new(config, ShutdownConfig::default())?;
        assert_eq!(server.config().environment, Environment::Testing);
        assert!(!server.cancellation_token().is_cancelled());
        Ok(())
    }

    #[tokio::test]
    async fn programmatic_shutdown() -> ServerResult<()> {
        let config = ServerConfig::for_testing();
        let server = Server::new(config, ShutdownConfig::default())?;

        assert!(!server.cancellation_token().is_cancelled());

        server.shutdown();

        assert!(server.cancellation_token().is_cancelled());
        assert!(server.state().shutdown().is_terminating());
        Ok(())
    }

    #[tokio::test]
    async fn run_returns_after_cancellation() -> ServerResult<()> {
        let server = Server::new(ServerConfig::for_testing(), ShutdownConfig::default())?;
        let token = server.cancellation_token();

        let handle = tokio::spawn(server.run());
        token.cancel();

        tokio::time::timeout(Duration::from_secs(10), handle)
            .await
            .expect("server stops after cancellation")
            .expect("server task does not panic")
    }

    #[tokio::test]
    async fn stalled_connection_does_not_outlive_graceful_timeout() -> ServerResult<()> {
        use tokio::io::AsyncWriteExt;

        let shutdown_config = ShutdownConfig {
            graceful_timeout: Duration::from_millis(200),
            ..ShutdownConfig::default()
        };
        let server = Server::new(ServerConfig::for_testing(), shutdown_config)?;
        let token = server.cancellation_token();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(server.serve(listener));

        // headers promise a body that never arrives, so the request never completes
        let mut stream = tokio::net::TcpStream::connect(addr)
            .await
            .expect("connect to server");
        stream
            .write_all(
                b"POST /api/process_data HTTP/1.1\r\nHost: localhost\r\n\
                  Content-Type: application/json\r\nContent-Length: 100\r\n\r\n{",
            )
            .await
            .expect("send partial request");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!handle.is_finished());

        token.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server stops once the graceful timeout elapses")
            .expect("server task does not panic");

        drop(stream);
        result
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() -> ServerResult<()> {
        let occupied = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let port = occupied.local_addr().expect("local addr").port();

        let mut config = ServerConfig::for_testing();
        config.port = crate::config::ServerPort::new(port, Environment::Testing)
            .expect("valid testing port");

        let result = Server::new(config, ShutdownConfig::default())?
            .run_for_testing()
            .await;

        assert!(matches!(result, Err(ServerError::Bind { .. })));
        Ok(())
    }
}
