// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server configuration module
//!
//! The backend listens on a compiled-in loopback address. Environment variables
//! with the `BACKEND_` prefix may override it; no configuration file is read.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use anyhow::{Result, anyhow};
use config::{Config, ConfigError, Environment as ConfigEnv};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ServerError, ServerResult};

/// Loopback address the backend binds to
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
/// Port the desktop shell expects the backend on
pub const DEFAULT_PORT: u16 = 11459;

const ENV_PREFIX: &str = "BACKEND";
const DEFAULT_SHUTDOWN_DELAY_MILLIS: u64 = 500;
const DEFAULT_GRACEFUL_TIMEOUT_SECONDS: u64 = 5;

/// A validated server port that ensures the value is appropriate for the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerPort {
    port: u16,
    environment: Environment,
}

impl ServerPort {
    /// Create a new `ServerPort`, ensuring it's valid for the given environment
    ///
    /// # Errors
    ///
    /// Returns an error if the port is 0 in non-testing environments
    pub fn new(port: u16, environment: Environment) -> Result<Self> {
        if port == 0 && environment != Environment::Testing {
            return Err(anyhow!("port cannot be 0 in non-testing environments"));
        }
        Ok(Self { port, environment })
    }

    /// The port the desktop shell connects to
    pub const fn default_production() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: Environment::Production,
        }
    }

    /// Let the OS choose a free port
    pub const fn testing() -> Self {
        Self {
            port: 0,
            environment: Environment::Testing,
        }
    }

    /// Get the port value
    pub fn value(&self) -> u16 {
        self.port
    }
}

impl<'de> Deserialize<'de> for ServerPort {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let port = u16::deserialize(deserializer)?;
        // validated against the real environment once loading completes
        Ok(Self {
            port,
            environment: Environment::Production,
        })
    }
}

/// Ensure the backend stays on loopback unless running in development
///
/// # Errors
///
/// Returns an error for a non-loopback host in production or testing
pub fn validate_host(host: IpAddr, environment: Environment) -> Result<()> {
    if !host.is_loopback() && environment != Environment::Development {
        return Err(anyhow!(
            "host {host} is not a loopback address, only allowed in development"
        ));
    }
    Ok(())
}

/// Environment types for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Shipped alongside the desktop shell
    Production,
    /// Local development
    Development,
    /// Test harnesses
    Testing,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: IpAddr,
    /// Server port (validated for environment compatibility)
    pub port: ServerPort,
    /// Environment type
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: ServerPort::default_production(),
            environment: Environment::Production,
        }
    }
}

impl ServerConfig {
    /// Create configuration from the compiled-in defaults and `BACKEND_*` variables
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if an override is invalid.
    pub fn from_env() -> ServerResult<Self> {
        Self::load().map_err(|e| ServerError::Config {
            message: format!("failed to load configuration: {e}"),
        })
    }

    /// Load configuration using the config crate
    ///
    /// Sources, later overriding earlier:
    /// 1. Compiled-in defaults (`127.0.0.1:11459`, production)
    /// 2. Environment variables with the `BACKEND_` prefix
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::env_source())
    }

    fn env_source() -> ConfigEnv {
        ConfigEnv::with_prefix(ENV_PREFIX)
            .separator("_")
            .try_parsing(true)
    }

    fn load_from(env: ConfigEnv) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("host", DEFAULT_HOST.to_string())?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("environment", Environment::Production.to_string())?
            .add_source(env)
            .build()?;

        let mut server_config: Self = config.try_deserialize()?;

        server_config.port = ServerPort::new(server_config.port.value(), server_config.environment)
            .map_err(|e| ConfigError::Message(format!("invalid port configuration: {e}")))?;

        validate_host(server_config.host, server_config.environment)
            .map_err(|e| ConfigError::Message(format!("invalid host configuration: {e}")))?;

        Ok(server_config)
    }

    /// Create configuration for tests: loopback, OS-chosen port
    pub fn for_testing() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: ServerPort::testing(),
            environment: Environment::Testing,
        }
    }

    /// Get socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port.value())
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
            Environment::Testing => write!(f, "testing"),
        }
    }
}

/// Configuration for server shutdown behavior
#[derive(Debug, Clone)]
pub struct ShutdownConfig {
    /// Delay between acknowledging `POST /shutdown` and terminating
    pub shutdown_delay: Duration,
    /// Maximum time to drain open connections once termination starts
    pub graceful_timeout: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            shutdown_delay: Duration::from_millis(DEFAULT_SHUTDOWN_DELAY_MILLIS),
            graceful_timeout: Duration::from_secs(DEFAULT_GRACEFUL_TIMEOUT_SECONDS),
        }
    }
}
