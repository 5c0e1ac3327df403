//! Endpoint and appender configuration.

use std::time::Duration;

use crate::backoff::BackoffPolicy;

/// Default plaintext ingestion port.
pub const DEFAULT_PLAINTEXT_PORT: u16 = 80;
/// Default TLS ingestion port.
pub const DEFAULT_TLS_PORT: u16 = 443;
/// Default timeout applied when establishing sockets.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Remote ingestion endpoint, immutable for the lifetime of an appender.
#[derive(Clone, Debug)]
pub struct Endpoint {
    /// Hostname or IP address of the ingestion service.
    pub host: String,
    /// Port used by the plaintext transport.
    pub port: u16,
    /// Port used by the TLS transport.
    pub tls_port: u16,
}

impl Endpoint {
    /// Endpoint with the conventional 80/443 port pair.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PLAINTEXT_PORT,
            tls_port: DEFAULT_TLS_PORT,
        }
    }

    /// Override the plaintext port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the TLS port.
    pub fn with_tls_port(mut self, tls_port: u16) -> Self {
        self.tls_port = tls_port;
        self
    }
}

/// Configuration consumed by [`Appender`](crate::Appender).
#[derive(Clone, Debug)]
pub struct AppenderConfig {
    pub endpoint: Endpoint,
    pub connect_timeout: Duration,
    pub backoff: BackoffPolicy,
}

impl AppenderConfig {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            backoff: BackoffPolicy::default(),
        }
    }

    /// Override the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Override the backoff bounds.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }
}
