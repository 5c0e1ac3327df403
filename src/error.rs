//! Error taxonomy surfaced to delivery callers.

use std::io;

use thiserror::Error;

/// Failure of a single delivery call.
///
/// Connect and write errors inside the retry loops are absorbed and
/// logged, never surfaced; under normal operation a delivery either
/// succeeds or keeps retrying until cancelled.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The cancellation token fired while the appender was retrying.
    #[error("delivery cancelled while retrying")]
    Cancelled,
    /// The token supplied to `deliver` was empty.
    #[error("token must not be empty")]
    EmptyToken,
    /// A connection attempt failed on the explicit, non-retrying open
    /// path. TLS handshake failures surface here too; the retry policy
    /// does not distinguish them from an unreachable host.
    #[error("unable to connect to endpoint: {0}")]
    Connect(#[source] io::Error),
}
