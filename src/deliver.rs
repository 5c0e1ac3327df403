//! Single-shot delivery entry points.

use log::debug;

use crate::{
    appender::Appender,
    cancel::CancelToken,
    config::{AppenderConfig, Endpoint},
    error::DeliveryError,
    transport::{DefaultTransport, Transport},
};

/// Ship one record to `endpoint` using the default transport.
///
/// Opens a fresh connection, writes `"{token} {message}"` as a single
/// framed record, and closes the connection; connections are never
/// reused across deliveries. Transient failures retry indefinitely; the
/// call returns an error only for an empty token or if cancelled (the
/// default token here is never fired, so callers needing an abort path
/// use [`deliver_with`]).
pub fn deliver(token: &str, message: &str, endpoint: Endpoint) -> Result<(), DeliveryError> {
    deliver_with(
        DefaultTransport::default(),
        token,
        message,
        AppenderConfig::new(endpoint),
        CancelToken::new(),
    )
}

/// Ship one record with an explicit transport, configuration, and
/// cancellation token.
pub fn deliver_with<T: Transport>(
    transport: T,
    token: &str,
    message: &str,
    config: AppenderConfig,
    cancel: CancelToken,
) -> Result<(), DeliveryError> {
    if token.is_empty() {
        return Err(DeliveryError::EmptyToken);
    }
    let host = config.endpoint.host.clone();
    let mut appender = Appender::new(transport, config, cancel);
    appender.reconnect()?;
    let result = appender.send(&format!("{token} {message}"));
    // The connection is released whether or not the send succeeded.
    appender.close_connection();
    if result.is_ok() {
        debug!("delivered one record to {host}");
    }
    result
}
