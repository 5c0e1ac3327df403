//! Connection lifecycle orchestration.

use std::{io, time::Duration};

use log::warn;

use crate::{
    backoff::BackoffState,
    cancel::CancelToken,
    config::AppenderConfig,
    error::DeliveryError,
    frame::frame,
    transport::{Connection, Transport},
};

/// Sleep callback consulted between reconnection attempts.
///
/// Returns `false` when the wait was interrupted by cancellation. Tests
/// substitute a recording closure to observe waits without wall-clock
/// delay.
pub type SleepFn = Box<dyn FnMut(Duration) -> bool + Send>;

/// Owns the connection lifecycle and message framing for one shipping
/// session.
///
/// Holds zero or one live [`Connection`]; the transport variant is fixed
/// at construction. Not shared between threads; callers needing
/// concurrent delivery use independent appenders.
pub struct Appender<T: Transport> {
    transport: T,
    config: AppenderConfig,
    cancel: CancelToken,
    sleep: SleepFn,
    conn: Option<Connection>,
}

impl<T: Transport> Appender<T> {
    pub fn new(transport: T, config: AppenderConfig, cancel: CancelToken) -> Self {
        let sleeper = cancel.clone();
        Self {
            transport,
            config,
            cancel,
            sleep: Box::new(move |wait| sleeper.sleep(wait)),
            conn: None,
        }
    }

    /// Replace the sleep callback used between reconnection attempts.
    pub fn with_sleep_fn(mut self, sleep: SleepFn) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Single connection attempt, no retries. Used for the first,
    /// explicit open; the error propagates and no connection is held.
    /// Opening over a live connection is an error, the existing
    /// connection is kept.
    pub fn open_connection(&mut self) -> Result<(), DeliveryError> {
        self.try_open().map_err(DeliveryError::Connect)
    }

    fn try_open(&mut self) -> io::Result<()> {
        if self.conn.is_some() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "connection already open; close it first",
            ));
        }
        let conn = self
            .transport
            .open(&self.config.endpoint, self.config.connect_timeout)?;
        self.conn = Some(conn);
        Ok(())
    }

    /// The resilient path: close any live connection, then retry opening
    /// until success or cancellation, sleeping jittered backoff waits
    /// between attempts. There is no retry cap.
    pub fn reconnect(&mut self) -> Result<(), DeliveryError> {
        self.close_connection();
        let mut backoff = BackoffState::new(self.config.backoff.clone());
        loop {
            if self.cancel.is_cancelled() {
                return Err(DeliveryError::Cancelled);
            }
            match self.try_open() {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!("unable to connect to {}: {err}", self.config.endpoint.host);
                }
            }
            let wait = backoff.next_wait();
            if !(self.sleep)(wait) {
                return Err(DeliveryError::Cancelled);
            }
        }
    }

    /// Shut down and drop a live connection. Idempotent; a no-op when
    /// already disconnected.
    pub fn close_connection(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            conn.shutdown();
        }
    }

    /// Frame and send one record, reconnecting as needed.
    ///
    /// A write failure drops the connection and triggers one
    /// [`reconnect`](Self::reconnect) cycle before the send is retried;
    /// the cycle repeats until the send succeeds or the token fires.
    /// Success leaves the connection open.
    pub fn send(&mut self, message: &str) -> Result<(), DeliveryError> {
        let payload = frame(message);
        loop {
            let Some(conn) = self.conn.as_mut() else {
                self.reconnect()?;
                continue;
            };
            match conn.send(&payload) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!("write to {} failed: {err}", self.config.endpoint.host);
                    self.reconnect()?;
                }
            }
        }
    }
}

impl<T: Transport> Drop for Appender<T> {
    fn drop(&mut self) {
        self.close_connection();
    }
}
