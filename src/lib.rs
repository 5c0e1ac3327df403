//! Resilient log-line shipping client.
//!
//! This crate delivers single log records to a remote ingestion endpoint
//! over TCP or TLS. Each delivery opens a fresh connection, frames the
//! message as one wire-level record (embedded newlines become U+2028 LINE
//! SEPARATOR, a single `\n` terminates the record), writes it, and closes
//! the connection. Transient connect and write failures are absorbed by an
//! unbounded reconnection loop with exponential backoff and jitter; the
//! only way out of the retry regime besides success is a [`CancelToken`].
//!
//! ```no_run
//! use logship::{deliver, Endpoint};
//!
//! let endpoint = Endpoint::new("data.example.com");
//! deliver("057af3e2-1c05-47c5-882a-5cd644655dbf", "job finished\nexit=0", endpoint)?;
//! # Ok::<(), logship::DeliveryError>(())
//! ```
//!
//! The default transport is TLS (crate feature `tls`, enabled by default);
//! building without it yields a plaintext-only client. The choice is made
//! at compile time, never per call.

mod appender;
mod backoff;
mod cancel;
mod config;
mod deliver;
mod error;
mod frame;
mod transport;


pub use appender::{Appender, SleepFn};
pub use backoff::{BackoffPolicy, BackoffState, DEFAULT_BACKOFF_BASE, DEFAULT_BACKOFF_CAP};
pub use cancel::CancelToken;
pub use config::{
    AppenderConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PLAINTEXT_PORT, DEFAULT_TLS_PORT, Endpoint,
};
pub use deliver::{deliver, deliver_with};
pub use error::DeliveryError;
pub use frame::{LINE_SEP, frame};
#[cfg(feature = "tls")]
pub use transport::TlsTransport;
pub use transport::{Connection, DefaultTransport, PlainTransport, Transport};
