//! Transport variants for the shipping connection.

use std::{
    io::{self, Write},
    net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs},
    time::Duration,
};

#[cfg(feature = "tls")]
use native_tls::{TlsConnector, TlsStream};

use crate::config::Endpoint;

/// Capability set every transport variant provides.
///
/// The variant is chosen once, at appender construction; there is no
/// per-send fallback between variants.
pub trait Transport {
    /// Open a connection to `endpoint`, performing any handshake the
    /// variant requires. Handshake failures are connection errors.
    fn open(&self, endpoint: &Endpoint, connect_timeout: Duration) -> io::Result<Connection>;
}

/// Raw TCP to `endpoint.port`, no encryption.
#[derive(Clone, Debug, Default)]
pub struct PlainTransport;

/// TLS over TCP to `endpoint.tls_port`.
///
/// The handshake verifies the peer's certificate chain against the
/// bundled trust store and negotiates the highest mutually supported
/// protocol version.
#[cfg(feature = "tls")]
#[derive(Clone, Debug, Default)]
pub struct TlsTransport {
    /// Skip certificate validation when true (intended for tests).
    pub insecure_skip_verify: bool,
}

/// Transport used by [`deliver`](crate::deliver()): TLS when the `tls`
/// feature is enabled, plaintext otherwise. Resolved at compile time.
#[cfg(feature = "tls")]
pub type DefaultTransport = TlsTransport;
#[cfg(not(feature = "tls"))]
pub type DefaultTransport = PlainTransport;

/// Live socket owned by the appender. Never reused after `shutdown`.
pub enum Connection {
    Plain(TcpStream),
    #[cfg(feature = "tls")]
    Tls(Box<TlsStream<TcpStream>>),
}

impl Connection {
    /// Write a full record to the socket and flush it.
    pub fn send(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Connection::Plain(stream) => {
                stream.write_all(buf)?;
                stream.flush()
            }
            #[cfg(feature = "tls")]
            Connection::Tls(stream) => {
                stream.write_all(buf)?;
                stream.flush()
            }
        }
    }

    /// Best-effort shutdown of the underlying socket.
    pub fn shutdown(&mut self) {
        let _ = match self {
            Connection::Plain(stream) => stream.shutdown(Shutdown::Both),
            #[cfg(feature = "tls")]
            Connection::Tls(stream) => stream.get_ref().shutdown(Shutdown::Both),
        };
    }
}

fn connect_tcp(host: &str, port: u16, timeout: Duration) -> io::Result<TcpStream> {
    let addrs: Vec<SocketAddr> = (host, port).to_socket_addrs()?.collect();
    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no addresses resolved for {host}:{port}"),
        )
    }))
}

impl Transport for PlainTransport {
    fn open(&self, endpoint: &Endpoint, connect_timeout: Duration) -> io::Result<Connection> {
        let stream = connect_tcp(&endpoint.host, endpoint.port, connect_timeout)?;
        Ok(Connection::Plain(stream))
    }
}

#[cfg(feature = "tls")]
impl Transport for TlsTransport {
    fn open(&self, endpoint: &Endpoint, connect_timeout: Duration) -> io::Result<Connection> {
        let mut builder = TlsConnector::builder();
        if self.insecure_skip_verify {
            builder.danger_accept_invalid_certs(true);
            builder.danger_accept_invalid_hostnames(true);
        }
        let connector = builder.build().map_err(io::Error::other)?;

        let stream = connect_tcp(&endpoint.host, endpoint.tls_port, connect_timeout)?;
        // Bound the handshake by the connect timeout, then restore
        // blocking semantics for sends.
        stream.set_read_timeout(Some(connect_timeout))?;
        stream.set_write_timeout(Some(connect_timeout))?;
        let stream = connector
            .connect(&endpoint.host, stream)
            .map_err(io::Error::other)?;
        let tcp_ref = stream.get_ref();
        tcp_ref.set_read_timeout(None)?;
        tcp_ref.set_write_timeout(None)?;
        Ok(Connection::Tls(Box::new(stream)))
    }
}
