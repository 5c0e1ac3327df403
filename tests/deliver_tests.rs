//! End-to-end delivery tests against real TCP listeners.

use std::{
    io::Read,
    net::{SocketAddr, TcpListener},
    sync::mpsc,
    thread,
    time::Duration,
};

use rstest::{fixture, rstest};

use logship::{
    AppenderConfig, BackoffPolicy, CancelToken, DeliveryError, Endpoint, PlainTransport,
    deliver_with,
};

#[fixture]
fn tcp_listener() -> TcpListener {
    TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener")
}

fn plaintext_config(addr: SocketAddr) -> AppenderConfig {
    AppenderConfig::new(Endpoint::new(addr.ip().to_string()).with_port(addr.port()))
        .with_connect_timeout(Duration::from_millis(500))
        .with_backoff(BackoffPolicy {
            base: Duration::from_millis(10),
            cap: Duration::from_millis(100),
        })
}

/// Accept one connection and return every byte the client writes.
fn spawn_record_server(listener: TcpListener) -> mpsc::Receiver<Vec<u8>> {
    let (notify_tx, notify_rx) = mpsc::channel();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept connection");
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes).expect("read record");
        notify_tx.send(bytes).expect("send record");
    });
    notify_rx
}

#[rstest]
fn deliver_ships_one_exact_record(tcp_listener: TcpListener) {
    let addr = tcp_listener.local_addr().expect("listener has address");
    let notify_rx = spawn_record_server(tcp_listener);

    deliver_with(
        PlainTransport,
        "TOKEN123",
        "line1\nline2",
        plaintext_config(addr),
        CancelToken::new(),
    )
    .expect("delivery succeeds");

    let bytes = notify_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("record received");
    assert_eq!(bytes, "TOKEN123 line1\u{2028}line2\n".as_bytes());
}

#[rstest]
fn deliver_rejects_empty_token(tcp_listener: TcpListener) {
    let addr = tcp_listener.local_addr().expect("listener has address");
    let err = deliver_with(
        PlainTransport,
        "",
        "message",
        plaintext_config(addr),
        CancelToken::new(),
    )
    .expect_err("empty token must be rejected");
    assert!(matches!(err, DeliveryError::EmptyToken));
}

#[rstest]
fn deliver_retries_until_server_accepts() {
    // Bind then drop so the first connection attempts are refused, then
    // bring the server up on the same address.
    let addr = TcpListener::bind(("127.0.0.1", 0))
        .expect("bind ephemeral listener")
        .local_addr()
        .expect("listener has address");

    let (notify_tx, notify_rx) = mpsc::channel();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(150));
        let listener = TcpListener::bind(addr).expect("rebind listener");
        let (mut stream, _) = listener.accept().expect("accept connection");
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes).expect("read record");
        notify_tx.send(bytes).expect("send record");
    });

    deliver_with(
        PlainTransport,
        "TOKEN123",
        "after outage",
        plaintext_config(addr),
        CancelToken::new(),
    )
    .expect("delivery succeeds once the server accepts");

    let bytes = notify_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("record received");
    assert_eq!(bytes, b"TOKEN123 after outage\n");
}

#[rstest]
fn cancellation_aborts_a_sleeping_retry_loop() {
    // Nothing ever listens on this address; the delivery can only retry.
    let addr = TcpListener::bind(("127.0.0.1", 0))
        .expect("bind ephemeral listener")
        .local_addr()
        .expect("listener has address");
    let config = AppenderConfig::new(Endpoint::new(addr.ip().to_string()).with_port(addr.port()))
        .with_connect_timeout(Duration::from_millis(250))
        .with_backoff(BackoffPolicy {
            base: Duration::from_secs(2),
            cap: Duration::from_secs(10),
        });

    let cancel = CancelToken::new();
    let remote = cancel.clone();
    let (result_tx, result_rx) = mpsc::channel();
    thread::spawn(move || {
        let result = deliver_with(PlainTransport, "TOKEN123", "never sent", config, remote);
        result_tx.send(result).expect("send delivery result");
    });

    thread::sleep(Duration::from_millis(100));
    cancel.cancel();

    let result = result_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("delivery must abort promptly after cancellation");
    assert!(matches!(result, Err(DeliveryError::Cancelled)));
}
