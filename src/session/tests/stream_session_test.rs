use std::{io, time::Duration};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

use super::local_config;
use crate::{
    connector::{TcpConnector, TlsConnector},
    utils::Error,
};

#[tokio::test]
async fn tcp_echo() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server_addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 5];
        stream.read_exact(&mut buf).await.unwrap();
        stream.write_all(&buf).await.unwrap();
    });

    let connector = TcpConnector::from_config(local_config(server_addr.port())).unwrap();
    let mut session = connector
        .acquire_within(Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(session.peer_addr(), server_addr);
    assert_ne!(session.local_addr().port(), server_addr.port());
    assert!(!session.is_tls());

    assert_eq!(session.send(b"hello").await.unwrap(), 5);
    let mut buf = [0u8; 5];
    assert_eq!(session.receive_exact(&mut buf).await.unwrap(), 5);
    assert_eq!(&buf, b"hello");

    // The server is gone after one message.
    assert_eq!(session.receive(&mut buf).await.unwrap(), 0);
    session.close().await.unwrap();
}

#[tokio::test]
async fn receive_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let connector = TcpConnector::from_config(local_config(port)).unwrap();
    let mut session = connector
        .acquire_within(Duration::from_secs(1))
        .await
        .unwrap();
    session.set_operation_timeout(Duration::from_millis(100));

    let mut buf = [0u8; 1];
    let err = session.receive(&mut buf).await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::TimedOut);
}

#[tokio::test]
async fn refused_connection_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server_addr = listener.local_addr().unwrap();
    drop(listener);

    let connector = TcpConnector::from_config(local_config(server_addr.port())).unwrap();
    match connector.acquire_within(Duration::from_secs(1)).await {
        Err(Error::Connect { endpoint, source }) => {
            assert_eq!(endpoint, server_addr);
            assert_eq!(source.kind(), io::ErrorKind::ConnectionRefused);
        }
        Err(e) => panic!("unexpected error {}", e),
        Ok(_) => panic!("connected to a closed port"),
    }
}

#[tokio::test]
async fn tls_handshake_with_plain_server_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _ = stream
            .write_all(b"HTTP/1.1 400 Bad Request\r\nConnection: close\r\n\r\n")
            .await;
    });

    let config = local_config(port).with_tls_insecure(true);
    assert_eq!(config.tls_domain(), "127.0.0.1");

    let connector = TlsConnector::from_config(config).unwrap();
    let result = connector.acquire_within(Duration::from_secs(1)).await;
    assert!(matches!(result, Err(Error::Connect { .. })));
}
