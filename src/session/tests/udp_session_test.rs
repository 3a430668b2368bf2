use std::time::Duration;

use tokio::net::UdpSocket;

use super::local_config;
use crate::connector::UdpConnector;

#[tokio::test]
async fn udp_echo() {
    let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let server_addr = server.local_addr().unwrap();
    tokio::spawn(async move {
        let mut buf = [0u8; 64];
        let (n, from) = server.recv_from(&mut buf).await.unwrap();
        server.send_to(&buf[..n], from).await.unwrap();
    });

    let connector = UdpConnector::from_config(local_config(server_addr.port())).unwrap();
    let session = connector
        .acquire_within(Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(session.peer_addr(), server_addr);

    assert_eq!(session.send(b"ping").await.unwrap(), 4);
    let mut buf = [0u8; 64];
    let n = session.receive(&mut buf).await.unwrap();
    assert_eq!(&buf[..n], b"ping");
}

#[tokio::test]
async fn udp_receive_times_out() {
    let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = server.local_addr().unwrap().port();

    let connector = UdpConnector::from_config(local_config(port)).unwrap();
    let mut session = connector
        .acquire_within(Duration::from_secs(1))
        .await
        .unwrap();
    session.set_operation_timeout(Duration::from_millis(50));

    let mut buf = [0u8; 8];
    let err = session.receive(&mut buf).await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::TimedOut);
    drop(server);
}
