use std::{net::SocketAddr, time::Duration};

use super::super::{DnsResolver, IpFamily, Resolve, ResolveError, ResolveFlags};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn resolve_ip_literal() {
    let resolver = DnsResolver::new("127.0.0.1", "8080", IpFamily::Any, ResolveFlags::default());
    let endpoints = resolver.resolve(TIMEOUT).await.unwrap();
    let expected: SocketAddr = "127.0.0.1:8080".parse().unwrap();
    assert_eq!(endpoints, vec![expected]);
}

#[tokio::test]
async fn resolve_localhost() {
    let resolver = DnsResolver::new("localhost", "443", IpFamily::Any, ResolveFlags::none());
    let endpoints = resolver.resolve(TIMEOUT).await.unwrap();

    assert!(!endpoints.is_empty());
    for endpoint in endpoints {
        assert_eq!(endpoint.port(), 443);
        assert!(endpoint.ip().is_loopback());
    }
}

#[tokio::test]
async fn family_filter() {
    let resolver = DnsResolver::new("127.0.0.1", "80", IpFamily::Ipv6, ResolveFlags::none());
    assert_eq!(
        resolver.resolve(TIMEOUT).await,
        Err(ResolveError::NoEndpoints("127.0.0.1:80".into()))
    );
}

#[tokio::test]
async fn v4_mapped() {
    let flags = ResolveFlags::none().v4_mapped(true);
    let resolver = DnsResolver::new("127.0.0.1", "80", IpFamily::Ipv6, flags);
    let endpoints = resolver.resolve(TIMEOUT).await.unwrap();
    let expected: SocketAddr = "[::ffff:127.0.0.1]:80".parse().unwrap();
    assert_eq!(endpoints, vec![expected]);
}

#[tokio::test]
async fn numeric_host() {
    let flags = ResolveFlags::none().numeric_host(true);

    let resolver = DnsResolver::new("[::1]", "53", IpFamily::Any, flags);
    assert_eq!(
        resolver.resolve(TIMEOUT).await.unwrap(),
        vec!["[::1]:53".parse::<SocketAddr>().unwrap()]
    );

    let resolver = DnsResolver::new("localhost", "53", IpFamily::Any, flags);
    assert_eq!(
        resolver.resolve(TIMEOUT).await,
        Err(ResolveError::NotNumericHost("localhost".into()))
    );
}

#[tokio::test]
async fn invalid_port() {
    let resolver = DnsResolver::new("localhost", "http", IpFamily::Any, ResolveFlags::default());
    assert_eq!(
        resolver.resolve(TIMEOUT).await,
        Err(ResolveError::InvalidPort("http".into()))
    );
}

#[tokio::test]
async fn invalid_host() {
    let flags = ResolveFlags::default();
    let resolver = DnsResolver::new("invalid_host.invalid", "80", IpFamily::Any, flags);
    match resolver.resolve(TIMEOUT).await {
        Err(ResolveError::Lookup { target, .. }) => assert_eq!(target, "invalid_host.invalid:80"),
        Err(ResolveError::Timeout(_)) => (),
        other => panic!("unexpected result {:?}", other),
    }
}
