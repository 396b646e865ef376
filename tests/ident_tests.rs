use axum::http::HeaderMap;
use canarygate::ident::{client_ip, forwarded_host};
use std::net::SocketAddr;

fn peer() -> Option<SocketAddr> {
    Some("203.0.113.7:54321".parse().unwrap())
}

#[test]
fn test_forwarded_for_wins() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", "198.51.100.4".parse().unwrap());
    assert_eq!(client_ip(&headers, peer()), "198.51.100.4");
}

#[test]
fn test_forwarded_for_first_entry_trimmed() {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-forwarded-for",
        " 198.51.100.4 , 10.0.0.1, 172.16.0.9".parse().unwrap(),
    );
    assert_eq!(client_ip(&headers, peer()), "198.51.100.4");
}

#[test]
fn test_empty_forwarded_for_falls_through() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", "".parse().unwrap());
    assert_eq!(client_ip(&headers, peer()), "203.0.113.7");
}

#[test]
fn test_peer_address_fallback() {
    let headers = HeaderMap::new();
    assert_eq!(client_ip(&headers, peer()), "203.0.113.7");
}

#[test]
fn test_unknown_when_nothing_available() {
    let headers = HeaderMap::new();
    assert_eq!(client_ip(&headers, None), "unknown");
}

#[test]
fn test_forwarded_host_precedence() {
    let mut headers = HeaderMap::new();
    headers.insert("host", "internal:8080".parse().unwrap());
    headers.insert("x-forwarded-host", "fw.example.com".parse().unwrap());
    assert_eq!(forwarded_host(&headers), Some("fw.example.com".to_string()));
}

#[test]
fn test_host_header_fallback() {
    let mut headers = HeaderMap::new();
    headers.insert("host", "appliance.corp.lan".parse().unwrap());
    assert_eq!(forwarded_host(&headers), Some("appliance.corp.lan".to_string()));
}

#[test]
fn test_no_host_headers() {
    assert_eq!(forwarded_host(&HeaderMap::new()), None);
}
