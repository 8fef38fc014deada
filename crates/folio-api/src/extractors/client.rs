//! Client address resolution.

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{Extensions, HeaderMap};

/// Address recorded when neither a forwarded header nor a peer address is
/// available.
pub const UNKNOWN_CLIENT_IP: &str = "0.0.0.0";

/// First `X-Forwarded-For` entry, else the socket peer, else
/// [`UNKNOWN_CLIENT_IP`].
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT_IP.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        let mut ext = Extensions::new();
        ext.insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 5000))));
        assert_eq!(client_ip(&headers, &ext), "203.0.113.7");
    }

    #[test]
    fn test_peer_then_fallback() {
        let headers = HeaderMap::new();
        let mut ext = Extensions::new();
        assert_eq!(client_ip(&headers, &ext), UNKNOWN_CLIENT_IP);

        ext.insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 9], 5000))));
        assert_eq!(client_ip(&headers, &ext), "192.168.1.9");
    }
}
