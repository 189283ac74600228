use std::net::IpAddr;

use axum::http::HeaderMap;
use ipnet::IpNet;

/// Resolves the client address of a request.
///
/// `X-Forwarded-For` is only honoured when the direct peer is a trusted proxy.
/// Each proxy appends the address it received from, so the header is walked
/// from the right and the first hop outside the trusted set is the client.
/// Entries to the left of it are supplied by the client and ignored.
pub fn client_ip(headers: &HeaderMap, peer: IpAddr, trusted_proxies: &[IpNet]) -> IpAddr {
    let is_trusted = |ip: &IpAddr| trusted_proxies.iter().any(|net| net.contains(ip));
    if !is_trusted(&peer) {
        return peer;
    }

    let Some(xff) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    else {
        return peer;
    };

    for hop in xff.rsplit(',') {
        match hop.trim().parse::<IpAddr>() {
            Ok(ip) if is_trusted(&ip) => continue,
            Ok(ip) => return ip,
            Err(_) => return peer,
        }
    }
    peer
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(xff: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(xff).unwrap());
        headers
    }

    fn proxies() -> Vec<IpNet> {
        vec!["10.0.0.0/8".parse().unwrap()]
    }

    #[test]
    fn untrusted_peer_cannot_spoof() {
        let peer: IpAddr = "203.0.113.7".parse().unwrap();
        assert_eq!(client_ip(&headers("1.2.3.4"), peer, &proxies()), peer);
    }

    #[test]
    fn trusted_proxy_forwards_client() {
        let peer: IpAddr = "10.0.0.2".parse().unwrap();
        let got = client_ip(&headers("198.51.100.9, 10.0.0.3"), peer, &proxies());
        assert_eq!(got, "198.51.100.9".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn no_proxies_configured_uses_peer() {
        let peer: IpAddr = "10.0.0.2".parse().unwrap();
        assert_eq!(client_ip(&headers("1.2.3.4"), peer, &[]), peer);
    }

    #[test]
    fn garbage_header_falls_back_to_peer() {
        let peer: IpAddr = "10.0.0.2".parse().unwrap();
        assert_eq!(client_ip(&headers("unknown, nonsense"), peer, &proxies()), peer);
    }

    #[test]
    fn spoofed_leftmost_entry_is_ignored() {
        let peer: IpAddr = "10.0.0.2".parse().unwrap();
        let got = client_ip(&headers("6.6.6.6, 198.51.100.9"), peer, &proxies());
        assert_eq!(got, "198.51.100.9".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn chained_trusted_proxies_are_skipped() {
        let peer: IpAddr = "10.0.0.2".parse().unwrap();
        let got = client_ip(&headers("6.6.6.6, 198.51.100.9, 10.0.0.7"), peer, &proxies());
        assert_eq!(got, "198.51.100.9".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn header_of_only_proxies_uses_peer() {
        let peer: IpAddr = "10.0.0.2".parse().unwrap();
        assert_eq!(client_ip(&headers("10.0.0.9, 10.0.0.8"), peer, &proxies()), peer);
    }
}
