use chrono::Local;

use super::ip::resolve_client_ip;
use super::types::{RawRequest, Scheme, SignalSet};

/// Session cookie consulted for the session token signal.
pub const SESSION_COOKIE: &str = "cg_session";

/// Build the signal set for one inbound page view.
///
/// Total function: every absent attribute collapses to an empty string and
/// the address resolution has its own fallback. Nothing here validates or
/// sanitizes; escaping is the renderer's concern.
pub fn collect(raw: &RawRequest) -> SignalSet {
    SignalSet {
        timestamp: Local::now(),
        client_ip: resolve_client_ip(raw),
        user_agent: header_or_empty(raw, "user-agent"),
        referer: header_or_empty(raw, "referer"),
        request_uri: raw.uri.clone(),
        method: raw.method.clone(),
        query_string: raw.query.clone(),
        accept_language: header_or_empty(raw, "accept-language"),
        host: header_or_empty(raw, "host"),
        scheme: detect_scheme(raw),
        session_token: raw.cookie(SESSION_COOKIE).unwrap_or_default().to_string(),
    }
}

fn header_or_empty(raw: &RawRequest, name: &str) -> String {
    raw.header(name).unwrap_or_default().to_string()
}

/// Behind a terminating proxy the socket never speaks TLS itself, so the
/// forwarded proto header is the only scheme signal available.
fn detect_scheme(raw: &RawRequest) -> Scheme {
    match raw.header("x-forwarded-proto") {
        Some(proto) if proto.eq_ignore_ascii_case("https") => Scheme::Https,
        _ => Scheme::Http,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_full() -> RawRequest {
        RawRequest {
            remote_addr: Some("198.51.100.7".parse().unwrap()),
            method: "GET".to_string(),
            uri: "/?utm_source=ad".to_string(),
            query: "utm_source=ad".to_string(),
            headers: vec![
                ("Host".to_string(), "vpn.example.com".to_string()),
                ("User-Agent".to_string(), "Mozilla/5.0".to_string()),
                ("Referer".to_string(), "https://ads.example/".to_string()),
                ("Accept-Language".to_string(), "en-US,en;q=0.9".to_string()),
                ("X-Forwarded-Proto".to_string(), "https".to_string()),
                ("Cookie".to_string(), "cg_session=s-1".to_string()),
            ],
        }
    }

    #[test]
    fn test_collect_full_request() {
        let s = collect(&raw_full());
        assert_eq!(s.client_ip, "198.51.100.7");
        assert_eq!(s.user_agent, "Mozilla/5.0");
        assert_eq!(s.referer, "https://ads.example/");
        assert_eq!(s.request_uri, "/?utm_source=ad");
        assert_eq!(s.method, "GET");
        assert_eq!(s.query_string, "utm_source=ad");
        assert_eq!(s.accept_language, "en-US,en;q=0.9");
        assert_eq!(s.host, "vpn.example.com");
        assert_eq!(s.scheme, Scheme::Https);
        assert_eq!(s.session_token, "s-1");
    }

    #[test]
    fn test_collect_is_total_on_bare_request() {
        let s = collect(&RawRequest::default());
        assert_eq!(s.client_ip, "0.0.0.0");
        assert_eq!(s.user_agent, "");
        assert_eq!(s.referer, "");
        assert_eq!(s.accept_language, "");
        assert_eq!(s.host, "");
        assert_eq!(s.scheme, Scheme::Http);
        assert_eq!(s.session_token, "");
    }

    #[test]
    fn test_scheme_defaults_to_http() {
        let mut raw = raw_full();
        raw.headers.retain(|(k, _)| k != "X-Forwarded-Proto");
        assert_eq!(collect(&raw).scheme, Scheme::Http);
    }
}
