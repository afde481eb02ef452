use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::types::RawRequest;

/// Proxy-forwarding headers consulted before the raw connection address,
/// in precedence order. Mirrors what the fleet of CDNs and reverse proxies
/// in front of a landing page actually sets.
const FORWARD_HEADERS: [&str; 12] = [
    "client-ip",
    "x-forwarded-for",
    "x-forwarded",
    "x-cluster-client-ip",
    "forwarded-for",
    "forwarded",
    "cf-connecting-ip",
    "true-client-ip",
    "x-coming-from",
    "coming-from",
    "forwarded-for-ip",
    "x-real-ip",
];

/// Resolve the client address for one request.
///
/// Scans the forwarding headers in precedence order; a header may carry a
/// comma-separated chain, in which case each hop is tried left to right.
/// The first candidate that parses as an IP address outside private and
/// reserved ranges wins. When nothing qualifies the raw connection address
/// is returned unchanged, private or not.
pub fn resolve_client_ip(raw: &RawRequest) -> String {
    for header in FORWARD_HEADERS {
        let Some(value) = raw.header(header) else {
            continue;
        };
        for candidate in value.split(',') {
            let candidate = candidate.trim();
            if let Ok(ip) = candidate.parse::<IpAddr>() {
                if is_public(ip) {
                    return candidate.to_string();
                }
            }
        }
    }

    raw.remote_addr
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "0.0.0.0".to_string())
}

/// True when the address is neither private nor reserved.
pub fn is_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => !is_private_v4(v4) && !is_reserved_v4(v4),
        IpAddr::V6(v6) => !is_private_v6(v6) && !is_reserved_v6(v6),
    }
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    // 10/8, 172.16/12, 192.168/16
    ip.is_private()
}

fn is_reserved_v4(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();
    // 0/8, 127/8, 169.254/16, 240/4 (broadcast included)
    octets[0] == 0 || ip.is_loopback() || ip.is_link_local() || octets[0] >= 240
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    // fc00::/7 unique-local
    (ip.segments()[0] & 0xfe00) == 0xfc00
}

fn is_reserved_v6(ip: Ipv6Addr) -> bool {
    // ::, ::1, fe80::/10 link-local
    ip.is_unspecified() || ip.is_loopback() || (ip.segments()[0] & 0xffc0) == 0xfe80
}
