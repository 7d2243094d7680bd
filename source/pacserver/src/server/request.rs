//! Route parsing (part of C7): turns the raw path and query string into a
//! query IP and prefix length, following the fallthrough chain from
//! `/{ip}/{len}` down to `/{ip}` down to `/`.
//!
//! Grounded in `original_source/internal/webserver.py` and
//! `pkg/IP/validPartialIP.py`.

use std::net::Ipv4Addr;
use std::sync::OnceLock;

use regex::Regex;

/// A parsed query: the (possibly zero-padded) dotted IP string and the
/// prefix length to resolve it at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub ip: String,
    pub prefix_len: u32,
}

fn partial_ip_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let octet = r"(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";
        Regex::new(&format!(r"^{octet}(\.{octet}){{0,3}}$")).unwrap()
    })
}

/// `^(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)(\.(same)){0,3}$` — 1 to 4 dotted
/// octets, no trailing dot.
pub fn is_valid_partial_ip(candidate: &str) -> bool {
    partial_ip_regex().is_match(candidate)
}

/// Pad a partial IP (1–4 octets) out to 4 octets with trailing zeroes, and
/// report the prefix length implied by how many octets were given.
fn pad_partial_ip(ip: &str) -> (String, u32) {
    let mut octets: Vec<&str> = ip.split('.').collect();
    let prefix_len = (octets.len() as u32) * 8;
    while octets.len() < 4 {
        octets.push("0");
    }
    (octets.join("."), prefix_len)
}

/// `GET /{ip}`: validate `ip`, falling through to the peer-address route
/// on failure.
pub fn parse_ip_route(ip: &str, peer: Ipv4Addr) -> ParsedQuery {
    if !is_valid_partial_ip(ip) {
        return parse_root_route(peer);
    }
    let (padded, prefix_len) = pad_partial_ip(ip);
    ParsedQuery { ip: padded, prefix_len }
}

/// `GET /{ip}/{len}`: an unparseable `len` falls through to `/{ip}`; an
/// invalid `ip` falls through from there to `/`.
pub fn parse_ip_len_route(ip: &str, len: &str, peer: Ipv4Addr) -> ParsedQuery {
    let Ok(prefix_len) = len.parse::<u32>() else {
        return parse_ip_route(ip, peer);
    };
    if !is_valid_partial_ip(ip) {
        return parse_ip_route(ip, peer);
    }
    let (padded, _) = pad_partial_ip(ip);
    ParsedQuery { ip: padded, prefix_len }
}

/// `GET /`: use the peer's address at length 32.
pub fn parse_root_route(peer: Ipv4Addr) -> ParsedQuery {
    ParsedQuery {
        ip: peer.to_string(),
        prefix_len: 32,
    }
}
