//! IPv4 prefix primitive (C1).
//!
//! Grounded in `original_source/pkg/IP/{ip,cidr,ipnet}.py`: a 32-bit address
//! paired with a prefix length, canonicalised at construction so that the
//! low `(32 - len)` bits of the stored address are always zero.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PrefixError {
    #[error("\"{0}\" is not a valid dotted-quad IPv4 address")]
    InvalidIp(String),

    #[error("\"{0}\" is not a valid prefix length")]
    InvalidLength(String),

    #[error("prefix length {0} is out of range [0, 32]")]
    LengthOutOfRange(u32),
}

/// An IPv4 network address plus a prefix length, canonicalised so that
/// `addr & mask() == addr` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Prefix {
    addr: u32,
    len: u8,
}

impl Ipv4Prefix {
    /// Build a prefix from an address and length, canonicalising the
    /// address to its network form.
    pub fn from_dotted(ip: Ipv4Addr, len: u32) -> Result<Self, PrefixError> {
        if len > 32 {
            return Err(PrefixError::LengthOutOfRange(len));
        }
        let len = len as u8;
        let mask = mask_for(len);
        Ok(Self {
            addr: u32::from(ip) & mask,
            len,
        })
    }

    /// Parse both the address and the length from strings, as produced by
    /// a zone file's first two CSV fields.
    pub fn from_strings(ip_str: &str, len_str: &str) -> Result<Self, PrefixError> {
        let ip = Ipv4Addr::from_str(ip_str).map_err(|_| PrefixError::InvalidIp(ip_str.to_string()))?;
        let len: u32 = len_str
            .parse()
            .map_err(|_| PrefixError::InvalidLength(len_str.to_string()))?;
        Self::from_dotted(ip, len)
    }

    /// A `/32` prefix around a single address.
    pub fn from_addr(ip: Ipv4Addr) -> Self {
        Self {
            addr: u32::from(ip),
            len: 32,
        }
    }

    pub fn raw_len(&self) -> u8 {
        self.len
    }

    pub fn network_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.addr)
    }

    fn mask(&self) -> u32 {
        mask_for(self.len)
    }

    /// `includes(self, x)`: does this prefix's block contain address `x`?
    pub fn includes(&self, addr: Ipv4Addr) -> bool {
        (u32::from(addr) & self.mask()) == self.addr
    }

    pub fn identical(&self, other: &Self) -> bool {
        self.addr == other.addr && self.len == other.len
    }

    /// `subsetOf(self, other)`: is `self`'s block contained within `other`'s?
    pub fn subset_of(&self, other: &Self) -> bool {
        other.includes(self.network_addr()) && self.len >= other.len
    }
}

fn mask_for(len: u8) -> u32 {
    if len == 0 {
        0
    } else {
        (0xFFFF_FFFFu32) << (32 - len as u32)
    }
}

impl fmt::Display for Ipv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network_addr(), self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalises_on_construction() {
        let p = Ipv4Prefix::from_dotted(Ipv4Addr::new(10, 1, 2, 3), 8).unwrap();
        assert_eq!(p.to_string(), "10.0.0.0/8");
    }

    #[test]
    fn zero_length_has_zero_mask() {
        let p = Ipv4Prefix::from_dotted(Ipv4Addr::new(1, 2, 3, 4), 0).unwrap();
        assert_eq!(p.to_string(), "0.0.0.0/0");
        assert!(p.includes(Ipv4Addr::new(255, 255, 255, 255)));
    }

    #[test]
    fn slash_32_is_exact() {
        let p = Ipv4Prefix::from_addr(Ipv4Addr::new(192, 168, 1, 1));
        assert!(p.includes(Ipv4Addr::new(192, 168, 1, 1)));
        assert!(!p.includes(Ipv4Addr::new(192, 168, 1, 2)));
    }

    #[test]
    fn includes_identical_subset_relations() {
        let wide = Ipv4Prefix::from_strings("10.0.0.0", "8").unwrap();
        let narrow = Ipv4Prefix::from_strings("10.1.0.0", "16").unwrap();
        assert!(narrow.subset_of(&wide));
        assert!(!wide.subset_of(&narrow));
        assert!(wide.identical(&Ipv4Prefix::from_strings("10.0.0.0", "8").unwrap()));
        // identical implies subsetOf in both directions
        let a = Ipv4Prefix::from_strings("10.0.0.0", "8").unwrap();
        let b = Ipv4Prefix::from_strings("10.0.0.0", "8").unwrap();
        assert!(a.subset_of(&b) && b.subset_of(&a));
    }

    #[test]
    fn rejects_bad_ip() {
        assert_eq!(
            Ipv4Prefix::from_strings("10.0.0.256", "8"),
            Err(PrefixError::InvalidIp("10.0.0.256".to_string()))
        );
        assert_eq!(
            Ipv4Prefix::from_strings("not-an-ip", "8"),
            Err(PrefixError::InvalidIp("not-an-ip".to_string()))
        );
    }

    #[test]
    fn rejects_bad_length() {
        assert_eq!(
            Ipv4Prefix::from_strings("10.0.0.0", "33"),
            Err(PrefixError::LengthOutOfRange(33))
        );
        assert_eq!(
            Ipv4Prefix::from_strings("10.0.0.0", "abc"),
            Err(PrefixError::InvalidLength("abc".to_string()))
        );
    }

    #[test]
    fn canonical_round_trip() {
        // Property 8: Prefix(N, L).toString parsed back yields an identical prefix.
        let original = Ipv4Prefix::from_strings("172.16.5.9", "12").unwrap();
        let s = original.to_string();
        let (ip_part, len_part) = s.split_once('/').unwrap();
        let parsed = Ipv4Prefix::from_strings(ip_part, len_part).unwrap();
        assert!(original.identical(&parsed));
    }
}
