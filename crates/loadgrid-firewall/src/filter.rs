//! Exact-address and CIDR-range blocking.

use std::collections::HashSet;
use std::fmt;
use std::net::Ipv4Addr;

use tracing::debug;

use crate::error::{FilterError, FilterResult};

/// Parse dotted-quad text into a big-endian `u32`.
///
/// Octet `i` lands in bits `[24 - 8i, 31 - 8i]`, so `10.0.0.1` is
/// `0x0A00_0001`. Anything that is not four decimal octets is rejected.
pub fn parse_ipv4(text: &str) -> FilterResult<u32> {
    text.parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| FilterError::InvalidAddress(text.to_string()))
}

/// A network/mask pair. The network is stored pre-masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CidrRange {
    network: u32,
    mask: u32,
    prefix_len: u8,
}

impl CidrRange {
    pub fn new(address: u32, prefix_len: u8) -> FilterResult<Self> {
        if prefix_len > 32 {
            return Err(FilterError::InvalidPrefix {
                rule: format!("{}/{prefix_len}", Ipv4Addr::from(address)),
            });
        }
        let mask = prefix_mask(prefix_len);
        Ok(Self {
            network: address & mask,
            mask,
            prefix_len,
        })
    }

    /// Parse `a.b.c.d/len`.
    pub fn parse(rule: &str) -> FilterResult<Self> {
        let (addr, len) = rule
            .split_once('/')
            .ok_or_else(|| FilterError::InvalidPrefix {
                rule: rule.to_string(),
            })?;
        let address = parse_ipv4(addr.trim())?;
        let prefix_len = len
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|len| *len <= 32)
            .ok_or_else(|| FilterError::InvalidPrefix {
                rule: rule.to_string(),
            })?;
        Self::new(address, prefix_len)
    }

    pub fn contains(&self, address: u32) -> bool {
        address & self.mask == self.network
    }

    pub fn network(&self) -> u32 {
        self.network
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }
}

impl fmt::Display for CidrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.network), self.prefix_len)
    }
}

fn prefix_mask(prefix_len: u8) -> u32 {
    // A shift by 32 overflows, so /0 is special-cased to the empty mask.
    match prefix_len {
        0 => 0,
        n => u32::MAX << (32 - u32::from(n)),
    }
}

/// Gate in front of the balancer queue.
#[derive(Debug, Clone, Default)]
pub struct AdmissionFilter {
    exact: HashSet<u32>,
    ranges: Vec<CidrRange>,
}

impl AdmissionFilter {
    /// A filter that lets everything through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rule literals. Entries containing `/` are ranges,
    /// everything else is an exact address. Any malformed entry fails
    /// the whole build.
    pub fn from_rules<I, S>(rules: I) -> FilterResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::new();
        for rule in rules {
            let rule = rule.as_ref();
            if rule.contains('/') {
                filter.ranges.push(CidrRange::parse(rule)?);
            } else {
                filter.exact.insert(parse_ipv4(rule)?);
            }
        }
        debug!(
            exact = filter.exact.len(),
            ranges = filter.ranges.len(),
            "admission filter built"
        );
        Ok(filter)
    }

    /// Build from a comma-separated list such as `"10.0.0.0/8, 1.2.3.4"`.
    pub fn from_list(list: &str) -> FilterResult<Self> {
        Self::from_rules(list.split(',').map(str::trim).filter(|r| !r.is_empty()))
    }

    /// Whether `address` is denied. Malformed input is an error, never
    /// a silent "allowed".
    pub fn is_blocked(&self, address: &str) -> FilterResult<bool> {
        Ok(self.is_blocked_addr(parse_ipv4(address)?))
    }

    pub fn is_blocked_addr(&self, address: u32) -> bool {
        self.exact.contains(&address) || self.ranges.iter().any(|r| r.contains(address))
    }

    /// Add an exact address. Returns `true` if it was not already blocked
    /// by an exact rule.
    pub fn block_ip(&mut self, address: &str) -> FilterResult<bool> {
        Ok(self.exact.insert(parse_ipv4(address)?))
    }

    /// Remove an exact address. Ranges are untouched, so the address may
    /// still be blocked by one of them.
    pub fn unblock_ip(&mut self, address: &str) -> FilterResult<bool> {
        Ok(self.exact.remove(&parse_ipv4(address)?))
    }

    pub fn ranges(&self) -> &[CidrRange] {
        &self.ranges
    }

    pub fn exact_count(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.ranges.is_empty()
    }
}
