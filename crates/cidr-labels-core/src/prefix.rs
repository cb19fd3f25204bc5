//! IP prefixes: an address plus a mask length, with host-bit masking.
//!
//! A prefix is *masked* when every bit below its length is zero. Prefixes
//! are not masked on construction; callers that need the canonical form
//! ask for it with [`Prefix::masked`].

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::{ParseError, PrefixLenError};

pub const IPV4_BITS: u8 = 32;
pub const IPV6_BITS: u8 = 128;

/// An address and a mask length no larger than the address's bit length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prefix {
    addr: IpAddr,
    len: u8,
}

impl Prefix {
    /// Build a prefix, rejecting lengths beyond the address family.
    pub fn new(addr: IpAddr, len: u8) -> Result<Self, PrefixLenError> {
        let max = bit_len(addr);
        if len > max {
            return Err(PrefixLenError { len, max });
        }
        Ok(Self { addr, len })
    }

    /// The full-length prefix of a single host.
    pub fn host(addr: IpAddr) -> Self {
        Self {
            addr,
            len: bit_len(addr),
        }
    }

    /// `addr` masked to `len`. Callers guarantee `len <= bit_len(addr)`.
    pub(crate) fn masked_from(addr: IpAddr, len: u8) -> Self {
        debug_assert!(len <= bit_len(addr));
        Self {
            addr: mask_addr(addr, len),
            len,
        }
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn bits(&self) -> u8 {
        self.len
    }

    /// Bit length of the address family: 32 or 128.
    pub fn bit_len(&self) -> u8 {
        bit_len(self.addr)
    }

    pub fn is_ipv4(&self) -> bool {
        self.addr.is_ipv4()
    }

    /// The same prefix with all host bits cleared.
    #[must_use]
    pub fn masked(&self) -> Self {
        Self::masked_from(self.addr, self.len)
    }

    pub fn is_masked(&self) -> bool {
        mask_addr(self.addr, self.len) == self.addr
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.len)
    }
}

impl FromStr for Prefix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::codec::parse_prefix(s)
    }
}

/// Bit length of the address family.
pub fn bit_len(addr: IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => IPV4_BITS,
        IpAddr::V6(_) => IPV6_BITS,
    }
}

/// Clear every bit of `addr` below `len`. Lengths past the family's bit
/// length leave the address unchanged.
pub fn mask_addr(addr: IpAddr, len: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let mask = match u32::from(len) {
                0 => 0,
                n if n >= u32::from(IPV4_BITS) => u32::MAX,
                n => u32::MAX << (u32::from(IPV4_BITS) - n),
            };
            IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask))
        }
        IpAddr::V6(v6) => {
            let mask = match u32::from(len) {
                0 => 0,
                n if n >= u32::from(IPV6_BITS) => u128::MAX,
                n => u128::MAX << (u32::from(IPV6_BITS) - n),
            };
            IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask))
        }
    }
}
