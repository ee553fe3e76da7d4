use crate::error::BgpFilterError;
use crate::models::{parse_addr, AddrUtils};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};

/// Hash and equality policy for prefix set keys.
///
/// Implemented for the three prefix shapes: [IpNet] (family-tagged), [Ipv4Net] and [Ipv6Net].
/// Both the address and the mask length take part in hashing and equality; host bits beyond the
/// mask are compared as stored, so callers that want canonical keys should use
/// [PrefixKey::masked] before inserting.
pub trait PrefixKey: Copy {
    fn prefix_hash(&self) -> u64;

    fn prefix_eq(&self, other: &Self) -> bool;

    /// Copy of the prefix with all host bits cleared.
    fn masked(&self) -> Self;
}

/// Combine an address hash with the mask length in the upper 32 bits.
#[inline]
const fn combine(addr_hash: u64, mask_len: u8) -> u64 {
    addr_hash | (mask_len as u64) << 32
}

impl PrefixKey for Ipv4Net {
    #[inline]
    fn prefix_hash(&self) -> u64 {
        combine(self.addr().addr_hash(), self.prefix_len())
    }

    #[inline]
    fn prefix_eq(&self, other: &Self) -> bool {
        self.prefix_len() == other.prefix_len() && self.addr().addr_equal(&other.addr())
    }

    fn masked(&self) -> Self {
        let mut addr = self.addr();
        addr.mask(self.prefix_len());
        Ipv4Net::new(addr, self.prefix_len()).unwrap_or(*self)
    }
}

impl PrefixKey for Ipv6Net {
    #[inline]
    fn prefix_hash(&self) -> u64 {
        combine(self.addr().addr_hash(), self.prefix_len())
    }

    #[inline]
    fn prefix_eq(&self, other: &Self) -> bool {
        self.prefix_len() == other.prefix_len() && self.addr().addr_equal(&other.addr())
    }

    fn masked(&self) -> Self {
        let mut addr = self.addr();
        addr.mask(self.prefix_len());
        Ipv6Net::new(addr, self.prefix_len()).unwrap_or(*self)
    }
}

impl PrefixKey for IpNet {
    #[inline]
    fn prefix_hash(&self) -> u64 {
        match self {
            IpNet::V4(net) => net.prefix_hash(),
            IpNet::V6(net) => net.prefix_hash(),
        }
    }

    #[inline]
    fn prefix_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (IpNet::V4(a), IpNet::V4(b)) => a.prefix_eq(b),
            (IpNet::V6(a), IpNet::V6(b)) => a.prefix_eq(b),
            _ => false,
        }
    }

    fn masked(&self) -> Self {
        match self {
            IpNet::V4(net) => IpNet::V4(net.masked()),
            IpNet::V6(net) => IpNet::V6(net.masked()),
        }
    }
}

/// Parse a prefix string in `address/length` form.
///
/// The address goes through [parse_addr], so IPv4 is tried before IPv6. Host bits are kept as
/// written.
///
/// # Example
///
/// ```rust
/// use bgpkit_filter::models::parse_prefix;
///
/// let prefix = parse_prefix("192.0.2.1/24").unwrap();
/// assert_eq!(prefix.to_string(), "192.0.2.1/24");
/// assert!(parse_prefix("192.0.2.0/33").is_err());
/// assert!(parse_prefix("192.0.2.0").is_err());
/// ```
pub fn parse_prefix(s: &str) -> Result<IpNet, BgpFilterError> {
    let (addr_str, len_str) = s
        .split_once('/')
        .ok_or_else(|| BgpFilterError::InvalidAddressSyntax(s.to_string()))?;
    let addr = parse_addr(addr_str)?;
    // digits only: `u8::from_str` would also take a leading '+'
    if len_str.is_empty() || !len_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BgpFilterError::InvalidAddressSyntax(s.to_string()));
    }
    let mask_len = len_str
        .parse::<u8>()
        .map_err(|_| BgpFilterError::InvalidAddressSyntax(s.to_string()))?;
    Ok(IpNet::new(addr, mask_len)?)
}
