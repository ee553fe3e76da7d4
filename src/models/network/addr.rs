/*!
Hashing, comparison and masking of IP addresses.

Addresses are plain [std::net] values: [IpAddr] is the family-tagged form, [Ipv4Addr] and
[Ipv6Addr] are the family-specific ones. [AddrUtils] adds the operations prefix sets and filters
rely on, with bit-exact semantics shared by all three types.
*/
use crate::error::BgpFilterError;
use log::debug;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Thomas Wang's 32-bit integer hash, as used by khash.
#[inline]
pub const fn wang_hash(key: u32) -> u32 {
    let mut key = key;
    key = key.wrapping_add(!(key << 15));
    key ^= key >> 10;
    key = key.wrapping_add(key << 3);
    key ^= key >> 6;
    key = key.wrapping_add(!(key << 11));
    key ^= key >> 16;
    key
}

/// Parse an address string, trying IPv4 first and then IPv6.
///
/// # Example
///
/// ```rust
/// use bgpkit_filter::models::parse_addr;
/// use std::net::IpAddr;
///
/// let addr = parse_addr("192.0.2.1").unwrap();
/// assert!(matches!(addr, IpAddr::V4(_)));
/// assert!(parse_addr("2001:db8::1").unwrap().is_ipv6());
/// assert!(parse_addr("not-an-address").is_err());
/// ```
pub fn parse_addr(s: &str) -> Result<IpAddr, BgpFilterError> {
    if let Ok(addr) = s.parse::<Ipv4Addr>() {
        return Ok(IpAddr::V4(addr));
    }
    if let Ok(addr) = s.parse::<Ipv6Addr>() {
        return Ok(IpAddr::V6(addr));
    }
    debug!("could not parse address string {}", s);
    Err(BgpFilterError::InvalidAddressSyntax(s.to_string()))
}

/// Address operations used for prefix hashing, deduplication and masking.
pub trait AddrUtils: Copy {
    /// Hash used by prefix sets.
    ///
    /// IPv4 addresses mix their raw 32-bit value. IPv6 addresses only mix the most significant
    /// 64 bits: the two upper 32-bit words are XORed before mixing and the interface identifier
    /// half does not contribute.
    fn addr_hash(&self) -> u64;

    /// Family-aware equality. Addresses of different families are never equal.
    fn addr_equal(&self, other: &Self) -> bool;

    /// Zero every bit after the first `mask_len` bits, in place. Mask lengths at or beyond the
    /// address width leave the address untouched.
    fn mask(&mut self, mask_len: u8) -> &mut Self;

    /// Overwrite `self` with `src`, including its family.
    #[inline]
    fn copy_from(&mut self, src: &Self) {
        *self = *src;
    }
}

/// The in-memory word of an address in network byte order, as read by a little-endian host.
#[inline]
fn raw_word(bytes: [u8; 4]) -> u32 {
    u32::from_le_bytes(bytes)
}

impl AddrUtils for Ipv4Addr {
    #[inline]
    fn addr_hash(&self) -> u64 {
        wang_hash(raw_word(self.octets())) as u64
    }

    #[inline]
    fn addr_equal(&self, other: &Self) -> bool {
        u32::from(*self) == u32::from(*other)
    }

    fn mask(&mut self, mask_len: u8) -> &mut Self {
        if mask_len >= 32 {
            return self;
        }
        let bits = u32::from(*self) & !(u32::MAX >> mask_len);
        *self = Ipv4Addr::from(bits);
        self
    }
}

impl AddrUtils for Ipv6Addr {
    #[inline]
    fn addr_hash(&self) -> u64 {
        let o = self.octets();
        let hi = raw_word([o[0], o[1], o[2], o[3]]);
        let lo = raw_word([o[4], o[5], o[6], o[7]]);
        wang_hash(hi ^ lo) as u64
    }

    #[inline]
    fn addr_equal(&self, other: &Self) -> bool {
        self.octets() == other.octets()
    }

    fn mask(&mut self, mask_len: u8) -> &mut Self {
        if mask_len >= 128 {
            return self;
        }
        let mut octets = self.octets();
        let i = (mask_len / 8) as usize;
        // on a byte boundary the shift is 8 and the truncated mask clears byte `i`
        octets[i] &= (0xFFu16 << (8 - mask_len % 8)) as u8;
        octets[i + 1..].fill(0);
        *self = Ipv6Addr::from(octets);
        self
    }
}

impl AddrUtils for IpAddr {
    #[inline]
    fn addr_hash(&self) -> u64 {
        match self {
            IpAddr::V4(addr) => addr.addr_hash(),
            IpAddr::V6(addr) => addr.addr_hash(),
        }
    }

    #[inline]
    fn addr_equal(&self, other: &Self) -> bool {
        match (self, other) {
            (IpAddr::V4(a), IpAddr::V4(b)) => a.addr_equal(b),
            (IpAddr::V6(a), IpAddr::V6(b)) => a.addr_equal(b),
            _ => false,
        }
    }

    fn mask(&mut self, mask_len: u8) -> &mut Self {
        match self {
            IpAddr::V4(addr) => {
                addr.mask(mask_len);
            }
            IpAddr::V6(addr) => {
                addr.mask(mask_len);
            }
        }
        self
    }
}
