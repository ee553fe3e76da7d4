use crate::error::BgpFilterError;
use ipnet::IpNet;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::net::IpAddr;

/// AFI -- Address Family Identifier
///
/// <https://www.iana.org/assignments/address-family-numbers/address-family-numbers.xhtml>
///
/// Besides the IANA numbers, each family has a dense index (`0` for IPv4, `1` for IPv6) used to
/// address per-family arrays, and a conventional protocol version number (`4` or `6`).
#[derive(Debug, PartialEq, TryFromPrimitive, IntoPrimitive, Clone, Copy, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Afi {
    Ipv4 = 1,
    Ipv6 = 2,
}

/// Number of address families, i.e. the length of an array indexed by [Afi::index].
pub const AFI_COUNT: usize = 2;

impl Afi {
    /// Dense index of the family: `0` for IPv4, `1` for IPv6.
    #[inline]
    pub const fn index(self) -> u8 {
        match self {
            Afi::Ipv4 => 0,
            Afi::Ipv6 => 1,
        }
    }

    /// Protocol version number of the family: `4` or `6`.
    #[inline]
    pub const fn version(self) -> u8 {
        match self {
            Afi::Ipv4 => 4,
            Afi::Ipv6 => 6,
        }
    }

    /// Address width in bits.
    #[inline]
    pub const fn max_prefix_len(self) -> u8 {
        match self {
            Afi::Ipv4 => 32,
            Afi::Ipv6 => 128,
        }
    }

    /// Inverse of [Afi::index].
    ///
    /// # Panics
    ///
    /// Panics if `index` is not `0` or `1`. Use [Afi::try_from_index] on untrusted input.
    pub fn from_index(index: u8) -> Afi {
        match Afi::try_from_index(index) {
            Ok(afi) => afi,
            Err(_) => unreachable!("invalid address family index {}", index),
        }
    }

    pub fn try_from_index(index: u8) -> Result<Afi, BgpFilterError> {
        match index {
            0 => Ok(Afi::Ipv4),
            1 => Ok(Afi::Ipv6),
            _ => Err(BgpFilterError::UnreachableFamilyTag {
                type_name: "address family index",
                value: index as u64,
            }),
        }
    }

    /// Inverse of [Afi::version].
    ///
    /// # Panics
    ///
    /// Panics if `version` is not `4` or `6`. Use [Afi::try_from_version] on untrusted input.
    pub fn from_version(version: u8) -> Afi {
        match Afi::try_from_version(version) {
            Ok(afi) => afi,
            Err(_) => unreachable!("invalid IP version {}", version),
        }
    }

    pub fn try_from_version(version: u8) -> Result<Afi, BgpFilterError> {
        match version {
            4 => Ok(Afi::Ipv4),
            6 => Ok(Afi::Ipv6),
            _ => Err(BgpFilterError::UnreachableFamilyTag {
                type_name: "IP version",
                value: version as u64,
            }),
        }
    }
}

/// Maps a dense family index straight to the protocol version number (`0 -> 4`, `1 -> 6`).
///
/// # Panics
///
/// Panics if `index` is not a valid family index.
pub fn index_to_version(index: u8) -> u8 {
    Afi::from_index(index).version()
}

impl From<IpAddr> for Afi {
    #[inline]
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(_) => Afi::Ipv4,
            IpAddr::V6(_) => Afi::Ipv6,
        }
    }
}

impl From<&IpNet> for Afi {
    #[inline]
    fn from(value: &IpNet) -> Self {
        match value {
            IpNet::V4(_) => Afi::Ipv4,
            IpNet::V6(_) => Afi::Ipv6,
        }
    }
}
