/*!
error module defines the error types used in bgpkit-filter.
*/
use num_enum::{TryFromPrimitive, TryFromPrimitiveError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BgpFilterError {
    /// The backing storage of a prefix set could not be allocated.
    ///
    /// ## Occurs during:
    ///  - Creating a prefix set with an initial capacity
    ///  - Allocation-checked insertion into a prefix set
    #[error("unable to allocate prefix set storage for {requested} entries")]
    AllocationFailure { requested: usize },
    /// The string is neither a valid IPv4 nor a valid IPv6 address.
    ///
    /// ## Occurs during:
    ///  - Parsing of addresses and prefixes
    ///  - Validating the value of a prefix filter term
    #[error("invalid address syntax: {0}")]
    InvalidAddressSyntax(String),
    /// This error represents a [ipnet::PrefixLenError] error. It occurs if a mask length is
    /// larger than the length of the address it is being applied to.
    ///
    /// ## Occurs during:
    ///  - Parsing of prefixes
    #[error("invalid network prefix mask")]
    InvalidPrefixLength(#[from] ipnet::PrefixLenError),
    /// The filter string could not be parsed. `token` is the offending input token, or an empty
    /// string when the input ended prematurely.
    ///
    /// ## Occurs during:
    ///  - Parsing of filter strings
    #[error("malformed filter expression at '{token}': {reason}")]
    MalformedFilterExpression { token: String, reason: &'static str },
    /// A keyword or qualifier given to the filter parser builder cannot be used as a token.
    #[error("invalid filter keyword '{0}'")]
    InvalidKeyword(String),
    /// An address family index, version or AFI number outside of the known families.
    ///
    /// ## Occurs during:
    ///  - Checked address family conversions on untrusted input
    #[error("unknown address family value {value} for {type_name}")]
    UnreachableFamilyTag { type_name: &'static str, value: u64 },
}

impl BgpFilterError {
    pub(crate) fn malformed(token: &str, reason: &'static str) -> Self {
        BgpFilterError::MalformedFilterExpression {
            token: token.to_string(),
            reason,
        }
    }
}

impl<T> From<TryFromPrimitiveError<T>> for BgpFilterError
where
    T: TryFromPrimitive,
    T::Primitive: Into<u64>,
{
    #[inline]
    fn from(value: TryFromPrimitiveError<T>) -> Self {
        BgpFilterError::UnreachableFamilyTag {
            type_name: T::NAME,
            value: value.number.into(),
        }
    }
}
