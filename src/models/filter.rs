/*!
Filter terms produced by the filter-string parser.

A parsed filter is an ordered list of [FilterItem]s, all of which must match (the clauses are
joined by `and`). The parser only checks the syntax of prefix values; every other value is kept as
written and interpreted by whoever evaluates the filter.
*/
use crate::error::BgpFilterError;
use crate::models::parse_prefix;
use ipnet::IpNet;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// How a prefix term compares a record's prefix against the filter prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PrefixMatch {
    /// the prefix itself, its more-specifics and its less-specifics
    Any,
    /// the prefix and its more-specifics
    More,
    /// the prefix and its less-specifics
    Less,
    /// the prefix only
    Exact,
}

impl PrefixMatch {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PrefixMatch::Any => "any",
            PrefixMatch::More => "more",
            PrefixMatch::Less => "less",
            PrefixMatch::Exact => "exact",
        }
    }
}

impl Display for PrefixMatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of a filter term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FilterType {
    Project,
    Collector,
    Router,
    /// dump type, e.g. `ribs` or `updates`
    RecordType,
    PeerAsn,
    OriginAsn,
    Prefix(PrefixMatch),
    Community,
    AsPath,
    IpVersion,
    /// element type, e.g. `announcements` or `withdrawals`
    ElemType,
    TimeInterval,
}

impl FilterType {
    #[inline]
    pub const fn is_prefix(&self) -> bool {
        matches!(self, FilterType::Prefix(_))
    }

    /// Canonical keyword of the term.
    pub const fn keyword(&self) -> &'static str {
        match self {
            FilterType::Project => "project",
            FilterType::Collector => "collector",
            FilterType::Router => "router",
            FilterType::RecordType => "type",
            FilterType::PeerAsn => "peer",
            FilterType::OriginAsn => "origin",
            FilterType::Prefix(_) => "prefix",
            FilterType::Community => "community",
            FilterType::AsPath => "aspath",
            FilterType::IpVersion => "ipversion",
            FilterType::ElemType => "elemtype",
            FilterType::TimeInterval => "interval",
        }
    }
}

impl Display for FilterType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterType::Prefix(m) => write!(f, "{} {}", self.keyword(), m),
            _ => write!(f, "{}", self.keyword()),
        }
    }
}

/// One clause of a filter: a term kind and its literal operand.
///
/// Items can only be built through [FilterItem::new] (or deserialized through the same check), so a
/// prefix term always carries a valid prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FilterItem {
    term: FilterType,
    value: String,
}

impl FilterItem {
    /// Create a filter item. Prefix terms must carry a valid `address/length` value.
    pub fn new(term: FilterType, value: String) -> Result<FilterItem, BgpFilterError> {
        if term.is_prefix() {
            parse_prefix(value.as_str())?;
        }
        Ok(FilterItem { term, value })
    }

    #[inline]
    pub fn term(&self) -> FilterType {
        self.term
    }

    #[inline]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// The parsed prefix of a prefix term, `None` for other terms.
    pub fn prefix(&self) -> Option<IpNet> {
        match self.term {
            FilterType::Prefix(_) => parse_prefix(self.value.as_str()).ok(),
            _ => None,
        }
    }
}

impl Display for FilterItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.value.is_empty() || self.value.contains(char::is_whitespace) {
            write!(f, "{} \"{}\"", self.term, self.value)
        } else {
            write!(f, "{} {}", self.term, self.value)
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct SerdeFilterItemRepr {
        term: FilterType,
        value: String,
    }

    impl<'de> Deserialize<'de> for FilterItem {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let repr = SerdeFilterItemRepr::deserialize(deserializer)?;
            FilterItem::new(repr.term, repr.value).map_err(serde::de::Error::custom)
        }
    }
}

/// Render a list of filter items back into a filter string.
///
/// ```rust
/// use bgpkit_filter::models::{filter_to_string, FilterItem, FilterType, PrefixMatch};
///
/// let items = vec![
///     FilterItem::new(FilterType::Prefix(PrefixMatch::Exact), "10.0.0.0/8".to_string()).unwrap(),
///     FilterItem::new(FilterType::Community, "65000:1".to_string()).unwrap(),
/// ];
/// assert_eq!(filter_to_string(&items), "prefix exact 10.0.0.0/8 and community 65000:1");
/// ```
pub fn filter_to_string(items: &[FilterItem]) -> String {
    items.iter().join(" and ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_validates_prefix() {
        let item = FilterItem::new(
            FilterType::Prefix(PrefixMatch::More),
            "192.0.2.0/24".to_string(),
        )
        .unwrap();
        assert_eq!(item.prefix(), Some(IpNet::from_str("192.0.2.0/24").unwrap()));

        assert!(matches!(
            FilterItem::new(FilterType::Prefix(PrefixMatch::Any), "bogus".to_string()),
            Err(BgpFilterError::InvalidAddressSyntax(_))
        ));

        // other terms are not interpreted
        let item = FilterItem::new(FilterType::PeerAsn, "bogus".to_string()).unwrap();
        assert_eq!(item.prefix(), None);
    }

    #[test]
    fn test_display() {
        let item = FilterItem::new(FilterType::AsPath, "^64500 .* 64501$".to_string()).unwrap();
        assert_eq!(item.to_string(), "aspath \"^64500 .* 64501$\"");

        let item = FilterItem::new(
            FilterType::Prefix(PrefixMatch::Less),
            "2001:db8::/48".to_string(),
        )
        .unwrap();
        assert_eq!(item.to_string(), "prefix less 2001:db8::/48");
        assert_eq!(FilterType::RecordType.to_string(), "type");
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_serde() {
        let item = FilterItem::new(FilterType::Community, "64500:100".to_string()).unwrap();
        let serialized = serde_json::to_string(&item).unwrap();
        assert_eq!(serialized, r#"{"term":"community","value":"64500:100"}"#);
        let deserialized: FilterItem = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, item);

        // prefix values are validated on the way in
        let invalid = r#"{"term":{"prefix":"more"},"value":"10.0.0.0/33"}"#;
        assert!(serde_json::from_str::<FilterItem>(invalid).is_err());
        let valid = r#"{"term":{"prefix":"more"},"value":"10.0.0.0/8"}"#;
        let item: FilterItem = serde_json::from_str(valid).unwrap();
        assert_eq!(item.term(), FilterType::Prefix(PrefixMatch::More));
        assert_eq!(item.value(), "10.0.0.0/8");

        let term = FilterType::Prefix(PrefixMatch::Exact);
        assert_eq!(
            serde_json::to_string(&term).unwrap(),
            r#"{"prefix":"exact"}"#
        );
    }
}
