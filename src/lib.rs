/*!
bgpkit-filter provides the addressing and filtering building blocks for BGP data processing
pipelines:

- **addresses and prefixes**: hashing, family-aware equality and in-place masking for
  [std::net::IpAddr], [std::net::Ipv4Addr] and [std::net::Ipv6Addr] ([models::AddrUtils]), and
  prefix parsing into [ipnet] types ([models::parse_prefix]);
- **prefix sets**: deduplicating sets of prefixes, either mixed-family ([models::PrefixStorageSet])
  or single-family ([models::Ipv4PrefixSet], [models::Ipv6PrefixSet]);
- **filter strings**: a small query language such as
  `prefix more 192.0.2.0/24 and community "64500:100"`, parsed into an ordered list of
  [models::FilterItem]s by [FilterParser].

# Examples

## Parse a filter string

```rust
use bgpkit_filter::models::FilterType;
use bgpkit_filter::parse_filter;

let items = parse_filter("collector rrc00 and peer 64500 and prefix exact 10.0.0.0/8").unwrap();
assert_eq!(items.len(), 3);
assert_eq!(items[1].term(), FilterType::PeerAsn);
assert_eq!(items[1].value(), "64500");
```

## Deduplicate prefixes

```rust
use bgpkit_filter::models::{PrefixKey, PrefixStorageSet};
use bgpkit_filter::parse_filter;

let items = parse_filter("prefix 10.0.0.1/8 and prefix 10.0.0.0/8 and prefix 2001:db8::/32").unwrap();

let mut set = PrefixStorageSet::new();
for prefix in items.iter().filter_map(|item| item.prefix()) {
    set.insert(prefix.masked());
}
assert_eq!(set.len(), 2);
```

## Mask an address

```rust
use bgpkit_filter::models::{parse_addr, AddrUtils};

let mut addr = parse_addr("2001:db8::1").unwrap();
addr.mask(16);
assert_eq!(addr.to_string(), "2001::");
```

# Logging

The crate logs through the [log] facade: rejected addresses and filter parsing failures at `debug`
level, rejected filter strings at `warn` level (see [FilterParser::disable_warnings]).
*/

pub mod error;
pub mod models;
pub mod parser;

pub use error::BgpFilterError;
pub use parser::{parse_filter, FilterParser};
