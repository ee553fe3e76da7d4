//! Parses filter strings end to end and deduplicates the prefixes they carry.
use bgpkit_filter::models::{
    filter_to_string, Afi, FilterType, Ipv4PrefixSet, Ipv6PrefixSet, PrefixKey, PrefixMatch,
    PrefixStorageSet,
};
use bgpkit_filter::{parse_filter, BgpFilterError, FilterParser};
use ipnet::IpNet;

const FILTER: &str = r#"project routeviews and collector route-views.sg and type updates
    and prefix more 192.0.2.0/24 and prefix exact 192.0.2.1/24 and prefix less 2001:db8:1::/48
    and peer 64500 and origin-asn 64501 and community "64500:*" and aspath "_64500_ 6450[0-9]$"
    and ipversion 4 and elemtype announcements"#;

#[test]
fn parse_full_filter() {
    let items = parse_filter(FILTER).unwrap();
    assert_eq!(items.len(), 12);

    let terms: Vec<FilterType> = items.iter().map(|i| i.term()).collect();
    assert_eq!(
        terms,
        vec![
            FilterType::Project,
            FilterType::Collector,
            FilterType::RecordType,
            FilterType::Prefix(PrefixMatch::More),
            FilterType::Prefix(PrefixMatch::Exact),
            FilterType::Prefix(PrefixMatch::Less),
            FilterType::PeerAsn,
            FilterType::OriginAsn,
            FilterType::Community,
            FilterType::AsPath,
            FilterType::IpVersion,
            FilterType::ElemType,
        ]
    );
    assert_eq!(items[9].value(), "_64500_ 6450[0-9]$");

    // the normalized form parses back to the same items
    let normalized = filter_to_string(&items);
    assert_eq!(parse_filter(normalized.as_str()).unwrap(), items);
}

#[test]
fn deduplicate_filter_prefixes() {
    let items = parse_filter(FILTER).unwrap();
    let prefixes: Vec<IpNet> = items.iter().filter_map(|i| i.prefix()).collect();
    assert_eq!(prefixes.len(), 3);

    let mut all = PrefixStorageSet::new();
    let mut v4 = Ipv4PrefixSet::new();
    let mut v6 = Ipv6PrefixSet::new();
    for prefix in &prefixes {
        all.insert(prefix.masked());
        match prefix.masked() {
            IpNet::V4(net) => v4.insert(net),
            IpNet::V6(net) => v6.insert(net),
        };
    }
    // 192.0.2.0/24 and 192.0.2.1/24 are the same prefix once masked
    assert_eq!(all.len(), 2);
    assert_eq!(v4.len(), 1);
    assert_eq!(v6.len(), 1);

    let families: Vec<Afi> = prefixes.iter().map(Afi::from).collect();
    assert_eq!(families, vec![Afi::Ipv4, Afi::Ipv4, Afi::Ipv6]);
}

#[test]
fn reject_whole_filter() {
    let parser = FilterParser::new().disable_warnings();
    let result = parser.parse("peer 64500 and prefix 192.0.2.0/24 and prefix 192.0.2.300/24");
    assert!(matches!(result, Err(BgpFilterError::InvalidAddressSyntax(_))));

    let result = parser.parse("peer 64500 and unknown 1");
    assert!(matches!(
        result,
        Err(BgpFilterError::MalformedFilterExpression { .. })
    ));
}
