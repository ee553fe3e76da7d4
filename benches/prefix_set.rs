use bgpkit_filter::models::{AddrUtils, Ipv4PrefixSet, Ipv6PrefixSet, PrefixKey, PrefixStorageSet};
use bgpkit_filter::parse_filter;
use criterion::{criterion_group, criterion_main, Criterion};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::hint::black_box;
use std::net::{Ipv4Addr, Ipv6Addr};

const PREFIX_COUNT: u32 = 100_000;

fn ipv4_prefixes() -> Vec<Ipv4Net> {
    (0..PREFIX_COUNT)
        .filter_map(|i| Ipv4Net::new(Ipv4Addr::from(i << 8), 24).ok())
        .collect()
}

fn ipv6_prefixes() -> Vec<Ipv6Net> {
    (0..PREFIX_COUNT)
        .map(|i| Ipv6Addr::from((0x2001_0db8u128 << 96) | ((i as u128) << 80)))
        .filter_map(|addr| Ipv6Net::new(addr, 48).ok())
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let v4 = ipv4_prefixes();
    let v6 = ipv6_prefixes();
    let mixed: Vec<IpNet> = v4
        .iter()
        .map(|p| IpNet::V4(*p))
        .chain(v6.iter().map(|p| IpNet::V6(*p)))
        .collect();

    c.bench_function("address hash", |b| {
        b.iter(|| {
            let mut acc = 0u64;
            for prefix in &v6 {
                acc ^= black_box(prefix.addr()).addr_hash();
            }
            acc
        })
    });

    c.bench_function("ipv4 prefix set insert", |b| {
        let mut set = Ipv4PrefixSet::new();
        b.iter(|| {
            set.reset();
            for prefix in &v4 {
                set.insert(black_box(*prefix));
            }
        })
    });

    c.bench_function("ipv6 prefix set insert", |b| {
        let mut set = Ipv6PrefixSet::new();
        b.iter(|| {
            set.reset();
            for prefix in &v6 {
                set.insert(black_box(*prefix));
            }
        })
    });

    c.bench_function("mixed prefix set insert masked", |b| {
        let mut set = PrefixStorageSet::new();
        b.iter(|| {
            set.reset();
            for prefix in &mixed {
                set.insert(black_box(prefix.masked()));
            }
        })
    });

    c.bench_function("filter parse", |b| {
        b.iter(|| {
            parse_filter(black_box(
                r#"collector rrc00 and prefix more 192.0.2.0/24 and community "64500:100""#,
            ))
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
