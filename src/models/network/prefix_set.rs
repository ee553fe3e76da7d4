/*!
Sets of unique network prefixes.

[PrefixSet] is generic over its key shape through [PrefixKey], which supplies the hash and
equality functions. Three instantiations are provided:
- [PrefixStorageSet]: IPv4 and IPv6 prefixes mixed in one set
- [Ipv4PrefixSet]: IPv4 prefixes only
- [Ipv6PrefixSet]: IPv6 prefixes only

Prefixes are stored as given: `10.0.0.1/24` and `10.0.0.0/24` are different elements unless the
caller masks them first (see [PrefixKey::masked]).

### Example

```rust
use bgpkit_filter::models::{Ipv4PrefixSet, PrefixKey};
use ipnet::Ipv4Net;
use std::str::FromStr;

let mut set = Ipv4PrefixSet::new();
let prefix = Ipv4Net::from_str("10.0.0.0/24").unwrap();
assert!(set.insert(prefix));
assert!(!set.insert(prefix));
assert!(set.insert(Ipv4Net::from_str("10.0.0.0/25").unwrap()));
assert_eq!(set.len(), 2);

set.reset();
assert!(set.is_empty());
assert!(set.insert(prefix));
```
*/
use crate::error::BgpFilterError;
use crate::models::PrefixKey;
use hashbrown::hash_table::Entry;
use hashbrown::HashTable;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::fmt::{Debug, Formatter};

/// Set of IPv4 and IPv6 prefixes.
pub type PrefixStorageSet = PrefixSet<IpNet>;
/// Set of IPv4 prefixes.
pub type Ipv4PrefixSet = PrefixSet<Ipv4Net>;
/// Set of IPv6 prefixes.
pub type Ipv6PrefixSet = PrefixSet<Ipv6Net>;

/// Spread a key hash over the full 64 bits.
///
/// Key hashes keep their entropy in the low 32 bits while the table picks buckets from the low
/// bits and control tags from the top bits.
#[inline]
fn table_hash<K: PrefixKey>(key: &K) -> u64 {
    let hash = key.prefix_hash();
    (hash ^ (hash >> 32)).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

/// A set of unique prefixes of key shape `K`.
///
/// Hashing and equality come from `K`'s [PrefixKey] implementation. The set owns its storage;
/// dropping it releases the storage.
///
/// # Example
///
/// ```rust
/// use bgpkit_filter::models::{parse_prefix, PrefixStorageSet};
///
/// let mut set = PrefixStorageSet::new();
/// assert!(set.insert(parse_prefix("10.0.0.0/8").unwrap()));
/// assert!(!set.insert(parse_prefix("10.0.0.0/8").unwrap()));
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Clone)]
pub struct PrefixSet<K: PrefixKey> {
    table: HashTable<K>,
}

impl<K: PrefixKey> PrefixSet<K> {
    /// Create an empty set. No memory is allocated until the first insert.
    pub fn new() -> Self {
        PrefixSet {
            table: HashTable::new(),
        }
    }

    /// Create an empty set able to hold at least `capacity` prefixes without reallocating.
    pub fn with_capacity(capacity: usize) -> Result<Self, BgpFilterError> {
        let mut table = HashTable::new();
        table
            .try_reserve(capacity, table_hash::<K>)
            .map_err(|_| BgpFilterError::AllocationFailure {
                requested: capacity,
            })?;
        Ok(PrefixSet { table })
    }

    /// Insert a prefix. Returns `true` if it was newly added and `false` if an equal prefix was
    /// already present, in which case the set is unchanged.
    pub fn insert(&mut self, prefix: K) -> bool {
        let hash = table_hash(&prefix);
        match self
            .table
            .entry(hash, |k| k.prefix_eq(&prefix), table_hash::<K>)
        {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(prefix);
                true
            }
        }
    }

    /// Like [PrefixSet::insert], but reports an allocation failure instead of aborting when the
    /// table has to grow.
    pub fn try_insert(&mut self, prefix: K) -> Result<bool, BgpFilterError> {
        let hash = table_hash(&prefix);
        if self.table.find(hash, |k| k.prefix_eq(&prefix)).is_some() {
            return Ok(false);
        }
        self.table
            .try_reserve(1, table_hash::<K>)
            .map_err(|_| BgpFilterError::AllocationFailure {
                requested: self.table.len() + 1,
            })?;
        self.table.insert_unique(hash, prefix, table_hash::<K>);
        Ok(true)
    }

    pub fn contains(&self, prefix: &K) -> bool {
        self.table
            .find(table_hash(prefix), |k| k.prefix_eq(prefix))
            .is_some()
    }

    /// Remove all prefixes, keeping the allocated capacity.
    pub fn reset(&mut self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }
}

impl<K: PrefixKey> Default for PrefixSet<K> {
    fn default() -> Self {
        PrefixSet::new()
    }
}

// The element order is arbitrary, so only the size is shown.
impl<K: PrefixKey> Debug for PrefixSet<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixSet")
            .field("len", &self.table.len())
            .finish()
    }
}

impl<K: PrefixKey> Extend<K> for PrefixSet<K> {
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        for prefix in iter {
            self.insert(prefix);
        }
    }
}

impl<K: PrefixKey> FromIterator<K> for PrefixSet<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut set = PrefixSet::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    #[test]
    fn test_insert_twice() {
        let mut set = PrefixStorageSet::new();
        let prefix = IpNet::from_str("192.0.2.0/24").unwrap();
        assert!(set.insert(prefix));
        assert!(!set.insert(prefix));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&prefix));
    }

    #[test]
    fn test_mask_len_distinguishes() {
        let mut set = Ipv4PrefixSet::new();
        assert!(set.insert(Ipv4Net::from_str("10.0.0.0/24").unwrap()));
        assert!(set.insert(Ipv4Net::from_str("10.0.0.0/25").unwrap()));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_no_auto_mask() {
        let mut set = PrefixStorageSet::new();
        let host = IpNet::from_str("10.0.0.1/24").unwrap();
        let net = IpNet::from_str("10.0.0.0/24").unwrap();
        assert!(set.insert(host));
        assert!(set.insert(net));
        assert!(!set.insert(host.masked()));
    }

    #[test]
    fn test_mixed_families() {
        let mut set = PrefixStorageSet::new();
        assert!(set.insert(IpNet::from_str("0.0.0.0/0").unwrap()));
        assert!(set.insert(IpNet::from_str("::/0").unwrap()));
        assert!(!set.insert(IpNet::from_str("::/0").unwrap()));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_ipv6_low_bits_collide_but_stay_distinct() {
        // identical top 64 bits hash identically; equality still tells them apart
        let mut set = Ipv6PrefixSet::new();
        for i in 0..64u16 {
            let prefix = Ipv6Net::from_str(&format!("2001:db8::{:x}/128", i)).unwrap();
            assert!(set.insert(prefix));
        }
        assert_eq!(set.len(), 64);
        assert!(set.contains(&Ipv6Net::from_str("2001:db8::3f/128").unwrap()));
        assert!(!set.contains(&Ipv6Net::from_str("2001:db8::40/128").unwrap()));
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut set = Ipv4PrefixSet::with_capacity(100).unwrap();
        assert!(set.capacity() >= 100);
        for i in 0..100u32 {
            set.insert(Ipv4Net::new(Ipv4Addr::from(i), 32).unwrap());
        }
        let capacity = set.capacity();
        set.reset();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), capacity);

        let prefix = Ipv4Net::new(Ipv4Addr::from(7u32), 32).unwrap();
        assert!(!set.contains(&prefix));
        assert!(set.insert(prefix));
        assert!(!set.insert(prefix));
    }

    #[test]
    fn test_try_insert() {
        let mut set = Ipv6PrefixSet::new();
        let prefix = Ipv6Net::from_str("2001:db8::/32").unwrap();
        assert_eq!(set.try_insert(prefix), Ok(true));
        assert_eq!(set.try_insert(prefix), Ok(false));
    }

    #[test]
    fn test_allocation_failure() {
        assert!(matches!(
            Ipv4PrefixSet::with_capacity(usize::MAX),
            Err(BgpFilterError::AllocationFailure { .. })
        ));
    }

    #[test]
    fn test_collect_and_drop() {
        let set: PrefixStorageSet = ["10.0.0.0/8", "10.0.0.0/8", "2001:db8::/32"]
            .iter()
            .map(|s| IpNet::from_str(s).unwrap())
            .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(format!("{:?}", set), "PrefixSet { len: 2 }");
        drop(set);
    }
}
