//! Addresses, prefixes, address families and prefix sets.

mod addr;
mod afi;
mod prefix;
mod prefix_set;

pub use addr::*;
pub use afi::*;
pub use prefix::*;
pub use prefix_set::*;
