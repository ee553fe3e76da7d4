/*!
Data structures shared between the filter parser and its consumers.
*/
mod filter;
mod network;

pub use filter::*;
pub use network::*;
