/*!
Parsers turning user-supplied strings into filter structures.
*/
pub mod filter;

pub use filter::{parse_filter, FilterParser, ParserState};
