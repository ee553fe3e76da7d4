/*!
## Filter strings

A filter string is a sequence of clauses joined by `and`:

```text
<term> [<qualifier>] <value> [and <term> [<qualifier>] <value> ...]
```

The default terms are (aliases in parentheses):
- `project` (`proj`) -- data provider project
- `collector` (`coll`) -- route collector name
- `router` (`rout`) -- router name
- `type` -- dump type, `ribs` or `updates`
- `peer` -- peer AS number
- `origin` (`origin-asn`) -- origin AS number
- `prefix` (`pref`) -- network prefix, with an optional qualifier `any`, `more`, `less` or `exact`;
  `more` is used when the qualifier is omitted
- `community` (`comm`) -- BGP community
- `aspath` (`path`) -- AS path regular expression
- `ipversion` (`ipv`) -- `4` or `6`
- `elemtype` -- element type, e.g. `announcements` or `withdrawals`
- `interval` -- time interval

Values are either a single word or a double-quoted string that may contain whitespace. The `and`
between clauses may be left out. Prefix values must be valid `address/length` prefixes; all other
values are kept as written.

Parsing is all or nothing: any malformed clause rejects the whole filter.

### Example

```rust
use bgpkit_filter::models::{FilterType, PrefixMatch};
use bgpkit_filter::FilterParser;

let parser = FilterParser::new();
let items = parser
    .parse(r#"prefix exact 192.0.2.0/24 and aspath "^64500 .*""#)
    .unwrap();
assert_eq!(items.len(), 2);
assert_eq!(items[0].term(), FilterType::Prefix(PrefixMatch::Exact));
assert_eq!(items[1].value(), "^64500 .*");

assert!(parser.parse("prefix 192.0.2.0/24 and").is_err());
```
*/
use crate::error::BgpFilterError;
use crate::models::{FilterItem, FilterType, PrefixMatch};
use log::{debug, trace, warn};
use std::collections::HashMap;

const CONNECTOR: &str = "and";

const DEFAULT_TERMS: &[(&str, FilterType)] = &[
    ("project", FilterType::Project),
    ("proj", FilterType::Project),
    ("collector", FilterType::Collector),
    ("coll", FilterType::Collector),
    ("router", FilterType::Router),
    ("rout", FilterType::Router),
    ("type", FilterType::RecordType),
    ("peer", FilterType::PeerAsn),
    ("origin", FilterType::OriginAsn),
    ("origin-asn", FilterType::OriginAsn),
    ("prefix", FilterType::Prefix(PrefixMatch::More)),
    ("pref", FilterType::Prefix(PrefixMatch::More)),
    ("community", FilterType::Community),
    ("comm", FilterType::Community),
    ("aspath", FilterType::AsPath),
    ("path", FilterType::AsPath),
    ("ipversion", FilterType::IpVersion),
    ("ipv", FilterType::IpVersion),
    ("elemtype", FilterType::ElemType),
    ("interval", FilterType::TimeInterval),
];

const DEFAULT_PREFIX_QUALIFIERS: &[(&str, PrefixMatch)] = &[
    ("any", PrefixMatch::Any),
    ("more", PrefixMatch::More),
    ("less", PrefixMatch::Less),
    ("exact", PrefixMatch::Exact),
];

/// States of the filter-string state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Fail,
    /// expecting a term keyword
    Term,
    /// optional qualifier after a prefix term
    PrefixExt,
    /// expecting a value
    Value,
    /// inside a double-quoted value
    QuotedValue,
    /// a value has been read and the clause is complete
    EndValue,
}

/// Filter-string parser holding the term and qualifier vocabulary.
#[derive(Debug, Clone)]
pub struct FilterParser {
    terms: HashMap<String, FilterType>,
    prefix_qualifiers: HashMap<String, PrefixMatch>,
    warnings: bool,
}

impl Default for FilterParser {
    fn default() -> Self {
        FilterParser::new()
    }
}

fn check_keyword(keyword: &str) -> Result<(), BgpFilterError> {
    if keyword.is_empty()
        || keyword == CONNECTOR
        || keyword.contains(|c: char| c.is_whitespace() || c == '"')
    {
        return Err(BgpFilterError::InvalidKeyword(keyword.to_string()));
    }
    Ok(())
}

impl FilterParser {
    /// Create a parser with the default vocabulary.
    pub fn new() -> FilterParser {
        FilterParser {
            terms: DEFAULT_TERMS
                .iter()
                .map(|(k, t)| (k.to_string(), *t))
                .collect(),
            prefix_qualifiers: DEFAULT_PREFIX_QUALIFIERS
                .iter()
                .map(|(k, m)| (k.to_string(), *m))
                .collect(),
            warnings: true,
        }
    }

    /// Add (or redefine) a term keyword.
    ///
    /// For prefix terms the given match type is used when the qualifier is omitted.
    pub fn add_term(mut self, keyword: &str, term: FilterType) -> Result<Self, BgpFilterError> {
        check_keyword(keyword)?;
        self.terms.insert(keyword.to_string(), term);
        Ok(self)
    }

    /// Add (or redefine) a prefix qualifier word.
    pub fn add_prefix_qualifier(
        mut self,
        word: &str,
        prefix_match: PrefixMatch,
    ) -> Result<Self, BgpFilterError> {
        check_keyword(word)?;
        self.prefix_qualifiers.insert(word.to_string(), prefix_match);
        Ok(self)
    }

    /// Do not log a warning for rejected filter strings.
    pub fn disable_warnings(self) -> Self {
        FilterParser {
            warnings: false,
            ..self
        }
    }

    /// Parse a filter string into its clauses, in input order.
    ///
    /// An empty (or all-whitespace) string yields an empty list.
    pub fn parse(&self, input: &str) -> Result<Vec<FilterItem>, BgpFilterError> {
        let result = FilterStateMachine::new(self, input).run();
        if let Err(e) = &result {
            if self.warnings {
                warn!("rejecting filter '{}': {}", input, e);
            }
        }
        result
    }
}

/// Parse a filter string with the default vocabulary.
pub fn parse_filter(input: &str) -> Result<Vec<FilterItem>, BgpFilterError> {
    FilterParser::new().parse(input)
}

struct FilterStateMachine<'a> {
    vocabulary: &'a FilterParser,
    input: &'a str,
    pos: usize,
    state: ParserState,
    term: Option<FilterType>,
    value: String,
    after_connector: bool,
    items: Vec<FilterItem>,
}

type Transition = Result<Option<ParserState>, BgpFilterError>;

impl<'a> FilterStateMachine<'a> {
    fn new(vocabulary: &'a FilterParser, input: &'a str) -> Self {
        FilterStateMachine {
            vocabulary,
            input,
            pos: 0,
            state: ParserState::Term,
            term: None,
            value: String::new(),
            after_connector: false,
            items: vec![],
        }
    }

    fn run(mut self) -> Result<Vec<FilterItem>, BgpFilterError> {
        loop {
            let transition = match self.state {
                ParserState::Term => self.parse_term(),
                ParserState::PrefixExt => self.parse_prefix_ext(),
                ParserState::Value => self.parse_value(),
                ParserState::QuotedValue => self.parse_quoted_value(),
                ParserState::EndValue => self.end_value(),
                // a failed parse returns below and is never stepped again
                ParserState::Fail => unreachable!("filter parser stepped after failure"),
            };
            match transition {
                Ok(Some(state)) => self.state = state,
                Ok(None) => return Ok(self.items),
                Err(e) => {
                    debug!(
                        "filter parsing failed in state {:?} at offset {}: {}",
                        self.state, self.pos, e
                    );
                    self.state = ParserState::Fail;
                    return Err(e);
                }
            }
        }
    }

    #[inline]
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek_word(&self) -> &'a str {
        let rest = self.rest();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        &rest[..end]
    }

    fn take_word(&mut self) -> &'a str {
        let word = self.peek_word();
        self.pos += word.len();
        word
    }

    fn term_keyword(&self) -> &'static str {
        self.term.map(|t| t.keyword()).unwrap_or_default()
    }

    fn parse_term(&mut self) -> Transition {
        self.skip_whitespace();
        if self.rest().is_empty() {
            if self.after_connector {
                return Err(BgpFilterError::malformed(
                    CONNECTOR,
                    "expected filter term after connector",
                ));
            }
            return Ok(None);
        }

        let word = self.take_word();
        match self.vocabulary.terms.get(word) {
            Some(term) => {
                self.term = Some(*term);
                match term {
                    FilterType::Prefix(_) => Ok(Some(ParserState::PrefixExt)),
                    _ => Ok(Some(ParserState::Value)),
                }
            }
            None => Err(BgpFilterError::malformed(word, "unknown filter term")),
        }
    }

    /// Whether `word` (at the current position) is followed by another token belonging to the
    /// same clause, i.e. not the end of input, a connector or the next term.
    fn value_token_follows(&self, word: &str) -> bool {
        let next = self.rest()[word.len()..]
            .split_whitespace()
            .next()
            .unwrap_or_default();
        !next.is_empty() && next != CONNECTOR && !self.vocabulary.terms.contains_key(next)
    }

    fn parse_prefix_ext(&mut self) -> Transition {
        self.skip_whitespace();
        let word = self.peek_word();
        let qualified = match self.vocabulary.prefix_qualifiers.get(word) {
            Some(prefix_match) => {
                self.term = Some(FilterType::Prefix(*prefix_match));
                self.pos += word.len();
                self.skip_whitespace();
                true
            }
            None => false,
        };

        // prefixes always contain a '/', qualifiers never do
        let word = self.peek_word();
        if word.starts_with('"') || word.contains('/') || !self.value_token_follows(word) {
            return Ok(Some(ParserState::Value));
        }
        if qualified && self.vocabulary.prefix_qualifiers.contains_key(word) {
            return Err(BgpFilterError::malformed(word, "duplicate prefix qualifier"));
        }
        Err(BgpFilterError::malformed(word, "unknown prefix qualifier"))
    }

    fn parse_value(&mut self) -> Transition {
        self.skip_whitespace();
        let rest = self.rest();
        if rest.is_empty() {
            return Err(BgpFilterError::malformed(
                self.term_keyword(),
                "missing value for filter term",
            ));
        }
        if rest.starts_with('"') {
            self.pos += 1;
            return Ok(Some(ParserState::QuotedValue));
        }
        let word = self.take_word();
        self.value.push_str(word);
        Ok(Some(ParserState::EndValue))
    }

    fn parse_quoted_value(&mut self) -> Transition {
        let rest = self.rest();
        let Some(end) = rest.find('"') else {
            return Err(BgpFilterError::malformed(rest, "unterminated quoted value"));
        };
        self.value.push_str(&rest[..end]);
        self.pos += end + 1;

        if let Some(c) = self.rest().chars().next() {
            if !c.is_whitespace() {
                return Err(BgpFilterError::malformed(
                    self.peek_word(),
                    "expected whitespace after quoted value",
                ));
            }
        }
        Ok(Some(ParserState::EndValue))
    }

    fn end_value(&mut self) -> Transition {
        let Some(term) = self.term.take() else {
            return Err(BgpFilterError::malformed("", "value without filter term"));
        };
        let value = std::mem::take(&mut self.value);
        if value.is_empty() {
            return Err(BgpFilterError::malformed(
                term.keyword(),
                "empty value for filter term",
            ));
        }
        let item = FilterItem::new(term, value)?;
        trace!("parsed filter item: {}", item);
        self.items.push(item);
        self.after_connector = false;

        self.skip_whitespace();
        if self.rest().is_empty() {
            return Ok(None);
        }
        let word = self.peek_word();
        if word == CONNECTOR {
            self.pos += word.len();
            self.after_connector = true;
            return Ok(Some(ParserState::Term));
        }
        if self.vocabulary.terms.contains_key(word) {
            // implicit connector
            return Ok(Some(ParserState::Term));
        }
        Err(BgpFilterError::malformed(word, "expected 'and' or end of filter"))
    }
}
