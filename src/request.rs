//! # IID-Request Codec - Authorization/Options Sub-Protocol
//!
//! ## Purpose
//!
//! Parses and formats the companion header value carrying an authorization
//! key and single-character option flags:
//! `empty | key=<value> [options=<flags>]`. The grammar is independent from
//! the call-graph grammar but shares its philosophy: whitespace/quote-aware
//! tokenizing, total-function parsing, and a canonical re-serialization with
//! deterministic (lexicographically sorted) option order.
//!
//! ## Tokenization
//!
//! The value splits on whitespace, except inside a matched quote pair. Any
//! character with the Unicode `Quotation_Mark` property opens a quote and the
//! same character closes it; everything in between, spaces included, is
//! literal. Quote characters themselves stay in the token verbatim, so
//! `key="a b"` yields the key `"a b"` with the quotes kept.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use crate::constants::X_INSTANCE_ID;

/// Sentinel key meaning "no authorization key present"
const EMPTY_KEY: &str = "empty";

/// Characters with the Unicode `Quotation_Mark` property (Unicode 15.0)
const QUOTATION_MARKS: &[char] = &[
    '\u{0022}', '\u{0027}', '\u{00AB}', '\u{00BB}', '\u{2018}', '\u{2019}', '\u{201A}',
    '\u{201B}', '\u{201C}', '\u{201D}', '\u{201E}', '\u{201F}', '\u{2039}', '\u{203A}',
    '\u{2E42}', '\u{300C}', '\u{300D}', '\u{300E}', '\u{300F}', '\u{301D}', '\u{301E}',
    '\u{301F}', '\u{FE41}', '\u{FE42}', '\u{FE43}', '\u{FE44}', '\u{FF02}', '\u{FF07}',
    '\u{FF62}', '\u{FF63}',
];

fn is_quotation_mark(ch: char) -> bool {
    QUOTATION_MARKS.contains(&ch)
}

/// Single option flag of the iid-request sub-protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IidOption {
    command: char,
}

impl IidOption {
    /// Create an option flag for a single command character
    pub fn new(command: char) -> Self {
        Self { command }
    }

    /// The command character this flag stands for
    pub fn command(&self) -> char {
        self.command
    }
}

/// Authorization key plus option flags of the iid-request header value
///
/// The absent key and the literal key `"empty"` are indistinguishable in
/// canonical output; both render as `empty`. Options live in a sorted map so
/// the canonical form is deterministic regardless of parse order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IidRequest {
    key: String,
    options: BTreeMap<char, IidOption>,
}

impl Default for IidRequest {
    fn default() -> Self {
        Self {
            key: EMPTY_KEY.to_owned(),
            options: BTreeMap::new(),
        }
    }
}

/// Split on whitespace, but not inside a matched quote pair.
///
/// A "current open quote" state machine: entering a quotation mark sets the
/// active quote character, the same character closes it, and every character
/// in between is literal. Empty tokens are dropped. An unmatched quote simply
/// keeps the rest of the input in one token.
fn tokenize(input: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut active_quote: Option<char> = None;
    let mut start: Option<usize> = None;

    for (pos, ch) in input.char_indices() {
        let is_separator = match active_quote {
            Some(quote) if ch == quote => {
                active_quote = None;
                false
            }
            Some(_) => false,
            None if is_quotation_mark(ch) => {
                active_quote = Some(ch);
                false
            }
            None => ch.is_whitespace(),
        };

        if is_separator {
            if let Some(s) = start.take() {
                tokens.push(&input[s..pos]);
            }
        } else if start.is_none() {
            start = Some(pos);
        }
    }
    if let Some(s) = start {
        tokens.push(&input[s..]);
    }

    tokens
}

/// Expand an `options=` value into one flag per character; duplicates collapse
fn parse_options(flags: &str) -> BTreeMap<char, IidOption> {
    flags.chars().map(|ch| (ch, IidOption::new(ch))).collect()
}

impl IidRequest {
    /// Create a request with no key and no options
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an iid-request header value.
    ///
    /// Total function: unknown tokens are ignored, later tokens of the same
    /// kind overwrite earlier ones, and any input yields a value.
    pub fn parse(value: &str) -> Self {
        let mut request = Self::default();

        for token in tokenize(value) {
            let (kind, payload) = token.split_once('=').unwrap_or((token, ""));
            match kind {
                EMPTY_KEY => request.set_auth(EMPTY_KEY),
                "key" => request.set_auth(payload),
                "options" => request.options = parse_options(payload),
                _ => trace!(token, "ignoring unknown iid-request token"),
            }
        }

        request
    }

    /// Set the authorization key verbatim; the empty string resets to the
    /// "no key" sentinel
    pub fn set_auth(&mut self, key: &str) {
        if key.is_empty() {
            self.key = EMPTY_KEY.to_owned();
        } else {
            self.key = key.to_owned();
        }
    }

    /// The authorization key value as stored
    pub fn auth(&self) -> &str {
        &self.key
    }

    /// True if a real key is present (not absent, not the sentinel)
    pub fn has_key(&self) -> bool {
        self.key != EMPTY_KEY && !self.key.is_empty()
    }

    /// The option flags, keyed and sorted by command character
    pub fn options(&self) -> &BTreeMap<char, IidOption> {
        &self.options
    }

    /// True if any option flags are set
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// Set a single option flag
    pub fn set_option(&mut self, option: IidOption) {
        self.options.insert(option.command(), option);
    }

    /// The full header line: header name, `": "`, canonical value
    pub fn header(&self) -> String {
        format!("{X_INSTANCE_ID}: {self}")
    }
}

impl fmt::Display for IidRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_key() {
            write!(f, "key={}", self.key)?;
        } else {
            f.write_str(EMPTY_KEY)?;
        }
        if !self.options.is_empty() {
            f.write_str(" options=")?;
            for command in self.options.keys() {
                write!(f, "{command}")?;
            }
        }
        Ok(())
    }
}

impl Serialize for IidRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IidRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}
