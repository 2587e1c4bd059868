//! # Ciid Codec - Recursive Call-Graph Identifier
//!
//! ## Purpose
//!
//! Parses and formats the full call-graph grammar
//! `CIID := MIID [ "(" CIID ("+" CIID)* ")" ]`: one service instance
//! descriptor plus an ordered list of the downstream call graphs it invoked.
//! The in-memory shape is an owned tree; each node exclusively owns its
//! [`Miid`] and its children, so cycles cannot occur.
//!
//! ## Architecture Role
//!
//! ```text
//! inbound header → [Ciid::parse] → call-graph tree → CallStack mutation
//!                       ↓                                   ↓
//!                  Miid codec                        [Display] → outbound header
//!                  split_top_level
//! ```
//!
//! ## Failure Policy
//!
//! Structural damage (unbalanced parentheses, empty argument segments) does
//! not raise an error; the scan degrades to whatever partial miid and child
//! list it recovers, potentially an empty-rooted ciid. Callers detect failure
//! by checking [`Miid::is_empty`] on the root or by re-serializing and
//! comparing, which is exactly what the strict [`FromStr`] layer does.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseIdError;
use crate::miid::Miid;
use crate::splitter::split_top_level;
use crate::stack::CallStack;

/// Call-graph identifier: one [`Miid`] plus the ordered calls it made
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ciid {
    miid: Miid,
    calls: CallStack,
}

/// Separate the name part from the interior of the outermost paren group.
///
/// Left-to-right scan with a signed depth counter. Characters before the
/// first `(` belong to the name, including a stray `)` seen at depth zero.
/// The single outermost pair of parentheses is stripped; its entire interior,
/// nested parens included, is captured verbatim. Characters after the
/// outermost group closes are dropped.
fn separate_name_from_args(signature: &str) -> (String, String) {
    let mut name = String::new();
    let mut args = String::new();
    let mut in_args = false;
    let mut depth: i32 = 0;

    for ch in signature.chars() {
        if ch == '(' {
            depth += 1;
            in_args = true;
        }
        if ch == ')' {
            depth -= 1;
        }

        if !in_args {
            name.push(ch);
        } else if depth == 1 && ch != '(' {
            args.push(ch);
        } else if depth > 1 {
            args.push(ch);
        }
    }

    (name, args)
}

impl Ciid {
    /// Construct a leaf call graph from a miid
    pub fn new(miid: Miid) -> Self {
        Self {
            miid,
            calls: CallStack::new(),
        }
    }

    /// Parse a call graph from its wire form.
    ///
    /// Total function: recursion depth equals the nesting depth of the input
    /// and malformed input degrades instead of failing.
    pub fn parse(id: &str) -> Self {
        let (name, args) = separate_name_from_args(id);
        let mut ciid = Self::new(Miid::parse(&name));
        if !args.is_empty() {
            ciid.calls = split_top_level(&args).into_iter().map(Self::parse).collect();
        }
        ciid
    }

    /// The root service instance descriptor
    pub fn miid(&self) -> &Miid {
        &self.miid
    }

    /// The recorded downstream calls
    pub fn calls(&self) -> &CallStack {
        &self.calls
    }

    /// Mutable access to the recorded downstream calls
    pub fn calls_mut(&mut self) -> &mut CallStack {
        &mut self.calls
    }

    /// Replace the whole call stack
    pub fn set_calls(&mut self, calls: CallStack) {
        self.calls = calls;
    }

    /// Drop all recorded calls
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Record an outbound call at the end of the stack
    pub fn push_call(&mut self, call: Ciid) {
        self.calls.push(call);
    }

    /// Remove and return the most recent call, `None` when empty
    pub fn pop_call(&mut self) -> Option<Ciid> {
        self.calls.pop()
    }

    /// Overwrite the root miid's epoch with the seconds elapsed since
    /// `start_time`; children are untouched
    pub fn set_epoch(&mut self, start_time: Instant) {
        self.miid.set_epoch(start_time);
    }

    /// Textual containment over the canonical serialization.
    ///
    /// Not a structural test: the needle may coincidentally match across
    /// miid/ciid boundaries. Empty needles never match.
    pub fn contains(&self, needle: &str) -> bool {
        !needle.is_empty() && self.to_string().contains(needle)
    }
}

impl fmt::Display for Ciid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.miid)?;
        if !self.calls.is_empty() {
            f.write_str("(")?;
            for (i, call) in self.calls.iter().enumerate() {
                if i > 0 {
                    f.write_str("+")?;
                }
                write!(f, "{call}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl From<Miid> for Ciid {
    fn from(miid: Miid) -> Self {
        Self::new(miid)
    }
}

impl FromStr for Ciid {
    type Err = ParseIdError;

    /// Strict parse: rejects input whose canonical re-serialization differs,
    /// which is how degraded best-effort parses surface
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ciid = Self::parse(s);
        if ciid.to_string() != s {
            return Err(ParseIdError::InvalidCiid {
                input: s.to_owned(),
            });
        }
        Ok(ciid)
    }
}

impl Serialize for Ciid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ciid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_name_and_argument_parts() {
        assert_eq!(separate_name_from_args("A(B)"), ("A".into(), "B".into()));
        assert_eq!(separate_name_from_args("A"), ("A".into(), String::new()));
        assert_eq!(separate_name_from_args("A()"), ("A".into(), String::new()));
        assert_eq!(separate_name_from_args("(B)"), (String::new(), "B".into()));
        assert_eq!(separate_name_from_args("A(B+C)"), ("A".into(), "B+C".into()));
        assert_eq!(
            separate_name_from_args("A(B(D)+C(E(F)))"),
            ("A".into(), "B(D)+C(E(F))".into())
        );
    }

    #[test]
    fn leaf_parses_to_a_ciid_without_calls() {
        let ciid = Ciid::parse("msA/1.17/dev-123ab%3333s");
        assert_eq!(ciid.miid().name(), "msA");
        assert_eq!(ciid.miid().variant(), "dev-123ab");
        assert!(ciid.calls().is_empty());
    }

    #[test]
    fn nested_input_builds_the_expected_tree() {
        let ciid = Ciid::parse("A/1.1%22s(B/1.1%22s+C/1.1%22s(D/1.1%22s))");

        assert_eq!(ciid.miid().name(), "A");
        assert_eq!(ciid.calls().len(), 2);

        let children: Vec<&Ciid> = ciid.calls().iter().collect();
        assert_eq!(children[0].miid().name(), "B");
        assert!(children[0].calls().is_empty());

        assert_eq!(children[1].miid().name(), "C");
        assert_eq!(children[1].calls().len(), 1);
        let grandchildren: Vec<&Ciid> = children[1].calls().iter().collect();
        assert_eq!(grandchildren[0].miid().name(), "D");
    }

    #[test]
    fn deeply_nested_input_recurses_per_level() {
        let input = "A/1.1%22s(B/1.1%22s(C/1.1%22s+D/1.1%22s)+D/1.1%22s(E/1.1%22s))";
        let ciid = Ciid::parse(input);
        assert_eq!(ciid.to_string(), input);
        assert_eq!(ciid.calls().len(), 2);
    }

    #[test]
    fn round_trips_valid_forms() {
        for input in [
            "msA/1.1%22s",
            "",
            "msA/1.1/feature-branch-22aabbcc%22s",
            "msA/1.1/feature-branch-22aabbcc%22s(msB/2.2%33s)",
            "msA/1.1/feature-branch-22aabbcc%22s(msB/xx%333s+msC/222%444s)",
            "A/1.1%22s(B/1.1%22s+C/1.1%22s(D/1.1%22s+E/1.1%22s))",
        ] {
            assert_eq!(Ciid::parse(input).to_string(), input, "input: {input}");
        }
    }

    #[test]
    fn empty_rooted_graph_still_round_trips() {
        // a call graph whose root failed to identify itself
        let ciid = Ciid::parse("(B/1.1%22s)");
        assert!(ciid.miid().is_empty());
        assert_eq!(ciid.calls().len(), 1);
        assert_eq!(ciid.to_string(), "(B/1.1%22s)");
    }

    #[test]
    fn unbalanced_input_degrades_without_failing() {
        // trailing text after the outermost group closes is dropped
        let ciid = Ciid::parse("A/1%1s(B/1%2s)junk");
        assert_eq!(ciid.to_string(), "A/1%1s(B/1%2s)");

        // a stray ')' before any '(' lands in the name and poisons the miid
        let stray = Ciid::parse(")A/1%1s");
        assert!(stray.miid().is_empty());
        assert_eq!(stray.to_string(), "");
    }

    #[test]
    fn contains_matches_canonical_substrings_only() {
        let ciid = Ciid::parse("A/1.1%22s(B/1.1%22s+C/1.1%22s(D/1.1%22s))");
        assert!(ciid.contains("A/1.1"));
        assert!(ciid.contains("D/1.1%22s"));
        assert!(!ciid.contains("E/1.1"));
        assert!(!ciid.contains(""));
    }

    #[test]
    fn set_epoch_touches_only_the_root() {
        let mut ciid = Ciid::parse("A/1.1%-1s(B/1.1%7s)");
        ciid.set_epoch(Instant::now());
        assert!(ciid.miid().epoch() >= 0);
        let child = ciid.calls().iter().next().unwrap();
        assert_eq!(child.miid().epoch(), 7);
    }

    #[test]
    fn call_stack_mutation_reserializes() {
        let mut ciid = Ciid::parse("A/1.1%22s");
        ciid.push_call(Ciid::parse("B/2.2%33s"));
        ciid.push_call(Ciid::parse("C/3.3%44s"));
        assert_eq!(ciid.to_string(), "A/1.1%22s(B/2.2%33s+C/3.3%44s)");

        let popped = ciid.pop_call().unwrap();
        assert_eq!(popped.to_string(), "C/3.3%44s");
        assert_eq!(ciid.to_string(), "A/1.1%22s(B/2.2%33s)");

        ciid.clear_calls();
        assert_eq!(ciid.to_string(), "A/1.1%22s");
    }

    #[test]
    fn strict_parse_rejects_degraded_input() {
        assert!("A/1%1s(B/1%2s)junk".parse::<Ciid>().is_err());
        assert!("not an id".parse::<Ciid>().is_err());

        let ciid: Ciid = "A/1.1%22s(B/1.1%22s)".parse().unwrap();
        assert_eq!(ciid.calls().len(), 1);
    }

    #[test]
    fn serde_uses_the_canonical_string_form() {
        let ciid = Ciid::parse("A/1.1%22s(B/1.1%22s)");
        let json = serde_json::to_string(&ciid).unwrap();
        assert_eq!(json, "\"A/1.1%22s(B/1.1%22s)\"");
        let back: Ciid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ciid);
    }
}
