//! Round-trip and idempotence laws over the valid grammar
//!
//! Generates strings of the valid miid/ciid grammar and checks that parsing
//! then formatting reproduces the literal input, and that parse∘format is a
//! fixed point structurally.

use instanceid::{Ciid, IidRequest, Miid};
use proptest::prelude::*;

/// A grammar segment: no `/`, `%`, `+`, parens or whitespace
fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9.-]{0,8}"
}

fn miid_string() -> impl Strategy<Value = String> {
    (
        segment(),
        segment(),
        prop::option::of(segment()),
        -1i64..100_000,
    )
        .prop_map(|(name, version, variant, epoch)| match variant {
            Some(variant) => format!("{name}/{version}/{variant}%{epoch}s"),
            None => format!("{name}/{version}%{epoch}s"),
        })
}

fn ciid_string() -> impl Strategy<Value = String> {
    miid_string().prop_recursive(3, 24, 4, |inner| {
        (miid_string(), prop::collection::vec(inner, 1..4)).prop_map(|(root, calls)| {
            format!("{root}({})", calls.join("+"))
        })
    })
}

proptest! {
    #[test]
    fn miid_round_trips(input in miid_string()) {
        let miid = Miid::parse(&input);
        prop_assert!(!miid.is_empty());
        prop_assert_eq!(miid.to_string(), input);
    }

    #[test]
    fn miid_strict_parse_accepts_the_grammar(input in miid_string()) {
        prop_assert!(input.parse::<Miid>().is_ok());
    }

    #[test]
    fn ciid_round_trips(input in ciid_string()) {
        prop_assert_eq!(Ciid::parse(&input).to_string(), input);
    }

    #[test]
    fn ciid_parse_format_parse_is_idempotent(input in ciid_string()) {
        let once = Ciid::parse(&input);
        let twice = Ciid::parse(&once.to_string());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn ciid_contains_its_own_root(input in ciid_string()) {
        let ciid = Ciid::parse(&input);
        prop_assert!(ciid.contains(&ciid.miid().to_string()));
    }

    #[test]
    fn arbitrary_input_never_panics(input in "\\PC{0,64}") {
        // total-function contract: any string yields a value
        let _ = Ciid::parse(&input);
        let _ = Miid::parse(&input);
        let _ = IidRequest::parse(&input);
    }

    #[test]
    fn request_canonical_form_is_a_fixed_point(
        key in prop::option::of("[a-z0-9-]{1,16}"),
        flags in "[a-z]{0,6}",
    ) {
        let mut input = String::new();
        if let Some(key) = &key {
            input.push_str("key=");
            input.push_str(key);
        } else {
            input.push_str("empty");
        }
        if !flags.is_empty() {
            input.push_str(" options=");
            input.push_str(&flags);
        }

        let canonical = IidRequest::parse(&input).to_string();
        prop_assert_eq!(IidRequest::parse(&canonical).to_string(), canonical);
    }
}
