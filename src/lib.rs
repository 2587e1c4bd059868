//! # Instance Identification Codec
//!
//! ## Purpose
//!
//! This crate contains the "Rules" layer of call-graph instance
//! identification: a compact, human-readable textual representation of which
//! service instance handled a request and which downstream services it
//! invoked, carried in a single `X-Instance-Id` HTTP header value.
//!
//! - **Miid codec**: one service instance descriptor,
//!   `name[/version[/variant]]%<epoch>s`
//! - **Ciid codec**: the recursive call graph,
//!   `CIID := MIID [ "(" CIID ("+" CIID)* ")" ]`
//! - **CallStack**: the mutable list of outbound calls a live service
//!   records before re-serializing
//! - **IidRequest codec**: the companion authorization/options sub-protocol,
//!   `empty | key=<value> [options=<flags>]`
//!
//! ## Architecture Role
//!
//! ```text
//! HTTP middleware → [instanceid codec] → call-graph tree
//!       ↑                   ↓                  ↓
//!  Header strings     Parse/Format       CallStack mutation
//!  X-Instance-Id      Round-trip law     push / pop / set_epoch
//! ```
//!
//! The codec sits between header strings and the in-memory call-graph tree.
//! Transport, base64url compression helpers and tree rendering are external
//! collaborators that consume only the public accessors here.
//!
//! ## Failure Policy
//!
//! Parsing is total: every input string, however malformed, yields a value.
//! Malformed input degrades to the canonical empty value (empty-name [`Miid`],
//! possibly-empty-rooted [`Ciid`]) instead of raising an error. The strict
//! [`std::str::FromStr`] layer turns that degradation into a typed
//! [`ParseIdError`] for callers that prefer `?` over sentinel checks.
//!
//! For every string of the valid grammar, `format(parse(s)) == s`.
//!
//! ## Concurrency
//!
//! Entirely synchronous and allocation-only; no locking, no I/O. Values are
//! plain owned trees. A caller sharing one call-graph value across
//! request-handling units must synchronize externally; the intended pattern
//! is one exclusively-owned value per in-flight request.

// Core modules
pub mod constants;
pub mod error;
pub mod miid;
pub mod request;
pub mod stack;

mod splitter;

pub mod ciid;

// Re-export key types for convenience
pub use constants::X_INSTANCE_ID;
pub use error::{ParseIdError, ParseIdResult};
pub use miid::{sanity_check, Miid};
pub use request::{IidOption, IidRequest};
pub use stack::CallStack;

pub use ciid::Ciid;
