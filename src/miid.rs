//! # Miid Codec - Service Instance Descriptor
//!
//! ## Purpose
//!
//! Bidirectional mapping between the structured service instance descriptor
//! and its canonical wire form `name[/version[/variant]]%<epoch>s`. The
//! variant segment is free-form and may itself contain `/` characters; all
//! segments between the version and the epoch marker are rejoined into a
//! single variant value.
//!
//! ## Failure Policy
//!
//! Parsing is a total function. Input that fails the [`sanity_check`] gate or
//! the structural parse yields the empty `Miid` (empty name, epoch 0) rather
//! than an error. Callers that want a hard failure use the strict
//! [`FromStr`] layer, which additionally demands that the canonical
//! re-serialization reproduces the input literally.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::ParseIdError;

/// Service instance descriptor: name, version, free-form variant, epoch
///
/// The epoch is the whole seconds elapsed since the service's reference start
/// time; negative values are the "not yet known" sentinel. Fields are private;
/// mutation happens only through [`Miid::set_t`] and [`Miid::set_epoch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Miid {
    name: String,
    version: String,
    variant: String,
    epoch: i64,
}

/// Cheap structural pre-validation applied before full miid parsing.
///
/// On the whitespace-trimmed candidate: must end with `s`, must contain
/// between 1 and 3 `/` characters, and must contain none of `+`, `(`, `)`.
pub fn sanity_check(candidate: &str) -> bool {
    let candidate = candidate.trim();

    if !candidate.ends_with('s') {
        return false;
    }

    let slashes = candidate.matches('/').count();
    if !(1..=3).contains(&slashes) {
        return false;
    }

    if candidate.contains(['+', '(', ')']) {
        return false;
    }

    true
}

/// Epoch text is everything before the first `s` of the trailing segment.
fn parse_epoch(text: &str) -> Option<i64> {
    let digits = text.split('s').next().unwrap_or("");
    digits.parse().ok()
}

impl Miid {
    /// Construct a miid from its parts without parsing
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        variant: impl Into<String>,
        epoch: i64,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            variant: variant.into(),
            epoch,
        }
    }

    /// Parse a miid from its wire form.
    ///
    /// Total function: malformed input yields the empty miid, never an error.
    /// The sanity gate runs on the trimmed candidate; the structural split
    /// runs on the input as given, so whitespace-padded-but-sane inputs keep
    /// their padding inside the name and round-trip literally.
    pub fn parse(id: &str) -> Self {
        if !sanity_check(id) {
            debug!(input = id, "miid rejected by sanity check");
            return Self::default();
        }

        let segments: Vec<&str> = id.split('/').collect();
        let name = segments[0];

        if segments.len() == 2 {
            let tail: Vec<&str> = segments[1].split('%').collect();
            if tail.len() < 2 {
                debug!(input = id, "miid has no epoch marker");
                return Self::default();
            }
            let Some(epoch) = parse_epoch(tail[1]) else {
                debug!(input = id, "miid epoch is not numeric");
                return Self::default();
            };
            return Self::new(name, tail[0], "", epoch);
        }

        // 3 or 4 segments: the second is the version; everything from the
        // third to the last, rejoined with '/', is the variant
        let version = segments[1];
        let last: Vec<&str> = segments[segments.len() - 1].split('%').collect();
        if last.len() < 2 {
            debug!(input = id, "miid has no epoch marker");
            return Self::default();
        }
        let Some(epoch) = parse_epoch(last[1]) else {
            debug!(input = id, "miid epoch is not numeric");
            return Self::default();
        };

        let mut variant = String::new();
        for segment in &segments[2..segments.len() - 1] {
            variant.push_str(segment);
            variant.push('/');
        }
        variant.push_str(last[0]);

        Self::new(name, version, variant, epoch)
    }

    /// Service name; empty for the invalid/empty sentinel value
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version segment
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Free-form variant segment; may contain `/`
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Epoch offset in whole seconds; negative means "not yet known"
    pub fn epoch(&self) -> i64 {
        self.epoch
    }

    /// True for the canonical invalid/empty value
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// Set the epoch offset directly
    pub fn set_t(&mut self, epoch: i64) {
        self.epoch = epoch;
    }

    /// Set the epoch to the whole seconds elapsed since `start_time`
    pub fn set_epoch(&mut self, start_time: Instant) {
        self.epoch = i64::try_from(start_time.elapsed().as_secs()).unwrap_or(i64::MAX);
    }

    /// Textual containment over the canonical form; empty needles never match
    pub fn contains(&self, needle: &str) -> bool {
        !needle.is_empty() && self.to_string().contains(needle)
    }
}

impl fmt::Display for Miid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            return Ok(());
        }
        f.write_str(&self.name)?;
        if !self.version.is_empty() {
            write!(f, "/{}", self.version)?;
        }
        if !self.variant.is_empty() {
            write!(f, "/{}", self.variant)?;
        }
        write!(f, "%{}s", self.epoch)
    }
}

impl FromStr for Miid {
    type Err = ParseIdError;

    /// Strict parse: the total parse must reproduce the input on
    /// re-serialization, otherwise the input was degraded and is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let miid = Self::parse(s);
        if miid.to_string() != s {
            return Err(ParseIdError::InvalidMiid {
                input: s.to_owned(),
            });
        }
        Ok(miid)
    }
}

impl Serialize for Miid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Miid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
