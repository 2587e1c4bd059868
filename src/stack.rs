//! Ordered list of downstream calls attached to a parent [`Ciid`]
//!
//! A live service records its outbound calls here before re-serializing its
//! own call graph. Plain mutable container, no internal synchronization:
//! single-writer discipline per owning `Ciid` is the caller's responsibility.

use crate::ciid::Ciid;

/// Insertion-ordered sequence of child call graphs
///
/// Mutated only by [`push`](CallStack::push) (append at end) and
/// [`pop`](CallStack::pop) (remove from end). Popping an empty stack reports
/// `None`, never a panic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStack(Vec<Ciid>);

impl CallStack {
    /// Create an empty call stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call at the end
    pub fn push(&mut self, ciid: Ciid) {
        self.0.push(ciid);
    }

    /// Remove and return the most recent call, `None` when empty
    pub fn pop(&mut self) -> Option<Ciid> {
        self.0.pop()
    }

    /// True when no calls are recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded calls
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Remove all recorded calls
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate the calls in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Ciid> {
        self.0.iter()
    }
}

impl FromIterator<Ciid> for CallStack {
    fn from_iter<I: IntoIterator<Item = Ciid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for CallStack {
    type Item = Ciid;
    type IntoIter = std::vec::IntoIter<Ciid>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CallStack {
    type Item = &'a Ciid;
    type IntoIter = std::slice::Iter<'a, Ciid>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
