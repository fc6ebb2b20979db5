//! The stack of open elements of one parse.
//!
//! The stack answers the two questions the balancing machine asks: which open
//! elements are implicitly closed when a new element opens, and what a close
//! tag closes. Both answers are plain values ([`ElementStack::implied_closes`]
//! and [`CloseOutcome`]) so the caller decides which events to emit, or which
//! error to raise, before the stack is changed.

use std::fmt;

use crate::elements::CloseRule;
use crate::span::Position;
use crate::utils::{names_equal, write_byte_string};

/// What a close tag closes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CloseOutcome {
    /// The close tag matches the element on top of the stack.
    Matched,
    /// The close tag matches an element deeper in the stack; the given number
    /// of elements above it were left open and must be closed first.
    AutoClosed(usize),
    /// No open element has this name.
    Unmatched,
}

/// Names of the open elements, from the root to the innermost element.
///
/// Names are kept in one flat buffer, so pushing an element does not allocate
/// once the buffer has grown to the depth of the document.
#[derive(Clone, Default)]
pub struct ElementStack {
    /// Names of all open elements, one after another
    names: Vec<u8>,
    /// Start of every name in `names` and position of its open tag
    opened: Vec<(usize, Position)>,
}

impl ElementStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.opened.len()
    }

    /// Returns `true` if no element is open.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.opened.is_empty()
    }

    /// Opens an element whose open tag starts at `position`.
    pub fn push(&mut self, name: &[u8], position: Position) {
        self.opened.push((self.names.len(), position));
        self.names.extend_from_slice(name);
    }

    /// Closes the innermost element and returns the position of its open tag.
    pub fn pop(&mut self) -> Option<Position> {
        let (start, position) = self.opened.pop()?;
        self.names.truncate(start);
        Some(position)
    }

    /// Name of the innermost open element.
    #[inline]
    pub fn top(&self) -> Option<&[u8]> {
        self.opened.last().map(|&(start, _)| &self.names[start..])
    }

    /// Name and open tag position of the innermost open element.
    #[inline]
    pub fn top_entry(&self) -> Option<(&[u8], Position)> {
        self.opened
            .last()
            .map(|&(start, position)| (&self.names[start..], position))
    }

    /// Iterates over the names of the open elements from the innermost one
    /// to the root.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let mut end = self.names.len();
        self.opened.iter().rev().map(move |&(start, _)| {
            let name = &self.names[start..end];
            end = start;
            name
        })
    }

    /// Returns how many elements from the top of the stack are implicitly
    /// closed by opening an element with the given close rule.
    ///
    /// Elements are examined nearest first. The scan stops at the first
    /// element which is in the rule's boundary set (checked before the closes
    /// set, so such an element is never closed by this scan) or which the
    /// rule does not close.
    pub fn implied_closes(&self, rule: &CloseRule) -> usize {
        self.iter()
            .take_while(|name| !rule.stops_at(name) && rule.closes(name))
            .count()
    }

    /// Finds the innermost open element named `name` and tells what a close
    /// tag with that name closes.
    pub fn find_close(&self, name: &[u8], case_sensitive: bool) -> CloseOutcome {
        match self
            .iter()
            .position(|open| names_equal(open, name, case_sensitive))
        {
            Some(0) => CloseOutcome::Matched,
            Some(above) => CloseOutcome::AutoClosed(above),
            None => CloseOutcome::Unmatched,
        }
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.names.clear();
        self.opened.clear();
    }
}

impl fmt::Debug for ElementStack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        struct Name<'a>(&'a [u8]);
        impl fmt::Debug for Name<'_> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write_byte_string(f, self.0)
            }
        }

        let mut names: Vec<_> = self.iter().map(Name).collect();
        names.reverse();
        f.debug_list().entries(names).finish()
    }
}
