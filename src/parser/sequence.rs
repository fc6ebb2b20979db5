//! Search of the end sequences of comments (`-->`), CDATA sections (`]]>`)
//! and processing instructions (`?>`).

/// A parser that searches a `>` preceded by a fixed number of `mark` bytes.
///
/// The parser remembers how many marks were seen at the end of the previous
/// slice, so the sequence is found even when it is split between two slices.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use quick_markup::parser::EndSequence;
///
/// let mut parser = EndSequence::comment();
///
/// // Parse `<!-- comment with some -> and --- inside-->and the text follow...`
/// // split into three chunks
/// assert_eq!(parser.feed(b"<!-- comment"), None);
/// assert_eq!(parser.feed(b" with some -> and -"), None);
/// assert_eq!(parser.feed(b"-- inside-->and the text follow..."), Some(12));
/// //                       ^          ^
/// //                       0          11
/// ```
///
/// After a successful match the parser must not be used anymore.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EndSequence {
    /// The byte repeated before the final `>`
    mark: u8,
    /// How many marks must precede the `>`
    marks: u8,
    /// How many marks the previous slice ended with, at most `marks`
    seen: u8,
}

impl EndSequence {
    /// Searches `-->`.
    pub const fn comment() -> Self {
        Self::new(b'-', 2)
    }

    /// Searches `]]>`.
    pub const fn cdata() -> Self {
        Self::new(b']', 2)
    }

    /// Searches `?>`.
    pub const fn pi() -> Self {
        Self::new(b'?', 1)
    }

    const fn new(mark: u8, marks: u8) -> Self {
        Self {
            mark,
            marks,
            seen: 0,
        }
    }

    /// Returns the position after the end sequence, or `None` if `bytes`
    /// does not contain it.
    pub fn feed(&mut self, bytes: &[u8]) -> Option<usize> {
        let marks = self.marks as usize;
        for i in memchr::memchr_iter(b'>', bytes) {
            let here = trailing_marks(&bytes[..i], self.mark).min(marks);
            let complete = here == marks || (here == i && self.seen as usize + here >= marks);
            if complete {
                // +1 for `>` which should be included in event
                return Some(i + 1);
            }
        }
        let tail = trailing_marks(bytes, self.mark);
        let seen = if tail == bytes.len() {
            self.seen as usize + tail
        } else {
            tail
        };
        self.seen = seen.min(marks) as u8;
        None
    }
}

#[inline]
fn trailing_marks(bytes: &[u8], mark: u8) -> usize {
    bytes.iter().rev().take_while(|&&b| b == mark).count()
}
