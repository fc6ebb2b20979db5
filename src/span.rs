//! Zero-copy references into the parsed buffer.
//!
//! Every event delivered to a [`MarkupHandler`] describes its artifacts as
//! [`Span`]s: an offset and a length into the buffer passed along with the
//! event, plus the line and column of the first character. Nothing is copied
//! out of the input by the parser itself.
//!
//! [`MarkupHandler`]: crate::handler::MarkupHandler

use std::fmt;
use std::ops::Range;
use std::str::{from_utf8, Utf8Error};

use crate::utils::write_byte_string;

/// A location in the input: a byte offset and the 1-based line and column of
/// the character found there.
///
/// Columns count characters, not bytes: continuation bytes of a multi-byte
/// UTF-8 sequence do not advance the column.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    /// Byte offset from the beginning of the document
    pub offset: usize,
    /// Line number, starting at 1
    pub line: usize,
    /// Column number, starting at 1
    pub col: usize,
}

impl Position {
    /// The position of the first character of a document.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        col: 1,
    };

    /// Moves this position over `bytes`, which must be the data that
    /// immediately follows it in the document.
    ///
    /// A line feed increments the line and resets the column.
    pub fn advance(&mut self, bytes: &[u8]) {
        self.offset += bytes.len();
        let mut rest = bytes;
        if let Some(last) = memchr::memrchr(b'\n', rest) {
            self.line += memchr::memchr_iter(b'\n', rest).count();
            self.col = 1;
            rest = &rest[last + 1..];
        }
        self.col += rest.iter().filter(|&&b| !is_continuation(b)).count();
    }

    /// Returns a position moved over `bytes`. See [`Self::advance`].
    #[inline]
    pub fn after(mut self, bytes: &[u8]) -> Self {
        self.advance(bytes);
        self
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

#[inline]
const fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// A region of the buffer passed with an event.
///
/// `offset` indexes into that buffer, which for in-memory parsing is the
/// caller's own input and for streamed parsing is the parser's working window.
/// `line` and `col` always refer to the document.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Span {
    /// Offset of the first byte in the event buffer
    pub offset: usize,
    /// Length in bytes
    pub len: usize,
    /// Line of the first character, starting at 1
    pub line: usize,
    /// Column of the first character, starting at 1
    pub col: usize,
}

impl Span {
    /// Creates a span of `len` bytes starting at `offset` of the event buffer,
    /// located at `pos` in the document.
    #[inline]
    pub const fn new(offset: usize, len: usize, pos: Position) -> Self {
        Self {
            offset,
            len,
            line: pos.line,
            col: pos.col,
        }
    }

    /// Exclusive end offset in the event buffer.
    #[inline]
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Returns `true` if the span covers no bytes.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Range of the span in the event buffer.
    #[inline]
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Extracts the bytes of this span from the event buffer.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is not the buffer this span was reported with and is
    /// too short to contain it.
    #[inline]
    pub fn slice<'b>(&self, buf: &'b [u8]) -> &'b [u8] {
        &buf[self.range()]
    }

    /// Extracts the bytes of this span as a string slice.
    #[inline]
    pub fn as_str<'b>(&self, buf: &'b [u8]) -> Result<&'b str, Utf8Error> {
        from_utf8(self.slice(buf))
    }

    /// Returns a helper that formats the bytes of this span for debugging.
    pub fn show<'b>(&self, buf: &'b [u8]) -> impl fmt::Debug + 'b {
        struct Show<'b>(&'b [u8]);
        impl fmt::Debug for Show<'_> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write_byte_string(f, self.0)
            }
        }
        Show(self.slice(buf))
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}..{} @{}:{}",
            self.offset,
            self.end(),
            self.line,
            self.col
        )
    }
}
