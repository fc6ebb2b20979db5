//! Search of `>` outside of quoted regions.

/// Represents the result of [`QuotedParser::one_of`] operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OneOf {
    /// The open square bracket (`[`) of an internal subset was found at the
    /// specified position.
    Subset(usize),
    /// The close angle bracket (`>`) was found at the specified position.
    Close(usize),
    /// Nothing was found in the provided slice.
    None,
}

/// A parser that searches a `>` symbol in the slice outside of quoted regions.
///
/// Inside a tag a quote opens a region only when it starts an attribute
/// value, i.e. follows `=` and optional whitespace, so stray quotes in
/// malformed HTML (`<p title=it's>`) do not hide the end of the tag.
/// Inside a DOCTYPE every quote opens a region.
///
/// The parser keeps its state between slices, so the search can continue in
/// the next slice when `None` is returned.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use quick_markup::parser::QuotedParser;
///
/// let mut parser = QuotedParser::default();
///
/// // Parse `<my-element  with = 'some > inside'>and the text follow...`
/// // split into three chunks
/// assert_eq!(parser.feed(b"<my-element"), None);
/// assert_eq!(parser.feed(b" with = 'some >"), None);
/// assert_eq!(parser.feed(b" inside'>and the text follow..."), Some(8));
/// //                       ^       ^
/// //                       0       8
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum QuotedParser {
    /// The initial state (inside markup, but outside of any quoted value).
    #[default]
    Outside,
    /// After `=`, a quote here opens a value.
    Equals,
    /// Inside a single-quoted region.
    SingleQ,
    /// Inside a double-quoted region.
    DoubleQ,
}

impl QuotedParser {
    /// Returns the position of `>` which closes a tag, or `None` if `>` was
    /// not found in `bytes`.
    pub fn feed(&mut self, bytes: &[u8]) -> Option<usize> {
        for (i, &byte) in bytes.iter().enumerate() {
            *self = match (*self, byte) {
                (Self::Outside | Self::Equals, b'>') => return Some(i),
                (Self::Outside, b'=') => Self::Equals,
                (Self::Outside, _) => Self::Outside,

                (Self::Equals, b'\'') => Self::SingleQ,
                (Self::Equals, b'"') => Self::DoubleQ,
                (Self::Equals, b) if crate::utils::is_whitespace(b) => Self::Equals,
                (Self::Equals, _) => Self::Outside,

                (Self::SingleQ, b'\'') | (Self::DoubleQ, b'"') => Self::Outside,
                (state, _) => state,
            };
        }
        None
    }

    /// Returns the position of `[` or `>` found outside of quotes, or
    /// [`OneOf::None`] if neither was found in `bytes`.
    pub fn one_of(&mut self, bytes: &[u8]) -> OneOf {
        let mut it = bytes.iter().enumerate();
        while let Some((i, &byte)) = it.find(|(_, &b)| matches!(b, b'[' | b'>' | b'\'' | b'"')) {
            match (*self, byte) {
                (Self::Outside | Self::Equals, b'[') => return OneOf::Subset(i),
                (Self::Outside | Self::Equals, b'>') => return OneOf::Close(i),
                (Self::Outside | Self::Equals, b'\'') => *self = Self::SingleQ,
                (Self::Outside | Self::Equals, b'"') => *self = Self::DoubleQ,

                (Self::SingleQ, b'\'') | (Self::DoubleQ, b'"') => *self = Self::Outside,
                _ => {}
            }
        }
        OneOf::None
    }
}
