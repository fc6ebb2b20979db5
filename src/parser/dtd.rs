//! Skipping of the internal subset of a DOCTYPE declaration.

use super::EndSequence;

/// A parser that searches the `]` which closes the internal subset of
/// `<!DOCTYPE name [ ... ]>`.
///
/// Declarations inside the subset are not interpreted. The parser only skips
/// quoted literals, comments and processing instructions, because those may
/// contain `]` which does not close the subset:
///
/// ```text
/// [28b]   intSubset       ::=   (markupdecl | DeclSep)*
/// [29]    markupdecl      ::=   elementdecl | AttlistDecl | EntityDecl | NotationDecl | PI | Comment
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SubsetParser {
    /// Between declarations or inside a declaration, outside of quotes.
    #[default]
    Outside,
    /// Inside a literal; holds the quote which closes it.
    Quoted(u8),
    /// A `<` was seen.
    Lt,
    /// A `<!` was seen.
    LtBang,
    /// A `<!-` was seen.
    LtBangDash,
    /// Inside `<!-- -->`.
    Comment(EndSequence),
    /// Inside `<? ?>`.
    Pi(EndSequence),
}

impl SubsetParser {
    /// Returns the position of `]` which closes the subset, or `None` if it
    /// was not found in `bytes`.
    pub fn feed(&mut self, bytes: &[u8]) -> Option<usize> {
        let mut i = 0;
        while i < bytes.len() {
            let byte = bytes[i];
            match *self {
                Self::Outside => match byte {
                    b']' => return Some(i),
                    b'\'' | b'"' => *self = Self::Quoted(byte),
                    b'<' => *self = Self::Lt,
                    _ => {}
                },
                Self::Quoted(quote) => match memchr::memchr(quote, &bytes[i..]) {
                    Some(end) => {
                        *self = Self::Outside;
                        i += end + 1;
                        continue;
                    }
                    None => return None,
                },
                Self::Lt => match byte {
                    b'!' => *self = Self::LtBang,
                    b'?' => *self = Self::Pi(EndSequence::pi()),
                    // Reconsider the byte
                    _ => {
                        *self = Self::Outside;
                        continue;
                    }
                },
                Self::LtBang => match byte {
                    b'-' => *self = Self::LtBangDash,
                    _ => {
                        *self = Self::Outside;
                        continue;
                    }
                },
                Self::LtBangDash => match byte {
                    b'-' => *self = Self::Comment(EndSequence::comment()),
                    _ => {
                        *self = Self::Outside;
                        continue;
                    }
                },
                Self::Comment(mut parser) | Self::Pi(mut parser) => {
                    match parser.feed(&bytes[i..]) {
                        Some(end) => {
                            *self = Self::Outside;
                            i += end;
                            continue;
                        }
                        None => {
                            *self = match *self {
                                Self::Comment(_) => Self::Comment(parser),
                                _ => Self::Pi(parser),
                            };
                            return None;
                        }
                    }
                }
            }
            i += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty() {
        let mut parser = SubsetParser::default();
        assert_eq!(parser.feed(b"]>"), Some(0));
    }

    #[test]
    fn declarations() {
        let mut parser = SubsetParser::default();
        assert_eq!(
            parser.feed(b"<!ELEMENT a (#PCDATA)><!ENTITY gt '>'>]>"),
            //            0                                     ^ = 38
            Some(38)
        );
    }

    #[test]
    fn brackets_in_literals_comments_and_pis() {
        let mut parser = SubsetParser::default();
        assert_eq!(parser.feed(b"<!ENTITY x \"]\">]"), Some(15));

        let mut parser = SubsetParser::default();
        assert_eq!(parser.feed(b"<!-- ] -->]"), Some(10));

        let mut parser = SubsetParser::default();
        assert_eq!(parser.feed(b"<?pi ] ?>]"), Some(9));
    }

    #[test]
    fn split() {
        let mut parser = SubsetParser::default();
        assert_eq!(parser.feed(b"<!ENTITY x '"), None);
        assert_eq!(parser, SubsetParser::Quoted(b'\''));
        assert_eq!(parser.feed(b"]'><!-"), None);
        assert_eq!(parser, SubsetParser::LtBangDash);
        assert_eq!(parser.feed(b"- ] -"), None);
        assert!(matches!(parser, SubsetParser::Comment(_)));
        assert_eq!(parser.feed(b"->]"), Some(2));
    }

    #[test]
    fn not_a_comment() {
        // `<!E` is a declaration, `<!-x` is not a comment
        let mut parser = SubsetParser::default();
        assert_eq!(parser.feed(b"<!-x]"), Some(4));
    }
}
