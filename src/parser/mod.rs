//! A low-level markup parser which only finds the boundaries of constructs.
//! For advanced use: typically you want a [`MarkupParser`] instead.
//!
//! To use a parser create an instance of [`Parser`] and [`feed`] data into it.
//! After successful search the parser will return [`FeedResult`] with position
//! where match was found and returned variant will represent what exactly was
//! found. In case if the provided data is not enough to made any decision, a
//! [`FeedResult::NeedData`] is returned. Finally, if a strict parser encounters
//! a byte that should not be there, a [`SyntaxError`] is returned. A lenient
//! parser reports such markup as text instead.
//!
//! To fully parse a document you should pass unconsumed data to [`feed`] in a
//! loop, that means `&bytes[offset..]` for `Emit*` cases and a completely new
//! slice for a `NeedData` case:
//!
//! ```
//! use quick_markup::parser::{Parser, FeedResult::*};
//!
//! let mut parser = Parser::new(true);
//! // Buffer for data of one event
//! let mut buf = Vec::new();
//! let mut events = Vec::new();
//! // Feed data by 3 bytes at once
//! for mut chunk in b"<element attribute='>'>text".chunks(3) {
//!     loop {
//!         match parser.feed(chunk).unwrap() {
//!             // Return to the outer loop to request new chunk
//!             NeedData => {
//!                 buf.extend_from_slice(chunk);
//!                 break;
//!             }
//!             SkipBom(offset) => chunk = &chunk[offset..],
//!             EmitText(offset)
//!             | EmitCData(offset)
//!             | EmitComment(offset)
//!             | EmitDoctype(offset)
//!             | EmitPI(offset)
//!             | EmitEmptyTag(offset)
//!             | EmitStartTag(offset)
//!             | EmitEndTag(offset) => {
//!                 // Append data of an event to the buffer
//!                 buf.extend_from_slice(&chunk[..offset]);
//!                 // Consume already read data
//!                 chunk = &chunk[offset..];
//!
//!                 events.push(String::from_utf8(buf.clone()).unwrap());
//!                 buf.clear();
//!             }
//!         }
//!     }
//! }
//! // The rest of the document is a text
//! parser.finish().unwrap();
//! assert_eq!(events, ["<element attribute='>'>"]);
//! assert_eq!(buf, b"text");
//! ```
//!
//! [`MarkupParser`]: crate::reader::MarkupParser
//! [`feed`]: Parser::feed()

use crate::errors::SyntaxError;
use crate::utils::is_name_start;

mod dtd;
mod quoted;
mod sequence;

pub use dtd::SubsetParser;
pub use quoted::{OneOf, QuotedParser};
pub use sequence::EndSequence;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// An internal state of a parser. Used to preserve information about currently
/// parsed event between calls to [`Parser::feed()`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    /// Initial state used to begin parse a document.
    Start,
    /// The given number of bytes of an UTF-8 BOM was seen at the start of a document.
    Bom(usize),
    /// Between two events: nothing of the next event was seen yet.
    Text,
    /// Bytes of a text were seen, but its end was not found yet.
    InText,

    /// A `<` was seen, but nothing else.
    Markup,
    /// A `<!` was seen, but nothing else. It is unable to understand right now
    /// what data follow.
    MaybeCommentOrCDataOrDoctype,

    /// A `<!-` was seen, but nothing else. It is unable to understand right now
    /// what data follow.
    MaybeComment,
    /// A `<!--` was seen and we now inside a comment.
    Comment(EndSequence),

    /// A `<![` and the given number of bytes of `CDATA[` was seen.
    MaybeCData(usize),
    /// A `<![CDATA[` was seen and we now inside a character data content.
    CData(EndSequence),

    /// A `<!` and the given number of bytes of `DOCTYPE` (in any case) was seen.
    MaybeDoctype(usize),
    /// A `<!DOCTYPE` (in any case) was seen, and we are looking for `[` or `>`.
    Doctype(QuotedParser),
    /// We are inside of `[]` of `<!DOCTYPE e []>` definition.
    Subset(SubsetParser),
    /// We are after `]` of `<!DOCTYPE e []>` definition, looking for `>`.
    DoctypeFinish,

    /// A `<?` was seen. We parsing a processing instruction.
    PI(EndSequence),
    /// A `</` was seen, but `>` was not.
    EndTag,
    /// A `<` followed by a name start byte was seen. The flag is `true` if
    /// the last consumed byte was `/`.
    StartOrEmptyTag(QuotedParser, bool),
}

/// A result of feeding data into [`Parser`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FeedResult {
    /// All fed bytes should be consumed, new portion should be feed
    NeedData,

    /// The specified amount of bytes is an UTF-8 byte order mark and should
    /// be consumed without emitting any event.
    SkipBom(usize),

    /// The specified amount of bytes should be consumed from the input and
    /// a text should be emitted.
    EmitText(usize),

    /// The specified amount of bytes should be consumed from the input and
    /// a CDATA section should be emitted.
    EmitCData(usize),
    /// The specified amount of bytes should be consumed from the input and
    /// a comment should be emitted.
    EmitComment(usize),
    /// The specified amount of bytes should be consumed from the input and
    /// a DOCTYPE declaration should be emitted.
    EmitDoctype(usize),

    /// The specified amount of bytes should be consumed from the input and
    /// a processing instruction or XML declaration should be emitted.
    EmitPI(usize),

    /// The specified amount of bytes should be consumed from the input and
    /// a self-closed tag (`<name/>`) should be emitted.
    EmitEmptyTag(usize),
    /// The specified amount of bytes should be consumed from the input and
    /// a start tag should be emitted.
    EmitStartTag(usize),
    /// The specified amount of bytes should be consumed from the input and
    /// a close tag should be emitted.
    EmitEndTag(usize),
}

/// A low-level markup parser that searches the boundaries of constructs in
/// the provided slice.
///
/// The parser represents a state machine with following states:
///
/// ```text
/// Text --<--> Markup --!--> CommentOrCDataOrDoctype --"-"--> Comment
///                    |                              |--"["--> CData
///                    |                              |--D|d--> Doctype --"["--> Subset --"]"--> DoctypeFinish
///                    |--?--> PI
///                    |--/--> EndTag
///                    |--name start--> StartOrEmptyTag
///                    |--*--> error (strict) or InText (lenient)
/// Text --*--> InText --<--> emit text, Text
/// ```
///
/// Every successful match (`Emit*`) returns the parser to state `Text`.
/// A text without `<` in the fed bytes leaves the parser in `InText`, so a
/// `<` at the start of the next slice ends that text instead of being taken
/// for the start of the markup that follows it.
///
/// A strict parser returns a [`SyntaxError`] when the bytes after `<` or `<!`
/// do not start any construct, and [`Parser::finish()`] fails when the input
/// ends inside a construct. A lenient parser continues to scan such bytes as
/// text, as browsers do.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Parser {
    state: State,
    strict: bool,
}

impl Parser {
    /// Creates a parser at the start of a document.
    #[inline]
    pub const fn new(strict: bool) -> Self {
        Self {
            state: State::Start,
            strict,
        }
    }

    /// Performs parsing of the provided byte slice and returns the outcome.
    /// See [`Parser`] for more info.
    ///
    /// # Parameters
    /// - `bytes`: a slice to search a new markup event. Should contain text in
    ///   ASCII-compatible encoding
    pub fn feed(&mut self, bytes: &[u8]) -> Result<FeedResult, SyntaxError> {
        for (offset, &byte) in bytes.iter().enumerate() {
            let trail = &bytes[offset..];
            let start = offset + 1;
            let rest = &bytes[start..];
            self.state = match self.state {
                State::Start => match byte {
                    0xEF => State::Bom(1),
                    b'<' => State::Markup,
                    _ => return Ok(self.parse_text(trail, offset)),
                },
                State::Bom(seen) => {
                    if byte != UTF8_BOM[seen] {
                        // Not a BOM, just a text that starts like it
                        return Ok(self.parse_text(trail, offset));
                    }
                    if seen + 1 == UTF8_BOM.len() {
                        self.state = State::Text;
                        return Ok(FeedResult::SkipBom(start));
                    }
                    State::Bom(seen + 1)
                }
                State::Text => match byte {
                    b'<' => State::Markup,
                    _ => return Ok(self.parse_text(trail, offset)),
                },
                State::InText => match byte {
                    b'<' => {
                        self.state = State::Text;
                        return Ok(FeedResult::EmitText(offset));
                    }
                    _ => return Ok(self.parse_text(trail, offset)),
                },
                State::Markup => match byte {
                    b'!' => State::MaybeCommentOrCDataOrDoctype,
                    b'?' => return Ok(self.parse_pi(rest, start, EndSequence::pi())),
                    b'/' => return Ok(self.parse_end(rest, start)),
                    b if is_name_start(b) => {
                        return Ok(self.parse_start_or_empty(
                            trail,
                            offset,
                            QuotedParser::Outside,
                            false,
                        ))
                    }
                    _ => return self.malformed(SyntaxError::InvalidMarkupStart, trail, offset),
                },
                State::MaybeCommentOrCDataOrDoctype => match byte {
                    b'-' => State::MaybeComment,
                    b'[' => State::MaybeCData(0),
                    b'D' | b'd' => State::MaybeDoctype(1),
                    _ => return self.malformed(SyntaxError::InvalidBangMarkup, trail, offset),
                },

                //----------------------------------------------------------------------------------
                // <!-- comment -->
                //----------------------------------------------------------------------------------
                State::MaybeComment => match byte {
                    b'-' => return Ok(self.parse_comment(rest, start, EndSequence::comment())),
                    _ => return self.malformed(SyntaxError::InvalidBangMarkup, trail, offset),
                },
                State::Comment(parser) => return Ok(self.parse_comment(trail, offset, parser)),

                //----------------------------------------------------------------------------------
                // <![CDATA[]]>
                //----------------------------------------------------------------------------------
                State::MaybeCData(seen) => {
                    const CDATA: &[u8] = b"CDATA[";
                    if byte != CDATA[seen] {
                        return self.malformed(SyntaxError::InvalidBangMarkup, trail, offset);
                    }
                    if seen + 1 == CDATA.len() {
                        return Ok(self.parse_cdata(rest, start, EndSequence::cdata()));
                    }
                    State::MaybeCData(seen + 1)
                }
                State::CData(parser) => return Ok(self.parse_cdata(trail, offset, parser)),

                //----------------------------------------------------------------------------------
                // <!DOCTYPE>
                //----------------------------------------------------------------------------------
                State::MaybeDoctype(seen) => {
                    const DOCTYPE: &[u8] = b"DOCTYPE";
                    if !byte.eq_ignore_ascii_case(&DOCTYPE[seen]) {
                        return self.malformed(SyntaxError::InvalidBangMarkup, trail, offset);
                    }
                    if seen + 1 == DOCTYPE.len() {
                        return Ok(self.parse_doctype(rest, start, QuotedParser::Outside));
                    }
                    State::MaybeDoctype(seen + 1)
                }
                State::Doctype(parser) => return Ok(self.parse_doctype(trail, offset, parser)),
                State::Subset(parser) => return Ok(self.parse_subset(trail, offset, parser)),
                State::DoctypeFinish => return Ok(self.parse_doctype_finish(trail, offset)),

                State::PI(parser) => return Ok(self.parse_pi(trail, offset, parser)),
                State::EndTag => return Ok(self.parse_end(trail, offset)),
                State::StartOrEmptyTag(parser, has_slash) => {
                    return Ok(self.parse_start_or_empty(trail, offset, parser, has_slash));
                }
            }
        }
        Ok(FeedResult::NeedData)
    }

    /// This method should be called when all data was feed into parser.
    ///
    /// If a strict parser is in an intermediate state it will return
    /// a corresponding syntax error, otherwise it returns successfully and
    /// the unconsumed data should be treated as text.
    // rustfmt tend to move pipes to the begin of a line which ruins the nice look
    #[rustfmt::skip]
    pub fn finish(self) -> Result<(), SyntaxError> {
        let error = match self.state {
            // If nothing was fed into parser, document is empty.
            State::Start |
            State::Bom(_) |
            State::Text |
            State::InText => return Ok(()),

            State::Markup |
            State::StartOrEmptyTag(..) |
            State::EndTag => SyntaxError::UnclosedTag,

            State::MaybeCommentOrCDataOrDoctype |
            State::MaybeComment |
            State::MaybeCData(_) |
            State::MaybeDoctype(_) => SyntaxError::InvalidBangMarkup,

            State::Comment(_) => SyntaxError::UnclosedComment,
            State::CData(_) => SyntaxError::UnclosedCData,

            State::Doctype(_) |
            State::Subset(_) |
            State::DoctypeFinish => SyntaxError::UnclosedDoctype,

            State::PI(_) => SyntaxError::UnclosedPIOrXmlDecl,
        };
        if self.strict {
            Err(error)
        } else {
            Ok(())
        }
    }

    /// Returns `true` if this parser reports unrecognized markup as errors.
    #[inline]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Check if parser currently parses text
    #[inline]
    pub fn is_text_parsing(&self) -> bool {
        matches!(self.state, State::Text | State::InText)
    }

    /// Either fails or continues to scan the current event as text.
    #[inline]
    fn malformed(
        &mut self,
        error: SyntaxError,
        bytes: &[u8],
        offset: usize,
    ) -> Result<FeedResult, SyntaxError> {
        if self.strict {
            Err(error)
        } else {
            Ok(self.parse_text(bytes, offset))
        }
    }

    /// Text cannot contain `<` inside, so we emit it as soon as we find `<`.
    ///
    /// # Parameters
    /// - `bytes`: sub-slice to the original slice that was passed to `feed()`.
    ///   That sub-slice begins on the byte that represents a text content
    /// - `offset`: a position of `bytes` sub-slice in the one that was passed to `feed()`
    #[inline]
    fn parse_text(&mut self, bytes: &[u8], offset: usize) -> FeedResult {
        match memchr::memchr(b'<', bytes) {
            Some(i) => {
                self.state = State::Text;
                FeedResult::EmitText(offset + i)
            }
            None => {
                self.state = State::InText;
                FeedResult::NeedData
            }
        }
    }

    /// Determines the end position of a comment in the provided slice.
    /// Comment ends on the first occurrence of `-->` which cannot be escaped.
    fn parse_comment(&mut self, bytes: &[u8], offset: usize, mut parser: EndSequence) -> FeedResult {
        match parser.feed(bytes) {
            Some(i) => {
                self.state = State::Text;
                FeedResult::EmitComment(offset + i)
            }
            None => {
                self.state = State::Comment(parser);
                FeedResult::NeedData
            }
        }
    }

    /// Determines the end position of a CDATA block in the provided slice.
    /// CDATA block ends on the first occurrence of `]]>` which cannot be escaped.
    ///
    /// `<![CDATA[ ]]>` can contain `>` inside.
    fn parse_cdata(&mut self, bytes: &[u8], offset: usize, mut parser: EndSequence) -> FeedResult {
        match parser.feed(bytes) {
            Some(i) => {
                self.state = State::Text;
                FeedResult::EmitCData(offset + i)
            }
            None => {
                self.state = State::CData(parser);
                FeedResult::NeedData
            }
        }
    }

    fn parse_doctype(&mut self, bytes: &[u8], offset: usize, mut parser: QuotedParser) -> FeedResult {
        // Search `[` (start of an internal subset) or `>` (end of <!DOCTYPE> tag)
        match parser.one_of(bytes) {
            OneOf::Subset(i) => {
                self.parse_subset(&bytes[i + 1..], offset + i + 1, SubsetParser::default())
            }
            OneOf::Close(i) => {
                self.state = State::Text;
                // +1 for `>` which should be included in event
                FeedResult::EmitDoctype(offset + i + 1)
            }
            OneOf::None => {
                self.state = State::Doctype(parser);
                FeedResult::NeedData
            }
        }
    }

    /// Skips the internal subset of a DOCTYPE up to the closing `]`.
    fn parse_subset(&mut self, bytes: &[u8], offset: usize, mut parser: SubsetParser) -> FeedResult {
        match parser.feed(bytes) {
            // `]` finishes DOCTYPE subsets: <!DOCTYPE name []>
            // After that we should find the close `>`
            Some(i) => self.parse_doctype_finish(&bytes[i + 1..], offset + i + 1),
            None => {
                self.state = State::Subset(parser);
                FeedResult::NeedData
            }
        }
    }

    fn parse_doctype_finish(&mut self, bytes: &[u8], offset: usize) -> FeedResult {
        match memchr::memchr(b'>', bytes) {
            Some(i) => {
                self.state = State::Text;
                // +1 for `>` which should be included in event
                FeedResult::EmitDoctype(offset + i + 1)
            }
            None => {
                self.state = State::DoctypeFinish;
                FeedResult::NeedData
            }
        }
    }

    /// Determines the end position of a processing instruction in the provided slice.
    /// Processing instruction ends on the first occurrence of `?>` which cannot be
    /// escaped.
    fn parse_pi(&mut self, bytes: &[u8], offset: usize, mut parser: EndSequence) -> FeedResult {
        match parser.feed(bytes) {
            Some(i) => {
                self.state = State::Text;
                FeedResult::EmitPI(offset + i)
            }
            None => {
                self.state = State::PI(parser);
                FeedResult::NeedData
            }
        }
    }

    /// Determines the end position of a close tag in the provided slice.
    fn parse_end(&mut self, bytes: &[u8], offset: usize) -> FeedResult {
        match memchr::memchr(b'>', bytes) {
            Some(i) => {
                self.state = State::Text;
                // +1 for `>` which should be included in event
                FeedResult::EmitEndTag(offset + i + 1)
            }
            None => {
                self.state = State::EndTag;
                FeedResult::NeedData
            }
        }
    }

    /// Determines the end position of a start or empty tag in the provided slice.
    ///
    /// # Parameters
    /// - `bytes`: sub-slice to the original slice that was passed to `feed()`.
    ///   That sub-slice begins on a byte of the tag after `<`
    /// - `offset`: a position of `bytes` sub-slice in the one that was passed to `feed()`
    /// - `parser`: the state of a quotes used to skip `>` inside attribute values
    /// - `has_slash`: a flag that indicates was the previous fed data ended with `/`
    fn parse_start_or_empty(
        &mut self,
        bytes: &[u8],
        offset: usize,
        mut parser: QuotedParser,
        has_slash: bool,
    ) -> FeedResult {
        match parser.feed(bytes) {
            Some(0) if has_slash => {
                self.state = State::Text;
                // +1 for `>` which should be included in event
                FeedResult::EmitEmptyTag(offset + 1)
            }
            Some(i) => {
                self.state = State::Text;
                // This slash cannot follow immediately after `<`, because otherwise
                // we would be in a `parse_end` and not here
                if i > 0 && bytes[i - 1] == b'/' {
                    FeedResult::EmitEmptyTag(offset + i + 1)
                } else {
                    FeedResult::EmitStartTag(offset + i + 1)
                }
            }
            None => {
                self.state = State::StartOrEmptyTag(parser, bytes.last() == Some(&b'/'));
                FeedResult::NeedData
            }
        }
    }
}

impl Default for Parser {
    /// Creates a lenient parser.
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::FeedResult::*;
    use super::*;
    use pretty_assertions::assert_eq;

    fn strict() -> Parser {
        Parser::new(true)
    }

    fn lenient() -> Parser {
        Parser::new(false)
    }

    #[test]
    fn text() {
        let mut parser = strict();
        assert_eq!(parser.feed(b"text with > symbol"), Ok(NeedData));
        assert_eq!(parser.state, State::InText);

        let mut parser = strict();
        assert_eq!(parser.feed(b"text with < symbol"), Ok(EmitText(10)));
        //                       ^^^^^^^^^^
        assert_eq!(parser.state, State::Text);
    }

    #[test]
    fn text_split_before_markup() {
        let mut parser = strict();
        assert_eq!(parser.feed(b"ab"), Ok(NeedData));
        // The text ends before the `<` of the next slice
        assert_eq!(parser.feed(b"<c>"), Ok(EmitText(0)));
        assert_eq!(parser.state, State::Text);
        assert_eq!(parser.feed(b"<c>"), Ok(EmitStartTag(3)));

        let mut parser = strict();
        assert_eq!(parser.feed(b"<c>"), Ok(EmitStartTag(3)));
        assert_eq!(parser.feed(b"d"), Ok(NeedData));
        assert_eq!(parser.feed(b"e"), Ok(NeedData));
        assert_eq!(parser.feed(b"</c>"), Ok(EmitText(0)));
        assert_eq!(parser.feed(b"</c>"), Ok(EmitEndTag(4)));
    }

    #[test]
    fn malformed_markup_split_in_text() {
        let mut parser = lenient();
        assert_eq!(parser.feed(b"a"), Ok(NeedData));
        assert_eq!(parser.feed(b"<"), Ok(EmitText(0)));
        assert_eq!(parser.feed(b"<"), Ok(NeedData));
        assert_eq!(parser.state, State::Markup);
        // Not a markup, so `<1` starts a text
        assert_eq!(parser.feed(b"1"), Ok(NeedData));
        assert_eq!(parser.state, State::InText);
        assert_eq!(parser.feed(b"b<"), Ok(EmitText(1)));
        assert_eq!(parser.finish(), Ok(()));
    }

    #[test]
    fn bom() {
        let mut parser = strict();
        assert_eq!(parser.feed(b"\xEF\xBB\xBF<a>"), Ok(SkipBom(3)));
        assert_eq!(parser.feed(b"<a>"), Ok(EmitStartTag(3)));

        let mut parser = strict();
        assert_eq!(parser.feed(b"\xEF"), Ok(NeedData));
        assert_eq!(parser.feed(b"\xBB"), Ok(NeedData));
        assert_eq!(parser.feed(b"\xBFtext"), Ok(SkipBom(1)));

        // Only at the start of a document
        let mut parser = strict();
        assert_eq!(parser.feed(b"x\xEF\xBB\xBF<"), Ok(EmitText(4)));

        // Not a full BOM is a text
        let mut parser = strict();
        assert_eq!(parser.feed(b"\xEF\xBBx<"), Ok(EmitText(3)));
    }

    #[test]
    fn cdata() {
        let mut parser = strict();
        assert_eq!(parser.feed(b"<![CDATA[cdata"), Ok(NeedData));
        assert!(matches!(parser.state, State::CData(_)));
        assert_eq!(parser.feed(b"]"), Ok(NeedData));
        assert_eq!(parser.feed(b"]"), Ok(NeedData));
        assert_eq!(parser.feed(b">"), Ok(EmitCData(1)));
        assert_eq!(parser.state, State::Text);

        let mut parser = strict();
        assert_eq!(parser.feed(b"<![CD"), Ok(NeedData));
        assert_eq!(parser.feed(b"ATA[]]><trail>"), Ok(EmitCData(7)));

        let mut parser = strict();
        assert_eq!(
            parser.feed(b"<![CDATA[cdata content with ]] and ]> ]]>"),
            //            0                                       ^ = 40
            Ok(EmitCData(41))
        );
        assert_eq!(parser.state, State::Text);
    }

    #[test]
    fn comment() {
        let mut parser = strict();
        assert_eq!(parser.feed(b"<!--"), Ok(NeedData));
        assert!(matches!(parser.state, State::Comment(_)));
        assert_eq!(parser.feed(b"-"), Ok(NeedData));
        assert_eq!(parser.feed(b"-"), Ok(NeedData));
        assert_eq!(parser.feed(b">"), Ok(EmitComment(1)));
        assert_eq!(parser.state, State::Text);

        let mut parser = strict();
        assert_eq!(parser.feed(b"<!-->"), Ok(NeedData));
        assert!(matches!(parser.state, State::Comment(_)));
        assert_eq!(parser.feed(b"-->"), Ok(EmitComment(3)));

        let mut parser = strict();
        assert_eq!(
            parser.feed(b"<!--comment with >, -> and ---->"),
            //            0                              ^ = 31
            Ok(EmitComment(32))
        );
        assert_eq!(parser.state, State::Text);
    }

    mod doctype {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn only_name() {
            let mut parser = strict();
            assert_eq!(parser.feed(b"<!DOCTYPE name>"), Ok(EmitDoctype(15)));
            //                       0             ^ = 14
            assert_eq!(parser.state, State::Text);

            let mut parser = strict();
            assert_eq!(parser.feed(b"<!doctype html>"), Ok(EmitDoctype(15)));
        }

        #[test]
        fn with_external_id() {
            let mut parser = strict();
            assert_eq!(
                parser.feed(b"<!DOCTYPE with SYSTEM \"[>']\">"),
                //            0                             ^ = 28
                Ok(EmitDoctype(29))
            );

            let mut parser = strict();
            assert_eq!(
                parser.feed(b"<!DOCTYPE with PUBLIC \"'\" '[>\"]'>"),
                //            0                                  ^ = 32
                Ok(EmitDoctype(33))
            );
        }

        #[test]
        fn with_subset() {
            let mut parser = strict();
            assert_eq!(
                parser.feed(b"<!DOCTYPE with [<!ENTITY gt '>'>]>"),
                //            0                                ^ = 33
                Ok(EmitDoctype(34))
            );

            let mut parser = strict();
            assert_eq!(
                parser.feed(b"<!DOCTYPE with SYSTEM \">'\" [] >"),
                //            0                               ^ = 30
                Ok(EmitDoctype(31))
            );
        }

        #[test]
        fn split() {
            let mut parser = strict();
            assert_eq!(parser.feed(b"<!DOC"), Ok(NeedData));
            assert_eq!(parser.feed(b"TYPE e ["), Ok(NeedData));
            assert!(matches!(parser.state, State::Subset(_)));
            assert_eq!(parser.feed(b"<!-- ] -->]"), Ok(NeedData));
            assert_eq!(parser.state, State::DoctypeFinish);
            assert_eq!(parser.feed(b" >"), Ok(EmitDoctype(2)));
        }
    }

    #[test]
    fn pi() {
        let mut parser = strict();
        assert_eq!(parser.feed(b"<??>"), Ok(EmitPI(4)));
        assert_eq!(parser.state, State::Text);

        let mut parser = strict();
        assert_eq!(parser.feed(b"<?target?>"), Ok(EmitPI(10)));

        let mut parser = strict();
        assert_eq!(parser.feed(b"<?>?>"), Ok(EmitPI(5)));

        let mut parser = strict();
        assert_eq!(parser.feed(b"<???>"), Ok(EmitPI(5)));
    }

    #[test]
    fn empty() {
        let mut parser = strict();
        assert_eq!(parser.feed(b"<empty/>"), Ok(EmitEmptyTag(8)));
        assert_eq!(parser.state, State::Text);

        let mut parser = strict();
        assert_eq!(
            parser.feed(b"<empty one=\"'/>\" two='\"/>'/>"),
            Ok(EmitEmptyTag(28))
        );

        let mut parser = strict();
        assert_eq!(parser.feed(b"<empty/"), Ok(NeedData));
        assert_eq!(parser.feed(b">"), Ok(EmitEmptyTag(1)));
    }

    #[test]
    fn start() {
        let mut parser = strict();
        assert_eq!(parser.feed(b"<start>"), Ok(EmitStartTag(7)));
        assert_eq!(parser.state, State::Text);

        let mut parser = strict();
        assert_eq!(
            parser.feed(b"<start one=\"'>\" two='\">'>"),
            Ok(EmitStartTag(25))
        );
    }

    #[test]
    fn end() {
        let mut parser = strict();
        assert_eq!(parser.feed(b"</end>"), Ok(EmitEndTag(6)));
        assert_eq!(parser.state, State::Text);

        let mut parser = strict();
        assert_eq!(parser.feed(b"</ \r\n\t>"), Ok(EmitEndTag(7)));

        let mut parser = strict();
        assert_eq!(parser.feed(b"</>"), Ok(EmitEndTag(3)));
    }

    mod strictness {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn invalid_markup_start() {
            let mut parser = strict();
            assert_eq!(parser.feed(b"< a>"), Err(SyntaxError::InvalidMarkupStart));

            let mut parser = strict();
            assert_eq!(parser.feed(b"<>"), Err(SyntaxError::InvalidMarkupStart));

            // `1 < 2` in HTML is a text
            let mut parser = lenient();
            assert_eq!(parser.feed(b"1 < 2<b>"), Ok(EmitText(2)));
            assert_eq!(parser.feed(b"< 2<b>"), Ok(EmitText(3)));
            assert_eq!(parser.feed(b"<b>"), Ok(EmitStartTag(3)));

            let mut parser = lenient();
            assert_eq!(parser.feed(b"<<b>"), Ok(EmitText(1)));
        }

        #[test]
        fn invalid_bang() {
            let mut parser = strict();
            assert_eq!(parser.feed(b"<!x>"), Err(SyntaxError::InvalidBangMarkup));

            let mut parser = strict();
            assert_eq!(parser.feed(b"<![CDATA<"), Err(SyntaxError::InvalidBangMarkup));

            let mut parser = lenient();
            assert_eq!(parser.feed(b"<!x> text<a>"), Ok(EmitText(9)));

            let mut parser = lenient();
            assert_eq!(parser.feed(b"<!DOCT<a>"), Ok(EmitText(6)));
        }

        #[test]
        fn unclosed() {
            let mut parser = strict();
            assert_eq!(parser.feed(b"<!-- comment"), Ok(NeedData));
            assert_eq!(parser.finish(), Err(SyntaxError::UnclosedComment));

            let mut parser = strict();
            assert_eq!(parser.feed(b"<a href='"), Ok(NeedData));
            assert_eq!(parser.finish(), Err(SyntaxError::UnclosedTag));

            let mut parser = strict();
            assert_eq!(parser.feed(b"<?pi"), Ok(NeedData));
            assert_eq!(parser.finish(), Err(SyntaxError::UnclosedPIOrXmlDecl));

            let mut parser = lenient();
            assert_eq!(parser.feed(b"<!-- comment"), Ok(NeedData));
            assert_eq!(parser.finish(), Ok(()));

            let mut parser = strict();
            assert_eq!(parser.feed(b"text"), Ok(NeedData));
            assert_eq!(parser.finish(), Ok(()));
        }
    }
}
