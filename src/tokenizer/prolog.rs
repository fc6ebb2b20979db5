//! DOCTYPE, XML declaration and processing instructions, and the rules about
//! where they and the root element may appear.

use std::ops::Range;

use super::{Locator, Tokenizer};
use crate::config::{PrologPresence, UniqueRootElementPresence};
use crate::errors::{Error, IllFormedError, Result, SyntaxError};
use crate::handler::{DocType, Flow, MarkupHandler, ProcessingInstruction, XmlDeclaration};
use crate::parser::SubsetParser;
use crate::span::Position;
use crate::utils::{is_whitespace, lossy, names_equal, whitespace_len};

/// What was seen of the document prolog so far.
#[derive(Debug, Default)]
pub(super) struct Prolog {
    /// At least one event was reported
    started: bool,
    xml_declaration: bool,
    /// Name of the root element declared by the DOCTYPE
    doctype: Option<Vec<u8>>,
    /// The first top-level element was opened
    root: bool,
}

impl Prolog {
    #[inline]
    pub fn started(&mut self) {
        self.started = true;
    }

    #[inline]
    pub fn has_root(&self) -> bool {
        self.root
    }
}

impl Tokenizer {
    /// Reports `<!DOCTYPE ...>`.
    pub(super) fn doctype<H: MarkupHandler>(
        &mut self,
        buf: &[u8],
        start: usize,
        end: usize,
        handler: &mut H,
    ) -> Result<Flow> {
        let raw = &buf[start..end];
        let position = self.position;
        let parts = match DoctypeParts::parse(raw) {
            Some(parts) => parts,
            None if self.config.is_strict() => {
                return Err(Error::syntax(SyntaxError::MalformedDoctype, position));
            }
            None => return self.text(buf, start, end, handler),
        };

        if let PrologPresence::Forbidden = self.config.doctype {
            return Err(Error::ill_formed(IllFormedError::ForbiddenDoctype, position));
        }
        if self.config.validates_prolog() && (self.prolog.doctype.is_some() || self.prolog.root) {
            return Err(Error::ill_formed(IllFormedError::MisplacedDoctype, position));
        }
        self.prolog.doctype = Some(raw[parts.name.clone()].to_vec());

        let mut loc = Locator::new(start, position, buf);
        let mut span = |range: Range<usize>| loc.span(range.start, range.end);
        let doctype = DocType {
            outer: span(0..raw.len()),
            keyword: span(2..9),
            element_name: span(parts.name),
            type_keyword: parts.type_keyword.map(&mut span),
            public_id: parts.public_id.map(&mut span),
            system_id: parts.system_id.map(&mut span),
            internal_subset: parts.internal_subset.map(&mut span),
        };
        emit!(self, handler.doctype(buf, &doctype));
        Ok(Flow::Continue)
    }

    /// Reports `<?target content?>` or, for the `xml` target, the XML
    /// declaration.
    pub(super) fn pi<H: MarkupHandler>(
        &mut self,
        buf: &[u8],
        start: usize,
        end: usize,
        handler: &mut H,
    ) -> Result<Flow> {
        let raw = &buf[start..end];
        let position = self.position;
        // Without `<?` and `?>`
        let inner = &raw[2..raw.len() - 2];
        let target_len = inner
            .iter()
            .position(|&b| is_whitespace(b))
            .unwrap_or(inner.len());

        if &inner[..target_len] == b"xml" {
            match XmlDeclParts::parse(raw) {
                Some(parts) => return self.xml_declaration(buf, start, parts, handler),
                None if self.config.is_strict() => {
                    return Err(Error::syntax(SyntaxError::MalformedXmlDecl, position));
                }
                None => {}
            }
        }

        let mut loc = Locator::new(start, position, buf);
        let outer = loc.span(0, raw.len());
        let target = loc.span(2, 2 + target_len);
        let content_start = 2 + target_len + whitespace_len(&inner[target_len..]);
        let content_end = raw.len() - 2;
        let content = if content_start < content_end {
            Some(loc.span(content_start, content_end))
        } else {
            None
        };
        let pi = ProcessingInstruction {
            target,
            content,
            outer,
        };
        emit!(self, handler.processing_instruction(buf, &pi));
        Ok(Flow::Continue)
    }

    fn xml_declaration<H: MarkupHandler>(
        &mut self,
        buf: &[u8],
        start: usize,
        parts: XmlDeclParts,
        handler: &mut H,
    ) -> Result<Flow> {
        let position = self.position;
        if let PrologPresence::Forbidden = self.config.xml_declaration {
            return Err(Error::ill_formed(
                IllFormedError::ForbiddenXmlDeclaration,
                position,
            ));
        }
        if self.config.validates_prolog() && (self.prolog.started || self.prolog.xml_declaration) {
            return Err(Error::ill_formed(
                IllFormedError::MisplacedXmlDeclaration,
                position,
            ));
        }
        self.prolog.xml_declaration = true;

        let mut loc = Locator::new(start, position, buf);
        let mut span = |range: Range<usize>| loc.span(range.start, range.end);
        let declaration = XmlDeclaration {
            outer: span(0..parts.len),
            keyword: span(2..5),
            version: span(parts.version),
            encoding: parts.encoding.map(&mut span),
            standalone: parts.standalone.map(&mut span),
        };
        emit!(self, handler.xml_declaration(buf, &declaration));
        Ok(Flow::Continue)
    }

    /// Checks an element opened at the top level of the document.
    pub(super) fn check_root(&mut self, name: &[u8], position: Position) -> Result<()> {
        let unique = match self.config.unique_root_element {
            UniqueRootElementPresence::Enabled => true,
            UniqueRootElementPresence::DependsOnDoctype => self.prolog.doctype.is_some(),
            UniqueRootElementPresence::NotValidated => false,
        };
        if self.prolog.root {
            if unique {
                return Err(Error::ill_formed(
                    IllFormedError::MultipleRootElements(lossy(name)),
                    position,
                ));
            }
            return Ok(());
        }
        self.prolog.root = true;
        self.check_required_prolog(position)?;

        if let (true, Some(doctype)) = (unique, &self.prolog.doctype) {
            if !names_equal(doctype, name, self.config.case_sensitive) {
                return Err(Error::ill_formed(
                    IllFormedError::RootElementMismatch {
                        doctype: lossy(doctype),
                        found: lossy(name),
                    },
                    position,
                ));
            }
        }
        Ok(())
    }

    /// Checks that the required parts of the prolog were seen before the
    /// root element or the end of the document.
    pub(super) fn check_required_prolog(&self, position: Position) -> Result<()> {
        if let (PrologPresence::Required, false) =
            (self.config.xml_declaration, self.prolog.xml_declaration)
        {
            return Err(Error::ill_formed(
                IllFormedError::MissingXmlDeclaration,
                position,
            ));
        }
        if let (PrologPresence::Required, None) = (self.config.doctype, &self.prolog.doctype) {
            return Err(Error::ill_formed(IllFormedError::MissingDoctype, position));
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Ranges of the fields of a DOCTYPE declaration, relative to its `<!`.
#[derive(Debug, PartialEq, Eq)]
struct DoctypeParts {
    name: Range<usize>,
    type_keyword: Option<Range<usize>>,
    public_id: Option<Range<usize>>,
    system_id: Option<Range<usize>>,
    internal_subset: Option<Range<usize>>,
}

impl DoctypeParts {
    /// Splits `<!DOCTYPE name (PUBLIC "id" "uri"? | SYSTEM "uri")? [subset]? >`.
    fn parse(raw: &[u8]) -> Option<Self> {
        // `<!DOCTYPE` was checked by the parser
        let mut i = 9;
        let end = raw.len() - 1;
        let ws = whitespace_len(&raw[i..end]);
        if ws == 0 {
            return None;
        }
        i += ws;

        let name_end = i + raw[i..end]
            .iter()
            .position(|&b| is_whitespace(b) || b == b'[')
            .unwrap_or(end - i);
        if name_end == i {
            return None;
        }
        let mut parts = Self {
            name: i..name_end,
            type_keyword: None,
            public_id: None,
            system_id: None,
            internal_subset: None,
        };
        i = name_end + whitespace_len(&raw[name_end..end]);

        let keyword = |i: usize, word: &[u8]| {
            let after = i + word.len();
            after < end && raw[i..after].eq_ignore_ascii_case(word) && is_whitespace(raw[after])
        };
        if keyword(i, b"PUBLIC") {
            parts.type_keyword = Some(i..i + 6);
            i += 6;
            i += whitespace_len(&raw[i..end]);
            let (public_id, next) = literal(raw, i, end)?;
            parts.public_id = Some(public_id);
            i = next + whitespace_len(&raw[next..end]);
            // The system identifier is optional after a public one (HTML 4)
            if let Some((system_id, next)) = literal(raw, i, end) {
                parts.system_id = Some(system_id);
                i = next + whitespace_len(&raw[next..end]);
            }
        } else if keyword(i, b"SYSTEM") {
            parts.type_keyword = Some(i..i + 6);
            i += 6;
            i += whitespace_len(&raw[i..end]);
            let (system_id, next) = literal(raw, i, end)?;
            parts.system_id = Some(system_id);
            i = next + whitespace_len(&raw[next..end]);
        }

        if i < end && raw[i] == b'[' {
            let from = i + 1;
            let len = SubsetParser::default().feed(&raw[from..end])?;
            parts.internal_subset = Some(from..from + len);
            i = from + len + 1;
            i += whitespace_len(&raw[i..end]);
        }

        if i == end {
            Some(parts)
        } else {
            None
        }
    }
}

/// Ranges of the pseudo-attribute values of an XML declaration, relative to
/// its `<?`.
#[derive(Debug, PartialEq, Eq)]
struct XmlDeclParts {
    version: Range<usize>,
    encoding: Option<Range<usize>>,
    standalone: Option<Range<usize>>,
    /// Length of the whole declaration
    len: usize,
}

impl XmlDeclParts {
    /// Splits `<?xml version="…" encoding="…"? standalone="…"? ?>`.
    fn parse(raw: &[u8]) -> Option<Self> {
        let end = raw.len() - 2;
        let mut i = 5;
        let mut values: [Option<Range<usize>>; 3] = [None, None, None];
        let mut next_allowed = 0;

        loop {
            let ws = whitespace_len(&raw[i..end]);
            i += ws;
            if i == end {
                break;
            }
            // Pseudo-attributes are separated by whitespace
            if ws == 0 {
                return None;
            }
            let name_end = i + raw[i..end]
                .iter()
                .position(|&b| is_whitespace(b) || b == b'=')
                .unwrap_or(end - i);
            let index = match &raw[i..name_end] {
                b"version" => 0,
                b"encoding" => 1,
                b"standalone" => 2,
                _ => return None,
            };
            // Only in this order, each at most once
            if index < next_allowed {
                return None;
            }
            next_allowed = index + 1;

            i = name_end + whitespace_len(&raw[name_end..end]);
            if i == end || raw[i] != b'=' {
                return None;
            }
            i += 1;
            i += whitespace_len(&raw[i..end]);
            let (value, next) = literal(raw, i, end)?;
            values[index] = Some(value);
            i = next;
        }

        let [version, encoding, standalone] = values;
        Some(Self {
            version: version?,
            encoding,
            standalone,
            len: raw.len(),
        })
    }
}

/// Finds a quoted literal starting at `raw[at]` and ending before `end`.
/// Returns the range of its content and the offset after the closing quote.
fn literal(raw: &[u8], at: usize, end: usize) -> Option<(Range<usize>, usize)> {
    let quote = *raw[..end].get(at)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = memchr::memchr(quote, &raw[at + 1..end])?;
    Some((at + 1..at + 1 + len, at + len + 2))
}
