//! Turns the boundaries found by the [`Parser`] into handler events.
//!
//! The [`Parser`] only tells where a construct ends. The tokenizer scans the
//! inside of every construct (tag names, attributes, DOCTYPE and XML
//! declaration fields), routes element tags through the [`ElementStack`] and
//! validates the structure of the document against the [`Config`].
//!
//! The tokenizer works over a buffer which may grow between calls to
//! [`Tokenizer::scan`]: data of an event that is split between two reads stays
//! in the buffer until the event is complete.

use std::sync::Arc;

use crate::config::{Config, ParseMode};
use crate::elements::{html_elements, ElementDefinition};
use crate::errors::{Error, IllFormedError, Result};
use crate::handler::{Flow, MarkupHandler};
use crate::parser::{FeedResult, Parser};
use crate::span::{Position, Span};
use crate::stack::ElementStack;
use crate::utils::lossy;

/// Delivers one event to the handler and returns from the current function
/// if the handler asks to stop.
macro_rules! emit {
    ($self:ident, $call:expr) => {
        $self.events += 1;
        if let Flow::Stop = $call? {
            return Ok(Flow::Stop);
        }
    };
}

mod prolog;
mod tag;

use prolog::Prolog;

/// Kind of a construct whose boundaries were found by the [`Parser`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Construct {
    Text,
    CData,
    Comment,
    Doctype,
    PI,
    EmptyTag,
    StartTag,
    EndTag,
}

/// The state of one parse.
pub(crate) struct Tokenizer {
    config: Config,
    parser: Parser,
    stack: ElementStack,
    prolog: Prolog,
    /// Name ranges of the attributes of the current tag, relative to the tag
    attributes: Vec<(usize, usize)>,
    /// Offset in the buffer of the first byte of the next event
    event_start: usize,
    /// Offset in the buffer of the first byte not fed to the parser yet
    scanned: usize,
    /// Position in the document of the byte at `event_start`
    position: Position,
    /// Number of events delivered to the handler
    events: usize,
}

impl Tokenizer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            parser: Parser::new(config.is_strict()),
            stack: ElementStack::new(),
            prolog: Prolog::default(),
            attributes: Vec::new(),
            event_start: 0,
            scanned: 0,
            position: Position::START,
            events: 0,
        }
    }

    /// Number of events delivered so far.
    #[inline]
    pub fn events(&self) -> usize {
        self.events
    }

    /// Position in the document of the first byte not yet reported.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Length of the buffer prefix that was completely reported and may be
    /// removed before the next call to [`Self::scan`].
    #[inline]
    pub fn consumed(&self) -> usize {
        self.event_start
    }

    /// Tells the tokenizer that the first `len` bytes of the buffer were
    /// removed. `len` must not exceed [`Self::consumed`].
    #[inline]
    pub fn discard(&mut self, len: usize) {
        debug_assert!(len <= self.event_start);
        self.event_start -= len;
        self.scanned -= len;
    }

    pub fn start<H: MarkupHandler>(&mut self, handler: &mut H) -> Result<Flow> {
        emit!(self, handler.document_start());
        Ok(Flow::Continue)
    }

    /// Reports every event completely contained in `buf`.
    ///
    /// `buf` must start with the same bytes as the buffer of the previous call,
    /// less the [discarded](Self::discard) ones.
    pub fn scan<H: MarkupHandler>(&mut self, buf: &[u8], handler: &mut H) -> Result<Flow> {
        while self.scanned < buf.len() {
            let result = self
                .parser
                .feed(&buf[self.scanned..])
                .map_err(|cause| Error::syntax(cause, self.position))?;
            let (construct, len) = match result {
                FeedResult::NeedData => {
                    self.scanned = buf.len();
                    break;
                }
                FeedResult::SkipBom(len) => {
                    self.scanned += len;
                    // Offsets count the BOM, columns do not
                    self.position.offset += self.scanned - self.event_start;
                    self.event_start = self.scanned;
                    continue;
                }
                FeedResult::EmitText(len) => (Construct::Text, len),
                FeedResult::EmitCData(len) => (Construct::CData, len),
                FeedResult::EmitComment(len) => (Construct::Comment, len),
                FeedResult::EmitDoctype(len) => (Construct::Doctype, len),
                FeedResult::EmitPI(len) => (Construct::PI, len),
                FeedResult::EmitEmptyTag(len) => (Construct::EmptyTag, len),
                FeedResult::EmitStartTag(len) => (Construct::StartTag, len),
                FeedResult::EmitEndTag(len) => (Construct::EndTag, len),
            };
            self.scanned += len;
            if let Flow::Stop = self.dispatch(construct, buf, handler)? {
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }

    /// Reports the rest of the document after the input ended and checks
    /// the final structure.
    pub fn finish<H: MarkupHandler>(&mut self, buf: &[u8], handler: &mut H) -> Result<Flow> {
        self.parser
            .finish()
            .map_err(|cause| Error::syntax(cause, self.position))?;
        // Trailing text, or unterminated markup of a lenient document
        self.scanned = buf.len();
        if self.event_start < buf.len() {
            if let Flow::Stop = self.dispatch(Construct::Text, buf, handler)? {
                return Ok(Flow::Stop);
            }
        }

        if let Some((name, position)) = self.stack.top_entry() {
            if self.config.requires_balance() {
                return Err(Error::ill_formed(
                    IllFormedError::UnclosedElement(lossy(name)),
                    position,
                ));
            }
            debug!("{} element(s) left open at the end of the document", self.stack.len());
        }
        if !self.prolog.has_root() {
            self.check_required_prolog(self.position)?;
        }

        emit!(self, handler.document_end(self.position));
        Ok(Flow::Continue)
    }

    /// Reports the event `buf[self.event_start..self.scanned]` and moves
    /// after it.
    fn dispatch<H: MarkupHandler>(
        &mut self,
        construct: Construct,
        buf: &[u8],
        handler: &mut H,
    ) -> Result<Flow> {
        let start = self.event_start;
        let end = self.scanned;
        let flow = match construct {
            Construct::Text => self.text(buf, start, end, handler),
            Construct::CData => self.cdata(buf, start, end, handler),
            Construct::Comment => self.comment(buf, start, end, handler),
            Construct::Doctype => self.doctype(buf, start, end, handler),
            Construct::PI => self.pi(buf, start, end, handler),
            Construct::EmptyTag => self.start_tag(buf, start, end, true, handler),
            Construct::StartTag => self.start_tag(buf, start, end, false, handler),
            Construct::EndTag => self.end_tag(buf, start, end, handler),
        }?;
        self.position.advance(&buf[start..end]);
        self.event_start = end;
        self.prolog.started();
        Ok(flow)
    }

    fn text<H: MarkupHandler>(
        &mut self,
        buf: &[u8],
        start: usize,
        end: usize,
        handler: &mut H,
    ) -> Result<Flow> {
        let text = Span::new(start, end - start, self.position);
        emit!(self, handler.text(buf, text));
        Ok(Flow::Continue)
    }

    fn comment<H: MarkupHandler>(
        &mut self,
        buf: &[u8],
        start: usize,
        end: usize,
        handler: &mut H,
    ) -> Result<Flow> {
        let mut loc = Locator::new(start, self.position, buf);
        let outer = loc.span(0, end - start);
        // <!-- ... -->
        let content = loc.span(4, end - start - 3);
        emit!(self, handler.comment(buf, content, outer));
        Ok(Flow::Continue)
    }

    fn cdata<H: MarkupHandler>(
        &mut self,
        buf: &[u8],
        start: usize,
        end: usize,
        handler: &mut H,
    ) -> Result<Flow> {
        let mut loc = Locator::new(start, self.position, buf);
        let outer = loc.span(0, end - start);
        // <![CDATA[ ... ]]>
        let content = loc.span(9, end - start - 3);
        emit!(self, handler.cdata(buf, content, outer));
        Ok(Flow::Continue)
    }

    /// Returns the definition of an element, or `None` if elements are not
    /// classified in the current mode.
    fn classify(&self, name: &[u8]) -> Option<Arc<ElementDefinition>> {
        match self.config.mode {
            ParseMode::Html => Some(html_elements().lookup(name)),
            ParseMode::Xml => None,
        }
    }
}

/// Creates spans for the parts of one event, tracking their line and column.
///
/// Parts must be requested in the order of their start offsets.
struct Locator<'b> {
    buf: &'b [u8],
    /// Offset of the event in `buf`
    start: usize,
    /// Offset in `buf` of the byte at `position`
    cursor: usize,
    position: Position,
}

impl<'b> Locator<'b> {
    fn new(start: usize, position: Position, buf: &'b [u8]) -> Self {
        Self {
            buf,
            start,
            cursor: start,
            position,
        }
    }

    /// Position of the byte at offset `at` of the event.
    fn position(&mut self, at: usize) -> Position {
        let at = self.start + at;
        debug_assert!(at >= self.cursor);
        self.position.advance(&self.buf[self.cursor..at]);
        self.cursor = at;
        self.position
    }

    /// Span of `from..to` of the event.
    fn span(&mut self, from: usize, to: usize) -> Span {
        let position = self.position(from);
        Span::new(self.start + from, to - from, position)
    }
}
