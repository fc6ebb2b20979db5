//! The consumer side of a parse.
//!
//! A [`MarkupHandler`] receives one call per construct found in the document,
//! strictly in document order. Variable-length artifacts are passed as
//! [`Span`]s into the `buf` argument of the call: nothing is copied out of the
//! input, and a handler which needs to keep some bytes after the call returns
//! has to copy them.
//!
//! Every method has a default implementation which ignores the event, so
//! a handler only implements what it is interested in:
//!
//! ```
//! use quick_markup::handler::{Flow, MarkupHandler};
//! use quick_markup::{MarkupParser, Result, Span};
//!
//! /// Collects names of all elements opened in a document
//! #[derive(Default)]
//! struct Names(Vec<String>);
//!
//! impl MarkupHandler for Names {
//!     fn open_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
//!         self.0.push(String::from_utf8_lossy(name.slice(buf)).into_owned());
//!         Ok(Flow::Continue)
//!     }
//! }
//!
//! let mut names = Names::default();
//! MarkupParser::default().parse_str("<ul><li>one<li>two</ul>", &mut names)?;
//! assert_eq!(names.0, ["ul", "li", "li"]);
//! # Ok::<(), quick_markup::Error>(())
//! ```
//!
//! # Event sequences
//!
//! Element events come in pairs. Between `open_element_start` and
//! `open_element_end` (and between `standalone_element_start` and
//! `standalone_element_end`) the attributes of the tag and the whitespace
//! separating them are reported in source order. Between `close_element_start`
//! and `close_element_end` only whitespace can be reported.
//!
//! `auto_close_element_start` / `auto_close_element_end` are synthetic: they
//! do not correspond to any markup. Their `buf` is the name of the closed
//! element as it was written in its open tag and their span starts at offset 0.
//! Their line and column tell where the markup which implied the close starts.

use crate::errors::Result;
use crate::span::{Position, Span};

/// Tells the parser whether to continue after an event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    /// Deliver the next event.
    Continue,
    /// End the parse successfully. No more events, not even
    /// [`MarkupHandler::document_end`], are delivered.
    Stop,
}

/// An attribute of a start tag: `name`, `name=value`, `name = 'value'`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Attribute {
    /// Name of the attribute
    pub name: Span,
    /// The `=` together with the whitespace around it, if the attribute has
    /// an operator
    pub operator: Option<Span>,
    /// Value of the attribute, if the attribute has a value
    pub value: Option<AttributeValue>,
}

/// A value of an [`Attribute`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AttributeValue {
    /// The value with the quotes, if it is quoted
    pub outer: Span,
    /// The value without the quotes
    pub content: Span,
}

impl AttributeValue {
    /// Returns `true` if the value is enclosed in quotes.
    #[inline]
    pub fn is_quoted(&self) -> bool {
        self.outer.len != self.content.len
    }
}

/// An XML declaration: `<?xml version="1.0" encoding="UTF-8" standalone="yes"?>`.
///
/// Spans of the pseudo-attribute values do not include the quotes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct XmlDeclaration {
    /// The `xml` keyword
    pub keyword: Span,
    /// Value of `version`
    pub version: Span,
    /// Value of `encoding`, if present
    pub encoding: Option<Span>,
    /// Value of `standalone`, if present
    pub standalone: Option<Span>,
    /// The whole declaration, from `<?` to `?>`
    pub outer: Span,
}

/// A document type declaration:
/// `<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">`.
///
/// Spans of the identifiers do not include the quotes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DocType {
    /// The `DOCTYPE` keyword, in any case
    pub keyword: Span,
    /// Name of the root element
    pub element_name: Span,
    /// The `PUBLIC` or `SYSTEM` keyword, if an external identifier is present
    pub type_keyword: Option<Span>,
    /// The public identifier, if present
    pub public_id: Option<Span>,
    /// The system identifier, if present
    pub system_id: Option<Span>,
    /// Content between `[` and `]`, if an internal subset is present
    pub internal_subset: Option<Span>,
    /// The whole declaration, from `<!` to `>`
    pub outer: Span,
}

/// A processing instruction: `<?target content?>`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProcessingInstruction {
    /// The target
    pub target: Span,
    /// Everything after the whitespace following the target up to `?>`, if
    /// not empty
    pub content: Option<Span>,
    /// The whole instruction, from `<?` to `?>`
    pub outer: Span,
}

/// Receiver of parse events.
///
/// Returning an error from any method aborts the parse with that error; use
/// [`Error::handler`] to wrap own errors. Returning [`Flow::Stop`] ends the
/// parse successfully.
///
/// [`Error::handler`]: crate::Error::handler
#[allow(unused_variables)]
pub trait MarkupHandler {
    /// Called once before any other event.
    fn document_start(&mut self) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called once after all other events, with the position after the last
    /// byte of the document.
    fn document_end(&mut self, position: Position) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called for `<?xml ...?>` at the start of a document.
    fn xml_declaration(&mut self, buf: &[u8], declaration: &XmlDeclaration) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called for `<!DOCTYPE ...>`.
    fn doctype(&mut self, buf: &[u8], doctype: &DocType) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called for `<!-- ... -->`. `content` excludes the delimiters.
    fn comment(&mut self, buf: &[u8], content: Span, outer: Span) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called for `<![CDATA[ ... ]]>`. `content` excludes the delimiters.
    fn cdata(&mut self, buf: &[u8], content: Span, outer: Span) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called for character data between markup. Character and entity
    /// references are not resolved.
    fn text(&mut self, buf: &[u8], text: Span) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called for `<?target ...?>` other than an XML declaration.
    fn processing_instruction(
        &mut self,
        buf: &[u8],
        instruction: &ProcessingInstruction,
    ) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called at the start of an element which has no content: a tag closed
    /// with `/>` (`minimized` is `true`), or a void element like `<br>`.
    fn standalone_element_start(&mut self, buf: &[u8], name: Span, minimized: bool) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called after the attributes of an element without content.
    fn standalone_element_end(&mut self, buf: &[u8], name: Span, minimized: bool) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called at the start of a tag which opens an element.
    fn open_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called after the attributes of a tag which opens an element.
    fn open_element_end(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called at the start of a close tag which closes an open element.
    fn close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called at the end of a close tag which closes an open element.
    fn close_element_end(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called when an open element is closed without a close tag.
    fn auto_close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called right after [`Self::auto_close_element_start`].
    fn auto_close_element_end(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called at the start of a close tag which does not close any element.
    fn unmatched_close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called at the end of a close tag which does not close any element.
    fn unmatched_close_element_end(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called for every attribute of a start tag.
    fn attribute(&mut self, buf: &[u8], attribute: &Attribute) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Called for whitespace inside a tag.
    fn inner_whitespace(&mut self, buf: &[u8], whitespace: Span) -> Result<Flow> {
        Ok(Flow::Continue)
    }
}

/// Ignores every event. Useful to check a document without looking at it.
impl MarkupHandler for () {}

impl<H: MarkupHandler + ?Sized> MarkupHandler for &mut H {
    fn document_start(&mut self) -> Result<Flow> {
        (**self).document_start()
    }
    fn document_end(&mut self, position: Position) -> Result<Flow> {
        (**self).document_end(position)
    }
    fn xml_declaration(&mut self, buf: &[u8], declaration: &XmlDeclaration) -> Result<Flow> {
        (**self).xml_declaration(buf, declaration)
    }
    fn doctype(&mut self, buf: &[u8], doctype: &DocType) -> Result<Flow> {
        (**self).doctype(buf, doctype)
    }
    fn comment(&mut self, buf: &[u8], content: Span, outer: Span) -> Result<Flow> {
        (**self).comment(buf, content, outer)
    }
    fn cdata(&mut self, buf: &[u8], content: Span, outer: Span) -> Result<Flow> {
        (**self).cdata(buf, content, outer)
    }
    fn text(&mut self, buf: &[u8], text: Span) -> Result<Flow> {
        (**self).text(buf, text)
    }
    fn processing_instruction(
        &mut self,
        buf: &[u8],
        instruction: &ProcessingInstruction,
    ) -> Result<Flow> {
        (**self).processing_instruction(buf, instruction)
    }
    fn standalone_element_start(&mut self, buf: &[u8], name: Span, minimized: bool) -> Result<Flow> {
        (**self).standalone_element_start(buf, name, minimized)
    }
    fn standalone_element_end(&mut self, buf: &[u8], name: Span, minimized: bool) -> Result<Flow> {
        (**self).standalone_element_end(buf, name, minimized)
    }
    fn open_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        (**self).open_element_start(buf, name)
    }
    fn open_element_end(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        (**self).open_element_end(buf, name)
    }
    fn close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        (**self).close_element_start(buf, name)
    }
    fn close_element_end(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        (**self).close_element_end(buf, name)
    }
    fn auto_close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        (**self).auto_close_element_start(buf, name)
    }
    fn auto_close_element_end(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        (**self).auto_close_element_end(buf, name)
    }
    fn unmatched_close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        (**self).unmatched_close_element_start(buf, name)
    }
    fn unmatched_close_element_end(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        (**self).unmatched_close_element_end(buf, name)
    }
    fn attribute(&mut self, buf: &[u8], attribute: &Attribute) -> Result<Flow> {
        (**self).attribute(buf, attribute)
    }
    fn inner_whitespace(&mut self, buf: &[u8], whitespace: Span) -> Result<Flow> {
        (**self).inner_whitespace(buf, whitespace)
    }
}
