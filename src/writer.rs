//! A handler which writes parsed markup back.

use std::io::Write;

use crate::errors::Result;
use crate::handler::{
    Attribute, DocType, Flow, MarkupHandler, ProcessingInstruction, XmlDeclaration,
};
use crate::span::{Position, Span};

/// Markup writer
///
/// Writes every event that corresponds to markup of the parsed document back
/// to the underlying writer, exactly as it was written in the source.
/// Synthetic auto-close events are skipped, so a document which does not need
/// any implied close tags is reproduced byte for byte.
///
/// ```
/// use quick_markup::{MarkupParser, MarkupWriter};
///
/// let html = r#"<ul class = "menu"><li>one<li>two<br></ul>"#;
/// let mut writer = MarkupWriter::new(Vec::new());
/// MarkupParser::default().parse_str(html, &mut writer)?;
/// assert_eq!(writer.into_inner(), html.as_bytes());
/// # Ok::<(), quick_markup::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct MarkupWriter<W: Write> {
    /// underlying writer
    writer: W,
}

impl<W: Write> MarkupWriter<W> {
    /// Creates a `MarkupWriter` from a generic writer.
    pub const fn new(inner: W) -> Self {
        Self { writer: inner }
    }

    /// Consumes this `MarkupWriter`, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Get a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Get a reference to the underlying writer.
    pub const fn get_ref(&self) -> &W {
        &self.writer
    }

    #[inline]
    fn write(&mut self, value: &[u8]) -> Result<Flow> {
        self.writer.write_all(value)?;
        Ok(Flow::Continue)
    }

    #[inline]
    fn write_span(&mut self, buf: &[u8], span: Span) -> Result<Flow> {
        self.write(span.slice(buf))
    }
}

impl<W: Write> MarkupHandler for MarkupWriter<W> {
    fn document_end(&mut self, _: Position) -> Result<Flow> {
        self.writer.flush()?;
        Ok(Flow::Continue)
    }

    fn xml_declaration(&mut self, buf: &[u8], declaration: &XmlDeclaration) -> Result<Flow> {
        self.write_span(buf, declaration.outer)
    }

    fn doctype(&mut self, buf: &[u8], doctype: &DocType) -> Result<Flow> {
        self.write_span(buf, doctype.outer)
    }

    fn comment(&mut self, buf: &[u8], _: Span, outer: Span) -> Result<Flow> {
        self.write_span(buf, outer)
    }

    fn cdata(&mut self, buf: &[u8], _: Span, outer: Span) -> Result<Flow> {
        self.write_span(buf, outer)
    }

    fn text(&mut self, buf: &[u8], text: Span) -> Result<Flow> {
        self.write_span(buf, text)
    }

    fn processing_instruction(
        &mut self,
        buf: &[u8],
        instruction: &ProcessingInstruction,
    ) -> Result<Flow> {
        self.write_span(buf, instruction.outer)
    }

    fn standalone_element_start(&mut self, buf: &[u8], name: Span, _: bool) -> Result<Flow> {
        self.write(b"<")?;
        self.write_span(buf, name)
    }

    fn standalone_element_end(&mut self, _: &[u8], _: Span, minimized: bool) -> Result<Flow> {
        let end: &[u8] = if minimized { b"/>" } else { b">" };
        self.write(end)
    }

    fn open_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        self.write(b"<")?;
        self.write_span(buf, name)
    }

    fn open_element_end(&mut self, _: &[u8], _: Span) -> Result<Flow> {
        self.write(b">")
    }

    fn close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        self.write(b"</")?;
        self.write_span(buf, name)
    }

    fn close_element_end(&mut self, _: &[u8], _: Span) -> Result<Flow> {
        self.write(b">")
    }

    fn unmatched_close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        self.close_element_start(buf, name)
    }

    fn unmatched_close_element_end(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        self.close_element_end(buf, name)
    }

    fn attribute(&mut self, buf: &[u8], attribute: &Attribute) -> Result<Flow> {
        self.write_span(buf, attribute.name)?;
        if let Some(operator) = attribute.operator {
            self.write_span(buf, operator)?;
        }
        if let Some(value) = attribute.value {
            self.write_span(buf, value.outer)?;
        }
        Ok(Flow::Continue)
    }

    fn inner_whitespace(&mut self, buf: &[u8], whitespace: Span) -> Result<Flow> {
        self.write_span(buf, whitespace)
    }
}
