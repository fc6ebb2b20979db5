//! Utility functions for integration tests
#![allow(dead_code)]

use quick_markup::handler::{
    Attribute, DocType, Flow, MarkupHandler, ProcessingInstruction, XmlDeclaration,
};
use quick_markup::{Config, Error, MarkupParser, Position, Result, Span};

fn show(buf: &[u8], span: Span) -> String {
    String::from_utf8_lossy(span.slice(buf)).into_owned()
}

/// Renders every event as one line.
///
/// Element events are rendered once, when they start; the recorder checks
/// that every start is followed by the end of the same kind and name.
#[derive(Debug, Default)]
pub struct Recorder {
    pub lines: Vec<String>,
    /// Whether to record whitespace inside tags
    pub whitespace: bool,
    /// Kind and name of the element event which was started, but not ended
    open: Option<(&'static str, String)>,
}

impl Recorder {
    pub fn with_whitespace() -> Self {
        Self {
            whitespace: true,
            ..Self::default()
        }
    }

    fn start(&mut self, kind: &'static str, buf: &[u8], name: Span) -> Result<Flow> {
        assert_eq!(self.open, None, "{}({}) started inside a tag", kind, show(buf, name));
        let name = show(buf, name);
        self.lines.push(format!("{}({})", kind, name));
        self.open = Some((kind, name));
        Ok(Flow::Continue)
    }

    fn end(&mut self, kind: &'static str, buf: &[u8], name: Span) -> Result<Flow> {
        assert_eq!(self.open.take(), Some((kind, show(buf, name))));
        Ok(Flow::Continue)
    }
}

impl MarkupHandler for Recorder {
    fn document_start(&mut self) -> Result<Flow> {
        self.lines.push("StartDocument".to_string());
        Ok(Flow::Continue)
    }
    fn document_end(&mut self, _: Position) -> Result<Flow> {
        assert_eq!(self.open, None);
        self.lines.push("EndDocument".to_string());
        Ok(Flow::Continue)
    }
    fn xml_declaration(&mut self, buf: &[u8], decl: &XmlDeclaration) -> Result<Flow> {
        let mut line = format!("XmlDecl(version={}", show(buf, decl.version));
        if let Some(encoding) = decl.encoding {
            line += &format!(", encoding={}", show(buf, encoding));
        }
        if let Some(standalone) = decl.standalone {
            line += &format!(", standalone={}", show(buf, standalone));
        }
        self.lines.push(line + ")");
        Ok(Flow::Continue)
    }
    fn doctype(&mut self, buf: &[u8], doctype: &DocType) -> Result<Flow> {
        let mut line = format!("DocType({}", show(buf, doctype.element_name));
        if let Some(public_id) = doctype.public_id {
            line += &format!(", public={}", show(buf, public_id));
        }
        if let Some(system_id) = doctype.system_id {
            line += &format!(", system={}", show(buf, system_id));
        }
        if let Some(subset) = doctype.internal_subset {
            line += &format!(", subset={}", show(buf, subset));
        }
        self.lines.push(line + ")");
        Ok(Flow::Continue)
    }
    fn comment(&mut self, buf: &[u8], content: Span, _: Span) -> Result<Flow> {
        self.lines.push(format!("Comment({})", show(buf, content)));
        Ok(Flow::Continue)
    }
    fn cdata(&mut self, buf: &[u8], content: Span, _: Span) -> Result<Flow> {
        self.lines.push(format!("CData({})", show(buf, content)));
        Ok(Flow::Continue)
    }
    fn text(&mut self, buf: &[u8], text: Span) -> Result<Flow> {
        self.lines.push(format!("Text({})", show(buf, text)));
        Ok(Flow::Continue)
    }
    fn processing_instruction(&mut self, buf: &[u8], pi: &ProcessingInstruction) -> Result<Flow> {
        let line = match pi.content {
            Some(content) => format!("PI({}: {})", show(buf, pi.target), show(buf, content)),
            None => format!("PI({})", show(buf, pi.target)),
        };
        self.lines.push(line);
        Ok(Flow::Continue)
    }
    fn standalone_element_start(&mut self, buf: &[u8], name: Span, minimized: bool) -> Result<Flow> {
        self.start(if minimized { "Minimized" } else { "Standalone" }, buf, name)
    }
    fn standalone_element_end(&mut self, buf: &[u8], name: Span, minimized: bool) -> Result<Flow> {
        self.end(if minimized { "Minimized" } else { "Standalone" }, buf, name)
    }
    fn open_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        self.start("Open", buf, name)
    }
    fn open_element_end(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        self.end("Open", buf, name)
    }
    fn close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        self.start("Close", buf, name)
    }
    fn close_element_end(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        self.end("Close", buf, name)
    }
    fn auto_close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        assert_eq!(name.offset, 0);
        assert_eq!(name.len, buf.len());
        self.start("AutoClose", buf, name)
    }
    fn auto_close_element_end(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        self.end("AutoClose", buf, name)
    }
    fn unmatched_close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        self.start("Unmatched", buf, name)
    }
    fn unmatched_close_element_end(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        self.end("Unmatched", buf, name)
    }
    fn attribute(&mut self, buf: &[u8], attribute: &Attribute) -> Result<Flow> {
        assert!(self.open.is_some(), "attribute outside of a tag");
        let line = match attribute.value {
            Some(value) => format!("Attr({}={})", show(buf, attribute.name), show(buf, value.outer)),
            None => format!("Attr({})", show(buf, attribute.name)),
        };
        self.lines.push(line);
        Ok(Flow::Continue)
    }
    fn inner_whitespace(&mut self, buf: &[u8], whitespace: Span) -> Result<Flow> {
        assert!(self.open.is_some(), "whitespace outside of a tag");
        if self.whitespace {
            self.lines.push(format!("Whitespace({:?})", show(buf, whitespace)));
        }
        Ok(Flow::Continue)
    }
}

/// Parses `input` and returns the rendered events.
#[track_caller]
pub fn parse(config: Config, input: &str) -> Vec<String> {
    let mut recorder = Recorder::default();
    if let Err(e) = MarkupParser::new(config).parse_str(input, &mut recorder) {
        panic!("unexpected error {} after {:#?}", e, recorder.lines);
    }
    recorder.lines
}

/// Parses `input` expecting an error.
#[track_caller]
pub fn parse_err(config: Config, input: &str) -> Error {
    let mut recorder = Recorder::default();
    match MarkupParser::new(config).parse_str(input, &mut recorder) {
        Ok(_) => panic!("expected an error, but got {:#?}", recorder.lines),
        Err(e) => e,
    }
}

/// Compares rendered events with lines of `expected`, ignoring indentation.
#[track_caller]
pub fn check(config: Config, input: &str, expected: &str) {
    let expected: Vec<_> = expected
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    pretty_assertions::assert_eq!(parse(config, input), expected);
}
