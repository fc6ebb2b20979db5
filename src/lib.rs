//! High performance event-driven HTML/XML markup parser.
//!
//! The parser scans a document once, left to right, and reports what it
//! finds (tags, attributes, text, comments, CDATA sections, DOCTYPE, XML
//! declaration and processing instructions) to a [`MarkupHandler`]. No tree
//! is built and nothing is copied: every event refers to the parsed bytes
//! through [`Span`]s which also carry the line and column of the construct.
//!
//! HTML found in the wild is rarely well-formed. In [`ParseMode::Html`] the
//! parser knows which elements can never have content (`<br>`, `<img>`, ...)
//! and which elements are implicitly closed by their siblings (`<li>`, `<p>`,
//! `<td>`, ...), and reports the close tags the author left out as synthetic
//! auto-close events. [`ParseMode::Xml`] instead requires a well-formed
//! document and fails at the first violation.
//!
//! ## Example
//!
//! ```
//! use quick_markup::handler::{Flow, MarkupHandler};
//! use quick_markup::{MarkupParser, Result, Span};
//!
//! /// Renders the element structure of a document
//! #[derive(Default)]
//! struct Outline(Vec<String>);
//!
//! impl MarkupHandler for Outline {
//!     fn open_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
//!         self.0.push(format!("+{}", String::from_utf8_lossy(name.slice(buf))));
//!         Ok(Flow::Continue)
//!     }
//!     fn close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
//!         self.0.push(format!("-{}", String::from_utf8_lossy(name.slice(buf))));
//!         Ok(Flow::Continue)
//!     }
//!     fn auto_close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
//!         self.0.push(format!("~{}", String::from_utf8_lossy(name.slice(buf))));
//!         Ok(Flow::Continue)
//!     }
//! }
//!
//! let mut outline = Outline::default();
//! MarkupParser::default().parse_str("<ul><li>one<li>two</ul>", &mut outline)?;
//! assert_eq!(outline.0, ["+ul", "+li", "~li", "+li", "~li", "-ul"]);
//! # Ok::<(), quick_markup::Error>(())
//! ```
//!
//! ## Optional features
//!
//! The following features are available:
#![cfg_attr(
    feature = "document-features",
    cfg_attr(doc, doc = ::document_features::document_features!())
)]
//!
//! [`ParseMode::Html`]: config::ParseMode::Html
//! [`ParseMode::Xml`]: config::ParseMode::Xml
#![forbid(unsafe_code)]
#![deny(missing_docs)]
// Enable feature requirements in the docs from 1.57
// See https://stackoverflow.com/questions/61417452
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[macro_use]
extern crate log;

pub mod config;
pub mod elements;
pub mod errors;
pub mod handler;
pub mod parser;
pub mod reader;
pub mod span;
pub mod stack;
mod tokenizer;
mod utils;
pub mod writer;

// reexports
pub use crate::config::Config;
pub use crate::errors::{Error, Result};
pub use crate::handler::{Flow, MarkupHandler};
pub use crate::reader::{MarkupParser, ParseSummary};
pub use crate::span::{Position, Span};
pub use crate::writer::MarkupWriter;
