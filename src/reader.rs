//! Entry points of a parse.
//!
//! A [`MarkupParser`] holds a [`Config`] and drives one parse per call,
//! delivering the events of the document to a [`MarkupHandler`]. Documents
//! can be parsed from memory, in which case every event borrows the input
//! directly, or from a [`BufRead`] source:
//!
//! ```
//! use std::io::BufReader;
//! use quick_markup::handler::{Flow, MarkupHandler};
//! use quick_markup::{MarkupParser, Result, Span};
//!
//! #[derive(Default)]
//! struct Texts(String);
//!
//! impl MarkupHandler for Texts {
//!     fn text(&mut self, buf: &[u8], text: Span) -> Result<Flow> {
//!         self.0.push_str(&String::from_utf8_lossy(text.slice(buf)));
//!         Ok(Flow::Continue)
//!     }
//! }
//!
//! let html = "<p>Hello, <b>world</b>!</p>";
//! // A tiny buffer splits the document between reads
//! let reader = BufReader::with_capacity(4, html.as_bytes());
//!
//! let mut texts = Texts::default();
//! let summary = MarkupParser::default().parse_reader(reader, &mut texts)?;
//! assert_eq!(texts.0, "Hello, world!");
//! assert_eq!(summary.position.offset, html.len());
//! assert!(!summary.stopped);
//! # Ok::<(), quick_markup::Error>(())
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::errors::Result;
use crate::handler::{Flow, MarkupHandler};
use crate::span::Position;
use crate::tokenizer::Tokenizer;

/// Outcome of a successful parse.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseSummary {
    /// Position right after the last reported event
    pub position: Position,
    /// Number of events delivered to the handler
    pub events: usize,
    /// `true` if the handler ended the parse with [`Flow::Stop`]
    pub stopped: bool,
}

/// A reusable parser with a fixed configuration.
///
/// The parser itself is immutable: every `parse_*` call creates its own
/// element stack and position counters, so one parser may be shared between
/// threads.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MarkupParser {
    config: Config,
}

impl MarkupParser {
    /// Creates a parser which applies `config` to every document.
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the configuration of this parser.
    #[inline]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Parses a document held in a string.
    #[inline]
    pub fn parse_str<H: MarkupHandler>(&self, input: &str, handler: &mut H) -> Result<ParseSummary> {
        self.parse_bytes(input.as_bytes(), handler)
    }

    /// Parses a document held in a byte slice. The slice is passed as `buf`
    /// to every non-synthetic event.
    pub fn parse_bytes<H: MarkupHandler>(
        &self,
        input: &[u8],
        handler: &mut H,
    ) -> Result<ParseSummary> {
        let started = Instant::now();
        debug!("parsing {} bytes as {:?}", input.len(), self.config.mode);

        let mut tokenizer = Tokenizer::new(self.config);
        let mut flow = tokenizer.start(handler)?;
        if let Flow::Continue = flow {
            flow = tokenizer.scan(input, handler)?;
        }
        if let Flow::Continue = flow {
            flow = tokenizer.finish(input, handler)?;
        }
        Ok(summary(&tokenizer, flow, started))
    }

    /// Parses a document read from `reader`.
    ///
    /// The parser keeps a window with the data of the event being scanned.
    /// Events receive this window as `buf`, so spans of different events may
    /// refer to different windows. Data of reported events is dropped from
    /// the window before the next read.
    pub fn parse_reader<R: BufRead, H: MarkupHandler>(
        &self,
        mut reader: R,
        handler: &mut H,
    ) -> Result<ParseSummary> {
        let started = Instant::now();
        debug!("parsing a stream as {:?}", self.config.mode);

        let mut tokenizer = Tokenizer::new(self.config);
        let mut window = Vec::new();
        let mut flow = tokenizer.start(handler)?;
        while let Flow::Continue = flow {
            let consumed = tokenizer.consumed();
            if consumed > 0 {
                window.drain(..consumed);
                tokenizer.discard(consumed);
            }

            let read = loop {
                match reader.fill_buf() {
                    Ok(chunk) => {
                        window.extend_from_slice(chunk);
                        break chunk.len();
                    }
                    Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            };
            reader.consume(read);

            if read == 0 {
                flow = tokenizer.finish(&window, handler)?;
                break;
            }
            flow = tokenizer.scan(&window, handler)?;
        }
        Ok(summary(&tokenizer, flow, started))
    }

    /// Parses the file at `path`.
    pub fn parse_file<P: AsRef<Path>, H: MarkupHandler>(
        &self,
        path: P,
        handler: &mut H,
    ) -> Result<ParseSummary> {
        let file = File::open(path)?;
        self.parse_reader(BufReader::new(file), handler)
    }
}

fn summary(tokenizer: &Tokenizer, flow: Flow, started: Instant) -> ParseSummary {
    let summary = ParseSummary {
        position: tokenizer.position(),
        events: tokenizer.events(),
        stopped: flow == Flow::Stop,
    };
    debug!(
        "{} {} events up to {} in {:?}",
        if summary.stopped { "stopped after" } else { "parsed" },
        summary.events,
        summary.position,
        started.elapsed()
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::span::Span;
    use pretty_assertions::assert_eq;

    /// Counts texts and stops after the given number of them.
    struct StopAfter(usize);

    impl MarkupHandler for StopAfter {
        fn text(&mut self, _: &[u8], _: Span) -> Result<Flow> {
            self.0 -= 1;
            Ok(if self.0 == 0 { Flow::Stop } else { Flow::Continue })
        }
        fn document_end(&mut self, _: Position) -> Result<Flow> {
            panic!("document_end must not be reported after a stop");
        }
    }

    #[test]
    fn empty() {
        let summary = MarkupParser::default().parse_str("", &mut ()).unwrap();
        // document start and end
        assert_eq!(summary.events, 2);
        assert_eq!(summary.position, Position::START);
        assert!(!summary.stopped);
    }

    #[test]
    fn stop() {
        let mut handler = StopAfter(2);
        let summary = MarkupParser::default()
            .parse_str("one<br>two<br>three", &mut handler)
            .unwrap();
        assert!(summary.stopped);
        assert_eq!(summary.position.offset, 10);
        // document start, text, br start and end, text
        assert_eq!(summary.events, 5);
    }

    #[test]
    fn stop_in_stream() {
        let mut handler = StopAfter(2);
        let input = "one<br>two<br>three";
        let reader = BufReader::with_capacity(3, input.as_bytes());
        let summary = MarkupParser::default()
            .parse_reader(reader, &mut handler)
            .unwrap();
        assert!(summary.stopped);
        assert_eq!(summary.position.offset, 10);
    }

    #[test]
    fn io_error() {
        struct Broken;
        impl io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "broken"))
            }
        }

        let result = MarkupParser::default().parse_reader(BufReader::new(Broken), &mut ());
        match result {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::Other),
            x => panic!("expected an I/O error, but got {:?}", x),
        }
    }

    #[test]
    fn interrupted_read_is_retried() {
        struct Flaky(bool, &'static [u8]);
        impl io::Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.0 = !self.0;
                if self.0 {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "again"));
                }
                let len = self.1.len().min(buf.len());
                buf[..len].copy_from_slice(&self.1[..len]);
                self.1 = &self.1[len..];
                Ok(len)
            }
        }

        let reader = BufReader::with_capacity(2, Flaky(false, b"<a>text</a>"));
        let summary = MarkupParser::new(Config::xml())
            .parse_reader(reader, &mut ())
            .unwrap();
        assert_eq!(summary.position.offset, 11);
        // document start and end, open start and end, text, close start and end
        assert_eq!(summary.events, 7);
    }
}
