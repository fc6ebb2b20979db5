#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use quick_markup::handler::{Attribute, Flow, MarkupHandler};
use quick_markup::{Config, MarkupParser, Result, Span};
use std::io::BufReader;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    config: Config,
    capacity: u8,
    data: &'a [u8],
}

/// Checks that spans of source events point inside the buffer they come with
struct Bounds;

impl Bounds {
    fn check(buf: &[u8], span: Span) -> Result<Flow> {
        assert!(span.end() <= buf.len(), "{:?} outside of {} bytes", span, buf.len());
        Ok(Flow::Continue)
    }
}

impl MarkupHandler for Bounds {
    fn text(&mut self, buf: &[u8], text: Span) -> Result<Flow> {
        Self::check(buf, text)
    }
    fn comment(&mut self, buf: &[u8], _: Span, outer: Span) -> Result<Flow> {
        Self::check(buf, outer)
    }
    fn open_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        Self::check(buf, name)
    }
    fn auto_close_element_start(&mut self, buf: &[u8], name: Span) -> Result<Flow> {
        Self::check(buf, name)
    }
    fn attribute(&mut self, buf: &[u8], attribute: &Attribute) -> Result<Flow> {
        match attribute.value {
            Some(value) => Self::check(buf, value.outer),
            None => Self::check(buf, attribute.name),
        }
    }
}

fuzz_target!(|input: Input| {
    let parser = MarkupParser::new(input.config);
    let whole = parser.parse_bytes(input.data, &mut Bounds);

    // Splitting the input between reads must not change the outcome
    let reader = BufReader::with_capacity(usize::from(input.capacity).max(1), input.data);
    let streamed = parser.parse_reader(reader, &mut Bounds);
    match (whole, streamed) {
        (Ok(whole), Ok(streamed)) => assert_eq!(whole, streamed),
        (Err(whole), Err(streamed)) => {
            assert_eq!(whole.position(), streamed.position());
            assert_eq!(whole.to_string(), streamed.to_string());
        }
        (whole, streamed) => panic!("{:?} != {:?}", whole, streamed),
    }
});
