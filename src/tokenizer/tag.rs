//! Start and close tags: attributes and element balancing.

use super::{Locator, Tokenizer};
use crate::errors::{Error, IllFormedError, Result, SyntaxError};
use crate::handler::{Attribute, AttributeValue, Flow, MarkupHandler};
use crate::span::{Position, Span};
use crate::stack::CloseOutcome;
use crate::utils::{is_whitespace, lossy, names_equal, whitespace_len};

impl Tokenizer {
    /// Reports `<name attributes>` or `<name attributes/>`.
    pub(super) fn start_tag<H: MarkupHandler>(
        &mut self,
        buf: &[u8],
        start: usize,
        end: usize,
        minimized: bool,
        handler: &mut H,
    ) -> Result<Flow> {
        let raw = &buf[start..end];
        let position = self.position;
        // Without `/>` or `>`
        let body_end = raw.len() - if minimized { 2 } else { 1 };
        let name_end = 1 + raw[1..body_end]
            .iter()
            .position(|&b| is_whitespace(b))
            .unwrap_or(body_end - 1);
        let name = &raw[1..name_end];

        let definition = self.classify(name);

        if let Some(rule) = definition.as_deref().and_then(|d| d.close_rule()) {
            let count = self.stack.implied_closes(rule);
            if count > 0 {
                if self.config.requires_balance() {
                    let closed = self.stack.top().map(lossy).unwrap_or_default();
                    return Err(Error::ill_formed(
                        IllFormedError::ImpliedCloseTag {
                            closed,
                            opening: lossy(name),
                        },
                        position,
                    ));
                }
                if let Flow::Stop = self.auto_close(count, position, handler)? {
                    return Ok(Flow::Stop);
                }
            }
        }
        if self.stack.is_empty() {
            self.check_root(name, position)?;
        }

        let mut loc = Locator::new(start, position, buf);
        let name_span = loc.span(1, name_end);
        // Void elements never have content, even if the tag is not minimized
        let standalone = minimized || definition.map_or(false, |d| d.is_void());
        if standalone {
            emit!(self, handler.standalone_element_start(buf, name_span, minimized));
        } else {
            self.stack.push(name, position);
            emit!(self, handler.open_element_start(buf, name_span));
        }

        if let Flow::Stop = self.attributes(raw, name_end, body_end, &mut loc, handler)? {
            return Ok(Flow::Stop);
        }

        if standalone {
            emit!(self, handler.standalone_element_end(buf, name_span, minimized));
        } else {
            emit!(self, handler.open_element_end(buf, name_span));
        }
        Ok(Flow::Continue)
    }

    /// Reports attributes and whitespace of `raw[from..to]`.
    fn attributes<H: MarkupHandler>(
        &mut self,
        raw: &[u8],
        from: usize,
        to: usize,
        loc: &mut Locator,
        handler: &mut H,
    ) -> Result<Flow> {
        let buf = loc.buf;
        self.attributes.clear();

        let mut i = from;
        while i < to {
            let ws = whitespace_len(&raw[i..to]);
            if ws > 0 {
                emit!(self, handler.inner_whitespace(buf, loc.span(i, i + ws)));
                i += ws;
                continue;
            }

            // The first byte always belongs to the name, even if it is `=`
            let name_end = i + 1 + raw[i + 1..to]
                .iter()
                .position(|&b| is_whitespace(b) || b == b'=')
                .unwrap_or(to - i - 1);
            let name = &raw[i..name_end];
            let name_position = loc.position(i);

            if self.config.require_unique_attributes {
                let case_sensitive = self.config.case_sensitive;
                if self
                    .attributes
                    .iter()
                    .any(|&(s, e)| names_equal(&raw[s..e], name, case_sensitive))
                {
                    return Err(Error::ill_formed(
                        IllFormedError::DuplicatedAttribute(lossy(name)),
                        name_position,
                    ));
                }
                self.attributes.push((i, name_end));
            }

            let eq = name_end + whitespace_len(&raw[name_end..to]);
            let mut attribute = Attribute {
                name: loc.span(i, name_end),
                operator: None,
                value: None,
            };
            i = name_end;

            if eq < to && raw[eq] == b'=' {
                let value_start = eq + 1 + whitespace_len(&raw[eq + 1..to]);
                attribute.operator = Some(loc.span(name_end, value_start));
                i = value_start;

                if value_start < to {
                    let quote = raw[value_start];
                    let closing = match quote {
                        b'"' | b'\'' => memchr::memchr(quote, &raw[value_start + 1..to]),
                        _ => None,
                    };
                    let value = match closing {
                        Some(len) => {
                            let close = value_start + 1 + len;
                            i = close + 1;
                            AttributeValue {
                                outer: loc.span(value_start, i),
                                content: loc.span(value_start + 1, close),
                            }
                        }
                        None => {
                            if self.config.require_well_formed_attribute_values {
                                return Err(Error::syntax(
                                    SyntaxError::UnquotedAttributeValue(lossy(name)),
                                    name_position,
                                ));
                            }
                            i = value_start
                                + raw[value_start..to]
                                    .iter()
                                    .position(|&b| is_whitespace(b))
                                    .unwrap_or(to - value_start);
                            let span = loc.span(value_start, i);
                            AttributeValue {
                                outer: span,
                                content: span,
                            }
                        }
                    };
                    attribute.value = Some(value);
                }
            }

            if attribute.value.is_none() && self.config.require_well_formed_attribute_values {
                return Err(Error::syntax(
                    SyntaxError::MissingAttributeValue(lossy(name)),
                    name_position,
                ));
            }
            emit!(self, handler.attribute(buf, &attribute));
        }
        Ok(Flow::Continue)
    }

    /// Reports `</name>`.
    pub(super) fn end_tag<H: MarkupHandler>(
        &mut self,
        buf: &[u8],
        start: usize,
        end: usize,
        handler: &mut H,
    ) -> Result<Flow> {
        let raw = &buf[start..end];
        let position = self.position;
        // Without `</` and `>`
        let body = &raw[2..raw.len() - 1];
        let name_len = body
            .iter()
            .position(|&b| is_whitespace(b))
            .unwrap_or(body.len());
        if name_len == 0 {
            if self.config.is_strict() {
                return Err(Error::syntax(SyntaxError::EmptyTagName, position));
            }
            return self.text(buf, start, end, handler);
        }
        let name = &body[..name_len];
        let trail = &body[name_len..];
        let ws = whitespace_len(trail);
        let whitespace = if ws < trail.len() {
            if self.config.is_strict() {
                return Err(Error::syntax(
                    SyntaxError::UnexpectedCloseTagContent,
                    position,
                ));
            }
            warn!(
                "ignoring content of close tag `</{}>` at {}: {:?}",
                lossy(name),
                position,
                lossy(&trail[ws..])
            );
            None
        } else if ws > 0 {
            Some((2 + name_len, 2 + name_len + ws))
        } else {
            None
        };

        let is_void = self.classify(name).map_or(false, |d| d.is_void());
        let outcome = if is_void {
            CloseOutcome::Unmatched
        } else {
            self.stack.find_close(name, self.config.case_sensitive)
        };

        match outcome {
            CloseOutcome::Matched => {}
            CloseOutcome::AutoClosed(count) => {
                if self.config.requires_balance() {
                    let expected = self.stack.top().map(lossy).unwrap_or_default();
                    return Err(Error::ill_formed(
                        IllFormedError::MismatchedCloseTag {
                            expected,
                            found: lossy(name),
                        },
                        position,
                    ));
                }
                if let Flow::Stop = self.auto_close(count, position, handler)? {
                    return Ok(Flow::Stop);
                }
            }
            CloseOutcome::Unmatched => {
                if self.config.requires_balance() || self.config.no_unmatched_close_elements {
                    let cause = match self.stack.top() {
                        Some(expected) if !is_void && self.config.requires_balance() => {
                            IllFormedError::MismatchedCloseTag {
                                expected: lossy(expected),
                                found: lossy(name),
                            }
                        }
                        _ => IllFormedError::UnmatchedCloseTag(lossy(name)),
                    };
                    return Err(Error::ill_formed(cause, position));
                }
                trace!("unmatched close tag `</{}>` at {}", lossy(name), position);
            }
        }

        let mut loc = Locator::new(start, position, buf);
        let name_span = loc.span(2, 2 + name_len);
        let whitespace = whitespace.map(|(from, to)| loc.span(from, to));
        if let CloseOutcome::Unmatched = outcome {
            emit!(self, handler.unmatched_close_element_start(buf, name_span));
            if let Some(ws) = whitespace {
                emit!(self, handler.inner_whitespace(buf, ws));
            }
            emit!(self, handler.unmatched_close_element_end(buf, name_span));
        } else {
            self.stack.pop();
            emit!(self, handler.close_element_start(buf, name_span));
            if let Some(ws) = whitespace {
                emit!(self, handler.inner_whitespace(buf, ws));
            }
            emit!(self, handler.close_element_end(buf, name_span));
        }
        Ok(Flow::Continue)
    }

    /// Closes `count` elements from the top of the stack without close tags.
    fn auto_close<H: MarkupHandler>(
        &mut self,
        count: usize,
        position: Position,
        handler: &mut H,
    ) -> Result<Flow> {
        for _ in 0..count {
            let name = match self.stack.top() {
                Some(name) => name,
                None => break,
            };
            trace!("auto-closing `<{}>` at {}", lossy(name), position);
            let span = Span::new(0, name.len(), position);
            emit!(self, handler.auto_close_element_start(name, span));
            emit!(self, handler.auto_close_element_end(name, span));
            self.stack.pop();
        }
        Ok(Flow::Continue)
    }
}
