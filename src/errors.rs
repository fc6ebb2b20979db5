//! Error management module

use std::fmt;
use std::io::Error as IoError;
use std::sync::Arc;

use crate::span::Position;

/// An error returned if parsed document does not correspond to the markup
/// grammar: a construct was not terminated, or its inner syntax is broken.
///
/// In [`ParseMode::Html`] most of these conditions are not errors: the
/// offending markup is reported as text instead. Attribute value errors are
/// governed by [`Config::require_well_formed_attribute_values`] in both modes.
///
/// [`ParseMode::Html`]: crate::config::ParseMode::Html
/// [`Config::require_well_formed_attribute_values`]: crate::config::Config::require_well_formed_attribute_values
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxError {
    /// The parser started to parse `<!`, but the input ended before it can recognize
    /// anything, or the following bytes do not start a comment, CDATA or DOCTYPE.
    InvalidBangMarkup,
    /// A `<` was found which is not followed by a name, `!`, `?` or `/`.
    InvalidMarkupStart,
    /// The parser started to parse processing instruction or XML declaration (`<?`),
    /// but the input ended before the `?>` sequence was found.
    UnclosedPIOrXmlDecl,
    /// The parser started to parse comment (`<!--`) content, but the input ended
    /// before the `-->` sequence was found.
    UnclosedComment,
    /// The parser started to parse DOCTYPE (`<!doctype`) content, but the input
    /// ended before the `>` symbol was found.
    UnclosedDoctype,
    /// The parser started to parse `<![CDATA[` content, but the input ended
    /// before the `]]>` sequence was found.
    UnclosedCData,
    /// The parser started to parse tag content, but the input ended
    /// before the `>` symbol was found.
    UnclosedTag,
    /// A start or close tag has no name (`<>`, `</>`, `</ a>`).
    EmptyTagName,
    /// A close tag contains something other than its name and whitespace.
    UnexpectedCloseTagContent,
    /// The DOCTYPE declaration does not follow the
    /// `<!DOCTYPE name (PUBLIC "id" "uri" | SYSTEM "uri")? [subset]?>` grammar.
    MalformedDoctype,
    /// The XML declaration does not follow the
    /// `<?xml version="…" encoding="…"? standalone="…"??>` grammar.
    MalformedXmlDecl,
    /// An attribute has no value (`<input disabled>`) while well-formed
    /// attribute values are required.
    MissingAttributeValue(String),
    /// An attribute value is not enclosed in quotes while well-formed
    /// attribute values are required.
    UnquotedAttributeValue(String),
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidBangMarkup => f.write_str("unknown or missed symbol in markup"),
            Self::InvalidMarkupStart => f.write_str("`<` is not followed by a tag name"),
            Self::UnclosedPIOrXmlDecl => {
                f.write_str("processing instruction or xml declaration not closed: `?>` not found before end of input")
            }
            Self::UnclosedComment => {
                f.write_str("comment not closed: `-->` not found before end of input")
            }
            Self::UnclosedDoctype => {
                f.write_str("DOCTYPE not closed: `>` not found before end of input")
            }
            Self::UnclosedCData => {
                f.write_str("CDATA not closed: `]]>` not found before end of input")
            }
            Self::UnclosedTag => f.write_str("tag not closed: `>` not found before end of input"),
            Self::EmptyTagName => f.write_str("tag has no name"),
            Self::UnexpectedCloseTagContent => {
                f.write_str("close tag may contain only its name and whitespace")
            }
            Self::MalformedDoctype => f.write_str("malformed DOCTYPE declaration"),
            Self::MalformedXmlDecl => f.write_str("malformed XML declaration"),
            Self::MissingAttributeValue(name) => {
                write!(f, "attribute `{}` must have a value", name)
            }
            Self::UnquotedAttributeValue(name) => {
                write!(f, "value of attribute `{}` must be quoted", name)
            }
        }
    }
}

impl std::error::Error for SyntaxError {}

/// An error returned if the document is syntactically correct, but its
/// structure violates the rules selected in the [`Config`].
///
/// [`Config`]: crate::config::Config
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IllFormedError {
    /// A close tag has no corresponding open element. Contains the name of
    /// the close tag.
    UnmatchedCloseTag(String),
    /// A close tag does not match the element open on top of the stack
    /// while balanced elements are required.
    MismatchedCloseTag {
        /// Name of the element open on top of the stack
        expected: String,
        /// Name of the found close tag
        found: String,
    },
    /// Opening `opening` would implicitly close `closed`, which is not allowed
    /// while balanced elements are required.
    ImpliedCloseTag {
        /// Name of the element which would be closed
        closed: String,
        /// Name of the element which is opened
        opening: String,
    },
    /// Document ended while the contained element was still open and balanced
    /// elements are required.
    UnclosedElement(String),
    /// The same attribute name was used twice in one tag.
    DuplicatedAttribute(String),
    /// A second top-level element was found, but only one root is allowed.
    MultipleRootElements(String),
    /// The name of the root element is not the one declared by the DOCTYPE.
    RootElementMismatch {
        /// Element name declared in the DOCTYPE
        doctype: String,
        /// Name of the found root element
        found: String,
    },
    /// An XML declaration was found, but it is forbidden by the configuration.
    ForbiddenXmlDeclaration,
    /// The configuration requires an XML declaration, but none was found
    /// before the root element.
    MissingXmlDeclaration,
    /// An XML declaration found not at the very beginning of the document.
    MisplacedXmlDeclaration,
    /// A DOCTYPE was found, but it is forbidden by the configuration.
    ForbiddenDoctype,
    /// The configuration requires a DOCTYPE, but none was found before the
    /// root element.
    MissingDoctype,
    /// A DOCTYPE found after another DOCTYPE or after the root element.
    MisplacedDoctype,
}

impl fmt::Display for IllFormedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnmatchedCloseTag(name) => {
                write!(f, "close tag `</{}>` does not match any open element", name)
            }
            Self::MismatchedCloseTag { expected, found } => write!(
                f,
                "expected `</{}>`, but `</{}>` was found",
                expected, found
            ),
            Self::ImpliedCloseTag { closed, opening } => write!(
                f,
                "opening `<{}>` would implicitly close `<{}>`",
                opening, closed
            ),
            Self::UnclosedElement(name) => {
                write!(f, "element `<{}>` was not closed before end of input", name)
            }
            Self::DuplicatedAttribute(name) => {
                write!(f, "attribute `{}` appears more than once in one tag", name)
            }
            Self::MultipleRootElements(name) => write!(
                f,
                "element `<{}>` found at top level, but the document already has a root",
                name
            ),
            Self::RootElementMismatch { doctype, found } => write!(
                f,
                "root element `<{}>` does not match DOCTYPE name `{}`",
                found, doctype
            ),
            Self::ForbiddenXmlDeclaration => f.write_str("XML declaration is not allowed"),
            Self::MissingXmlDeclaration => {
                f.write_str("XML declaration is required before the root element")
            }
            Self::MisplacedXmlDeclaration => {
                f.write_str("XML declaration is allowed only at the beginning of a document")
            }
            Self::ForbiddenDoctype => f.write_str("DOCTYPE is not allowed"),
            Self::MissingDoctype => f.write_str("DOCTYPE is required before the root element"),
            Self::MisplacedDoctype => f.write_str(
                "DOCTYPE is allowed only once, after the XML declaration and before the root element",
            ),
        }
    }
}

impl std::error::Error for IllFormedError {}

/// The error type used by this crate.
#[derive(Clone, Debug)]
pub enum Error {
    /// Error while reading from the input stream.
    Io(Arc<IoError>),
    /// The document does not conform to the markup grammar.
    Syntax {
        /// What went wrong
        cause: SyntaxError,
        /// Where the offending construct starts
        position: Position,
    },
    /// The document is well-formed markup, but violates a structural rule
    /// selected in the configuration.
    IllFormed {
        /// What went wrong
        cause: IllFormedError,
        /// Where the offending construct starts
        position: Position,
    },
    /// A [`MarkupHandler`] failed to process an event.
    ///
    /// [`MarkupHandler`]: crate::handler::MarkupHandler
    Handler(Arc<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Returns the position of the markup which caused the error, if the
    /// error is about markup.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Syntax { position, .. } | Self::IllFormed { position, .. } => Some(*position),
            Self::Io(_) | Self::Handler(_) => None,
        }
    }

    /// Wraps an error raised by a handler.
    pub fn handler<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Handler(Arc::new(error))
    }

    #[inline]
    pub(crate) fn syntax(cause: SyntaxError, position: Position) -> Self {
        Self::Syntax { cause, position }
    }

    #[inline]
    pub(crate) fn ill_formed(cause: IllFormedError, position: Position) -> Self {
        Self::IllFormed { cause, position }
    }
}

impl From<IoError> for Error {
    /// Creates a new `Error::Io` from the given error
    #[inline]
    fn from(error: IoError) -> Error {
        Self::Io(Arc::new(error))
    }
}

/// A specialized `Result` type where the error is hard-wired to [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Syntax { cause, position } => {
                write!(f, "syntax error at {}: {}", position, cause)
            }
            Self::IllFormed { cause, position } => {
                write!(f, "ill-formed document at {}: {}", position, cause)
            }
            Self::Handler(e) => write!(f, "handler error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Syntax { cause, .. } => Some(cause),
            Self::IllFormed { cause, .. } => Some(cause),
            Self::Handler(e) => Some(e.as_ref()),
        }
    }
}
