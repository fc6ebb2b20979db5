//! Parser configuration.
//!
//! A [`Config`] is selected once when a [`MarkupParser`] is created and is
//! applied uniformly to every document it parses. Two presets are provided:
//! [`Config::html()`] for lenient, browser-like parsing of HTML and
//! [`Config::xml()`] for strict parsing of well-formed XML. Individual fields
//! can be changed after picking a preset:
//!
//! ```
//! use quick_markup::config::{Config, ElementBalancing};
//!
//! let mut config = Config::html();
//! config.element_balancing = ElementBalancing::RequireBalanced;
//! config.require_unique_attributes = true;
//! ```
//!
//! [`MarkupParser`]: crate::reader::MarkupParser

/// Selects which markup dialect the parser understands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum ParseMode {
    /// Elements are classified according to HTML: void elements never have
    /// content, and some elements implicitly close their open siblings.
    /// Markup that cannot be recognized is reported as text.
    Html,
    /// Every element is an ordinary element. Markup that cannot be
    /// recognized is a syntax error.
    Xml,
}

/// Controls what happens when the element structure of a document is not
/// explicitly balanced.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum ElementBalancing {
    /// Balancing is not required. Implied close tags are synthesized as
    /// auto-close events, close tags without an open element are reported
    /// as unmatched, and elements left open at the end of the document are
    /// abandoned.
    AutoClose,
    /// Every opened element must be explicitly closed in the right order.
    /// Anything that would need an auto-close or unmatched-close event is an
    /// error.
    RequireBalanced,
}

/// Whether a part of the document prolog must, may or must not be present.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum PrologPresence {
    /// The construct may appear (once, at its place in the prolog).
    Allowed,
    /// The construct must appear before the root element.
    Required,
    /// The construct must not appear.
    Forbidden,
}

/// Controls validation of the number of top-level elements.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum UniqueRootElementPresence {
    /// Only one top-level element is allowed.
    Enabled,
    /// Only one top-level element is allowed if the document has a DOCTYPE.
    DependsOnDoctype,
    /// Any number of top-level elements is allowed.
    NotValidated,
}

/// Parsing policy for one [`MarkupParser`].
///
/// [`MarkupParser`]: crate::reader::MarkupParser
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[non_exhaustive]
pub struct Config {
    /// Markup dialect.
    ///
    /// Default: [`ParseMode::Html`]
    pub mode: ParseMode,

    /// Whether names in close tags must match the case used in the open tag,
    /// and whether attribute names differing only in case are distinct.
    ///
    /// Element classification itself is always case-insensitive.
    ///
    /// Default: `false`
    pub case_sensitive: bool,

    /// What to do with implied or missing close tags.
    ///
    /// Default: [`ElementBalancing::AutoClose`]
    pub element_balancing: ElementBalancing,

    /// Whether a close tag without an open element is an error even when
    /// [`ElementBalancing::AutoClose`] is selected.
    ///
    /// Default: `false`
    pub no_unmatched_close_elements: bool,

    /// Whether the same attribute name may appear only once in a tag.
    ///
    /// Default: `false`
    pub require_unique_attributes: bool,

    /// Whether every attribute must have a value enclosed in quotes.
    ///
    /// Default: `false`
    pub require_well_formed_attribute_values: bool,

    /// How many top-level elements the document may have.
    ///
    /// Default: [`UniqueRootElementPresence::NotValidated`]
    pub unique_root_element: UniqueRootElementPresence,

    /// Presence of the `<?xml …?>` declaration.
    ///
    /// Default: [`PrologPresence::Allowed`]
    pub xml_declaration: PrologPresence,

    /// Presence of the `<!DOCTYPE …>` declaration.
    ///
    /// Default: [`PrologPresence::Allowed`]
    pub doctype: PrologPresence,
}

impl Config {
    /// Lenient configuration for HTML documents as found in the wild.
    pub const fn html() -> Self {
        Self {
            mode: ParseMode::Html,
            case_sensitive: false,
            element_balancing: ElementBalancing::AutoClose,
            no_unmatched_close_elements: false,
            require_unique_attributes: false,
            require_well_formed_attribute_values: false,
            unique_root_element: UniqueRootElementPresence::NotValidated,
            xml_declaration: PrologPresence::Allowed,
            doctype: PrologPresence::Allowed,
        }
    }

    /// Strict configuration for well-formed XML documents.
    pub const fn xml() -> Self {
        Self {
            mode: ParseMode::Xml,
            case_sensitive: true,
            element_balancing: ElementBalancing::RequireBalanced,
            no_unmatched_close_elements: true,
            require_unique_attributes: true,
            require_well_formed_attribute_values: true,
            unique_root_element: UniqueRootElementPresence::DependsOnDoctype,
            xml_declaration: PrologPresence::Allowed,
            doctype: PrologPresence::Allowed,
        }
    }

    /// Returns `true` if malformed markup is an error rather than text.
    #[inline]
    pub const fn is_strict(&self) -> bool {
        matches!(self.mode, ParseMode::Xml)
    }

    /// Returns `true` if implied or missing close tags are errors.
    #[inline]
    pub const fn requires_balance(&self) -> bool {
        matches!(self.element_balancing, ElementBalancing::RequireBalanced)
    }

    /// Returns `true` if the order of the prolog constructs is checked.
    #[inline]
    pub(crate) const fn validates_prolog(&self) -> bool {
        self.is_strict()
            || !matches!(self.xml_declaration, PrologPresence::Allowed)
            || !matches!(self.doctype, PrologPresence::Allowed)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::html()
    }
}
