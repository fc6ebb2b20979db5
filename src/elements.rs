//! Element classification.
//!
//! The balancing machine needs to know, for every element name, whether the
//! element can have content at all (void elements like `<br>`) and whether
//! opening it implicitly closes an open sibling (`<li>` closes the previous
//! `<li>`). That knowledge is an [`ElementDefinition`], resolved by name from an
//! [`ElementRepository`].
//!
//! The process-wide repository returned by [`html_elements()`] is seeded with
//! the standard HTML elements. Names not found there are cached as
//! [`ElementKind::Basic`] on first use, so the repository only grows. Lookups
//! from concurrent parses take a shared lock; only the first sight of an
//! unknown name takes the exclusive one.
//!
//! ```
//! use quick_markup::elements::{html_elements, ElementKind};
//! use std::sync::Arc;
//!
//! let div = html_elements().lookup(b"DIV");
//! assert_eq!(div.name(), b"div");
//! assert!(Arc::ptr_eq(&div, &html_elements().lookup(b"Div")));
//!
//! assert!(html_elements().lookup(b"img").is_void());
//! assert_eq!(html_elements().lookup(b"my-widget").kind(), ElementKind::Basic);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::utils::write_byte_string;

/// Names of the elements closed by an auto-closing element, and names of the
/// ancestors at which the search for them stops.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CloseRule {
    /// Open elements that are implicitly closed when this element is opened
    pub closes: &'static [&'static str],
    /// Open elements at which the search for elements to close stops
    pub boundary: &'static [&'static str],
}

impl CloseRule {
    /// Returns `true` if an open element named `name` is implicitly closed.
    #[inline]
    pub fn closes(&self, name: &[u8]) -> bool {
        contains(self.closes, name)
    }

    /// Returns `true` if an open element named `name` stops the search.
    #[inline]
    pub fn stops_at(&self, name: &[u8]) -> bool {
        contains(self.boundary, name)
    }
}

#[inline]
fn contains(set: &[&str], name: &[u8]) -> bool {
    set.iter().any(|n| n.as_bytes().eq_ignore_ascii_case(name))
}

/// Closing policy of an element.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ElementKind {
    /// An ordinary element without special closing policy.
    Basic,
    /// An element that never has content; any close tag for it is unmatched.
    Void,
    /// An element that implicitly closes some open siblings when opened.
    AutoCloser(CloseRule),
    /// A void element that implicitly closes some open siblings.
    VoidAutoCloser(CloseRule),
}

/// Classification of one element name.
///
/// Definitions are shared: every lookup of the same name (in any case)
/// returns the same instance.
#[derive(Clone, Eq, PartialEq)]
pub struct ElementDefinition {
    /// Lowercase name
    name: Box<[u8]>,
    kind: ElementKind,
}

impl ElementDefinition {
    /// Creates a definition, lowercasing the name.
    pub fn new(name: &[u8], kind: ElementKind) -> Self {
        Self {
            name: name.to_ascii_lowercase().into_boxed_slice(),
            kind,
        }
    }

    /// Lowercase name of the element.
    #[inline]
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Closing policy of the element.
    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Returns `true` for [`ElementKind::Void`] and [`ElementKind::VoidAutoCloser`].
    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self.kind, ElementKind::Void | ElementKind::VoidAutoCloser(_))
    }

    /// Returns the close rule of auto-closing elements.
    #[inline]
    pub fn close_rule(&self) -> Option<&CloseRule> {
        match &self.kind {
            ElementKind::AutoCloser(rule) | ElementKind::VoidAutoCloser(rule) => Some(rule),
            ElementKind::Basic | ElementKind::Void => None,
        }
    }
}

impl fmt::Debug for ElementDefinition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ElementDefinition {{ name: ")?;
        write_byte_string(f, &self.name)?;
        write!(f, ", kind: {:?} }}", self.kind)
    }
}

/// A name-unique, case-insensitive collection of [`ElementDefinition`]s.
///
/// Definitions are kept sorted by name, so a lookup is a binary search that
/// does not allocate. A miss inserts a new [`ElementKind::Basic`] definition
/// under the write lock after searching again: when several threads miss the
/// same name at once, the first insert wins and the others return the winner,
/// dropping their own candidate.
#[derive(Debug, Default)]
pub struct ElementRepository {
    definitions: RwLock<Vec<Arc<ElementDefinition>>>,
}

impl ElementRepository {
    /// Creates an empty repository. Every name resolves to a basic element.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with the standard HTML elements.
    pub fn with_html_elements() -> Self {
        let mut definitions: Vec<_> = HTML_ELEMENTS
            .iter()
            .map(|(name, kind)| Arc::new(ElementDefinition::new(name.as_bytes(), *kind)))
            .collect();
        definitions.sort_by(|a, b| compare(&a.name, &b.name));
        definitions.dedup_by(|a, b| a.name == b.name);
        Self {
            definitions: RwLock::new(definitions),
        }
    }

    /// Resolves `name` (in any case) to its definition. Never fails: unknown
    /// names are inserted as basic elements and reused afterwards.
    pub fn lookup(&self, name: &[u8]) -> Arc<ElementDefinition> {
        {
            let definitions = self.definitions.read().unwrap_or_else(PoisonError::into_inner);
            if let Ok(i) = search(&definitions, name) {
                return Arc::clone(&definitions[i]);
            }
        }

        let candidate = Arc::new(ElementDefinition::new(name, ElementKind::Basic));
        let mut definitions = self
            .definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // Another thread could insert the same name while we waited for the lock
        match search(&definitions, name) {
            Ok(i) => Arc::clone(&definitions[i]),
            Err(i) => {
                trace!("caching unknown element {:?}", candidate);
                definitions.insert(i, Arc::clone(&candidate));
                candidate
            }
        }
    }

    /// Returns the definition of `name` if it is already known, without
    /// caching anything.
    pub fn get(&self, name: &[u8]) -> Option<Arc<ElementDefinition>> {
        let definitions = self.definitions.read().unwrap_or_else(PoisonError::into_inner);
        search(&definitions, name)
            .ok()
            .map(|i| Arc::clone(&definitions[i]))
    }

    /// Number of known definitions.
    pub fn len(&self) -> usize {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no definitions are known.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[inline]
fn search(definitions: &[Arc<ElementDefinition>], name: &[u8]) -> Result<usize, usize> {
    definitions.binary_search_by(|d| compare(&d.name, name))
}

/// Orders names as if both were lowercase.
#[inline]
fn compare(a: &[u8], b: &[u8]) -> Ordering {
    a.iter()
        .map(u8::to_ascii_lowercase)
        .cmp(b.iter().map(u8::to_ascii_lowercase))
}

/// The process-wide repository of HTML element definitions, created on
/// first use.
pub fn html_elements() -> &'static ElementRepository {
    static REPOSITORY: OnceLock<ElementRepository> = OnceLock::new();
    REPOSITORY.get_or_init(ElementRepository::with_html_elements)
}

////////////////////////////////////////////////////////////////////////////////////////////////////

const P: &[&str] = &["p"];
const P_BOUNDARY: &[&str] = &["button"];
const HEADINGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6"];

const LI: &[&str] = &["li", "p"];
const LI_BOUNDARY: &[&str] = &["ul", "ol", "menu", "dir"];

const DT_DD: &[&str] = &["dt", "dd", "p"];
const DT_DD_BOUNDARY: &[&str] = &["dl"];

const OPTION: &[&str] = &["option"];
const OPTION_BOUNDARY: &[&str] = &["select", "datalist", "optgroup"];
const OPTGROUP: &[&str] = &["optgroup", "option"];
const OPTGROUP_BOUNDARY: &[&str] = &["select"];

const TABLE_SECTION: &[&str] = &[
    "thead", "tbody", "tfoot", "tr", "td", "th", "caption", "colgroup", "p",
];
const TABLE_BOUNDARY: &[&str] = &["table"];
const TR: &[&str] = &["tr", "td", "th", "p"];
const TR_BOUNDARY: &[&str] = &["table", "thead", "tbody", "tfoot"];
const CELL: &[&str] = &["td", "th", "p"];
const CELL_BOUNDARY: &[&str] = &["tr", "table"];
const COLGROUP: &[&str] = &["colgroup", "caption"];

const RUBY_BASE: &[&str] = &["rb", "rt", "rtc", "rp"];
const RUBY_TEXT: &[&str] = &["rb", "rt", "rp"];
const RUBY_BOUNDARY: &[&str] = &["ruby", "rtc"];

const HEAD: &[&str] = &["head"];
const HTML_BOUNDARY: &[&str] = &["html"];

const fn closer(closes: &'static [&'static str], boundary: &'static [&'static str]) -> ElementKind {
    ElementKind::AutoCloser(CloseRule { closes, boundary })
}

const fn void_closer(
    closes: &'static [&'static str],
    boundary: &'static [&'static str],
) -> ElementKind {
    ElementKind::VoidAutoCloser(CloseRule { closes, boundary })
}

const BASIC: ElementKind = ElementKind::Basic;
const VOID: ElementKind = ElementKind::Void;
const BLOCK: ElementKind = closer(P, P_BOUNDARY);
const HEADING: ElementKind = closer(HEADINGS, P_BOUNDARY);

/// Standard HTML elements, including obsolete ones still found in the wild.
#[rustfmt::skip]
const HTML_ELEMENTS: &[(&str, ElementKind)] = &[
    // Document structure and metadata
    ("html", BASIC),
    ("head", BASIC),
    ("body", closer(HEAD, HTML_BOUNDARY)),
    ("frameset", closer(HEAD, HTML_BOUNDARY)),
    ("title", BASIC),
    ("base", VOID),
    ("link", VOID),
    ("meta", VOID),
    ("style", BASIC),
    ("script", BASIC),
    ("noscript", BASIC),
    ("template", BASIC),
    ("slot", BASIC),

    // Sections and grouping content
    ("address", BLOCK),
    ("article", BLOCK),
    ("aside", BLOCK),
    ("blockquote", BLOCK),
    ("center", BLOCK),
    ("details", BLOCK),
    ("dialog", BLOCK),
    ("dir", BLOCK),
    ("div", BLOCK),
    ("dl", BLOCK),
    ("fieldset", BLOCK),
    ("figcaption", BLOCK),
    ("figure", BLOCK),
    ("footer", BLOCK),
    ("form", BLOCK),
    ("header", BLOCK),
    ("hgroup", BLOCK),
    ("listing", BLOCK),
    ("main", BLOCK),
    ("menu", BLOCK),
    ("nav", BLOCK),
    ("ol", BLOCK),
    ("p", BLOCK),
    ("plaintext", BLOCK),
    ("pre", BLOCK),
    ("search", BLOCK),
    ("section", BLOCK),
    ("summary", BLOCK),
    ("ul", BLOCK),
    ("xmp", BLOCK),
    ("h1", HEADING),
    ("h2", HEADING),
    ("h3", HEADING),
    ("h4", HEADING),
    ("h5", HEADING),
    ("h6", HEADING),
    ("hr", void_closer(P, P_BOUNDARY)),
    ("li", closer(LI, LI_BOUNDARY)),
    ("dt", closer(DT_DD, DT_DD_BOUNDARY)),
    ("dd", closer(DT_DD, DT_DD_BOUNDARY)),

    // Tables
    ("table", BLOCK),
    ("caption", BASIC),
    ("colgroup", closer(COLGROUP, TABLE_BOUNDARY)),
    ("col", VOID),
    ("thead", closer(TABLE_SECTION, TABLE_BOUNDARY)),
    ("tbody", closer(TABLE_SECTION, TABLE_BOUNDARY)),
    ("tfoot", closer(TABLE_SECTION, TABLE_BOUNDARY)),
    ("tr", closer(TR, TR_BOUNDARY)),
    ("td", closer(CELL, CELL_BOUNDARY)),
    ("th", closer(CELL, CELL_BOUNDARY)),

    // Forms
    ("button", BASIC),
    ("datalist", BASIC),
    ("input", VOID),
    ("keygen", VOID),
    ("label", BASIC),
    ("legend", BASIC),
    ("meter", BASIC),
    ("optgroup", closer(OPTGROUP, OPTGROUP_BOUNDARY)),
    ("option", closer(OPTION, OPTION_BOUNDARY)),
    ("output", BASIC),
    ("progress", BASIC),
    ("select", BASIC),
    ("textarea", BASIC),
    ("isindex", VOID),

    // Text-level semantics
    ("a", BASIC),
    ("abbr", BASIC),
    ("acronym", BASIC),
    ("b", BASIC),
    ("bdi", BASIC),
    ("bdo", BASIC),
    ("big", BASIC),
    ("blink", BASIC),
    ("br", VOID),
    ("cite", BASIC),
    ("code", BASIC),
    ("data", BASIC),
    ("del", BASIC),
    ("dfn", BASIC),
    ("em", BASIC),
    ("font", BASIC),
    ("i", BASIC),
    ("ins", BASIC),
    ("kbd", BASIC),
    ("mark", BASIC),
    ("marquee", BASIC),
    ("nobr", BASIC),
    ("q", BASIC),
    ("rb", closer(RUBY_BASE, RUBY_BOUNDARY)),
    ("rp", closer(RUBY_TEXT, RUBY_BOUNDARY)),
    ("rt", closer(RUBY_TEXT, RUBY_BOUNDARY)),
    ("rtc", closer(RUBY_BASE, &["ruby"])),
    ("ruby", BASIC),
    ("s", BASIC),
    ("samp", BASIC),
    ("small", BASIC),
    ("spacer", BASIC),
    ("span", BASIC),
    ("strike", BASIC),
    ("strong", BASIC),
    ("sub", BASIC),
    ("sup", BASIC),
    ("time", BASIC),
    ("tt", BASIC),
    ("u", BASIC),
    ("var", BASIC),
    ("wbr", VOID),

    // Embedded content
    ("applet", BASIC),
    ("area", VOID),
    ("audio", BASIC),
    ("basefont", VOID),
    ("bgsound", VOID),
    ("canvas", BASIC),
    ("embed", VOID),
    ("frame", VOID),
    ("iframe", BASIC),
    ("img", VOID),
    ("map", BASIC),
    ("math", BASIC),
    ("noembed", BASIC),
    ("noframes", BASIC),
    ("object", BASIC),
    ("param", VOID),
    ("picture", BASIC),
    ("source", VOID),
    ("svg", BASIC),
    ("track", VOID),
    ("video", BASIC),

    // Interactive elements
    ("command", VOID),
    ("menuitem", VOID),
];
