//! Strict parsing of well-formed XML.

use pretty_assertions::assert_eq;
use quick_markup::config::{Config, PrologPresence, UniqueRootElementPresence};
use quick_markup::errors::{Error, IllFormedError, SyntaxError};

mod helpers;
use helpers::{check, parse_err};

/// Returns the cause and the `(line, column)` of an ill-formed error.
#[track_caller]
fn ill_formed(config: Config, input: &str) -> (IllFormedError, (usize, usize)) {
    match parse_err(config, input) {
        Error::IllFormed { cause, position } => (cause, (position.line, position.col)),
        x => panic!("expected an ill-formed error, got {:?}", x),
    }
}

/// Returns the cause and the `(line, column)` of a syntax error.
#[track_caller]
fn syntax(config: Config, input: &str) -> (SyntaxError, (usize, usize)) {
    match parse_err(config, input) {
        Error::Syntax { cause, position } => (cause, (position.line, position.col)),
        x => panic!("expected a syntax error, got {:?}", x),
    }
}

#[test]
fn document() {
    check(
        Config::xml(),
        r#"<?xml version="1.0" encoding="UTF-8"?><!DOCTYPE note SYSTEM "note.dtd"><note id="1"><to>Tove</to><!--c--><![CDATA[<x>]]><?render fast?><br/></note>"#,
        r#"
            StartDocument
            XmlDecl(version=1.0, encoding=UTF-8)
            DocType(note, system=note.dtd)
            Open(note)
            Attr(id="1")
            Open(to)
            Text(Tove)
            Close(to)
            Comment(c)
            CData(<x>)
            PI(render: fast)
            Minimized(br)
            Close(note)
            EndDocument
        "#,
    );
}

#[test]
fn html_names_are_not_special() {
    // `p` does not close `p`, `br` is an ordinary element
    check(
        Config::xml(),
        "<p><p><br></br></p></p>",
        r#"
            StartDocument
            Open(p)
            Open(p)
            Open(br)
            Close(br)
            Close(p)
            Close(p)
            EndDocument
        "#,
    );
}

#[test]
fn doctype_with_public_id_and_subset() {
    check(
        Config::xml(),
        r#"<!DOCTYPE root PUBLIC "-//X//EN" "root.dtd" [ <!ELEMENT root (#PCDATA)> ]><root/>"#,
        r#"
            StartDocument
            DocType(root, public=-//X//EN, system=root.dtd, subset= <!ELEMENT root (#PCDATA)> )
            Minimized(root)
            EndDocument
        "#,
    );
}

#[test]
fn mismatched_close() {
    assert_eq!(
        ill_formed(Config::xml(), "<a><b></a>"),
        (
            IllFormedError::MismatchedCloseTag {
                expected: "b".into(),
                found: "a".into(),
            },
            (1, 7)
        )
    );
    assert_eq!(
        ill_formed(Config::xml(), "<a>\n<b></c>"),
        (
            IllFormedError::MismatchedCloseTag {
                expected: "b".into(),
                found: "c".into(),
            },
            (2, 4)
        )
    );
}

#[test]
fn close_tag_case_matters() {
    assert_eq!(
        ill_formed(Config::xml(), "<a></A>"),
        (
            IllFormedError::MismatchedCloseTag {
                expected: "a".into(),
                found: "A".into(),
            },
            (1, 4)
        )
    );
}

#[test]
fn unmatched_close() {
    assert_eq!(
        ill_formed(Config::xml(), "<a/></a>"),
        (IllFormedError::UnmatchedCloseTag("a".into()), (1, 5))
    );
}

#[test]
fn unclosed_element() {
    assert_eq!(
        ill_formed(Config::xml(), "<a><b></b>"),
        (IllFormedError::UnclosedElement("a".into()), (1, 1))
    );
}

#[test]
fn duplicated_attribute() {
    assert_eq!(
        ill_formed(Config::xml(), r#"<a x="1" y="2" x="3"/>"#),
        (IllFormedError::DuplicatedAttribute("x".into()), (1, 16))
    );
}

#[test]
fn attribute_values() {
    assert_eq!(
        syntax(Config::xml(), "<a x=1/>"),
        (SyntaxError::UnquotedAttributeValue("x".into()), (1, 4))
    );
    assert_eq!(
        syntax(Config::xml(), "<a\n  x/>"),
        (SyntaxError::MissingAttributeValue("x".into()), (2, 3))
    );
    assert_eq!(
        syntax(Config::xml(), "<a x=/>"),
        (SyntaxError::MissingAttributeValue("x".into()), (1, 4))
    );
}

#[test]
fn malformed_markup() {
    assert_eq!(
        syntax(Config::xml(), "<a>1 < 2</a>"),
        (SyntaxError::InvalidMarkupStart, (1, 6))
    );
    assert_eq!(
        syntax(Config::xml(), "<a><!x></a>"),
        (SyntaxError::InvalidBangMarkup, (1, 4))
    );
    assert_eq!(
        syntax(Config::xml(), "<a></ a>"),
        (SyntaxError::EmptyTagName, (1, 4))
    );
    assert_eq!(
        syntax(Config::xml(), "<a></a b>"),
        (SyntaxError::UnexpectedCloseTagContent, (1, 4))
    );
    assert_eq!(
        syntax(Config::xml(), "<!DOCTYPE a b><a/>"),
        (SyntaxError::MalformedDoctype, (1, 1))
    );
    assert_eq!(
        syntax(Config::xml(), "<?xml encoding='UTF-8'?><a/>"),
        (SyntaxError::MalformedXmlDecl, (1, 1))
    );
}

#[test]
fn unclosed_constructs() {
    let cases = [
        ("<a>text<b", SyntaxError::UnclosedTag),
        ("<a><!-- comment", SyntaxError::UnclosedComment),
        ("<a><![CDATA[ data ]]", SyntaxError::UnclosedCData),
        ("<!DOCTYPE a [ <!ENTITY x 'y'>", SyntaxError::UnclosedDoctype),
        ("<?pi ?", SyntaxError::UnclosedPIOrXmlDecl),
        ("<a><!-", SyntaxError::InvalidBangMarkup),
    ];
    for (input, expected) in cases {
        match parse_err(Config::xml(), input) {
            Error::Syntax { cause, .. } => assert_eq!(cause, expected, "{}", input),
            x => panic!("expected a syntax error for {}, got {:?}", input, x),
        }
    }
}

mod root {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn many_roots_without_doctype() {
        check(
            Config::xml(),
            "<a/><b/>",
            r#"
                StartDocument
                Minimized(a)
                Minimized(b)
                EndDocument
            "#,
        );
    }

    #[test]
    fn many_roots_with_doctype() {
        assert_eq!(
            ill_formed(Config::xml(), "<!DOCTYPE a><a/><a/>"),
            (IllFormedError::MultipleRootElements("a".into()), (1, 17))
        );
    }

    #[test]
    fn many_roots_always_forbidden() {
        let mut config = Config::xml();
        config.unique_root_element = UniqueRootElementPresence::Enabled;
        assert_eq!(
            ill_formed(config, "<a></a>\n<b/>"),
            (IllFormedError::MultipleRootElements("b".into()), (2, 1))
        );
    }

    #[test]
    fn doctype_mismatch() {
        assert_eq!(
            ill_formed(Config::xml(), "<!DOCTYPE html>\n<HTML/>"),
            (
                IllFormedError::RootElementMismatch {
                    doctype: "html".into(),
                    found: "HTML".into(),
                },
                (2, 1)
            )
        );
    }

    #[test]
    fn doctype_mismatch_ignores_case_if_asked() {
        let mut config = Config::xml();
        config.case_sensitive = false;
        check(
            config,
            "<!DOCTYPE html><HTML/>",
            r#"
                StartDocument
                DocType(html)
                Minimized(HTML)
                EndDocument
            "#,
        );
    }
}

mod prolog {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn misplaced_xml_declaration() {
        assert_eq!(
            ill_formed(Config::xml(), " <?xml version='1.0'?><a/>"),
            (IllFormedError::MisplacedXmlDeclaration, (1, 2))
        );
        assert_eq!(
            ill_formed(Config::xml(), "<a/><?xml version='1.0'?>"),
            (IllFormedError::MisplacedXmlDeclaration, (1, 5))
        );
    }

    #[test]
    fn bom_before_xml_declaration() {
        check(
            Config::xml(),
            "\u{FEFF}<?xml version='1.0'?><a/>",
            r#"
                StartDocument
                XmlDecl(version=1.0)
                Minimized(a)
                EndDocument
            "#,
        );
    }

    #[test]
    fn misplaced_doctype() {
        assert_eq!(
            ill_formed(Config::xml(), "<!DOCTYPE a><!DOCTYPE a><a/>"),
            (IllFormedError::MisplacedDoctype, (1, 13))
        );
        assert_eq!(
            ill_formed(Config::xml(), "<a/><!DOCTYPE a>"),
            (IllFormedError::MisplacedDoctype, (1, 5))
        );
    }

    #[test]
    fn forbidden() {
        let mut config = Config::xml();
        config.xml_declaration = PrologPresence::Forbidden;
        config.doctype = PrologPresence::Forbidden;
        assert_eq!(
            ill_formed(config, "<?xml version='1.0'?><a/>"),
            (IllFormedError::ForbiddenXmlDeclaration, (1, 1))
        );
        assert_eq!(
            ill_formed(config, "<!DOCTYPE a><a/>"),
            (IllFormedError::ForbiddenDoctype, (1, 1))
        );
    }

    #[test]
    fn required() {
        let mut config = Config::xml();
        config.xml_declaration = PrologPresence::Required;
        config.doctype = PrologPresence::Required;
        assert_eq!(
            ill_formed(config, "<!DOCTYPE a><a/>"),
            (IllFormedError::MissingXmlDeclaration, (1, 13))
        );
        assert_eq!(
            ill_formed(config, "<?xml version='1.0'?>\n<a/>"),
            (IllFormedError::MissingDoctype, (2, 1))
        );
        // Empty document
        assert_eq!(
            ill_formed(config, "<?xml version='1.0'?>"),
            (IllFormedError::MissingDoctype, (1, 22))
        );
        check(
            config,
            "<?xml version='1.0'?><!DOCTYPE a><a/>",
            r#"
                StartDocument
                XmlDecl(version=1.0)
                DocType(a)
                Minimized(a)
                EndDocument
            "#,
        );
    }

    #[test]
    fn order_is_free_in_html() {
        check(
            Config::html(),
            "<p>x</p><?xml version='1.0'?><!DOCTYPE html>",
            r#"
                StartDocument
                Open(p)
                Text(x)
                Close(p)
                XmlDecl(version=1.0)
                DocType(html)
                EndDocument
            "#,
        );
    }

    #[test]
    fn xml_like_targets_are_instructions() {
        check(
            Config::xml(),
            "<?xml-stylesheet href='a.xsl'?><?XML x?><a/>",
            r#"
                StartDocument
                PI(xml-stylesheet: href='a.xsl')
                PI(XML: x)
                Minimized(a)
                EndDocument
            "#,
        );
    }
}
