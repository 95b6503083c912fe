//! Markup parsing and serialization.
//!
//! A small, forgiving HTML-like parser producing a `Fragment` tree:
//! - `<tag attr="v" attr='v' attr=v attr>` elements, `<tag/>` self-closing
//! - void elements (`input`, `br`, `img`, ...) never take children
//! - `<!-- ... -->` comments, other `<!...>` declarations are skipped
//! - `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&#39;`, `&#NN;` and
//!   `&#xNN;` entities in text and attribute values
//!
//! Tag and attribute names are lowercased.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use weft_core::{Error, Result};

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Returns true if `tag` is a void element.
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// A parsed markup node.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Fragment>,
    },
    Text(String),
    Comment(String),
}

/// Parses markup into a list of top-level fragments.
pub fn parse(input: &str) -> Result<Vec<Fragment>> {
    Parser::new(input).parse_document()
}

/// An element still waiting for its closing tag.
struct Open {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Fragment>,
}

/// Parser state.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consumes everything up to `terminator` and the terminator itself.
    fn take_until(&mut self, terminator: &str) -> Result<&'a str> {
        let start = self.pos;
        match self.rest().find(terminator) {
            Some(offset) => {
                self.pos += offset + terminator.len();
                Ok(&self.input[start..start + offset])
            }
            None => Err(Error::markup(format!("Expected '{}'", terminator), start)),
        }
    }

    fn parse_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '/' | '>' | '=' | '<' | '"' | '\'') {
                break;
            }
            self.advance();
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    fn parse_document(&mut self) -> Result<Vec<Fragment>> {
        let mut stack: Vec<Open> = Vec::new();
        let mut top: Vec<Fragment> = Vec::new();

        while self.pos < self.input.len() {
            if self.starts_with("<!--") {
                self.pos += 4;
                let body = self.take_until("-->")?;
                push(&mut stack, &mut top, Fragment::Comment(body.to_string()));
            } else if self.starts_with("<!") || self.starts_with("<?") {
                self.take_until(">")?;
            } else if self.starts_with("</") {
                let start = self.pos;
                self.pos += 2;
                let tag = self.parse_name();
                self.skip_whitespace();
                if self.peek() != Some('>') {
                    return Err(Error::markup("Expected '>'", self.pos));
                }
                self.advance();
                close(&mut stack, &mut top, &tag, start)?;
            } else if self.starts_with("<")
                && self.rest()[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                let (tag, attributes, self_closing) = self.parse_open_tag()?;
                if self_closing || is_void(&tag) {
                    let element = Fragment::Element {
                        tag,
                        attributes,
                        children: Vec::new(),
                    };
                    push(&mut stack, &mut top, element);
                } else {
                    stack.push(Open {
                        tag,
                        attributes,
                        children: Vec::new(),
                    });
                }
            } else {
                let text = self.parse_text();
                push(&mut stack, &mut top, Fragment::Text(text));
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::markup(
                format!("Unclosed element <{}>", open.tag),
                self.pos,
            ));
        }
        Ok(top)
    }

    fn parse_open_tag(&mut self) -> Result<(String, Vec<(String, String)>, bool)> {
        self.advance(); // '<'
        let tag = self.parse_name();
        let mut attributes: Vec<(String, String)> = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('>') => {
                    self.advance();
                    return Ok((tag, attributes, false));
                }
                Some('/') if self.starts_with("/>") => {
                    self.pos += 2;
                    return Ok((tag, attributes, true));
                }
                Some(_) => {
                    let start = self.pos;
                    let name = self.parse_name();
                    if name.is_empty() {
                        return Err(Error::markup("Expected attribute name", start));
                    }
                    self.skip_whitespace();
                    let value = if self.peek() == Some('=') {
                        self.advance();
                        self.skip_whitespace();
                        self.parse_attribute_value()?
                    } else {
                        String::new()
                    };
                    // first occurrence wins
                    if !attributes.iter().any(|(n, _)| *n == name) {
                        attributes.push((name, value));
                    }
                }
                None => return Err(Error::markup(format!("Unterminated tag <{}>", tag), self.pos)),
            }
        }
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let mut buf = [0u8; 4];
                let raw = self.take_until(quote.encode_utf8(&mut buf))?;
                Ok(decode_entities(raw))
            }
            _ => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c.is_whitespace() || c == '>' {
                        break;
                    }
                    self.advance();
                }
                Ok(decode_entities(&self.input[start..self.pos]))
            }
        }
    }

    fn parse_text(&mut self) -> String {
        let start = self.pos;
        // A lone '<' that does not start a tag is text.
        self.advance();
        while let Some(c) = self.peek() {
            if c == '<' {
                break;
            }
            self.advance();
        }
        decode_entities(&self.input[start..self.pos])
    }
}

fn push(stack: &mut [Open], top: &mut Vec<Fragment>, fragment: Fragment) {
    match stack.last_mut() {
        Some(open) => open.children.push(fragment),
        None => top.push(fragment),
    }
}

fn close(stack: &mut Vec<Open>, top: &mut Vec<Fragment>, tag: &str, position: usize) -> Result<()> {
    match stack.pop() {
        Some(open) if open.tag == tag => {
            let element = Fragment::Element {
                tag: open.tag,
                attributes: open.attributes,
                children: open.children,
            };
            push(stack, top, element);
            Ok(())
        }
        Some(open) => Err(Error::markup(
            format!("Expected </{}>, found </{}>", open.tag, tag),
            position,
        )),
        None => Err(Error::markup(format!("Unexpected </{}>", tag), position)),
    }
}

/// Decodes the supported character references; unknown ones stay verbatim.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let name = &rest[1..semi];
            let c = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => name.strip_prefix('#').and_then(|num| {
                    let code = match num.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => num.parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }),
            };
            c.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Serializes fragments back to markup.
pub fn serialize(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        write_fragment(fragment, &mut out);
    }
    out
}

fn write_fragment(fragment: &Fragment, out: &mut String) {
    match fragment {
        Fragment::Text(text) => out.push_str(&escape_text(text)),
        Fragment::Comment(text) => write_comment(text, out),
        Fragment::Element {
            tag,
            attributes,
            children,
        } => {
            write_open_tag(tag, attributes, out);
            if !is_void(tag) {
                for child in children {
                    write_fragment(child, out);
                }
                write_close_tag(tag, out);
            }
        }
    }
}

pub(crate) fn write_open_tag(tag: &str, attributes: &[(String, String)], out: &mut String) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }
    out.push('>');
}

pub(crate) fn write_close_tag(tag: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

pub(crate) fn write_comment(text: &str, out: &mut String) {
    out.push_str("<!--");
    out.push_str(text);
    out.push_str("-->");
}

/// Escapes text content.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a double-quoted attribute value.
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn element(tag: &str, attributes: Vec<(&str, &str)>, children: Vec<Fragment>) -> Fragment {
        Fragment::Element {
            tag: tag.into(),
            attributes: attributes
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
            children,
        }
    }

    #[test]
    fn test_parse_nested() {
        let parsed = parse(r#"<div id="app"><p>{{ user.username }}</p></div>"#).unwrap();
        assert_eq!(
            parsed,
            vec![element(
                "div",
                vec![("id", "app")],
                vec![element(
                    "p",
                    vec![],
                    vec![Fragment::Text("{{ user.username }}".into())]
                )]
            )]
        );
    }

    #[test]
    fn test_parse_attribute_forms() {
        let parsed = parse(r#"<input type=text vm-model='user.username' disabled value="a &amp; b">"#)
            .unwrap();
        assert_eq!(
            parsed,
            vec![element(
                "input",
                vec![
                    ("type", "text"),
                    ("vm-model", "user.username"),
                    ("disabled", ""),
                    ("value", "a & b"),
                ],
                vec![]
            )]
        );
    }

    #[test]
    fn test_parse_void_and_self_closing() {
        let parsed = parse("<br><span/>text").unwrap();
        assert_eq!(
            parsed,
            vec![
                element("br", vec![], vec![]),
                element("span", vec![], vec![]),
                Fragment::Text("text".into()),
            ]
        );
    }

    #[test]
    fn test_parse_comment_and_doctype() {
        let parsed = parse("<!DOCTYPE html><!-- note --><B>x</b>").unwrap();
        assert_eq!(
            parsed,
            vec![
                Fragment::Comment(" note ".into()),
                element("b", vec![], vec![Fragment::Text("x".into())]),
            ]
        );
    }

    #[test]
    fn test_parse_lone_angle_bracket() {
        let parsed = parse("a < b").unwrap();
        assert_eq!(parsed, vec![Fragment::Text("a ".into()), Fragment::Text("< b".into())]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse("<div><p></div>"), Err(Error::Markup { .. })));
        assert!(matches!(parse("<div>"), Err(Error::Markup { .. })));
        assert!(matches!(parse("</div>"), Err(Error::Markup { .. })));
        assert!(matches!(parse("<div id=\"x"), Err(Error::Markup { .. })));
        assert!(matches!(parse("<!-- open"), Err(Error::Markup { .. })));
    }

    #[test]
    fn test_serialize() {
        let source = r#"<ul><li vm-repeat="fruit in fruits">{{ fruit }}</li><!--x--><br></ul>"#;
        assert_eq!(serialize(&parse(source).unwrap()), source);
    }

    #[test]
    fn test_entities() {
        assert_eq!(decode_entities("&lt;b&gt; &#65;&#x42; &unknown; &"), "<b> AB &unknown; &");
        assert_eq!(escape_text("<a & b>"), "&lt;a &amp; b&gt;");
        assert_eq!(escape_attribute("say \"hi\""), "say &quot;hi&quot;");
    }
}
