//! Compound selectors.
//!
//! Supports a single compound selector: an optional tag name (or `*`)
//! followed by any number of `#id` and `.class` parts, e.g. `#app`,
//! `ul.fruits`, `div#app.main`. Combinators are not supported.

use alloc::string::String;
use alloc::vec::Vec;
use weft_core::{Error, Result};

/// A parsed compound selector.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parses a selector string.
    pub fn parse(source: &str) -> Result<Self> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(Error::parse(source, "Empty selector", 0));
        }

        let mut selector = Selector::default();
        let mut chars = trimmed.char_indices().peekable();
        let mut first = true;

        while let Some((pos, c)) = chars.next() {
            let kind = match c {
                '#' | '.' => c,
                '*' if first => {
                    first = false;
                    continue;
                }
                c if first && is_name_char(c) => 't',
                _ => {
                    return Err(Error::parse(
                        source,
                        alloc::format!("Unexpected character '{}'", c),
                        pos,
                    ))
                }
            };
            first = false;

            let mut name = String::new();
            if kind == 't' {
                name.push(c);
            }
            while let Some(&(_, next)) = chars.peek() {
                if !is_name_char(next) {
                    break;
                }
                name.push(next);
                chars.next();
            }
            if name.is_empty() {
                return Err(Error::parse(source, "Expected name", pos + 1));
            }

            match kind {
                't' => selector.tag = Some(name.to_ascii_lowercase()),
                '#' => selector.id = Some(name),
                _ => selector.classes.push(name),
            }
        }
        Ok(selector)
    }

    /// Tests an element given its tag and attribute lookup.
    pub fn matches<'a>(&self, tag: &str, attribute: impl Fn(&str) -> Option<&'a str>) -> bool {
        if let Some(expected) = &self.tag {
            if !expected.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(expected) = &self.id {
            if attribute("id") != Some(expected.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let classes: Vec<&str> = attribute("class")
                .map(|value| value.split_whitespace().collect())
                .unwrap_or_default();
            if !self.classes.iter().all(|c| classes.contains(&c.as_str())) {
                return false;
            }
        }
        true
    }
}

impl core::fmt::Display for Selector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let tag = self.tag.as_deref().unwrap_or("*");
        write!(f, "{}", tag)?;
        if let Some(id) = &self.id {
            write!(f, "#{}", id)?;
        }
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        Ok(())
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

impl core::str::FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Selector::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn attrs<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<&'a str> {
        move |name| pairs.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    #[test]
    fn test_parse() {
        let s = Selector::parse("div#app.main.wide").unwrap();
        assert_eq!(s.tag.as_deref(), Some("div"));
        assert_eq!(s.id.as_deref(), Some("app"));
        assert_eq!(s.classes, vec!["main", "wide"]);
        assert_eq!(s.to_string(), "div#app.main.wide");
    }

    #[test]
    fn test_parse_errors() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("#").is_err());
        assert!(Selector::parse("div p").is_err());
        assert!(Selector::parse("div > p").is_err());
    }

    #[test]
    fn test_matches() {
        let element = [("id", "app"), ("class", "main  wide")];
        assert!(Selector::parse("#app").unwrap().matches("div", attrs(&element)));
        assert!(Selector::parse("DIV.wide").unwrap().matches("div", attrs(&element)));
        assert!(Selector::parse("*").unwrap().matches("span", attrs(&element)));
        assert!(!Selector::parse("p#app").unwrap().matches("div", attrs(&element)));
        assert!(!Selector::parse(".narrow").unwrap().matches("div", attrs(&element)));
        assert!(!Selector::parse("#other").unwrap().matches("div", attrs(&[])));
    }
}
