//! A small SAX-style XML tokenizer: just enough grammar to walk SVG's
//! element/attribute/content structure. No DTD, entity, or namespace
//! resolution beyond passing `xlink:href`-style qualified names through
//! verbatim — anything past element/attribute/text events is out of
//! scope, same as the original's hand-rolled scanner.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent<'a> {
    /// `<name attr="val" ...>` or the self-closing `<name .../>` form.
    StartElement { name: &'a str, attrs: Vec<(&'a str, String)>, self_closing: bool },
    EndElement { name: &'a str },
    Text(&'a str),
}

pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let skipped = self.rest().len() - self.rest().trim_start().len();
        self.pos += skipped;
    }

    /// Advances past `<!-- ... -->` and `<?...?>` markup that carries no
    /// element/attribute/content events of its own.
    fn skip_noise(&mut self) -> bool {
        if let Some(rest) = self.rest().strip_prefix("<!--") {
            let end = rest.find("-->").map(|i| i + 3).unwrap_or(rest.len());
            self.pos += 4 + end;
            true
        } else if let Some(rest) = self.rest().strip_prefix("<?") {
            let end = rest.find("?>").map(|i| i + 2).unwrap_or(rest.len());
            self.pos += 2 + end;
            true
        } else if let Some(rest) = self.rest().strip_prefix("<!") {
            let end = rest.find('>').map(|i| i + 1).unwrap_or(rest.len());
            self.pos += 2 + end;
            true
        } else {
            false
        }
    }

    pub fn next_event(&mut self) -> Result<Option<XmlEvent<'a>>> {
        loop {
            if self.rest().is_empty() {
                return Ok(None);
            }
            if self.rest().starts_with('<') {
                if self.skip_noise() {
                    continue;
                }
                return self.parse_tag().map(Some);
            }
            let end = self.rest().find('<').unwrap_or(self.rest().len());
            let text = &self.rest()[..end];
            self.pos += end;
            if text.trim().is_empty() {
                continue;
            }
            return Ok(Some(XmlEvent::Text(text)));
        }
    }

    fn parse_tag(&mut self) -> Result<XmlEvent<'a>> {
        self.pos += 1; // consume '<'
        if self.rest().starts_with('/') {
            self.pos += 1;
            let name_end = self.rest().find('>').ok_or(Error::FormatViolation("unterminated end tag"))?;
            let name = self.rest()[..name_end].trim();
            self.pos += name_end + 1;
            return Ok(XmlEvent::EndElement { name });
        }

        let name_end = self
            .rest()
            .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .ok_or(Error::FormatViolation("unterminated start tag"))?;
        let name = &self.rest()[..name_end];
        self.pos += name_end;

        let mut attrs = Vec::new();
        loop {
            self.skip_ws();
            if self.rest().starts_with("/>") {
                self.pos += 2;
                return Ok(XmlEvent::StartElement { name, attrs, self_closing: true });
            }
            if self.rest().starts_with('>') {
                self.pos += 1;
                return Ok(XmlEvent::StartElement { name, attrs, self_closing: false });
            }
            if self.rest().is_empty() {
                return Err(Error::FormatViolation("unterminated start tag"));
            }
            let attr_name_end = self
                .rest()
                .find(|c: char| c == '=' || c.is_whitespace() || c == '/' || c == '>')
                .ok_or(Error::FormatViolation("malformed attribute"))?;
            let attr_name = &self.rest()[..attr_name_end];
            self.pos += attr_name_end;
            self.skip_ws();
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_ws();
                self.parse_attr_value()?
            } else {
                String::new()
            };
            attrs.push((attr_name, value));
        }
    }

    fn parse_attr_value(&mut self) -> Result<String> {
        let quote = self.rest().chars().next().ok_or(Error::FormatViolation("expected attribute value"))?;
        if quote != '"' && quote != '\'' {
            return Err(Error::FormatViolation("attribute value must be quoted"));
        }
        self.pos += 1;
        let end = self.rest().find(quote).ok_or(Error::FormatViolation("unterminated attribute value"))?;
        let raw = &self.rest()[..end];
        self.pos += end + 1;
        Ok(unescape(raw))
    }
}

fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }
        let mut entity = String::new();
        let mut closed = false;
        for c2 in chars.by_ref() {
            if c2 == ';' {
                closed = true;
                break;
            }
            entity.push(c2);
        }
        if !closed {
            out.push('&');
            out.push_str(&entity);
            continue;
        }
        match entity.as_str() {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                if let Ok(code) = u32::from_str_radix(&entity[2..], 16) {
                    if let Some(ch) = char::from_u32(code) {
                        out.push(ch);
                    }
                }
            }
            _ if entity.starts_with('#') => {
                if let Ok(code) = entity[1..].parse::<u32>() {
                    if let Some(ch) = char::from_u32(code) {
                        out.push(ch);
                    }
                }
            }
            _ => {
                out.push('&');
                out.push_str(&entity);
                out.push(';');
            }
        }
    }
    out
}

/// Splits a `style="k:v; k2:v2"` attribute value into `(name, value)`
/// pairs, trimmed, skipping empty segments between/after `;`.
pub fn split_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let decl = decl.trim();
            if decl.is_empty() {
                return None;
            }
            let (k, v) = decl.split_once(':')?;
            Some((k.trim().to_string(), v.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_self_closing_element_with_attrs() {
        let mut tok = Tokenizer::new(r#"<rect x="1" y="2" width="3"/>"#);
        let ev = tok.next_event().unwrap().unwrap();
        match ev {
            XmlEvent::StartElement { name, attrs, self_closing } => {
                assert_eq!(name, "rect");
                assert!(self_closing);
                assert_eq!(attrs, vec![
                    ("x", "1".to_string()),
                    ("y", "2".to_string()),
                    ("width", "3".to_string()),
                ]);
            }
            _ => panic!("expected StartElement"),
        }
        assert_eq!(tok.next_event().unwrap(), None);
    }

    #[test]
    fn tokenizes_nested_elements_and_text() {
        let mut tok = Tokenizer::new("<g><path d=\"M0 0\"/></g>");
        assert!(matches!(tok.next_event().unwrap(), Some(XmlEvent::StartElement { name: "g", .. })));
        assert!(matches!(tok.next_event().unwrap(), Some(XmlEvent::StartElement { name: "path", .. })));
        assert!(matches!(tok.next_event().unwrap(), Some(XmlEvent::EndElement { name: "g" })));
    }

    #[test]
    fn skips_comments_and_processing_instructions() {
        let mut tok = Tokenizer::new("<?xml version=\"1.0\"?><!-- hi --><svg/>");
        assert!(matches!(tok.next_event().unwrap(), Some(XmlEvent::StartElement { name: "svg", .. })));
    }

    #[test]
    fn unescapes_entities_in_attribute_values() {
        let mut tok = Tokenizer::new(r#"<a href="x&amp;y"/>"#);
        match tok.next_event().unwrap().unwrap() {
            XmlEvent::StartElement { attrs, .. } => assert_eq!(attrs[0].1, "x&y"),
            _ => panic!(),
        }
    }

    #[test]
    fn style_splitting_skips_empty_segments() {
        let parsed = split_style("fill:red; stroke: blue ;;");
        assert_eq!(parsed, vec![
            ("fill".to_string(), "red".to_string()),
            ("stroke".to_string(), "blue".to_string()),
        ]);
    }
}
