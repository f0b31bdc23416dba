// Template parser using recursive descent

use anyhow::{anyhow, bail, Result};
use serde_json::Number;
use tracing::debug;

use super::ast::{Atom, Reference, Template, TemplatePart};

pub struct TemplateParser {
    input: String,
    pos: usize,
}

impl TemplateParser {
    pub fn parse(template: &str) -> Result<Template> {
        let mut parser = Self {
            input: template.to_string(),
            pos: 0,
        };
        let template = parser.parse_template()?;
        debug!(parts = template.parts.len(), "parsed template");
        Ok(template)
    }

    fn parse_template(&mut self) -> Result<Template> {
        let mut parts = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek_char() {
                None => break,
                Some('{') if self.peek_ahead(1) != Some('{') => {
                    parts.push(self.parse_placeholder()?);
                }
                Some(_) => parts.push(self.parse_literal()?),
            }
        }

        Ok(Template::new(parts))
    }

    fn parse_placeholder(&mut self) -> Result<TemplatePart> {
        let start = self.pos;
        self.expect_char('{')?;
        self.skip_whitespace();

        let escaped = self.consume_if('!');
        self.skip_whitespace();
        let list = self.consume_if('@');

        self.skip_whitespace();
        let reference = self.parse_reference()?;
        self.skip_whitespace();
        self.expect_char('}')?;

        // A placeholder is a whole word of its own
        if let Some(ch) = self.peek_char() {
            if !ch.is_whitespace() {
                bail!(
                    "Placeholder at position {} must be followed by whitespace, found '{}'",
                    start,
                    ch
                );
            }
        }

        Ok(match (escaped, list) {
            (false, false) => TemplatePart::Interpolated(reference),
            (false, true) => TemplatePart::InterpolatedList(reference),
            (true, false) => TemplatePart::Escaped(reference),
            (true, true) => TemplatePart::EscapedList(reference),
        })
    }

    fn parse_reference(&mut self) -> Result<Reference> {
        let start = self.pos;
        let mut name = String::new();

        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                name.push(self.consume_char()?);
            } else if ch == '}' || ch.is_whitespace() {
                break;
            } else {
                bail!(
                    "Invalid character '{}' in reference at position {}",
                    ch,
                    self.pos
                );
            }
        }

        if name.is_empty() {
            bail!("Empty reference at position {}", start);
        }

        if name.bytes().all(|b| b.is_ascii_digit()) {
            let index = name
                .parse::<usize>()
                .map_err(|e| anyhow!("Invalid index '{}' at position {}: {}", name, start, e))?;
            return Ok(Reference::Index(index));
        }

        if !is_identifier(&name) {
            bail!("Invalid reference '{}' at position {}", name, start);
        }

        Ok(Reference::Name(name))
    }

    fn parse_literal(&mut self) -> Result<TemplatePart> {
        let mut word = String::new();
        let mut bare = true;

        while let Some(ch) = self.peek_char() {
            match ch {
                c if c.is_whitespace() => break,
                '\'' => {
                    bare = false;
                    self.parse_single_quoted(&mut word)?;
                }
                '"' => {
                    bare = false;
                    self.parse_double_quoted(&mut word)?;
                }
                '{' => {
                    if self.peek_ahead(1) == Some('{') {
                        self.pos += 2;
                        word.push('{');
                        bare = false;
                    } else {
                        bail!(
                            "Placeholder at position {} must be a separate word",
                            self.pos
                        );
                    }
                }
                '}' => {
                    if self.peek_ahead(1) == Some('}') {
                        self.pos += 2;
                        word.push('}');
                        bare = false;
                    } else {
                        bail!("Unexpected closing brace at position {}", self.pos);
                    }
                }
                _ => word.push(self.consume_char()?),
            }
        }

        Ok(TemplatePart::Literal(classify_literal(word, bare)))
    }

    fn parse_single_quoted(&mut self, word: &mut String) -> Result<()> {
        let start = self.pos;
        self.expect_char('\'')?;

        loop {
            match self.peek_char() {
                Some('\'') => {
                    self.consume_char()?;
                    return Ok(());
                }
                Some(_) => word.push(self.consume_char()?),
                None => bail!("Unterminated single quote starting at position {}", start),
            }
        }
    }

    fn parse_double_quoted(&mut self, word: &mut String) -> Result<()> {
        let start = self.pos;
        self.expect_char('"')?;

        loop {
            match self.peek_char() {
                Some('"') => {
                    self.consume_char()?;
                    return Ok(());
                }
                Some('\\') if matches!(self.peek_ahead(1), Some('"') | Some('\\')) => {
                    self.consume_char()?;
                    word.push(self.consume_char()?);
                }
                Some(_) => word.push(self.consume_char()?),
                None => bail!("Unterminated double quote starting at position {}", start),
            }
        }
    }

    fn consume_if(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn consume_char(&mut self) -> Result<char> {
        let ch = self
            .peek_char()
            .ok_or_else(|| anyhow!("Unexpected end of input at position {}", self.pos))?;
        self.pos += ch.len_utf8();
        Ok(ch)
    }

    fn expect_char(&mut self, expected: char) -> Result<()> {
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.consume_char()?;
                Ok(())
            }
            Some(ch) => bail!(
                "Expected '{}' but found '{}' at position {}",
                expected,
                ch,
                self.pos
            ),
            None => bail!("Expected '{}' but found end of input", expected),
        }
    }
}

impl std::str::FromStr for Template {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        TemplateParser::parse(s)
    }
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}

/// Bare identifiers and canonical numbers keep their kind, everything else is text
fn classify_literal(word: String, bare: bool) -> Atom {
    if !bare {
        return Atom::Text(word);
    }
    if is_identifier(&word) {
        return Atom::Identifier(word);
    }
    match word.parse::<Number>() {
        Ok(number) if number.to_string() == word => Atom::Number(number),
        _ => Atom::Text(word),
    }
}
