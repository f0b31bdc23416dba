// Part model for shell command templates

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

use crate::error::{Arity, BadAtom};

/// Represents a parsed template as a list of parts
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub parts: Vec<TemplatePart>,
}

impl Template {
    pub fn new(parts: Vec<TemplatePart>) -> Self {
        Self { parts }
    }

    /// Get every reference in this template, in part order
    pub fn references(&self) -> Vec<&Reference> {
        self.parts
            .iter()
            .filter_map(TemplatePart::reference)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl From<Vec<TemplatePart>> for Template {
    fn from(parts: Vec<TemplatePart>) -> Self {
        Self::new(parts)
    }
}

/// A resolved scalar value
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Identifier(String),
    Text(String),
    Number(Number),
}

impl Atom {
    pub fn identifier(name: impl Into<String>) -> Self {
        Atom::Identifier(name.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Atom::Text(text.into())
    }

    pub fn number(number: impl Into<Number>) -> Self {
        Atom::Number(number.into())
    }

    /// Unquoted string form of the atom
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Identifier(name) => f.write_str(name),
            Atom::Text(text) => f.write_str(text),
            Atom::Number(number) => write!(f, "{}", number),
        }
    }
}

impl TryFrom<&Value> for Atom {
    type Error = BadAtom;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Atom::Text(s.clone())),
            Value::Number(n) => Ok(Atom::Number(n.clone())),
            other => Err(BadAtom::new(other)),
        }
    }
}

impl TryFrom<Value> for Atom {
    type Error = BadAtom;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Atom::Text(s)),
            Value::Number(n) => Ok(Atom::Number(n)),
            other => Err(BadAtom::new(&other)),
        }
    }
}

/// Render a dynamic value that must be a scalar
pub fn render_atom(value: &Value) -> Result<String, BadAtom> {
    Atom::try_from(value).map(|atom| atom.render())
}

/// Key into an expansion context: a variable name or a positional index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Index(usize),
    Name(String),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Name(name) => f.write_str(name),
            Reference::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for Reference {
    fn from(name: &str) -> Self {
        Reference::Name(name.to_string())
    }
}

impl From<String> for Reference {
    fn from(name: String) -> Self {
        Reference::Name(name)
    }
}

impl From<usize> for Reference {
    fn from(index: usize) -> Self {
        Reference::Index(index)
    }
}

/// One element of a command template
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Known scalar, quoted
    Literal(Atom),
    /// Dynamic scalar, quoted
    Interpolated(Reference),
    /// Dynamic list, each element quoted
    InterpolatedList(Reference),
    /// Dynamic scalar, verbatim
    Escaped(Reference),
    /// Dynamic list, each element verbatim
    EscapedList(Reference),
}

impl TemplatePart {
    /// Build a literal from a dynamic value, rejecting anything that is not a scalar
    pub fn literal(value: impl Into<Value>) -> Result<Self, BadAtom> {
        let value: Value = value.into();
        Atom::try_from(value).map(TemplatePart::Literal)
    }

    pub fn interpolated(reference: impl Into<Reference>) -> Self {
        TemplatePart::Interpolated(reference.into())
    }

    pub fn interpolated_list(reference: impl Into<Reference>) -> Self {
        TemplatePart::InterpolatedList(reference.into())
    }

    pub fn escaped(reference: impl Into<Reference>) -> Self {
        TemplatePart::Escaped(reference.into())
    }

    pub fn escaped_list(reference: impl Into<Reference>) -> Self {
        TemplatePart::EscapedList(reference.into())
    }

    pub fn reference(&self) -> Option<&Reference> {
        match self {
            TemplatePart::Literal(_) => None,
            TemplatePart::Interpolated(r)
            | TemplatePart::InterpolatedList(r)
            | TemplatePart::Escaped(r)
            | TemplatePart::EscapedList(r) => Some(r),
        }
    }

    /// Arity a reference must resolve to, None for literals
    pub fn arity(&self) -> Option<Arity> {
        match self {
            TemplatePart::Literal(_) => None,
            TemplatePart::Interpolated(_) | TemplatePart::Escaped(_) => Some(Arity::Scalar),
            TemplatePart::InterpolatedList(_) | TemplatePart::EscapedList(_) => Some(Arity::List),
        }
    }

    pub fn is_quoted(&self) -> bool {
        !matches!(self, TemplatePart::Escaped(_) | TemplatePart::EscapedList(_))
    }
}

/// Metadata about all references in a template (for `inspect` output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub references: Vec<ReferenceMetadata>,
}

impl TemplateMetadata {
    pub fn from_template(template: &Template) -> Self {
        let references = template
            .parts
            .iter()
            .enumerate()
            .filter_map(|(index, part)| {
                part.reference().map(|reference| ReferenceMetadata {
                    index,
                    reference: reference.clone(),
                    list: part.arity() == Some(Arity::List),
                    quoted: part.is_quoted(),
                })
            })
            .collect();

        Self { references }
    }
}

/// Per-reference description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceMetadata {
    pub index: usize,
    pub reference: Reference,
    pub list: bool,
    pub quoted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_atoms() {
        assert_eq!(Atom::identifier("cp").render(), "cp");
        assert_eq!(Atom::text("My Files").render(), "My Files");
        assert_eq!(Atom::number(42).render(), "42");
        assert_eq!(Atom::number(-7i64).render(), "-7");
    }

    #[test]
    fn test_render_float_atom() {
        assert_eq!(render_atom(&json!(1.5)).unwrap(), "1.5");
        assert_eq!(render_atom(&json!(2.0)).unwrap(), "2.0");
    }

    #[test]
    fn test_render_atom_rejects_non_scalars() {
        for value in [json!(null), json!(true), json!([1]), json!({"k": "v"})] {
            let err = render_atom(&value).unwrap_err();
            assert_eq!(err.value, value.to_string());
        }
    }

    #[test]
    fn test_literal_construction_checks_atom() {
        assert_eq!(
            TemplatePart::literal("-r").unwrap(),
            TemplatePart::Literal(Atom::text("-r"))
        );
        assert_eq!(
            TemplatePart::literal(3).unwrap(),
            TemplatePart::Literal(Atom::number(3))
        );
        assert!(TemplatePart::literal(false).is_err());
        assert!(TemplatePart::literal(Value::Null).is_err());
        assert!(TemplatePart::literal(vec!["a", "b"]).is_err());
    }

    #[test]
    fn test_template_references() {
        let template = Template::new(vec![
            TemplatePart::Literal(Atom::identifier("cp")),
            TemplatePart::interpolated_list("files"),
            TemplatePart::escaped(0),
        ]);
        let refs = template.references();
        assert_eq!(refs, vec![&Reference::from("files"), &Reference::Index(0)]);
    }

    #[test]
    fn test_metadata_serializes() {
        let template = Template::new(vec![
            TemplatePart::Literal(Atom::identifier("ls")),
            TemplatePart::escaped_list("flags"),
        ]);
        let metadata = TemplateMetadata::from_template(&template);
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            json,
            json!({"references": [
                {"index": 1, "reference": "flags", "list": true, "quoted": false}
            ]})
        );
    }
}
