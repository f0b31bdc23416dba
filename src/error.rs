// Error types for template construction and expansion

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::domain::template::Reference;

/// A value was presented as a scalar but is not an identifier, string or number
#[derive(Debug, Clone, PartialEq, Error)]
#[error("bad atom: {value} is not an identifier, string or number")]
pub struct BadAtom {
    pub value: String,
}

impl BadAtom {
    pub fn new(value: &Value) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

/// Whether a part wants a single value or a list of values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Scalar,
    List,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Scalar => write!(f, "a single value"),
            Arity::List => write!(f, "a list"),
        }
    }
}

/// Expansion failure. Every variant names the offending part and its reference.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpandError {
    #[error("part {index}: unresolved reference `{reference}`")]
    UnresolvedReference { index: usize, reference: Reference },

    #[error("part {index}: `{reference}` should be {expected} but is {found}")]
    TypeMismatch {
        index: usize,
        reference: Reference,
        expected: Arity,
        found: Arity,
    },

    #[error("part {index}: `{reference}`: {source}")]
    BadAtom {
        index: usize,
        reference: Reference,
        #[source]
        source: BadAtom,
    },
}

impl ExpandError {
    /// Position of the failing part in the template
    pub fn index(&self) -> usize {
        match self {
            ExpandError::UnresolvedReference { index, .. }
            | ExpandError::TypeMismatch { index, .. }
            | ExpandError::BadAtom { index, .. } => *index,
        }
    }

    pub fn reference(&self) -> &Reference {
        match self {
            ExpandError::UnresolvedReference { reference, .. }
            | ExpandError::TypeMismatch { reference, .. }
            | ExpandError::BadAtom { reference, .. } => reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bad_atom_reports_value() {
        let err = BadAtom::new(&json!({"a": 1}));
        assert_eq!(err.value, r#"{"a":1}"#);
        assert!(err.to_string().contains(r#"{"a":1}"#));
    }

    #[test]
    fn test_expand_error_display() {
        let err = ExpandError::TypeMismatch {
            index: 2,
            reference: Reference::from("files"),
            expected: Arity::List,
            found: Arity::Scalar,
        };
        assert_eq!(
            err.to_string(),
            "part 2: `files` should be a list but is a single value"
        );
        assert_eq!(err.index(), 2);
        assert_eq!(err.reference(), &Reference::from("files"));
    }
}
