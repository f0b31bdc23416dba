// Template expansion against a value context

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use tracing::{debug, trace};

use super::ast::{Atom, Reference, Template, TemplatePart};
use super::quoting::{quote, quote_word};
use crate::error::{Arity, ExpandError};

/// Source of values for template references
pub trait Context {
    fn resolve(&self, reference: &Reference) -> Option<&Value>;
}

impl<C: Context + ?Sized> Context for &C {
    fn resolve(&self, reference: &Reference) -> Option<&Value> {
        (**self).resolve(reference)
    }
}

impl<S: BuildHasher> Context for HashMap<String, Value, S> {
    fn resolve(&self, reference: &Reference) -> Option<&Value> {
        match reference {
            Reference::Name(name) => self.get(name),
            Reference::Index(_) => None,
        }
    }
}

impl Context for BTreeMap<String, Value> {
    fn resolve(&self, reference: &Reference) -> Option<&Value> {
        match reference {
            Reference::Name(name) => self.get(name),
            Reference::Index(_) => None,
        }
    }
}

impl Context for Map<String, Value> {
    fn resolve(&self, reference: &Reference) -> Option<&Value> {
        match reference {
            Reference::Name(name) => self.get(name),
            Reference::Index(_) => None,
        }
    }
}

impl Context for [Value] {
    fn resolve(&self, reference: &Reference) -> Option<&Value> {
        match reference {
            Reference::Index(index) => self.get(*index),
            Reference::Name(_) => None,
        }
    }
}

impl Context for Vec<Value> {
    fn resolve(&self, reference: &Reference) -> Option<&Value> {
        self.as_slice().resolve(reference)
    }
}

impl Context for Value {
    fn resolve(&self, reference: &Reference) -> Option<&Value> {
        match self {
            Value::Object(map) => map.resolve(reference),
            Value::Array(items) => items.resolve(reference),
            _ => None,
        }
    }
}

/// Captured variables for an expansion, built up by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: HashMap<String, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind(name, value);
        self
    }

    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Append to a list binding, promoting an existing scalar to a list
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let slot = self
            .values
            .entry(name.into())
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(items) => items.push(value.into()),
            scalar => {
                let first = scalar.take();
                *scalar = Value::Array(vec![first, value.into()]);
            }
        }
    }

    pub fn extend(&mut self, values: Map<String, Value>) {
        self.values.extend(values);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Context for Bindings {
    fn resolve(&self, reference: &Reference) -> Option<&Value> {
        self.values.resolve(reference)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Self::new();
        for (name, value) in iter {
            bindings.bind(name, value);
        }
        bindings
    }
}

/// Resolves from `primary`, falling back to `fallback`
#[derive(Debug, Clone, Copy)]
pub struct Layered<A, B> {
    pub primary: A,
    pub fallback: B,
}

impl<A, B> Layered<A, B> {
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }
}

impl<A: Context, B: Context> Context for Layered<A, B> {
    fn resolve(&self, reference: &Reference) -> Option<&Value> {
        self.primary
            .resolve(reference)
            .or_else(|| self.fallback.resolve(reference))
    }
}

/// How quoted parts are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Leave words made only of shell-inert characters bare, reserved words excepted
    #[default]
    Minimal,
    /// Single-quote every quoted token
    Always,
}

/// Expands templates into shell command lines
#[derive(Debug, Clone, Default)]
pub struct TemplateResolver {
    quote_style: QuoteStyle,
}

impl TemplateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote_style(mut self, quote_style: QuoteStyle) -> Self {
        self.quote_style = quote_style;
        self
    }

    /// Resolve template with the given context
    pub fn resolve<C: Context + ?Sized>(
        &self,
        template: &Template,
        context: &C,
    ) -> Result<String, ExpandError> {
        self.expand(&template.parts, context)
    }

    /// Expand parts in order and join the tokens with single spaces
    pub fn expand<C: Context + ?Sized>(
        &self,
        parts: &[TemplatePart],
        context: &C,
    ) -> Result<String, ExpandError> {
        let tokens = parts
            .iter()
            .enumerate()
            .map(|(index, part)| self.expand_part(index, part, context))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(parts = parts.len(), "expanded template");
        Ok(tokens.join(" "))
    }

    fn expand_part<C: Context + ?Sized>(
        &self,
        index: usize,
        part: &TemplatePart,
        context: &C,
    ) -> Result<String, ExpandError> {
        trace!(index, ?part, "expanding part");
        match part {
            TemplatePart::Literal(atom) => Ok(self.quote(&atom.render())),
            TemplatePart::Interpolated(reference) => {
                let atom = resolve_scalar(index, reference, context)?;
                Ok(self.quote(&atom.render()))
            }
            TemplatePart::InterpolatedList(reference) => {
                let atoms = resolve_list(index, reference, context)?;
                let quoted: Vec<String> = atoms
                    .iter()
                    .map(|atom| self.quote(&atom.render()))
                    .collect();
                Ok(quoted.join(" "))
            }
            TemplatePart::Escaped(reference) => {
                resolve_scalar(index, reference, context).map(|atom| atom.render())
            }
            TemplatePart::EscapedList(reference) => {
                let atoms = resolve_list(index, reference, context)?;
                let raw: Vec<String> = atoms.iter().map(Atom::render).collect();
                Ok(raw.join(" "))
            }
        }
    }

    fn quote(&self, text: &str) -> String {
        match self.quote_style {
            QuoteStyle::Minimal => quote_word(text).into_owned(),
            QuoteStyle::Always => quote(text),
        }
    }

    /// References in the template that the context cannot resolve
    pub fn missing_references<C: Context + ?Sized>(
        &self,
        template: &Template,
        context: &C,
    ) -> Vec<Reference> {
        let mut missing: Vec<Reference> = Vec::new();

        for reference in template.references() {
            if context.resolve(reference).is_none() && !missing.contains(reference) {
                missing.push(reference.clone());
            }
        }

        missing
    }
}

/// Expand parts with the default resolver
pub fn expand<C: Context + ?Sized>(
    parts: &[TemplatePart],
    context: &C,
) -> Result<String, ExpandError> {
    TemplateResolver::new().expand(parts, context)
}

fn lookup<'a, C: Context + ?Sized>(
    index: usize,
    reference: &Reference,
    context: &'a C,
) -> Result<&'a Value, ExpandError> {
    context
        .resolve(reference)
        .ok_or_else(|| ExpandError::UnresolvedReference {
            index,
            reference: reference.clone(),
        })
}

fn to_atom(index: usize, reference: &Reference, value: &Value) -> Result<Atom, ExpandError> {
    Atom::try_from(value).map_err(|source| ExpandError::BadAtom {
        index,
        reference: reference.clone(),
        source,
    })
}

fn resolve_scalar<C: Context + ?Sized>(
    index: usize,
    reference: &Reference,
    context: &C,
) -> Result<Atom, ExpandError> {
    match lookup(index, reference, context)? {
        Value::Array(_) => Err(ExpandError::TypeMismatch {
            index,
            reference: reference.clone(),
            expected: Arity::Scalar,
            found: Arity::List,
        }),
        value => to_atom(index, reference, value),
    }
}

fn resolve_list<C: Context + ?Sized>(
    index: usize,
    reference: &Reference,
    context: &C,
) -> Result<Vec<Atom>, ExpandError> {
    match lookup(index, reference, context)? {
        Value::Array(items) => items
            .iter()
            .map(|item| to_atom(index, reference, item))
            .collect(),
        _ => Err(ExpandError::TypeMismatch {
            index,
            reference: reference.clone(),
            expected: Arity::List,
            found: Arity::Scalar,
        }),
    }
}
