// Template module for shell command templates
//
// This module provides the part model, parsing of the short template syntax,
// and expansion of templates into safely quoted POSIX command lines.

mod ast;
mod parser;
mod quoting;
mod resolver;

pub use ast::{
    render_atom, Atom, Reference, ReferenceMetadata, Template, TemplateMetadata, TemplatePart,
};
pub use parser::TemplateParser;
pub use quoting::{is_shell_safe, quote, quote_word};
pub use resolver::{expand, Bindings, Context, Layered, QuoteStyle, TemplateResolver};
