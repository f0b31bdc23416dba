//! Build POSIX shell command lines from templates without injection or
//! word-splitting surprises.
//!
//! ```
//! use shcmd::{expand, Bindings, TemplateParser};
//!
//! let template = TemplateParser::parse(r#"cp -r {@files} "My Files""#).unwrap();
//! let values = Bindings::new().with("files", vec!["file one", "file two"]);
//! assert_eq!(
//!     expand(&template.parts, &values).unwrap(),
//!     "cp -r 'file one' 'file two' 'My Files'"
//! );
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod helpers;

pub use domain::template::{
    expand, quote, quote_word, render_atom, Atom, Bindings, Context, Layered, QuoteStyle,
    Reference, Template, TemplateParser, TemplatePart, TemplateResolver,
};
pub use domain::Command;
pub use error::{Arity, BadAtom, ExpandError};
