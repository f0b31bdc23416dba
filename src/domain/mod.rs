pub mod template;

use serde_json::{Map, Value};

use crate::error::ExpandError;
use template::{Context, Layered, Reference, Template, TemplateResolver};

// Domain model for named command templates

#[derive(Debug, Clone)]
pub struct Command {
    pub template: Template,
    pub description: String,
    /// Values used when the caller does not supply one
    pub defaults: Map<String, Value>,
}

impl Command {
    pub fn new(template: Template, description: &str) -> Self {
        Self {
            template,
            description: description.to_string(),
            defaults: Map::new(),
        }
    }

    pub fn with_defaults(mut self, defaults: Map<String, Value>) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Expand the command, letting `values` override the defaults
    pub fn render<C: Context + ?Sized>(
        &self,
        resolver: &TemplateResolver,
        values: &C,
    ) -> Result<String, ExpandError> {
        resolver.resolve(&self.template, &Layered::new(values, &self.defaults))
    }

    /// References neither `values` nor the defaults can satisfy
    pub fn missing_references<C: Context + ?Sized>(&self, values: &C) -> Vec<Reference> {
        TemplateResolver::new()
            .missing_references(&self.template, &Layered::new(values, &self.defaults))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use template::{Bindings, TemplateParser};

    fn copy_command() -> Command {
        let mut defaults = Map::new();
        defaults.insert("dest".to_string(), json!("My Files"));
        Command::new(
            TemplateParser::parse("cp -r {@files} {dest}").unwrap(),
            "copy files",
        )
        .with_defaults(defaults)
    }

    #[test]
    fn test_description() {
        assert_eq!(copy_command().description(), "copy files");
    }

    #[test]
    fn test_render_uses_defaults() {
        let values = Bindings::new().with("files", vec!["file one", "file two"]);
        let result = copy_command()
            .render(&TemplateResolver::new(), &values)
            .unwrap();
        assert_eq!(result, "cp -r 'file one' 'file two' 'My Files'");
    }

    #[test]
    fn test_render_values_override_defaults() {
        let values = Bindings::new()
            .with("files", vec!["a"])
            .with("dest", "/backup");
        let result = copy_command()
            .render(&TemplateResolver::new(), &values)
            .unwrap();
        assert_eq!(result, "cp -r a /backup");
    }

    #[test]
    fn test_missing_references_ignores_defaults() {
        let missing = copy_command().missing_references(&Bindings::new());
        assert_eq!(missing, vec![Reference::from("files")]);
    }
}
