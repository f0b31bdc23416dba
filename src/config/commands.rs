use crate::{
    config::yml_settings::YmlSettings,
    domain::{template::TemplateParser, Command},
};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "commands.yml";

/// AliasAndCommand holds a command template the user can expand and an alias
/// the user can use to reference that command.
pub struct AliasAndCommand {
    alias: String,
    command: Command,
}

impl TryFrom<YmlSettings> for AliasAndCommand {
    type Error = anyhow::Error;

    fn try_from(value: YmlSettings) -> Result<Self> {
        let template = TemplateParser::parse(&value.template)
            .with_context(|| format!("Invalid template for alias '{}'", value.alias))?;
        let command = Command::new(template, &value.description).with_defaults(value.defaults);
        Ok(Self {
            alias: value.alias,
            command,
        })
    }
}

impl AliasAndCommand {
    fn create_alias_to_command_map(
        alias_and_commands: Vec<AliasAndCommand>,
    ) -> Result<HashMap<String, Command>> {
        let mut map = HashMap::new();
        for alias_and_command in alias_and_commands.into_iter() {
            if map.contains_key(&alias_and_command.alias) {
                bail!("Duplicate alias: {}", alias_and_command.alias);
            }
            map.insert(alias_and_command.alias, alias_and_command.command);
        }
        Ok(map)
    }

    /// Parse a YAML list of command settings
    pub fn parse_alias_to_command_map(yml: &str) -> Result<HashMap<String, Command>> {
        let settings: Vec<YmlSettings> =
            serde_yaml::from_str(yml).context("Invalid yaml configuration")?;
        let alias_and_commands = settings
            .into_iter()
            .map(AliasAndCommand::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::create_alias_to_command_map(alias_and_commands)
    }

    pub fn get_alias_to_command_map(maybe_yml: Option<&Path>) -> Result<HashMap<String, Command>> {
        let path = maybe_yml.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let yml = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let map = Self::parse_alias_to_command_map(&yml)
            .with_context(|| format!("Could not load commands from {}", path.display()))?;
        debug!(path = %path.display(), commands = map.len(), "loaded command catalog");
        Ok(map)
    }
}
