use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches};
use shcmd::config::commands::AliasAndCommand;
use shcmd::domain::template::{quote, TemplateMetadata};
use shcmd::{helpers, Bindings, QuoteStyle, TemplateParser, TemplateResolver};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn value_args() -> Vec<Arg> {
    vec![
        Arg::new("values")
            .short('f')
            .long("values")
            .value_name("FILE")
            .value_parser(value_parser!(PathBuf))
            .help("Path to a YAML or JSON file mapping names to values"),
        Arg::new("set")
            .short('s')
            .long("set")
            .value_name("NAME=VALUE")
            .action(ArgAction::Append)
            .help("Bind a single value"),
        Arg::new("push")
            .short('p')
            .long("push")
            .value_name("NAME=VALUE")
            .action(ArgAction::Append)
            .help("Append a value to a list"),
        Arg::new("always_quote")
            .long("always-quote")
            .action(ArgAction::SetTrue)
            .help("Single-quote every quoted word, even when it is shell-safe"),
    ]
}

fn cli() -> clap::Command {
    let commands_arg = Arg::new("commands")
        .short('c')
        .long("commands")
        .value_name("COMMANDS")
        .value_parser(value_parser!(PathBuf))
        .help("Path to a YAML file containing commands");

    clap::Command::new("shcmd")
        .about("Build safely quoted POSIX shell command lines from templates")
        .subcommand_required(true)
        .subcommand(
            clap::Command::new("expand")
                .about("Expand a template string")
                .arg(Arg::new("template").required(true).value_name("TEMPLATE"))
                .args(value_args()),
        )
        .subcommand(
            clap::Command::new("run")
                .about("Expand a command from the catalog")
                .arg(Arg::new("alias").required(true).value_name("ALIAS"))
                .arg(commands_arg.clone())
                .args(value_args()),
        )
        .subcommand(
            clap::Command::new("list")
                .about("List catalog commands")
                .arg(commands_arg),
        )
        .subcommand(
            clap::Command::new("inspect")
                .about("Print the references of a template as JSON")
                .arg(Arg::new("template").required(true).value_name("TEMPLATE")),
        )
        .subcommand(
            clap::Command::new("quote")
                .about("Quote each word for a POSIX shell")
                .arg(
                    Arg::new("words")
                        .value_name("WORDS")
                        .num_args(0..)
                        .allow_hyphen_values(true),
                ),
        )
}

fn resolver_from(matches: &ArgMatches) -> TemplateResolver {
    let quote_style = if matches.get_flag("always_quote") {
        QuoteStyle::Always
    } else {
        QuoteStyle::Minimal
    };
    TemplateResolver::new().with_quote_style(quote_style)
}

fn bindings_from(matches: &ArgMatches) -> Result<Bindings> {
    let file = matches
        .get_one::<PathBuf>("values")
        .map(|path| helpers::load_values_file(path))
        .transpose()?;
    let sets = matches
        .get_many::<String>("set")
        .unwrap_or_default()
        .map(String::as_str);
    let pushes = matches
        .get_many::<String>("push")
        .unwrap_or_default()
        .map(String::as_str);
    helpers::build_bindings(file, sets, pushes)
}

fn run(matches: ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("expand", sub)) => {
            let source = sub.get_one::<String>("template").map(String::as_str).unwrap_or("");
            let template = TemplateParser::parse(source).context("Invalid template")?;
            let bindings = bindings_from(sub)?;
            println!("{}", resolver_from(sub).resolve(&template, &bindings)?);
        }
        Some(("run", sub)) => {
            let alias = sub.get_one::<String>("alias").map(String::as_str).unwrap_or("");
            let catalog = AliasAndCommand::get_alias_to_command_map(
                sub.get_one::<PathBuf>("commands").map(PathBuf::as_path),
            )?;
            let Some(command) = catalog.get(alias) else {
                bail!("Unknown alias: {}", alias);
            };
            let bindings = bindings_from(sub)?;
            let missing = command.missing_references(&bindings);
            if !missing.is_empty() {
                let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
                bail!("Missing values for '{}': {}", alias, names.join(", "));
            }
            println!("{}", command.render(&resolver_from(sub), &bindings)?);
        }
        Some(("list", sub)) => {
            let catalog = AliasAndCommand::get_alias_to_command_map(
                sub.get_one::<PathBuf>("commands").map(PathBuf::as_path),
            )?;
            let mut aliases: Vec<_> = catalog.iter().collect();
            aliases.sort_by(|a, b| a.0.cmp(b.0));
            for (alias, command) in aliases {
                println!("{}\t{}", alias, command.description());
            }
        }
        Some(("inspect", sub)) => {
            let source = sub.get_one::<String>("template").map(String::as_str).unwrap_or("");
            let template = TemplateParser::parse(source).context("Invalid template")?;
            let metadata = TemplateMetadata::from_template(&template);
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        Some(("quote", sub)) => {
            let quoted: Vec<String> = sub
                .get_many::<String>("words")
                .unwrap_or_default()
                .map(|word| quote(word))
                .collect();
            println!("{}", quoted.join(" "));
        }
        _ => unreachable!("subcommand_required is set"),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(cli().get_matches())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn test_bindings_from_flags() {
        let matches = cli().get_matches_from([
            "shcmd", "expand", "cp {@files} {dest}", "--set", "dest=out", "-p", "files=a", "-p",
            "files=b c",
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        let bindings = bindings_from(sub).unwrap();
        let template = TemplateParser::parse("cp {@files} {dest}").unwrap();

        assert_eq!(
            resolver_from(sub).resolve(&template, &bindings).unwrap(),
            "cp a 'b c' out"
        );
    }

    #[test]
    fn test_always_quote_flag() {
        let matches = cli().get_matches_from(["shcmd", "expand", "ls", "--always-quote"]);
        let (_, sub) = matches.subcommand().unwrap();
        let template = TemplateParser::parse("ls").unwrap();

        assert_eq!(
            resolver_from(sub).resolve(&template, &Bindings::new()).unwrap(),
            "'ls'"
        );
    }
}
