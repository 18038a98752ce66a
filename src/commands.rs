//! Command execution.

use crate::{Commands, Context};
use colored::Colorize;
use enumfield_core::{EnumDefinition, Identifier};
use enumfield_field::EnumField;
use serde_json::Value;

/// Executes a command and returns the formatted output.
pub fn execute(ctx: &Context, cmd: Commands) -> Result<String, Box<dyn std::error::Error>> {
    match cmd {
        Commands::List => {
            if ctx.registry.is_empty() {
                return Ok("No enums loaded".yellow().to_string());
            }

            let lines: Vec<String> = ctx
                .registry
                .iter()
                .map(|def| {
                    format!(
                        "{} ({} members, {})",
                        def.enum_name().cyan(),
                        def.len(),
                        transitions_summary(def)
                    )
                })
                .collect();
            Ok(lines.join("\n"))
        }

        Commands::Show { name, json } => {
            let def = ctx.registry.get(&name)?;
            if json {
                return Ok(serde_json::to_string_pretty(&def.to_json()?)?);
            }

            let mut output = format!(
                "{}\n",
                format!("Enum {} (checksum: {})", name.cyan(), def.checksum()).bold()
            );

            for (value, member) in def.choices() {
                let marker = if value == def.default() { "*" } else { " " };
                let label = def.label(value)?.resolve(ctx.translator.as_ref());
                output.push_str(&format!(
                    "{} {:>6}  {:<20} {}",
                    marker,
                    value,
                    member.name(),
                    label.dimmed()
                ));
                if let Ok(origins) = def.transition_origins(value) {
                    output.push_str(&format!("  <- [{}]", member_names(&def, origins.iter())));
                }
                output.push('\n');
            }
            output.push_str(&format!("transitions: {}", transitions_summary(&def)));
            Ok(output)
        }

        Commands::Get { name, member } => {
            let def = ctx.registry.get(&name)?;
            let found = def.try_get(Identifier::parse(&member))?;
            let label = def.label(found.value())?.resolve(ctx.translator.as_ref());
            Ok(format!(
                "{} = {} ({})",
                found.name().cyan(),
                found.value(),
                label
            ))
        }

        Commands::Label { name, member } => {
            let def = ctx.registry.get(&name)?;
            let value = EnumField::new(&def).to_storage(Identifier::parse(&member))?;
            Ok(def.label(value)?.resolve(ctx.translator.as_ref()))
        }

        Commands::Check { name, from, to } => {
            let def = ctx.registry.get(&name)?;
            let field = EnumField::new(&def);
            let from = field.to_storage(Identifier::parse(&from))?;
            let to = field.to_storage(Identifier::parse(&to))?;
            field.validate_transition(from, to)?;
            Ok(format!(
                "{} {} -> {}",
                "Valid".green(),
                def.name(from)?,
                def.name(to)?
            ))
        }

        Commands::Origins { name, to } => {
            let def = ctx.registry.get(&name)?;
            let to = EnumField::new(&def).to_storage(Identifier::parse(&to))?;
            let origins = def.transition_origins(to)?;
            if origins.is_empty() {
                return Ok(format!("No members may transition into {}", def.name(to)?)
                    .yellow()
                    .to_string());
            }
            Ok(member_names(&def, origins.iter()))
        }

        Commands::Field {
            name,
            null,
            blank,
            db_index,
            default,
            options,
        } => {
            let def = ctx.registry.get(&name)?;
            let mut field = EnumField::new(&def);
            if null {
                field = field.null(true);
            }
            if blank {
                field = field.blank(true);
            }
            if db_index {
                field = field.db_index(true);
            }
            if let Some(default) = default {
                field = field.default(default);
            }
            for option in &options {
                let (key, value) = parse_option(option)?;
                field = field.option(key, value);
            }

            let config = field.config_with(ctx.translator.as_ref())?;
            Ok(serde_json::to_string_pretty(&config)?)
        }

        Commands::Validate => {
            let lines: Vec<String> = ctx
                .registry
                .iter()
                .map(|def| {
                    format!(
                        "{} {} ({})",
                        "OK".green(),
                        def.enum_name().cyan(),
                        def.checksum()
                    )
                })
                .collect();
            Ok(format!(
                "{}\n{} enum(s) valid",
                lines.join("\n"),
                ctx.registry.len()
            ))
        }
    }
}

fn transitions_summary(def: &EnumDefinition) -> String {
    match def.transitions() {
        Some(table) => format!("{} transition target(s)", table.len()),
        None => "unconstrained transitions".to_string(),
    }
}

fn member_names<'a>(def: &EnumDefinition, values: impl Iterator<Item = &'a i64>) -> String {
    values
        .map(|v| def.name(*v).map_or_else(|_| v.to_string(), str::to_string))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses `key=value`; the value is JSON if it parses, otherwise a string.
fn parse_option(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid option '{}': expected KEY=VALUE", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid option '{}': empty key", s));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use enumfield_core::{CatalogTranslator, EnumRegistry, NoopTranslator};

    const BEER: &str = r#"
name: BeerStyle
members:
  LAGER: 0
  STOUT: 1
  WEISSBIER: 2
transitions:
  STOUT: LAGER
  WEISSBIER: STOUT
"#;

    fn context() -> Context {
        colored::control::set_override(false);
        let mut registry = EnumRegistry::new();
        registry.load_yaml(BEER).unwrap();
        Context {
            registry,
            translator: Box::new(NoopTranslator),
        }
    }

    #[test]
    fn test_check_transition() {
        let ctx = context();
        let output = execute(
            &ctx,
            Commands::Check {
                name: "BeerStyle".into(),
                from: "lager".into(),
                to: "1".into(),
            },
        )
        .unwrap();
        assert_eq!(output, "Valid LAGER -> STOUT");

        let err = execute(
            &ctx,
            Commands::Check {
                name: "BeerStyle".into(),
                from: "LAGER".into(),
                to: "WEISSBIER".into(),
            },
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid transition for BeerStyle: LAGER -> WEISSBIER"
        );
    }

    #[test]
    fn test_label_uses_translator() {
        let mut ctx = context();
        ctx.translator = Box::new(CatalogTranslator::from_yaml("Weissbier: Weißbier\n").unwrap());
        let output = execute(
            &ctx,
            Commands::Label {
                name: "BeerStyle".into(),
                member: "2".into(),
            },
        )
        .unwrap();
        assert_eq!(output, "Weißbier");
    }

    #[test]
    fn test_origins() {
        let ctx = context();
        let output = execute(
            &ctx,
            Commands::Origins {
                name: "BeerStyle".into(),
                to: "weissbier".into(),
            },
        )
        .unwrap();
        assert_eq!(output, "STOUT");

        let err = execute(
            &ctx,
            Commands::Origins {
                name: "BeerStyle".into(),
                to: "LAGER".into(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("no transitions into 0"));
    }

    #[test]
    fn test_field_config_json() {
        let ctx = context();
        let output = execute(
            &ctx,
            Commands::Field {
                name: "BeerStyle".into(),
                null: false,
                blank: false,
                db_index: true,
                default: Some("STOUT".into()),
                options: vec!["max_length=3".into(), "verbose_name=style".into()],
            },
        )
        .unwrap();
        let json: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["default"], 1);
        assert_eq!(json["options"]["db_index"], true);
        assert_eq!(json["options"]["max_length"], 3);
        assert_eq!(json["options"]["verbose_name"], "style");
        assert_eq!(json["choices"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_unknown_enum() {
        let ctx = context();
        let err = execute(
            &ctx,
            Commands::Show {
                name: "Porter".into(),
                json: false,
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "enum not found: Porter");
    }

    #[test]
    fn test_list() {
        let ctx = context();
        let output = execute(&ctx, Commands::List).unwrap();
        assert_eq!(output, "BeerStyle (3 members, 2 transition target(s))");

        let empty = Context {
            registry: EnumRegistry::new(),
            translator: Box::new(NoopTranslator),
        };
        assert_eq!(execute(&empty, Commands::List).unwrap(), "No enums loaded");
    }

    #[test]
    fn test_show() {
        let ctx = context();
        let output = execute(
            &ctx,
            Commands::Show {
                name: "BeerStyle".into(),
                json: false,
            },
        )
        .unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Enum BeerStyle (checksum: "));
        assert!(lines[1].starts_with("*      0  LAGER"));
        assert!(lines[2].contains("STOUT"));
        assert!(lines[2].ends_with("<- [LAGER]"));
        assert!(lines[3].contains("Weissbier"));
        assert!(lines[3].ends_with("<- [STOUT]"));
        assert_eq!(lines[4], "transitions: 2 transition target(s)");
    }

    #[test]
    fn test_show_json() {
        let ctx = context();
        let output = execute(
            &ctx,
            Commands::Show {
                name: "BeerStyle".into(),
                json: true,
            },
        )
        .unwrap();
        let json: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["name"], "BeerStyle");
        assert_eq!(json["members"]["WEISSBIER"], 2);
        assert_eq!(json["transitions"]["STOUT"], serde_json::json!(["LAGER"]));
    }

    #[test]
    fn test_get_member() {
        let ctx = context();
        let output = execute(
            &ctx,
            Commands::Get {
                name: "BeerStyle".into(),
                member: "lager".into(),
            },
        )
        .unwrap();
        assert_eq!(output, "LAGER = 0 (Lager)");

        let output = execute(
            &ctx,
            Commands::Get {
                name: "BeerStyle".into(),
                member: "2".into(),
            },
        )
        .unwrap();
        assert_eq!(output, "WEISSBIER = 2 (Weissbier)");

        let err = execute(
            &ctx,
            Commands::Get {
                name: "BeerStyle".into(),
                member: "porter".into(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("porter"));
    }

    #[test]
    fn test_validate() {
        let ctx = context();
        let checksum = ctx.registry.get("BeerStyle").unwrap().checksum().to_string();
        let output = execute(&ctx, Commands::Validate).unwrap();
        assert_eq!(
            output,
            format!("OK BeerStyle ({})\n1 enum(s) valid", checksum)
        );
    }

    #[test]
    fn test_parse_option() {
        assert_eq!(
            parse_option("null=true").unwrap(),
            ("null".to_string(), Value::Bool(true))
        );
        assert_eq!(
            parse_option("help_text=Style").unwrap(),
            ("help_text".to_string(), Value::String("Style".into()))
        );
        assert!(parse_option("novalue").is_err());
        assert!(parse_option("=1").is_err());
    }
}
