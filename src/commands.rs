//! Command execution.

use crate::config::Config;
use crate::Commands;
use colored::Colorize;
use serde_json::json;
use stepgraph_core::GraphSummary;
use stepgraph_template::TemplateError;

/// Executes a command and returns the formatted output.
pub fn execute(config: &Config, cmd: Commands) -> Result<String, Box<dyn std::error::Error>> {
    match cmd {
        Commands::Repl => unreachable!(),

        Commands::Render {
            template,
            args,
            json,
        } => {
            let output = render(config, &template, &args)?;
            if json || config.output.json {
                Ok(serde_json::to_string_pretty(&json!({ "output": output }))?)
            } else {
                Ok(output)
            }
        }

        Commands::Describe => Ok(format_summary(&describe(config)?)?),

        Commands::Config => Ok(serde_yaml::to_string(config)?),
    }
}

/// Renders `text` with the configured syntax and limits.
pub fn render<A: AsRef<str>>(
    config: &Config,
    text: &str,
    args: &[A],
) -> Result<String, TemplateError> {
    config.template()?.render(text, args)
}

pub fn describe(config: &Config) -> Result<GraphSummary, TemplateError> {
    Ok(config.template()?.describe())
}

pub fn format_summary(summary: &GraphSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}

/// One line per error, with its code, for terminal display.
pub fn format_error(error: &TemplateError) -> String {
    format!("{} [{}]: {}", "Error".red(), error.error_code().yellow(), error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_command() {
        let out = execute(
            &Config::default(),
            Commands::Render {
                template: "Hello {0}".into(),
                args: vec!["world".into()],
                json: false,
            },
        )
        .unwrap();
        assert_eq!(out, "Hello world");
    }

    #[test]
    fn test_render_command_json() {
        let out = execute(
            &Config::default(),
            Commands::Render {
                template: "{0}{0}".into(),
                args: vec!["ab".into()],
                json: true,
            },
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["output"], "abab");
    }

    #[test]
    fn test_render_command_error() {
        let err = execute(
            &Config::default(),
            Commands::Render {
                template: "{9}".into(),
                args: Vec::new(),
                json: false,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn test_describe_command() {
        let out = execute(&Config::default(), Commands::Describe).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(value["nodes"][0]["name"], "raw");
    }

    #[test]
    fn test_config_command() {
        let out = execute(&Config::default(), Commands::Config).unwrap();
        let parsed: Config = serde_yaml::from_str(&out).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_format_error_has_code() {
        colored::control::set_override(false);
        let err = render(&Config::default(), "{", &[] as &[&str]).unwrap_err();
        assert_eq!(
            format_error(&err),
            "Error [SYNTAX_ERROR]: syntax error at byte 1: unexpected end of input"
        );
    }
}
