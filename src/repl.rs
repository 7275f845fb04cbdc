//! Interactive REPL.

use crate::commands::{describe, format_error, format_summary, render};
use crate::config::Config;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::path::PathBuf;

const HELP_TEXT: &str = r#"
Available commands:
  help                          Show this help

  render <template> [args...]   Render a template (args default to `args`)
  args [a b c ...]              Set or show the default arguments
  describe                      Show the template state machine

  quit, exit                    Exit the REPL

A template is the rest of the line after `render`; quote it with '...' or
"..." to pass explicit arguments after it.
"#;

/// REPL session state.
#[derive(Debug, Default)]
struct Session {
    args: Vec<String>,
}

pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "stepgraph".bold().cyan());

    let editor_config = rustyline::Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .build();
    let mut rl: Editor<(), DefaultHistory> = Editor::with_config(editor_config)?;

    let history_path = history_path();
    let _ = rl.load_history(&history_path);

    println!("Type 'help' for available commands.\n");

    let mut session = Session::default();
    loop {
        let prompt = format!("{} ", "stepgraph>".cyan());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match execute_repl_command(config, &mut session, line) {
                    Ok(Some(output)) => println!("{}\n", output),
                    Ok(None) => break,
                    Err(e) => println!("{}: {}\n", "Error".red(), e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                println!("{}: {:?}", "Error".red(), err);
                break;
            }
        }
    }

    let _ = rl.save_history(&history_path);
    Ok(())
}

fn history_path() -> PathBuf {
    home::home_dir()
        .map(|h| h.join(".stepgraph_history"))
        .unwrap_or_else(|| ".stepgraph_history".into())
}

fn execute_repl_command(
    config: &Config,
    session: &mut Session,
    line: &str,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match cmd.to_lowercase().as_str() {
        "help" | "?" => Ok(Some(HELP_TEXT.to_string())),

        "quit" | "exit" | "q" => Ok(None),

        "args" | "a" => {
            if !rest.is_empty() {
                session.args = rest.split_whitespace().map(String::from).collect();
            }
            if session.args.is_empty() {
                Ok(Some("No default arguments".yellow().to_string()))
            } else {
                let listed: Vec<_> = session
                    .args
                    .iter()
                    .enumerate()
                    .map(|(i, a)| format!("  {{{}}} = {}", i, a.cyan()))
                    .collect();
                Ok(Some(listed.join("\n")))
            }
        }

        "render" | "r" => {
            if rest.is_empty() {
                return Ok(Some("Usage: render <template> [args...]".to_string()));
            }
            let (template, args) = match split_quoted(rest) {
                Some((template, args)) => (template, args),
                None => (rest.to_string(), session.args.clone()),
            };
            match render(config, &template, &args) {
                Ok(output) => Ok(Some(output)),
                Err(e) => Ok(Some(format_error(&e))),
            }
        }

        "describe" | "d" => Ok(Some(format_summary(&describe(config)?)?)),

        _ => Ok(Some(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            cmd
        ))),
    }
}

/// Splits `'template' a b c` into the quoted template and its arguments.
/// Returns `None` when the line does not start with a quote.
fn split_quoted(line: &str) -> Option<(String, Vec<String>)> {
    let quote = line.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let body = &line[quote.len_utf8()..];
    let close = body.find(quote)?;

    let template = body[..close].to_string();
    let args = body[close + quote.len_utf8()..]
        .split_whitespace()
        .map(String::from)
        .collect();
    Some((template, args))
}
