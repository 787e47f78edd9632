mod builtins;
mod config;
mod env;
mod error;
mod eval;
mod parser;
mod value;

use builtins::register_builtins;
use clap::Parser;
use config::{BUILTINS_SUMMARY, HELP_TEXT, VERSION, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use env::{Env, Environment};
use eval::eval;
use parser::parse;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use std::path::PathBuf;

/// A small Lisp-family interpreter
#[derive(Parser, Debug)]
#[command(name = "inky-core")]
#[command(version = VERSION)]
#[command(about = "A small Lisp-family interpreter")]
struct CliArgs {
    /// Script file to execute (optional - if not provided, starts REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

const PRELUDE_SOURCE: &str = include_str!("../prelude/prelude.lisp");
const HISTORY_FILE: &str = ".inky_history";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let env = Environment::new();
    register_builtins(&env);
    load_prelude(&env);

    if let Some(script_path) = args.script {
        run_script(&script_path, &env)?;
        return Ok(());
    }

    run_repl(&env)
}

/// Feeds the bundled prelude through `parse`+`eval` before the prompt
/// appears or a script runs. Failures are reported but not fatal: the
/// interpreter is still usable without it.
fn load_prelude(env: &Env) {
    match parse(PRELUDE_SOURCE) {
        Ok(forms) => {
            for form in forms.into_cells("prelude").unwrap_or_default() {
                if let Err(e) = eval(env, form) {
                    eprintln!("Warning: failed to load prelude: {}", e);
                    break;
                }
            }
        }
        Err(e) => eprintln!("Warning: failed to parse prelude: {}", e),
    }
}

/// Executes a script file: every top-level form is parsed and evaluated
/// in order, and an error anywhere stops the run.
fn run_script(path: &PathBuf, env: &Env) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read script file {}: {}", path.display(), e))?;

    let forms = parse(&contents).map_err(|e| format!("parse error: {}", e))?;
    for form in forms.into_cells("script").unwrap_or_default() {
        eval(env, form).map_err(|e| format!("evaluation error: {}", e))?;
    }
    Ok(())
}

fn run_repl(env: &Env) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl = DefaultEditor::with_config(config)
        .map_err(|e| format!("failed to initialize REPL: {}", e))?;
    let _ = rl.load_history(HISTORY_FILE);

    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);

    let mut debug_echo = false;

    loop {
        let readline = rl.readline("inky> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() || trimmed.starts_with(';') {
                    continue;
                }

                match trimmed {
                    ":q" | ":quit" => {
                        println!("Goodbye!");
                        break;
                    }
                    ":t" => {
                        debug_echo = !debug_echo;
                        println!("debug echo: {}", if debug_echo { "on" } else { "off" });
                        continue;
                    }
                    ":h" | ":help" => {
                        println!("{}", HELP_TEXT);
                        println!("{}", BUILTINS_SUMMARY);
                        continue;
                    }
                    _ => {}
                }

                match parse(trimmed) {
                    Ok(forms) => {
                        for form in forms.into_cells("repl").unwrap_or_default() {
                            if debug_echo {
                                println!(": {}", form);
                            }
                            match eval(env, form) {
                                Ok(result) => println!("=> {}", result),
                                Err(e) => eprintln!("Error: {}", e),
                            }
                        }
                    }
                    Err(e) => eprintln!("Parse error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
    Ok(())
}
