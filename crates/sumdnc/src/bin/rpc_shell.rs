//! Interactive procedure shell over an in-memory, demo-seeded database.
//!
//! Each line is `<path> [json]`, e.g. `post.getAll {"limit": 2}`.
//! `:metrics` prints the listing counters, `:quit` exits.

use rustyline::{DefaultEditor, error::ReadlineError};
use std::process::ExitCode;
use sumdnc::{
    config::Config,
    context::Context,
    core::{obs::metrics_report, types::Timestamp},
    router,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(environment = %config.environment, "starting rpc shell");

    let ctx = Context::new(config);
    if let Err(err) = ctx.db().seed_demo(Timestamp::now()) {
        eprintln!("failed to seed demo data: {err}");
        return ExitCode::FAILURE;
    }

    match run(&ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("shell error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(ctx: &Context) -> Result<(), ReadlineError> {
    let mut editor = DefaultEditor::new()?;

    loop {
        let line = match editor.readline("sumdnc> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(()),
            Err(err) => return Err(err),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line);

        match line {
            ":quit" | ":q" => return Ok(()),
            ":metrics" => {
                println!("{:#?}", metrics_report(None));
                continue;
            }
            _ => {}
        }

        let (path, raw) = line.split_once(' ').unwrap_or((line, "null"));
        let input = match serde_json::from_str(raw) {
            Ok(input) => input,
            Err(err) => {
                println!("invalid json: {err}");
                continue;
            }
        };

        match router::call(ctx, path, input) {
            Ok(output) => println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
            ),
            Err(err) => println!(
                "{}",
                serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string())
            ),
        }
    }
}
