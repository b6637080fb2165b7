use std::process::ExitCode;

use ember::{Ember, EmberError, Settings, cli::*};
use palc::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(std::io::stderr)
		.init();

	match Cli::parse().mode {
		Mode::File { path, ast, emit, max_depth } => {
			let ember = Ember::new(settings(max_depth));
			let result = if ast {
				ember.ast_file(&path).map(|program| println!("{program}"))
			} else if emit {
				ember.emit_file(&path).map(|target| println!("Wrote {}", target.display()))
			} else {
				ember.run_file(&path).map(|_| ())
			};
			report(result)
		}
		Mode::Repl { max_depth } => {
			Ember::new(settings(max_depth)).run_prompt();
			ExitCode::SUCCESS
		}
	}
}

fn settings(max_depth: Option<usize>) -> Settings {
	let mut settings = Settings::default();
	if let Some(max_depth) = max_depth {
		settings.max_call_depth = max_depth;
	}
	settings
}

fn report(result: Result<(), EmberError>) -> ExitCode {
	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			tracing::debug!(diagnostics = e.count(), "run failed");
			eprintln!("{e}");
			ExitCode::FAILURE
		}
	}
}
