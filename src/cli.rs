use std::path::PathBuf;

use palc::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ember", after_long_help = "Set RUST_LOG=debug to trace the stages.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Input file
	File {
		path:      PathBuf,
		/// Print the syntax tree instead of running
		#[arg(long)]
		ast:       bool,
		/// Write the bytecode next to the input as `<name>.bin`
		#[arg(long)]
		emit:      bool,
		/// Deepest call nesting allowed
		#[arg(long)]
		max_depth: Option<usize>,
	},
	/// Input prompt
	Repl {
		/// Deepest call nesting allowed
		#[arg(long)]
		max_depth: Option<usize>,
	},
}
