use std::{fs::read_to_string, io::Write, path::Path, rc::Rc};

use anyhow::Context as _;

use crate::{
	EmberError,
	ast::Program,
	compiler::Emitter,
	environment::Context,
	interpreter::{Evaluator, Settings, output::Output},
	parser::parse,
	scanner::tokenize,
};

/// Name of the global context in tracebacks.
pub const PROGRAM: &str = "<program>";

/// Ember runs source text through the scanner, the parser and then the
/// evaluator or the emitter.
#[derive(Debug, Clone)]
pub struct Ember {
	pub settings: Settings,
	/// File name used in diagnostics.
	pub filename: String,
	pub output:   Output,
}

impl Default for Ember {
	fn default() -> Self { Self { settings: Settings::default(), filename: "<stdin>".to_string(), output: Output::Stdout } }
}

impl Ember {
	pub fn new(settings: Settings) -> Self { Self { settings, ..Self::default() } }

	pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
		self.filename = filename.into();
		self
	}

	pub fn with_output(mut self, output: Output) -> Self {
		self.output = output;
		self
	}

	/// Run a source file, its name shows up in diagnostics.
	pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<String>, EmberError> {
		let (ember, source) = self.load(path.as_ref())?;
		ember.run_source(&source)
	}

	/// Run one program in a fresh global context.
	pub fn run_source(&self, source: &str) -> Result<Vec<String>, EmberError> {
		self.run(source, &Context::global(PROGRAM))
	}

	/// Scan and parse only.
	pub fn ast(&self, source: &str) -> Result<Program, EmberError> {
		let tokens = tokenize(source, &self.filename).map_err(EmberError::LexErrors)?;
		let (program, errors) = parse(tokens);
		if !errors.is_empty() {
			return Err(EmberError::SyntaxErrors(errors));
		}
		Ok(program)
	}

	/// The bytecode of `source`.
	pub fn emit(&self, source: &str) -> Result<Vec<u8>, EmberError> { Ok(Emitter::new().emit(&self.ast(source)?)) }

	/// Emit a source file next to itself as `<name>.bin`, returning that
	/// path.
	pub fn emit_file<P: AsRef<Path>>(&self, path: P) -> Result<std::path::PathBuf, EmberError> {
		let path = path.as_ref();
		let (ember, source) = self.load(path)?;
		let code = ember.emit(&source)?;
		let target = path.with_extension("bin");
		std::fs::write(&target, Emitter::render(&code))
			.with_context(|| format!("Failed write bytecode to {}", target.display()))?;
		Ok(target)
	}

	/// The tree of a source file.
	pub fn ast_file<P: AsRef<Path>>(&self, path: P) -> Result<Program, EmberError> {
		let (ember, source) = self.load(path.as_ref())?;
		ember.ast(&source)
	}

	/// Run the REPL prompt, the global context lives until the prompt ends.
	pub fn run_prompt(&self) {
		let global = Context::global(PROGRAM);
		let mut input = String::new();
		let stdin = std::io::stdin();
		loop {
			input.clear();
			print!("> ");
			if let Err(e) = std::io::stdout().flush() {
				eprintln!("Failed flush: {e}");
			}
			match stdin.read_line(&mut input) {
				Ok(0) => {
					println!("\nExited ember repl");
					break;
				}
				Ok(_) => {}
				Err(e) => {
					eprintln!("Failed read line: {e}");
					continue;
				}
			}
			match self.run(input.trim(), &global) {
				Ok(trace) if !trace.is_empty() => println!("\n{}", trace.join(", ")),
				Ok(_) => {}
				Err(e) => eprintln!("{e}"),
			}
		}
	}
}

impl Ember {
	fn run(&self, source: &str, global: &Rc<Context>) -> Result<Vec<String>, EmberError> {
		let program = self.ast(source)?;
		let mut evaluator = Evaluator::new(self.settings, self.output.clone());
		Ok(evaluator.run(&program, global)?)
	}

	/// Read `path`, and a copy of `self` that reports errors under its name.
	fn load(&self, path: &Path) -> Result<(Self, String), EmberError> {
		let source =
			read_to_string(path).with_context(|| format!("Failed open source file {}", path.display()))?;
		tracing::debug!(path = %path.display(), bytes = source.len(), "loaded source");
		Ok((self.clone().with_filename(path.display().to_string()), source))
	}
}
