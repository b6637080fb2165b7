pub mod interpreter;
pub mod parser;
pub mod scanner;

use interpreter::RuntimeError;
use parser::SyntaxErrors;
use scanner::LexError;

use crate::scanner::Position;

/// EmberError is the top-level error type of the scanner, parser and evaluator.
#[derive(thiserror::Error, Debug)]
pub enum EmberError {
	/// Internal error such as a file that could not be read
	#[error("InternalError: {0:#}")]
	InternalError(#[from] anyhow::Error),
	/// Every error the scanner collected
	#[error("{}", join_lines(.0))]
	LexErrors(Vec<LexError>),
	/// Every error the parser collected
	#[error("{}", join_lines(.0.iter()))]
	SyntaxErrors(SyntaxErrors),
	/// The first runtime error, with its traceback
	#[error(transparent)]
	RuntimeError(#[from] RuntimeError),
}

impl EmberError {
	/// How many diagnostics this error carries.
	pub fn count(&self) -> usize {
		match self {
			EmberError::LexErrors(errors) => errors.len(),
			EmberError::SyntaxErrors(errors) => errors.len(),
			EmberError::InternalError(_) | EmberError::RuntimeError(_) => 1,
		}
	}
}

fn join_lines<T: std::fmt::Display>(errors: impl IntoIterator<Item = T>) -> String {
	errors.into_iter().map(|e| e.to_string()).collect::<Vec<String>>().join("\n")
}

/// The `File x, line n, in main` header shared by lexical and syntax errors.
pub(crate) fn location(position: &Position) -> String {
	format!("File {}, line {}, in main", position.filename, position.line + 1)
}
