use crate::scanner::Span;

/// A syntax error with the span of the token the parser stopped at.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{}\nInvalid Syntax Error: {message}", super::location(&self.span.start))]
pub struct SyntaxError {
	pub message: String,
	pub span:    Span,
}

impl SyntaxError {
	pub fn new(message: impl Into<String>, span: Span) -> Self { Self { message: message.into(), span } }
}

/// Append only collection of the syntax errors of one parse.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SyntaxErrors {
	errors: Vec<SyntaxError>,
}

impl SyntaxErrors {
	pub fn new() -> Self { Self::default() }

	pub fn register(&mut self, error: SyntaxError) {
		tracing::trace!(message = %error.message, line = error.span.start.line + 1, "syntax error");
		self.errors.push(error);
	}

	pub fn is_empty(&self) -> bool { self.errors.is_empty() }

	pub fn len(&self) -> usize { self.errors.len() }

	pub fn iter(&self) -> std::slice::Iter<'_, SyntaxError> { self.errors.iter() }
}

impl<'a> IntoIterator for &'a SyntaxErrors {
	type IntoIter = std::slice::Iter<'a, SyntaxError>;
	type Item = &'a SyntaxError;

	fn into_iter(self) -> Self::IntoIter { self.iter() }
}
