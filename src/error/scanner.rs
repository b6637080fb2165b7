use std::fmt;

use crate::scanner::Span;

/// A lexical error with the span of the offending text.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{}\n{kind}: {message}", super::location(&self.span.start))]
pub struct LexError {
	pub kind:    LexErrorKind,
	pub message: String,
	pub span:    Span,
}

impl LexError {
	pub fn illegal_character(c: char, span: Span) -> Self {
		Self { kind: LexErrorKind::IllegalCharacter, message: format!("Illegal character {c}"), span }
	}

	pub fn unexpected_character(c: char, span: Span) -> Self {
		Self { kind: LexErrorKind::UnexpectedCharacter, message: format!("Unexpected character '{c}'"), span }
	}

	pub fn integer_out_of_range(text: &str, span: Span) -> Self {
		Self {
			kind: LexErrorKind::IntegerOutOfRange,
			message: format!("Integer literal {text} does not fit in 64 bits"),
			span,
		}
	}

	pub fn unclosed_string(span: Span) -> Self {
		Self {
			kind: LexErrorKind::CharacterNotFound,
			message: "String quotation marks are not closed".to_string(),
			span,
		}
	}
}

/// Types of scanning errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
	/// A character no token starts with.
	IllegalCharacter,
	/// A character that cannot continue the current token, e.g. a second `.`.
	UnexpectedCharacter,
	/// A closing character that never came, e.g. an unterminated string.
	CharacterNotFound,
	/// An integer literal larger than `i64::MAX`.
	IntegerOutOfRange,
}

impl fmt::Display for LexErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		use LexErrorKind::*;
		match self {
			IllegalCharacter => write!(f, "Illegal Character Error"),
			UnexpectedCharacter => write!(f, "Unexpected Character Error"),
			CharacterNotFound => write!(f, "Character Not Found Error"),
			IntegerOutOfRange => write!(f, "Integer Out Of Range Error"),
		}
	}
}
