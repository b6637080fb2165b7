//! Turns source text into tokens.
//!
//! The scanner walks the text one character at a time. At every position it
//! tries, in order: whitespace, a number, an identifier or keyword, a
//! string, and then the punctuation. Anything else is an illegal character.
//!
//! Lexical errors do not stop the scan. They are collected, and once the
//! whole input has been seen the caller gets either every token or every
//! error, never a mix of both. The parser therefore only ever sees a clean
//! token stream.
//!
//! Numbers are classified here and only here: a literal without a `.` is an
//! `Int`, one with a `.` is a `Float`.
mod position;
mod token;

use std::{iter::Peekable, rc::Rc, str::Chars};

pub use position::{Position, Span};
pub use token::{Keyword, Token, TokenKind};
use TokenKind::*;

use crate::error::scanner::LexError;

/// Scan `source` in one go, `filename` is only used in diagnostics.
pub fn tokenize(source: &str, filename: &str) -> Result<Vec<Token>, Vec<LexError>> {
	Scanner::new(source, filename).scan_tokens()
}

/// A scanner for source code
pub struct Scanner<'a> {
	/// User input source code iterator
	source_iter: Peekable<Chars<'a>>,
	/// Points at the character currently being considered
	position:    Position,
	errors:      Vec<LexError>,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str, filename: &str) -> Self {
		let position = Position::new(Rc::from(source), Rc::from(filename));
		Self { source_iter: source.chars().peekable(), position, errors: Vec::new() }
	}

	/// Scan all tokens from the source code
	pub fn scan_tokens(mut self) -> Result<Vec<Token>, Vec<LexError>> {
		let mut tokens = Vec::new();
		while let Some(c) = self.peek() {
			match c {
				' ' | '\t' | '\n' | '\r' => {
					self.advance();
				}
				c if c.is_ascii_digit() => tokens.extend(self.number()),
				c if c.is_ascii_alphabetic() || c == '_' => tokens.push(self.identifier()),
				'"' => tokens.extend(self.string()),
				_ => tokens.extend(self.punctuation(c)),
			}
		}
		tokens.push(Token::new(Eof, self.position.clone(), self.position.clone()));

		if self.errors.is_empty() {
			tracing::debug!(count = tokens.len(), "scanned tokens");
			Ok(tokens)
		} else {
			tracing::debug!(count = self.errors.len(), "scan failed");
			Err(self.errors)
		}
	}

	/// Scan one or two character operators and punctuation.
	fn punctuation(&mut self, c: char) -> Option<Token> {
		let start = self.position.clone();
		self.advance();
		#[rustfmt::skip]
		let kind = match c {
			'+' => Plus,
			'-' => Minus,
			'*' => Asterisk,
			'/' => Slash,
			'(' => LParen,
			')' => RParen,
			'[' => LSquare,
			']' => RSquare,
			'{' => LBrace,
			'}' => RBrace,
			':' => Colon,
			';' => Semicolon,
			',' => Comma,
			'=' => if self.match_next('=') { DoubleEqual } else if self.match_next('>') { Arrow } else { Equal },
			'!' => if self.match_next('=') { NotEqual } else { Not },
			'<' => if self.match_next('=') { LessEqual } else { Less },
			'>' => if self.match_next('=') { GreaterEqual } else { Greater },
			_ => {
				let span = Span::new(start, self.position.clone());
				self.errors.push(LexError::illegal_character(c, span));
				return None;
			}
		};
		Some(Token::new(kind, start, self.position.clone()))
	}

	/// Match the next character if it is the expected one
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let c = self.source_iter.next()?;
		self.position.advance(c);
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().copied() }

	/// The source text from `start` up to the cursor.
	fn lexeme(&self, start: &Position) -> &str { &self.position.source[start.index..self.position.index] }

	/// Scan a string literal, there are no escape sequences
	fn string(&mut self) -> Option<Token> {
		let start = self.position.clone();
		self.advance(); // The opening "
		loop {
			match self.advance() {
				Some('"') => break,
				Some(_) => {}
				None => {
					let span = Span::new(start, self.position.clone());
					self.errors.push(LexError::unclosed_string(span));
					return None;
				}
			}
		}
		let text = &self.position.source[start.index + 1..self.position.index - 1];
		Some(Token::new(Str(text.to_string()), start, self.position.clone()))
	}

	/// Scan a number literal, a second `.` drops the whole literal
	fn number(&mut self) -> Option<Token> {
		let start = self.position.clone();
		let mut seen_dot = false;
		while let Some(c) = self.peek() {
			if c == '.' {
				if seen_dot {
					let dot = self.position.clone();
					self.advance();
					self.errors.push(LexError::unexpected_character(c, Span::new(dot, self.position.clone())));
					return None;
				}
				seen_dot = true;
			} else if !c.is_ascii_digit() {
				break;
			}
			self.advance();
		}

		let text = self.lexeme(&start);
		let kind = match (seen_dot, text.parse::<i64>()) {
			(false, Ok(n)) => Int(n),
			(false, Err(_)) => {
				let error = LexError::integer_out_of_range(text, Span::new(start, self.position.clone()));
				self.errors.push(error);
				return None;
			}
			// Digits and one dot always parse as a float.
			(true, _) => Float(text.parse().unwrap_or(f64::INFINITY)),
		};
		Some(Token::new(kind, start, self.position.clone()))
	}

	/// Scan an identifier or keyword
	fn identifier(&mut self) -> Token {
		let start = self.position.clone();
		while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
			self.advance();
		}
		let kind = TokenKind::keyword_or_identifier(self.lexeme(&start));
		Token::new(kind, start, self.position.clone())
	}
}
