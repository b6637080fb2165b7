//! Source positions.
//!
//! A `Position` is a snapshot of the scanner cursor. Every token and every
//! AST node keeps its own copies, so nothing downstream ever observes a
//! cursor that is still moving. The source text and file name are shared
//! behind `Rc<str>`, copying a position only copies three counters.

use std::{fmt, rc::Rc};

/// A cursor into the source text. All counters are zero based.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
	/// Byte offset into `source`.
	pub index:    usize,
	pub column:   usize,
	pub line:     usize,
	pub source:   Rc<str>,
	pub filename: Rc<str>,
}

impl Position {
	pub fn new(source: Rc<str>, filename: Rc<str>) -> Self { Self { index: 0, column: 0, line: 0, source, filename } }

	/// Step over `current`, moving to the next line on `'\n'`.
	pub fn advance(&mut self, current: char) {
		self.index += current.len_utf8();
		self.column += 1;
		if current == '\n' {
			self.line += 1;
			self.column = 0;
		}
	}
}

impl fmt::Debug for Position {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}:{}", self.filename, self.line + 1, self.column + 1)
	}
}

/// A half open `[start, end)` region of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
	pub start: Position,
	pub end:   Position,
}

impl Span {
	pub fn new(start: Position, end: Position) -> Self { Self { start, end } }

	/// The source text covered by this span.
	pub fn text(&self) -> &str { self.start.source.get(self.start.index..self.end.index).unwrap_or_default() }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn origin(source: &str) -> Position { Position::new(Rc::from(source), Rc::from("test")) }

	#[test]
	fn advance_tracks_lines_and_columns() {
		let mut position = origin("ab\nc");
		position.advance('a');
		position.advance('b');
		assert_eq!((position.index, position.column, position.line), (2, 2, 0));
		position.advance('\n');
		assert_eq!((position.index, position.column, position.line), (3, 0, 1));
	}

	#[test]
	fn span_text() {
		let start = origin("let x");
		let end = Position { index: 3, column: 3, ..start.clone() };
		assert_eq!(Span::new(start, end).text(), "let");
	}
}
