use std::fmt;

use super::position::{Position, Span};

/// A token produced by the scanner
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub kind: TokenKind,
	pub span: Span,
}

impl Token {
	pub fn new(kind: TokenKind, start: Position, end: Position) -> Self { Self { kind, span: Span::new(start, end) } }

	/// Whether this token is exactly `kind`, carried value included.
	///
	/// This is the only test the parser performs on tokens, so `let` and
	/// `var` are told apart here rather than by comparing lexemes.
	pub fn matches(&self, kind: &TokenKind) -> bool { self.kind == *kind }

	pub fn start(&self) -> &Position { &self.span.start }

	pub fn end(&self) -> &Position { &self.span.end }
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.kind) }
}

/// The different kinds of tokens, the literal ones carry their value
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
	/// Integer literal, e.g. `42`.
	Int(i64),
	/// Float literal, e.g. `4.2`.
	Float(f64),
	/// String literal without its quotes.
	Str(String),
	/// Identifier, e.g. variable or function name.
	Identifier(String),
	/// One of the reserved words.
	Keyword(Keyword),
	/// Plus `+`.
	Plus,
	/// Minus `-`.
	Minus,
	/// Asterisk `*`.
	Asterisk,
	/// Slash `/`.
	Slash,
	/// Left parenthesis `(`.
	LParen,
	/// Right parenthesis `)`.
	RParen,
	/// Left square bracket `[`.
	LSquare,
	/// Right square bracket `]`.
	RSquare,
	/// Left brace `{`.
	LBrace,
	/// Right brace `}`.
	RBrace,
	/// Equal `=`.
	Equal,
	/// Equal equal `==`.
	DoubleEqual,
	/// Bang equal `!=`.
	NotEqual,
	/// Bang `!`.
	Not,
	/// Less than `<`.
	Less,
	/// Greater than `>`.
	Greater,
	/// Less than or equal `<=`.
	LessEqual,
	/// Greater than or equal `>=`.
	GreaterEqual,
	/// Colon `:`.
	Colon,
	/// Semicolon `;`.
	Semicolon,
	/// Comma `,`.
	Comma,
	/// Arrow `=>`.
	Arrow,
	/// End of input.
	Eof,
}

impl TokenKind {
	pub fn keyword_or_identifier(text: &str) -> Self {
		match Keyword::from_text(text) {
			Some(keyword) => TokenKind::Keyword(keyword),
			None => TokenKind::Identifier(text.to_string()),
		}
	}

	/// The upper case name used in diagnostics and tree dumps.
	pub fn name(&self) -> &'static str {
		use TokenKind::*;
		match self {
			Int(_) => "INT",
			Float(_) => "FLOAT",
			Str(_) => "STRING",
			Identifier(_) => "IDENTIFIER",
			TokenKind::Keyword(_) => "KEYWORD",
			Plus => "PLUS",
			Minus => "MINUS",
			Asterisk => "ASTERISK",
			Slash => "SLASH",
			LParen => "LPAREN",
			RParen => "RPAREN",
			LSquare => "LSQUAREBRACKET",
			RSquare => "RSQUAREBRACKET",
			LBrace => "LBRACKET",
			RBrace => "RBRACKET",
			Equal => "EQUAL",
			DoubleEqual => "DOUBLE_EQUAL",
			NotEqual => "NOT_EQUAL",
			Not => "NOT",
			Less => "LESS_THAN",
			Greater => "GREATER_THAN",
			LessEqual => "LESS_THAN_OR_EQUAL",
			GreaterEqual => "GREATER_THAN_OR_EQUAL",
			Colon => "COLON",
			Semicolon => "SEMICOLON",
			Comma => "COMMA",
			Arrow => "ARROW",
			Eof => "EOF",
		}
	}
}

impl fmt::Display for TokenKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TokenKind::Int(n) => write!(f, "{}:{n}", self.name()),
			TokenKind::Float(n) => write!(f, "{}:{n:?}", self.name()),
			TokenKind::Str(s) | TokenKind::Identifier(s) => write!(f, "{}:{s}", self.name()),
			TokenKind::Keyword(keyword) => write!(f, "{}:{keyword}", self.name()),
			_ => f.write_str(self.name()),
		}
	}
}

/// Reserved words. `while`, `for` and the type names are reserved but no
/// statement uses them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
	Let,
	Var,
	If,
	Else,
	Elif,
	Func,
	Return,
	While,
	For,
	Int,
	Float,
	Str,
	Bool,
}

impl Keyword {
	pub fn from_text(text: &str) -> Option<Self> {
		use Keyword::*;
		Some(match text {
			"let" => Let,
			"var" => Var,
			"if" => If,
			"else" => Else,
			"elif" => Elif,
			"func" => Func,
			"return" => Return,
			"while" => While,
			"for" => For,
			"int" => Int,
			"float" => Float,
			"str" => Str,
			"bool" => Bool,
			_ => return None,
		})
	}

	pub fn as_str(self) -> &'static str {
		use Keyword::*;
		match self {
			Let => "let",
			Var => "var",
			If => "if",
			Else => "else",
			Elif => "elif",
			Func => "func",
			Return => "return",
			While => "while",
			For => "for",
			Int => "int",
			Float => "float",
			Str => "str",
			Bool => "bool",
		}
	}
}

impl fmt::Display for Keyword {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
