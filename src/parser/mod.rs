//! Turns tokens into a [`Program`].
//!
//! Precedence, lowest first:
//!
//! |Name|Operators|Associates
//! --|--|--
//! Assign|=|None
//! Comparison|< > <= >= == !=|None
//! Additive|+ -|Left
//! Term|* /|Left
//! Postfix|( ) [ ]|Left
//! Arrow|=>|None
//! Unary|+ - !|Right
//!
//! Grammar:
//!
//! ``` BNF
//! statement      → ( "let" | "var" ) factor "=" math ";"
//!                | "return" math ";"
//!                | "func" IDENTIFIER factor block
//!                | if | assign ";" ;
//! assign         → math ( "=" math )? ;
//! math           → comparison ;
//! comparison     → additive ( ( "<" | "<=" | ">" | ">=" | "==" | "!=" ) additive )? ;
//! additive       → term ( ( "+" | "-" ) term )* ;
//! term           → postfix ( ( "*" | "/" ) postfix )* ;
//! postfix        → arrow ( "(" ( math ( "," math )* )? ")" | "[" math "]" )* ;
//! arrow          → factor ( "=>" block )? ;
//! factor         → "(" ")" | "(" math ")" | "(" math ( "," math )+ ")"
//!                | INT | FLOAT | STRING | IDENTIFIER
//!                | ( "+" | "-" | "!" ) factor
//!                | "[" ( TOKEN ( "," TOKEN )* )? "]" ;
//! if             → "if" math block ( "elif" math block )* ( "else" block )? ;
//! block          → "{" statement* "}" ;
//! ```
//!
//! A failed production registers exactly one error and yields `None`. The
//! statement loops then skip ahead to the next statement boundary, so one
//! pass reports every independent error.

use std::rc::Rc;

use TokenKind::*;

use crate::{
	ast::{Node, NodeKind, Program},
	error::parser::{SyntaxError, SyntaxErrors},
	scanner::{Keyword, Position, Span, Token, TokenKind},
};

const EXPECTED_EXPRESSION: &str = "Expected INT, FLOAT, STRING, IDENTIFIER, '+', '-', '!', '(', '['";
const EXPECTED_STATEMENT: &str = "Expected INT, FLOAT, STRING, IDENTIFIER, '+', '-', '!', '(', '[', 'if'";
const UNCLOSED_BLOCK: &str = "Unexpected end of input (maybe you forgot a '}')";

/// Parse a whole token stream. The program is only trustworthy when the
/// returned error list is empty.
pub fn parse(tokens: Vec<Token>) -> (Program, SyntaxErrors) {
	let mut errors = SyntaxErrors::new();
	let program = Parser::new(tokens, &mut errors).parse_program();
	(program, errors)
}

/// Recursive descent parser, the errors go into a caller owned accumulator.
pub struct Parser<'e> {
	/// The tokens to parse, always terminated by `Eof`.
	tokens: Vec<Token>,
	cursor: usize,
	errors: &'e mut SyntaxErrors,
}

impl<'e> Parser<'e> {
	pub fn new(mut tokens: Vec<Token>, errors: &'e mut SyntaxErrors) -> Self {
		if !tokens.last().is_some_and(|token| token.matches(&Eof)) {
			let end = match tokens.last() {
				Some(token) => token.end().clone(),
				None => Position::new(Rc::from(""), Rc::from("<input>")),
			};
			tokens.push(Token::new(Eof, end.clone(), end));
		}
		Self { tokens, cursor: 0, errors }
	}

	pub fn parse_program(mut self) -> Program {
		let mut statements = Vec::new();
		while !self.check(&Eof) {
			let start = self.cursor;
			match self.statement() {
				Some(statement) => statements.push(statement),
				None => self.synchronize(start),
			}
		}
		tracing::debug!(statements = statements.len(), errors = self.errors.len(), "parsed program");
		Program { statements }
	}

	fn statement(&mut self) -> Option<Node> {
		match self.keyword() {
			Some(Keyword::Let) => self.assign_statement(true),
			Some(Keyword::Var) => self.assign_statement(false),
			Some(Keyword::Return) => self.return_statement(),
			Some(Keyword::Func) => self.function_declaration(),
			_ => self.expression_statement(),
		}
	}

	/// `let` and `var` share one shape, only the node differs.
	fn assign_statement(&mut self, constant: bool) -> Option<Node> {
		let start = self.start();
		self.advance(); // consume 'let' or 'var'
		let target = self.factor()?;
		let Some(name) = target.as_identifier().cloned() else {
			return self.fail(format!("You can't assign a value to {target}"));
		};
		self.expect(&Equal, "Expected '='")?;
		let value = Box::new(self.math_expression()?);
		self.expect(&Semicolon, "Expected ';'")?;

		let kind = if constant { NodeKind::ConstAssign { name, value } } else { NodeKind::VarAssign { name, value } };
		Some(Node::new(kind, self.span_from(start)))
	}

	fn return_statement(&mut self) -> Option<Node> {
		let start = self.start();
		self.advance(); // consume 'return'
		let value = self.math_expression()?;
		self.expect(&Semicolon, "Expected ';'")?;
		Some(Node::new(NodeKind::Return(Box::new(value)), self.span_from(start)))
	}

	fn function_declaration(&mut self) -> Option<Node> {
		let start = self.start();
		self.advance(); // consume 'func'
		if !matches!(self.current().kind, Identifier(_)) {
			return self.fail("Expected a function name");
		}
		let name = self.advance();
		let params = self.factor()?;
		let body = self.block()?;
		let kind = NodeKind::Function { name: Some(name), params: Box::new(params), body: Rc::new(body) };
		Some(Node::new(kind, self.span_from(start)))
	}

	/// An `if` stands on its own, anything else needs a closing `;`.
	fn expression_statement(&mut self) -> Option<Node> {
		if self.keyword() == Some(Keyword::If) {
			return self.if_expression();
		}
		if !self.starts_expression() {
			return self.fail(EXPECTED_STATEMENT);
		}
		let mut expression = self.assign_expression()?;
		self.expect(&Semicolon, "Expected ';'")?;
		expression.span = self.span_from(expression.span.start.clone());
		Some(expression)
	}

	fn if_expression(&mut self) -> Option<Node> {
		let start = self.start();
		self.advance(); // consume 'if'
		let condition = Box::new(self.math_expression()?);
		let then_block = Box::new(self.block()?);

		let mut elif_conditions = Vec::new();
		let mut elif_blocks = Vec::new();
		while self.keyword() == Some(Keyword::Elif) {
			self.advance();
			elif_conditions.push(self.math_expression()?);
			elif_blocks.push(self.block()?);
		}

		let else_block = if self.keyword() == Some(Keyword::Else) {
			self.advance();
			Some(Box::new(self.block()?))
		} else {
			None
		};

		let kind = NodeKind::If { condition, then_block, elif_conditions, elif_blocks, else_block };
		Some(Node::new(kind, self.span_from(start)))
	}

	fn block(&mut self) -> Option<Node> {
		let start = self.start();
		self.expect(&LBrace, "Expected '{'")?;
		let mut statements = Vec::new();
		while !self.check(&RBrace) {
			if self.check(&Eof) {
				return self.fail(UNCLOSED_BLOCK);
			}
			let before = self.cursor;
			match self.statement() {
				Some(statement) => statements.push(statement),
				None => self.synchronize(before),
			}
		}
		self.advance(); // consume '}'
		Some(Node::new(NodeKind::Block(statements), self.span_from(start)))
	}

	fn assign_expression(&mut self) -> Option<Node> {
		let start = self.start();
		let target = self.math_expression()?;
		if !self.check(&Equal) {
			return Some(target);
		}
		let Some(name) = target.as_identifier().cloned() else {
			return self.fail(format!("You can't assign a value to {target}"));
		};
		self.advance(); // consume '='
		let value = Box::new(self.math_expression()?);
		Some(Node::new(NodeKind::VarAssign { name, value }, self.span_from(start)))
	}

	fn math_expression(&mut self) -> Option<Node> {
		if !self.starts_expression() {
			return self.fail(EXPECTED_EXPRESSION);
		}
		self.comparison()
	}

	/// Comparisons do not chain, `1 < 2 < 3` leaves a dangling `<`.
	fn comparison(&mut self) -> Option<Node> {
		let start = self.start();
		let left = self.additive()?;
		if !matches!(self.current().kind, Less | LessEqual | Greater | GreaterEqual | DoubleEqual | NotEqual) {
			return Some(left);
		}
		let operator = self.advance();
		let right = self.additive()?;
		Some(self.binary(start, left, operator, right))
	}

	fn additive(&mut self) -> Option<Node> {
		let start = self.start();
		let mut expression = self.term()?;
		while matches!(self.current().kind, Plus | Minus) {
			let operator = self.advance();
			let right = self.term()?;
			expression = self.binary(start.clone(), expression, operator, right);
		}
		Some(expression)
	}

	fn term(&mut self) -> Option<Node> {
		let start = self.start();
		let mut expression = self.postfix()?;
		while matches!(self.current().kind, Asterisk | Slash) {
			let operator = self.advance();
			let right = self.postfix()?;
			expression = self.binary(start.clone(), expression, operator, right);
		}
		Some(expression)
	}

	/// Calls and indexing, applied left to right.
	fn postfix(&mut self) -> Option<Node> {
		let start = self.start();
		let mut expression = self.arrow_function()?;
		loop {
			let kind = if self.check(&LParen) {
				let arguments = Box::new(self.arguments()?);
				NodeKind::Call { callee: Box::new(expression), arguments }
			} else if self.check(&LSquare) {
				self.advance(); // consume '['
				let index = Box::new(self.math_expression()?);
				self.expect(&RSquare, "Expected ']'")?;
				NodeKind::Index { collection: Box::new(expression), index }
			} else {
				return Some(expression);
			};
			expression = Node::new(kind, self.span_from(start.clone()));
		}
	}

	/// `params => { body }`, the factor before the arrow becomes the
	/// parameter list.
	fn arrow_function(&mut self) -> Option<Node> {
		let start = self.start();
		let params = self.factor()?;
		if !self.check(&Arrow) {
			return Some(params);
		}
		self.advance(); // consume '=>'
		let body = self.block()?;
		let kind = NodeKind::Function { name: None, params: Box::new(params), body: Rc::new(body) };
		Some(Node::new(kind, self.span_from(start)))
	}

	fn arguments(&mut self) -> Option<Node> {
		let start = self.start();
		self.advance(); // consume '('
		let mut arguments = Vec::new();
		while !self.check(&RParen) {
			arguments.push(self.math_expression()?);
			if self.check(&Comma) {
				self.advance();
			} else if !self.check(&RParen) {
				return self.fail("Expected ',' or ')'");
			}
		}
		self.advance(); // consume ')'
		Some(Node::new(NodeKind::ArgList(arguments), self.span_from(start)))
	}

	fn factor(&mut self) -> Option<Node> {
		let start = self.start();
		let token = self.current().clone();
		let kind = match token.kind {
			LParen => return self.parenthesized(),
			LSquare => return self.list(),
			Int(_) | Float(_) => NodeKind::Number(self.advance()),
			Str(_) => NodeKind::String(self.advance()),
			Identifier(_) => NodeKind::Identifier(self.advance()),
			Plus | Minus | Not => {
				let operator = self.advance();
				let operand = Box::new(self.factor()?);
				NodeKind::UnaryOp { operator, operand }
			}
			_ => return self.fail(EXPECTED_EXPRESSION),
		};
		Some(Node::new(kind, self.span_from(start)))
	}

	/// `()` and `(a, b)` build a set, `(a)` is plain grouping.
	fn parenthesized(&mut self) -> Option<Node> {
		let start = self.start();
		self.advance(); // consume '('
		if self.check(&RParen) {
			self.advance();
			return Some(Node::new(NodeKind::Set(Vec::new()), self.span_from(start)));
		}

		let first = self.math_expression()?;
		if !self.check(&Comma) {
			self.expect(&RParen, "Expected ')'")?;
			return Some(first);
		}

		let mut elements = vec![first];
		while self.check(&Comma) {
			self.advance();
			if self.check(&RParen) {
				break;
			}
			elements.push(self.math_expression()?);
		}
		self.expect(&RParen, "Expected ',' or ')'")?;
		Some(Node::new(NodeKind::Set(elements), self.span_from(start)))
	}

	/// `[a, b]` keeps the tokens between the brackets as they are.
	fn list(&mut self) -> Option<Node> {
		let start = self.start();
		self.advance(); // consume '['
		let mut elements = Vec::new();
		while !self.check(&RSquare) {
			if self.check(&Eof) {
				return self.fail("Expected ']'");
			}
			elements.push(self.advance());
			if self.check(&Comma) {
				self.advance();
			} else if !self.check(&RSquare) {
				return self.fail("Expected ',' or ']'");
			}
		}
		self.advance(); // consume ']'
		Some(Node::new(NodeKind::List(elements), self.span_from(start)))
	}

	fn binary(&self, start: Position, left: Node, operator: Token, right: Node) -> Node {
		let kind = NodeKind::BinaryOp { left: Box::new(left), operator, right: Box::new(right) };
		Node::new(kind, self.span_from(start))
	}

	/// Skip to the next statement boundary after a failed statement that
	/// began at token `start`.
	///
	/// At least one token is consumed, so a statement that failed on its
	/// first token cannot be retried forever. After that the parser stops
	/// just past a `;`, or right before `}`, a statement keyword or the end.
	fn synchronize(&mut self, start: usize) {
		if self.cursor == start {
			self.advance();
		}
		while !self.check(&Eof) {
			if self.cursor > 0 && self.tokens[self.cursor - 1].matches(&Semicolon) {
				return;
			}
			if self.check(&RBrace)
				|| matches!(
					self.keyword(),
					Some(Keyword::Let | Keyword::Var | Keyword::Return | Keyword::If | Keyword::Func)
				) {
				return;
			}
			self.advance();
		}
	}

	/// Whether the current token can begin an expression.
	fn starts_expression(&self) -> bool {
		matches!(
			self.current().kind,
			Int(_) | Float(_) | Str(_) | Identifier(_) | Plus | Minus | Not | LParen | LSquare
		)
	}

	fn keyword(&self) -> Option<Keyword> {
		match self.current().kind {
			TokenKind::Keyword(keyword) => Some(keyword),
			_ => None,
		}
	}

	fn current(&self) -> &Token { &self.tokens[self.cursor] }

	fn check(&self, kind: &TokenKind) -> bool { self.current().matches(kind) }

	/// Consume the current token, the cursor never moves past `Eof`.
	fn advance(&mut self) -> Token {
		let token = self.current().clone();
		if !token.matches(&Eof) {
			self.cursor += 1;
		}
		token
	}

	fn expect(&mut self, kind: &TokenKind, message: &str) -> Option<Token> {
		if self.check(kind) { Some(self.advance()) } else { self.fail(message) }
	}

	/// Register an error at the current token.
	fn fail<T>(&mut self, message: impl Into<String>) -> Option<T> {
		let span = self.current().span.clone();
		self.errors.register(SyntaxError::new(message, span));
		None
	}

	fn start(&self) -> Position { self.current().start().clone() }

	/// From `start` up to the end of the last consumed token.
	fn span_from(&self, start: Position) -> Span {
		let end = match self.cursor {
			0 => start.clone(),
			cursor => self.tokens[cursor - 1].end().clone(),
		};
		Span::new(start, end)
	}
}
