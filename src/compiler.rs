//! A stack bytecode emitter for the arithmetic subset of the language.
//!
//! |Opcode|Operands|Meaning
//! --|--|--
//! 3|hi lo|push the 16 bit immediate
//! 5| |add
//! 6| |subtract
//! 7| |multiply
//! 8| |divide
//! 9| |halt
//!
//! Nodes outside that subset are skipped with a warning.

use crate::{
	ast::{Node, NodeKind, Program},
	scanner::TokenKind,
};

pub const PUSH: u8 = 3;
pub const ADD: u8 = 5;
pub const SUB: u8 = 6;
pub const MUL: u8 = 7;
pub const DIV: u8 = 8;
pub const HALT: u8 = 9;

#[derive(Debug, Default)]
pub struct Emitter {
	code: Vec<u8>,
}

impl Emitter {
	pub fn new() -> Self { Self::default() }

	/// Emit the whole program, always terminated by `HALT`.
	pub fn emit(mut self, program: &Program) -> Vec<u8> {
		for statement in &program.statements {
			self.node(statement);
		}
		self.code.push(HALT);
		tracing::debug!(bytes = self.code.len(), "emitted bytecode");
		self.code
	}

	/// The text form: decimal bytes separated by spaces.
	pub fn render(code: &[u8]) -> String {
		code.iter().map(|byte| byte.to_string()).collect::<Vec<String>>().join(" ")
	}

	fn node(&mut self, node: &Node) {
		match &node.kind {
			NodeKind::Number(token) => match token.kind {
				TokenKind::Int(n @ 0..=0xffff) => {
					let [hi, lo] = (n as u16).to_be_bytes();
					self.code.extend([PUSH, hi, lo]);
				}
				_ => tracing::warn!(literal = %token, "skipped literal outside 0..=65535"),
			},
			NodeKind::BinaryOp { left, operator, right } => {
				self.node(left);
				self.node(right);
				let opcode = match operator.kind {
					TokenKind::Plus => ADD,
					TokenKind::Minus => SUB,
					TokenKind::Asterisk => MUL,
					TokenKind::Slash => DIV,
					_ => {
						tracing::warn!(operator = %operator, "skipped operator");
						return;
					}
				};
				self.code.push(opcode);
			}
			kind => tracing::warn!(node = kind.name(), "skipped node"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{parser::parse, scanner::tokenize};

	fn emit(input: &str) -> Vec<u8> {
		let (program, errors) = parse(tokenize(input, "test").unwrap());
		assert!(errors.is_empty());
		Emitter::new().emit(&program)
	}

	#[test]
	fn emit_arithmetic() {
		assert_eq!(emit("1 + 2;"), vec![PUSH, 0, 1, PUSH, 0, 2, ADD, HALT]);
		assert_eq!(emit("300 * 2 - 1;"), vec![PUSH, 1, 44, PUSH, 0, 2, MUL, PUSH, 0, 1, SUB, HALT]);
		assert_eq!(emit("8 / 4;"), vec![PUSH, 0, 8, PUSH, 0, 4, DIV, HALT]);
	}

	#[test]
	fn emit_skips_the_rest() {
		assert_eq!(emit(""), vec![HALT]);
		assert_eq!(emit("var x = 1; 2.5; 70000; x;"), vec![HALT]);
		assert_eq!(emit("1 < 2;"), vec![PUSH, 0, 1, PUSH, 0, 2, HALT]);
	}

	#[test]
	fn render_is_decimal() {
		assert_eq!(Emitter::render(&emit("1 + 2;")), "3 0 1 3 0 2 5 9");
	}
}
