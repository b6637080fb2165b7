//! Syntax tree nodes
//!
//! One closed node type covers statements and expressions alike: `if` is an
//! expression that may stand as a statement, and a parenthesised tuple
//! doubles as a parameter list. Every node carries the span of the source it
//! was parsed from, and that span covers the spans of all of its children.
//!
//! The `Display` impls are the debug dump printed by `ember file --ast`.

use std::{fmt, rc::Rc};

use crate::scanner::{Span, Token};

/// The top-level statements of one source file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Program {
	pub statements: Vec<Node>,
}

/// A syntax tree node and the source it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
	pub kind: NodeKind,
	pub span: Span,
}

impl Node {
	pub fn new(kind: NodeKind, span: Span) -> Self { Self { kind, span } }

	/// The identifier token, if this node is a bare identifier.
	pub fn as_identifier(&self) -> Option<&Token> {
		match &self.kind {
			NodeKind::Identifier(token) => Some(token),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
	/// A braced sequence of statements.
	Block(Vec<Node>),
	/// `let name = value;`
	ConstAssign { name: Token, value: Box<Node> },
	/// `var name = value;` or `name = value;`
	VarAssign { name: Token, value: Box<Node> },
	Return(Box<Node>),
	Number(Token),
	String(Token),
	Identifier(Token),
	/// `[a, b]`, the raw tokens between the brackets.
	List(Vec<Token>),
	/// `(a, b)`, also the parameter list of a function.
	Set(Vec<Node>),
	BinaryOp { left: Box<Node>, operator: Token, right: Box<Node> },
	UnaryOp { operator: Token, operand: Box<Node> },
	If {
		condition:       Box<Node>,
		then_block:      Box<Node>,
		elif_conditions: Vec<Node>,
		elif_blocks:     Vec<Node>,
		else_block:      Option<Box<Node>>,
	},
	/// The arguments of a call.
	ArgList(Vec<Node>),
	/// `params => { body }` or `func name params { body }`.
	Function { name: Option<Token>, params: Box<Node>, body: Rc<Node> },
	Call { callee: Box<Node>, arguments: Box<Node> },
	Index { collection: Box<Node>, index: Box<Node> },
}

impl NodeKind {
	/// Variant name used by the evaluator's "unsupported node" error.
	pub fn name(&self) -> &'static str {
		use NodeKind::*;
		match self {
			Block(_) => "Block",
			ConstAssign { .. } => "ConstAssign",
			VarAssign { .. } => "VarAssign",
			Return(_) => "Return",
			Number(_) => "Number",
			String(_) => "String",
			Identifier(_) => "Identifier",
			List(_) => "List",
			Set(_) => "Set",
			BinaryOp { .. } => "BinaryOp",
			UnaryOp { .. } => "UnaryOp",
			If { .. } => "If",
			ArgList(_) => "ArgList",
			Function { .. } => "Function",
			Call { .. } => "Call",
			Index { .. } => "Index",
		}
	}
}

fn statements(f: &mut fmt::Formatter<'_>, nodes: &[Node]) -> fmt::Result {
	nodes.iter().try_for_each(|node| write!(f, " [ {node} ] "))
}

fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
	write!(f, "[{}]", items.iter().map(|item| item.to_string()).collect::<Vec<String>>().join(", "))
}

impl fmt::Display for Program {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { statements(f, &self.statements) }
}

impl fmt::Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		use NodeKind::*;
		match &self.kind {
			Block(nodes) => statements(f, nodes),
			ConstAssign { name, value } => write!(f, "( LET {name} = {value} )"),
			VarAssign { name, value } => write!(f, "( VAR {name} = {value} )"),
			Return(value) => write!(f, "( RETURN {value} )"),
			Number(token) | String(token) | Identifier(token) => write!(f, "{token}"),
			List(tokens) => list(f, tokens),
			Set(nodes) | ArgList(nodes) => list(f, nodes),
			BinaryOp { left, operator, right } => write!(f, "({left} {operator} {right})"),
			UnaryOp { operator, operand } => write!(f, "({operator} {operand})"),
			If { condition, then_block, elif_conditions, elif_blocks, else_block } => {
				write!(f, "( IF {condition} DO {then_block} ")?;
				for (condition, block) in elif_conditions.iter().zip(elif_blocks) {
					write!(f, "ELIF {condition} DO {block} ")?;
				}
				if let Some(block) = else_block {
					write!(f, "ELSE {block} ")?;
				}
				write!(f, ")")
			}
			Function { name, params, body } => {
				let name = name.as_ref().map_or("anonymous", |token| token.span.text());
				write!(f, "( FUNCTION {name} ( {params} ) CODE {body} )")
			}
			Call { callee, arguments } => write!(f, "( {callee}( {arguments} )"),
			Index { collection, index } => write!(f, "( {collection} [ {index} ] )"),
		}
	}
}
