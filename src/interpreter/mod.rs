//! Tree-walking evaluator.
//!
//! `Evaluator::visit` matches on every node kind and produces a value or the
//! first runtime error, which then travels up through every enclosing visit.
//! Values only meet through the capability traits in [`value`] and
//! [`callable`].
//!
//! Each function call gets its own `Evaluator`, and with it its own pending
//! return. A `return` only stops the statements of the call it belongs to.

pub mod callable;
pub mod output;
pub mod value;

use std::rc::Rc;

use TokenKind::*;
use callable::{Callable, Function};
use output::Output;
use value::{Arithmetic, Comparable, Comparison, Number, Truthy, Value};

use crate::{
	ast::{Node, NodeKind, Program},
	environment::Context,
	error::interpreter::{OperationError, RuntimeError},
	scanner::{Token, TokenKind},
};

/// Evaluation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
	/// How many calls may be nested before evaluation gives up.
	pub max_call_depth: usize,
}

impl Default for Settings {
	fn default() -> Self { Self { max_call_depth: 64 } }
}

#[derive(Debug)]
pub struct Evaluator {
	settings:       Settings,
	output:         Output,
	/// Number of calls this evaluator is nested in.
	depth:          usize,
	/// Set by `return`, ends every block up to the enclosing call.
	pending_return: Option<Value>,
}

impl Evaluator {
	pub fn new(settings: Settings, output: Output) -> Self {
		Self { settings, output, depth: 0, pending_return: None }
	}

	pub fn settings(&self) -> Settings { self.settings }

	pub fn output(&self) -> &Output { &self.output }

	pub fn depth(&self) -> usize { self.depth }

	/// The evaluator for a call made from this one.
	pub fn nested(&self) -> Self {
		Self { settings: self.settings, output: self.output.clone(), depth: self.depth + 1, pending_return: None }
	}

	pub fn take_return(&mut self) -> Option<Value> { self.pending_return.take() }

	/// Run a whole program, returning the display form of each top-level
	/// statement that ran to completion.
	pub fn run(&mut self, program: &Program, context: &Rc<Context>) -> Result<Vec<String>, RuntimeError> {
		self.pending_return = None;
		let trace = self.execute_block(&program.statements, context)?;
		tracing::debug!(statements = trace.len(), "evaluated program");
		Ok(trace)
	}

	/// Statements run in order until one fails or a `return` has run.
	fn execute_block(&mut self, statements: &[Node], context: &Rc<Context>) -> Result<Vec<String>, RuntimeError> {
		let mut trace = Vec::with_capacity(statements.len());
		for statement in statements {
			let value = self.visit(statement, context)?;
			if self.pending_return.is_some() {
				break;
			}
			trace.push(value.to_string());
		}
		Ok(trace)
	}

	pub fn visit(&mut self, node: &Node, context: &Rc<Context>) -> Result<Value, RuntimeError> {
		match &node.kind {
			NodeKind::Block(statements) => {
				self.execute_block(statements, context)?;
				Ok(Value::None)
			}
			NodeKind::ConstAssign { name, value } | NodeKind::VarAssign { name, value } => {
				let value = self.visit(value, context)?;
				tracing::trace!(name = identifier(name), %value, "bind");
				context.set(identifier(name), value);
				Ok(Value::None)
			}
			NodeKind::Return(value) => {
				let value = self.visit(value, context)?;
				self.pending_return = Some(value.clone());
				Ok(value)
			}
			NodeKind::Number(token) => match Number::from_token(&token.kind) {
				Some(number) => Ok(Value::Number(number)),
				None => Err(unsupported(node, context)),
			},
			NodeKind::String(token) => match &token.kind {
				Str(text) => Ok(Value::Str(Rc::from(text.as_str()))),
				_ => Err(unsupported(node, context)),
			},
			NodeKind::Identifier(token) => {
				let name = identifier(token);
				context
					.get(name)
					.ok_or_else(|| RuntimeError::new(format!("Name {name} does not exist"), &node.span.start, context))
			}
			NodeKind::UnaryOp { operator, operand } => {
				let value = self.visit(operand, context)?;
				let result = match operator.kind {
					Minus => value.neg(),
					_ => Err(OperationError::UnsupportedUnary(operator.kind.name())),
				};
				result.map_err(|e| e.at(&node.span.start, context))
			}
			NodeKind::BinaryOp { left, operator, right } => {
				let left = self.visit(left, context)?;
				let right = self.visit(right, context)?;
				binary(&left, &operator.kind, &right).map_err(|e| e.at(&node.span.start, context))
			}
			NodeKind::If { condition, then_block, elif_conditions, elif_blocks, else_block } => {
				if self.condition(condition, context)? {
					self.visit(then_block, context)?;
					return Ok(Value::None);
				}
				// Every truthy elif runs, not just the first one.
				let mut taken = false;
				for (condition, block) in elif_conditions.iter().zip(elif_blocks) {
					if self.pending_return.is_some() {
						return Ok(Value::None);
					}
					if self.condition(condition, context)? {
						taken = true;
						self.visit(block, context)?;
					}
				}
				if let Some(block) = else_block
					&& !taken
					&& self.pending_return.is_none()
				{
					self.visit(block, context)?;
				}
				Ok(Value::None)
			}
			NodeKind::Function { name, params, body } => {
				let Some(params) = parameter_names(params) else {
					return Err(RuntimeError::new("Function argument must be an identifier", &params.span.start, context));
				};
				let name = name.as_ref().map(|token| identifier(token).to_string());
				let function =
					Rc::new(Function { name: name.clone(), params, body: body.clone(), closure: Rc::downgrade(context) });
				if let Some(name) = name {
					context.set(name, Value::Function(function.clone()));
				}
				Ok(Value::Function(function))
			}
			NodeKind::Call { callee, arguments } => {
				let callee = self.visit(callee, context)?;
				let NodeKind::ArgList(arguments) = &arguments.kind else {
					return Err(unsupported(arguments, context));
				};
				let arguments =
					arguments.iter().map(|argument| self.visit(argument, context)).collect::<Result<Vec<_>, _>>()?;
				callee.call(self, arguments, &node.span, context)
			}
			NodeKind::List(_) | NodeKind::Set(_) | NodeKind::ArgList(_) | NodeKind::Index { .. } => {
				Err(unsupported(node, context))
			}
		}
	}

	fn condition(&mut self, node: &Node, context: &Rc<Context>) -> Result<bool, RuntimeError> {
		self.visit(node, context)?.is_truthy().map_err(|e| e.at(&node.span.start, context))
	}
}

fn binary(left: &Value, operator: &TokenKind, right: &Value) -> Result<Value, OperationError> {
	match operator {
		Plus => left.add(right),
		Minus => left.sub(right),
		Asterisk => left.mul(right),
		Slash => left.div(right),
		kind => match Comparison::from_token(kind) {
			Some(comparison) => left.compare(comparison, right),
			None => Err(OperationError::IllegalOperation),
		},
	}
}

/// `x` or `(a, b)`, anything else cannot be a parameter list.
fn parameter_names(params: &Node) -> Option<Vec<String>> {
	match &params.kind {
		NodeKind::Identifier(token) => Some(vec![identifier(token).to_string()]),
		NodeKind::Set(elements) => {
			elements.iter().map(|element| element.as_identifier().map(|token| identifier(token).to_string())).collect()
		}
		_ => None,
	}
}

fn identifier(token: &Token) -> &str {
	match &token.kind {
		Identifier(name) => name,
		_ => token.span.text(),
	}
}

fn unsupported(node: &Node, context: &Context) -> RuntimeError {
	RuntimeError::new(format!("Unsupported node {}", node.kind.name()), &node.span.start, context)
}

#[cfg(test)]
mod tests {
	use expect_test::expect;

	use super::*;
	use crate::{parser::parse, scanner::tokenize};

	fn program(input: &str) -> Program {
		let (program, errors) = parse(tokenize(input, "test").unwrap());
		assert!(errors.is_empty(), "{input:?}: {errors:?}");
		program
	}

	/// Run `input` in a fresh global context, returning the trace and
	/// everything `write` printed.
	fn run(input: &str) -> (Result<Vec<String>, RuntimeError>, String) {
		let output = Output::buffer();
		let mut evaluator = Evaluator::new(Settings::default(), output.clone());
		let result = evaluator.run(&program(input), &Context::global("<program>"));
		(result, output.captured().unwrap_or_default())
	}

	fn written(input: &str) -> String {
		let (result, output) = run(input);
		assert!(result.is_ok(), "{input:?}: {result:?}");
		output
	}

	fn error(input: &str) -> RuntimeError { run(input).0.unwrap_err() }

	#[test]
	fn write_a_variable() {
		let (result, output) = run("var x = 5; write(x);");
		assert_eq!(result.unwrap(), vec!["none", "none"]);
		assert_eq!(output, "5");
	}

	#[test]
	fn division_by_zero_binds_nothing() {
		let global = Context::global("<program>");
		let mut evaluator = Evaluator::new(Settings::default(), Output::buffer());
		let error = evaluator.run(&program("var y = 10 / 0;"), &global).unwrap_err();
		assert_eq!(error.message, "Division by 0");
		assert!(global.get("y").is_none());
	}

	#[test]
	fn number_kinds() {
		assert_eq!(written("write(7);"), "7");
		assert_eq!(written("write(007);"), "7");
		assert_eq!(written("write(1.0);"), "1.0");
		assert_eq!(written("write(1 + 2);"), "3");
		assert_eq!(written("write(1 + 2.0);"), "3.0");
		assert_eq!(written("write(5 / 2);"), "2.5");
		assert_eq!(written("write(4 / 2);"), "2.0");
		assert_eq!(written("write(-3 * 2);"), "-6");
		assert_eq!(written("write(1 < 2); write(2 != 2);"), "10");
	}

	#[test]
	fn trace_holds_display_forms() {
		let (result, _) = run("1 + 1; \"text\"; write; none; 2.5;");
		assert_eq!(result.unwrap(), vec!["2", "text", "<built-in function write>", "none", "2.5"]);
	}

	#[test]
	fn runtime_errors() {
		assert_eq!(error("x;").message, "Name x does not exist");
		assert_eq!(error("\"a\" + 1;").message, "Illegal Operation");
		assert_eq!(error("-\"a\";").message, "Illegal Operation");
		assert_eq!(error("!1;").message, "Unsupported unary operation for NOT");
		assert_eq!(error("+1;").message, "Unsupported unary operation for PLUS");
		assert_eq!(error("if \"a\" { 1; }").message, "Illegal Operation");
		assert_eq!(error("5(1);").message, "Illegal Operation");
		assert_eq!(error("9223372036854775807 + 1;").message, "Integer overflow");
		assert_eq!(error("(1, 2);").message, "Unsupported node Set");
		assert_eq!(error("[1];").message, "Unsupported node List");
		assert_eq!(error("var a = 1; a[0];").message, "Unsupported node Index");
		assert_eq!(error("1 => { };").message, "Function argument must be an identifier");
		assert_eq!(error("(a, 1) => { };").message, "Function argument must be an identifier");
	}

	#[test]
	fn errors_stop_evaluation() {
		let (result, output) = run("write(1); write(x); write(2);");
		assert!(result.is_err());
		assert_eq!(output, "1");
	}

	#[test]
	fn functions_and_returns() {
		assert_eq!(written("var add = (a, b) => { return a + b; }; write(add(2, 3));"), "5");
		assert_eq!(written("func double(n) { return n * 2; } write(double(21));"), "42");
		assert_eq!(written("var f = () => { write(1); return 2; write(3); }; write(f());"), "12");
		assert_eq!(written("var f = x => { }; write(f(1));"), "none");
		assert_eq!(written("var f = x => { return x; }; write(f);"), "<function anonymous>");
		assert_eq!(written("func g() { } write(g);"), "<function g>");
	}

	#[test]
	fn returns_end_only_their_own_call() {
		let source = "
			func inner() { return 1; }
			func outer() { var a = inner(); write(a); return 2; }
			write(outer());
		";
		assert_eq!(written(source), "12");
	}

	#[test]
	fn return_inside_if_ends_the_call() {
		let source = "
			func sign(n) {
				if n < 0 { return -1; }
				elif n == 0 { return 0; }
				return 1;
			}
			write(sign(-5)); write(sign(0)); write(sign(9));
		";
		assert_eq!(written(source), "-101");
	}

	#[test]
	fn top_level_return_stops_the_program() {
		let (result, output) = run("write(1); return 0; write(2);");
		assert_eq!(result.unwrap(), vec!["none"]);
		assert_eq!(output, "1");
	}

	#[test]
	fn functions_read_globals_only() {
		assert_eq!(written("var x = 1; func f() { return x; } write(f());"), "1");
		assert_eq!(written("func f() { return true + false; } write(f());"), "1");
		let source = "func outer() { var y = 2; func inner() { return y; } return inner(); } outer();";
		assert_eq!(error(source).message, "Name y does not exist");
	}

	#[test]
	fn calls_leave_rebound_builtins_alone() {
		assert_eq!(written("var true = 0; func f() { } write(true); f(); write(true);"), "00");
		assert_eq!(written("var write = 3; func f(n) { return n; } f(1); write;"), "");
		let (result, _) = run("var none = 7; func f() { } f(); none;");
		assert_eq!(result.unwrap().last().map(String::as_str), Some("7"));
	}

	#[test]
	fn recursion_reaches_the_function_itself() {
		let source = "func fact(n) { if n < 2 { return 1; } return n * fact(n - 1); } write(fact(10));";
		assert_eq!(written(source), "3628800");
	}

	#[test]
	fn call_writes_back_existing_names() {
		assert_eq!(written("var x = 1; func f() { x = 10; y = 20; } f(); write(x);"), "10");
		assert_eq!(error("var x = 1; func f() { y = 20; } f(); y;").message, "Name y does not exist");
		// Parameters that shadow an outer name are written back too.
		assert_eq!(written("var x = 1; func f(x) { } f(7); write(x);"), "7");
	}

	#[test]
	fn arity_mismatch_binds_nothing() {
		let global = Context::global("<program>");
		let mut evaluator = Evaluator::new(Settings::default(), Output::buffer());
		let error = evaluator.run(&program("var a = 0; var f = (a, b) => { }; f(1);"), &global).unwrap_err();
		assert_eq!(error.message, "Method takes only 2, 1 were given.");
		assert_eq!(global.get("a"), Some(Value::Number(Number::Int(0))));
		assert_eq!(self::error("write(1, 2);").message, "Method takes only 1, 2 were given.");
		assert_eq!(self::error("write();").message, "Method takes only 1, 0 were given.");
	}

	#[test]
	fn deep_recursion_is_bounded() {
		let output = Output::buffer();
		let mut evaluator = Evaluator::new(Settings { max_call_depth: 10 }, output);
		let error = evaluator.run(&program("func f(n) { return f(n); } f(1);"), &Context::global("<program>"));
		assert_eq!(error.unwrap_err().message, "Maximum call depth exceeded");
	}

	#[test]
	fn default_depth_fits_a_small_stack() {
		let message = std::thread::Builder::new()
			.stack_size(2 * 1024 * 1024)
			.spawn(|| error("func f(g) { return g(g); } f(f);").message)
			.unwrap()
			.join()
			.unwrap();
		assert_eq!(message, "Maximum call depth exceeded");
	}

	#[test]
	fn if_runs_every_truthy_elif() {
		assert_eq!(written("if 1 { write(1); } elif 1 { write(2); } else { write(3); }"), "1");
		assert_eq!(written("if 0 { write(1); } elif 1 { write(2); } elif 1 { write(3); } else { write(4); }"), "23");
		assert_eq!(written("if 0 { write(1); } elif 0 { write(2); } else { write(4); }"), "4");
		assert_eq!(written("if 0 { write(1); }"), "");
		assert_eq!(written("if 0.0 { write(1); } else { write(2); }"), "2");
	}

	#[test]
	fn if_yields_none() {
		let (result, _) = run("if 1 { 5; }");
		assert_eq!(result.unwrap(), vec!["none"]);
	}

	#[test]
	fn strings_can_be_written() {
		assert_eq!(written("var s = \"hi\"; write(s);"), "hi");
	}

	struct Closed;

	impl std::io::Write for Closed {
		fn write(&mut self, _: &[u8]) -> std::io::Result<usize> { Err(std::io::ErrorKind::BrokenPipe.into()) }

		fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
	}

	#[test]
	fn failed_write_is_a_runtime_error() {
		let mut evaluator = Evaluator::new(Settings::default(), Output::stream(Closed));
		let error = evaluator.run(&program("write(1); var x = 2;"), &Context::global("<program>")).unwrap_err();
		assert!(error.message.starts_with("Failed write output: "), "{}", error.message);
		assert_eq!(error.frames.len(), 1);
	}

	#[test]
	fn runs_are_idempotent() {
		let program = program("var x = 2; func f(x, n) { x = x + n; return x; } write(f(x, 3)); write(x);");
		let runs: Vec<_> = (0..3)
			.map(|_| {
				let output = Output::buffer();
				let trace = Evaluator::new(Settings::default(), output.clone())
					.run(&program, &Context::global("<program>"))
					.unwrap();
				(trace, output.captured())
			})
			.collect();
		assert!(runs.windows(2).all(|pair| pair[0] == pair[1]));
		assert_eq!(runs[0].1.as_deref(), Some("55"));
	}

	#[test]
	fn traceback_lists_call_frames() {
		let source = "func f(a) {\n  return a / 0;\n}\nf(1);";
		expect![[r#"
            Traceback (most recent call last):
              File test, line 4, in <program>
              File test, line 2, in f
            RuntimeError: Division by 0"#]]
		.assert_eq(&error(source).to_string());
	}
}
