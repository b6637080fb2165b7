use std::rc::{Rc, Weak};

use super::{Evaluator, value::Value};
use crate::{
	ast::Node,
	environment::Context,
	error::interpreter::{OperationError, RuntimeError},
	scanner::Span,
};

/// Anything that can sit on the left of a call.
pub trait Callable {
	/// Call with already evaluated `arguments`. `site` is the call
	/// expression and `caller` the context it was evaluated in.
	fn call(
		&self,
		evaluator: &Evaluator,
		arguments: Vec<Value>,
		site: &Span,
		caller: &Rc<Context>,
	) -> Result<Value, RuntimeError>;
}

/// A user defined function.
#[derive(Debug)]
pub struct Function {
	pub name:    Option<String>,
	pub params:  Vec<String>,
	pub body:    Rc<Node>,
	/// The defining context. Weak, since that context usually stores the
	/// function itself.
	pub closure: Weak<Context>,
}

impl Function {
	pub fn name(&self) -> &str { self.name.as_deref().unwrap_or("anonymous") }
}

impl Callable for Function {
	/// The body runs in a fresh frame holding the arguments, names it does
	/// not bind are read from the global context. Afterwards every frame
	/// binding whose name already exists in the closure is copied back into
	/// it.
	fn call(
		&self,
		evaluator: &Evaluator,
		arguments: Vec<Value>,
		site: &Span,
		caller: &Rc<Context>,
	) -> Result<Value, RuntimeError> {
		check_arity(self.params.len(), arguments.len(), site, caller)?;
		if evaluator.depth() >= evaluator.settings().max_call_depth {
			return Err(RuntimeError::new("Maximum call depth exceeded", &site.start, caller));
		}

		let closure = self.closure.upgrade();
		let parent = closure.clone().unwrap_or_else(|| caller.clone());
		let frame = Context::frame(self.name(), parent, site.start.clone());
		for (param, argument) in self.params.iter().zip(arguments) {
			frame.set(param.as_str(), argument);
		}
		tracing::trace!(function = self.name(), depth = evaluator.depth() + 1, "call");

		let mut nested = evaluator.nested();
		nested.visit(&self.body, &frame)?;

		if let Some(closure) = closure {
			let locals = frame.symbols.borrow();
			let mut outer = closure.symbols.borrow_mut();
			for (name, value) in locals.iter() {
				if outer.contains(name) {
					tracing::trace!(function = self.name(), name, "write back");
					outer.set(name, value.clone());
				}
			}
		}

		Ok(nested.take_return().unwrap_or(Value::None))
	}
}

/// Host provided functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltInFunction {
	/// `write(text)` prints the display form of `text`, no newline.
	Write,
}

impl BuiltInFunction {
	pub fn name(self) -> &'static str {
		match self {
			BuiltInFunction::Write => "write",
		}
	}

	pub fn params(self) -> &'static [&'static str] {
		match self {
			BuiltInFunction::Write => &["text"],
		}
	}
}

impl Callable for BuiltInFunction {
	fn call(
		&self,
		evaluator: &Evaluator,
		arguments: Vec<Value>,
		site: &Span,
		caller: &Rc<Context>,
	) -> Result<Value, RuntimeError> {
		check_arity(self.params().len(), arguments.len(), site, caller)?;
		match (self, arguments.as_slice()) {
			(BuiltInFunction::Write, [text]) => evaluator
				.output()
				.write(&text.to_string())
				.map_err(|e| RuntimeError::new(format!("Failed write output: {e}"), &site.start, caller))?,
			_ => return Err(OperationError::IllegalOperation.at(&site.start, caller)),
		}
		Ok(Value::None)
	}
}

impl Callable for Value {
	fn call(
		&self,
		evaluator: &Evaluator,
		arguments: Vec<Value>,
		site: &Span,
		caller: &Rc<Context>,
	) -> Result<Value, RuntimeError> {
		match self {
			Value::Function(function) => function.call(evaluator, arguments, site, caller),
			Value::BuiltIn(builtin) => builtin.call(evaluator, arguments, site, caller),
			_ => Err(OperationError::IllegalOperation.at(&site.start, caller)),
		}
	}
}

fn check_arity(expected: usize, given: usize, site: &Span, caller: &Context) -> Result<(), RuntimeError> {
	if expected == given {
		return Ok(());
	}
	Err(RuntimeError::new(format!("Method takes only {expected}, {given} were given."), &site.start, caller))
}
