use crate::{environment::Context, scanner::Position};

/// One line of a traceback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
	pub filename: String,
	/// Zero based, rendered one based.
	pub line:     usize,
	pub name:     String,
}

/// A runtime error. Evaluation stops at the first one, and it travels up
/// through every enclosing visit.
///
/// The traceback is captured when the error is raised, by walking the
/// context chain from the failing position outward.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{}RuntimeError: {}", self.traceback(), self.message)]
pub struct RuntimeError {
	pub message: String,
	/// Outermost frame first.
	pub frames:  Vec<Frame>,
}

impl RuntimeError {
	pub fn new(message: impl Into<String>, position: &Position, context: &Context) -> Self {
		let mut frames = Vec::new();
		let mut position = Some(position.clone());
		let mut context = Some(context);
		while let (Some(pos), Some(ctx)) = (position, context) {
			frames.push(Frame { filename: pos.filename.to_string(), line: pos.line, name: ctx.name.clone() });
			position = ctx.parent_entry.clone();
			context = ctx.parent.as_deref();
		}
		frames.reverse();
		Self { message: message.into(), frames }
	}

	fn traceback(&self) -> String {
		let mut text = "Traceback (most recent call last):\n".to_string();
		for frame in &self.frames {
			text.push_str(&format!("  File {}, line {}, in {}\n", frame.filename, frame.line + 1, frame.name));
		}
		text
	}
}

/// Failures of the value capabilities, before a position is attached.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
	#[error("Illegal Operation")]
	IllegalOperation,
	#[error("Division by 0")]
	DivisionByZero,
	#[error("Integer overflow")]
	IntegerOverflow,
	#[error("Unsupported unary operation for {0}")]
	UnsupportedUnary(&'static str),
}

impl OperationError {
	pub fn at(self, position: &Position, context: &Context) -> RuntimeError {
		RuntimeError::new(self.to_string(), position, context)
	}
}
