use std::{fmt, io::Write};

use crate::utils::RcCell;

/// Where `write` sends its text.
#[derive(Clone, Default)]
pub enum Output {
	#[default]
	Stdout,
	/// Collected in memory, shared by every clone.
	Buffer(RcCell<String>),
	/// Any other sink, shared by every clone.
	Stream(RcCell<Box<dyn Write>>),
}

impl Output {
	pub fn buffer() -> Self { Output::Buffer(RcCell::default()) }

	pub fn stream(writer: impl Write + 'static) -> Self { Output::Stream(RcCell::new(Box::new(writer))) }

	/// Write and flush `text`, no newline is added.
	pub fn write(&self, text: &str) -> std::io::Result<()> {
		match self {
			Output::Stdout => {
				let mut stdout = std::io::stdout();
				write!(stdout, "{text}")?;
				stdout.flush()
			}
			Output::Buffer(buffer) => {
				buffer.borrow_mut().push_str(text);
				Ok(())
			}
			Output::Stream(stream) => {
				let mut stream = stream.borrow_mut();
				stream.write_all(text.as_bytes())?;
				stream.flush()
			}
		}
	}

	/// Everything written so far, `None` unless writing to a buffer.
	pub fn captured(&self) -> Option<String> {
		match self {
			Output::Buffer(buffer) => Some(buffer.borrow().clone()),
			Output::Stdout | Output::Stream(_) => None,
		}
	}
}

impl fmt::Debug for Output {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Output::Stdout => write!(f, "Stdout"),
			Output::Buffer(buffer) => f.debug_tuple("Buffer").field(&*buffer.borrow()).finish(),
			Output::Stream(_) => write!(f, "Stream"),
		}
	}
}
