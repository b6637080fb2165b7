use std::{cmp::Ordering, fmt, rc::Rc};

use super::callable::{BuiltInFunction, Function};
use crate::{error::interpreter::OperationError, scanner::TokenKind};

/// A numeric value, integers stay integers until they meet a float or `/`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
	Int(i64),
	Float(f64),
}

impl Number {
	/// The value of a number literal token.
	pub fn from_token(kind: &TokenKind) -> Option<Self> {
		match kind {
			TokenKind::Int(n) => Some(Number::Int(*n)),
			TokenKind::Float(n) => Some(Number::Float(*n)),
			_ => None,
		}
	}

	pub fn as_f64(self) -> f64 {
		match self {
			Number::Int(n) => n as f64,
			Number::Float(n) => n,
		}
	}

	pub fn is_zero(self) -> bool { self.as_f64() == 0.0 }

	fn combine(
		self,
		other: Self,
		int_op: fn(i64, i64) -> Option<i64>,
		float_op: fn(f64, f64) -> f64,
	) -> Result<Self, OperationError> {
		match (self, other) {
			(Number::Int(l), Number::Int(r)) => int_op(l, r).map(Number::Int).ok_or(OperationError::IntegerOverflow),
			(l, r) => Ok(Number::Float(float_op(l.as_f64(), r.as_f64()))),
		}
	}

	pub fn add(self, other: Self) -> Result<Self, OperationError> { self.combine(other, i64::checked_add, |l, r| l + r) }

	pub fn sub(self, other: Self) -> Result<Self, OperationError> { self.combine(other, i64::checked_sub, |l, r| l - r) }

	pub fn mul(self, other: Self) -> Result<Self, OperationError> { self.combine(other, i64::checked_mul, |l, r| l * r) }

	/// True division, the result is always a float.
	pub fn div(self, other: Self) -> Result<Self, OperationError> {
		if other.is_zero() {
			return Err(OperationError::DivisionByZero);
		}
		Ok(Number::Float(self.as_f64() / other.as_f64()))
	}

	pub fn neg(self) -> Result<Self, OperationError> {
		match self {
			Number::Int(n) => n.checked_neg().map(Number::Int).ok_or(OperationError::IntegerOverflow),
			Number::Float(n) => Ok(Number::Float(-n)),
		}
	}

	fn ordering(self, other: Self) -> Option<Ordering> {
		match (self, other) {
			(Number::Int(l), Number::Int(r)) => Some(l.cmp(&r)),
			(l, r) => l.as_f64().partial_cmp(&r.as_f64()),
		}
	}
}

impl PartialEq for Number {
	fn eq(&self, other: &Self) -> bool { self.ordering(*other) == Some(Ordering::Equal) }
}

impl fmt::Display for Number {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Number::Int(n) => write!(f, "{n}"),
			Number::Float(n) => write!(f, "{n:?}"),
		}
	}
}

/// The comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
	Less,
	Greater,
	LessEqual,
	GreaterEqual,
	Equal,
	NotEqual,
}

impl Comparison {
	pub fn from_token(kind: &TokenKind) -> Option<Self> {
		Some(match kind {
			TokenKind::Less => Comparison::Less,
			TokenKind::Greater => Comparison::Greater,
			TokenKind::LessEqual => Comparison::LessEqual,
			TokenKind::GreaterEqual => Comparison::GreaterEqual,
			TokenKind::DoubleEqual => Comparison::Equal,
			TokenKind::NotEqual => Comparison::NotEqual,
			_ => return None,
		})
	}

	/// Unordered operands (NaN) are only ever "not equal".
	fn holds(self, ordering: Option<Ordering>) -> bool {
		use Ordering::*;
		match (self, ordering) {
			(Comparison::NotEqual, ordering) => ordering != Some(Equal),
			(_, None) => false,
			(Comparison::Less, Some(ordering)) => ordering == Less,
			(Comparison::Greater, Some(ordering)) => ordering == Greater,
			(Comparison::LessEqual, Some(ordering)) => ordering != Greater,
			(Comparison::GreaterEqual, Some(ordering)) => ordering != Less,
			(Comparison::Equal, Some(ordering)) => ordering == Equal,
		}
	}
}

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
	Number(Number),
	Str(Rc<str>),
	Function(Rc<Function>),
	BuiltIn(BuiltInFunction),
	None,
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Number(l), Value::Number(r)) => l == r,
			(Value::Str(l), Value::Str(r)) => l == r,
			(Value::Function(l), Value::Function(r)) => Rc::ptr_eq(l, r),
			(Value::BuiltIn(l), Value::BuiltIn(r)) => l == r,
			(Value::None, Value::None) => true,
			_ => false,
		}
	}
}

impl From<Number> for Value {
	fn from(number: Number) -> Self { Value::Number(number) }
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Number(number) => write!(f, "{number}"),
			Value::Str(text) => f.write_str(text),
			Value::Function(function) => write!(f, "<function {}>", function.name()),
			Value::BuiltIn(builtin) => write!(f, "<built-in function {}>", builtin.name()),
			Value::None => f.write_str("none"),
		}
	}
}

/// `+ - * /` and negation.
pub trait Arithmetic: Sized {
	fn add(&self, other: &Self) -> Result<Self, OperationError>;
	fn sub(&self, other: &Self) -> Result<Self, OperationError>;
	fn mul(&self, other: &Self) -> Result<Self, OperationError>;
	fn div(&self, other: &Self) -> Result<Self, OperationError>;
	fn neg(&self) -> Result<Self, OperationError>;
}

/// Only two numbers do arithmetic.
fn numbers(
	left: &Value,
	right: &Value,
	op: fn(Number, Number) -> Result<Number, OperationError>,
) -> Result<Value, OperationError> {
	match (left, right) {
		(Value::Number(l), Value::Number(r)) => op(*l, *r).map(Value::Number),
		_ => Err(OperationError::IllegalOperation),
	}
}

impl Arithmetic for Value {
	fn add(&self, other: &Self) -> Result<Self, OperationError> { numbers(self, other, Number::add) }

	fn sub(&self, other: &Self) -> Result<Self, OperationError> { numbers(self, other, Number::sub) }

	fn mul(&self, other: &Self) -> Result<Self, OperationError> { numbers(self, other, Number::mul) }

	fn div(&self, other: &Self) -> Result<Self, OperationError> { numbers(self, other, Number::div) }

	fn neg(&self) -> Result<Self, OperationError> {
		match self {
			Value::Number(number) => number.neg().map(Value::Number),
			_ => Err(OperationError::IllegalOperation),
		}
	}
}

/// The comparison operators, which answer with `1` or `0`.
pub trait Comparable {
	fn compare(&self, comparison: Comparison, other: &Self) -> Result<Value, OperationError>;
}

impl Comparable for Value {
	fn compare(&self, comparison: Comparison, other: &Self) -> Result<Value, OperationError> {
		match (self, other) {
			(Value::Number(l), Value::Number(r)) => {
				let holds = comparison.holds(l.ordering(*r));
				Ok(Value::Number(Number::Int(holds as i64)))
			}
			_ => Err(OperationError::IllegalOperation),
		}
	}
}

/// Conditions of `if` and `elif`.
pub trait Truthy {
	fn is_truthy(&self) -> Result<bool, OperationError>;
}

impl Truthy for Value {
	fn is_truthy(&self) -> Result<bool, OperationError> {
		match self {
			Value::Number(number) => Ok(!number.is_zero()),
			_ => Err(OperationError::IllegalOperation),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn int(n: i64) -> Value { Value::Number(Number::Int(n)) }

	fn float(n: f64) -> Value { Value::Number(Number::Float(n)) }

	fn text(s: &str) -> Value { Value::Str(Rc::from(s)) }

	#[test]
	fn int_arithmetic_stays_int() {
		assert!(matches!(int(2).add(&int(3)), Ok(Value::Number(Number::Int(5)))));
		assert!(matches!(int(2).sub(&int(3)), Ok(Value::Number(Number::Int(-1)))));
		assert!(matches!(int(2).mul(&int(3)), Ok(Value::Number(Number::Int(6)))));
		assert_eq!(int(i64::MAX).add(&int(1)), Err(OperationError::IntegerOverflow));
		assert_eq!(int(i64::MIN).neg(), Err(OperationError::IntegerOverflow));
	}

	#[test]
	fn mixed_and_division_are_float() {
		assert!(matches!(int(1).add(&float(0.5)), Ok(Value::Number(Number::Float(n))) if n == 1.5));
		assert!(matches!(int(4).div(&int(2)), Ok(Value::Number(Number::Float(n))) if n == 2.0));
		assert_eq!(int(10).div(&int(0)), Err(OperationError::DivisionByZero));
		assert_eq!(float(1.0).div(&float(0.0)), Err(OperationError::DivisionByZero));
	}

	#[test]
	fn comparisons_answer_one_or_zero() {
		assert_eq!(int(1).compare(Comparison::Less, &int(2)), Ok(int(1)));
		assert_eq!(int(2).compare(Comparison::LessEqual, &int(1)), Ok(int(0)));
		assert_eq!(int(2).compare(Comparison::Equal, &float(2.0)), Ok(int(1)));
		assert_eq!(int(2).compare(Comparison::NotEqual, &int(3)), Ok(int(1)));
		assert_eq!(float(f64::NAN).compare(Comparison::NotEqual, &float(f64::NAN)), Ok(int(1)));
		assert_eq!(float(f64::NAN).compare(Comparison::Equal, &float(f64::NAN)), Ok(int(0)));
	}

	#[test]
	fn strings_have_no_operations() {
		assert_eq!(text("a").add(&text("b")), Err(OperationError::IllegalOperation));
		assert_eq!(text("a").compare(Comparison::Equal, &text("a")), Err(OperationError::IllegalOperation));
		assert_eq!(text("a").is_truthy(), Err(OperationError::IllegalOperation));
		assert_eq!(int(1).mul(&text("b")), Err(OperationError::IllegalOperation));
		assert_eq!(Value::None.neg(), Err(OperationError::IllegalOperation));
	}

	#[test]
	fn truthiness() {
		assert_eq!(int(0).is_truthy(), Ok(false));
		assert_eq!(float(0.0).is_truthy(), Ok(false));
		assert_eq!(int(-3).is_truthy(), Ok(true));
		assert_eq!(Value::None.is_truthy(), Err(OperationError::IllegalOperation));
	}

	#[test]
	fn display_forms() {
		assert_eq!(int(5).to_string(), "5");
		assert_eq!(float(5.0).to_string(), "5.0");
		assert_eq!(float(2.5).to_string(), "2.5");
		assert_eq!(text("hi there").to_string(), "hi there");
		assert_eq!(Value::None.to_string(), "none");
		assert_eq!(Value::BuiltIn(BuiltInFunction::Write).to_string(), "<built-in function write>");
	}
}
