use std::{collections::HashMap, rc::Rc};

use crate::{
	interpreter::{callable::BuiltInFunction, value::{Number, Value}},
	scanner::Position,
	utils::RcCell,
};

/// Flat name to value mapping, lookups never fall through to another table.
#[derive(Default, Debug, Clone)]
pub struct SymbolTable {
	symbols: HashMap<String, Value>,
}

impl SymbolTable {
	pub fn new() -> Self { Self::default() }

	/// The builtin bindings every context starts with.
	pub fn builtins() -> Self {
		let mut table = Self::new();
		table.set("true", Value::Number(Number::Int(1)));
		table.set("false", Value::Number(Number::Int(0)));
		table.set("none", Value::None);
		table.set("write", Value::BuiltIn(BuiltInFunction::Write));
		table
	}

	pub fn get(&self, name: &str) -> Option<Value> { self.symbols.get(name).cloned() }

	/// Binding an existing name replaces its value.
	pub fn set(&mut self, name: impl Into<String>, value: Value) { self.symbols.insert(name.into(), value); }

	pub fn contains(&self, name: &str) -> bool { self.symbols.contains_key(name) }

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.symbols.iter().map(|(name, value)| (name.as_str(), value))
	}
}

/// An execution scope.
///
/// A name is looked up in `symbols` and then in the root context of the
/// chain, never in the contexts in between. `parent` and `parent_entry` also
/// feed tracebacks.
#[derive(Debug)]
pub struct Context {
	pub name:         String,
	pub parent:       Option<Rc<Context>>,
	/// Where the parent was when it entered this context.
	pub parent_entry: Option<Position>,
	pub symbols:      RcCell<SymbolTable>,
}

impl Context {
	/// The root context of a run, seeded with the builtins.
	pub fn global(name: impl Into<String>) -> Rc<Self> {
		Rc::new(Self { name: name.into(), parent: None, parent_entry: None, symbols: SymbolTable::builtins().into() })
	}

	/// A call frame entered from `parent` at `entry`. It starts empty, the
	/// builtins are found through the root.
	pub fn frame(name: impl Into<String>, parent: Rc<Context>, entry: Position) -> Rc<Self> {
		Rc::new(Self {
			name:         name.into(),
			parent:       Some(parent),
			parent_entry: Some(entry),
			symbols:      SymbolTable::new().into(),
		})
	}

	/// Own bindings first, then the root's.
	pub fn get(&self, name: &str) -> Option<Value> {
		self.symbols.borrow().get(name).or_else(|| match &self.parent {
			Some(_) => self.root().symbols.borrow().get(name),
			None => None,
		})
	}

	/// Always binds in this context's own table.
	pub fn set(&self, name: impl Into<String>, value: Value) { self.symbols.borrow_mut().set(name, value) }

	/// The context at the end of the parent chain.
	pub fn root(&self) -> &Context {
		let mut context = self;
		while let Some(parent) = &context.parent {
			context = parent;
		}
		context
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry() -> Position { Position::new(Rc::from("f();"), Rc::from("test")) }

	#[test]
	fn global_is_seeded() {
		let global = Context::global("main");
		assert_eq!(global.get("true"), Some(Value::Number(Number::Int(1))));
		assert_eq!(global.get("false"), Some(Value::Number(Number::Int(0))));
		assert_eq!(global.get("none"), Some(Value::None));
		assert_eq!(global.get("write"), Some(Value::BuiltIn(BuiltInFunction::Write)));
	}

	#[test]
	fn frames_start_empty_and_read_the_root() {
		let global = Context::global("main");
		global.set("x", Value::Number(Number::Int(5)));
		let frame = Context::frame("f", global.clone(), entry());
		assert_eq!(frame.symbols.borrow().iter().count(), 0);
		assert_eq!(frame.get("x"), Some(Value::Number(Number::Int(5))));
		assert_eq!(frame.get("write"), Some(Value::BuiltIn(BuiltInFunction::Write)));
		frame.set("x", Value::None);
		assert_eq!(frame.get("x"), Some(Value::None));
		assert_eq!(global.get("x"), Some(Value::Number(Number::Int(5))));
	}

	#[test]
	fn lookups_skip_intermediate_frames() {
		let global = Context::global("main");
		let outer = Context::frame("outer", global.clone(), entry());
		outer.set("y", Value::Number(Number::Int(1)));
		let inner = Context::frame("inner", outer.clone(), entry());
		assert!(inner.get("y").is_none());
		assert!(std::ptr::eq(inner.root(), &*global));
		assert!(global.get("y").is_none());
	}

	#[test]
	fn symbol_table_operations() {
		let mut table = SymbolTable::new();
		assert!(!table.contains("a"));
		table.set("a", Value::None);
		table.set("a", Value::Number(Number::Int(2)));
		assert_eq!(table.iter().collect::<Vec<_>>(), vec![("a", &Value::Number(Number::Int(2)))]);
		assert!(table.contains("a"));
		assert!(table.get("b").is_none());
	}
}
