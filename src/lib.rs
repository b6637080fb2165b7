//! # Ember
//!
//! User's source code: `var average = (min + max) / 2;`

//! ## Scanning
//!
//! The [`scanner`] takes in the characters and converts them into tokens.
//! Punctuation `(`, `=>`, numbers `123`, `1.5`, string literals `"hi!"` and
//! identifiers `min` are all tokens, whitespace is skipped. So the tokens are
//! `[KEYWORD:var, IDENTIFIER:average, EQUAL, LPAREN, IDENTIFIER:min, PLUS,
//! IDENTIFIER:max, RPAREN, SLASH, INT:2, SEMICOLON, EOF]`.
//!
//! Every lexical error is collected before the scanner gives up.

//! ## Parsing
//!
//! The [`parser`] builds the syntax tree and reports syntax errors, as many
//! as it can find in one pass.
//!
//! ``` markdown
//! average (VarAssign)
//! └── / (BinaryOp)
//!     ├── + (BinaryOp)
//!     │   ├── min (Identifier)
//!     │   └── max (Identifier)
//!     └── 2 (Number)
//! ```

//! ## Evaluation
//!
//! The [`interpreter`] walks the tree in a [`environment::Context`]. A
//! context has a flat symbol table: a function body sees its arguments and
//! the global names, and names that already existed where the function was
//! defined are written back there when the call returns.
//!
//! The first runtime error ends evaluation and carries a traceback of the
//! call frames it passed through.

//! ## Emitting
//!
//! The [`compiler`] turns the arithmetic part of a program into a small
//! stack bytecode.

pub mod ast;
pub mod cli;
pub mod compiler;
mod ember;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod utils;

pub use ember::{Ember, PROGRAM};
pub use error::EmberError;
pub use interpreter::{Evaluator, Settings, output::Output, value::Value};
