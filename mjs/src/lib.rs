//! mjs interpreter core
//!
//! Variable binding and scope resolution for a tiny JS-like scripting
//! language: environment chains, `var` hoisting, implicit globals, and the
//! undefined/null split under loose and strict equality. Lexing and parsing
//! are not part of this crate; the executor consumes a pre-built statement
//! tree (see [`ast`]), which the CLI loads from JSON.

pub mod ast;
pub mod error;
pub mod interp;
pub mod util;

pub use ast::Span;
pub use error::{Result, ScriptError};
