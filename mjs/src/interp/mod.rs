//! Tree-walking executor: values, scope chain, statement execution

mod env;
mod error;
mod eval;
mod value;

pub use env::{assign, child_env, root_of, visible_names, BindingKind, EnvRef, Environment, Slot};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::Interpreter;
pub use value::{loose_equals, strict_equals, Function, ObjRef, Value};
