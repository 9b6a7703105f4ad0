//! Abstract Syntax Tree definitions

mod expr;
mod span;

pub use expr::*;
pub use span::*;

use serde::{Deserialize, Serialize};

/// A program is a statement sequence executed against the root environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Spanned<Stmt>>,
}

impl Program {
    pub fn new(body: Vec<Spanned<Stmt>>) -> Self {
        Self { body }
    }
}
