//! Parser and tree-walking interpreter for LetLang, a teaching language with
//! integers, `minus`, `iszero`, `if` and `let`.

pub mod ast;
pub mod environment;
pub mod interpreter;
pub mod parser;
pub mod tokeniser;

pub use ast::Expression;
pub use environment::Environment;
pub use interpreter::{EvaluationError, evaluate, interpret};
pub use parser::{Parser, SyntaxError, parse};
pub use tokeniser::{Token, TokenKind, tokenise};
