//! Command language front end: raw line → tokens → expression tree.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::Expr;
pub use error::SyntaxError;
pub use parser::parse_line;
pub use token::Identifier;
