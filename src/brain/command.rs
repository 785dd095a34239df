//! Command descriptors: one statement of a line, sequencing removed.

use std::rc::Rc;

use crate::lang::{Expr, Identifier, SyntaxError};

/// A single statement ready for dispatch.
///
/// Descriptors borrow from the expression tree they were translated from.
/// Sub-expressions stay unevaluated until the brain dispatches them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command<'a> {
    SyntaxError(&'a SyntaxError),
    /// A well-formed expression with no meaning as a statement.
    Unrecognized(&'a Expr),
    Quit,
    Stop,
    Let(&'a Identifier, &'a Rc<Expr>),
    Eval(&'a Identifier),
    Help,
    Echo(&'a Identifier),
    Rotate(&'a Expr),
    Move(&'a Expr),
    Buy(&'a Identifier, &'a Expr),
    Sell(&'a Identifier, &'a Expr),
    Inventory,
    MarketPrices,
    CityPrices,
}

impl Command<'_> {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SyntaxError(_) => "syntax-error",
            Command::Unrecognized(_) => "unrecognized",
            Command::Quit => "quit",
            Command::Stop => "stop",
            Command::Let(..) => "let",
            Command::Eval(_) => "eval",
            Command::Help => "help",
            Command::Echo(_) => "echo",
            Command::Rotate(_) => "rotate",
            Command::Move(_) => "move",
            Command::Buy(..) => "buy",
            Command::Sell(..) => "sell",
            Command::Inventory => "inventory",
            Command::MarketPrices => "marketprices",
            Command::CityPrices => "cityprices",
        }
    }
}
