//! Expression trees for command lines.
//!
//! Trees are walked with explicit stacks wherever their depth follows the
//! input: a line with thousands of `&&` statements is one long chain of
//! [`Expr::Sequence`] nodes.

use std::fmt;
use std::mem;
use std::rc::Rc;

use super::error::SyntaxError;
use super::token::Identifier;

/// One parsed command line, or any sub-expression of it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Malformed input, kept in the tree so the rest of the line survives.
    Error(SyntaxError),
    /// `left && right`. Right-leaning: `right` holds the rest of the chain.
    Sequence(Box<Expr>, Box<Expr>),
    /// The bound value is shared with the environment once the binding runs.
    Let(Identifier, Rc<Expr>),
    Ident(Identifier),
    Int(i64),
    Help,
    Echo(Identifier),
    Landmark,
    Rotate(Box<Expr>),
    Move(Box<Expr>),
    Buy(Identifier, Box<Expr>),
    Sell(Identifier, Box<Expr>),
    Inventory,
    MarketPrices,
    CityPrices,
    Quit,
    Stop,
}

impl Expr {
    pub fn error(message: impl Into<String>, col: usize) -> Self {
        Expr::Error(SyntaxError::new(message, col))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Expr::Error(_))
    }

    fn has_children(&self) -> bool {
        matches!(
            self,
            Expr::Sequence(..)
                | Expr::Let(..)
                | Expr::Rotate(_)
                | Expr::Move(_)
                | Expr::Buy(..)
                | Expr::Sell(..)
        )
    }

    /// Move every non-leaf child onto `stack`, leaving leaves in its place.
    fn detach_children(&mut self, stack: &mut Vec<Box<Expr>>) {
        fn detach(slot: &mut Box<Expr>, stack: &mut Vec<Box<Expr>>) {
            if slot.has_children() {
                stack.push(mem::replace(slot, Box::new(Expr::Quit)));
            }
        }

        match self {
            Expr::Sequence(left, right) => {
                detach(left, stack);
                detach(right, stack);
            }
            Expr::Rotate(child)
            | Expr::Move(child)
            | Expr::Buy(_, child)
            | Expr::Sell(_, child) => detach(child, stack),
            // A shared value is dropped by its last owner.
            Expr::Let(_, value) => {
                if let Some(value) = Rc::get_mut(value) {
                    value.detach_children(stack);
                }
            }
            _ => {}
        }
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.detach_children(&mut stack);
        while let Some(mut node) = stack.pop() {
            // `node` is dropped with only leaf children left.
            node.detach_children(&mut stack);
        }
    }
}

enum Piece<'a> {
    Node(&'a Expr),
    Text(&'static str),
}

/// The canonical textual form shown by `echo`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Piece::Node(self)];

        while let Some(piece) = stack.pop() {
            let node = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Node(node) => node,
            };

            match node {
                Expr::Error(err) => write!(f, "(Error: {err})")?,
                Expr::Sequence(left, right) => {
                    f.write_str("(Continue ")?;
                    stack.push(Piece::Text(")"));
                    stack.push(Piece::Node(right));
                    stack.push(Piece::Text(" "));
                    stack.push(Piece::Node(left));
                }
                Expr::Let(name, value) => {
                    write!(f, "(Let {name} ")?;
                    stack.push(Piece::Text(")"));
                    stack.push(Piece::Node(value));
                }
                Expr::Rotate(angle) => {
                    f.write_str("(Rotate ")?;
                    stack.push(Piece::Text(")"));
                    stack.push(Piece::Node(angle));
                }
                Expr::Move(distance) => {
                    f.write_str("(Move ")?;
                    stack.push(Piece::Text(")"));
                    stack.push(Piece::Node(distance));
                }
                Expr::Buy(name, count) => {
                    write!(f, "(Buy {name} ")?;
                    stack.push(Piece::Text(")"));
                    stack.push(Piece::Node(count));
                }
                Expr::Sell(name, count) => {
                    write!(f, "(Sell {name} ")?;
                    stack.push(Piece::Text(")"));
                    stack.push(Piece::Node(count));
                }
                Expr::Ident(name) => write!(f, "{name}")?,
                Expr::Int(n) => write!(f, "{n}")?,
                Expr::Help => f.write_str("Help")?,
                Expr::Echo(name) => write!(f, "(Echo {name})")?,
                Expr::Landmark => f.write_str("Landmark")?,
                Expr::Inventory => f.write_str("Inventory")?,
                Expr::MarketPrices => f.write_str("MarketPrices")?,
                Expr::CityPrices => f.write_str("CityPrices")?,
                Expr::Quit => f.write_str("Quit")?,
                Expr::Stop => f.write_str("Stop")?,
            }
        }

        Ok(())
    }
}
