//! Token types for the command lexer.

use std::borrow::Borrow;
use std::fmt;

/// A variable or commodity name.
///
/// Starts with a letter, followed by letters and digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Validate and wrap a user-supplied name.
    pub fn parse(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let first = chars.next()?;
        if first.is_alphabetic() && chars.all(char::is_alphanumeric) {
            Some(Self(name.to_string()))
        } else {
            None
        }
    }

    /// Wrap text the lexer has already checked.
    pub(crate) fn from_lexeme(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub col: usize,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(Keyword),
    Symbol(Symbol),
    Integer(i64),
    Ident(Identifier),
    /// A character the lexer does not recognize. The parser decides whether
    /// it is an error.
    Literal(char),
    Eol,
}

impl TokenKind {
    pub fn is_symbol(&self, sym: Symbol) -> bool {
        matches!(self, TokenKind::Symbol(s) if *s == sym)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => f.write_str(kw.as_str()),
            TokenKind::Symbol(sym) => f.write_str(sym.as_str()),
            TokenKind::Integer(n) => write!(f, "{n}"),
            TokenKind::Ident(id) => write!(f, "{id}"),
            TokenKind::Literal(ch) => write!(f, "{ch}"),
            TokenKind::Eol => f.write_str("end of line"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Quit,
    Stop,
    Help,
    Let,
    Echo,
    Landmark,
    // Movement
    Rotate,
    Move,
    // Trade
    Buy,
    Sell,
    Inventory,
    MarketPrices,
    CityPrices,
}

impl Keyword {
    /// Exact, case-sensitive keyword lookup.
    pub fn lookup(text: &str) -> Option<Self> {
        let kw = match text {
            "quit" => Keyword::Quit,
            "stop" => Keyword::Stop,
            "help" => Keyword::Help,
            "let" => Keyword::Let,
            "echo" => Keyword::Echo,
            "landmark" => Keyword::Landmark,
            "rotate" => Keyword::Rotate,
            "move" => Keyword::Move,
            "buy" => Keyword::Buy,
            "sell" => Keyword::Sell,
            "inventory" => Keyword::Inventory,
            "marketprices" => Keyword::MarketPrices,
            "cityprices" => Keyword::CityPrices,
            _ => return None,
        };
        Some(kw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Quit => "quit",
            Keyword::Stop => "stop",
            Keyword::Help => "help",
            Keyword::Let => "let",
            Keyword::Echo => "echo",
            Keyword::Landmark => "landmark",
            Keyword::Rotate => "rotate",
            Keyword::Move => "move",
            Keyword::Buy => "buy",
            Keyword::Sell => "sell",
            Keyword::Inventory => "inventory",
            Keyword::MarketPrices => "marketprices",
            Keyword::CityPrices => "cityprices",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Eq,     // =
    AndAnd, // &&
    LParen,
    RParen,
}

impl Symbol {
    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::Eq => "=",
            Symbol::AndAnd => "&&",
            Symbol::LParen => "(",
            Symbol::RParen => ")",
        }
    }
}
