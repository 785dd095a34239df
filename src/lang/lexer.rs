//! Lexer for command lines.
//!
//! Produces [`Token`]s on demand. The end of the input behaves like a line
//! terminator, so every line ends in [`TokenKind::Eol`] whether or not the
//! caller appended `\n`.

use super::error::SyntaxError;
use super::token::{Identifier, Keyword, Symbol, Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    /// Produce the next token and advance the cursor.
    ///
    /// Only an out-of-range integer literal is an error; the cursor has
    /// already moved past its digits, so lexing can resume afterwards.
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();

        let col = self.col();
        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eol,
                col,
            });
        };

        let kind = match ch {
            // The cursor stays put so Eol repeats.
            '\r' | '\n' => TokenKind::Eol,
            '=' => self.single_char(TokenKind::Symbol(Symbol::Eq)),
            '(' => self.single_char(TokenKind::Symbol(Symbol::LParen)),
            ')' => self.single_char(TokenKind::Symbol(Symbol::RParen)),
            '&' if self.peek_next() == Some('&') => {
                self.pos += 2;
                TokenKind::Symbol(Symbol::AndAnd)
            }
            '-' if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => {
                self.lex_integer(col)?
            }
            c if c.is_ascii_digit() => self.lex_integer(col)?,
            c if c.is_alphabetic() => self.lex_ident_or_keyword(),
            c => self.single_char(TokenKind::Literal(c)),
        };

        Ok(Token { kind, col })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn col(&self) -> usize {
        self.pos + 1
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.pos += 1;
        }
    }

    fn single_char(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn lex_integer(&mut self, col: usize) -> Result<TokenKind, SyntaxError> {
        let negative = self.peek() == Some('-');
        if negative {
            self.pos += 1;
        }

        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits: String = self.chars[start..self.pos].iter().collect();

        // Parse with the sign attached so i64::MIN is representable.
        let text = if negative {
            format!("-{digits}")
        } else {
            digits
        };
        text.parse::<i64>()
            .map(TokenKind::Integer)
            .map_err(|_| SyntaxError::new("integer literal out of range", col))
    }

    fn lex_ident_or_keyword(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(char::is_alphanumeric) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();

        match Keyword::lookup(&text) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident(Identifier::from_lexeme(text)),
        }
    }
}
