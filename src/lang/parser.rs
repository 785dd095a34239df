//! Recursive-descent parser for command lines.
//!
//! Parsing never fails outright. Malformed input becomes an
//! [`Expr::Error`] node that replaces only the statement it occurred in;
//! the parser resynchronises on the next `&&`, so the rest of a chain is
//! still parsed.

use std::rc::Rc;

use super::ast::Expr;
use super::error::SyntaxError;
use super::lexer::Lexer;
use super::token::{Identifier, Keyword, Symbol, Token, TokenKind};

/// Deepest nesting of sub-expressions (groups, `let` values, arguments)
/// the parser descends into.
pub const MAX_NESTING: usize = 128;

pub struct Parser {
    lexer: Lexer,
    current: Result<Token, SyntaxError>,
    /// Number of currently open parentheses.
    depth: usize,
    /// Number of `expression1` rules currently being parsed.
    nesting: usize,
}

impl Parser {
    pub fn new(line: &str) -> Self {
        let mut lexer = Lexer::new(line);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            depth: 0,
            nesting: 0,
        }
    }

    /// Parse one line. Returns `None` for a blank line.
    pub fn parse_line(&mut self) -> Option<Expr> {
        if self.at_eol() {
            return None;
        }
        Some(self.parse_expression())
    }

    /// `statement ( '&&' statement )*`, folded into right-leaning sequence
    /// nodes.
    fn parse_expression(&mut self) -> Expr {
        let first = self.parse_statement();

        let mut rest = Vec::new();
        while self.check_symbol(Symbol::AndAnd) {
            self.advance();
            rest.push(self.parse_statement());
        }

        match rest
            .into_iter()
            .rev()
            .reduce(|chain, expr| Expr::Sequence(Box::new(expr), Box::new(chain)))
        {
            Some(chain) => Expr::Sequence(Box::new(first), Box::new(chain)),
            None => first,
        }
    }

    /// One `expression1` that must be followed by `&&`, the end of the
    /// line, or the close of the enclosing group. Anything else turns the
    /// whole statement into an error.
    fn parse_statement(&mut self) -> Expr {
        let expr = self.parse_expression1();
        if self.at_statement_end() {
            return expr;
        }

        let err = match &self.current {
            Ok(tok) => SyntaxError::new(format!("unexpected '{}'", tok.kind), tok.col),
            Err(err) => err.clone(),
        };
        self.fail(err)
    }

    fn parse_expression1(&mut self) -> Expr {
        if self.nesting >= MAX_NESTING {
            let err = SyntaxError::new("expression nested too deeply", self.col());
            return self.fail(err);
        }

        self.nesting += 1;
        let expr = self.parse_primary();
        self.nesting -= 1;
        expr
    }

    fn parse_primary(&mut self) -> Expr {
        let tok = match &self.current {
            Ok(tok) => tok.clone(),
            Err(err) => {
                let err = err.clone();
                self.advance();
                return self.fail(err);
            }
        };

        match tok.kind {
            TokenKind::Keyword(kw) => {
                self.advance();
                self.parse_keyword(kw)
            }
            TokenKind::Ident(name) => {
                self.advance();
                Expr::Ident(name)
            }
            TokenKind::Integer(n) => {
                self.advance();
                Expr::Int(n)
            }
            TokenKind::Symbol(Symbol::LParen) => {
                self.advance();
                self.parse_group()
            }
            // Leave a group's closing paren and the line end for the caller.
            TokenKind::Symbol(Symbol::RParen) if self.depth > 0 => {
                self.fail(SyntaxError::new("expected keyword or identifier", tok.col))
            }
            TokenKind::Eol => {
                self.fail(SyntaxError::new("expected keyword or identifier", tok.col))
            }
            TokenKind::Symbol(_) | TokenKind::Literal(_) => {
                self.advance();
                self.fail(SyntaxError::new("expected keyword or identifier", tok.col))
            }
        }
    }

    fn parse_keyword(&mut self, kw: Keyword) -> Expr {
        match kw {
            Keyword::Quit => Expr::Quit,
            Keyword::Stop => Expr::Stop,
            Keyword::Help => Expr::Help,
            Keyword::Landmark => Expr::Landmark,
            Keyword::Inventory => Expr::Inventory,
            Keyword::MarketPrices => Expr::MarketPrices,
            Keyword::CityPrices => Expr::CityPrices,
            Keyword::Let => self.parse_let(),
            Keyword::Echo => match self.expect_ident() {
                Ok(name) => Expr::Echo(name),
                Err(err) => self.fail(err),
            },
            Keyword::Rotate => self.parse_argument(|angle| Expr::Rotate(Box::new(angle))),
            Keyword::Move => self.parse_argument(|distance| Expr::Move(Box::new(distance))),
            Keyword::Buy => self.parse_trade(Expr::Buy),
            Keyword::Sell => self.parse_trade(Expr::Sell),
        }
    }

    /// `'let' IDENT '=' expression1`
    fn parse_let(&mut self) -> Expr {
        let name = match self.expect_ident() {
            Ok(name) => name,
            Err(err) => return self.fail(err),
        };
        if !self.check_symbol(Symbol::Eq) {
            let err = SyntaxError::new("expected '='", self.col());
            return self.fail(err);
        }
        self.advance();

        let value = self.parse_expression1();
        if value.is_error() {
            return value;
        }
        Expr::Let(name, Rc::new(value))
    }

    /// Argument of `rotate` / `move`: must start like a name, a literal, or
    /// a parenthesised expression.
    fn parse_argument(&mut self, build: impl FnOnce(Expr) -> Expr) -> Expr {
        let plausible = match &self.current {
            Ok(tok) => matches!(
                tok.kind,
                TokenKind::Ident(_) | TokenKind::Integer(_) | TokenKind::Symbol(Symbol::LParen)
            ),
            // An integer that failed to lex; let expression1 report it.
            Err(_) => true,
        };
        if !plausible {
            let err = SyntaxError::new("expected variable name or literal", self.col());
            return self.fail(err);
        }

        let arg = self.parse_expression1();
        if arg.is_error() {
            return arg;
        }
        build(arg)
    }

    /// `IDENT expression1` after `buy` / `sell`.
    fn parse_trade(&mut self, build: fn(Identifier, Box<Expr>) -> Expr) -> Expr {
        let commodity = match self.expect_ident() {
            Ok(name) => name,
            Err(err) => return self.fail(err),
        };
        let count = self.parse_expression1();
        if count.is_error() {
            return count;
        }
        build(commodity, Box::new(count))
    }

    /// `'(' expression ')'`, with the open paren already consumed.
    fn parse_group(&mut self) -> Expr {
        self.depth += 1;
        let inner = self.parse_expression();
        self.depth -= 1;

        if self.check_symbol(Symbol::RParen) {
            self.advance();
            inner
        } else if inner.is_error() {
            // Already reported; recovery ran to the end of the line.
            inner
        } else {
            // Nothing past the failed close is consumed.
            Expr::error("expected ')'", self.col())
        }
    }

    // --- Error recovery ---

    fn fail(&mut self, err: SyntaxError) -> Expr {
        self.synchronize();
        Expr::Error(err)
    }

    /// Skip to the next `&&`, the closing paren of the enclosing group, or
    /// the end of the line. Parentheses opened while skipping are balanced.
    fn synchronize(&mut self) {
        let mut nested = 0usize;
        loop {
            match self.current.as_ref().map(|t| &t.kind) {
                Ok(TokenKind::Eol) => return,
                Ok(TokenKind::Symbol(Symbol::AndAnd)) if nested == 0 => return,
                Ok(TokenKind::Symbol(Symbol::RParen)) if nested > 0 => nested -= 1,
                Ok(TokenKind::Symbol(Symbol::RParen)) if self.depth > 0 => return,
                Ok(TokenKind::Symbol(Symbol::LParen)) => nested += 1,
                _ => {}
            }
            self.advance();
        }
    }

    // --- Utility methods ---

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn col(&self) -> usize {
        match &self.current {
            Ok(tok) => tok.col,
            Err(err) => err.col,
        }
    }

    fn at_eol(&self) -> bool {
        matches!(&self.current, Ok(tok) if tok.kind == TokenKind::Eol)
    }

    fn at_statement_end(&self) -> bool {
        match &self.current {
            Ok(tok) => match tok.kind {
                TokenKind::Eol | TokenKind::Symbol(Symbol::AndAnd) => true,
                TokenKind::Symbol(Symbol::RParen) => self.depth > 0,
                _ => false,
            },
            Err(_) => false,
        }
    }

    fn check_symbol(&self, sym: Symbol) -> bool {
        matches!(&self.current, Ok(tok) if tok.kind.is_symbol(sym))
    }

    fn expect_ident(&mut self) -> Result<Identifier, SyntaxError> {
        match &self.current {
            Ok(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(SyntaxError::new("expected identifier", self.col())),
        }
    }
}

/// Parse a single command line.
pub fn parse_line(line: &str) -> Option<Expr> {
    Parser::new(line).parse_line()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Expr {
        parse_line(src).expect("non-blank line")
    }

    fn id(name: &str) -> Identifier {
        Identifier::parse(name).unwrap()
    }

    fn error_message(expr: &Expr) -> &str {
        match expr {
            Expr::Error(err) => &err.message,
            other => panic!("expected error node, got {other:?}"),
        }
    }

    #[test]
    fn blank_line_is_none() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   \n"), None);
    }

    #[test]
    fn parse_simple_keywords() {
        assert_eq!(parse("quit"), Expr::Quit);
        assert_eq!(parse("stop\n"), Expr::Stop);
        assert_eq!(parse("help"), Expr::Help);
        assert_eq!(parse("landmark"), Expr::Landmark);
        assert_eq!(parse("inventory"), Expr::Inventory);
        assert_eq!(parse("marketprices"), Expr::MarketPrices);
        assert_eq!(parse("cityprices"), Expr::CityPrices);
    }

    #[test]
    fn parse_move_and_rotate() {
        assert_eq!(parse("move 5"), Expr::Move(Box::new(Expr::Int(5))));
        assert_eq!(parse("rotate -90"), Expr::Rotate(Box::new(Expr::Int(-90))));
        assert_eq!(parse("move d"), Expr::Move(Box::new(Expr::Ident(id("d")))));
    }

    #[test]
    fn parse_let() {
        assert_eq!(parse("let x = 5"), Expr::Let(id("x"), Rc::new(Expr::Int(5))));
        assert_eq!(
            parse("let m = move 3"),
            Expr::Let(id("m"), Rc::new(Expr::Move(Box::new(Expr::Int(3)))))
        );
    }

    #[test]
    fn let_binds_a_primary_not_a_chain() {
        let expr = parse("let x = 1 && move x");
        assert_eq!(
            expr,
            Expr::Sequence(
                Box::new(Expr::Let(id("x"), Rc::new(Expr::Int(1)))),
                Box::new(Expr::Move(Box::new(Expr::Ident(id("x")))))
            )
        );
    }

    #[test]
    fn let_can_bind_a_parenthesised_chain() {
        let expr = parse("let both = (move 1 && rotate 2)");
        assert_eq!(expr.to_string(), "(Let both (Continue (Move 1) (Rotate 2)))");
    }

    #[test]
    fn parse_trade() {
        assert_eq!(parse("buy wheat 3"), Expr::Buy(id("wheat"), Box::new(Expr::Int(3))));
        assert_eq!(parse("sell ore n"), Expr::Sell(id("ore"), Box::new(Expr::Ident(id("n")))));
    }

    #[test]
    fn parse_echo() {
        assert_eq!(parse("echo x"), Expr::Echo(id("x")));
    }

    #[test]
    fn echo_consumes_its_identifier() {
        let expr = parse("echo x && move 1");
        assert_eq!(expr.to_string(), "(Continue (Echo x) (Move 1))");
    }

    #[test]
    fn chain_is_right_leaning() {
        let expr = parse("move 1 && move 2 && move 3");
        assert_eq!(expr.to_string(), "(Continue (Move 1) (Continue (Move 2) (Move 3)))");
    }

    #[test]
    fn parens_are_transparent() {
        assert_eq!(parse("(move 5)"), parse("move 5"));
        assert_eq!(parse("move (5)"), parse("move 5"));
        assert_eq!(parse("((stop))"), Expr::Stop);
    }

    #[test]
    fn missing_close_paren() {
        assert_eq!(error_message(&parse("(move 5")), "expected ')'");
    }

    #[test]
    fn missing_close_paren_reports_once() {
        assert_eq!(error_message(&parse("(move 5 && move")), "expected ')'");
        assert_eq!(error_message(&parse("(let = 5")), "expected identifier");
    }

    #[test]
    fn missing_separator_inside_group() {
        let expr = parse("(move 5 move 6) && stop");
        assert_eq!(expr.to_string(), "(Continue (Error: unexpected 'move') Stop)");
    }

    #[test]
    fn let_without_identifier() {
        assert_eq!(error_message(&parse("let = 5")), "expected identifier");
    }

    #[test]
    fn let_without_equals() {
        assert_eq!(error_message(&parse("let x 5")), "expected '='");
    }

    #[test]
    fn move_needs_name_or_literal() {
        let expr = parse("move quit");
        assert_eq!(error_message(&expr), "expected variable name or literal");
    }

    #[test]
    fn buy_needs_commodity_name() {
        assert_eq!(error_message(&parse("buy 3 4")), "expected identifier");
    }

    #[test]
    fn unexpected_leading_token() {
        assert_eq!(error_message(&parse("= 4")), "expected keyword or identifier");
        assert_eq!(error_message(&parse("@")), "expected keyword or identifier");
    }

    #[test]
    fn error_on_left_keeps_right_of_chain() {
        let expr = parse("let = 5 && move 5");
        match &expr {
            Expr::Sequence(left, right) => {
                assert_eq!(error_message(left), "expected identifier");
                assert_eq!(**right, Expr::Move(Box::new(Expr::Int(5))));
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn error_inside_group_recovers_at_close() {
        let expr = parse("(let = 5) && stop");
        match &expr {
            Expr::Sequence(left, right) => {
                assert_eq!(error_message(left), "expected identifier");
                assert_eq!(**right, Expr::Stop);
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn recovery_skips_nested_groups() {
        let expr = parse("move = (1 && 2) && stop");
        match &expr {
            Expr::Sequence(left, right) => {
                assert_eq!(error_message(left), "expected variable name or literal");
                assert_eq!(**right, Expr::Stop);
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn lone_ampersand_rejects_the_statement() {
        assert_eq!(error_message(&parse("move 5 & move 6")), "unexpected '&'");
    }

    #[test]
    fn stray_close_paren_rejects_the_statement() {
        assert_eq!(error_message(&parse("stop )")), "unexpected ')'");
    }

    #[test]
    fn extra_argument_rejects_only_its_statement() {
        let expr = parse("move 5 6 && move 7");
        assert_eq!(expr.to_string(), "(Continue (Error: unexpected '6') (Move 7))");
    }

    #[test]
    fn extra_argument_in_the_middle_of_a_chain() {
        let expr = parse("stop && rotate 1 x && move 2");
        assert_eq!(
            expr.to_string(),
            "(Continue Stop (Continue (Error: unexpected 'x') (Move 2)))"
        );
    }

    #[test]
    fn out_of_range_literal_after_a_statement() {
        let expr = parse("move 5 99999999999999999999 && stop");
        assert_eq!(
            expr.to_string(),
            "(Continue (Error: integer literal out of range) Stop)"
        );
    }

    #[test]
    fn integer_overflow_is_a_syntax_error() {
        let expr = parse("move 99999999999999999999 && stop");
        match &expr {
            Expr::Sequence(left, right) => {
                assert_eq!(error_message(left), "integer literal out of range");
                assert_eq!(**right, Expr::Stop);
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn error_columns_point_at_the_token() {
        match &parse("let x 5") {
            Expr::Error(err) => assert_eq!(err.col, 7),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn long_chains_do_not_recurse_in_the_parser() {
        let line = vec!["move 1"; 2000].join(" && ");
        let expr = parse(&line);
        assert!(matches!(expr, Expr::Sequence(_, _)));
    }

    #[test]
    fn deep_parentheses_are_rejected() {
        let line = format!("{}stop", "(".repeat(5000));
        assert_eq!(error_message(&parse(&line)), "expression nested too deeply");
    }

    #[test]
    fn deep_parentheses_recover_at_the_next_statement() {
        let line = format!("{}stop{} && move 1", "(".repeat(500), ")".repeat(500));
        let expr = parse(&line);
        assert_eq!(
            expr.to_string(),
            "(Continue (Error: expression nested too deeply) (Move 1))"
        );
    }

    #[test]
    fn deep_let_chain_is_rejected() {
        let line = format!("{}5", "let a = ".repeat(1000));
        assert_eq!(error_message(&parse(&line)), "expression nested too deeply");
    }

    #[test]
    fn nesting_within_the_limit_parses() {
        let depth = MAX_NESTING - 1;
        let line = format!("{}stop{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse(&line), Expr::Stop);
    }
}
