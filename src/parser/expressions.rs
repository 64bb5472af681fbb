//! Expression parsing implementation
//!
//! One method per precedence level, lowest to highest:
//!
//! ```text
//! equality       ::= relational (("==" | "!=") relational)*
//! relational     ::= additive (("<" | "<=" | ">" | ">=") additive)*
//! additive       ::= multiplicative (("+" | "-") multiplicative)*
//! multiplicative ::= unary (("*" | "/" | "%") unary)*
//! unary          ::= "-" unary | primary
//! primary        ::= INT | FLOAT | IDENT | "(" equality ")"
//! ```
//!
//! All binary levels are left-associative. Parentheses are not kept in the
//! tree; grouping is already encoded by its shape.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_equality()
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let base = self.depth;
        let mut left = self.parse_relational()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::EqEq(loc)) {
                BinOp::Eq
            } else if self.match_token(&Token::NotEq(loc)) {
                BinOp::Ne
            } else {
                break;
            };

            // Each operator in a chain deepens the left operand by one
            self.deepen()?;
            let right = Box::new(self.parse_relational()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse relational (< <= > >=)
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let base = self.depth;
        let mut left = self.parse_additive()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Lt(loc)) {
                BinOp::Lt
            } else if self.match_token(&Token::Le(loc)) {
                BinOp::Le
            } else if self.match_token(&Token::Gt(loc)) {
                BinOp::Gt
            } else if self.match_token(&Token::Ge(loc)) {
                BinOp::Ge
            } else {
                break;
            };

            self.deepen()?;
            let right = Box::new(self.parse_additive()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let base = self.depth;
        let mut left = self.parse_multiplicative()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Plus(loc)) {
                BinOp::Add
            } else if self.match_token(&Token::Minus(loc)) {
                BinOp::Sub
            } else {
                break;
            };

            self.deepen()?;
            let right = Box::new(self.parse_multiplicative()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let base = self.depth;
        let mut left = self.parse_unary()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Star(loc)) {
                BinOp::Mul
            } else if self.match_token(&Token::Slash(loc)) {
                BinOp::Div
            } else if self.match_token(&Token::Percent(loc)) {
                BinOp::Mod
            } else {
                break;
            };

            self.deepen()?;
            let right = Box::new(self.parse_unary()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse unary minus
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::Minus(loc)) {
            let operand = Box::new(self.nested(Self::parse_unary)?);
            return Ok(Expr::UnaryOp {
                op: UnOp::Neg,
                operand,
                location: loc,
            });
        }

        self.parse_primary()
    }

    /// Parse primary (literals, variables, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        match self.peek() {
            Token::IntLiteral(n, loc) => {
                let expr = Expr::IntLiteral(*n, *loc);
                self.advance();
                Ok(expr)
            }
            Token::FloatLiteral(x, loc) => {
                let expr = Expr::FloatLiteral(*x, *loc);
                self.advance();
                Ok(expr)
            }
            Token::Ident(name, loc) => {
                let expr = Expr::Variable(name.clone(), *loc);
                self.advance();
                Ok(expr)
            }
            Token::LParen(_) => {
                self.advance();
                self.nested(|p| {
                    let expr = p.parse_expression()?;
                    p.expect_rparen("after expression")?;
                    Ok(expr)
                })
            }
            _ => Err(ParseError {
                message: format!("Expected expression, found {}", self.peek()),
                location: loc,
                lexical: false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn expr(source: &str) -> Expr {
        let mut parser = Parser::new(source).unwrap();
        let e = parser.parse_expression().unwrap();
        assert!(parser.is_at_end(), "trailing tokens in {:?}", source);
        e
    }

    /// Render a tree fully parenthesized so shape is easy to assert on
    fn show(e: &Expr) -> String {
        match e {
            Expr::IntLiteral(n, _) => n.to_string(),
            Expr::FloatLiteral(x, _) => format!("{:?}", x),
            Expr::Variable(name, _) => name.clone(),
            Expr::BinaryOp { op, left, right, .. } => {
                format!("({} {} {})", show(left), op.symbol(), show(right))
            }
            Expr::UnaryOp { operand, .. } => format!("(-{})", show(operand)),
        }
    }

    #[test]
    fn test_multiplicative_binds_tighter() {
        assert_eq!(show(&expr("2 + 3 * 4")), "(2 + (3 * 4))");
        assert_eq!(show(&expr("10 - 6 / 2")), "(10 - (6 / 2))");
        assert_eq!(show(&expr("a % b * c")), "((a % b) * c)");
    }

    #[test]
    fn test_parentheses_reset_precedence() {
        assert_eq!(show(&expr("(2 + 3) * 4")), "((2 + 3) * 4)");
        assert_eq!(show(&expr("((1))")), "1");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(show(&expr("10 - 3 - 2")), "((10 - 3) - 2)");
        assert_eq!(show(&expr("100 / 10 / 5")), "((100 / 10) / 5)");
        assert_eq!(show(&expr("a == b != c")), "((a == b) != c)");
    }

    #[test]
    fn test_comparison_levels() {
        assert_eq!(show(&expr("a + 1 < b * 2")), "((a + 1) < (b * 2))");
        assert_eq!(show(&expr("a < b == c >= d")), "((a < b) == (c >= d))");
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(show(&expr("-a * b")), "((-a) * b)");
        assert_eq!(show(&expr("- -3")), "(-(-3))");
        assert_eq!(show(&expr("2 - -1.5")), "(2 - (-1.5))");
    }

    #[test]
    fn test_missing_operand() {
        let mut parser = Parser::new("1 + ").unwrap();
        let err = parser.parse_expression().unwrap_err();
        assert!(err.message.contains("Expected expression"));
    }

    #[test]
    fn test_unclosed_paren() {
        let mut parser = Parser::new("(1 + 2").unwrap();
        let err = parser.parse_expression().unwrap_err();
        assert!(err.message.contains("Expected ')'"));
    }
}
