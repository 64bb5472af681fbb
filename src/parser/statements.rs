//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | assignment | print_stmt | if_stmt | while_stmt | block
//! var_decl   ::= ("int" | "float") IDENT ("=" expression)? ";"
//! assignment ::= IDENT "=" expression ";"
//! print_stmt ::= "print" "(" expression ")" ";"
//! if_stmt    ::= "if" "(" expression ")" block ("else" (block | if_stmt))?
//! while_stmt ::= "while" "(" expression ")" block
//! block      ::= "{" statement* "}"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        if self.is_type_keyword() {
            return self.parse_variable_declaration();
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement();
        }

        if self.match_token(&Token::While(loc)) {
            return self.parse_while_statement();
        }

        if self.match_token(&Token::Print(loc)) {
            return self.parse_print_statement();
        }

        if self.check(&Token::LBrace(loc)) {
            return Ok(Stmt::Block(self.parse_block("to open block")?));
        }

        if let Token::Ident(..) = self.peek() {
            return self.parse_assignment();
        }

        Err(self.error_here("Expected statement"))
    }

    /// Parse `{ statement* }`, including both braces
    pub(crate) fn parse_block(&mut self, ctx: &str) -> Result<Block, ParseError> {
        let location = self.current_location();
        self.expect_lbrace(ctx)?;

        let statements = self.nested(|p| {
            let mut statements = Vec::new();
            while !p.check(&Token::RBrace(p.current_location())) && !p.is_at_end() {
                statements.push(p.parse_statement()?);
            }
            Ok(statements)
        })?;

        self.expect_rbrace("to close block")?;
        Ok(Block {
            statements,
            location,
        })
    }

    /// Parse `int x;`, `float y = 1.5;`
    fn parse_variable_declaration(&mut self) -> Result<Stmt, ParseError> {
        let location = self.current_location();
        let var_type = match self.advance() {
            Token::Float(_) => TypeKind::Float,
            _ => TypeKind::Int,
        };

        let name = self.expect_identifier()?;

        let init = if self.match_token(&Token::Eq(self.current_location())) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.expect_semicolon("after declaration")?;

        Ok(Stmt::VarDecl {
            name,
            var_type,
            init,
            location,
        })
    }

    /// Parse `name = expression;`
    fn parse_assignment(&mut self) -> Result<Stmt, ParseError> {
        let location = self.current_location();
        let name = self.expect_identifier()?;

        self.expect_token(
            &Token::Eq(self.current_location()),
            &format!("Expected '=' after '{}'", name),
        )?;
        let value = self.parse_expression()?;
        self.expect_semicolon("after assignment")?;

        Ok(Stmt::Assignment {
            name,
            value,
            location,
        })
    }

    /// Parse `print(expression);`
    fn parse_print_statement(&mut self) -> Result<Stmt, ParseError> {
        let location = self.previous_location();

        self.expect_lparen("after 'print'")?;
        let expr = self.parse_expression()?;
        self.expect_rparen("after print argument")?;
        self.expect_semicolon("after print statement")?;

        Ok(Stmt::Print { expr, location })
    }

    /// Parse if statement; `else if` nests another if inside the else branch
    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        let location = self.previous_location();

        let condition = self.parse_condition("if")?;
        let then_block = self.parse_block("after if condition")?;

        let else_branch = if self.match_token(&Token::Else(self.current_location())) {
            if self.match_token(&Token::If(self.current_location())) {
                Some(Box::new(self.nested(Self::parse_if_statement)?))
            } else {
                Some(Box::new(Stmt::Block(self.parse_block("after 'else'")?)))
            }
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_block,
            else_branch,
            location,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let location = self.previous_location();

        let condition = self.parse_condition("while")?;
        let body = self.parse_block("after while condition")?;

        Ok(Stmt::While {
            condition,
            body,
            location,
        })
    }

    /// Parse `( expression )` after `if` / `while`; an empty condition is rejected
    fn parse_condition(&mut self, keyword: &str) -> Result<Expr, ParseError> {
        self.expect_lparen(&format!("after '{}'", keyword))?;
        if self.check(&Token::RParen(self.current_location())) {
            return Err(self.error_here(&format!("Empty condition in '{}'", keyword)));
        }
        let condition = self.parse_expression()?;
        self.expect_rparen(&format!("after {} condition", keyword))?;
        Ok(condition)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse_source;

    #[test]
    fn test_parse_declaration_with_initializer() {
        let program = parse_source("float f = 1.5 * 2;").unwrap();

        match &program.statements[0] {
            Stmt::VarDecl {
                name,
                var_type,
                init: Some(Expr::BinaryOp { op: BinOp::Mul, .. }),
                ..
            } => {
                assert_eq!(name, "f");
                assert_eq!(*var_type, TypeKind::Float);
            }
            other => panic!("Expected float declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_if_else_chain() {
        let source = "if (x >= 90) { print(1); } else if (x >= 80) { print(2); } else { print(3); }";
        let program = parse_source(source).unwrap();

        let Stmt::If { else_branch: Some(else_branch), .. } = &program.statements[0] else {
            panic!("Expected if with else");
        };
        let Stmt::If { else_branch: Some(inner_else), .. } = else_branch.as_ref() else {
            panic!("Expected nested if in else branch");
        };
        assert!(matches!(inner_else.as_ref(), Stmt::Block(block) if block.statements.len() == 1));
    }

    #[test]
    fn test_parse_while_with_nested_block() {
        let program = parse_source("while (i < 3) { int sq; { sq = i * i; } i = i + 1; }").unwrap();

        match &program.statements[0] {
            Stmt::While { body, .. } => {
                assert_eq!(body.statements.len(), 3);
                assert!(matches!(body.statements[1], Stmt::Block(_)));
            }
            other => panic!("Expected while loop, got {:?}", other),
        }
    }

    #[test]
    fn test_statement_locations() {
        let program = parse_source("int a;\n\na = 2;\nprint(a);").unwrap();

        assert_eq!(program.statements[0].location().line, 1);
        assert_eq!(program.statements[1].location().line, 3);
        assert_eq!(program.statements[2].location().line, 4);
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_source("int x\nx = 1;").unwrap_err();
        assert!(err.message.contains("Expected ';' after declaration"));
        assert_eq!(err.location.line, 2);
    }

    #[test]
    fn test_type_keyword_is_not_an_identifier() {
        assert!(parse_source("int int;").is_err());
        assert!(parse_source("float while;").is_err());
        assert!(parse_source("int x; int = 3;").is_err());
    }

    #[test]
    fn test_unmatched_braces_and_parens() {
        assert!(parse_source("{ int x;").is_err());
        assert!(parse_source("print((1 + 2);").is_err());
        assert!(parse_source("if (x < 1 { print(1); }").is_err());
    }

    #[test]
    fn test_empty_condition_rejected() {
        let err = parse_source("while () { }").unwrap_err();
        assert!(err.message.contains("Empty condition"));
        assert!(parse_source("if () { }").is_err());
    }

    #[test]
    fn test_if_requires_block() {
        assert!(parse_source("if (x < 1) print(1);").is_err());
    }

    #[test]
    fn test_bare_expression_is_not_a_statement() {
        assert!(parse_source("1 + 2;").is_err());
        assert!(parse_source("x;").is_err());
    }
}
