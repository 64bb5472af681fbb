//! Lexer (tokenizer) for mini C source code
//!
//! Converts raw source text into [`Token`]s consumed by the parser. The lexer
//! is lazy: it implements [`Iterator`] and produces one token per call, ending
//! with a single [`Token::Eof`]. [`Lexer::reset`] rewinds it to the start of
//! the input so the same source can be scanned again.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(i64, SourceLocation),
    FloatLiteral(f64, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Keywords
    Int(SourceLocation),
    Float(SourceLocation),
    If(SourceLocation),
    Else(SourceLocation),
    While(SourceLocation),
    Print(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),    // +
    Minus(SourceLocation),   // -
    Star(SourceLocation),    // *
    Slash(SourceLocation),   // /
    Percent(SourceLocation), // %

    // Comparison
    EqEq(SourceLocation),  // ==
    NotEq(SourceLocation), // !=
    Lt(SourceLocation),    // <
    Le(SourceLocation),    // <=
    Gt(SourceLocation),    // >
    Ge(SourceLocation),    // >=

    // Assignment
    Eq(SourceLocation), // =

    // Punctuation
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    LBrace(SourceLocation),    // {
    RBrace(SourceLocation),    // }
    Semicolon(SourceLocation), // ;
    Comma(SourceLocation),     // ,

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, loc)
            | Token::FloatLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::Int(loc)
            | Token::Float(loc)
            | Token::If(loc)
            | Token::Else(loc)
            | Token::While(loc)
            | Token::Print(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::Percent(loc)
            | Token::EqEq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::Eq(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::Semicolon(loc)
            | Token::Comma(loc)
            | Token::Eof(loc) => *loc,
        }
    }

    /// Upper-case kind name used by the token dump
    pub fn kind(&self) -> &'static str {
        match self {
            Token::IntLiteral(..) => "INTEGER",
            Token::FloatLiteral(..) => "DECIMAL",
            Token::Ident(..) => "IDENTIFIER",
            Token::Int(_) => "INT",
            Token::Float(_) => "FLOAT",
            Token::If(_) => "IF",
            Token::Else(_) => "ELSE",
            Token::While(_) => "WHILE",
            Token::Print(_) => "PRINT",
            Token::Plus(_) => "PLUS",
            Token::Minus(_) => "MINUS",
            Token::Star(_) => "MULTIPLY",
            Token::Slash(_) => "DIVIDE",
            Token::Percent(_) => "MOD",
            Token::EqEq(_) => "EQUAL_TO",
            Token::NotEq(_) => "NOT_EQUAL",
            Token::Lt(_) => "LESS",
            Token::Le(_) => "LESS_EQ",
            Token::Gt(_) => "GREATER",
            Token::Ge(_) => "GREATER_EQ",
            Token::Eq(_) => "EQUALS",
            Token::LParen(_) => "LPAREN",
            Token::RParen(_) => "RPAREN",
            Token::LBrace(_) => "LBRACE",
            Token::RBrace(_) => "RBRACE",
            Token::Semicolon(_) => "SEMICOLON",
            Token::Comma(_) => "COMMA",
            Token::Eof(_) => "EOF",
        }
    }

    /// Source text of the token (empty for end of file)
    pub fn lexeme(&self) -> String {
        match self {
            Token::IntLiteral(n, _) => n.to_string(),
            Token::FloatLiteral(x, _) => format!("{:?}", x),
            Token::Ident(s, _) => s.clone(),
            Token::Int(_) => "int".into(),
            Token::Float(_) => "float".into(),
            Token::If(_) => "if".into(),
            Token::Else(_) => "else".into(),
            Token::While(_) => "while".into(),
            Token::Print(_) => "print".into(),
            Token::Plus(_) => "+".into(),
            Token::Minus(_) => "-".into(),
            Token::Star(_) => "*".into(),
            Token::Slash(_) => "/".into(),
            Token::Percent(_) => "%".into(),
            Token::EqEq(_) => "==".into(),
            Token::NotEq(_) => "!=".into(),
            Token::Lt(_) => "<".into(),
            Token::Le(_) => "<=".into(),
            Token::Gt(_) => ">".into(),
            Token::Ge(_) => ">=".into(),
            Token::Eq(_) => "=".into(),
            Token::LParen(_) => "(".into(),
            Token::RParen(_) => ")".into(),
            Token::LBrace(_) => "{".into(),
            Token::RBrace(_) => "}".into(),
            Token::Semicolon(_) => ";".into(),
            Token::Comma(_) => ",".into(),
            Token::Eof(_) => String::new(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n, _) => write!(f, "int literal {}", n),
            Token::FloatLiteral(x, _) => write!(f, "float literal {:?}", x),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Eof(_) => write!(f, "end of file"),
            other => write!(f, "'{}'", other.lexeme()),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Lexer error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Lexer for mini C source code
#[derive(Debug, Clone)]
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Rewind to the start of the input
    pub fn reset(&mut self) {
        self.position = 0;
        self.line = 1;
        self.column = 1;
        self.finished = false;
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        self.by_ref().collect()
    }

    /// Scan the next token, or `Eof` once the input is exhausted
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;

        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Ok(Token::Eof(loc));
        };

        match ch {
            '0'..='9' => self.number_literal(ch, loc),

            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword(ch, loc)),

            '+' => Ok(Token::Plus(loc)),
            '-' => Ok(Token::Minus(loc)),
            '*' => Ok(Token::Star(loc)),
            '/' => Ok(Token::Slash(loc)),
            '%' => Ok(Token::Percent(loc)),
            '=' => {
                if self.match_char('=') {
                    Ok(Token::EqEq(loc))
                } else {
                    Ok(Token::Eq(loc))
                }
            }
            '!' => {
                if self.match_char('=') {
                    Ok(Token::NotEq(loc))
                } else {
                    Err(LexError {
                        message: "Unexpected character: '!'".to_string(),
                        location: loc,
                    })
                }
            }
            '<' => {
                if self.match_char('=') {
                    Ok(Token::Le(loc))
                } else {
                    Ok(Token::Lt(loc))
                }
            }
            '>' => {
                if self.match_char('=') {
                    Ok(Token::Ge(loc))
                } else {
                    Ok(Token::Gt(loc))
                }
            }
            '(' => Ok(Token::LParen(loc)),
            ')' => Ok(Token::RParen(loc)),
            '{' => Ok(Token::LBrace(loc)),
            '}' => Ok(Token::RBrace(loc)),
            ';' => Ok(Token::Semicolon(loc)),
            ',' => Ok(Token::Comma(loc)),

            _ => Err(LexError {
                message: format!("Unexpected character: {:?}", ch),
                location: loc,
            }),
        }
    }

    /// Parse numeric literal: `digits` or `digits.digits`
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut num_str = String::new();
        num_str.push(first_digit);
        self.consume_digits(&mut num_str);

        let is_float = self.peek() == Some('.') && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit());
        if is_float {
            num_str.push('.');
            self.advance();
            self.consume_digits(&mut num_str);

            let value = num_str.parse::<f64>().map_err(|_| LexError {
                message: format!("Invalid float literal: {}", num_str),
                location: loc,
            })?;
            return Ok(Token::FloatLiteral(value, loc));
        }

        let value = num_str.parse::<i64>().map_err(|_| LexError {
            message: format!("Invalid integer literal: {}", num_str),
            location: loc,
        })?;

        Ok(Token::IntLiteral(value, loc))
    }

    fn consume_digits(&mut self, buf: &mut String) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                buf.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "int" => Token::Int(loc),
            "float" => Token::Float(loc),
            "if" => Token::If(loc),
            "else" => Token::Else(loc),
            "while" => Token::While(loc),
            "print" => Token::Print(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if matches!(result, Ok(Token::Eof(_)) | Err(_)) {
            self.finished = true;
        }
        Some(result)
    }
}
