//! Parser for dot-notation path expressions

use thiserror::Error;

use crate::ast::{CompOp, Expr, Function, Literal, LogicalOp, Path, Segment};
use crate::lexer::{LexError, Lexer, Token, TokenKind};

/// Parser error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The expression is not in the path grammar
    #[error("malformed path at position {position}: {message}")]
    MalformedPath { message: String, position: usize },
    /// A function name outside the supported set
    #[error("unsupported function '{name}' at position {position}")]
    UnsupportedFunction { name: String, position: usize },
    /// A predicate operator or form outside the supported set
    #[error("unsupported predicate at position {position}: {message}")]
    UnsupportedPredicate { message: String, position: usize },
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        Self::MalformedPath {
            message: e.message,
            position: e.position,
        }
    }
}

/// Parser for path expressions
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    /// Parse a path expression string
    pub fn parse(input: &str) -> Result<Path, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        let mut parser = Self::new(tokens);
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<Path, ParseError> {
        // A leading root marker is consumed and ignored
        if self.current_kind() == Some(&TokenKind::Root) {
            self.advance();
        }

        let mut segments = Vec::new();

        while let Some(kind) = self.current_kind().cloned() {
            match kind {
                // Dots are pure separators; leading, trailing and doubled
                // dots are empty segments and select nothing
                TokenKind::Dot => {
                    self.advance();
                }
                TokenKind::Wildcard => {
                    self.advance();
                    segments.push(Segment::Wildcard);
                }
                TokenKind::BracketOpen => segments.push(self.parse_bracket_segment()?),
                TokenKind::BraceOpen => segments.push(self.parse_predicate_segment()?),
                TokenKind::Ident(name) => {
                    let position = self.current_position();
                    self.advance();
                    if self.current_kind() == Some(&TokenKind::ParenOpen) {
                        segments.push(self.parse_function_segment(name, position)?);
                    } else if name == "findAll"
                        && self.current_kind() == Some(&TokenKind::BraceOpen)
                    {
                        // the filter verb contributes no field; the brace
                        // group parses as the next segment
                    } else {
                        segments.push(Segment::Field(name));
                    }
                }
                other => {
                    return Err(ParseError::MalformedPath {
                        message: format!("unexpected token: {other:?}"),
                        position: self.current_position(),
                    });
                }
            }
        }

        Ok(Path::new(segments))
    }

    /// Parse one bracket group: `[0]`, `['key']` or `[*]`
    fn parse_bracket_segment(&mut self) -> Result<Segment, ParseError> {
        self.advance(); // consume '['

        let segment = match self.current_kind().cloned() {
            Some(TokenKind::Int(n)) => {
                self.advance();
                Segment::Index(n)
            }
            Some(TokenKind::String(key)) => {
                self.advance();
                Segment::Field(key)
            }
            Some(TokenKind::Wildcard) => {
                self.advance();
                Segment::Wildcard
            }
            Some(kind) => {
                return Err(ParseError::MalformedPath {
                    message: format!("expected index, quoted key or '*' in brackets, got {kind:?}"),
                    position: self.current_position(),
                });
            }
            None => {
                return Err(ParseError::MalformedPath {
                    message: "unclosed bracket".to_string(),
                    position: self.current_position(),
                });
            }
        };

        match self.current_kind() {
            Some(TokenKind::BracketClose) => {
                self.advance();
                Ok(segment)
            }
            Some(kind) => Err(ParseError::MalformedPath {
                message: format!("expected ']', got {kind:?}"),
                position: self.current_position(),
            }),
            None => Err(ParseError::MalformedPath {
                message: "unclosed bracket".to_string(),
                position: self.current_position(),
            }),
        }
    }

    /// Parse a function call segment; the name is already consumed
    fn parse_function_segment(
        &mut self,
        name: String,
        position: usize,
    ) -> Result<Segment, ParseError> {
        self.advance(); // consume '('

        let function = if name == "size" {
            Function::Size
        } else {
            return Err(ParseError::UnsupportedFunction { name, position });
        };

        match self.current_kind() {
            Some(TokenKind::ParenClose) => {
                self.advance();
                Ok(Segment::Function(function))
            }
            Some(_) => Err(ParseError::MalformedPath {
                message: format!("function '{name}' takes no arguments"),
                position: self.current_position(),
            }),
            None => Err(ParseError::MalformedPath {
                message: "unclosed function call".to_string(),
                position: self.current_position(),
            }),
        }
    }

    /// Parse a `{ ... }` predicate group into a filter segment
    fn parse_predicate_segment(&mut self) -> Result<Segment, ParseError> {
        self.advance(); // consume '{'

        // Optional `name ->` rebinds the loop variable; `it` otherwise
        let variable = match (self.current_kind().cloned(), self.peek_kind(1).cloned()) {
            (Some(TokenKind::Ident(name)), Some(TokenKind::Arrow)) => {
                self.advance();
                self.advance();
                name
            }
            _ => "it".to_string(),
        };

        if self.current_kind() == Some(&TokenKind::BraceClose) {
            return Err(ParseError::UnsupportedPredicate {
                message: "empty predicate".to_string(),
                position: self.current_position(),
            });
        }

        let expr = self.parse_expression(&variable)?;

        match self.current_kind().cloned() {
            Some(TokenKind::BraceClose) => {
                self.advance();
                Ok(Segment::Predicate(expr))
            }
            Some(kind) => Err(self.unsupported_predicate_token(&kind)),
            None => Err(ParseError::MalformedPath {
                message: "unclosed predicate".to_string(),
                position: self.current_position(),
            }),
        }
    }

    fn unsupported_predicate_token(&self, kind: &TokenKind) -> ParseError {
        let message = match kind {
            TokenKind::Wildcard => "operator '*' is not supported in predicates".to_string(),
            TokenKind::Assign => "single '=' is not a comparison operator; use '=='".to_string(),
            TokenKind::Arrow => "'->' binds the loop variable only at the start of a predicate"
                .to_string(),
            TokenKind::Unknown(ch) => format!("unsupported operator '{ch}'"),
            other => format!("unexpected token in predicate: {other:?}"),
        };
        ParseError::UnsupportedPredicate {
            message,
            position: self.current_position(),
        }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn current_kind(&self) -> Option<&TokenKind> {
        self.current().map(|t| &t.kind)
    }

    fn peek_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.index + offset).map(|t| &t.kind)
    }

    fn current_position(&self) -> usize {
        self.current().map(|t| t.position).unwrap_or(
            // If past the end, use position after last token
            self.tokens.last().map(|t| t.position + 1).unwrap_or(0),
        )
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    // ========== Predicate Expression Parsing ==========

    /// Parse a predicate body (entry point); logical OR has the lowest
    /// precedence
    fn parse_expression(&mut self, variable: &str) -> Result<Expr, ParseError> {
        self.parse_or_expression(variable)
    }

    fn parse_or_expression(&mut self, variable: &str) -> Result<Expr, ParseError> {
        let mut left = self.parse_and_expression(variable)?;

        while self.current_kind() == Some(&TokenKind::Or) {
            self.advance();
            let right = self.parse_and_expression(variable)?;
            left = Expr::Logical {
                left: Box::new(left),
                op: LogicalOp::Or,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_and_expression(&mut self, variable: &str) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison_expression(variable)?;

        while self.current_kind() == Some(&TokenKind::And) {
            self.advance();
            let right = self.parse_comparison_expression(variable)?;
            left = Expr::Logical {
                left: Box::new(left),
                op: LogicalOp::And,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// At most one comparison per level; `a < b < c` does not parse
    fn parse_comparison_expression(&mut self, variable: &str) -> Result<Expr, ParseError> {
        let left = self.parse_unary_expression(variable)?;

        let op = match self.current_kind() {
            Some(TokenKind::Equal) => Some(CompOp::Eq),
            Some(TokenKind::NotEqual) => Some(CompOp::Ne),
            Some(TokenKind::LessThan) => Some(CompOp::Lt),
            Some(TokenKind::GreaterThan) => Some(CompOp::Gt),
            Some(TokenKind::LessEq) => Some(CompOp::Le),
            Some(TokenKind::GreaterEq) => Some(CompOp::Ge),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let right = self.parse_unary_expression(variable)?;
            Ok(Expr::Comparison {
                left: Box::new(left),
                op,
                right: Box::new(right),
            })
        } else {
            Ok(left)
        }
    }

    fn parse_unary_expression(&mut self, variable: &str) -> Result<Expr, ParseError> {
        if self.current_kind() == Some(&TokenKind::Not) {
            self.advance();
            let expr = self.parse_unary_expression(variable)?;
            Ok(Expr::Not(Box::new(expr)))
        } else {
            self.parse_operand(variable)
        }
    }

    fn parse_operand(&mut self, variable: &str) -> Result<Expr, ParseError> {
        match self.current_kind().cloned() {
            Some(TokenKind::True) => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(true)))
            }
            Some(TokenKind::False) => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(false)))
            }
            Some(TokenKind::Null) => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }
            Some(TokenKind::Int(n)) => {
                self.advance();
                Ok(Expr::Literal(Literal::Int(n)))
            }
            Some(TokenKind::Float(f)) => {
                self.advance();
                Ok(Expr::Literal(Literal::Float(f)))
            }
            Some(TokenKind::String(s)) => {
                self.advance();
                Ok(Expr::Literal(Literal::String(s)))
            }
            Some(TokenKind::Ident(name)) => {
                self.advance();
                self.parse_element_chain(name, variable)
            }
            Some(TokenKind::ParenOpen) => {
                self.advance();
                let expr = self.parse_or_expression(variable)?;
                match self.current_kind() {
                    Some(TokenKind::ParenClose) => {
                        self.advance();
                        Ok(expr)
                    }
                    Some(TokenKind::Arrow) => {
                        Err(self.unsupported_predicate_token(&TokenKind::Arrow))
                    }
                    Some(_) => Err(ParseError::MalformedPath {
                        message: "expected ')' after expression".to_string(),
                        position: self.current_position(),
                    }),
                    None => Err(ParseError::MalformedPath {
                        message: "unclosed predicate".to_string(),
                        position: self.current_position(),
                    }),
                }
            }
            Some(kind) => Err(self.unsupported_predicate_token(&kind)),
            None => Err(ParseError::MalformedPath {
                message: "unclosed predicate".to_string(),
                position: self.current_position(),
            }),
        }
    }

    /// Parse a field chain starting at an identifier; a reference to the
    /// loop variable resolves to the element under test
    fn parse_element_chain(&mut self, first: String, variable: &str) -> Result<Expr, ParseError> {
        let mut fields = Vec::new();
        if first != variable {
            fields.push(first);
        }

        while self.current_kind() == Some(&TokenKind::Dot) {
            self.advance();
            match self.current_kind().cloned() {
                Some(TokenKind::Ident(name)) => {
                    self.advance();
                    fields.push(name);
                }
                Some(kind) => {
                    return Err(ParseError::UnsupportedPredicate {
                        message: format!("expected field name after '.', got {kind:?}"),
                        position: self.current_position(),
                    });
                }
                None => {
                    return Err(ParseError::MalformedPath {
                        message: "unclosed predicate".to_string(),
                        position: self.current_position(),
                    });
                }
            }
        }

        if fields.is_empty() {
            Ok(Expr::Element)
        } else {
            Ok(Expr::Field(fields))
        }
    }
}
