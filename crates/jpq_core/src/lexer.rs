//! Lexer for dot-notation path expressions

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

/// Token types for path expressions
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Root marker `$`
    Root,
    /// Segment separator `.`
    Dot,
    /// Opening bracket `[`
    BracketOpen,
    /// Closing bracket `]`
    BracketClose,
    /// Opening brace `{` (predicate group)
    BraceOpen,
    /// Closing brace `}`
    BraceClose,
    /// Opening parenthesis `(`
    ParenOpen,
    /// Closing parenthesis `)`
    ParenClose,
    /// Wildcard `*`
    Wildcard,
    /// Loop-variable binding arrow `->`
    Arrow,
    /// Less than `<`
    LessThan,
    /// Greater than `>`
    GreaterThan,
    /// Less than or equal `<=`
    LessEq,
    /// Greater than or equal `>=`
    GreaterEq,
    /// Equal `==`
    Equal,
    /// Not equal `!=`
    NotEqual,
    /// Single `=`, never valid; kept as a token so the parser can name it
    Assign,
    /// Logical AND `&&`
    And,
    /// Logical OR `||`
    Or,
    /// Logical NOT `!`
    Not,
    /// Boolean true literal
    True,
    /// Boolean false literal
    False,
    /// Null literal
    Null,
    /// Identifier (unquoted key name, loop variable, function name)
    Ident(String),
    /// String literal (single or double quoted)
    String(String),
    /// Integer literal
    Int(i64),
    /// Floating-point literal
    Float(f64),
    /// Any character with no meaning in the language, e.g. `+` or `~`;
    /// the parser decides whether it is a malformed path or an
    /// unsupported predicate operator
    Unknown(char),
}

/// Token with position information
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Lexer error
#[derive(Debug, Clone, PartialEq, Error)]
#[error("at position {position}: {message}")]
pub struct LexError {
    pub message: String,
    pub position: usize,
}

/// Lexer for tokenizing path expressions
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        let start_pos = self.position;

        let kind = match ch {
            '$' => {
                self.advance();
                TokenKind::Root
            }
            '.' => {
                self.advance();
                TokenKind::Dot
            }
            '[' => {
                self.advance();
                TokenKind::BracketOpen
            }
            ']' => {
                self.advance();
                TokenKind::BracketClose
            }
            '{' => {
                self.advance();
                TokenKind::BraceOpen
            }
            '}' => {
                self.advance();
                TokenKind::BraceClose
            }
            '(' => {
                self.advance();
                TokenKind::ParenOpen
            }
            ')' => {
                self.advance();
                TokenKind::ParenClose
            }
            '*' => {
                self.advance();
                TokenKind::Wildcard
            }
            '<' => {
                self.advance();
                if self.chars.peek() == Some(&'=') {
                    self.advance();
                    TokenKind::LessEq
                } else {
                    TokenKind::LessThan
                }
            }
            '>' => {
                self.advance();
                if self.chars.peek() == Some(&'=') {
                    self.advance();
                    TokenKind::GreaterEq
                } else {
                    TokenKind::GreaterThan
                }
            }
            '=' => {
                self.advance();
                if self.chars.peek() == Some(&'=') {
                    self.advance();
                    TokenKind::Equal
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                self.advance();
                if self.chars.peek() == Some(&'=') {
                    self.advance();
                    TokenKind::NotEqual
                } else {
                    TokenKind::Not
                }
            }
            '&' => {
                self.advance();
                if self.chars.peek() == Some(&'&') {
                    self.advance();
                    TokenKind::And
                } else {
                    TokenKind::Unknown('&')
                }
            }
            '|' => {
                self.advance();
                if self.chars.peek() == Some(&'|') {
                    self.advance();
                    TokenKind::Or
                } else {
                    TokenKind::Unknown('|')
                }
            }
            '-' => {
                // `->` binds a loop variable, `-1` starts a number; a bare
                // minus has no meaning and is left for the parser to name
                let mut lookahead = self.chars.clone();
                lookahead.next();
                match lookahead.peek() {
                    Some(&'>') => {
                        self.advance();
                        self.advance();
                        TokenKind::Arrow
                    }
                    Some(c) if c.is_ascii_digit() => self.read_number()?,
                    _ => {
                        self.advance();
                        TokenKind::Unknown('-')
                    }
                }
            }
            '\'' | '"' => self.read_string()?,
            '0'..='9' => self.read_number()?,
            _ if is_ident_start(ch) => self.read_ident_or_keyword(),
            _ => {
                self.advance();
                TokenKind::Unknown(ch)
            }
        };

        Ok(Some(Token {
            kind,
            position: start_pos,
        }))
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next();
        if ch.is_some() {
            self.position += 1;
        }
        ch
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read 4 hex digits for a \uXXXX escape and return the code point
    fn read_hex_escape(&mut self) -> Result<u32, LexError> {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            match self.advance() {
                Some(ch) if ch.is_ascii_hexdigit() => hex.push(ch),
                _ => {
                    return Err(LexError {
                        message: "invalid unicode escape: expected 4 hex digits".to_string(),
                        position: self.position,
                    });
                }
            }
        }
        u32::from_str_radix(&hex, 16).map_err(|_| LexError {
            message: "invalid unicode escape".to_string(),
            position: self.position,
        })
    }

    /// Decode one escape sequence (the `\` is already consumed) and push
    /// the resulting character
    fn push_escape(&mut self, value: &mut String) -> Result<(), LexError> {
        let escaped = self.advance().ok_or_else(|| LexError {
            message: "unexpected end of input in escape sequence".to_string(),
            position: self.position,
        })?;
        let ch = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'b' => '\x08',
            'f' => '\x0C',
            '/' => '/',
            'u' => {
                let code = self.read_hex_escape()?;
                if (0xD800..=0xDBFF).contains(&code) {
                    // High surrogate, a \uXXXX low surrogate must follow
                    if self.advance() != Some('\\') || self.advance() != Some('u') {
                        return Err(LexError {
                            message: "invalid surrogate pair".to_string(),
                            position: self.position,
                        });
                    }
                    let low = self.read_hex_escape()?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(LexError {
                            message: "invalid low surrogate".to_string(),
                            position: self.position,
                        });
                    }
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    char::from_u32(combined).ok_or_else(|| LexError {
                        message: "invalid unicode code point".to_string(),
                        position: self.position,
                    })?
                } else {
                    char::from_u32(code).ok_or_else(|| LexError {
                        message: "invalid unicode code point".to_string(),
                        position: self.position,
                    })?
                }
            }
            _ => {
                return Err(LexError {
                    message: format!("invalid escape sequence: \\{escaped}"),
                    position: self.position - 1,
                });
            }
        };
        value.push(ch);
        Ok(())
    }

    fn read_string(&mut self) -> Result<TokenKind, LexError> {
        let quote = self.advance().ok_or_else(|| LexError {
            message: "unexpected end of input".to_string(),
            position: self.position,
        })?;

        let mut value = String::new();
        let start_pos = self.position;

        loop {
            match self.advance() {
                Some(ch) if ch == quote => break,
                Some('\\') => self.push_escape(&mut value)?,
                Some(ch) => {
                    // Control characters must be escaped, as in JSON strings
                    if (ch as u32) <= 0x1F {
                        return Err(LexError {
                            message: format!("unescaped control character U+{:04X}", ch as u32),
                            position: self.position - 1,
                        });
                    }
                    value.push(ch);
                }
                None => {
                    return Err(LexError {
                        message: "unterminated string".to_string(),
                        position: start_pos,
                    });
                }
            }
        }

        Ok(TokenKind::String(value))
    }

    fn read_number(&mut self) -> Result<TokenKind, LexError> {
        let start_pos = self.position;
        let mut num_str = String::new();

        if self.chars.peek() == Some(&'-')
            && let Some(ch) = self.advance()
        {
            num_str.push(ch);
        }

        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                if let Some(digit) = self.advance() {
                    num_str.push(digit);
                }
            } else {
                break;
            }
        }

        let mut is_float = false;

        // Fraction, only when the dot is followed by a digit; a bare dot
        // after digits is the segment separator, as in `[0].title`
        if self.chars.peek() == Some(&'.') {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                if let Some(dot) = self.advance() {
                    num_str.push(dot);
                }
                while let Some(&ch) = self.chars.peek() {
                    if ch.is_ascii_digit() {
                        if let Some(digit) = self.advance() {
                            num_str.push(digit);
                        }
                    } else {
                        break;
                    }
                }
            }
        }

        // Exponent
        if self.chars.peek().is_some_and(|&c| c == 'e' || c == 'E') {
            is_float = true;
            if let Some(e) = self.advance() {
                num_str.push(e);
            }
            if self.chars.peek().is_some_and(|&c| c == '+' || c == '-')
                && let Some(sign) = self.advance()
            {
                num_str.push(sign);
            }
            let exp_start = num_str.len();
            while let Some(&ch) = self.chars.peek() {
                if ch.is_ascii_digit() {
                    if let Some(digit) = self.advance() {
                        num_str.push(digit);
                    }
                } else {
                    break;
                }
            }
            if num_str.len() == exp_start {
                return Err(LexError {
                    message: "invalid exponent in number".to_string(),
                    position: start_pos,
                });
            }
        }

        if is_float {
            let value: f64 = num_str.parse().map_err(|_| LexError {
                message: "number out of range".to_string(),
                position: start_pos,
            })?;
            Ok(TokenKind::Float(value))
        } else {
            let value: i64 = num_str.parse().map_err(|_| LexError {
                message: "number out of range".to_string(),
                position: start_pos,
            })?;
            Ok(TokenKind::Int(value))
        }
    }

    fn read_ident_or_keyword(&mut self) -> TokenKind {
        let mut ident = String::new();

        while let Some(&ch) = self.chars.peek() {
            if is_ident_char(ch) {
                if let Some(c) = self.advance() {
                    ident.push(c);
                }
            } else {
                break;
            }
        }

        match ident.as_str() {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Ident(ident),
        }
    }
}

/// Unquoted key names are ASCII; anything else goes through the quoted
/// bracket form `['...']`
fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_char(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}
