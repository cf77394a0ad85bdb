use crate::error::{AdError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub position: usize,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident(String),

    Plus,
    Minus,
    Times,
    Divide,
    /// `**` or `^`.
    Power,

    LeftParen,
    RightParen,
    Comma,

    Eof,
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    current_char: Option<char>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: 0,
            current_char: input.chars().next(),
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let start = self.position;

        let Some(ch) = self.current_char else {
            return Ok(self.token(TokenKind::Eof, start));
        };

        let kind = match ch {
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '/' => self.single(TokenKind::Divide),
            '^' => self.single(TokenKind::Power),
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            ',' => self.single(TokenKind::Comma),
            '*' => {
                self.advance();
                if self.current_char == Some('*') {
                    self.advance();
                    TokenKind::Power
                } else {
                    TokenKind::Times
                }
            }
            c if c.is_ascii_digit() || c == '.' => self.number()?,
            c if c.is_alphabetic() || c == '_' => self.identifier(),
            other => {
                return Err(AdError::Parse {
                    message: format!("unexpected character '{other}'"),
                    position: start,
                })
            }
        };
        Ok(self.token(kind, start))
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            position: start,
            length: self.position - start,
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char {
            self.position += ch.len_utf8();
        }
        self.current_char = self.input[self.position..].chars().next();
    }

    fn skip_whitespace(&mut self) {
        while self.current_char.is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn eat_digits(&mut self) {
        while self.current_char.is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// `123`, `1.5`, `.5`, `2e-3`.
    fn number(&mut self) -> Result<TokenKind> {
        let start = self.position;
        self.eat_digits();
        if self.current_char == Some('.') {
            self.advance();
            self.eat_digits();
        }
        if matches!(self.current_char, Some('e' | 'E')) {
            let rest = &self.input[self.position + 1..];
            let signed = rest.starts_with(['+', '-']);
            let digits = if signed { &rest[1..] } else { rest };
            // `2e` followed by a non-digit is left for the identifier lexer
            if digits.starts_with(|c: char| c.is_ascii_digit()) {
                self.advance();
                if signed {
                    self.advance();
                }
                self.eat_digits();
            }
        }

        let text = &self.input[start..self.position];
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| AdError::Parse {
                message: format!("invalid number '{text}'"),
                position: start,
            })
    }

    fn identifier(&mut self) -> TokenKind {
        let start = self.position;
        while self
            .current_char
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }
        TokenKind::Ident(self.input[start..self.position].to_string())
    }
}
