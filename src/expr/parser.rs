use super::lexer::{Lexer, Token, TokenKind};
use super::{BinaryOp, Builtin, Expr};
use crate::error::{AdError, Result};

/// Recursive-descent parser over a token stream.
///
/// ```text
/// expression := term (('+' | '-') term)*
/// term       := unary (('*' | '/') unary)*
/// unary      := ('-' | '+') unary | power
/// power      := primary (('**' | '^') unary)?
/// primary    := number | name | name '(' arguments ')' | '(' expression ')'
/// ```
///
/// Powers bind tighter than unary minus and associate to the right, so
/// `-x**2` is `-(x**2)` and `2**3**2` is `2**9`.
///
/// Both the parser and the tree interpreter recurse, so nesting is capped at
/// [`MAX_DEPTH`]. Every operator application and every parenthesised group
/// counts as one level.
pub struct Parser<'v> {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
    variables: &'v [String],
}

/// Deepest expression tree the parser accepts.
pub const MAX_DEPTH: usize = 256;

impl<'v> Parser<'v> {
    pub fn new(tokens: Vec<Token>, variables: &'v [String]) -> Self {
        Parser {
            tokens,
            current: 0,
            depth: 0,
            variables,
        }
    }

    pub fn from_source(source: &str, variables: &'v [String]) -> Result<Self> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Parser::new(tokens, variables))
    }

    /// Parse one complete expression; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.expression()?;
        if !self.is_at_end() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(expr)
    }

    fn expression(&mut self) -> Result<Expr> {
        let entered = self.depth;
        let mut expr = self.term()?;
        loop {
            let op = if self.match_token(&TokenKind::Plus) {
                BinaryOp::Add
            } else if self.match_token(&TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            self.descend()?;
            let rhs = self.term()?;
            expr = Expr::binary(op, expr, rhs);
        }
        self.depth = entered;
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        let entered = self.depth;
        let mut expr = self.unary()?;
        loop {
            let op = if self.match_token(&TokenKind::Times) {
                BinaryOp::Mul
            } else if self.match_token(&TokenKind::Divide) {
                BinaryOp::Div
            } else {
                break;
            };
            self.descend()?;
            let rhs = self.unary()?;
            expr = Expr::binary(op, expr, rhs);
        }
        self.depth = entered;
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.match_token(&TokenKind::Minus) {
            self.descend()?;
            let operand = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Neg(Box::new(operand)));
        }
        if self.match_token(&TokenKind::Plus) {
            self.descend()?;
            let operand = self.unary()?;
            self.depth -= 1;
            return Ok(operand);
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr> {
        let base = self.primary()?;
        if self.match_token(&TokenKind::Power) {
            // right operand goes through `unary`, which recurses back here
            self.descend()?;
            let exponent = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr> {
        let Some(token) = self.advance().cloned() else {
            return Err(self.error("expected an expression"));
        };

        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::Ident(name) => {
                if self.check(&TokenKind::LeftParen) {
                    return self.call(&name, token.position);
                }
                self.name(name)
            }
            TokenKind::LeftParen => {
                self.descend()?;
                let expr = self.expression()?;
                self.consume(&TokenKind::RightParen, "expected ')'")?;
                self.depth -= 1;
                Ok(expr)
            }
            _ => Err(AdError::Parse {
                message: "expected an expression".to_string(),
                position: token.position,
            }),
        }
    }

    /// Declared variables shadow the named constants `pi` and `e`.
    fn name(&self, name: String) -> Result<Expr> {
        if let Some(index) = self.variables.iter().position(|v| *v == name) {
            return Ok(Expr::Variable(index));
        }
        match name.as_str() {
            "pi" => Ok(Expr::Number(std::f64::consts::PI)),
            "e" => Ok(Expr::Number(std::f64::consts::E)),
            _ => Err(AdError::UnknownVariable(name)),
        }
    }

    fn call(&mut self, name: &str, position: usize) -> Result<Expr> {
        let func = Builtin::from_name(name).ok_or_else(|| AdError::Parse {
            message: format!("unknown function '{name}'"),
            position,
        })?;
        self.consume(&TokenKind::LeftParen, "expected '('")?;
        self.descend()?;
        let args = self.argument_list()?;
        self.depth -= 1;

        let (min, max) = func.arity();
        if args.len() < min || args.len() > max {
            return Err(AdError::Parse {
                message: format!(
                    "{} takes {} argument(s), got {}",
                    func.name(),
                    if min == max {
                        min.to_string()
                    } else {
                        format!("{min} to {max}")
                    },
                    args.len()
                ),
                position,
            });
        }
        Ok(Expr::Call { func, args })
    }

    fn argument_list(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.match_token(&TokenKind::RightParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.consume(&TokenKind::RightParen, "expected ')' after arguments")?;
        Ok(args)
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("expression nested too deeply"));
        }
        Ok(())
    }

    fn match_token(&mut self, token_type: &TokenKind) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, token_type: &TokenKind) -> bool {
        self.peek().is_some_and(|token| {
            std::mem::discriminant(&token.kind) == std::mem::discriminant(token_type)
        })
    }

    fn advance(&mut self) -> Option<&Token> {
        if self.is_at_end() {
            return None;
        }
        self.current += 1;
        self.tokens.get(self.current - 1)
    }

    fn is_at_end(&self) -> bool {
        self.peek()
            .map_or(true, |token| matches!(token.kind, TokenKind::Eof))
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn consume(&mut self, token_type: &TokenKind, message: &str) -> Result<()> {
        if self.match_token(token_type) {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    fn error(&self, message: &str) -> AdError {
        AdError::Parse {
            message: message.to_string(),
            position: self.current_position(),
        }
    }

    fn current_position(&self) -> usize {
        self.peek().map(|t| t.position).unwrap_or(0)
    }
}
