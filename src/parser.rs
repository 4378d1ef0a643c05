use thiserror::Error;
use tracing::debug;

use crate::ast::Expression;
use crate::tokeniser::{Token, TokenKind};

/// Default limit on how deeply expressions may nest.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// The program could not be parsed because the token at the cursor was not the one required.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "expected {expected} in {context}, found {}",
    .found.as_deref().map_or("end of input".to_string(), |text| format!("\"{text}\""))
)]
pub struct SyntaxError {
    /// The token or construct that was required.
    pub expected: String,
    /// The production being parsed when the error was detected.
    pub context: String,
    /// Text of the offending token, `None` at end of input.
    pub found: Option<String>,
}

/// Recursive descent parser over a borrowed token slice.
///
/// The cursor only ever moves forward; there is no backtracking.
#[derive(Debug)]
pub struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
    depth: usize,
    deepest: usize,
    max_depth: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
            deepest: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the whole token stream as a single program.
    pub fn parse_program(mut self) -> Result<Expression, SyntaxError> {
        let expr = self.parse_expression()?;

        if let Some(token) = self.peek() {
            return Err(syntax_error("end of input", "program", Some(token)));
        }

        debug!(
            tokens = self.tokens.len(),
            depth = self.deepest,
            "parsed program"
        );
        Ok(expr)
    }

    /// Parse one expression starting at the cursor.
    pub fn parse_expression(&mut self) -> Result<Expression, SyntaxError> {
        let Some(head) = self.peek() else {
            return Err(self.error("expression", "expression"));
        };

        let context = match head.kind {
            TokenKind::Minus => "minus expression",
            TokenKind::IsZero => "iszero expression",
            TokenKind::If => "if expression",
            TokenKind::Let => "let expression",
            _ => "expression",
        };
        if self.depth >= self.max_depth {
            return Err(self.too_deep(context));
        }

        self.depth += 1;
        self.deepest = self.deepest.max(self.depth);
        let expr = self.parse_production(context);
        self.depth -= 1;
        expr
    }

    fn parse_production(&mut self, context: &str) -> Result<Expression, SyntaxError> {
        let Some(head) = self.advance() else {
            return Err(self.error("expression", context));
        };

        match head.kind {
            TokenKind::Integer => match head.text.parse::<i64>() {
                Ok(value) => Ok(Expression::Const(value)),
                Err(_) => Err(syntax_error(
                    "an integer literal within the 64-bit range",
                    context,
                    Some(head),
                )),
            },
            TokenKind::Identifier => Ok(Expression::Var(head.text.clone())),
            TokenKind::Minus => {
                self.expect(TokenKind::LeftParen, context)?;
                let minuend = self.parse_expression()?;
                self.expect(TokenKind::Comma, context)?;
                let subtrahend = self.parse_expression()?;
                self.expect(TokenKind::RightParen, context)?;
                Ok(Expression::diff(minuend, subtrahend))
            }
            TokenKind::IsZero => {
                self.expect(TokenKind::LeftParen, context)?;
                let operand = self.parse_expression()?;
                self.expect(TokenKind::RightParen, context)?;
                Ok(Expression::is_zero(operand))
            }
            TokenKind::If => {
                let condition = self.parse_expression()?;
                self.expect(TokenKind::Then, context)?;
                let then_branch = self.parse_expression()?;
                self.expect(TokenKind::Else, context)?;
                let else_branch = self.parse_expression()?;
                Ok(Expression::if_then_else(condition, then_branch, else_branch))
            }
            TokenKind::Let => {
                let name_token = self.peek();
                let name = match self.parse_expression()? {
                    Expression::Var(name) => name,
                    _ => {
                        return Err(syntax_error(
                            TokenKind::Identifier.describe(),
                            context,
                            name_token,
                        ));
                    }
                };
                self.expect(TokenKind::Equals, context)?;
                let value = self.parse_expression()?;
                self.expect(TokenKind::In, context)?;
                let body = self.parse_expression()?;
                Ok(Expression::let_in(name, value, body))
            }
            _ => Err(syntax_error("expression", context, Some(head))),
        }
    }

    /// Consume the token at the cursor if it is of the expected kind.
    fn expect(&mut self, expected: TokenKind, context: &str) -> Result<&'t Token, SyntaxError> {
        match self.peek() {
            Some(token) if token.kind == expected => {
                self.position += 1;
                Ok(token)
            }
            _ => Err(self.error(expected.describe(), context)),
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.peek()?;
        self.position += 1;
        Some(token)
    }

    /// Build an error about the token at the cursor.
    #[cold]
    #[inline(never)]
    fn error(&self, expected: &str, context: &str) -> SyntaxError {
        syntax_error(expected, context, self.peek())
    }

    #[cold]
    #[inline(never)]
    fn too_deep(&self, context: &str) -> SyntaxError {
        let expected = format!("expression nested at most {} deep", self.max_depth);
        syntax_error(&expected, context, self.peek())
    }
}

// Cold path, kept out of the recursive parse frames.
#[cold]
#[inline(never)]
fn syntax_error(expected: &str, context: &str, found: Option<&Token>) -> SyntaxError {
    SyntaxError {
        expected: expected.to_string(),
        context: context.to_string(),
        found: found.map(|token| token.text.clone()),
    }
}

/// Parse a list of tokens and return an AST - a single expression.
pub fn parse(tokens: &[Token]) -> Result<Expression, SyntaxError> {
    Parser::new(tokens).parse_program()
}
