use std::{collections::HashMap, fmt::Display};

use anyhow::{Result, bail};
use lazy_static::lazy_static;

/// The kinds of token a LetLang program is made of.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Comma,
    Minus,
    Equals,
    IsZero,
    If,
    Then,
    Else,
    Let,
    In,
    Identifier,
    Integer,
}

impl TokenKind {
    /// How the token is written in source, or a description for the kinds that carry text.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Comma => ",",
            Self::Minus => "minus",
            Self::Equals => "=",
            Self::IsZero => "iszero",
            Self::If => "if",
            Self::Then => "then",
            Self::Else => "else",
            Self::Let => "let",
            Self::In => "in",
            Self::Identifier => "identifier",
            Self::Integer => "integer",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::LeftParen => "LPAREN",
            Self::RightParen => "RPAREN",
            Self::Comma => "COMMA",
            Self::Minus => "MINUS",
            Self::Equals => "EQUALS",
            Self::IsZero => "ISZERO",
            Self::If => "IF",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::Let => "LET",
            Self::In => "IN",
            Self::Identifier => "IDENTIFIER",
            Self::Integer => "INTEGER",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.text)
    }
}

lazy_static! {
    /// Reserved words. Any other word is an identifier.
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = HashMap::from([
        ("minus", TokenKind::Minus),
        ("iszero", TokenKind::IsZero),
        ("if", TokenKind::If),
        ("then", TokenKind::Then),
        ("else", TokenKind::Else),
        ("let", TokenKind::Let),
        ("in", TokenKind::In),
    ]);
}

enum BufferedType {
    Integer,
    Word,
}

/// Turn the contents of the character buffer into a token and add it to the list of tokens, if necessary.
/// Cleans up after itself by flushing character buffer and resetting buffered type to None.
fn flush_char_buf(
    buf_type: &mut Option<BufferedType>,
    char_buf: &mut String,
    tokens: &mut Vec<Token>,
) -> Result<()> {
    match buf_type {
        Some(BufferedType::Integer) => {
            if char_buf == "-" {
                bail!("A '-' must be immediately followed by digits to form an integer literal.")
            }
            tokens.push(Token::new(TokenKind::Integer, char_buf.as_str()));
        }
        Some(BufferedType::Word) => {
            let kind = KEYWORDS
                .get(char_buf.as_str())
                .copied()
                .unwrap_or(TokenKind::Identifier);
            tokens.push(Token::new(kind, char_buf.as_str()));
        }
        None => {}
    }
    *buf_type = None;
    char_buf.clear();
    Ok(())
}

/// Tokenise a program string.
pub fn tokenise(program_string: &str) -> Result<Vec<Token>> {
    let mut char_buf = String::new();
    let mut buf_type: Option<BufferedType> = None;
    let mut tokens = Vec::new();

    for character in program_string.chars() {
        match character {
            '0'..='9' => {
                if buf_type.is_none() {
                    buf_type = Some(BufferedType::Integer);
                }
                char_buf.push(character);
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                if let Some(BufferedType::Integer) = buf_type {
                    bail!(
                        "Identifier-class character in token that started as an integer: {char_buf}{character}"
                    )
                }
                buf_type = Some(BufferedType::Word);
                char_buf.push(character);
            }
            '-' => {
                flush_char_buf(&mut buf_type, &mut char_buf, &mut tokens)?;
                buf_type = Some(BufferedType::Integer);
                char_buf.push(character);
            }
            '(' | ')' | ',' | '=' => {
                flush_char_buf(&mut buf_type, &mut char_buf, &mut tokens)?;
                let kind = match character {
                    '(' => TokenKind::LeftParen,
                    ')' => TokenKind::RightParen,
                    ',' => TokenKind::Comma,
                    _ => TokenKind::Equals,
                };
                tokens.push(Token::new(kind, character));
            }
            c if c.is_whitespace() => {
                flush_char_buf(&mut buf_type, &mut char_buf, &mut tokens)?;
            }
            _ => bail!("Unexpected character: {character}"),
        }
    }

    flush_char_buf(&mut buf_type, &mut char_buf, &mut tokens)?;

    Ok(tokens)
}
