//! Token definitions shared by the scanner and the parser.

use std::fmt;

/// Terminal categories of the toy language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Int,
    Return,
    Id,
    IntConst,
    Assign,   // =
    Comma,    // ,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    /// End of input marker.
    Eof,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Int => "int",
            TokenKind::Return => "return",
            TokenKind::Id => "id",
            TokenKind::IntConst => "IntConst",
            TokenKind::Assign => "=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => "Semicolon",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Eof => "$",
        }
    }

    /// Kind for a single punctuation character.
    pub fn from_punct(ch: char) -> Option<Self> {
        let kind = match ch {
            '=' => TokenKind::Assign,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            _ => return None,
        };
        Some(kind)
    }

    pub fn keyword(word: &str) -> Option<Self> {
        match word {
            "int" => Some(TokenKind::Int),
            "return" => Some(TokenKind::Return),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lexical unit: kind plus optional literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: Option<String>,
}

impl Token {
    /// Token without literal text.
    pub fn simple(kind: TokenKind) -> Self {
        Self { kind, text: None }
    }

    pub fn with_text(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: Some(text.into()),
        }
    }

    pub fn id(name: &str) -> Self {
        Self::with_text(TokenKind::Id, name)
    }

    pub fn int_const(literal: &str) -> Self {
        Self::with_text(TokenKind::IntConst, literal)
    }

    pub fn eof() -> Self {
        Self::simple(TokenKind::Eof)
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.kind, self.text.as_deref().unwrap_or(""))
    }
}
