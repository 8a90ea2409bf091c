// This module implements the character level scanner of the toy language. It turns source
// text into the token stream consumed by the LR parsing engine: keywords (int, return),
// identifiers, decimal integer literals and single character punctuation, terminated by a
// single end-of-input token. Every identifier sighting registers the name in the shared
// symbol table so that later phases can look it up; the type stays empty until semantic
// analysis runs. Unknown characters and literals that overflow 32 bits are fatal and are
// reported with their 1-based line and column.

//! Lexical analysis.

pub mod token;

pub use token::{Token, TokenKind};

use std::iter::Peekable;
use std::str::Chars;

use crate::core::{CompileError, CompileResult, SharedSymbolTable};

/// Scanner front end.
pub struct LexicalAnalyzer {
    symbol_table: SharedSymbolTable,
    tokens: Vec<Token>,
}

impl LexicalAnalyzer {
    pub fn new(symbol_table: SharedSymbolTable) -> Self {
        Self {
            symbol_table,
            tokens: Vec::new(),
        }
    }

    /// Scan `source`, replacing any previously scanned tokens.
    pub fn run(&mut self, source: &str) -> CompileResult<&[Token]> {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();

        while let Some(token) = scanner.next_token()? {
            if token.kind() == TokenKind::Id {
                if let Some(name) = token.text() {
                    self.symbol_table.borrow_mut().add(name);
                }
            }
            tokens.push(token);
        }
        tokens.push(Token::eof());

        log::debug!("Scanned {} tokens", tokens.len());
        self.tokens = tokens;
        Ok(&self.tokens)
    }

    /// Consume the analyzer, yielding the scanned tokens.
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// One `(kind,text)` line per token.
    pub fn dump_lines(&self) -> Vec<String> {
        self.tokens.iter().map(ToString::to_string).collect()
    }
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            col: 1,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Consume characters while `pred` holds, appending them to `buf`.
    fn take_while(&mut self, buf: &mut String, pred: impl Fn(char) -> bool) {
        while let Some(&ch) = self.chars.peek() {
            if !pred(ch) {
                break;
            }
            buf.push(ch);
            self.advance();
        }
    }

    fn next_token(&mut self) -> CompileResult<Option<Token>> {
        loop {
            let (line, column) = (self.line, self.col);
            let Some(ch) = self.advance() else {
                return Ok(None);
            };

            let token = match ch {
                ' ' | '\t' | '\r' | '\n' => continue,
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let mut word = String::from(c);
                    self.take_while(&mut word, |c| c.is_ascii_alphanumeric() || c == '_');
                    match TokenKind::keyword(&word) {
                        Some(kind) => Token::simple(kind),
                        None => Token::with_text(TokenKind::Id, word),
                    }
                }
                c if c.is_ascii_digit() => {
                    let mut literal = String::from(c);
                    self.take_while(&mut literal, |c| c.is_ascii_digit());
                    if literal.parse::<i32>().is_err() {
                        return Err(CompileError::IntegerOutOfRange { literal, line, column });
                    }
                    Token::with_text(TokenKind::IntConst, literal)
                }
                c => match TokenKind::from_punct(c) {
                    Some(kind) => Token::simple(kind),
                    None => {
                        return Err(CompileError::UnknownCharacter { found: c, line, column });
                    }
                },
            };
            return Ok(Some(token));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SymbolTable;

    fn scan(source: &str) -> CompileResult<Vec<Token>> {
        let mut lexer = LexicalAnalyzer::new(SymbolTable::shared());
        lexer.run(source)?;
        Ok(lexer.into_tokens())
    }

    #[test]
    fn test_declaration_and_assignment() {
        let tokens = scan("int a;\na = 12 * (b1 + _c);").unwrap();
        let kinds: Vec<_> = tokens.iter().map(Token::kind).collect();

        assert_eq!(
            kinds,
            vec![
                TokenKind::Int,
                TokenKind::Id,
                TokenKind::Semicolon,
                TokenKind::Id,
                TokenKind::Assign,
                TokenKind::IntConst,
                TokenKind::Star,
                TokenKind::LParen,
                TokenKind::Id,
                TokenKind::Plus,
                TokenKind::Id,
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[5].text(), Some("12"));
        assert_eq!(tokens[8].text(), Some("b1"));
        assert_eq!(tokens[10].text(), Some("_c"));
    }

    #[test]
    fn test_keywords_are_not_identifiers() {
        let table = SymbolTable::shared();
        let mut lexer = LexicalAnalyzer::new(table.clone());
        lexer.run("int integer; return returns;").unwrap();

        let table = table.borrow();
        assert!(table.has("integer"));
        assert!(table.has("returns"));
        assert!(!table.has("int"));
        assert!(!table.has("return"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_dump_format() {
        let mut lexer = LexicalAnalyzer::new(SymbolTable::shared());
        lexer.run("a = 1;").unwrap();

        assert_eq!(
            lexer.dump_lines(),
            vec!["(id,a)", "(=,)", "(IntConst,1)", "(Semicolon,)", "($,)"]
        );
    }

    #[test]
    fn test_unknown_character_location() {
        let err = scan("int a;\n  a = 1 # 2;").unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnknownCharacter { found: '#', line: 2, column: 9 }
        ));
    }

    #[test]
    fn test_literal_overflow() {
        let err = scan("a = 2147483648;").unwrap_err();
        assert!(matches!(
            err,
            CompileError::IntegerOutOfRange { ref literal, .. } if literal == "2147483648"
        ));
        assert!(scan("a = 2147483647;").is_ok());
    }
}
