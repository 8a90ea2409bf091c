//! Semantic analysis observer.
//!
//! Mirrors the parser's symbol stack with `(term, literal text)` pairs so that
//! the text of a declared identifier is still at hand when its declaration is
//! reduced. Declarations stamp the symbol table entry with [`SourceCodeType::Int`].

use std::collections::HashSet;

use super::engine::ActionObserver;
use super::grammar::{Production, Rule, Term};
use super::table::Status;
use crate::core::{CompileError, CompileResult, SharedSymbolTable, SourceCodeType};
use crate::lexer::Token;

#[derive(Debug, Clone)]
struct TermText {
    term: Term,
    text: Option<String>,
}

#[derive(Default)]
pub struct SemanticAnalyzer {
    symbol_table: Option<SharedSymbolTable>,
    stack: Vec<TermText>,
    declared: HashSet<String>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    fn declare(&mut self) -> CompileResult<()> {
        let name = self
            .stack
            .last()
            .and_then(|entry| entry.text.clone())
            .ok_or(CompileError::ObserverUnderflow { observer: "semantic" })?;

        // Only the first declaration of a name touches the table.
        if !self.declared.insert(name.clone()) {
            return Ok(());
        }

        let table = self
            .symbol_table
            .as_ref()
            .ok_or(CompileError::UnboundSymbolTable { observer: "semantic" })?;
        table.borrow_mut().get_mut(&name)?.set_type(SourceCodeType::Int);
        log::debug!("declared {name}: Int");
        Ok(())
    }
}

impl ActionObserver for SemanticAnalyzer {
    fn when_shift(&mut self, _status: Status, token: &Token) -> CompileResult<()> {
        self.stack.push(TermText {
            term: Term::Terminal(token.kind()),
            text: token.text().map(str::to_string),
        });
        Ok(())
    }

    fn when_reduce(&mut self, _status: Status, production: &Production) -> CompileResult<()> {
        let body = production.body();
        let start = self
            .stack
            .len()
            .checked_sub(body.len())
            .ok_or(CompileError::ObserverUnderflow { observer: "semantic" })?;
        for (entry, expected) in self.stack[start..].iter().zip(body) {
            if entry.term != *expected {
                return Err(CompileError::StackMismatch {
                    expected: expected.to_string(),
                    found: entry.term.to_string(),
                });
            }
        }

        if Rule::of(production) == Some(Rule::Declare) {
            // `S -> D id`: the identifier is the topmost entry.
            self.declare()?;
        }

        self.stack.truncate(start);
        self.stack.push(TermText {
            term: Term::NonTerminal(production.head()),
            text: None,
        });
        Ok(())
    }

    fn when_accept(&mut self, _status: Status) -> CompileResult<()> {
        Ok(())
    }

    fn set_symbol_table(&mut self, table: SharedSymbolTable) {
        self.symbol_table = Some(table);
    }
}
