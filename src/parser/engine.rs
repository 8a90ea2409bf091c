// This module implements the table-driven LR parsing engine. It drives a standard
// shift/reduce parse over a finite token stream using an LrTable oracle and keeps two stacks
// in lockstep: a status stack seeded with the table's start state and a symbol stack of the
// grammar terms shifted or reduced so far. Every shift, reduce and accept event is broadcast
// to the registered ActionObservers, in registration order, strictly before the stacks are
// touched so that observers mirroring the parser see the pre-transition depth. Reductions
// verify the popped symbols against the production body; any inconsistency, a missing goto
// entry, an Error action or an exhausted token stream aborts the parse.

//! LR parsing driver and observer protocol.

use crate::core::{CompileError, CompileResult, SharedSymbolTable};
use crate::lexer::Token;

use super::grammar::{Production, Term};
use super::table::{Action, LrTable, Status};

/// Passive listener notified of every parser action.
///
/// Notifications arrive before the parser mutates its stacks. Returning an
/// error aborts the parse.
pub trait ActionObserver {
    /// `token` is about to be shifted while in `status`.
    fn when_shift(&mut self, status: Status, token: &Token) -> CompileResult<()>;

    /// `production` is about to be reduced while in `status`.
    fn when_reduce(&mut self, status: Status, production: &Production) -> CompileResult<()>;

    /// The input has been accepted in `status`.
    fn when_accept(&mut self, status: Status) -> CompileResult<()>;

    /// Called once, on registration.
    fn set_symbol_table(&mut self, table: SharedSymbolTable);
}

/// Counters describing a finished parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    pub shifts: usize,
    pub reductions: usize,
}

/// Status and symbol stacks of the automaton.
///
/// The status stack always holds exactly one more entry than the symbol
/// stack: the start state sits below the first symbol.
#[derive(Debug, Clone)]
pub struct ParserStacks {
    statuses: Vec<Status>,
    symbols: Vec<Term>,
}

impl ParserStacks {
    pub fn new(start: Status) -> Self {
        Self {
            statuses: vec![start],
            symbols: Vec::new(),
        }
    }

    pub fn top(&self) -> Status {
        // The start state is never popped.
        self.statuses[self.statuses.len() - 1]
    }

    /// Number of symbols on the stack.
    pub fn depth(&self) -> usize {
        self.symbols.len()
    }

    pub fn statuses(&self) -> &[Status] {
        &self.statuses
    }

    pub fn symbols(&self) -> &[Term] {
        &self.symbols
    }

    pub fn push(&mut self, symbol: Term, status: Status) {
        self.symbols.push(symbol);
        self.statuses.push(status);
    }

    /// Pop `body.len()` entries from both stacks, checking them against `body`
    /// from right to left.
    pub fn pop_body(&mut self, body: &[Term]) -> CompileResult<()> {
        for expected in body.iter().rev() {
            match self.symbols.pop() {
                Some(found) if found == *expected => {}
                found => {
                    return Err(CompileError::StackMismatch {
                        expected: expected.to_string(),
                        found: found.map_or_else(|| "empty stack".to_string(), |t| t.to_string()),
                    });
                }
            }
            self.statuses.pop();
        }
        Ok(())
    }
}

/// LR parsing driver.
pub struct SyntaxAnalyzer<'a> {
    symbol_table: SharedSymbolTable,
    observers: Vec<&'a mut dyn ActionObserver>,
}

impl<'a> SyntaxAnalyzer<'a> {
    pub fn new(symbol_table: SharedSymbolTable) -> Self {
        Self {
            symbol_table,
            observers: Vec::new(),
        }
    }

    /// Register an observer and hand it the shared symbol table.
    pub fn register_observer(&mut self, observer: &'a mut dyn ActionObserver) {
        observer.set_symbol_table(self.symbol_table.clone());
        self.observers.push(observer);
    }

    fn call_when_shift(&mut self, status: Status, token: &Token) -> CompileResult<()> {
        for observer in self.observers.iter_mut() {
            observer.when_shift(status, token)?;
        }
        Ok(())
    }

    fn call_when_reduce(&mut self, status: Status, production: &Production) -> CompileResult<()> {
        for observer in self.observers.iter_mut() {
            observer.when_reduce(status, production)?;
        }
        Ok(())
    }

    fn call_when_accept(&mut self, status: Status) -> CompileResult<()> {
        for observer in self.observers.iter_mut() {
            observer.when_accept(status)?;
        }
        Ok(())
    }

    /// Parse `tokens` with `table`, notifying observers along the way.
    ///
    /// The stream must contain the end-of-input token the grammar accepts on.
    pub fn run<I, T>(&mut self, tokens: I, table: &T) -> CompileResult<ParseSummary>
    where
        I: IntoIterator<Item = Token>,
        T: LrTable + ?Sized,
    {
        let mut tokens = tokens.into_iter();
        let mut stacks = ParserStacks::new(table.start());
        let mut summary = ParseSummary::default();
        let mut token = tokens.next().ok_or(CompileError::UnexpectedEndOfInput)?;

        loop {
            let status = stacks.top();
            match table.action(status, &token) {
                Action::Shift(next) => {
                    log::trace!("shift {token} in state {status} -> {next}");
                    self.call_when_shift(status, &token)?;
                    stacks.push(Term::Terminal(token.kind()), next);
                    debug_assert_eq!(stacks.statuses().len(), stacks.depth() + 1);
                    summary.shifts += 1;
                    token = tokens.next().ok_or(CompileError::UnexpectedEndOfInput)?;
                }
                Action::Reduce(index) => {
                    let production = table
                        .production(index)
                        .ok_or(CompileError::UnknownProduction { index })?;
                    log::trace!("reduce {production} in state {status}");
                    self.call_when_reduce(status, production)?;

                    stacks.pop_body(production.body())?;
                    let head = production.head();
                    let next =
                        table.goto(stacks.top(), head).ok_or_else(|| CompileError::MissingGoto {
                            status: stacks.top().0,
                            head: head.to_string(),
                        })?;
                    stacks.push(Term::NonTerminal(head), next);
                    debug_assert_eq!(stacks.statuses().len(), stacks.depth() + 1);
                    summary.reductions += 1;
                }
                Action::Accept => {
                    log::debug!(
                        "accepted after {} shifts and {} reductions",
                        summary.shifts,
                        summary.reductions
                    );
                    self.call_when_accept(status)?;
                    return Ok(summary);
                }
                Action::Error => {
                    return Err(CompileError::Syntax {
                        status: status.0,
                        token: token.to_string(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SymbolTable;
    use crate::lexer::TokenKind;
    use crate::parser::grammar::NonTerminal;
    use crate::parser::table::ParseTable;

    /// Mirrors the parser's symbol stack and checks it at every event.
    #[derive(Default)]
    struct DepthProbe {
        depth: usize,
        events: Vec<String>,
        bound: bool,
    }

    impl ActionObserver for DepthProbe {
        fn when_shift(&mut self, _status: Status, token: &Token) -> CompileResult<()> {
            self.events.push(format!("shift {}", token.kind()));
            self.depth += 1;
            Ok(())
        }

        fn when_reduce(&mut self, _status: Status, production: &Production) -> CompileResult<()> {
            self.events.push(format!("reduce {production}"));
            assert!(self.depth >= production.body().len());
            self.depth = self.depth - production.body().len() + 1;
            Ok(())
        }

        fn when_accept(&mut self, _status: Status) -> CompileResult<()> {
            self.events.push("accept".to_string());
            Ok(())
        }

        fn set_symbol_table(&mut self, _table: SharedSymbolTable) {
            self.bound = true;
        }
    }

    fn tokens(kinds: &[TokenKind]) -> Vec<Token> {
        kinds
            .iter()
            .map(|&kind| match kind {
                TokenKind::Id => Token::id("a"),
                TokenKind::IntConst => Token::int_const("1"),
                other => Token::simple(other),
            })
            .collect()
    }

    #[test]
    fn test_stacks_keep_start_state() {
        let mut stacks = ParserStacks::new(Status(0));
        stacks.push(Term::Terminal(TokenKind::Int), Status(5));
        assert_eq!(stacks.statuses().len(), stacks.depth() + 1);

        stacks.pop_body(&[Term::Terminal(TokenKind::Int)]).unwrap();
        assert_eq!(stacks.top(), Status(0));
        assert_eq!(stacks.depth(), 0);
    }

    #[test]
    fn test_stack_mismatch_is_fatal() {
        let mut stacks = ParserStacks::new(Status(0));
        stacks.push(Term::Terminal(TokenKind::Id), Status(3));

        let err = stacks
            .pop_body(&[Term::NonTerminal(NonTerminal::Expr)])
            .unwrap_err();
        assert!(matches!(err, CompileError::StackMismatch { .. }));
    }

    #[test]
    fn test_observers_see_every_event_in_order() {
        let table = ParseTable::toy().unwrap();
        let mut first = DepthProbe::default();
        let mut second = DepthProbe::default();

        let summary = {
            let mut parser = SyntaxAnalyzer::new(SymbolTable::shared());
            parser.register_observer(&mut first);
            parser.register_observer(&mut second);
            parser
                .run(
                    tokens(&[TokenKind::Int, TokenKind::Id, TokenKind::Semicolon, TokenKind::Eof]),
                    &table,
                )
                .unwrap()
        };

        assert!(first.bound && second.bound);
        assert_eq!(first.events, second.events);
        assert_eq!(
            first.events,
            vec![
                "shift int",
                "reduce D -> int",
                "shift id",
                "reduce S -> D id",
                "shift Semicolon",
                "reduce S_list -> S Semicolon",
                "reduce P -> S_list",
                "accept",
            ]
        );
        assert_eq!(summary, ParseSummary { shifts: 3, reductions: 4 });
        assert_eq!(first.depth, 1);
    }

    #[test]
    fn test_syntax_error() {
        let table = ParseTable::toy().unwrap();
        let mut parser = SyntaxAnalyzer::new(SymbolTable::shared());
        let err = parser
            .run(tokens(&[TokenKind::Id, TokenKind::Plus, TokenKind::Eof]), &table)
            .unwrap_err();

        assert!(matches!(err, CompileError::Syntax { ref token, .. } if token == "(+,)"));
    }

    #[test]
    fn test_missing_end_marker() {
        let table = ParseTable::toy().unwrap();
        let mut parser = SyntaxAnalyzer::new(SymbolTable::shared());
        let err = parser
            .run(tokens(&[TokenKind::Return, TokenKind::IntConst, TokenKind::Semicolon]), &table)
            .unwrap_err();

        assert!(matches!(err, CompileError::UnexpectedEndOfInput));
    }
}
