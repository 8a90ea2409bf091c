//! Observer recording every reduction, in order.

use super::engine::ActionObserver;
use super::grammar::Production;
use super::table::Status;
use crate::core::{CompileResult, SharedSymbolTable};
use crate::lexer::Token;

#[derive(Debug, Default)]
pub struct ProductionCollector {
    reduced: Vec<Production>,
}

impl ProductionCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn productions(&self) -> &[Production] {
        &self.reduced
    }

    pub fn lines(&self) -> Vec<String> {
        self.reduced.iter().map(ToString::to_string).collect()
    }
}

impl ActionObserver for ProductionCollector {
    fn when_shift(&mut self, _status: Status, _token: &Token) -> CompileResult<()> {
        Ok(())
    }

    fn when_reduce(&mut self, _status: Status, production: &Production) -> CompileResult<()> {
        self.reduced.push(production.clone());
        Ok(())
    }

    fn when_accept(&mut self, _status: Status) -> CompileResult<()> {
        Ok(())
    }

    fn set_symbol_table(&mut self, _table: SharedSymbolTable) {}
}
