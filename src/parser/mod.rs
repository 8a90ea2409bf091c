// This module groups everything that runs while the token stream is parsed: the grammar
// model and the toy grammar, the LR table oracle with its SLR(1) builder, the parsing engine
// with its observer protocol, and the three observers riding on it (semantic analysis,
// IR synthesis and the production trace).

//! Table-driven LR parsing and the observers that ride on it.
//!
//! ```ignore
//! let table = ParseTable::toy()?;
//! let mut semantic = SemanticAnalyzer::new();
//! let mut generator = IrGenerator::new();
//! let mut parser = SyntaxAnalyzer::new(symbols.clone());
//! parser.register_observer(&mut semantic);
//! parser.register_observer(&mut generator);
//! parser.run(tokens, &table)?;
//! ```

pub mod engine;
pub mod grammar;
pub mod ir_generator;
pub mod semantic;
pub mod table;
pub mod trace;

pub use engine::{ActionObserver, ParseSummary, ParserStacks, SyntaxAnalyzer};
pub use grammar::{Grammar, NonTerminal, Production, Rule, Term};
pub use ir_generator::IrGenerator;
pub use semantic::SemanticAnalyzer;
pub use table::{Action, LrTable, ParseTable, Status};
pub use trace::ProductionCollector;
