//! toyc - a small single-pass compiler for a toy imperative language.
//!
//! Programs are sequences of integer declarations, assignments of arithmetic
//! expressions and a final `return`. toyc scans the source, parses it with a
//! table-driven LR engine whose passive observers check declarations and
//! synthesize three-address IR, then normalizes that IR and lowers it to
//! RISC-V flavoured assembly with on-demand register allocation.
//!
//! # Primary Usage
//!
//! ```ignore
//! use toyc::{compile, CompilerConfig};
//!
//! let output = compile("int a; a = 1 + 2; return a;", &CompilerConfig::default())?;
//! print!("{}", output.assembly());
//! ```
//!
//! # Architecture
//!
//! - [`lexer`] - Scanner producing the token stream
//! - [`parser`] - LR tables, parsing engine and its observers
//! - [`ir`] - Intermediate representation
//! - [`riscv`] - Preprocessing, register allocation and emission
//! - [`core`] - Shared infrastructure (errors, symbol table, register file)
//! - [`driver`] - Whole pipeline and dump files

pub mod core;
pub mod driver;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod riscv;

pub use self::core::{CompileError, CompileResult, RegAllocError, SharedSymbolTable, SymbolTable};
pub use driver::{compile, CompileOutput, CompilerConfig};
pub use ir::{Instruction, IrProgram, IrValue, IrVariable};
pub use lexer::{LexicalAnalyzer, Token, TokenKind};
pub use parser::{ActionObserver, IrGenerator, ParseTable, SemanticAnalyzer, SyntaxAnalyzer};
pub use riscv::{AsmInstruction, AssemblyGenerator, Reg};
