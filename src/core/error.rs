// This module defines error types for the toyc compiler using the thiserror crate for
// idiomatic Rust error handling. CompileError is the main error enum covering every fatal
// condition of the pipeline: lexical errors (unknown characters, out-of-range literals),
// syntax errors reported by the LR table, internal parser inconsistencies (missing goto
// entries, symbol stack mismatches, observer stack underflow), semantic lookups of
// unknown names, IR synthesis failures, register allocation exhaustion and driver level
// configuration / I/O failures. Each variant carries the context needed to explain the
// failure. CompileResult<T> is a convenience alias for Result<T, CompileError>. No stage
// recovers from any of these; the first error aborts the whole compilation.

//! Error types for the toyc compiler.
//!
//! Using thiserror for more idiomatic error handling.

use thiserror::Error;

use super::register_file::RegAllocError;

/// Main error type for a compilation run.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("{line}:{column}: unknown character {found:?}")]
    UnknownCharacter {
        found: char,
        line: usize,
        column: usize,
    },

    #[error("{line}:{column}: integer literal {literal} does not fit in 32 bits")]
    IntegerOutOfRange {
        literal: String,
        line: usize,
        column: usize,
    },

    #[error("Syntax error in state {status} at token {token}")]
    Syntax { status: usize, token: String },

    #[error("Token stream ended before the input was accepted")]
    UnexpectedEndOfInput,

    #[error("No goto entry for state {status} on {head}")]
    MissingGoto { status: usize, head: String },

    #[error("Unknown production index {index}")]
    UnknownProduction { index: usize },

    #[error("Parser stack mismatch: expected {expected}, found {found}")]
    StackMismatch { expected: String, found: String },

    #[error("{observer} stack underflow")]
    ObserverUnderflow { observer: &'static str },

    #[error("{observer} observer used before a symbol table was bound")]
    UnboundSymbolTable { observer: &'static str },

    #[error("Grammar conflict in state {status} on {terminal}")]
    TableConflict { status: usize, terminal: String },

    #[error("Symbol not found: {name}")]
    UndeclaredSymbol { name: String },

    #[error("IR synthesis failed: {reason}")]
    IrSynthesis { reason: String },

    #[error("Code generation failed: {reason}")]
    CodeGeneration { reason: String },

    #[error(transparent)]
    RegisterAllocation(#[from] RegAllocError),

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
