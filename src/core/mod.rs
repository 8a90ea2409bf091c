// This module serves as the central hub for toyc's shared infrastructure: the error types
// used by every phase, the symbol table shared between the scanner and the parser
// observers, the strict bijective map used for register bindings, last-use analysis over
// straight-line IR, and the register file that performs on-demand allocation with dead
// variable eviction. Target specific pieces (register names, instruction forms) live in
// the riscv module and plug into the generic register file.

//! Core toyc infrastructure.
//!
//! # Key Components
//!
//! ## Errors (`error`)
//! - One `CompileError` enum for every fatal condition of the pipeline
//!
//! ## Symbol Table (`symbol_table`)
//! - Name to type mapping shared through `Rc<RefCell<_>>`
//!
//! ## Register Allocation (`register_file`, `liveness`, `bimap`)
//! - Last-use table built once per instruction list
//! - Demand-driven binding with last-use eviction and no spilling

pub mod bimap;
pub mod error;
pub mod liveness;
pub mod register_file;
pub mod symbol_table;

pub use bimap::BiMap;
pub use error::{CompileError, CompileResult};
pub use liveness::LastUseTable;
pub use register_file::{RegAllocError, RegisterFile};
pub use symbol_table::{SharedSymbolTable, SourceCodeType, SymbolTable, SymbolTableEntry};
