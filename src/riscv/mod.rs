// This module holds the RISC-V flavoured back end. Finished IR is first normalized by the
// preprocessing pass so that every instruction maps onto one target form, then lowered by
// the AssemblyGenerator, which resolves IR variables to the temporaries t0..t6 with the
// generic RegisterFile from core. The return register a0 is reserved for the returned
// value and never handed to a variable.

//! RISC-V code generation.
//!
//! # Key Components
//!
//! ## Preprocessing (`preprocess`)
//! - Constant folding, operand commuting and immediate materialization
//!
//! ## Lowering (`generator`)
//! - One target instruction per IR instruction
//! - Allocation through [`crate::core::RegisterFile`] with last-use eviction
//!
//! ## Target Model (`register`, `instruction`)
//! - Register names and the textual instruction forms

pub mod generator;
pub mod instruction;
pub mod preprocess;
pub mod register;

pub use generator::AssemblyGenerator;
pub use instruction::AsmInstruction;
pub use preprocess::preprocess;
pub use register::Reg;
