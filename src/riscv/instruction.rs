//! Target instruction forms.
//!
//! Arithmetic comes in a register-register form and a register-immediate form;
//! the immediate form takes the literal as its right operand only and its
//! mnemonic carries an `i` suffix.

use std::fmt;

use super::register::Reg;
use crate::ir::BinaryOp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmInstruction {
    /// `li rd, imm`
    Li { rd: Reg, imm: i32 },
    /// `mv rd, rs`
    Mv { rd: Reg, rs: Reg },
    /// `op rd, rs1, rs2`
    Op { op: BinaryOp, rd: Reg, rs1: Reg, rs2: Reg },
    /// `opi rd, rs1, imm`
    OpImm { op: BinaryOp, rd: Reg, rs1: Reg, imm: i32 },
}

impl AsmInstruction {
    /// Register written by the instruction.
    pub fn rd(&self) -> Reg {
        match *self {
            AsmInstruction::Li { rd, .. }
            | AsmInstruction::Mv { rd, .. }
            | AsmInstruction::Op { rd, .. }
            | AsmInstruction::OpImm { rd, .. } => rd,
        }
    }
}

fn mnemonic(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "add",
        BinaryOp::Sub => "sub",
        BinaryOp::Mul => "mul",
    }
}

impl fmt::Display for AsmInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInstruction::Li { rd, imm } => write!(f, "li {rd}, {imm}"),
            AsmInstruction::Mv { rd, rs } => write!(f, "mv {rd}, {rs}"),
            AsmInstruction::Op { op, rd, rs1, rs2 } => {
                write!(f, "{} {rd}, {rs1}, {rs2}", mnemonic(*op))
            }
            AsmInstruction::OpImm { op, rd, rs1, imm } => {
                write!(f, "{}i {rd}, {rs1}, {imm}", mnemonic(*op))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(AsmInstruction::Li { rd: Reg::T0, imm: -3 }.to_string(), "li t0, -3");
        assert_eq!(AsmInstruction::Mv { rd: Reg::A0, rs: Reg::T2 }.to_string(), "mv a0, t2");
        let mul = AsmInstruction::Op {
            op: BinaryOp::Mul,
            rd: Reg::T0,
            rs1: Reg::T1,
            rs2: Reg::T2,
        };
        assert_eq!(mul.to_string(), "mul t0, t1, t2");
        let subi = AsmInstruction::OpImm {
            op: BinaryOp::Sub,
            rd: Reg::T3,
            rs1: Reg::T3,
            imm: 4,
        };
        assert_eq!(subi.to_string(), "subi t3, t3, 4");
    }
}
