// This module defines the intermediate representation produced by the IR synthesis observer
// and consumed by the assembly generator. The IR is a flat, three-address style list with no
// control flow: MOV, ADD/SUB/MUL and a terminating RET. Values are either 32-bit immediates
// or variables; variables are either named after a declared identifier or compiler
// temporaries numbered by a TempAllocator. The allocator is an explicit counter owned by
// whichever phase needs fresh temporaries and is handed along with the instruction list
// (IrProgram) so that later phases keep numbering where earlier ones stopped.

//! Three-address intermediate representation.
//!
//! # Text form
//!
//! ```text
//! (MOV, a, 3)
//! (MUL, $0, a, 4)
//! (MOV, b, $0)
//! (RET, b)
//! ```

use std::fmt;
use std::rc::Rc;

/// IR variable, compared by identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IrVariable {
    /// One-to-one with a declared source identifier.
    Named(Rc<str>),
    /// Compiler synthesized temporary.
    Temp(u32),
}

impl IrVariable {
    pub fn named(name: &str) -> Self {
        IrVariable::Named(Rc::from(name))
    }
}

impl fmt::Display for IrVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrVariable::Named(name) => f.write_str(name),
            IrVariable::Temp(id) => write!(f, "${id}"),
        }
    }
}

/// Operand of an IR instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrValue {
    Immediate(i32),
    Variable(IrVariable),
}

impl IrValue {
    pub fn is_immediate(&self) -> bool {
        matches!(self, IrValue::Immediate(_))
    }

    pub fn as_variable(&self) -> Option<&IrVariable> {
        match self {
            IrValue::Variable(var) => Some(var),
            IrValue::Immediate(_) => None,
        }
    }
}

impl From<IrVariable> for IrValue {
    fn from(var: IrVariable) -> Self {
        IrValue::Variable(var)
    }
}

impl From<i32> for IrValue {
    fn from(value: i32) -> Self {
        IrValue::Immediate(value)
    }
}

impl fmt::Display for IrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrValue::Immediate(value) => write!(f, "{value}"),
            IrValue::Variable(var) => var.fmt(f),
        }
    }
}

/// Arithmetic opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
}

impl BinaryOp {
    /// Fixed-width evaluation used by constant folding.
    pub fn fold(self, lhs: i32, rhs: i32) -> i32 {
        match self {
            BinaryOp::Add => lhs.wrapping_add(rhs),
            BinaryOp::Sub => lhs.wrapping_sub(rhs),
            BinaryOp::Mul => lhs.wrapping_mul(rhs),
        }
    }

    pub fn is_commutative(self) -> bool {
        !matches!(self, BinaryOp::Sub)
    }

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "ADD",
            BinaryOp::Sub => "SUB",
            BinaryOp::Mul => "MUL",
        }
    }
}

/// One IR instruction. Every destination is a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Mov {
        dst: IrVariable,
        src: IrValue,
    },
    Binary {
        op: BinaryOp,
        dst: IrVariable,
        lhs: IrValue,
        rhs: IrValue,
    },
    /// Terminates the instruction stream.
    Ret { value: IrValue },
}

impl Instruction {
    pub fn mov(dst: IrVariable, src: impl Into<IrValue>) -> Self {
        Instruction::Mov { dst, src: src.into() }
    }

    pub fn binary(
        op: BinaryOp,
        dst: IrVariable,
        lhs: impl Into<IrValue>,
        rhs: impl Into<IrValue>,
    ) -> Self {
        Instruction::Binary {
            op,
            dst,
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    pub fn add(dst: IrVariable, lhs: impl Into<IrValue>, rhs: impl Into<IrValue>) -> Self {
        Self::binary(BinaryOp::Add, dst, lhs, rhs)
    }

    pub fn sub(dst: IrVariable, lhs: impl Into<IrValue>, rhs: impl Into<IrValue>) -> Self {
        Self::binary(BinaryOp::Sub, dst, lhs, rhs)
    }

    pub fn mul(dst: IrVariable, lhs: impl Into<IrValue>, rhs: impl Into<IrValue>) -> Self {
        Self::binary(BinaryOp::Mul, dst, lhs, rhs)
    }

    pub fn ret(value: impl Into<IrValue>) -> Self {
        Instruction::Ret { value: value.into() }
    }

    pub fn is_ret(&self) -> bool {
        matches!(self, Instruction::Ret { .. })
    }

    /// Destination variable, absent for RET.
    pub fn result(&self) -> Option<&IrVariable> {
        match self {
            Instruction::Mov { dst, .. } | Instruction::Binary { dst, .. } => Some(dst),
            Instruction::Ret { .. } => None,
        }
    }

    /// Every variable read by the instruction, in operand order.
    pub fn used_variables(&self) -> impl Iterator<Item = &IrVariable> {
        let operands: [Option<&IrValue>; 2] = match self {
            Instruction::Mov { src, .. } => [Some(src), None],
            Instruction::Binary { lhs, rhs, .. } => [Some(lhs), Some(rhs)],
            Instruction::Ret { value } => [Some(value), None],
        };
        operands.into_iter().flatten().filter_map(IrValue::as_variable)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Mov { dst, src } => write!(f, "(MOV, {dst}, {src})"),
            Instruction::Binary { op, dst, lhs, rhs } => {
                write!(f, "({}, {dst}, {lhs}, {rhs})", op.name())
            }
            Instruction::Ret { value } => write!(f, "(RET, {value})"),
        }
    }
}

/// Source of fresh temporary identities.
#[derive(Debug, Clone, Default)]
pub struct TempAllocator {
    next: u32,
}

impl TempAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> IrVariable {
        let var = IrVariable::Temp(self.next);
        self.next += 1;
        var
    }

    /// Number of temporaries handed out so far.
    pub fn issued(&self) -> u32 {
        self.next
    }
}

/// Finished IR together with the temporary counter that produced it.
#[derive(Debug, Clone, Default)]
pub struct IrProgram {
    pub instructions: Vec<Instruction>,
    pub temps: TempAllocator,
}

impl IrProgram {
    pub fn new(instructions: Vec<Instruction>, temps: TempAllocator) -> Self {
        Self { instructions, temps }
    }

    /// One line per instruction, in program order.
    pub fn dump_lines(&self) -> Vec<String> {
        self.instructions.iter().map(ToString::to_string).collect()
    }
}
