// This module implements the assembly generator: the back end that lowers finished IR into
// RISC-V flavoured text. Loading IR runs the preprocessing pass and builds the last-use
// table over the preprocessed list. Running it then walks that list once, resolving every IR
// variable to a register on demand through the RegisterFile (reuse, first free, evict a
// dead variable, otherwise fail) and emitting exactly one target instruction per IR
// instruction. The destination is resolved before the operands. RET is lowered to a move
// into the reserved return register and ends emission. The reserved register is never
// part of the allocatable pool.

//! IR to RISC-V lowering with single-pass register allocation.

use super::instruction::AsmInstruction;
use super::preprocess::preprocess;
use super::register::Reg;
use crate::core::{CompileError, CompileResult, LastUseTable, RegisterFile};
use crate::ir::{Instruction, IrProgram, IrValue, IrVariable};

/// Back end driver.
pub struct AssemblyGenerator {
    allocatable: Vec<Reg>,
    instructions: Vec<Instruction>,
    last_use: LastUseTable,
    asm: Vec<AsmInstruction>,
}

impl Default for AssemblyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl AssemblyGenerator {
    /// Generator allocating from all of `t0`..`t6`.
    pub fn new() -> Self {
        Self::with_registers(Reg::TEMPORARIES.to_vec())
    }

    /// Generator allocating from `allocatable`, in that order.
    ///
    /// The return register is filtered out even when listed.
    pub fn with_registers(allocatable: Vec<Reg>) -> Self {
        Self {
            allocatable: allocatable.into_iter().filter(|reg| !reg.is_reserved()).collect(),
            instructions: Vec::new(),
            last_use: LastUseTable::default(),
            asm: Vec::new(),
        }
    }

    /// Load the front end's IR, normalizing it and recording last uses.
    pub fn load_ir(&mut self, program: IrProgram) {
        let IrProgram { instructions, mut temps } = program;
        self.instructions = preprocess(&instructions, &mut temps);
        self.last_use = LastUseTable::build(&self.instructions);
        self.asm.clear();
        log::debug!(
            "preprocessed {} IR instructions into {}",
            instructions.len(),
            self.instructions.len()
        );
    }

    /// Preprocessed IR the generator works on.
    pub fn preprocessed(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Allocate registers and emit target code.
    pub fn run(&mut self) -> CompileResult<&[AsmInstruction]> {
        let mut lowering = Lowering {
            registers: RegisterFile::new(self.allocatable.clone()),
            last_use: &self.last_use,
            out: Vec::with_capacity(self.instructions.len()),
        };

        for (pos, inst) in self.instructions.iter().enumerate() {
            let index = pos + 1;
            match inst {
                Instruction::Ret { value } => {
                    lowering.emit_move(Reg::RETURN, value, index)?;
                    break;
                }
                Instruction::Mov { dst, src } => {
                    let rd = lowering.reg(dst, index)?;
                    lowering.emit_move(rd, src, index)?;
                }
                Instruction::Binary { op, dst, lhs, rhs } => {
                    let rd = lowering.reg(dst, index)?;
                    let IrValue::Variable(lhs) = lhs else {
                        return Err(CompileError::CodeGeneration {
                            reason: format!("immediate left operand in {inst}"),
                        });
                    };
                    let rs1 = lowering.reg(lhs, index)?;
                    let asm = match rhs {
                        IrValue::Variable(rhs) => AsmInstruction::Op {
                            op: *op,
                            rd,
                            rs1,
                            rs2: lowering.reg(rhs, index)?,
                        },
                        IrValue::Immediate(imm) => AsmInstruction::OpImm {
                            op: *op,
                            rd,
                            rs1,
                            imm: *imm,
                        },
                    };
                    lowering.emit(asm);
                }
            }
        }

        self.asm = lowering.out;
        log::debug!("emitted {} target instructions", self.asm.len());
        Ok(&self.asm)
    }

    pub fn instructions(&self) -> &[AsmInstruction] {
        &self.asm
    }

    /// One line of assembly per target instruction.
    pub fn lines(&self) -> Vec<String> {
        self.asm.iter().map(ToString::to_string).collect()
    }
}

/// State of one emission pass.
struct Lowering<'a> {
    registers: RegisterFile<Reg>,
    last_use: &'a LastUseTable,
    out: Vec<AsmInstruction>,
}

impl Lowering<'_> {
    fn reg(&mut self, var: &IrVariable, index: usize) -> CompileResult<Reg> {
        Ok(self.registers.allocate(var, index, self.last_use)?)
    }

    fn emit_move(&mut self, rd: Reg, src: &IrValue, index: usize) -> CompileResult<()> {
        let asm = match src {
            IrValue::Immediate(imm) => AsmInstruction::Li { rd, imm: *imm },
            IrValue::Variable(var) => AsmInstruction::Mv {
                rd,
                rs: self.reg(var, index)?,
            },
        };
        self.emit(asm);
        Ok(())
    }

    fn emit(&mut self, asm: AsmInstruction) {
        log::trace!("{asm}");
        self.out.push(asm);
    }
}
