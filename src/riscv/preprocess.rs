// This module implements the peephole normalization that runs before register allocation.
// Each IR instruction is rewritten on its own, in program order, so that the result only
// uses shapes the target can encode: arithmetic on two immediates is folded into a MOV with
// 32-bit wrapping semantics, ADD with the immediate on the left is commuted, SUB with the
// immediate on the left and MUL with any single immediate first materialize the immediate
// into a fresh temporary. The pass stops right after the first RET and drops everything that
// follows it. Running it on its own output changes nothing.

//! IR normalization ahead of register allocation.

use crate::ir::{BinaryOp, Instruction, IrValue, IrVariable, TempAllocator};

/// Rewrite `instructions` into target-friendly shapes.
///
/// Temporaries introduced for materialized immediates come from `temps`, which
/// must be the allocator that produced `instructions`.
pub fn preprocess(instructions: &[Instruction], temps: &mut TempAllocator) -> Vec<Instruction> {
    let mut out = Vec::with_capacity(instructions.len());

    for (pos, inst) in instructions.iter().enumerate() {
        match inst {
            Instruction::Ret { .. } => {
                out.push(inst.clone());
                let dropped = instructions.len() - pos - 1;
                if dropped > 0 {
                    log::warn!("dropping {dropped} unreachable instructions after RET");
                }
                break;
            }
            Instruction::Mov { .. } => out.push(inst.clone()),
            Instruction::Binary { op, dst, lhs, rhs } => {
                normalize_binary(*op, dst, lhs, rhs, temps, &mut out);
            }
        }
    }

    out
}

fn normalize_binary(
    op: BinaryOp,
    dst: &IrVariable,
    lhs: &IrValue,
    rhs: &IrValue,
    temps: &mut TempAllocator,
    out: &mut Vec<Instruction>,
) {
    match (lhs, rhs, op) {
        (IrValue::Immediate(l), IrValue::Immediate(r), _) => {
            out.push(Instruction::mov(dst.clone(), op.fold(*l, *r)));
        }
        // a = imm * b | a = b * imm  =>  t = imm; a = t * b
        (IrValue::Immediate(_), IrValue::Variable(_), BinaryOp::Mul)
        | (IrValue::Variable(_), IrValue::Immediate(_), BinaryOp::Mul) => {
            let (imm, other) = if lhs.is_immediate() { (lhs, rhs) } else { (rhs, lhs) };
            let temp = temps.fresh();
            out.push(Instruction::mov(temp.clone(), imm.clone()));
            out.push(Instruction::mul(dst.clone(), temp, other.clone()));
        }
        // a = imm + b  =>  a = b + imm
        (IrValue::Immediate(_), IrValue::Variable(_), _) if op.is_commutative() => {
            out.push(Instruction::binary(op, dst.clone(), rhs.clone(), lhs.clone()));
        }
        // a = imm - b  =>  t = imm; a = t - b
        (IrValue::Immediate(_), IrValue::Variable(_), _) => {
            let temp = temps.fresh();
            out.push(Instruction::mov(temp.clone(), lhs.clone()));
            out.push(Instruction::binary(op, dst.clone(), temp, rhs.clone()));
        }
        _ => out.push(Instruction::binary(op, dst.clone(), lhs.clone(), rhs.clone())),
    }
}
