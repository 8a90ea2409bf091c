//! Property tests for IR preprocessing and the pipeline front door.
//!
//! These tests use proptest to check that:
//! 1. Two-immediate arithmetic folds to the fixed-width wrapping result
//! 2. Preprocessing its own output changes nothing
//! 3. Every preprocessed instruction has a shape the target can encode
//! 4. Arbitrary input never panics the compiler

use proptest::prelude::*;
use toyc::ir::{BinaryOp, TempAllocator};
use toyc::riscv::preprocess;
use toyc::{compile, CompilerConfig, Instruction, IrValue, IrVariable};

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

fn binary_op() -> impl Strategy<Value = BinaryOp> {
    prop_oneof![Just(BinaryOp::Add), Just(BinaryOp::Sub), Just(BinaryOp::Mul)]
}

fn variable() -> impl Strategy<Value = IrVariable> {
    prop_oneof![
        prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(IrVariable::named),
        (0u32..4).prop_map(IrVariable::Temp),
    ]
}

fn value() -> impl Strategy<Value = IrValue> {
    prop_oneof![
        any::<i32>().prop_map(IrValue::Immediate),
        variable().prop_map(IrValue::Variable),
    ]
}

fn instruction() -> impl Strategy<Value = Instruction> {
    prop_oneof![
        4 => (variable(), value()).prop_map(|(dst, src)| Instruction::mov(dst, src)),
        6 => (binary_op(), variable(), value(), value())
            .prop_map(|(op, dst, lhs, rhs)| Instruction::binary(op, dst, lhs, rhs)),
        1 => value().prop_map(Instruction::ret),
    ]
}

fn program() -> impl Strategy<Value = Vec<Instruction>> {
    prop::collection::vec(instruction(), 0..24)
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn folding_matches_wrapping_arithmetic(
        op in binary_op(),
        l in any::<i32>(),
        r in any::<i32>(),
    ) {
        let dst = IrVariable::named("a");
        let mut temps = TempAllocator::new();
        let out = preprocess(&[Instruction::binary(op, dst.clone(), l, r)], &mut temps);

        let expected = match op {
            BinaryOp::Add => l.wrapping_add(r),
            BinaryOp::Sub => l.wrapping_sub(r),
            BinaryOp::Mul => l.wrapping_mul(r),
        };
        prop_assert_eq!(out, vec![Instruction::mov(dst, expected)]);
        prop_assert_eq!(temps.issued(), 0);
    }

    #[test]
    fn preprocessing_is_idempotent(insts in program()) {
        let mut temps = TempAllocator::new();
        for _ in 0..4 {
            temps.fresh();
        }
        let once = preprocess(&insts, &mut temps);
        let issued = temps.issued();
        let twice = preprocess(&once, &mut temps);

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(temps.issued(), issued);
    }

    #[test]
    fn output_shapes_are_encodable(insts in program()) {
        let mut temps = TempAllocator::new();
        for _ in 0..4 {
            temps.fresh();
        }
        let out = preprocess(&insts, &mut temps);

        if let Some(pos) = out.iter().position(Instruction::is_ret) {
            prop_assert_eq!(pos, out.len() - 1);
        }
        for inst in &out {
            if let Instruction::Binary { op, lhs, rhs, .. } = inst {
                prop_assert!(!lhs.is_immediate(), "immediate left operand in {}", inst);
                if *op == BinaryOp::Mul {
                    prop_assert!(!rhs.is_immediate(), "immediate MUL operand in {}", inst);
                }
            }
        }
    }

    #[test]
    fn compile_never_panics(source in prop::string::string_regex(r"[ -~\n]{0,200}").unwrap()) {
        let _ = compile(&source, &CompilerConfig::default());
    }
}
