// This module computes the last-use information the register allocator relies on. Over a
// straight-line IR list there are no blocks to order, so liveness collapses to one linear
// forward scan: every variable read or written by instruction i (1-based) has its last-use
// index raised to i. The table is built once, before any register is assigned, and is never
// mutated afterwards. A variable whose last use is strictly below the current instruction
// index is dead from that point on and its register may be handed to another variable.

//! Last-use analysis for straight-line IR.

use std::collections::HashMap;

use crate::ir::{Instruction, IrVariable};

/// Highest 1-based instruction index at which each variable is touched.
#[derive(Debug, Clone, Default)]
pub struct LastUseTable {
    last: HashMap<IrVariable, usize>,
}

impl LastUseTable {
    /// Scan `instructions` once, recording destinations and operands.
    pub fn build(instructions: &[Instruction]) -> Self {
        let mut table = Self::default();
        for (pos, inst) in instructions.iter().enumerate() {
            let index = pos + 1;
            if let Some(dst) = inst.result() {
                table.record(dst, index);
            }
            for var in inst.used_variables() {
                table.record(var, index);
            }
        }
        table
    }

    fn record(&mut self, var: &IrVariable, index: usize) {
        // Indices only grow during the scan, so the latest write wins.
        self.last.insert(var.clone(), index);
    }

    pub fn get(&self, var: &IrVariable) -> Option<usize> {
        self.last.get(var).copied()
    }

    /// Whether `var` is never touched at or after `index`.
    pub fn is_dead_at(&self, var: &IrVariable, index: usize) -> bool {
        self.get(var).is_some_and(|last| last < index)
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
