//! Register allocation and management.
//!
//! This module implements the RegisterFile that performs the actual register
//! allocation for the assembly generator. Variables are bound to registers on
//! demand through a [`BiMap`], so a register never holds two variables and a
//! variable never occupies two registers. There is no spilling: when every
//! allocatable register holds a variable that is still live, allocation fails.

use std::fmt;
use std::hash::Hash;

use thiserror::Error;

use super::bimap::BiMap;
use super::liveness::LastUseTable;
use crate::ir::IrVariable;

/// Error types for register allocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegAllocError {
    /// Every allocatable register holds a live variable.
    #[error("No register available for {variable} at instruction {index}")]
    NoRegistersAvailable { variable: String, index: usize },
}

/// RegisterFile manages register allocation for one instruction list.
///
/// The pool order is the allocation order: the first unbound register wins,
/// and when none is free the first register holding a dead variable is reused.
#[derive(Debug, Clone)]
pub struct RegisterFile<R> {
    /// Registers available for allocation, reserved ones excluded.
    allocatable: Vec<R>,
    /// Live variable to register bindings.
    bindings: BiMap<IrVariable, R>,
}

impl<R> RegisterFile<R>
where
    R: Copy + Eq + Hash + fmt::Display,
{
    pub fn new(allocatable: Vec<R>) -> Self {
        Self {
            allocatable,
            bindings: BiMap::new(),
        }
    }

    /// Register currently bound to `var`.
    pub fn get(&self, var: &IrVariable) -> Option<R> {
        self.bindings.get_by_key(var).copied()
    }

    /// Variable currently held by `reg`.
    pub fn holder(&self, reg: R) -> Option<&IrVariable> {
        self.bindings.get_by_value(&reg)
    }

    /// Resolve `var` to a register for the instruction at `index`.
    ///
    /// Reuses an existing binding, then takes the first unbound register, then
    /// evicts the first variable whose last use lies before `index`.
    pub fn allocate(
        &mut self,
        var: &IrVariable,
        index: usize,
        last_use: &LastUseTable,
    ) -> Result<R, RegAllocError> {
        if let Some(reg) = self.get(var) {
            return Ok(reg);
        }

        if let Some(reg) = self.find_free() {
            log::trace!("bind {var} -> {reg}");
            self.bindings.replace(var.clone(), reg);
            return Ok(reg);
        }

        if let Some(reg) = self.find_dead(index, last_use) {
            if let Some(old) = self.holder(reg) {
                log::trace!("evict {old} from {reg}, bind {var}");
            }
            self.bindings.replace(var.clone(), reg);
            return Ok(reg);
        }

        Err(RegAllocError::NoRegistersAvailable {
            variable: var.to_string(),
            index,
        })
    }

    fn find_free(&self) -> Option<R> {
        self.allocatable
            .iter()
            .copied()
            .find(|reg| !self.bindings.contains_value(reg))
    }

    fn find_dead(&self, index: usize, last_use: &LastUseTable) -> Option<R> {
        self.allocatable.iter().copied().find(|reg| {
            self.bindings
                .get_by_value(reg)
                .is_some_and(|held| last_use.is_dead_at(held, index))
        })
    }

    pub fn is_allocated(&self, reg: R) -> bool {
        self.bindings.contains_value(&reg)
    }

    /// `(bound, total)` register counts.
    pub fn usage(&self) -> (usize, usize) {
        (self.bindings.len(), self.allocatable.len())
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&IrVariable, &R)> {
        self.bindings.iter()
    }

    /// Drop every binding.
    pub fn reset(&mut self) {
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Instruction;

    fn var(name: &str) -> IrVariable {
        IrVariable::named(name)
    }

    #[test]
    fn test_register_allocation() {
        let table = LastUseTable::build(&[Instruction::add(var("c"), var("a"), var("b"))]);
        let mut regfile = RegisterFile::new(vec![1u8, 2, 3]);

        let first = regfile.allocate(&var("a"), 1, &table).unwrap();
        let second = regfile.allocate(&var("b"), 1, &table).unwrap();
        assert_eq!((first, second), (1, 2));
        assert_eq!(regfile.allocate(&var("a"), 1, &table).unwrap(), 1);
        assert_eq!(regfile.usage(), (2, 3));
    }

    #[test]
    fn test_dead_variable_is_evicted() {
        let insts = vec![
            Instruction::mov(var("a"), 1),
            Instruction::mov(var("b"), 2),
            Instruction::mov(var("c"), var("b")),
        ];
        let table = LastUseTable::build(&insts);
        let mut regfile = RegisterFile::new(vec![1u8, 2]);

        regfile.allocate(&var("a"), 1, &table).unwrap();
        regfile.allocate(&var("b"), 2, &table).unwrap();

        // `a` was last used at 1, so it gives up its register at 3.
        let reg = regfile.allocate(&var("c"), 3, &table).unwrap();
        assert_eq!(reg, 1);
        assert_eq!(regfile.get(&var("a")), None);
        assert_eq!(regfile.holder(1), Some(&var("c")));
    }

    #[test]
    fn test_live_variables_are_not_evicted() {
        let insts = vec![
            Instruction::mov(var("a"), 1),
            Instruction::mov(var("b"), 2),
            Instruction::add(var("c"), var("a"), var("b")),
        ];
        let table = LastUseTable::build(&insts);
        let mut regfile = RegisterFile::new(vec![1u8, 2]);

        regfile.allocate(&var("a"), 1, &table).unwrap();
        regfile.allocate(&var("b"), 2, &table).unwrap();

        let err = regfile.allocate(&var("c"), 3, &table).unwrap_err();
        assert_eq!(
            err,
            RegAllocError::NoRegistersAvailable { variable: "c".to_string(), index: 3 }
        );
    }

    #[test]
    fn test_bindings_stay_one_to_one() {
        let insts = vec![
            Instruction::mov(var("a"), 1),
            Instruction::mov(var("b"), var("a")),
            Instruction::mov(var("c"), var("b")),
            Instruction::mov(var("d"), var("c")),
        ];
        let table = LastUseTable::build(&insts);
        let mut regfile = RegisterFile::new(vec![1u8, 2]);

        for (pos, inst) in insts.iter().enumerate() {
            let index = pos + 1;
            for var in inst.result().into_iter().chain(inst.used_variables()) {
                regfile.allocate(var, index, &table).unwrap();
            }

            let mut regs: Vec<u8> = regfile.bindings().map(|(_, reg)| *reg).collect();
            let bound = regs.len();
            regs.sort_unstable();
            regs.dedup();
            assert_eq!(regs.len(), bound, "register shared at {index}");
            for (held, reg) in regfile.bindings() {
                assert_eq!(regfile.get(held), Some(*reg));
            }
        }
        assert_eq!(regfile.holder(2), Some(&var("d")));
    }

    #[test]
    fn test_reset() {
        let table = LastUseTable::default();
        let mut regfile = RegisterFile::new(vec![7u8]);
        regfile.allocate(&var("x"), 1, &table).unwrap();
        assert!(regfile.is_allocated(7));

        regfile.reset();
        assert!(!regfile.is_allocated(7));
    }
}
