// This module implements the IR synthesis observer. It keeps a value stack in lockstep with
// the parser's symbol stack: every shift pushes the IR value the token denotes (a named
// variable for identifiers, an immediate for integer literals, nothing for punctuation and
// keywords) and every reduction pops exactly the production body and pushes one replacement.
// Arithmetic reductions allocate a fresh temporary from the observer's own TempAllocator
// and emit ADD/SUB/MUL into it; assignment emits MOV, return emits RET; unit productions and
// parentheses forward the child value unchanged; all other productions yield nothing. The
// instruction list only ever grows. Named variables come from the symbol table contents at
// registration time, so the scanner must have run before the observer is registered.

//! IR synthesis observer.

use std::collections::HashMap;

use super::engine::ActionObserver;
use super::grammar::{Production, Rule};
use super::table::Status;
use crate::core::{CompileError, CompileResult, SharedSymbolTable};
use crate::ir::{BinaryOp, Instruction, IrProgram, IrValue, IrVariable, TempAllocator};
use crate::lexer::{Token, TokenKind};

/// Builds the IR instruction list from parser events.
#[derive(Default)]
pub struct IrGenerator {
    instructions: Vec<Instruction>,
    values: Vec<Option<IrValue>>,
    variables: HashMap<String, IrVariable>,
    temps: TempAllocator,
}

impl IrGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instructions emitted so far.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Current depth of the value stack.
    pub fn depth(&self) -> usize {
        self.values.len()
    }

    /// Hand over the instructions together with the temporary counter.
    pub fn finish(self) -> IrProgram {
        IrProgram::new(self.instructions, self.temps)
    }

    fn pop(&mut self) -> CompileResult<Option<IrValue>> {
        self.values
            .pop()
            .ok_or(CompileError::ObserverUnderflow { observer: "IR generator" })
    }

    /// Pop a slot that must carry a value.
    fn pop_value(&mut self, production: &Production) -> CompileResult<IrValue> {
        self.pop()?.ok_or_else(|| CompileError::IrSynthesis {
            reason: format!("missing operand while reducing {production}"),
        })
    }

    fn discard(&mut self, count: usize) -> CompileResult<()> {
        for _ in 0..count {
            self.pop()?;
        }
        Ok(())
    }

    fn binary(&mut self, op: BinaryOp, production: &Production) -> CompileResult<Option<IrValue>> {
        let rhs = self.pop_value(production)?;
        self.discard(1)?;
        let lhs = self.pop_value(production)?;
        let result = self.temps.fresh();
        self.emit(Instruction::binary(op, result.clone(), lhs, rhs));
        Ok(Some(IrValue::Variable(result)))
    }

    fn emit(&mut self, instruction: Instruction) {
        log::trace!("emit {instruction}");
        self.instructions.push(instruction);
    }
}

impl ActionObserver for IrGenerator {
    fn when_shift(&mut self, _status: Status, token: &Token) -> CompileResult<()> {
        let value = match (token.kind(), token.text()) {
            (TokenKind::Id, Some(name)) => {
                let var = self
                    .variables
                    .get(name)
                    .cloned()
                    .ok_or_else(|| CompileError::UndeclaredSymbol { name: name.to_string() })?;
                Some(IrValue::Variable(var))
            }
            (TokenKind::IntConst, Some(literal)) => {
                let value = literal.parse::<i32>().map_err(|_| CompileError::IrSynthesis {
                    reason: format!("invalid integer literal {literal}"),
                })?;
                Some(IrValue::Immediate(value))
            }
            _ => None,
        };
        self.values.push(value);
        Ok(())
    }

    fn when_reduce(&mut self, _status: Status, production: &Production) -> CompileResult<()> {
        let replacement = match Rule::of(production) {
            Some(Rule::Assign) => {
                // S -> id = E
                let value = self.pop_value(production)?;
                self.discard(1)?;
                let target = match self.pop_value(production)? {
                    IrValue::Variable(var) => var,
                    IrValue::Immediate(imm) => {
                        return Err(CompileError::IrSynthesis {
                            reason: format!("cannot assign to immediate {imm}"),
                        });
                    }
                };
                self.emit(Instruction::mov(target, value));
                None
            }
            Some(Rule::Return) => {
                // S -> return E
                let value = self.pop_value(production)?;
                self.discard(1)?;
                self.emit(Instruction::ret(value));
                None
            }
            Some(Rule::Add) => self.binary(BinaryOp::Add, production)?,
            Some(Rule::Sub) => self.binary(BinaryOp::Sub, production)?,
            Some(Rule::Mul) => self.binary(BinaryOp::Mul, production)?,
            Some(Rule::ExprTerm | Rule::TermFactor | Rule::FactorId | Rule::FactorConst) => {
                self.pop()?
            }
            Some(Rule::Paren) => {
                // B -> ( E )
                self.discard(1)?;
                let inner = self.pop()?;
                self.discard(1)?;
                inner
            }
            _ => {
                self.discard(production.body().len())?;
                None
            }
        };
        self.values.push(replacement);
        Ok(())
    }

    fn when_accept(&mut self, _status: Status) -> CompileResult<()> {
        log::debug!("IR synthesis produced {} instructions", self.instructions.len());
        Ok(())
    }

    fn set_symbol_table(&mut self, table: SharedSymbolTable) {
        self.variables = table
            .borrow()
            .names()
            .map(|name| (name.to_string(), IrVariable::named(name)))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SymbolTable;
    use crate::lexer::LexicalAnalyzer;
    use crate::parser::{ParseSummary, ParseTable, SyntaxAnalyzer};

    fn synthesize(source: &str) -> CompileResult<IrProgram> {
        let table = SymbolTable::shared();
        let mut lexer = LexicalAnalyzer::new(table.clone());
        lexer.run(source)?;

        let lr = ParseTable::toy()?;
        let mut generator = IrGenerator::new();
        {
            let mut parser = SyntaxAnalyzer::new(table);
            parser.register_observer(&mut generator);
            parser.run(lexer.into_tokens(), &lr)?;
        }
        // The program reduces to a single `P` slot.
        assert_eq!(generator.depth(), 1);
        Ok(generator.finish())
    }

    /// Delegates to an `IrGenerator` and checks its value stack against the
    /// symbol stack depth implied by every event.
    struct Lockstep<'a> {
        inner: &'a mut IrGenerator,
        expected: usize,
        checks: usize,
    }

    impl ActionObserver for Lockstep<'_> {
        fn when_shift(&mut self, status: Status, token: &Token) -> CompileResult<()> {
            assert_eq!(self.inner.depth(), self.expected);
            self.inner.when_shift(status, token)?;
            self.expected += 1;
            assert_eq!(self.inner.depth(), self.expected, "after shifting {token}");
            self.checks += 1;
            Ok(())
        }

        fn when_reduce(&mut self, status: Status, production: &Production) -> CompileResult<()> {
            assert_eq!(self.inner.depth(), self.expected);
            let len = production.body().len();
            assert!(self.expected >= len, "stack shorter than {production}");
            self.inner.when_reduce(status, production)?;
            self.expected = self.expected - len + 1;
            assert_eq!(self.inner.depth(), self.expected, "after reducing {production}");
            self.checks += 1;
            Ok(())
        }

        fn when_accept(&mut self, status: Status) -> CompileResult<()> {
            self.inner.when_accept(status)
        }

        fn set_symbol_table(&mut self, table: SharedSymbolTable) {
            self.inner.set_symbol_table(table);
        }
    }

    fn lockstep_checks(source: &str) -> CompileResult<(usize, ParseSummary)> {
        let table = SymbolTable::shared();
        let mut lexer = LexicalAnalyzer::new(table.clone());
        lexer.run(source)?;

        let lr = ParseTable::toy()?;
        let mut generator = IrGenerator::new();
        let mut lockstep = Lockstep {
            inner: &mut generator,
            expected: 0,
            checks: 0,
        };
        let summary = {
            let mut parser = SyntaxAnalyzer::new(table);
            parser.register_observer(&mut lockstep);
            parser.run(lexer.into_tokens(), &lr)?
        };
        assert_eq!(lockstep.expected, 1);
        Ok((lockstep.checks, summary))
    }

    #[test]
    fn test_value_stack_tracks_symbol_stack() {
        for source in [
            "int a; a = (1 - (2 * b)) * (c + 3) - 4; return a * (a - 1);",
            "return ((((7))));",
            "int x; int y; x = 2; y = x * 3 + (x - 1) * 4 - 5; return y;",
        ] {
            let (checks, summary) = lockstep_checks(source).unwrap();
            assert_eq!(checks, summary.shifts + summary.reductions, "{source}");
        }
    }

    #[test]
    fn test_assignment_and_return() {
        let program = synthesize("int a; a = 1 + 2; return a;").unwrap();
        assert_eq!(
            program.dump_lines(),
            vec!["(ADD, $0, 1, 2)", "(MOV, a, $0)", "(RET, a)"]
        );
        assert_eq!(program.temps.issued(), 1);
    }

    #[test]
    fn test_precedence_and_parentheses() {
        let program = synthesize("int r; r = (a - 2) * b + c; return r;").unwrap();
        assert_eq!(
            program.dump_lines(),
            vec![
                "(SUB, $0, a, 2)",
                "(MUL, $1, $0, b)",
                "(ADD, $2, $1, c)",
                "(MOV, r, $2)",
                "(RET, r)",
            ]
        );
    }

    #[test]
    fn test_left_associativity() {
        let program = synthesize("return 10 - 4 - 3;").unwrap();
        assert_eq!(
            program.dump_lines(),
            vec!["(SUB, $0, 10, 4)", "(SUB, $1, $0, 3)", "(RET, $1)"]
        );
    }

    #[test]
    fn test_declarations_emit_nothing() {
        let program = synthesize("int a; int b;").unwrap();
        assert!(program.instructions.is_empty());
    }

    #[test]
    fn test_unknown_identifier_is_rejected() {
        let mut generator = IrGenerator::new();
        generator.set_symbol_table(SymbolTable::shared());

        let err = generator.when_shift(Status(0), &Token::id("nope")).unwrap_err();
        assert!(matches!(err, CompileError::UndeclaredSymbol { .. }));
    }
}
