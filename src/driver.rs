// This module wires the phases into one batch compilation. A single shared symbol table is
// created per compilation and handed to the scanner and, through observer registration, to
// the semantic analyzer. The parser runs once with three observers attached in a fixed
// order (semantic analysis, IR synthesis, production trace) and the finished IR program,
// temporaries counter included, moves into the assembly generator. Every intermediate
// artifact is kept on the CompileOutput so callers can inspect it or write the usual dump
// files next to each other in one directory.

//! End-to-end compilation driver.

use std::fs;
use std::path::Path;

use crate::core::{CompileError, CompileResult, SymbolTable};
use crate::ir::Instruction;
use crate::lexer::{LexicalAnalyzer, Token};
use crate::parser::{IrGenerator, ParseTable, ProductionCollector, SemanticAnalyzer, SyntaxAnalyzer};
use crate::riscv::{AsmInstruction, AssemblyGenerator, Reg};

/// Tunables of one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Number of temporaries handed to the allocator, taken from `t0` upwards.
    pub registers: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            registers: Reg::TEMPORARIES.len(),
        }
    }
}

impl CompilerConfig {
    pub fn validate(&self) -> CompileResult<()> {
        let max = Reg::TEMPORARIES.len();
        if self.registers == 0 || self.registers > max {
            return Err(CompileError::Config {
                reason: format!("registers must be between 1 and {max}, got {}", self.registers),
            });
        }
        Ok(())
    }

    /// Allocatable registers, in allocation order.
    pub fn allocatable(&self) -> Vec<Reg> {
        Reg::TEMPORARIES.iter().copied().take(self.registers).collect()
    }
}

/// Artifacts of a successful compilation.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub tokens: Vec<Token>,
    /// Symbol table right after scanning, types still empty.
    pub scanned_symbols: Vec<String>,
    /// Symbol table after semantic analysis.
    pub typed_symbols: Vec<String>,
    pub productions: Vec<String>,
    /// IR as synthesized, before preprocessing.
    pub ir: Vec<Instruction>,
    pub asm: Vec<AsmInstruction>,
}

impl CompileOutput {
    pub const TOKEN_FILE: &'static str = "token.txt";
    pub const OLD_SYMBOL_TABLE_FILE: &'static str = "old_symbol_table.txt";
    pub const PARSER_LIST_FILE: &'static str = "parser_list.txt";
    pub const NEW_SYMBOL_TABLE_FILE: &'static str = "new_symbol_table.txt";
    pub const IR_FILE: &'static str = "intermediate_code.txt";
    pub const ASM_FILE: &'static str = "assembly_language.asm";

    /// Assembly text, one instruction per line.
    pub fn assembly(&self) -> String {
        join_lines(self.asm.iter().map(ToString::to_string))
    }

    /// Write every dump into `dir`, creating it if needed.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> CompileResult<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let dumps = [
            (Self::TOKEN_FILE, join_lines(self.tokens.iter().map(ToString::to_string))),
            (Self::OLD_SYMBOL_TABLE_FILE, join_lines(self.scanned_symbols.iter().cloned())),
            (Self::PARSER_LIST_FILE, join_lines(self.productions.iter().cloned())),
            (Self::NEW_SYMBOL_TABLE_FILE, join_lines(self.typed_symbols.iter().cloned())),
            (Self::IR_FILE, join_lines(self.ir.iter().map(ToString::to_string))),
            (Self::ASM_FILE, self.assembly()),
        ];

        for (name, contents) in dumps {
            let path = dir.join(name);
            log::debug!("writing {}", path.display());
            fs::write(path, contents)?;
        }
        Ok(())
    }
}

fn join_lines(lines: impl Iterator<Item = String>) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Compile `source` through every phase.
pub fn compile(source: &str, config: &CompilerConfig) -> CompileResult<CompileOutput> {
    config.validate()?;
    let symbol_table = SymbolTable::shared();

    let mut lexer = LexicalAnalyzer::new(symbol_table.clone());
    lexer.run(source)?;
    let tokens = lexer.into_tokens();
    let scanned_symbols = symbol_table.borrow().dump_lines();
    log::debug!("scanned {} tokens, {} symbols", tokens.len(), scanned_symbols.len());

    let table = ParseTable::toy()?;
    let mut semantic = SemanticAnalyzer::new();
    let mut ir_generator = IrGenerator::new();
    let mut trace = ProductionCollector::new();
    {
        let mut parser = SyntaxAnalyzer::new(symbol_table.clone());
        parser.register_observer(&mut semantic);
        parser.register_observer(&mut ir_generator);
        parser.register_observer(&mut trace);
        let summary = parser.run(tokens.iter().cloned(), &table)?;
        log::debug!("parsed with {} shifts and {} reductions", summary.shifts, summary.reductions);
    }

    let typed_symbols = symbol_table.borrow().dump_lines();
    log::debug!("synthesized {} IR instructions", ir_generator.instructions().len());
    let program = ir_generator.finish();
    let ir = program.instructions.clone();

    let mut generator = AssemblyGenerator::with_registers(config.allocatable());
    generator.load_ir(program);
    generator.run()?;
    let asm = generator.instructions().to_vec();

    Ok(CompileOutput {
        tokens,
        scanned_symbols,
        typed_symbols,
        productions: trace.lines(),
        ir,
        asm,
    })
}
