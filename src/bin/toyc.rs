//! Command line front end for toyc.
//!
//! Compiles one source file and prints the assembly, or writes every dump
//! into an output directory when `-o` is given.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use toyc::{compile, CompilerConfig};

#[derive(Parser, Debug)]
#[clap(name = "toyc")]
#[clap(about = "Compile toy language sources to RISC-V assembly")]
struct Args {
    /// Source file to compile.
    input: PathBuf,

    /// Directory receiving token, symbol table, trace, IR and assembly dumps.
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Number of allocatable temporaries (1-7).
    #[clap(long, default_value_t = 7)]
    registers: usize,

    /// Raise log verbosity (-v debug, -vv trace).
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> toyc::CompileResult<()> {
    let source = fs::read_to_string(&args.input)?;
    let config = CompilerConfig {
        registers: args.registers,
    };
    let output = compile(&source, &config)?;

    match &args.output {
        Some(dir) => {
            output.write_to(dir)?;
            log::info!("wrote dumps to {}", dir.display());
        }
        None => print!("{}", output.assembly()),
    }
    Ok(())
}
