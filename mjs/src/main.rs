//! mjs CLI

use clap::{Parser, Subcommand};
use mjs::ast::Program;
use mjs::interp::Interpreter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mjs", version, about = "mjs - tiny JS-like scope engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a program (JSON statement tree)
    Run {
        /// Program file to execute
        file: PathBuf,
        /// Original script source, for span-accurate error reports
        #[arg(long)]
        source: Option<PathBuf>,
        /// Dump the root symbol table after execution
        #[arg(long)]
        trace: bool,
    },
    /// Load a program and pretty-print its AST (debug)
    Dump {
        /// Program file to load
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run {
            file,
            source,
            trace,
        } => run_file(&file, source.as_deref(), trace),
        Command::Dump { file } => dump_file(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_program(path: &Path) -> mjs::Result<Program> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn run_file(path: &Path, source: Option<&Path>, trace: bool) -> mjs::Result<()> {
    let program = load_program(path)?;
    let mut interp = Interpreter::new();

    match interp.run(&program) {
        Ok(value) => {
            println!("=> {value}");
            if trace {
                println!("Symbol table:");
                print!("{}", interp.root_env().borrow().trace());
            }
            Ok(())
        }
        Err(e) => {
            // a failing script halts the script, not the process state:
            // report and exit with a failure code
            let e = mjs::ScriptError::from(e);
            match source {
                Some(source_path) => {
                    let source_text = std::fs::read_to_string(source_path)?;
                    mjs::error::report_error(
                        &source_path.display().to_string(),
                        &source_text,
                        &e,
                    );
                }
                None => eprintln!("Error: {e}"),
            }
            std::process::exit(1);
        }
    }
}

fn dump_file(path: &Path) -> mjs::Result<()> {
    let program = load_program(path)?;
    println!("{program:#?}");
    Ok(())
}
