//! Jack Compiler CLI
//!
//! Command-line interface for compiling `.jack` source files to Hack VM
//! instructions.

use clap::Parser as ClapParser;
use std::path::{Path, PathBuf};
use std::process;

#[derive(ClapParser)]
#[command(name = "jackc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Jack compiler - compile .jack source to Hack VM instructions", long_about = None)]
struct Cli {
    /// A .jack file, or a directory containing .jack files
    path: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    if !cli.path.exists() {
        eprintln!("Error: {} does not exist", cli.path.display());
        process::exit(1);
    }

    let had_failure = if cli.path.is_dir() {
        run_directory(&cli.path)
    } else {
        run_file(&cli.path)
    };

    if had_failure {
        process::exit(1);
    }
}

/// Compile every immediate `.jack` child of `dir`, sorted for
/// deterministic order. One file's failure does not stop the batch.
fn run_directory(dir: &Path) -> bool {
    let mut entries: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "jack"))
            .collect(),
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir.display(), e);
            return true;
        }
    };
    entries.sort();

    if entries.is_empty() {
        eprintln!("Warning: no .jack files found in {}", dir.display());
    }

    let mut had_failure = false;
    for path in &entries {
        if run_file(path) {
            had_failure = true;
        }
    }
    had_failure
}

/// Compile one `.jack` file. Returns true if compilation failed.
fn run_file(path: &Path) -> bool {
    match jackc::compile_file(path) {
        Ok(()) => {
            println!("Compiled {} -> {}", path.display(), path.with_extension("vm").display());
            false
        }
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            true
        }
    }
}
