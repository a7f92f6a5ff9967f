//! Jack Compiler Library
//!
//! Compiles Jack (the high-level language of the Nand2Tetris platform) to
//! Hack VM instructions. Lexical analysis, parsing, and code generation are
//! fused into a single forward pass — there is no intermediate syntax tree.
//!
//! # Compiling a single class
//!
//! ```rust,ignore
//! use jackc::compile_class_source;
//!
//! let source = "class Main { function void main() { return; } }";
//! let mut vm = Vec::new();
//! compile_class_source(source, &mut vm)?;
//! # Ok::<(), jackc::CompileError>(())
//! ```

pub mod engine;
pub mod error;
pub mod symbol_table;
pub mod token;
pub mod tokenizer;
pub mod vm_writer;

pub use engine::{CompilationEngine, compile_class_source};
pub use error::CompileError;
pub use symbol_table::{Kind, SymbolTable};
pub use token::{Token, TokenKind};
pub use tokenizer::{TokenStream, strip_comments, tokenize};
pub use vm_writer::{ArithCommand, Segment, VmWriter};

use std::fs;
use std::io::BufWriter;
use std::path::Path;

/// Compile a single `.jack` file, writing the corresponding `.vm` file
/// alongside it (same stem, `.vm` extension).
///
/// The input is read fully into memory before tokenization starts; the
/// output file is held open for the duration of compilation and flushed
/// on success or dropped (closing the handle) on error.
pub fn compile_file(input: &Path) -> Result<(), CompileError> {
    let source = fs::read_to_string(input)?;
    let output_path = input.with_extension("vm");
    let out = BufWriter::new(fs::File::create(&output_path)?);
    compile_class_source(&source, out)
}
