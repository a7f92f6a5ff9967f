//! Recursive-descent parser fused with VM code generation.
//!
//! Every `compile_*` method observes one invariant: on entry the token
//! cursor points at the first token of the non-terminal it compiles; on
//! exit the cursor points at the first token after it. There is no
//! intermediate tree — each method both consumes grammar and emits VM
//! lines as it goes.

use crate::error::CompileError;
use crate::symbol_table::{Kind, SymbolTable};
use crate::token::{Token, TokenKind};
use crate::tokenizer::{TokenStream, strip_comments, tokenize};
use crate::vm_writer::{ArithCommand, Segment, VmWriter};
use std::io::Write;

pub struct CompilationEngine<W: Write> {
    tokens: TokenStream,
    table: SymbolTable,
    writer: VmWriter<W>,
    class_name: String,
    label_count: u32,
}

impl<W: Write> CompilationEngine<W> {
    /// Strip comments, tokenize `source`, and build an engine ready to
    /// compile one class into VM text written to `out`.
    pub fn new(source: &str, out: W) -> Result<Self, CompileError> {
        let stripped = strip_comments(source)?;
        let tokens = tokenize(&stripped)?;
        Ok(CompilationEngine {
            tokens: TokenStream::new(tokens),
            table: SymbolTable::new(),
            writer: VmWriter::new(out),
            class_name: String::new(),
            label_count: 0,
        })
    }

    /// Compile the single class in the token stream and flush the
    /// emitted VM text.
    pub fn compile(mut self) -> Result<(), CompileError> {
        self.compile_class()?;
        self.writer.finish()?;
        Ok(())
    }

    // -- cursor primitives -------------------------------------------------

    fn advance(&mut self) {
        self.tokens.advance();
    }

    fn cur(&self) -> Result<&Token, CompileError> {
        self.tokens.current().ok_or_else(|| {
            let (line, column) = self.tokens.eof_position();
            CompileError::syntax("unexpected end of input", line, column)
        })
    }

    fn expect_symbol(&mut self, ch: char) -> Result<(), CompileError> {
        let tok = self.cur()?;
        if !tok.is_symbol(ch) {
            return Err(CompileError::syntax(
                format!("expected '{ch}', found '{}'", tok.text),
                tok.line,
                tok.column,
            ));
        }
        self.advance();
        Ok(())
    }

    fn expect_keyword(&mut self, word: &str) -> Result<(), CompileError> {
        let tok = self.cur()?;
        if !tok.is_keyword(word) {
            return Err(CompileError::syntax(
                format!("expected '{word}', found '{}'", tok.text),
                tok.line,
                tok.column,
            ));
        }
        self.advance();
        Ok(())
    }

    fn expect_identifier(&mut self) -> Result<Token, CompileError> {
        let tok = self.cur()?.clone();
        if tok.kind != TokenKind::Identifier {
            return Err(CompileError::syntax(
                format!("expected identifier, found '{}'", tok.text),
                tok.line,
                tok.column,
            ));
        }
        self.advance();
        Ok(tok)
    }

    /// `int | char | boolean | className`
    fn expect_type(&mut self) -> Result<String, CompileError> {
        let tok = self.cur()?.clone();
        let is_primitive =
            tok.kind == TokenKind::Keyword && matches!(tok.text.as_str(), "int" | "char" | "boolean");
        if !(is_primitive || tok.kind == TokenKind::Identifier) {
            return Err(CompileError::syntax(
                format!("expected a type, found '{}'", tok.text),
                tok.line,
                tok.column,
            ));
        }
        self.advance();
        Ok(tok.text)
    }

    /// `void | int | char | boolean | className` — consumed and discarded;
    /// no type checking is performed on return types.
    fn skip_return_type(&mut self) -> Result<(), CompileError> {
        let tok = self.cur()?.clone();
        let ok = tok.kind == TokenKind::Identifier
            || (tok.kind == TokenKind::Keyword
                && matches!(tok.text.as_str(), "void" | "int" | "char" | "boolean"));
        if !ok {
            return Err(CompileError::syntax(
                format!("expected a return type, found '{}'", tok.text),
                tok.line,
                tok.column,
            ));
        }
        self.advance();
        Ok(())
    }

    fn next_label(&mut self) -> u32 {
        let n = self.label_count;
        self.label_count += 1;
        n
    }

    // -- class & declarations -----------------------------------------------

    fn compile_class(&mut self) -> Result<(), CompileError> {
        self.advance(); // prime: cursor starts before the first token
        self.expect_keyword("class")?;
        let name_tok = self.expect_identifier()?;
        self.class_name = name_tok.text;
        self.expect_symbol('{')?;

        loop {
            let tok = self.cur()?;
            match tok.text.as_str() {
                "static" | "field" => self.compile_class_var_dec()?,
                "constructor" | "function" | "method" => self.compile_subroutine()?,
                "}" => break,
                other => {
                    return Err(CompileError::syntax(
                        format!("expected a class member, found '{other}'"),
                        tok.line,
                        tok.column,
                    ));
                }
            }
        }
        self.expect_symbol('}')?;
        Ok(())
    }

    fn compile_class_var_dec(&mut self) -> Result<(), CompileError> {
        let kind = match self.cur()?.text.as_str() {
            "static" => Kind::Static,
            "field" => Kind::Field,
            other => unreachable!("compile_class_var_dec dispatched on '{other}'"),
        };
        self.advance();
        let var_type = self.expect_type()?;
        loop {
            let name_tok = self.expect_identifier()?;
            self.table
                .define(&name_tok.text, &var_type, kind, name_tok.line, name_tok.column)?;
            if self.cur()?.is_symbol(',') {
                self.advance();
                continue;
            }
            break;
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_subroutine(&mut self) -> Result<(), CompileError> {
        self.table.start_subroutine();
        let keyword_tok = self.cur()?.clone();
        self.advance();

        if keyword_tok.text == "method" {
            let class_name = self.class_name.clone();
            self.table
                .define("this", &class_name, Kind::Arg, keyword_tok.line, keyword_tok.column)?;
        }

        self.skip_return_type()?;
        let name_tok = self.expect_identifier()?;
        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;
        self.expect_symbol('{')?;

        while self.cur()?.is_keyword("var") {
            self.compile_var_dec()?;
        }

        let n_locals = self.table.var_count(Kind::Var);
        let full_name = format!("{}.{}", self.class_name, name_tok.text);
        self.writer.write_function(&full_name, n_locals)?;

        match keyword_tok.text.as_str() {
            "constructor" => {
                let n_fields = self.table.var_count(Kind::Field);
                self.writer.write_push(Segment::Constant, n_fields)?;
                self.writer.write_call("Memory.alloc", 1)?;
                self.writer.write_pop(Segment::Pointer, 0)?;
            }
            "method" => {
                self.writer.write_push(Segment::Argument, 0)?;
                self.writer.write_pop(Segment::Pointer, 0)?;
            }
            _ => {}
        }

        self.compile_statements()?;
        self.expect_symbol('}')?;
        Ok(())
    }

    fn compile_parameter_list(&mut self) -> Result<(), CompileError> {
        if self.cur()?.is_symbol(')') {
            return Ok(());
        }
        loop {
            let var_type = self.expect_type()?;
            let name_tok = self.expect_identifier()?;
            self.table
                .define(&name_tok.text, &var_type, Kind::Arg, name_tok.line, name_tok.column)?;
            if self.cur()?.is_symbol(',') {
                self.advance();
                continue;
            }
            break;
        }
        Ok(())
    }

    fn compile_var_dec(&mut self) -> Result<(), CompileError> {
        self.expect_keyword("var")?;
        let var_type = self.expect_type()?;
        loop {
            let name_tok = self.expect_identifier()?;
            self.table
                .define(&name_tok.text, &var_type, Kind::Var, name_tok.line, name_tok.column)?;
            if self.cur()?.is_symbol(',') {
                self.advance();
                continue;
            }
            break;
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    // -- statements -----------------------------------------------------------

    fn compile_statements(&mut self) -> Result<(), CompileError> {
        loop {
            let tok = self.cur()?;
            match tok.text.as_str() {
                "let" => self.compile_let()?,
                "if" => self.compile_if()?,
                "while" => self.compile_while()?,
                "do" => self.compile_do()?,
                "return" => self.compile_return()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn compile_let(&mut self) -> Result<(), CompileError> {
        self.expect_keyword("let")?;
        let name_tok = self.expect_identifier()?;
        let kind = self.table.kind_of(&name_tok.text);
        if kind == Kind::None {
            return Err(CompileError::semantic(
                format!("undefined variable '{}'", name_tok.text),
                name_tok.line,
                name_tok.column,
            ));
        }
        let base_index = self.table.index_of(&name_tok.text).unwrap();
        let segment = Segment::from_kind(kind);

        if self.cur()?.is_symbol('[') {
            self.advance();
            self.writer.write_push(segment, base_index)?;
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.writer.write_arithmetic(ArithCommand::Add)?;

            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;

            // RHS is computed and stashed before THAT is repointed, so an
            // RHS that itself indexes an array can't clobber the target
            // address we just computed.
            self.writer.write_pop(Segment::Temp, 0)?;
            self.writer.write_pop(Segment::Pointer, 1)?;
            self.writer.write_push(Segment::Temp, 0)?;
            self.writer.write_pop(Segment::That, 0)?;
        } else {
            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;
            self.writer.write_pop(segment, base_index)?;
        }
        Ok(())
    }

    fn compile_if(&mut self) -> Result<(), CompileError> {
        self.expect_keyword("if")?;
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.writer.write_arithmetic(ArithCommand::Not)?;

        let n = self.next_label();
        let false_label = format!("IF_FALSE_{n}");
        let end_label = format!("IF_END_{n}");
        self.writer.write_if(&false_label)?;

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        if self.cur()?.is_keyword("else") {
            self.writer.write_goto(&end_label)?;
            self.writer.write_label(&false_label)?;
            self.advance();
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
            self.writer.write_label(&end_label)?;
        } else {
            self.writer.write_label(&false_label)?;
        }
        Ok(())
    }

    fn compile_while(&mut self) -> Result<(), CompileError> {
        let n = self.next_label();
        let start_label = format!("WHILE_START_{n}");
        let end_label = format!("WHILE_END_{n}");

        self.expect_keyword("while")?;
        self.writer.write_label(&start_label)?;
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.writer.write_arithmetic(ArithCommand::Not)?;
        self.writer.write_if(&end_label)?;

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        self.writer.write_goto(&start_label)?;
        self.writer.write_label(&end_label)?;
        Ok(())
    }

    fn compile_do(&mut self) -> Result<(), CompileError> {
        self.expect_keyword("do")?;
        let name_tok = self.expect_identifier()?;
        self.compile_subroutine_call_tail(&name_tok.text, name_tok.line, name_tok.column)?;
        self.expect_symbol(';')?;
        self.writer.write_pop(Segment::Temp, 0)?;
        Ok(())
    }

    fn compile_return(&mut self) -> Result<(), CompileError> {
        self.expect_keyword("return")?;
        if self.cur()?.is_symbol(';') {
            self.writer.write_push(Segment::Constant, 0)?;
        } else {
            self.compile_expression()?;
        }
        self.expect_symbol(';')?;
        self.writer.write_return()?;
        Ok(())
    }

    // -- expressions & terms --------------------------------------------------

    fn compile_expression(&mut self) -> Result<(), CompileError> {
        self.compile_term()?;
        loop {
            let tok = self.cur()?;
            if tok.kind != TokenKind::Symbol {
                break;
            }
            let op = tok.text.chars().next().unwrap();
            if !"+-*/&|<>=".contains(op) {
                break;
            }
            self.advance();
            self.compile_term()?;
            match op {
                '+' => self.writer.write_arithmetic(ArithCommand::Add)?,
                '-' => self.writer.write_arithmetic(ArithCommand::Sub)?,
                '&' => self.writer.write_arithmetic(ArithCommand::And)?,
                '|' => self.writer.write_arithmetic(ArithCommand::Or)?,
                '<' => self.writer.write_arithmetic(ArithCommand::Lt)?,
                '>' => self.writer.write_arithmetic(ArithCommand::Gt)?,
                '=' => self.writer.write_arithmetic(ArithCommand::Eq)?,
                '*' => self.writer.write_call("Math.multiply", 2)?,
                '/' => self.writer.write_call("Math.divide", 2)?,
                _ => unreachable!(),
            }
        }
        Ok(())
    }

    fn compile_term(&mut self) -> Result<(), CompileError> {
        let tok = self.cur()?.clone();
        match tok.kind {
            TokenKind::IntConst => {
                let value: u16 = tok
                    .text
                    .parse()
                    .expect("tokenizer guarantees int constants fit in 0..=32767");
                self.writer.write_push(Segment::Constant, value)?;
                self.advance();
            }
            TokenKind::StringConst => {
                self.compile_string_constant(&tok.text)?;
                self.advance();
            }
            TokenKind::Keyword if matches!(tok.text.as_str(), "true" | "false" | "null" | "this") => {
                match tok.text.as_str() {
                    "this" => self.writer.write_push(Segment::Pointer, 0)?,
                    "true" => {
                        self.writer.write_push(Segment::Constant, 0)?;
                        self.writer.write_arithmetic(ArithCommand::Not)?;
                    }
                    _ => self.writer.write_push(Segment::Constant, 0)?, // false, null
                }
                self.advance();
            }
            TokenKind::Symbol if tok.text == "(" => {
                self.advance();
                self.compile_expression()?;
                self.expect_symbol(')')?;
            }
            TokenKind::Symbol if tok.text == "-" || tok.text == "~" => {
                self.advance();
                self.compile_term()?;
                self.writer.write_arithmetic(if tok.text == "-" {
                    ArithCommand::Neg
                } else {
                    ArithCommand::Not
                })?;
            }
            TokenKind::Identifier => self.compile_identifier_term(&tok)?,
            _ => {
                return Err(CompileError::syntax(
                    format!("unexpected token '{}' in expression", tok.text),
                    tok.line,
                    tok.column,
                ));
            }
        }
        Ok(())
    }

    /// Disambiguates a leading identifier into array access, a
    /// subroutine call, or a plain variable read via one token of
    /// lookahead.
    fn compile_identifier_term(&mut self, tok: &Token) -> Result<(), CompileError> {
        let name = tok.text.clone();
        let peeked_symbol = |stream: &TokenStream, ch: char| {
            stream.peek_next().is_some_and(|next| next.is_symbol(ch))
        };

        if peeked_symbol(&self.tokens, '[') {
            self.advance(); // consume name
            let kind = self.table.kind_of(&name);
            if kind == Kind::None {
                return Err(CompileError::semantic(
                    format!("undefined variable '{name}'"),
                    tok.line,
                    tok.column,
                ));
            }
            let idx = self.table.index_of(&name).unwrap();
            self.expect_symbol('[')?;
            self.writer.write_push(Segment::from_kind(kind), idx)?;
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.writer.write_arithmetic(ArithCommand::Add)?;
            self.writer.write_pop(Segment::Pointer, 1)?;
            self.writer.write_push(Segment::That, 0)?;
        } else if peeked_symbol(&self.tokens, '(') || peeked_symbol(&self.tokens, '.') {
            self.advance(); // consume name
            self.compile_subroutine_call_tail(&name, tok.line, tok.column)?;
        } else {
            let kind = self.table.kind_of(&name);
            if kind == Kind::None {
                return Err(CompileError::semantic(
                    format!("undefined variable '{name}'"),
                    tok.line,
                    tok.column,
                ));
            }
            let idx = self.table.index_of(&name).unwrap();
            self.writer.write_push(Segment::from_kind(kind), idx)?;
            self.advance();
        }
        Ok(())
    }

    /// Compiles the `'(' expressionList ')'` or `'.' name '(' expressionList ')'`
    /// tail of a subroutine call. The cursor must be at `(` or `.` on entry;
    /// `name` is the identifier already consumed before it.
    fn compile_subroutine_call_tail(
        &mut self,
        name: &str,
        line: usize,
        column: usize,
    ) -> Result<(), CompileError> {
        if self.cur()?.is_symbol('(') {
            // Unqualified call: a method of the current class, `this` implicit.
            self.advance();
            self.writer.write_push(Segment::Pointer, 0)?;
            let n_args = self.compile_expression_list()?;
            self.expect_symbol(')')?;
            self.writer
                .write_call(&format!("{}.{name}", self.class_name), n_args + 1)?;
            Ok(())
        } else if self.cur()?.is_symbol('.') {
            self.advance();
            let name2_tok = self.expect_identifier()?;
            self.expect_symbol('(')?;

            let kind = self.table.kind_of(name);
            if kind == Kind::None {
                // `name` is a class name: static function or constructor call.
                let n_args = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                self.writer
                    .write_call(&format!("{name}.{}", name2_tok.text), n_args)?;
            } else {
                // `name` is a known variable: method call on that instance.
                let idx = self.table.index_of(name).unwrap();
                let receiver_type = self.table.type_of(name).unwrap().to_string();
                self.writer.write_push(Segment::from_kind(kind), idx)?;
                let n_args = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                self.writer
                    .write_call(&format!("{receiver_type}.{}", name2_tok.text), n_args + 1)?;
            }
            Ok(())
        } else {
            Err(CompileError::syntax(
                format!("expected '(' or '.' after '{name}'"),
                line,
                column,
            ))
        }
    }

    fn compile_expression_list(&mut self) -> Result<u16, CompileError> {
        if self.cur()?.is_symbol(')') {
            return Ok(0);
        }
        let mut count = 0u16;
        loop {
            self.compile_expression()?;
            count += 1;
            if self.cur()?.is_symbol(',') {
                self.advance();
                continue;
            }
            break;
        }
        Ok(count)
    }

    fn compile_string_constant(&mut self, s: &str) -> Result<(), CompileError> {
        self.writer
            .write_push(Segment::Constant, s.chars().count() as u16)?;
        self.writer.write_call("String.new", 1)?;
        for c in s.chars() {
            self.writer.write_push(Segment::Constant, c as u16)?;
            self.writer.write_call("String.appendChar", 2)?;
        }
        Ok(())
    }
}

/// Compile one Jack class from source text, writing VM instructions to
/// `out`. Convenience wrapper around [`CompilationEngine`] for callers
/// that don't need to hold the engine across multiple calls.
pub fn compile_class_source<W: Write>(source: &str, out: W) -> Result<(), CompileError> {
    CompilationEngine::new(source, out)?.compile()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(source: &str) -> String {
        let mut buf = Vec::new();
        compile_class_source(source, &mut buf).expect("compilation should succeed");
        String::from_utf8(buf).unwrap()
    }

    fn compile_err(source: &str) -> CompileError {
        let mut buf = Vec::new();
        compile_class_source(source, &mut buf).expect_err("compilation should fail")
    }

    fn lines(vm: &str) -> Vec<&str> {
        vm.lines().collect()
    }

    #[test]
    fn constructor_entry_allocates_and_returns_this() {
        let src = "class Point { field int x, y; \
            constructor Point new(int ax, int ay) { let x = ax; let y = ay; return this; } }";
        let vm = compile(src);
        let ls = lines(&vm);
        assert_eq!(
            &ls[..4],
            &[
                "function Point.new 0",
                "push constant 2",
                "call Memory.alloc 1",
                "pop pointer 0",
            ]
        );
        assert_eq!(&ls[ls.len() - 2..], &["push pointer 0", "return"]);
    }

    #[test]
    fn method_receiver_binds_this_from_argument_zero() {
        let src = "class Point { field int x; method int get() { return x; } }";
        let vm = compile(src);
        assert_eq!(
            lines(&vm),
            vec![
                "function Point.get 0",
                "push argument 0",
                "pop pointer 0",
                "push this 0",
                "return",
            ]
        );
    }

    #[test]
    fn operators_emit_left_to_right_with_no_precedence() {
        let src = "class Main { function void main() { do Output.printInt(1 + 2 * 3); } }";
        let vm = compile(src);
        let ls = lines(&vm);
        assert_eq!(
            &ls[1..6],
            &[
                "push constant 1",
                "push constant 2",
                "add",
                "push constant 3",
                "call Math.multiply 2",
            ]
        );
    }

    #[test]
    fn array_store_sequences_base_then_rhs_then_that() {
        let src = "class Main { function void main(Array a, int i, int j) { let a[i] = a[j]; return; } }";
        let vm = compile(src);
        let ls = lines(&vm);
        // push a, push i, add ; push a, push j, add, pop pointer 1, push that 0 ; pop temp 0 ; pop pointer 1 ; push temp 0 ; pop that 0
        assert_eq!(
            &ls[1..13],
            &[
                "push argument 0",
                "push argument 1",
                "add",
                "push argument 0",
                "push argument 2",
                "add",
                "pop pointer 1",
                "push that 0",
                "pop temp 0",
                "pop pointer 1",
                "push temp 0",
                "pop that 0",
            ]
        );
    }

    #[test]
    fn nested_if_else_labels_are_unique_and_increasing() {
        let src = "class Main { function void main(int a, int b) { \
            if (a) { if (b) { let a = 1; } else { let a = 2; } } else { let a = 3; } return; } }";
        let vm = compile(src);
        let labels: Vec<&str> = vm
            .lines()
            .filter(|l| l.starts_with("label ") || l.starts_with("if-goto ") || l.starts_with("goto "))
            .collect();
        // Inner if gets labels suffixed _1 (allocated after the outer if's _0).
        assert!(labels.iter().any(|l| l.contains("IF_FALSE_0")));
        assert!(labels.iter().any(|l| l.contains("IF_FALSE_1")));
        assert!(labels.iter().any(|l| l.contains("IF_END_1")));

        let mut unique = std::collections::HashSet::new();
        for l in vm.lines().filter(|l| l.starts_with("label ")) {
            assert!(unique.insert(l.to_string()), "duplicate label: {l}");
        }
    }

    #[test]
    fn do_statement_discards_return_value() {
        let src = "class Main { function void main() { do Screen.clearScreen(); return; } }";
        let vm = compile(src);
        let ls = lines(&vm);
        assert_eq!(&ls[1..3], &["call Screen.clearScreen 0", "pop temp 0"]);
    }

    #[test]
    fn string_literal_emits_new_and_append_char_pairs() {
        let src = r#"class Main { function void main() { do Output.printString("Hi"); return; } }"#;
        let vm = compile(src);
        let ls = lines(&vm);
        assert_eq!(
            &ls[1..7],
            &[
                "push constant 2",
                "call String.new 1",
                "push constant 72",
                "call String.appendChar 2",
                "push constant 105",
                "call String.appendChar 2",
            ]
        );
    }

    #[test]
    fn while_loop_labels_bracket_the_body() {
        let src = "class Main { function void main(int i) { while (i) { let i = 0; } return; } }";
        let vm = compile(src);
        let ls = lines(&vm);
        assert_eq!(ls[1], "label WHILE_START_0");
        assert_eq!(ls[ls.len() - 4], "goto WHILE_START_0");
        assert_eq!(ls[ls.len() - 3], "label WHILE_END_0");
    }

    #[test]
    fn unqualified_call_passes_implicit_this() {
        let src = "class Main { function void main() { do helper(); return; } \
            method void helper() { return; } }";
        let vm = compile(src);
        assert!(vm.contains("push pointer 0\ncall Main.helper 1"));
    }

    #[test]
    fn qualified_call_on_known_variable_is_a_method_call() {
        let src = "class Main { function void main(Point p) { do p.move(); return; } }";
        let vm = compile(src);
        let ls = lines(&vm);
        assert_eq!(&ls[1..3], &["push argument 0", "call Point.move 1"]);
    }

    #[test]
    fn qualified_call_on_class_name_is_a_static_call() {
        let src = "class Main { function void main() { do Math.abs(); return; } }";
        let vm = compile(src);
        assert!(vm.contains("call Math.abs 0"));
    }

    #[test]
    fn true_false_null_this_keyword_constants() {
        let src = "class Main { function void main() { \
            do Sys.wait(); return; } function boolean t() { return true; } \
            function boolean f() { return false; } function boolean n() { return null; } }";
        let vm = compile(src);
        assert!(vm.contains("push constant 0\nnot\nreturn"));
        assert!(vm.contains("push constant 0\nreturn"));
    }

    #[test]
    fn undefined_variable_is_semantic_error() {
        let err = compile_err("class Main { function void main() { return nope; } }");
        assert!(matches!(err, CompileError::Semantic { .. }));
    }

    #[test]
    fn duplicate_definition_in_same_scope_is_semantic_error() {
        let err =
            compile_err("class Main { function void main(int a, int a) { return; } }");
        assert!(matches!(err, CompileError::Semantic { .. }));
    }

    #[test]
    fn missing_semicolon_is_syntax_error() {
        let err = compile_err("class Main { function void main() { return }");
        assert!(matches!(err, CompileError::Syntax { .. }));
    }

    #[test]
    fn every_subroutine_body_ends_with_exactly_one_return() {
        let src = "class Main { function void a() { if (1) { return; } return; } }";
        let vm = compile(src);
        assert_eq!(vm.matches("return").count(), 2);
    }
}
