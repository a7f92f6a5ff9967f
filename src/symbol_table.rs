//! Two-scope symbol table: class-wide and subroutine-wide.

use crate::error::CompileError;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Static,
    Field,
    Arg,
    Var,
    /// Sentinel returned by `kind_of` for an unknown name.
    None,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Static => "static",
            Kind::Field => "field",
            Kind::Arg => "argument",
            Kind::Var => "local",
            Kind::None => "none",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone)]
struct Symbol {
    var_type: String,
    kind: Kind,
    index: u16,
}

/// Two nested naming scopes and four per-kind counters.
///
/// `subroutine_scope` is cleared at the start of every subroutine;
/// `class_scope` lives for the whole class. Lookups prefer the
/// subroutine scope.
#[derive(Debug, Default)]
pub struct SymbolTable {
    class_scope: HashMap<String, Symbol>,
    subroutine_scope: HashMap<String, Symbol>,
    static_count: u16,
    field_count: u16,
    arg_count: u16,
    var_count: u16,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the subroutine scope and reset ARG/VAR counters.
    /// Class-scope counters persist across subroutines.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
        self.arg_count = 0;
        self.var_count = 0;
    }

    /// Define a new symbol, failing if `name` already exists in the
    /// scope that `kind` targets.
    pub fn define(
        &mut self,
        name: &str,
        var_type: &str,
        kind: Kind,
        line: usize,
        column: usize,
    ) -> Result<(), CompileError> {
        let (scope, counter) = match kind {
            Kind::Static => (&mut self.class_scope, &mut self.static_count),
            Kind::Field => (&mut self.class_scope, &mut self.field_count),
            Kind::Arg => (&mut self.subroutine_scope, &mut self.arg_count),
            Kind::Var => (&mut self.subroutine_scope, &mut self.var_count),
            Kind::None => unreachable!("define() is never called with Kind::None"),
        };

        if scope.contains_key(name) {
            return Err(CompileError::semantic(
                format!("'{name}' is already defined in this scope"),
                line,
                column,
            ));
        }

        let index = *counter;
        *counter += 1;
        scope.insert(
            name.to_string(),
            Symbol {
                var_type: var_type.to_string(),
                kind,
                index,
            },
        );
        Ok(())
    }

    pub fn var_count(&self, kind: Kind) -> u16 {
        match kind {
            Kind::Static => self.static_count,
            Kind::Field => self.field_count,
            Kind::Arg => self.arg_count,
            Kind::Var => self.var_count,
            Kind::None => 0,
        }
    }

    fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }

    pub fn kind_of(&self, name: &str) -> Kind {
        self.lookup(name).map_or(Kind::None, |s| s.kind)
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|s| s.var_type.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.lookup(name).map(|s| s.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_independent_per_kind() {
        let mut table = SymbolTable::new();
        table.define("x", "int", Kind::Field, 1, 1).unwrap();
        table.define("y", "int", Kind::Field, 1, 1).unwrap();
        table.define("count", "int", Kind::Static, 1, 1).unwrap();

        assert_eq!(table.index_of("x"), Some(0));
        assert_eq!(table.index_of("y"), Some(1));
        assert_eq!(table.index_of("count"), Some(0));
        assert_eq!(table.var_count(Kind::Field), 2);
        assert_eq!(table.var_count(Kind::Static), 1);
    }

    #[test]
    fn start_subroutine_clears_locals_but_not_class_scope() {
        let mut table = SymbolTable::new();
        table.define("x", "int", Kind::Field, 1, 1).unwrap();
        table.define("a", "int", Kind::Arg, 1, 1).unwrap();

        table.start_subroutine();

        assert_eq!(table.kind_of("a"), Kind::None);
        assert_eq!(table.kind_of("x"), Kind::Field);
        assert_eq!(table.var_count(Kind::Arg), 0);
        assert_eq!(table.var_count(Kind::Field), 1);
    }

    #[test]
    fn subroutine_scope_shadows_class_scope() {
        let mut table = SymbolTable::new();
        table.define("x", "int", Kind::Field, 1, 1).unwrap();
        table.define("x", "boolean", Kind::Var, 1, 1).unwrap();

        assert_eq!(table.kind_of("x"), Kind::Var);
        assert_eq!(table.type_of("x"), Some("boolean"));
    }

    #[test]
    fn duplicate_definition_in_same_scope_is_semantic_error() {
        let mut table = SymbolTable::new();
        table.define("x", "int", Kind::Var, 1, 1).unwrap();
        let err = table.define("x", "int", Kind::Var, 2, 3).unwrap_err();
        assert!(matches!(err, CompileError::Semantic { .. }));
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        let table = SymbolTable::new();
        assert_eq!(table.kind_of("nope"), Kind::None);
        assert_eq!(table.type_of("nope"), None);
        assert_eq!(table.index_of("nope"), None);
    }
}
