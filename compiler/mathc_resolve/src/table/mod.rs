//! Scoped symbol table.
//!
//! Uses a scope stack: the current scope is on top and each scope's parent
//! is the one below it. Lookups walk from the top down, so an inner
//! declaration shadows an outer one.

use std::fmt;

use rustc_hash::FxHashMap;

use mathc_ir::{Name, Param, StringInterner, Type};

/// What a symbol names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Constant,
    Function,
    Parameter,
    Type,
}

impl SymbolKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Constant => "constant",
            SymbolKind::Function => "function",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Type => "type",
        }
    }
}

/// A declared name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: Name,
    pub ty: Type,
    pub kind: SymbolKind,
    /// Declaring line.
    pub line: u32,
    /// Parameter list, for functions.
    pub params: Vec<Param>,
}

/// One level of the scope stack.
#[derive(Clone, Debug, Default)]
struct Scope {
    symbols: FxHashMap<Name, Symbol>,
    /// Insertion order, for stable dumps.
    order: Vec<Name>,
}

impl Scope {
    fn clear(&mut self) {
        self.symbols.clear();
        self.order.clear();
    }
}

/// Nested scopes of declared names.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    /// Never empty; index 0 is the global scope.
    scopes: Vec<Scope>,
}

impl SymbolTable {
    /// Create a table holding one empty global scope.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::default()],
        }
    }

    /// Number of live scopes, the global scope included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Total number of symbols across all live scopes.
    pub fn len(&self) -> usize {
        self.scopes.iter().map(|scope| scope.order.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push an empty scope whose parent is the current one.
    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Drop every symbol of the current scope and pop it.
    ///
    /// Leaving the global scope empties it but keeps it as the current scope.
    pub fn leave_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        } else if let Some(global) = self.scopes.last_mut() {
            global.clear();
        }
    }

    /// Declare `name` in the current scope.
    ///
    /// Returns `false`, leaving the table untouched, when the current scope
    /// already declares `name`. Shadowing an outer scope's symbol succeeds.
    pub fn insert(
        &mut self,
        name: Name,
        ty: Type,
        kind: SymbolKind,
        line: u32,
        params: Vec<Param>,
    ) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.symbols.contains_key(&name) {
            return false;
        }
        scope.symbols.insert(
            name,
            Symbol {
                name,
                ty,
                kind,
                line,
                params,
            },
        );
        scope.order.push(name);
        true
    }

    /// Find `name` in the current scope or the nearest enclosing one.
    pub fn lookup(&self, name: Name) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(&name))
    }

    /// Find `name` in the current scope only.
    pub fn lookup_current_scope(&self, name: Name) -> Option<&Symbol> {
        self.scopes.last().and_then(|scope| scope.symbols.get(&name))
    }

    /// Display adapter listing scopes innermost first.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> SymbolTableDisplay<'a> {
        SymbolTableDisplay {
            table: self,
            interner,
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a [`SymbolTable`] with names resolved.
pub struct SymbolTableDisplay<'a> {
    table: &'a SymbolTable,
    interner: &'a StringInterner,
}

impl fmt::Display for SymbolTableDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (level, scope) in self.table.scopes.iter().enumerate().rev() {
            if level == 0 {
                writeln!(f, "scope 0 (global)")?;
            } else {
                writeln!(f, "scope {level}")?;
            }
            for name in &scope.order {
                let Some(symbol) = scope.symbols.get(name) else {
                    continue;
                };
                write!(
                    f,
                    "  {}: {} {}",
                    self.interner.lookup(symbol.name),
                    symbol.ty.display(self.interner),
                    symbol.kind.as_str(),
                )?;
                if symbol.kind == SymbolKind::Function {
                    let params: Vec<String> = symbol
                        .params
                        .iter()
                        .map(|p| {
                            format!("{} {}", p.ty.display(self.interner), self.interner.lookup(p.name))
                        })
                        .collect();
                    write!(f, "({})", params.join(", "))?;
                }
                writeln!(f, " [line {}]", symbol.line)?;
            }
        }
        Ok(())
    }
}
