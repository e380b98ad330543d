//! Flat, single-scope symbol table (spec §3's "Variable"). Registration is
//! idempotent on name: re-registering overwrites type and const flag without
//! error, matching the source language's lack of scoped shadowing. Variables
//! are never deregistered within a compilation unit.

use std::collections::HashMap;

use crate::types::SemanticType;

/// A lower bound (spec §9): the distilled source grew this freely across
/// revisions, so capacity is advertised, not enforced as a hard ceiling below it.
const MIN_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub ty: SemanticType,
    pub is_const: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    vars: HashMap<String, Variable>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            vars: HashMap::with_capacity(MIN_CAPACITY.min(64)),
        }
    }

    /// Registers `name`, overwriting any previous entry. Returns `false` once
    /// the table is at capacity and the registration could not be recorded;
    /// callers should turn that into a recoverable diagnostic.
    pub fn register(&mut self, name: &str, ty: SemanticType, is_const: bool) -> bool {
        if !self.vars.contains_key(name) && self.vars.len() >= MIN_CAPACITY {
            return false;
        }
        self.vars.insert(
            name.to_owned(),
            Variable {
                name: name.to_owned(),
                ty,
                is_const,
            },
        );
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    pub fn is_list_typed(&self, name: &str) -> bool {
        matches!(self.lookup(name), Some(v) if v.ty == SemanticType::List)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
