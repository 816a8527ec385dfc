// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Symbol table - explicit interning of oracle constants
//!
//! Every oracle constant a store creates goes through this table, keyed by name.
//! Asking for an existing name with the same kind returns the same constant;
//! asking with a different kind is a [`SmtError::VariableKindConflict`].

use crate::data::expressions::VariableKind;
use crate::error::{SmtError, SmtResult};
use crate::options::RealEncoding;
use std::collections::BTreeMap;
use std::fmt;
use z3::ast::{Ast, Bool, Dynamic, Int, Real};
use z3::Context;

/// What a declared name stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SymbolKind {
    Variable(VariableKind),
    /// Tracking label of a background constraint
    Label,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Variable(kind) => write!(f, "{}", kind),
            SymbolKind::Label => write!(f, "tracking label"),
        }
    }
}

/// Registry of declared oracle constants for one context
pub(crate) struct SymbolTable<'ctx> {
    ctx: &'ctx Context,
    real_encoding: RealEncoding,
    entries: BTreeMap<String, (SymbolKind, Dynamic<'ctx>)>,
}

impl<'ctx> SymbolTable<'ctx> {
    pub(crate) fn new(ctx: &'ctx Context, real_encoding: RealEncoding) -> Self {
        Self {
            ctx,
            real_encoding,
            entries: BTreeMap::new(),
        }
    }

    /// Resolve a variable, declaring it on first use
    pub(crate) fn resolve_variable(&mut self, name: &str, kind: VariableKind) -> SmtResult<Dynamic<'ctx>> {
        let symbol = SymbolKind::Variable(kind);
        if let Some(existing) = self.lookup(name, symbol)? {
            return Ok(existing);
        }

        let constant: Dynamic<'ctx> = match (kind, self.real_encoding) {
            (VariableKind::Bool, _) => Bool::new_const(self.ctx, name).into(),
            (VariableKind::Integer, _) | (VariableKind::Real, RealEncoding::Integer) => {
                Int::new_const(self.ctx, name).into()
            }
            (VariableKind::Real, RealEncoding::Rational) => Real::new_const(self.ctx, name).into(),
        };
        log::debug!("declared {} `{}` as {}", kind, name, constant.get_sort());
        self.entries.insert(name.to_string(), (symbol, constant.clone()));
        Ok(constant)
    }

    /// Declare the boolean label tracking a background constraint
    pub(crate) fn declare_label(&mut self, name: &str) -> SmtResult<Bool<'ctx>> {
        let label = match self.lookup(name, SymbolKind::Label)? {
            Some(existing) => existing,
            None => {
                let fresh: Dynamic<'ctx> = Bool::new_const(self.ctx, name).into();
                self.entries
                    .insert(name.to_string(), (SymbolKind::Label, fresh.clone()));
                fresh
            }
        };
        // Labels are only ever created as Bool constants above
        label.as_bool().ok_or_else(|| SmtError::TranslationEscape {
            subterm: name.to_string(),
            kind: label.get_sort().to_string(),
        })
    }

    fn lookup(&self, name: &str, requested: SymbolKind) -> SmtResult<Option<Dynamic<'ctx>>> {
        match self.entries.get(name) {
            Some((existing, constant)) if *existing == requested => Ok(Some(constant.clone())),
            Some((existing, _)) => Err(SmtError::VariableKindConflict {
                name: name.to_string(),
                existing: existing.to_string(),
                requested: requested.to_string(),
            }),
            None => Ok(None),
        }
    }

    /// Declared variables (labels excluded), ordered by name
    pub(crate) fn variables(&self) -> impl Iterator<Item = (&str, VariableKind, &Dynamic<'ctx>)> {
        self.entries
            .iter()
            .filter_map(|(name, (symbol, constant))| match symbol {
                SymbolKind::Variable(kind) => Some((name.as_str(), *kind, constant)),
                SymbolKind::Label => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::new_context;
    use z3::SortKind;

    #[test]
    fn test_same_name_same_kind_interned() {
        let ctx = new_context();
        let mut table = SymbolTable::new(&ctx, RealEncoding::Integer);
        let first = table.resolve_variable("x", VariableKind::Integer).unwrap();
        let second = table.resolve_variable("x", VariableKind::Integer).unwrap();
        assert_eq!(first, second);
        assert_eq!(table.variables().count(), 1);
    }

    #[test]
    fn test_kind_conflict_detected() {
        let ctx = new_context();
        let mut table = SymbolTable::new(&ctx, RealEncoding::Integer);
        table.resolve_variable("x", VariableKind::Integer).unwrap();
        // Real shares the integer sort here, but the declared kinds still differ
        let err = table.resolve_variable("x", VariableKind::Real).unwrap_err();
        match err {
            SmtError::VariableKindConflict { name, existing, requested } => {
                assert_eq!(name, "x");
                assert_eq!(existing, "Integer");
                assert_eq!(requested, "Real");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_label_names_are_reserved() {
        let ctx = new_context();
        let mut table = SymbolTable::new(&ctx, RealEncoding::Integer);
        let label = table.declare_label("__track_1").unwrap();
        assert_eq!(table.declare_label("__track_1").unwrap(), label);
        let err = table
            .resolve_variable("__track_1", VariableKind::Bool)
            .unwrap_err();
        match err {
            SmtError::VariableKindConflict { existing, requested, .. } => {
                assert_eq!(existing, "tracking label");
                assert_eq!(requested, "Bool");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(table.variables().count(), 0);
    }

    #[test]
    fn test_real_encoding_selects_sort() {
        let ctx = new_context();
        let mut integer = SymbolTable::new(&ctx, RealEncoding::Integer);
        let r = integer.resolve_variable("r", VariableKind::Real).unwrap();
        assert_eq!(r.sort_kind(), SortKind::Int);

        let mut rational = SymbolTable::new(&ctx, RealEncoding::Rational);
        let r = rational.resolve_variable("r", VariableKind::Real).unwrap();
        assert_eq!(r.sort_kind(), SortKind::Real);
    }
}
