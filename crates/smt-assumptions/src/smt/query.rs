// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Satisfiability, provability and resolution against the background
//!
//! All three are built on [`ConstraintStore::speculative_check`].
//!
//! When the background itself is unsatisfiable, every query is unsatisfiable,
//! so `is_provable` answers `false` for every expression (including `true`).
//! Callers relying on vacuous truth must test [`ConstraintStore::check_background`]
//! first.

use crate::data::expressions::Expression;
use crate::error::SmtResult;
use crate::smt::store::ConstraintStore;

/// Outcome of [`ConstraintStore::resolve`]
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The expression or its negation is provable
    Constant(bool),
    /// Neither is provable; the original expression, unchanged
    Open(Expression),
}

impl Resolution {
    pub fn as_constant(&self) -> Option<bool> {
        match self {
            Resolution::Constant(b) => Some(*b),
            Resolution::Open(_) => None,
        }
    }

    /// Constants become boolean literals, so a resolution can be resolved again
    pub fn into_expression(self) -> Expression {
        match self {
            Resolution::Constant(b) => Expression::boolean(b),
            Resolution::Open(expr) => expr,
        }
    }
}

impl<'ctx> ConstraintStore<'ctx> {
    /// `Some(true)` if `expr` is satisfiable together with the background,
    /// `Some(false)` if not, `None` if the solver could not decide.
    ///
    /// A `false` literal is unsatisfiable without consulting the solver. A `true`
    /// literal is satisfiable exactly when the background is, which for an empty
    /// background needs no solver call either.
    pub fn is_satisfiable(&mut self, expr: &Expression) -> SmtResult<Option<bool>> {
        match expr.as_bool_literal() {
            Some(false) => Ok(Some(false)),
            Some(true) if self.is_empty() => Ok(Some(true)),
            Some(true) => Ok(self.check_background().as_option()),
            None => Ok(self.speculative_check(expr)?.as_option()),
        }
    }

    /// `expr` is satisfiable and its negation is not
    pub fn is_provable(&mut self, expr: &Expression) -> SmtResult<bool> {
        if self.is_satisfiable(expr)? != Some(true) {
            return Ok(false);
        }
        let negated = expr.clone().not();
        Ok(self.is_satisfiable(&negated)? == Some(false))
    }

    /// `true` if `expr` is provable, `false` if its negation is, otherwise `expr` itself
    pub fn resolve(&mut self, expr: &Expression) -> SmtResult<Resolution> {
        if self.is_provable(expr)? {
            return Ok(Resolution::Constant(true));
        }
        let negated = expr.clone().not();
        if self.is_provable(&negated)? {
            return Ok(Resolution::Constant(false));
        }
        Ok(Resolution::Open(expr.clone()))
    }
}
