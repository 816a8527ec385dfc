// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Constraint store - a Z3 solver loaded with tracked background constraints
//!
//! The background is asserted once, at construction. Every query afterwards runs
//! inside a push/pop scope, so no query can change what the background asserts.
//!
//! A store is not `Send`: the solver scope stack is a single critical section.
//! Callers that need concurrent queries build one store per thread.

use crate::data::expressions::{Expression, VariableKind};
use crate::error::SmtResult;
use crate::options::SolverOptions;
use crate::smt::translate::Translator;
use std::fmt;
use z3::ast::{Bool, Dynamic};
use z3::{Context, Params, SatResult, Solver};

/// Outcome of a satisfiability check. `Unknown` is a result, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryResult {
    Sat,
    Unsat,
    Unknown,
}

impl QueryResult {
    pub fn is_sat(self) -> bool {
        self == QueryResult::Sat
    }

    pub fn is_unsat(self) -> bool {
        self == QueryResult::Unsat
    }

    pub fn is_unknown(self) -> bool {
        self == QueryResult::Unknown
    }

    /// `Sat` -> `Some(true)`, `Unsat` -> `Some(false)`, `Unknown` -> `None`
    pub fn as_option(self) -> Option<bool> {
        match self {
            QueryResult::Sat => Some(true),
            QueryResult::Unsat => Some(false),
            QueryResult::Unknown => None,
        }
    }
}

impl From<SatResult> for QueryResult {
    fn from(result: SatResult) -> Self {
        match result {
            SatResult::Sat => QueryResult::Sat,
            SatResult::Unsat => QueryResult::Unsat,
            SatResult::Unknown => QueryResult::Unknown,
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Sat => write!(f, "sat"),
            QueryResult::Unsat => write!(f, "unsat"),
            QueryResult::Unknown => write!(f, "unknown"),
        }
    }
}

/// A background constraint with its lowered form and tracking label
pub struct TrackedConstraint<'ctx> {
    pub expression: Expression,
    pub term: Bool<'ctx>,
    pub label: Bool<'ctx>,
}

/// Pops the solver scope it pushed when dropped, including on early return
pub(crate) struct SolverScope<'s, 'ctx> {
    solver: &'s Solver<'ctx>,
}

impl<'s, 'ctx> SolverScope<'s, 'ctx> {
    pub(crate) fn enter(solver: &'s Solver<'ctx>) -> Self {
        solver.push();
        Self { solver }
    }
}

impl Drop for SolverScope<'_, '_> {
    fn drop(&mut self) {
        self.solver.pop(1);
    }
}

/// Proof context holding an immutable set of background constraints
pub struct ConstraintStore<'ctx> {
    pub(crate) ctx: &'ctx Context,
    pub(crate) options: SolverOptions,
    pub(crate) translator: Translator<'ctx>,
    pub(crate) solver: Solver<'ctx>,
    pub(crate) background: Vec<TrackedConstraint<'ctx>>,
}

impl<'ctx> ConstraintStore<'ctx> {
    /// Build a store with default options
    pub fn new<I>(ctx: &'ctx Context, constraints: I) -> SmtResult<Self>
    where
        I: IntoIterator<Item = Expression>,
    {
        Self::with_options(ctx, constraints, SolverOptions::default())
    }

    /// Lower every constraint and assert it tracked by a fresh label.
    /// Constraint `i` (1-based, input order) is tracked by `options.label_name(i)`.
    pub fn with_options<I>(ctx: &'ctx Context, constraints: I, options: SolverOptions) -> SmtResult<Self>
    where
        I: IntoIterator<Item = Expression>,
    {
        let solver = Solver::new(ctx);
        if let Some(ms) = options.timeout_ms {
            let mut params = Params::new(ctx);
            params.set_u32("timeout", ms);
            solver.set_params(&params);
        }

        let mut translator = Translator::new(ctx, options.real_encoding);
        let mut background = Vec::new();
        for (i, expression) in constraints.into_iter().enumerate() {
            let index = i + 1;
            let label = translator.symbols_mut().declare_label(&options.label_name(index))?;
            let term = translator.lower_bool(&expression)?;
            log::debug!("background [{}] {} tracked by {}", index, expression, label);
            solver.assert_and_track(&term, &label);
            background.push(TrackedConstraint {
                expression,
                term,
                label,
            });
        }
        log::info!("constraint store loaded with {} background constraint(s)", background.len());

        Ok(Self {
            ctx,
            options,
            translator,
            solver,
            background,
        })
    }

    /// Check `expr` together with the background, leaving the background untouched.
    ///
    /// The query is asserted untracked inside a push/pop scope; the scope is
    /// popped on every exit path.
    pub fn speculative_check(&mut self, expr: &Expression) -> SmtResult<QueryResult> {
        let term = self.translator.lower_bool(expr)?;
        let _scope = SolverScope::enter(&self.solver);
        self.solver.assert(&term);
        let result = self.observe(self.solver.check());
        log::debug!("speculative check of {}: {}", expr, result);
        Ok(result)
    }

    /// Check the background constraints alone
    pub fn check_background(&self) -> QueryResult {
        let result = self.observe(self.solver.check());
        log::debug!("background check: {}", result);
        result
    }

    pub(crate) fn observe(&self, result: SatResult) -> QueryResult {
        let result = QueryResult::from(result);
        if result.is_unknown() {
            let reason = self
                .solver
                .get_reason_unknown()
                .unwrap_or_else(|| "unknown".to_string());
            log::warn!("solver returned unknown: {}", reason);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.background.len()
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_empty()
    }

    /// Background expressions in construction order
    pub fn constraints(&self) -> impl Iterator<Item = &Expression> {
        self.background.iter().map(|c| &c.expression)
    }

    /// Background constraint at a 1-based index
    pub fn constraint(&self, index: usize) -> Option<&TrackedConstraint<'ctx>> {
        index.checked_sub(1).and_then(|i| self.background.get(i))
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    pub fn context(&self) -> &'ctx Context {
        self.ctx
    }

    /// Variables declared so far by constraints and queries, ordered by name
    pub fn declared_variables(&self) -> impl Iterator<Item = (&str, VariableKind, &Dynamic<'ctx>)> {
        self.translator.symbols().variables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SmtError;
    use crate::options::new_context;

    fn x() -> Expression {
        Expression::int_var("x")
    }

    #[test]
    fn test_labels_follow_input_order() {
        let ctx = new_context();
        let store = ConstraintStore::new(
            &ctx,
            vec![x().ge(Expression::int(0)), x().le(Expression::int(9))],
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.constraint(1).unwrap().label.to_string(), "__track_1");
        assert_eq!(store.constraint(2).unwrap().label.to_string(), "__track_2");
        assert!(store.constraint(0).is_none());
        assert!(store.constraint(3).is_none());
    }

    #[test]
    fn test_speculative_check_leaves_background_intact() {
        let ctx = new_context();
        let mut store = ConstraintStore::new(&ctx, vec![x().gt(Expression::int(0))]).unwrap();
        assert_eq!(store.check_background(), QueryResult::Sat);

        // A contradicting query is unsat only inside its own scope
        let result = store.speculative_check(&x().lt(Expression::int(0))).unwrap();
        assert_eq!(result, QueryResult::Unsat);
        assert_eq!(store.check_background(), QueryResult::Sat);

        let result = store.speculative_check(&x().equals(Expression::int(5))).unwrap();
        assert_eq!(result, QueryResult::Sat);
        assert_eq!(store.check_background(), QueryResult::Sat);
    }

    #[test]
    fn test_failed_translation_does_not_leak_scope() {
        let ctx = new_context();
        let mut store = ConstraintStore::new(&ctx, vec![x().gt(Expression::int(0))]).unwrap();
        let err = store.speculative_check(&x()).unwrap_err();
        assert!(matches!(err, SmtError::TranslationEscape { .. }));
        // Scope stack is still balanced: a later contradiction is still scoped
        assert_eq!(
            store.speculative_check(&x().lt(Expression::int(0))).unwrap(),
            QueryResult::Unsat
        );
        assert_eq!(store.check_background(), QueryResult::Sat);
    }

    #[test]
    fn test_construction_rejects_bad_constraint() {
        let ctx = new_context();
        let result = ConstraintStore::new(
            &ctx,
            vec![
                x().gt(Expression::int(0)),
                Expression::real_var("x").lt(Expression::int(3)),
            ],
        );
        assert!(matches!(result, Err(SmtError::VariableKindConflict { .. })));
    }

    #[test]
    fn test_user_variable_cannot_alias_label() {
        let ctx = new_context();
        let mut store = ConstraintStore::new(&ctx, vec![Expression::bool_var("p")]).unwrap();
        let err = store
            .speculative_check(&Expression::bool_var("__track_1"))
            .unwrap_err();
        assert!(matches!(err, SmtError::VariableKindConflict { .. }));
    }

    #[test]
    fn test_declared_variables_exclude_labels() {
        let ctx = new_context();
        let mut store = ConstraintStore::new(
            &ctx,
            vec![Expression::bool_var("p"), x().gt(Expression::int(0))],
        )
        .unwrap();
        store
            .speculative_check(&Expression::real_var("r").lt(Expression::int(1)))
            .unwrap();
        let names: Vec<(&str, VariableKind)> = store
            .declared_variables()
            .map(|(name, kind, _)| (name, kind))
            .collect();
        assert_eq!(
            names,
            vec![
                ("p", VariableKind::Bool),
                ("r", VariableKind::Real),
                ("x", VariableKind::Integer),
            ]
        );
    }

    #[test]
    fn test_query_result_mapping() {
        assert_eq!(QueryResult::Sat.as_option(), Some(true));
        assert_eq!(QueryResult::Unsat.as_option(), Some(false));
        assert_eq!(QueryResult::Unknown.as_option(), None);
        assert_eq!(QueryResult::from(SatResult::Unknown), QueryResult::Unknown);
    }
}
