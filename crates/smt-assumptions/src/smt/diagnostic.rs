// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Unsatisfiable-core diagnosis for a contradictory background

use crate::error::{SmtError, SmtResult};
use crate::smt::store::{ConstraintStore, QueryResult};
use itertools::Itertools;
use std::collections::BTreeSet;

impl<'ctx> ConstraintStore<'ctx> {
    /// 1-based indices of background constraints that are jointly unsatisfiable.
    ///
    /// The core is whatever the solver reports; it is not guaranteed minimal.
    /// Fails unless the background alone checks `unsat`.
    pub fn unsat_core(&self) -> SmtResult<BTreeSet<usize>> {
        match self.check_background() {
            QueryResult::Unsat => {}
            QueryResult::Sat => {
                return Err(SmtError::Precondition(
                    "core requested on a satisfiable constraint set".to_string(),
                ))
            }
            QueryResult::Unknown => {
                return Err(SmtError::Precondition(
                    "core requested on a constraint set of undetermined satisfiability".to_string(),
                ))
            }
        }

        let mut indices = BTreeSet::new();
        for label in self.solver.get_unsat_core() {
            match self.background.iter().position(|c| c.label == label) {
                Some(i) => {
                    indices.insert(i + 1);
                }
                None => log::warn!("unsat core names unknown label {}", label),
            }
        }
        log::info!("unsat core: {{{}}}", indices.iter().join(", "));
        Ok(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::expressions::Expression;
    use crate::options::new_context;

    #[test]
    fn test_two_constraint_core() {
        let ctx = new_context();
        let x = || Expression::int_var("x");
        let store = ConstraintStore::new(
            &ctx,
            vec![x().ge(Expression::int(10)), x().le(Expression::int(5))],
        )
        .unwrap();
        assert_eq!(store.unsat_core().unwrap(), BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_core_on_satisfiable_background_fails() {
        let ctx = new_context();
        let store = ConstraintStore::new(&ctx, vec![Expression::bool_var("p")]).unwrap();
        let err = store.unsat_core().unwrap_err();
        assert!(matches!(err, SmtError::Precondition(_)));

        let empty = ConstraintStore::new(&ctx, vec![]).unwrap();
        assert!(matches!(empty.unsat_core(), Err(SmtError::Precondition(_))));
    }

    #[test]
    fn test_core_after_queries() {
        let ctx = new_context();
        let p = || Expression::bool_var("p");
        let mut store = ConstraintStore::new(&ctx, vec![p(), p().not()]).unwrap();
        // A prior speculative check must not disturb core extraction
        assert_eq!(store.is_satisfiable(&Expression::bool_var("q")).unwrap(), Some(false));
        assert_eq!(store.unsat_core().unwrap(), BTreeSet::from([1, 2]));
    }
}
