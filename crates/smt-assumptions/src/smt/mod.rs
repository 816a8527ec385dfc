// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Z3-backed translation and background queries
//!
//! - Translation from Expression to Z3 AST
//! - Constraint store with tracked background assertions
//! - Satisfiability, provability and resolution queries
//! - Unsat-core diagnosis and satisfying assignments

mod diagnostic;
mod model;
mod query;
mod store;
mod translate;

pub use model::{Assignment, Value};
pub use query::Resolution;
pub use store::{ConstraintStore, QueryResult, TrackedConstraint};
pub use translate::Translator;
