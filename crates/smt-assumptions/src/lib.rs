// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Background-constraint queries over Z3
//!
//! A [`ConstraintStore`] lowers a fixed list of boolean/arithmetic
//! [`Expression`]s into a Z3 solver once, then answers satisfiability,
//! provability and resolution queries against them without ever changing
//! what is asserted. A contradictory background can be diagnosed with
//! [`ConstraintStore::unsat_core`].

mod data;
mod error;
mod options;
mod smt;

// Expression IR (from data/expressions.rs)
pub use data::expressions::{Expression, Literal, OperatorKind, VariableKind};

// Errors (from error.rs)
pub use error::{SmtError, SmtResult};

// Configuration (from options.rs)
pub use options::{new_context, RealEncoding, SolverOptions};

// Translation, store and queries (from smt/)
pub use smt::{
    Assignment, ConstraintStore, QueryResult, Resolution, TrackedConstraint, Translator, Value,
};

// Re-exported so callers can create and share contexts without a direct z3 dependency
pub use z3::Context;
