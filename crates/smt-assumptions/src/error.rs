// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Error types for translation and background queries

use crate::data::expressions::OperatorKind;
use thiserror::Error;

/// Result type alias for SMT operations
pub type SmtResult<T> = std::result::Result<T, SmtError>;

/// Errors that abort a translation or query.
///
/// An oracle `unknown` answer is not an error; it is reported through
/// [`crate::QueryResult::Unknown`].
#[derive(Debug, Error)]
pub enum SmtError {
    /// Operator applied to an arity the translator has no primitive for
    #[error("unsupported operator {op} with {arity} operand(s)")]
    UnsupportedOperator { op: OperatorKind, arity: usize },

    /// Same name requested with two different kinds in one store
    #[error("variable '{name}' already declared as {existing}, requested as {requested}")]
    VariableKindConflict {
        name: String,
        existing: String,
        requested: String,
    },

    /// A lowered operand has a sort the target primitive cannot take
    #[error("cannot lower `{subterm}` of kind {kind} in this position")]
    TranslationEscape { subterm: String, kind: String },

    /// Float literal without an exact rational value
    #[error("float literal {0} has no finite rational value")]
    NonFiniteLiteral(f64),

    /// Query called on a background that does not meet its precondition
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Solver options could not be parsed
    #[error("invalid solver options: {0}")]
    Config(String),
}
