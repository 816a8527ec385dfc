// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Satisfying assignments for speculative queries

use crate::data::expressions::Expression;
use crate::error::SmtResult;
use crate::smt::store::{ConstraintStore, SolverScope};
use num::{BigInt, BigRational, Zero};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use z3::ast::Dynamic;
use z3::SortKind;

/// Value assigned to a variable by a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(BigInt),
    Real(BigRational),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
        }
    }
}

/// Variable values, keyed by variable name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    pub values: BTreeMap<String, Value>,
}

impl Assignment {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.values {
            writeln!(f, "{} = {}", name, value)?;
        }
        Ok(())
    }
}

impl<'ctx> ConstraintStore<'ctx> {
    /// Values for every declared variable that make `expr` and the background
    /// true, or `None` when the check is `unsat` or `unknown`.
    pub fn satisfying_assignment(&mut self, expr: &Expression) -> SmtResult<Option<Assignment>> {
        let term = self.translator.lower_bool(expr)?;
        let _scope = SolverScope::enter(&self.solver);
        self.solver.assert(&term);
        let result = self.observe(self.solver.check());
        if !result.is_sat() {
            log::debug!("no assignment for {}: {}", expr, result);
            return Ok(None);
        }

        // The model belongs to this scope and must be read before it is popped
        let Some(model) = self.solver.get_model() else {
            log::warn!("solver reported sat for {} without a model", expr);
            return Ok(None);
        };

        let mut assignment = Assignment::default();
        for (name, _, constant) in self.translator.symbols().variables() {
            let Some(evaluated) = model.eval(constant, true) else {
                continue;
            };
            match model_value(&evaluated) {
                Some(value) => {
                    assignment.values.insert(name.to_string(), value);
                }
                // e.g. irrational algebraic numbers under the rational encoding
                None => log::warn!("model value of {} is not representable: {}", name, evaluated),
            }
        }
        Ok(Some(assignment))
    }
}

fn model_value(evaluated: &Dynamic<'_>) -> Option<Value> {
    match evaluated.sort_kind() {
        SortKind::Bool => evaluated.as_bool().and_then(|b| b.as_bool()).map(Value::Bool),
        // Numerals are read from their printed form so values beyond i64 survive
        SortKind::Int => parse_integer(&evaluated.to_string()).map(Value::Int),
        SortKind::Real => parse_rational(&evaluated.to_string()).map(Value::Real),
        _ => None,
    }
}

/// `123` or `(- 123)`
fn parse_integer(text: &str) -> Option<BigInt> {
    let text = text.trim();
    match unary_minus(text) {
        Some(inner) => parse_integer(inner).map(|i| -i),
        None => BigInt::from_str(text).ok(),
    }
}

/// `3`, `2.5`, `(- x)` or `(/ x y)` with `x` and `y` again in any of these forms
fn parse_rational(text: &str) -> Option<BigRational> {
    let text = text.trim();
    if let Some(inner) = unary_minus(text) {
        return parse_rational(inner).map(|r| -r);
    }
    if let Some(inner) = text.strip_prefix("(/ ").and_then(|t| t.strip_suffix(')')) {
        let (numer, denom) = split_operands(inner)?;
        let numer = parse_rational(numer)?;
        let denom = parse_rational(denom)?;
        if denom.is_zero() {
            return None;
        }
        return Some(numer / denom);
    }
    match text.split_once('.') {
        Some((whole, frac)) => {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let digits = BigInt::from_str(&format!("{}{}", whole, frac)).ok()?;
            let scale = num::pow(BigInt::from(10), frac.len());
            Some(BigRational::new(digits, scale))
        }
        None => BigInt::from_str(text).ok().map(BigRational::from_integer),
    }
}

fn unary_minus(text: &str) -> Option<&str> {
    text.strip_prefix("(- ").and_then(|t| t.strip_suffix(')'))
}

/// Split `a b` where either operand may be parenthesized
fn split_operands(text: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            ' ' if depth == 0 => return Some((&text[..i], &text[i + 1..])),
            _ => {}
        }
    }
    None
}
