// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Translation from Expression to Z3 AST
//!
//! Integer division and power are handed to Z3 unchanged: `x / 0` is an
//! unconstrained value, and division of integers rounds the way Z3's `div`
//! does (toward negative infinity for positive divisors).

use crate::data::expressions::{Expression, Literal, OperatorKind};
use crate::data::symbols::SymbolTable;
use crate::error::{SmtError, SmtResult};
use crate::options::RealEncoding;
use num::BigRational;
use z3::ast::{Ast, Bool, Dynamic, Int, Real};
use z3::{Context, SortKind};

/// Arithmetic operands after sort unification
enum Numeric<'ctx> {
    Int(Vec<Int<'ctx>>),
    Real(Vec<Real<'ctx>>),
}

/// Ordered comparison shared by the integer and real sorts
macro_rules! compare {
    ($op:expr, $lhs:expr, $rhs:expr) => {
        match $op {
            OperatorKind::Ge => $lhs.ge($rhs),
            OperatorKind::Le => $lhs.le($rhs),
            OperatorKind::Gt => $lhs.gt($rhs),
            _ => $lhs.lt($rhs),
        }
    };
}

/// Lowers expressions into Z3 terms, declaring variables on first use
pub struct Translator<'ctx> {
    ctx: &'ctx Context,
    symbols: SymbolTable<'ctx>,
}

impl<'ctx> Translator<'ctx> {
    pub fn new(ctx: &'ctx Context, real_encoding: RealEncoding) -> Self {
        Self {
            ctx,
            symbols: SymbolTable::new(ctx, real_encoding),
        }
    }

    pub(crate) fn symbols(&self) -> &SymbolTable<'ctx> {
        &self.symbols
    }

    pub(crate) fn symbols_mut(&mut self) -> &mut SymbolTable<'ctx> {
        &mut self.symbols
    }

    /// Translate an expression that must be boolean (a constraint or a query)
    pub fn lower_bool(&mut self, expr: &Expression) -> SmtResult<Bool<'ctx>> {
        let term = self.lower(expr)?;
        expect_bool(&term, expr)
    }

    /// Translate an expression to a Z3 AST
    pub fn lower(&mut self, expr: &Expression) -> SmtResult<Dynamic<'ctx>> {
        match expr {
            Expression::Variable { name, kind } => self.symbols.resolve_variable(name, *kind),
            Expression::Literal(lit) => self.lower_literal(lit),
            Expression::Operation { op, children } => {
                let terms = children
                    .iter()
                    .map(|child| self.lower(child))
                    .collect::<SmtResult<Vec<_>>>()?;
                self.lower_operation(*op, &terms, children)
            }
        }
    }

    fn lower_literal(&self, lit: &Literal) -> SmtResult<Dynamic<'ctx>> {
        match lit {
            Literal::Bool(b) => Ok(Bool::from_bool(self.ctx, *b).into()),
            Literal::Int(i) => Ok(Int::from_i64(self.ctx, *i).into()),
            Literal::Float(x) => {
                let ratio = BigRational::from_float(*x).ok_or(SmtError::NonFiniteLiteral(*x))?;
                Real::from_real_str(
                    self.ctx,
                    &ratio.numer().to_string(),
                    &ratio.denom().to_string(),
                )
                .map(|r| r.into())
                .ok_or(SmtError::NonFiniteLiteral(*x))
            }
        }
    }

    fn lower_operation(
        &self,
        op: OperatorKind,
        terms: &[Dynamic<'ctx>],
        children: &[Expression],
    ) -> SmtResult<Dynamic<'ctx>> {
        let unsupported = || SmtError::UnsupportedOperator {
            op,
            arity: terms.len(),
        };

        match (op, terms.len()) {
            (OperatorKind::Not, 1) => Ok(expect_bool(&terms[0], &children[0])?.not().into()),

            (OperatorKind::And, n) | (OperatorKind::Or, n) if n >= 1 => {
                let operands = terms
                    .iter()
                    .zip(children)
                    .map(|(term, child)| expect_bool(term, child))
                    .collect::<SmtResult<Vec<_>>>()?;
                let refs: Vec<&Bool<'ctx>> = operands.iter().collect();
                let result = if op == OperatorKind::And {
                    Bool::and(self.ctx, &refs)
                } else {
                    Bool::or(self.ctx, &refs)
                };
                Ok(result.into())
            }

            (OperatorKind::Eq, 2) => self.lower_eq(terms, children),

            (OperatorKind::Ge, 2)
            | (OperatorKind::Le, 2)
            | (OperatorKind::Gt, 2)
            | (OperatorKind::Lt, 2) => {
                let result = match unify(terms, children)? {
                    Numeric::Int(v) => compare!(op, &v[0], &v[1]),
                    Numeric::Real(v) => compare!(op, &v[0], &v[1]),
                };
                Ok(result.into())
            }

            (OperatorKind::Add, n) | (OperatorKind::Mul, n) if n >= 1 => {
                let result: Dynamic<'ctx> = match unify(terms, children)? {
                    Numeric::Int(v) => {
                        let refs: Vec<&Int<'ctx>> = v.iter().collect();
                        if op == OperatorKind::Add {
                            Int::add(self.ctx, &refs).into()
                        } else {
                            Int::mul(self.ctx, &refs).into()
                        }
                    }
                    Numeric::Real(v) => {
                        let refs: Vec<&Real<'ctx>> = v.iter().collect();
                        if op == OperatorKind::Add {
                            Real::add(self.ctx, &refs).into()
                        } else {
                            Real::mul(self.ctx, &refs).into()
                        }
                    }
                };
                Ok(result)
            }

            (OperatorKind::Sub, 1) => Ok(match unify(terms, children)? {
                Numeric::Int(v) => v[0].unary_minus().into(),
                Numeric::Real(v) => v[0].unary_minus().into(),
            }),

            (OperatorKind::Sub, 2) => Ok(match unify(terms, children)? {
                Numeric::Int(v) => Int::sub(self.ctx, &[&v[0], &v[1]]).into(),
                Numeric::Real(v) => Real::sub(self.ctx, &[&v[0], &v[1]]).into(),
            }),

            (OperatorKind::Div, 2) => Ok(match unify(terms, children)? {
                Numeric::Int(v) => Int::div(&v[0], &v[1]).into(),
                Numeric::Real(v) => Real::div(&v[0], &v[1]).into(),
            }),

            // Z3 builds powers over the real sort; integer operands come back as integers
            (OperatorKind::Pow, 2) => Ok(match unify(terms, children)? {
                Numeric::Int(v) => {
                    let base = Real::from_int(&v[0]);
                    let exponent = Real::from_int(&v[1]);
                    Int::from_real(&Real::power(&base, &exponent)).into()
                }
                Numeric::Real(v) => Real::power(&v[0], &v[1]).into(),
            }),

            _ => Err(unsupported()),
        }
    }

    fn lower_eq(&self, terms: &[Dynamic<'ctx>], children: &[Expression]) -> SmtResult<Dynamic<'ctx>> {
        match (terms[0].as_bool(), terms[1].as_bool()) {
            (Some(l), Some(r)) => Ok(l._eq(&r).into()),
            (Some(_), None) => Err(escape(&terms[1], &children[1])),
            (None, Some(_)) => Err(escape(&terms[0], &children[0])),
            (None, None) => Ok(match unify(terms, children)? {
                Numeric::Int(v) => v[0]._eq(&v[1]).into(),
                Numeric::Real(v) => v[0]._eq(&v[1]).into(),
            }),
        }
    }
}

/// Bring arithmetic operands to a common sort, promoting integers to reals
/// when any operand is real
fn unify<'ctx>(terms: &[Dynamic<'ctx>], children: &[Expression]) -> SmtResult<Numeric<'ctx>> {
    let mut any_real = false;
    for (term, child) in terms.iter().zip(children) {
        match term.sort_kind() {
            SortKind::Int => {}
            SortKind::Real => any_real = true,
            _ => return Err(escape(term, child)),
        }
    }

    if !any_real {
        let v = terms
            .iter()
            .zip(children)
            .map(|(term, child)| term.as_int().ok_or_else(|| escape(term, child)))
            .collect::<SmtResult<Vec<_>>>()?;
        return Ok(Numeric::Int(v));
    }

    let v = terms
        .iter()
        .zip(children)
        .map(|(term, child)| match (term.as_int(), term.as_real()) {
            (Some(i), _) => Ok(Real::from_int(&i)),
            (None, Some(r)) => Ok(r),
            (None, None) => Err(escape(term, child)),
        })
        .collect::<SmtResult<Vec<_>>>()?;
    Ok(Numeric::Real(v))
}

fn expect_bool<'ctx>(term: &Dynamic<'ctx>, expr: &Expression) -> SmtResult<Bool<'ctx>> {
    term.as_bool().ok_or_else(|| escape(term, expr))
}

fn escape(term: &Dynamic<'_>, expr: &Expression) -> SmtError {
    SmtError::TranslationEscape {
        subterm: expr.to_string(),
        kind: term.get_sort().to_string(),
    }
}
