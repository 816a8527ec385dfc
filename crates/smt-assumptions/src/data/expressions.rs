// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use itertools::Itertools;
use std::fmt;

/// Declared type of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariableKind {
    Bool,
    Integer,
    Real,
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::Bool => write!(f, "Bool"),
            VariableKind::Integer => write!(f, "Integer"),
            VariableKind::Real => write!(f, "Real"),
        }
    }
}

/// Literal value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Operators understood by the translator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Not,
    And,
    Or,
    Ge,
    Le,
    Gt,
    Lt,
    Eq,
    Add,
    Sub,
    Mul,
    Pow,
    Div,
}

impl OperatorKind {
    /// Infix symbol used when printing
    pub fn symbol(self) -> &'static str {
        match self {
            OperatorKind::Not => "!",
            OperatorKind::And => "&",
            OperatorKind::Or => "|",
            OperatorKind::Ge => ">=",
            OperatorKind::Le => "<=",
            OperatorKind::Gt => ">",
            OperatorKind::Lt => "<",
            OperatorKind::Eq => "==",
            OperatorKind::Add => "+",
            OperatorKind::Sub => "-",
            OperatorKind::Mul => "*",
            OperatorKind::Pow => "**",
            OperatorKind::Div => "/",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Boolean/arithmetic expression tree
///
/// Trees are consumed read-only by the translator. A variable name must carry
/// the same [`VariableKind`] everywhere it appears within one constraint store.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Variable { name: String, kind: VariableKind },
    Literal(Literal),
    Operation {
        op: OperatorKind,
        children: Vec<Expression>,
    },
}

impl Expression {
    pub fn var(name: impl Into<String>, kind: VariableKind) -> Self {
        Expression::Variable {
            name: name.into(),
            kind,
        }
    }

    pub fn bool_var(name: impl Into<String>) -> Self {
        Self::var(name, VariableKind::Bool)
    }

    pub fn int_var(name: impl Into<String>) -> Self {
        Self::var(name, VariableKind::Integer)
    }

    pub fn real_var(name: impl Into<String>) -> Self {
        Self::var(name, VariableKind::Real)
    }

    pub fn int(value: i64) -> Self {
        Expression::Literal(Literal::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Expression::Literal(Literal::Float(value))
    }

    pub fn boolean(value: bool) -> Self {
        Expression::Literal(Literal::Bool(value))
    }

    pub fn operation(op: OperatorKind, children: Vec<Expression>) -> Self {
        Expression::Operation { op, children }
    }

    pub fn and(children: Vec<Expression>) -> Self {
        Self::operation(OperatorKind::And, children)
    }

    pub fn or(children: Vec<Expression>) -> Self {
        Self::operation(OperatorKind::Or, children)
    }

    pub fn sum(children: Vec<Expression>) -> Self {
        Self::operation(OperatorKind::Add, children)
    }

    pub fn product(children: Vec<Expression>) -> Self {
        Self::operation(OperatorKind::Mul, children)
    }

    pub fn not(self) -> Self {
        Self::operation(OperatorKind::Not, vec![self])
    }

    pub fn negate(self) -> Self {
        Self::operation(OperatorKind::Sub, vec![self])
    }

    pub fn minus(self, rhs: Expression) -> Self {
        Self::operation(OperatorKind::Sub, vec![self, rhs])
    }

    pub fn pow(self, exponent: Expression) -> Self {
        Self::operation(OperatorKind::Pow, vec![self, exponent])
    }

    pub fn div(self, rhs: Expression) -> Self {
        Self::operation(OperatorKind::Div, vec![self, rhs])
    }

    pub fn ge(self, rhs: Expression) -> Self {
        Self::operation(OperatorKind::Ge, vec![self, rhs])
    }

    pub fn le(self, rhs: Expression) -> Self {
        Self::operation(OperatorKind::Le, vec![self, rhs])
    }

    pub fn gt(self, rhs: Expression) -> Self {
        Self::operation(OperatorKind::Gt, vec![self, rhs])
    }

    pub fn lt(self, rhs: Expression) -> Self {
        Self::operation(OperatorKind::Lt, vec![self, rhs])
    }

    pub fn equals(self, rhs: Expression) -> Self {
        Self::operation(OperatorKind::Eq, vec![self, rhs])
    }

    /// Value of a boolean literal, if this is one
    pub fn as_bool_literal(&self) -> Option<bool> {
        match self {
            Expression::Literal(Literal::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for Expression {
    fn from(value: bool) -> Self {
        Expression::boolean(value)
    }
}

impl From<i64> for Expression {
    fn from(value: i64) -> Self {
        Expression::int(value)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Variable { name, .. } => write!(f, "{}", name),
            Expression::Literal(lit) => write!(f, "{}", lit),
            Expression::Operation { op, children } => match (op, children.len()) {
                (OperatorKind::Not, 1) => write!(f, "!{}", children[0]),
                (OperatorKind::Sub, 1) => write!(f, "-{}", children[0]),
                (OperatorKind::Not, _) => write!(f, "{}({})", op, children.iter().join(", ")),
                (_, n) if n >= 2 => {
                    let sep = format!(" {} ", op.symbol());
                    write!(f, "({})", children.iter().join(&sep))
                }
                _ => write!(f, "{}({})", op, children.iter().join(", ")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested_operations() {
        let x = Expression::int_var("x");
        let y = Expression::int_var("y");
        let expr = Expression::sum(vec![x.clone(), y]).ge(Expression::int(2));
        assert_eq!(expr.to_string(), "((x + y) >= 2)");

        let neg = x.clone().negate().not();
        assert_eq!(neg.to_string(), "!-x");
    }

    #[test]
    fn test_display_degenerate_arity() {
        // Single-operand n-ary ops and empty ops print in call form
        let single = Expression::and(vec![Expression::bool_var("p")]);
        assert_eq!(single.to_string(), "And(p)");

        let empty = Expression::or(vec![]);
        assert_eq!(empty.to_string(), "Or()");

        let float = Expression::float(0.5);
        assert_eq!(float.to_string(), "0.5");
    }

    #[test]
    fn test_bool_literal_detection() {
        assert_eq!(Expression::boolean(true).as_bool_literal(), Some(true));
        assert_eq!(Expression::from(false).as_bool_literal(), Some(false));
        assert_eq!(Expression::int(1).as_bool_literal(), None);
        assert_eq!(Expression::bool_var("p").as_bool_literal(), None);
    }
}
