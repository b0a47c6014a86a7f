use crate::{AsValue, BinaryOpType, UnaryOpType, Value};
use std::{borrow::Cow, ops::Not};

/// Predicate and ordering key tree.
///
/// Columns are referenced by the Rust field name, the compiler resolves the column name
/// from the table being queried.
///
/// # Examples
/// ```rust
/// use quarry_core::{BinaryOpType, Expr};
/// let adult = Expr::field("age").greater_equal(18).and(Expr::field("active").equal(true));
/// assert!(matches!(adult, Expr::BinaryOp { op: BinaryOpType::And, .. }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    BinaryOp {
        op: BinaryOpType,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOpType,
        arg: Box<Expr>,
    },
    MemberAccess(Cow<'static, str>),
    Literal(Value),
}

impl Expr {
    pub fn field(name: impl Into<Cow<'static, str>>) -> Self {
        Expr::MemberAccess(name.into())
    }
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }
    pub fn binary(op: BinaryOpType, lhs: impl IntoExpr, rhs: impl IntoExpr) -> Self {
        Expr::BinaryOp {
            op,
            lhs: Box::new(lhs.into_expr()),
            rhs: Box::new(rhs.into_expr()),
        }
    }
    pub fn equal(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOpType::Equal, self, rhs)
    }
    pub fn not_equal(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOpType::NotEqual, self, rhs)
    }
    pub fn less(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOpType::Less, self, rhs)
    }
    pub fn less_equal(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOpType::LessEqual, self, rhs)
    }
    pub fn greater(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOpType::Greater, self, rhs)
    }
    pub fn greater_equal(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOpType::GreaterEqual, self, rhs)
    }
    pub fn and(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOpType::And, self, rhs)
    }
    pub fn or(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOpType::Or, self, rhs)
    }
    pub fn negate(self) -> Self {
        Expr::UnaryOp {
            op: UnaryOpType::Not,
            arg: Box::new(self),
        }
    }
}

impl Not for Expr {
    type Output = Expr;
    fn not(self) -> Self::Output {
        self.negate()
    }
}

/// Anything that can stand as an operand in an [`Expr`].
///
/// Native values become literals, an [`Expr`] is taken as is.
pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl IntoExpr for &Expr {
    fn into_expr(self) -> Expr {
        self.clone()
    }
}

impl IntoExpr for &str {
    fn into_expr(self) -> Expr {
        Expr::Literal(self.into())
    }
}

impl IntoExpr for Value {
    fn into_expr(self) -> Expr {
        Expr::Literal(self)
    }
}

impl<T: AsValue> IntoExpr for T {
    fn into_expr(self) -> Expr {
        Expr::Literal(self.as_value())
    }
}
