use crate::{Expr, Scalar};

/// The algebra an adjoint lives in during backpropagation.
///
/// The per-operator chain rules are written once, in terms of these operations.
/// [`Numerical`] carries plain numbers and performs arithmetic;
/// [`Symbolic`] carries expressions and builds nodes instead.
pub trait ChainRule<T> {
    type Adjoint: Clone;

    /// The seed, d(output)/d(output).
    fn one() -> Self::Adjoint;
    /// The starting value of a gradient entry.
    fn zero() -> Self::Adjoint;
    /// Turn a subtree of the differentiated expression into an adjoint value.
    fn lift(expr: &Expr<T>) -> Self::Adjoint;

    fn add(lhs: Self::Adjoint, rhs: Self::Adjoint) -> Self::Adjoint;
    fn sub(lhs: Self::Adjoint, rhs: Self::Adjoint) -> Self::Adjoint;
    fn mul(lhs: Self::Adjoint, rhs: Self::Adjoint) -> Self::Adjoint;
    fn div(lhs: Self::Adjoint, rhs: Self::Adjoint) -> Self::Adjoint;
    fn pow(base: Self::Adjoint, exponent: Self::Adjoint) -> Self::Adjoint;
    fn neg(term: Self::Adjoint) -> Self::Adjoint;
    fn ln(term: Self::Adjoint) -> Self::Adjoint;
}

/// Adjoints are numbers; sibling subtrees are evaluated when a rule needs them.
pub struct Numerical;

impl<T: Scalar> ChainRule<T> for Numerical {
    type Adjoint = T;

    fn one() -> T {
        T::from_int(1)
    }

    fn zero() -> T {
        T::from_int(0)
    }

    fn lift(expr: &Expr<T>) -> T {
        expr.eval()
    }

    fn add(lhs: T, rhs: T) -> T {
        lhs + rhs
    }

    fn sub(lhs: T, rhs: T) -> T {
        lhs - rhs
    }

    fn mul(lhs: T, rhs: T) -> T {
        lhs * rhs
    }

    fn div(lhs: T, rhs: T) -> T {
        lhs / rhs
    }

    fn pow(base: T, exponent: T) -> T {
        base.pow(exponent)
    }

    fn neg(term: T) -> T {
        T::from_int(0) - term
    }

    fn ln(term: T) -> T {
        term.ln()
    }
}

/// Adjoints are expressions. No arithmetic happens, so no [`Scalar`] bound is needed.
pub struct Symbolic;

impl<T: Clone> ChainRule<T> for Symbolic {
    type Adjoint = Expr<T>;

    fn one() -> Expr<T> {
        Expr::Constant(1)
    }

    fn zero() -> Expr<T> {
        Expr::Constant(0)
    }

    fn lift(expr: &Expr<T>) -> Expr<T> {
        expr.clone()
    }

    fn add(lhs: Expr<T>, rhs: Expr<T>) -> Expr<T> {
        Expr::Add(Box::new(lhs), Box::new(rhs))
    }

    fn sub(lhs: Expr<T>, rhs: Expr<T>) -> Expr<T> {
        Expr::Sub(Box::new(lhs), Box::new(rhs))
    }

    fn mul(lhs: Expr<T>, rhs: Expr<T>) -> Expr<T> {
        Expr::Mul(Box::new(lhs), Box::new(rhs))
    }

    fn div(lhs: Expr<T>, rhs: Expr<T>) -> Expr<T> {
        Expr::Div(Box::new(lhs), Box::new(rhs))
    }

    fn pow(base: Expr<T>, exponent: Expr<T>) -> Expr<T> {
        Expr::Pow(Box::new(base), Box::new(exponent))
    }

    fn neg(term: Expr<T>) -> Expr<T> {
        Expr::Neg(Box::new(term))
    }

    fn ln(term: Expr<T>) -> Expr<T> {
        Expr::Log(Box::new(term))
    }
}
