use std::{
    fmt::{self, Debug, Display},
    ops::{Add, Div, Mul, Neg, Sub},
};

use crate::Scalar;

/// A scalar expression tree.
///
/// Every node owns its children, so an expression is always a finite tree.
/// The same variable id may appear at many leaves; those leaves denote the same input
/// and their gradients are summed by [`backward`](crate::backward) and
/// [`symbolic_backward`](crate::symbolic_backward).
#[derive(Clone, Debug, PartialEq)]
pub enum Expr<T> {
    /// A named input whose derivative is tracked.
    Variable { id: String, data: T },
    /// An opaque value of the target type. Never receives a gradient.
    Literal(T),
    /// An exact integer that is part of the expression's shape, such as an exponent.
    /// It is converted to the target type only when evaluated.
    Constant(i64),
    Add(Box<Expr<T>>, Box<Expr<T>>),
    Sub(Box<Expr<T>>, Box<Expr<T>>),
    Mul(Box<Expr<T>>, Box<Expr<T>>),
    Div(Box<Expr<T>>, Box<Expr<T>>),
    /// `base ^ exponent`. The exponent may be any expression.
    Pow(Box<Expr<T>>, Box<Expr<T>>),
    Neg(Box<Expr<T>>),
    /// Natural logarithm.
    Log(Box<Expr<T>>),
}

impl<T> Expr<T> {
    pub fn var(id: impl Into<String>, data: T) -> Self {
        Self::Variable {
            id: id.into(),
            data,
        }
    }

    pub fn lit(data: T) -> Self {
        Self::Literal(data)
    }

    pub fn constant(n: i64) -> Self {
        Self::Constant(n)
    }

    pub fn add(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Self::Add(Box::new(lhs.into()), Box::new(rhs.into()))
    }

    pub fn sub(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Self::Sub(Box::new(lhs.into()), Box::new(rhs.into()))
    }

    pub fn mul(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Self::Mul(Box::new(lhs.into()), Box::new(rhs.into()))
    }

    pub fn div(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Self::Div(Box::new(lhs.into()), Box::new(rhs.into()))
    }

    pub fn pow(base: impl Into<Self>, exponent: impl Into<Self>) -> Self {
        Self::Pow(Box::new(base.into()), Box::new(exponent.into()))
    }

    pub fn neg(operand: impl Into<Self>) -> Self {
        Self::Neg(Box::new(operand.into()))
    }

    pub fn log(operand: impl Into<Self>) -> Self {
        Self::Log(Box::new(operand.into()))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Variable { .. } | Self::Literal(_) | Self::Constant(_)
        )
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        use Expr::*;
        match self {
            Variable { .. } | Literal(_) | Constant(_) => 1,
            Add(lhs, rhs) | Sub(lhs, rhs) | Mul(lhs, rhs) | Div(lhs, rhs) | Pow(lhs, rhs) => {
                1 + lhs.size() + rhs.size()
            }
            Neg(term) | Log(term) => 1 + term.size(),
        }
    }

    /// Length of the longest path from this node to a leaf, counting nodes.
    pub fn depth(&self) -> usize {
        use Expr::*;
        match self {
            Variable { .. } | Literal(_) | Constant(_) => 1,
            Add(lhs, rhs) | Sub(lhs, rhs) | Mul(lhs, rhs) | Div(lhs, rhs) | Pow(lhs, rhs) => {
                1 + lhs.depth().max(rhs.depth())
            }
            Neg(term) | Log(term) => 1 + term.depth(),
        }
    }

    /// Distinct variable ids in the order they are first met, left to right.
    pub fn variables(&self) -> Vec<&str> {
        let mut ids = vec![];
        self.collect_variables(&mut ids);
        ids
    }

    fn collect_variables<'a>(&'a self, ids: &mut Vec<&'a str>) {
        use Expr::*;
        match self {
            Variable { id, .. } => {
                if !ids.contains(&id.as_str()) {
                    ids.push(id);
                }
            }
            Literal(_) | Constant(_) => (),
            Add(lhs, rhs) | Sub(lhs, rhs) | Mul(lhs, rhs) | Div(lhs, rhs) | Pow(lhs, rhs) => {
                lhs.collect_variables(ids);
                rhs.collect_variables(ids);
            }
            Neg(term) | Log(term) => term.collect_variables(ids),
        }
    }
}

impl<T: Scalar> Expr<T> {
    /// Compute the value of the tree bottom-up.
    ///
    /// Nothing is cached; a subtree is evaluated again every time it is visited.
    pub fn eval(&self) -> T {
        use Expr::*;
        match self {
            Variable { data, .. } | Literal(data) => data.clone(),
            Constant(n) => T::from_int(*n),
            Add(lhs, rhs) => lhs.eval() + rhs.eval(),
            Sub(lhs, rhs) => lhs.eval() - rhs.eval(),
            Mul(lhs, rhs) => lhs.eval() * rhs.eval(),
            Div(lhs, rhs) => lhs.eval() / rhs.eval(),
            Pow(base, exponent) => base.eval().pow(exponent.eval()),
            Neg(term) => T::from_int(0) - term.eval(),
            Log(term) => term.eval().ln(),
        }
    }
}

/// Fully parenthesized infix text. Literals print with their `Debug` form so `2.0` stays
/// distinct from the structural constant `2`.
impl<T: Debug> Display for Expr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        match self {
            Variable { id, .. } => write!(f, "{id}"),
            Literal(data) => write!(f, "{data:?}"),
            Constant(n) => write!(f, "{n}"),
            Add(lhs, rhs) => write!(f, "({lhs} + {rhs})"),
            Sub(lhs, rhs) => write!(f, "({lhs} - {rhs})"),
            Mul(lhs, rhs) => write!(f, "({lhs} * {rhs})"),
            Div(lhs, rhs) => write!(f, "({lhs} / {rhs})"),
            Pow(base, exponent) => write!(f, "({base} ^ {exponent})"),
            Neg(term) => write!(f, "(-{term})"),
            Log(term) => write!(f, "log({term})"),
        }
    }
}

impl<T: Clone> From<&Expr<T>> for Expr<T> {
    fn from(expr: &Expr<T>) -> Self {
        expr.clone()
    }
}

impl<T> From<i32> for Expr<T> {
    fn from(n: i32) -> Self {
        Self::Constant(n as i64)
    }
}

impl<T> From<i64> for Expr<T> {
    fn from(n: i64) -> Self {
        Self::Constant(n)
    }
}

macro_rules! impl_binary_op {
    ($op:ident, $method:ident, $variant:ident) => {
        impl<T, R: Into<Expr<T>>> $op<R> for Expr<T> {
            type Output = Expr<T>;
            fn $method(self, rhs: R) -> Self::Output {
                Expr::$variant(Box::new(self), Box::new(rhs.into()))
            }
        }

        impl<T: Clone, R: Into<Expr<T>>> $op<R> for &Expr<T> {
            type Output = Expr<T>;
            fn $method(self, rhs: R) -> Self::Output {
                Expr::$variant(Box::new(self.clone()), Box::new(rhs.into()))
            }
        }

        impl<T> $op<Expr<T>> for i32 {
            type Output = Expr<T>;
            fn $method(self, rhs: Expr<T>) -> Self::Output {
                Expr::$variant(Box::new(Expr::from(self)), Box::new(rhs))
            }
        }

        impl<T: Clone> $op<&Expr<T>> for i32 {
            type Output = Expr<T>;
            fn $method(self, rhs: &Expr<T>) -> Self::Output {
                Expr::$variant(Box::new(Expr::from(self)), Box::new(rhs.clone()))
            }
        }
    };
}

impl_binary_op!(Add, add, Add);
impl_binary_op!(Sub, sub, Sub);
impl_binary_op!(Mul, mul, Mul);
impl_binary_op!(Div, div, Div);

/// Literal conversions and `scalar op expr` for a concrete float type.
macro_rules! impl_float_ops {
    ($t:ty) => {
        impl From<$t> for Expr<$t> {
            fn from(data: $t) -> Self {
                Self::Literal(data)
            }
        }

        impl_float_ops!(@op $t, Add, add, Add);
        impl_float_ops!(@op $t, Sub, sub, Sub);
        impl_float_ops!(@op $t, Mul, mul, Mul);
        impl_float_ops!(@op $t, Div, div, Div);
    };
    (@op $t:ty, $op:ident, $method:ident, $variant:ident) => {
        impl $op<Expr<$t>> for $t {
            type Output = Expr<$t>;
            fn $method(self, rhs: Expr<$t>) -> Self::Output {
                Expr::$variant(Box::new(Expr::Literal(self)), Box::new(rhs))
            }
        }

        impl $op<&Expr<$t>> for $t {
            type Output = Expr<$t>;
            fn $method(self, rhs: &Expr<$t>) -> Self::Output {
                Expr::$variant(Box::new(Expr::Literal(self)), Box::new(rhs.clone()))
            }
        }
    };
}

impl_float_ops!(f64);
impl_float_ops!(f32);

impl<T> Neg for Expr<T> {
    type Output = Expr<T>;
    fn neg(self) -> Self::Output {
        Expr::Neg(Box::new(self))
    }
}

impl<T: Clone> Neg for &Expr<T> {
    type Output = Expr<T>;
    fn neg(self) -> Self::Output {
        Expr::Neg(Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(x: f64) -> Expr<f64> {
        let x = Expr::var("x", x);
        3 * Expr::pow(&x, 2) - 4 * &x + 5
    }

    #[test]
    fn test_eval_polynomial() {
        assert_eq!(poly(0.).eval(), 5.);
        assert_eq!(poly(1.).eval(), 4.);
        assert_eq!(poly(2.).eval(), 9.);
        assert_eq!(poly(-1.).eval(), 12.);
    }

    #[test]
    fn test_builders_match_operators() {
        let x = Expr::var("x", 2.);
        let y = Expr::var("y", 3.);
        assert_eq!(&x + &y, Expr::add(&x, &y));
        assert_eq!(&x - &y, Expr::sub(&x, &y));
        assert_eq!(&x * &y, Expr::mul(&x, &y));
        assert_eq!(&x / &y, Expr::div(&x, &y));
        assert_eq!(-&x, Expr::neg(&x));
        assert_eq!(&x * 2.5, Expr::mul(x.clone(), Expr::lit(2.5)));
        assert_eq!(2 * &x, Expr::mul(Expr::constant(2), x.clone()));
        assert_eq!(0.5 * &x, Expr::mul(Expr::lit(0.5), x));
    }

    #[test]
    fn test_operands_untouched() {
        let x = Expr::var("x", 1.);
        let before = x.clone();
        let _sum = &x + &x;
        assert_eq!(x, before);
    }

    #[test]
    fn test_constant_converted_on_eval() {
        assert_eq!(Expr::<f64>::constant(7).eval(), 7.);
        assert_eq!(Expr::<f32>::constant(-3).eval(), -3.);
        assert_eq!(Expr::neg(Expr::lit(4.)).eval(), -4.);
        let e = Expr::log(Expr::pow(Expr::lit(std::f64::consts::E), Expr::constant(3)));
        assert!((e.eval() - 3.).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_passes_through() {
        assert_eq!(Expr::div(Expr::lit(1.), Expr::constant(0)).eval(), f64::INFINITY);
        assert!(Expr::log(Expr::lit(-1f64)).eval().is_nan());
    }

    #[test]
    fn test_display() {
        let x = Expr::var("x", 1.);
        let e = Expr::log(-(&x * 2)) / Expr::pow(&x, Expr::lit(0.5));
        assert_eq!(e.to_string(), "(log((-(x * 2))) / (x ^ 0.5))");
    }

    #[test]
    fn test_display_literal_vs_constant() {
        let y = Expr::var("y", 3.);
        assert_eq!((&y * 2.0).to_string(), "(y * 2.0)");
        assert_eq!((&y * 2).to_string(), "(y * 2)");
        assert_eq!(y.symbolic_backward()["y"].to_string(), "(0 + 1)");
        let grads = (&y * 2.0).symbolic_backward();
        assert_eq!(grads["y"].to_string(), "(0 + (1 * 2.0))");
    }

    #[test]
    fn test_shape_helpers() {
        let e = poly(1.) + Expr::var("y", 0.) * Expr::var("x", 1.);
        assert_eq!(e.variables(), vec!["x", "y"]);
        assert_eq!(Expr::<f64>::constant(1).size(), 1);
        assert_eq!(Expr::<f64>::constant(1).depth(), 1);
        let x = Expr::var("x", 1.);
        assert_eq!((-&x + 1).size(), 4);
        assert_eq!((-&x + 1).depth(), 3);
        assert!(x.is_leaf());
        assert!(!(-x).is_leaf());
    }
}
