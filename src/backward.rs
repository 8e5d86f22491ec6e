//! Reverse-mode differentiation over [`Expr`] trees.
//!
//! Both engines run the same depth-first walk: the adjoint of the current node is handed
//! down to its children after multiplying by the local derivative, and variable leaves add
//! it into the gradient map. The left subtree is always finished before the right one is
//! entered, so contributions to a shared variable are summed in a fixed order.

use log::{debug, trace};

use crate::{
    chain::{ChainRule, Numerical, Symbolic},
    Expr, GradientMap, Scalar,
};

/// Numerical gradients of `expr` with respect to every variable it references.
pub fn backward<T: Scalar>(expr: &Expr<T>) -> GradientMap<T> {
    debug!("backward over {} nodes", expr.size());
    let mut grads = GradientMap::new();
    backprop_rec::<Numerical, T>(expr, <Numerical as ChainRule<T>>::one(), &mut grads);
    grads
}

/// Gradients of `expr` as new expressions, one per referenced variable.
///
/// The first contribution to a variable is wrapped as `Constant(0) + upstream` just like every
/// later one, so the result shape does not depend on whether a variable occurs once or many times.
pub fn symbolic_backward<T: Clone>(expr: &Expr<T>) -> GradientMap<Expr<T>> {
    debug!("symbolic backward over {} nodes", expr.size());
    let mut grads = GradientMap::new();
    backprop_rec::<Symbolic, T>(expr, <Symbolic as ChainRule<T>>::one(), &mut grads);
    grads
}

fn backprop_rec<R: ChainRule<T>, T>(
    expr: &Expr<T>,
    grad: R::Adjoint,
    grads: &mut GradientMap<R::Adjoint>,
) {
    use Expr::*;
    match expr {
        Variable { id, .. } => {
            trace!("accumulate gradient of {id}");
            grads.accumulate(id, |prev| R::add(prev.unwrap_or_else(R::zero), grad));
        }
        Literal(_) | Constant(_) => (),
        Add(lhs, rhs) => {
            backprop_rec::<R, T>(lhs, grad.clone(), grads);
            backprop_rec::<R, T>(rhs, grad, grads);
        }
        Sub(lhs, rhs) => {
            backprop_rec::<R, T>(lhs, grad.clone(), grads);
            backprop_rec::<R, T>(rhs, R::neg(grad), grads);
        }
        Mul(lhs, rhs) => {
            backprop_rec::<R, T>(lhs, R::mul(grad.clone(), R::lift(rhs)), grads);
            backprop_rec::<R, T>(rhs, R::mul(grad, R::lift(lhs)), grads);
        }
        Div(lhs, rhs) => {
            backprop_rec::<R, T>(lhs, R::div(grad.clone(), R::lift(rhs)), grads);
            let drhs = R::div(R::mul(grad, R::lift(lhs)), R::mul(R::lift(rhs), R::lift(rhs)));
            backprop_rec::<R, T>(rhs, R::neg(drhs), grads);
        }
        Pow(base, exponent) => {
            // d/db b^e = e * b^(e - 1)
            let dbase = R::mul(
                R::lift(exponent),
                R::pow(R::lift(base), R::sub(R::lift(exponent), R::one())),
            );
            backprop_rec::<R, T>(base, R::mul(grad.clone(), dbase), grads);
            // d/de b^e = b^e * ln(b)
            let dexponent = R::mul(R::pow(R::lift(base), R::lift(exponent)), R::ln(R::lift(base)));
            backprop_rec::<R, T>(exponent, R::mul(grad, dexponent), grads);
        }
        Neg(term) => backprop_rec::<R, T>(term, R::neg(grad), grads),
        Log(term) => backprop_rec::<R, T>(term, R::div(grad, R::lift(term)), grads),
    }
}

impl<T: Scalar> Expr<T> {
    /// See [`backward`].
    pub fn backward(&self) -> GradientMap<T> {
        backward(self)
    }
}

impl<T: Clone> Expr<T> {
    /// See [`symbolic_backward`].
    pub fn symbolic_backward(&self) -> GradientMap<Expr<T>> {
        symbolic_backward(self)
    }
}
