//! Reverse-mode automatic differentiation over scalar expression trees.
//!
//! Build an [`Expr`] from variables, literals and structural constants, then
//! [`eval`](Expr::eval) it, take numerical gradients with [`backward`], or build gradient
//! expressions with [`symbolic_backward`].

mod backward;
mod chain;
mod dot;
pub mod error;
mod expr;
mod gradient;
mod numeric;
pub mod parse;

pub use backward::{backward, symbolic_backward};
pub use dot::DotBuilder;
pub use error::ParseError;
pub use expr::Expr;
#[cfg(feature = "macro")]
pub use exprgrad_macro::exprgrad;
pub use gradient::{GradientMap, ValueAndGrad};
pub use numeric::Scalar;
pub use parse::parse;
