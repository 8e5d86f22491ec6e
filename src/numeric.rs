use std::fmt::Debug;

/// A trait that represents a type that can be used as a value in this library.
///
/// Implementations for `f64` and `f32` are provided by the crate, but you can implement it for
/// your custom scalar type, such as a decimal or a rational number.
/// Nothing else in the crate needs to change to support a new type.
///
/// Subtraction from `from_int(0)` stands in for negation, so there is no `Neg` bound.
/// Undefined results, such as division by zero or the log of a negative number, are whatever
/// the type natively produces. The engines never inspect or fix them.
pub trait Scalar:
    std::ops::Add<Self, Output = Self>
    + std::ops::Sub<Self, Output = Self>
    + std::ops::Mul<Self, Output = Self>
    + std::ops::Div<Self, Output = Self>
    + Sized
    + Clone
    + Debug
{
    /// Raise `self` to the power `exp`.
    fn pow(self, exp: Self) -> Self;

    /// Natural logarithm.
    fn ln(self) -> Self;

    /// Convert an exact structural integer into this type.
    fn from_int(n: i64) -> Self;
}

macro_rules! impl_scalar_float {
    ($t:ty) => {
        impl Scalar for $t {
            fn pow(self, exp: Self) -> Self {
                <$t>::powf(self, exp)
            }

            fn ln(self) -> Self {
                <$t>::ln(self)
            }

            fn from_int(n: i64) -> Self {
                n as $t
            }
        }
    };
}

impl_scalar_float!(f64);
impl_scalar_float!(f32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_ops() {
        assert_eq!(Scalar::pow(2f64, 3.), 8.);
        assert_eq!(Scalar::pow(2f32, 3.), 8.);
        assert_eq!(Scalar::ln(1f64), 0.);
        assert_eq!(<f64 as Scalar>::from_int(-7), -7.);
        assert_eq!(<f32 as Scalar>::from_int(12), 12.);
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Meters(f64);

    macro_rules! impl_meters_op {
        ($op:ident, $method:ident) => {
            impl std::ops::$op for Meters {
                type Output = Self;
                fn $method(self, rhs: Self) -> Self {
                    Meters(std::ops::$op::$method(self.0, rhs.0))
                }
            }
        };
    }

    impl_meters_op!(Add, add);
    impl_meters_op!(Sub, sub);
    impl_meters_op!(Mul, mul);
    impl_meters_op!(Div, div);

    impl Scalar for Meters {
        fn pow(self, exp: Self) -> Self {
            Meters(self.0.powf(exp.0))
        }

        fn ln(self) -> Self {
            Meters(self.0.ln())
        }

        fn from_int(n: i64) -> Self {
            Meters(n as f64)
        }
    }

    #[test]
    fn test_custom_scalar_without_display() {
        let x = crate::Expr::var("x", Meters(3.));
        let e = &x * &x - crate::Expr::log(&x);
        assert_eq!(e.eval(), Meters(9. - 3f64.ln()));
        assert_eq!(e.backward()["x"], Meters(6. - 1. / 3.));
        assert_eq!(e.symbolic_backward().eval(), e.backward());
    }

    #[test]
    fn test_native_undefined() {
        assert!(Scalar::ln(-1f64).is_nan());
        assert_eq!(Scalar::ln(0f64), f64::NEG_INFINITY);
        assert!(Scalar::pow(-8f64, 1. / 3.).is_nan());
        assert_eq!(1f64 / <f64 as Scalar>::from_int(0), f64::INFINITY);
    }
}
