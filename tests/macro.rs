use exprgrad::Expr;
use exprgrad_macro::exprgrad;

#[test]
fn captures_names() {
    exprgrad! {{
        let x = 2.;
        let y = 3;
        let f = pow(x, 2) * y + log(y) - 0.5;
    }};
    assert_eq!(x, Expr::var("x", 2.));
    assert_eq!(y, Expr::var("y", 3.));
    assert!((f.eval() - (12. + 3f64.ln() - 0.5)).abs() < 1e-12);

    let grads = f.backward();
    assert_eq!(grads["x"], 12.);
    assert!((grads["y"] - (4. + 1. / 3.)).abs() < 1e-12);
}

#[test]
fn literal_kinds() {
    exprgrad! {{
        let x = -1.5;
        let f = 2 * x + 0.25 / -x;
    }};
    assert_eq!(
        f,
        Expr::add(
            Expr::mul(Expr::constant(2), Expr::var("x", -1.5)),
            Expr::div(Expr::lit(0.25), Expr::neg(Expr::var("x", -1.5))),
        )
    );
    assert_eq!(f.backward()["x"], 2. + 0.25 / (1.5 * 1.5));
}

#[test]
fn symbolic_from_macro() {
    exprgrad! {{
        let a = 4.;
        let b = 2.;
        let ratio = (a - b) / (a + b);
    }};
    let numeric = ratio.backward();
    let symbolic = ratio.symbolic_backward().eval();
    assert_eq!(numeric, symbolic);
    assert_eq!(a.eval(), 4.);
    assert_eq!(b.eval(), 2.);
}
