//! Value and gradient of 3x^2 - 4x + 5 over a range of x, written as csv.
use exprgrad::Expr;

fn main() {
    println!("x, f(x), df/dx, df/dx (symbolic)");
    for i in -10..=10 {
        let x = Expr::var("x", i as f64 * 0.2);
        let f = 3 * Expr::pow(&x, 2) - 4 * &x + 5;
        let res = f.value_and_grad();
        let symbolic = f.symbolic_backward();
        println!(
            "{}, {}, {}, {}",
            x.eval(),
            res.value,
            res.grads["x"],
            symbolic["x"].eval()
        );
    }
}
