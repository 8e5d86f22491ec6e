use exprgrad::Expr;

fn main() {
    let a = Expr::var("a", 123.);
    let b = Expr::var("b", 321.);
    let c = Expr::var("c", 42.);
    let ab = &a + &b;
    let abc = &ab * &c;
    println!("a + b: {ab}");
    println!("(a + b) * c: {abc}");

    let grads = abc.backward();
    println!("d((a + b) * c) / da = {}", grads["a"]);
    println!("d((a + b) * c) / db = {}", grads["b"]);
    println!("d((a + b) * c) / dc = {}", grads["c"]);

    let log_abc = Expr::log(&abc) / 2;
    let grads = log_abc.backward();
    println!("d(log((a + b) * c) / 2) / dc = {}", grads["c"]);

    log_abc
        .dot_builder()
        .show_values(true)
        .grads(&grads)
        .dot(&mut std::io::stdout())
        .unwrap();
}
