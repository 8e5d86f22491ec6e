use exprgrad_macro::exprgrad;

fn main() {
    exprgrad! {{
        let x = 123.;
        let result = 2 * x + 321.;
    }};
    let res = result.eval();
    println!("f(x): {res}");
    println!("df/dx: {}", result.backward()["x"]);
    for (id, grad) in result.symbolic_backward() {
        println!("d/d{id} = {grad}");
    }
    result.dot_builder().dot(&mut std::io::stdout()).unwrap();
}
