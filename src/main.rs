//! Evaluate and differentiate an expression given on the command line.
//!
//! Usage:
//!   exprgrad "3*x^2 - 4*x + 5" x=2
//!   exprgrad "x * y / log(y)" x=1.5 y=4 --symbolic --dot

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;

use exprgrad::{parse, symbolic_backward};

#[derive(Parser, Debug)]
#[command(name = "exprgrad")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Expression text, e.g. "x * y + log(x)"
    #[arg(value_name = "EXPR", allow_hyphen_values = true)]
    expr: String,

    /// Variable bindings
    #[arg(value_name = "NAME=VALUE")]
    bindings: Vec<String>,

    /// Also print symbolic gradients
    #[arg(short, long)]
    symbolic: bool,

    /// Print the expression as a graphviz dot graph annotated with values and gradients
    #[arg(long)]
    dot: bool,
}

fn parse_binding(binding: &str) -> Result<(String, f64)> {
    let (name, value) = binding
        .split_once('=')
        .ok_or_else(|| anyhow!("binding `{binding}` is not of the form NAME=VALUE"))?;
    let value = value
        .trim()
        .parse()
        .with_context(|| format!("invalid value for `{}`", name.trim()))?;
    Ok((name.trim().to_string(), value))
}

fn collect_bindings(bindings: &[String]) -> Result<HashMap<String, f64>> {
    let mut map = HashMap::new();
    for binding in bindings {
        let (name, value) = parse_binding(binding)?;
        if map.insert(name.clone(), value).is_some() {
            return Err(anyhow!("variable `{name}` is bound more than once"));
        }
    }
    Ok(map)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let bindings = collect_bindings(&args.bindings)?;
    info!("{} variables bound", bindings.len());

    let expr = parse(&args.expr, &bindings)
        .with_context(|| format!("failed to parse `{}`", args.expr))?;

    let res = expr.value_and_grad();
    println!("f = {expr}");
    println!("value: {}", res.value);
    for (id, grad) in res.grads.clone().into_sorted() {
        println!("d/d{id}: {grad}");
    }

    if args.symbolic {
        for (id, grad) in symbolic_backward(&expr).into_sorted() {
            println!("d/d{id} = {grad}");
        }
    }

    if args.dot {
        expr.dot_builder()
            .show_values(true)
            .grads(&res.grads)
            .dot(&mut std::io::stdout())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binding() {
        assert_eq!(parse_binding("x=2").unwrap(), ("x".to_string(), 2.));
        assert_eq!(parse_binding(" y = -0.5 ").unwrap(), ("y".to_string(), -0.5));
        assert!(parse_binding("x").is_err());
        assert!(parse_binding("x=abc").is_err());
    }

    #[test]
    fn test_duplicate_binding() {
        let ok = collect_bindings(&["x=1".to_string(), "y=5".to_string()]).unwrap();
        assert_eq!(ok.len(), 2);
        let err = collect_bindings(&["x=1".to_string(), "x=5".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "variable `x` is bound more than once");
    }

    #[test]
    fn test_args_leading_minus() {
        let args = Args::try_parse_from(["exprgrad", "-x + 1", "x=2"]).unwrap();
        assert_eq!(args.expr, "-x + 1");
        assert_eq!(args.bindings, vec!["x=2".to_string()]);
        assert!(!args.symbolic);

        let args = Args::try_parse_from(["exprgrad", "-x * y", "x=2", "y=3", "--symbolic"]).unwrap();
        assert_eq!(args.expr, "-x * y");
        assert!(args.symbolic);
    }
}
