//! `exprgrad!` builds expression trees from plain arithmetic.
//!
//! ```ignore
//! exprgrad! {{
//!     let x = 2.;
//!     let y = 3.;
//!     let f = pow(x, 2) * y + log(y) - 0.5;
//! }};
//! ```
//!
//! A `let` initialized with a number becomes a variable whose id is the binding's name.
//! Inside expressions, integer literals become structural constants and float literals
//! become literals. `pow(a, b)`, `log(a)` and `ln(a)` are the recognized functions.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    parse_macro_input, spanned::Spanned, BinOp, Block, Error, Expr, ExprLit, Ident, Lit,
    LitFloat, Pat, Result, Stmt, UnOp,
};

#[proc_macro]
pub fn exprgrad(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(input as Block);

    let mut terms = vec![];

    for stmt in &input.stmts {
        if let Err(e) = traverse_stmt(stmt, &mut terms) {
            return e.to_compile_error().into();
        }
    }

    let expanded = quote! {
        #(#terms)*
    };

    TokenStream::from(expanded)
}

fn traverse_stmt(input: &Stmt, terms: &mut Vec<TokenStream2>) -> Result<()> {
    match input {
        Stmt::Local(local) => {
            let (Pat::Ident(id), Some(init)) = (&local.pat, &local.init) else {
                return Err(Error::new(
                    local.span(),
                    "expected `let name = expression;`",
                ));
            };
            let name = id.ident.clone();
            let ts = if let Some(data) = numeric_leaf(&init.expr)? {
                quote! {
                    let #name = ::exprgrad::Expr::var(stringify!(#name), #data);
                }
            } else if let Expr::Path(path) = &*init.expr {
                quote! {
                    let #name = #path;
                }
            } else {
                let res = traverse_expr(&init.expr, terms)?;
                quote! {
                    let #name = #res;
                }
            };
            terms.push(ts);
        }
        Stmt::Expr(ex, _) => {
            traverse_expr(ex, terms)?;
        }
        _ => (),
    }
    Ok(())
}

/// `Some` for a literal number or a negated one.
fn numeric_leaf(ex: &Expr) -> Result<Option<TokenStream2>> {
    match ex {
        Expr::Lit(lit) => leaf_data(lit).map(Some),
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match &*unary.expr {
            Expr::Lit(lit) => leaf_data(lit).map(|data| Some(quote! { -#data })),
            _ => Ok(None),
        },
        _ => Ok(None),
    }
}

/// The value a numeric `let` initializer gives its variable. Integers are written as floats
/// so that the scalar type is inferred from the rest of the block.
fn leaf_data(ex: &ExprLit) -> Result<TokenStream2> {
    match &ex.lit {
        Lit::Float(f) => Ok(quote! { #f }),
        Lit::Int(i) => {
            let f = LitFloat::new(&format!("{}.0", i.base10_digits()), i.span());
            Ok(quote! { #f })
        }
        lit => Err(Error::new(lit.span(), "expected a number")),
    }
}

fn var_name(terms: &[TokenStream2], span: Span) -> Ident {
    Ident::new(&format!("_a{}", terms.len()), span)
}

fn push_term(terms: &mut Vec<TokenStream2>, span: Span, init: TokenStream2) -> Ident {
    let name = var_name(terms, span);
    terms.push(quote! {
        let #name = #init;
    });
    name
}

fn traverse_expr(input: &Expr, terms: &mut Vec<TokenStream2>) -> Result<Ident> {
    match input {
        Expr::Binary(ex) => {
            let lhs = traverse_expr(&ex.left, terms)?;
            let rhs = traverse_expr(&ex.right, terms)?;
            let builder = match ex.op {
                BinOp::Add(_) => quote! { add },
                BinOp::Sub(_) => quote! { sub },
                BinOp::Mul(_) => quote! { mul },
                BinOp::Div(_) => quote! { div },
                _ => return Err(Error::new(ex.op.span(), "unsupported operator")),
            };
            Ok(push_term(
                terms,
                ex.span(),
                quote! { ::exprgrad::Expr::#builder(&#lhs, &#rhs) },
            ))
        }
        Expr::Unary(ex) => match ex.op {
            UnOp::Neg(_) => {
                let term = traverse_expr(&ex.expr, terms)?;
                Ok(push_term(
                    terms,
                    ex.span(),
                    quote! { ::exprgrad::Expr::neg(&#term) },
                ))
            }
            _ => Err(Error::new(ex.op.span(), "unsupported operator")),
        },
        Expr::Paren(ex) => traverse_expr(&ex.expr, terms),
        Expr::Lit(lit) => {
            let init = match &lit.lit {
                Lit::Int(i) => quote! { ::exprgrad::Expr::constant(#i) },
                Lit::Float(f) => quote! { ::exprgrad::Expr::lit(#f) },
                other => return Err(Error::new(other.span(), "expected a number")),
            };
            Ok(push_term(terms, lit.span(), init))
        }
        Expr::Path(path) => path
            .path
            .get_ident()
            .cloned()
            .ok_or_else(|| Error::new(path.span(), "expected a variable name")),
        Expr::Call(call) => {
            let Expr::Path(func) = &*call.func else {
                return Err(Error::new(call.func.span(), "expected a function name"));
            };
            let func_name = func
                .path
                .get_ident()
                .map(|id| id.to_string())
                .unwrap_or_default();
            let args = call
                .args
                .iter()
                .map(|arg| traverse_expr(arg, terms))
                .collect::<Result<Vec<_>>>()?;
            let init = match (func_name.as_str(), args.as_slice()) {
                ("pow", [base, exponent]) => {
                    quote! { ::exprgrad::Expr::pow(&#base, &#exponent) }
                }
                ("log" | "ln", [term]) => quote! { ::exprgrad::Expr::log(&#term) },
                _ => {
                    return Err(Error::new(
                        call.span(),
                        "expected `pow(a, b)`, `log(a)` or `ln(a)`",
                    ))
                }
            };
            Ok(push_term(terms, call.span(), init))
        }
        _ => Err(Error::new(input.span(), "unsupported expression")),
    }
}
