use std::{
    fmt::{Debug, Display},
    io::Write,
};

use crate::{Expr, GradientMap, Scalar};

/// Options for writing an expression as a graphviz dot graph.
///
/// Obtained from [`Expr::dot_builder`].
pub struct DotBuilder<'a, T> {
    expr: &'a Expr<T>,
    show_values: bool,
    vertical: bool,
    grads: Option<&'a GradientMap<T>>,
}

impl<T> Expr<T> {
    pub fn dot_builder(&self) -> DotBuilder<'_, T> {
        DotBuilder {
            expr: self,
            show_values: false,
            vertical: false,
            grads: None,
        }
    }
}

impl<'a, T: Scalar + Display> DotBuilder<'a, T> {
    /// Label every node with its evaluated value.
    pub fn show_values(mut self, v: bool) -> Self {
        self.show_values = v;
        self
    }

    /// Lay the graph out top to bottom instead of left to right.
    pub fn vertical(mut self, v: bool) -> Self {
        self.vertical = v;
        self
    }

    /// Label variable nodes with their entry in `grads`.
    pub fn grads(mut self, grads: &'a GradientMap<T>) -> Self {
        self.grads = Some(grads);
        self
    }

    /// Write graphviz dot file to the given writer.
    pub fn dot(&self, writer: &mut impl Write) -> std::io::Result<()> {
        let rankdir = if self.vertical { "TB" } else { "LR" };
        writeln!(writer, "digraph G {{\nrankdir=\"{rankdir}\";")?;
        let mut edges = vec![];
        self.write_node(self.expr, writer, &mut 0, &mut edges)?;
        for (from, to) in edges {
            writeln!(writer, "a{from} -> a{to};")?;
        }
        writeln!(writer, "}}")?;
        Ok(())
    }

    /// Writes `expr` and its subtree in pre-order, returning the id given to `expr`.
    /// Edges point from operands to the node that consumes them.
    fn write_node(
        &self,
        expr: &Expr<T>,
        writer: &mut impl Write,
        next_id: &mut usize,
        edges: &mut Vec<(usize, usize)>,
    ) -> std::io::Result<usize> {
        use Expr::*;
        let id = *next_id;
        *next_id += 1;

        let mut label = escape(&name(expr));
        if self.show_values {
            label += &format!("\\ndata:{}", expr.eval());
        }
        if let (Some(grads), Variable { id: var, .. }) = (self.grads, expr) {
            if let Some(grad) = grads.get(var) {
                label += &format!("\\ngrad:{grad}");
            }
        }
        let shape = if expr.is_leaf() { "box" } else { "ellipse" };
        writeln!(writer, "a{id} [label=\"{label}\", shape={shape}];")?;

        match expr {
            Variable { .. } | Literal(_) | Constant(_) => (),
            Add(lhs, rhs) | Sub(lhs, rhs) | Mul(lhs, rhs) | Div(lhs, rhs) | Pow(lhs, rhs) => {
                let lhs = self.write_node(lhs, writer, next_id, edges)?;
                let rhs = self.write_node(rhs, writer, next_id, edges)?;
                edges.push((lhs, id));
                edges.push((rhs, id));
            }
            Neg(term) | Log(term) => {
                let term = self.write_node(term, writer, next_id, edges)?;
                edges.push((term, id));
            }
        }
        Ok(id)
    }
}

fn name<T: Debug>(expr: &Expr<T>) -> String {
    use Expr::*;
    match expr {
        Variable { id, .. } => id.clone(),
        Literal(data) => format!("{data:?}"),
        Constant(n) => n.to_string(),
        Add(..) => "+".to_string(),
        Sub(..) => "-".to_string(),
        Mul(..) => "*".to_string(),
        Div(..) => "/".to_string(),
        Pow(..) => "^".to_string(),
        Neg(_) => "neg".to_string(),
        Log(_) => "log".to_string(),
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(builder: DotBuilder<'_, f64>) -> String {
        let mut buf = vec![];
        builder.dot(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_dot_structure() {
        let x = Expr::var("x", 2.);
        let e = &x * 3 + Expr::lit(1.5);
        let out = render(e.dot_builder());
        assert_eq!(
            out,
            "digraph G {\nrankdir=\"LR\";\n\
             a0 [label=\"+\", shape=ellipse];\n\
             a1 [label=\"*\", shape=ellipse];\n\
             a2 [label=\"x\", shape=box];\n\
             a3 [label=\"3\", shape=box];\n\
             a4 [label=\"1.5\", shape=box];\n\
             a2 -> a1;\n\
             a3 -> a1;\n\
             a1 -> a0;\n\
             a4 -> a0;\n\
             }\n"
        );
    }

    #[test]
    fn test_dot_values_and_grads() {
        let x = Expr::var("x", 2.);
        let e = Expr::log(&x) * &x;
        let grads = e.backward();
        let out = render(e.dot_builder().show_values(true).grads(&grads).vertical(true));
        assert!(out.contains("rankdir=\"TB\";"));
        assert!(out.contains("a0 [label=\"*\\ndata:1.3862943611198906\", shape=ellipse];"));
        assert_eq!(out.matches("\\ngrad:").count(), 2);
        assert_eq!(out.matches(" -> ").count(), 3);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a\"b"), "a\\\"b");
    }
}
