use std::{collections::HashMap, ops::Index};

use crate::{Expr, Scalar};

/// Accumulated gradients keyed by variable id.
///
/// There is exactly one entry per distinct id referenced by the differentiated expression.
/// A missing entry means the expression does not depend on that variable, which is not the
/// same as an entry whose value is zero: `x - x` has the entry `x -> 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientMap<V>(HashMap<String, V>);

impl<V> Default for GradientMap<V> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<V> GradientMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&V> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(id, grad)| (id.as_str(), grad))
    }

    /// Entries ordered by id, for stable output.
    pub fn into_sorted(self) -> Vec<(String, V)> {
        let mut entries: Vec<_> = self.0.into_iter().collect();
        entries.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));
        entries
    }

    /// Replace the entry for `id` with `f(previous entry)`.
    pub(crate) fn accumulate(&mut self, id: &str, f: impl FnOnce(Option<V>) -> V) {
        let prev = self.0.remove(id);
        self.0.insert(id.to_owned(), f(prev));
    }
}

impl<T: Scalar> GradientMap<Expr<T>> {
    /// Evaluate every symbolic gradient.
    pub fn eval(&self) -> GradientMap<T> {
        GradientMap(
            self.0
                .iter()
                .map(|(id, grad)| (id.clone(), grad.eval()))
                .collect(),
        )
    }
}

impl<V> Index<&str> for GradientMap<V> {
    type Output = V;
    fn index(&self, id: &str) -> &V {
        match self.0.get(id) {
            Some(grad) => grad,
            None => panic!("no gradient for variable `{id}`"),
        }
    }
}

impl<V> IntoIterator for GradientMap<V> {
    type Item = (String, V);
    type IntoIter = std::collections::hash_map::IntoIter<String, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The value of an expression together with its gradients.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueAndGrad<T> {
    pub value: T,
    pub grads: GradientMap<T>,
}

impl<T: Scalar> Expr<T> {
    pub fn value_and_grad(&self) -> ValueAndGrad<T> {
        ValueAndGrad {
            value: self.eval(),
            grads: self.backward(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate() {
        let mut grads = GradientMap::new();
        grads.accumulate("x", |prev: Option<f64>| prev.unwrap_or(0.) + 1.);
        grads.accumulate("x", |prev| prev.unwrap_or(0.) + 2.);
        grads.accumulate("y", |prev| prev.unwrap_or(0.) - 1.);
        assert_eq!(grads.len(), 2);
        assert_eq!(grads["x"], 3.);
        assert_eq!(grads.get("y"), Some(&-1.));
        assert_eq!(grads.get("z"), None);
        assert_eq!(
            grads.into_sorted(),
            vec![("x".to_string(), 3.), ("y".to_string(), -1.)]
        );
    }

    #[test]
    #[should_panic(expected = "no gradient for variable `w`")]
    fn test_index_missing() {
        let grads = GradientMap::<f64>::new();
        let _ = grads["w"];
    }

    #[test]
    fn test_value_and_grad() {
        let x = Expr::var("x", 3.);
        let y = Expr::var("y", 4.);
        let ValueAndGrad { value, grads } = (&x * &y + &x).value_and_grad();
        assert_eq!(value, 15.);
        assert_eq!(grads["x"], 5.);
        assert_eq!(grads["y"], 3.);
    }
}
