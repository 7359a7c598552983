use crate::ast::Expr;
use std::collections::HashMap;

/// Caches compiled expressions keyed by their raw source text, so a loop
/// body re-executing the same line a thousand times only pays the
/// shield/translate/tokenize/parse cost once (spec.md §4.3).
#[derive(Debug, Default)]
pub struct ExpressionCache {
    entries: HashMap<String, Expr>,
}

impl ExpressionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Expr> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, expr: Expr) {
        self.entries.insert(key, expr);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
