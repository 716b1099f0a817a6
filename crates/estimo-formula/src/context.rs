//! The semantic context: a flat variable map consumed by the engine.

use std::collections::BTreeMap;

/// A scalar context value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

/// Flat variable -> scalar map built per assembly call.
///
/// Never persisted and never shared across calls; the builder in
/// `estimo-quote` derives one from free text, answers, and details each time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemanticContext {
    vars: BTreeMap<String, Scalar>,
}

impl SemanticContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_number(&mut self, name: impl Into<String>, value: f64) {
        self.vars.insert(name.into(), Scalar::Number(value));
    }

    pub fn set_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), Scalar::Text(value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.vars.get(name)
    }

    /// Numeric value of a variable, if present and numeric.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.vars.get(name) {
            Some(Scalar::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Iterates `(name, value)` in deterministic name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Scalar)> {
        self.vars.iter()
    }
}
