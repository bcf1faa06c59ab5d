use std::collections::HashMap;

use crate::value::Value;

/// One mapping from variable name to numeric value.
///
/// Loop bodies and conditional branches execute in the enclosing
/// environment, so no scope stack is needed: only a function call creates
/// a fresh `Environment`, seeded with its argument bindings and blind to
/// the caller's variables.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a variable, creating or overwriting it.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_set_get() {
        let mut env = Environment::new();
        env.set("x", Value::Int(42));
        assert_eq!(env.get("x"), Some(Value::Int(42)));
    }

    #[test]
    fn test_overwrite() {
        let mut env = Environment::new();
        env.set("x", Value::Int(1));
        env.set("x", Value::Int(2));
        assert_eq!(env.get("x"), Some(Value::Int(2)));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_missing_name() {
        let env = Environment::new();
        assert_eq!(env.get("missing"), None);
        assert!(!env.contains("missing"));
        assert!(env.is_empty());
    }
}
