//! Lexical scope chain
//!
//! - [`ScopeStack`]: the chain of active layers, global layer at index 0
//! - [`Scope`]: one layer of bindings, pushed on block entry and popped on exit
//! - [`Binding`]: a declared variable with its fixed type and current value
//!
//! Layers are kept in a plain `Vec` indexed by nesting depth. Resolution walks
//! it from the innermost layer outward, so an inner declaration shadows an
//! outer one without touching it. Popping a layer drops its bindings and the
//! outer binding is visible again with its value unchanged.

use super::value::Value;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{SourceLocation, TypeKind};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::trace;

/// Name of the outermost layer
pub const GLOBAL_SCOPE: &str = "global";

/// A declared variable
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub var_type: TypeKind,
    pub value: Value,
    pub declared_at: SourceLocation,
}

/// One layer of the scope chain
#[derive(Debug, Clone)]
pub struct Scope {
    pub name: String,
    bindings: FxHashMap<String, Binding>,
    order: Vec<String>, // declaration order, for display
}

impl Scope {
    fn new(name: String) -> Self {
        Scope {
            name,
            bindings: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Bindings in the order they were declared
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.order
            .iter()
            .filter_map(|name| self.bindings.get(name).map(|b| (name.as_str(), b)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Failure of a scope operation, before a source location is attached
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScopeError {
    #[error("'{name}' is already declared in this scope")]
    Duplicate {
        name: String,
        previous: SourceLocation,
    },

    #[error("'{name}' is not declared")]
    Undeclared { name: String },

    #[error("value {value} does not fit in int variable '{name}'")]
    Conversion { name: String, value: Value },
}

impl ScopeError {
    /// Attach the location of the statement or expression that failed
    pub fn at(self, location: SourceLocation) -> RuntimeError {
        match self {
            ScopeError::Duplicate { name, previous } => RuntimeError::DuplicateDeclaration {
                name,
                location,
                previous,
            },
            ScopeError::Undeclared { name } => RuntimeError::UndeclaredIdentifier { name, location },
            ScopeError::Conversion { name, value } => RuntimeError::IntegerOverflow {
                operation: format!("conversion of {} to int for '{}'", value, name),
                location,
            },
        }
    }
}

/// The active scope chain
#[derive(Debug, Clone)]
pub struct ScopeStack {
    layers: Vec<Scope>,
    blocks_opened: usize,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            layers: vec![Scope::new(GLOBAL_SCOPE.to_string())],
            blocks_opened: 0,
        }
    }

    /// Push a fresh empty layer, named `block_N` in opening order
    pub fn push(&mut self) {
        self.blocks_opened += 1;
        let name = format!("block_{}", self.blocks_opened);
        trace!(scope = %name, depth = self.layers.len(), "push scope");
        self.layers.push(Scope::new(name));
    }

    /// Pop the innermost layer. The global layer is never popped.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.layers.len() <= 1 {
            return None;
        }
        let scope = self.layers.pop();
        if let Some(s) = &scope {
            trace!(scope = %s.name, depth = self.layers.len(), "pop scope");
        }
        scope
    }

    /// Nesting level of the innermost layer (global is 0)
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    pub fn current_name(&self) -> &str {
        self.layers
            .last()
            .map(|s| s.name.as_str())
            .unwrap_or(GLOBAL_SCOPE)
    }

    /// All layers, outermost first
    pub fn layers(&self) -> &[Scope] {
        &self.layers
    }

    /// Declare `name` in the innermost layer.
    ///
    /// The initial value is coerced to `var_type`; without one the binding
    /// starts at the type's zero value.
    pub fn declare(
        &mut self,
        name: &str,
        var_type: TypeKind,
        init: Option<Value>,
        location: SourceLocation,
    ) -> Result<(), ScopeError> {
        let Some(scope) = self.layers.last_mut() else {
            return Err(ScopeError::Undeclared { name: name.to_string() });
        };
        if let Some(existing) = scope.bindings.get(name) {
            return Err(ScopeError::Duplicate {
                name: name.to_string(),
                previous: existing.declared_at,
            });
        }

        let value = match init {
            Some(v) => coerce(name, v, var_type)?,
            None => Value::zero(var_type),
        };

        scope.bindings.insert(
            name.to_string(),
            Binding {
                var_type,
                value,
                declared_at: location,
            },
        );
        scope.order.push(name.to_string());
        Ok(())
    }

    /// Find the nearest binding of `name`, innermost layer first
    pub fn resolve(&self, name: &str) -> Result<&Binding, ScopeError> {
        self.layers
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name))
            .ok_or_else(|| ScopeError::Undeclared { name: name.to_string() })
    }

    /// Overwrite the nearest binding of `name`, coercing to its declared type.
    /// Returns the value actually stored.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<Value, ScopeError> {
        let binding = self
            .layers
            .iter_mut()
            .rev()
            .find_map(|scope| scope.bindings.get_mut(name))
            .ok_or_else(|| ScopeError::Undeclared { name: name.to_string() })?;

        let stored = coerce(name, value, binding.var_type)?;
        binding.value = stored;
        Ok(stored)
    }

    /// Rough size in bytes, used for snapshot accounting
    pub fn estimated_size(&self) -> usize {
        self.layers
            .iter()
            .map(|scope| {
                std::mem::size_of::<Scope>()
                    + scope.name.len()
                    + scope
                        .order
                        .iter()
                        .map(|n| 2 * n.len() + std::mem::size_of::<Binding>() + 32)
                        .sum::<usize>()
            })
            .sum()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

fn coerce(name: &str, value: Value, ty: TypeKind) -> Result<Value, ScopeError> {
    value.coerce_to(ty).ok_or_else(|| ScopeError::Conversion {
        name: name.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: usize) -> SourceLocation {
        SourceLocation::new(line, 1)
    }

    #[test]
    fn test_shadowing_restores_outer_value() {
        let mut scopes = ScopeStack::new();
        scopes.declare("t", TypeKind::Int, Some(Value::Int(100)), loc(1)).unwrap();

        scopes.push();
        scopes.declare("t", TypeKind::Int, None, loc(2)).unwrap();
        scopes.assign("t", Value::Int(50)).unwrap();
        assert_eq!(scopes.resolve("t").unwrap().value, Value::Int(50));
        scopes.pop();

        assert_eq!(scopes.resolve("t").unwrap().value, Value::Int(100));
    }

    #[test]
    fn test_assignment_writes_through_to_outer_layer() {
        let mut scopes = ScopeStack::new();
        scopes.declare("x", TypeKind::Int, None, loc(1)).unwrap();
        scopes.push();
        scopes.assign("x", Value::Int(7)).unwrap();
        scopes.pop();
        assert_eq!(scopes.resolve("x").unwrap().value, Value::Int(7));
    }

    #[test]
    fn test_duplicate_in_same_layer() {
        let mut scopes = ScopeStack::new();
        scopes.declare("a", TypeKind::Int, None, loc(1)).unwrap();
        let err = scopes.declare("a", TypeKind::Float, None, loc(2)).unwrap_err();
        assert_eq!(
            err,
            ScopeError::Duplicate {
                name: "a".to_string(),
                previous: loc(1)
            }
        );
    }

    #[test]
    fn test_duplicate_reported_before_conversion() {
        let mut scopes = ScopeStack::new();
        scopes.declare("n", TypeKind::Int, None, loc(1)).unwrap();
        let err = scopes
            .declare("n", TypeKind::Int, Some(Value::Float(f64::INFINITY)), loc(2))
            .unwrap_err();
        assert!(matches!(err, ScopeError::Duplicate { ref name, .. } if name == "n"));
        assert_eq!(scopes.resolve("n").unwrap().value, Value::Int(0));
    }

    #[test]
    fn test_undeclared() {
        let mut scopes = ScopeStack::new();
        assert!(matches!(scopes.resolve("nope"), Err(ScopeError::Undeclared { .. })));
        assert!(matches!(
            scopes.assign("nope", Value::Int(1)),
            Err(ScopeError::Undeclared { .. })
        ));
    }

    #[test]
    fn test_declared_type_governs_storage() {
        let mut scopes = ScopeStack::new();
        scopes.declare("f", TypeKind::Float, Some(Value::Int(10)), loc(1)).unwrap();
        scopes.declare("i", TypeKind::Int, None, loc(2)).unwrap();

        assert_eq!(scopes.resolve("f").unwrap().value, Value::Float(10.0));
        assert_eq!(scopes.assign("i", Value::Float(9.7)).unwrap(), Value::Int(9));
        assert!(matches!(
            scopes.assign("i", Value::Float(f64::INFINITY)),
            Err(ScopeError::Conversion { .. })
        ));
    }

    #[test]
    fn test_layer_names_and_depth() {
        let mut scopes = ScopeStack::new();
        assert_eq!(scopes.current_name(), "global");
        scopes.push();
        scopes.push();
        assert_eq!(scopes.depth(), 2);
        assert_eq!(scopes.current_name(), "block_2");
        scopes.pop();
        scopes.push();
        assert_eq!(scopes.current_name(), "block_3");
        scopes.pop();
        scopes.pop();
        assert!(scopes.pop().is_none());
        assert_eq!(scopes.depth(), 0);
    }

    #[test]
    fn test_iteration_follows_declaration_order() {
        let mut scopes = ScopeStack::new();
        for name in ["zeta", "alpha", "mid"] {
            scopes.declare(name, TypeKind::Int, None, loc(1)).unwrap();
        }
        let names: Vec<&str> = scopes.layers()[0].iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }
}
