//! Substitutions from variables to types.

use rustc_hash::FxHashMap;
use trill_ir::{DataType, VarKey};

/// Mapping from variables to the types they were solved to.
///
/// Kept idempotent by composition: no bound type mentions a bound variable,
/// so a single [`apply`](Substitution::apply) fully resolves a type.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Substitution {
    map: FxHashMap<VarKey, DataType>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn get(&self, key: VarKey) -> Option<&DataType> {
        self.map.get(&key)
    }

    /// Bind `key := ty`.
    ///
    /// `ty` is resolved through the current bindings first, then every
    /// existing binding mentioning `key` is rewritten. The caller must have
    /// run the occurs check. Rebinding a variable is a logic error.
    pub fn insert(&mut self, key: VarKey, ty: DataType) {
        let ty = self.apply(&ty);
        debug_assert!(
            !ty.contains_var(key),
            "binding {key:?} to a type containing itself"
        );
        debug_assert!(
            !self.map.contains_key(&key),
            "variable {key:?} bound twice"
        );

        for bound in self.map.values_mut() {
            if bound.contains_var(key) {
                *bound = bound.replace_vars(&mut |k| (k == key).then(|| ty.clone()));
            }
        }
        self.map.insert(key, ty);
    }

    /// Resolve every bound variable in `ty`.
    pub fn apply(&self, ty: &DataType) -> DataType {
        if self.map.is_empty() {
            return ty.clone();
        }
        ty.replace_vars(&mut |key| self.map.get(&key).cloned())
    }

    /// Add every binding of `other`, in order.
    pub fn merge(&mut self, other: Substitution) {
        let mut entries: Vec<_> = other.map.into_iter().collect();
        // Deterministic composition order.
        entries.sort_by_key(|(key, _)| *key);
        for (key, ty) in entries {
            self.insert(key, ty);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarKey, &DataType)> {
        self.map.iter().map(|(k, v)| (*k, v))
    }
}
