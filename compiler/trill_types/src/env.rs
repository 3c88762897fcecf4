//! Lexically scoped name -> type environment.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use trill_ir::{DataType, Name};

#[derive(Clone, Debug)]
struct TypeEnvInner {
    bindings: FxHashMap<Name, DataType>,
    parent: Option<TypeEnv>,
}

/// Type environment.
///
/// Cloning is O(1). A child scope shares its parent, and binding in the child
/// never touches the parent, so a caller that keeps the parent handle gets it
/// back verbatim when the child is dropped.
///
/// ```text
/// let mut env = TypeEnv::new();
/// env.bind(x, DataType::INT64);
///
/// let mut inner = env.child();
/// inner.bind(y, DataType::Bool);
/// assert_eq!(inner.lookup(x), Some(&DataType::INT64));
/// assert_eq!(env.lookup(y), None);
/// ```
#[derive(Clone, Debug)]
pub struct TypeEnv(Rc<TypeEnvInner>);

impl TypeEnv {
    pub fn new() -> Self {
        TypeEnv(Rc::new(TypeEnvInner {
            bindings: FxHashMap::default(),
            parent: None,
        }))
    }

    /// Create a child scope.
    #[must_use]
    pub fn child(&self) -> Self {
        TypeEnv(Rc::new(TypeEnvInner {
            bindings: FxHashMap::default(),
            parent: Some(self.clone()),
        }))
    }

    /// Bind a name in the current scope, shadowing outer bindings.
    pub fn bind(&mut self, name: Name, ty: DataType) {
        Rc::make_mut(&mut self.0).bindings.insert(name, ty);
    }

    /// Innermost binding of `name`.
    pub fn lookup(&self, name: Name) -> Option<&DataType> {
        let mut scope = Some(self);
        while let Some(env) = scope {
            if let Some(ty) = env.0.bindings.get(&name) {
                return Some(ty);
            }
            scope = env.0.parent.as_ref();
        }
        None
    }

    /// Check if a name is bound in the current scope only.
    pub fn is_bound_locally(&self, name: Name) -> bool {
        self.0.bindings.contains_key(&name)
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}
