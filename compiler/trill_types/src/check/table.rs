//! Side table of resolved node types.

use trill_ir::{Ast, DataType, NodeId, NodeKind, TypeFlags};

/// Resolved type per node, indexed by [`NodeId`].
///
/// Never holds a meta variable: storing a type that still contains one
/// stores `Error` instead.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct TypeTable {
    types: Vec<Option<DataType>>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize) -> Self {
        TypeTable {
            types: Vec::with_capacity(nodes),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&DataType> {
        self.types.get(id.index()).and_then(Option::as_ref)
    }

    pub fn set(&mut self, id: NodeId, ty: DataType) {
        let ty = if ty.flags().contains(TypeFlags::HAS_META_VAR) {
            DataType::Error
        } else {
            ty
        };
        let index = id.index();
        if index >= self.types.len() {
            self.types.resize(index + 1, None);
        }
        self.types[index] = Some(ty);
    }

    /// Give `id`, and the expression inside any parentheses around it, the
    /// type its context expects.
    pub fn propagate(&mut self, ast: &Ast, id: NodeId, ty: &DataType) {
        let mut current = id;
        loop {
            self.set(current, ty.clone());
            match ast.kind(current) {
                NodeKind::Paren(inner) => current = *inner,
                _ => break,
            }
        }
    }

    /// Number of typed nodes.
    pub fn len(&self) -> usize {
        self.types.iter().filter(|ty| ty.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DataType)> {
        self.types.iter().enumerate().filter_map(|(index, ty)| {
            let id = NodeId::new(u32::try_from(index).ok()?);
            Some((id, ty.as_ref()?))
        })
    }
}
