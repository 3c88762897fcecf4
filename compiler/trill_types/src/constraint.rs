//! Constraints produced by the generator.
//!
//! By convention the first type of an `Equal` is the expected side (the
//! annotation, the parameter, the callee) and the second the found side. The
//! solver itself treats `Equal` symmetrically; the order only shapes
//! diagnostics.

use std::fmt;

use trill_ir::{DataType, NodeId};

use crate::Substitution;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConstraintKind {
    /// The two types must unify.
    Equal(DataType, DataType),
    /// The first type must conform to the protocol named by the second.
    Conforms(DataType, DataType),
}

/// Where in the generator a constraint was emitted.
///
/// The checker uses the site to pick the most specific diagnostic when the
/// constraint fails.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConstraintSite {
    /// Base of a property access against the property's owner type.
    PropertyOwner,
    /// Property declaration type against the access result.
    PropertyResult,
    /// Declared type against the initializer.
    DeclAnnotation,
    /// Fresh binding of an untyped declaration against its initializer.
    DeclInitializer,
    /// Callee type against the call shape.
    CallCallee,
    /// Overload placeholder against the chosen overload.
    OverloadChoice,
    InfixOperator,
    CompoundAssignment,
    LogicalNot,
    Deref,
    TernaryCondition,
    TernaryBranch,
    ArrayElement,
    Subscript,
    Coercion,
    Assignment,
    /// Declared return type pushed down onto a returned expression.
    FunctionReturn,
    Conformance,
}

impl ConstraintSite {
    pub const fn description(self) -> &'static str {
        match self {
            Self::PropertyOwner => "property owner",
            Self::PropertyResult => "property type",
            Self::DeclAnnotation => "declaration annotation",
            Self::DeclInitializer => "declaration initializer",
            Self::CallCallee => "call",
            Self::OverloadChoice => "overload choice",
            Self::InfixOperator => "infix operator",
            Self::CompoundAssignment => "compound assignment",
            Self::LogicalNot => "logical not",
            Self::Deref => "dereference",
            Self::TernaryCondition => "ternary condition",
            Self::TernaryBranch => "ternary branch",
            Self::ArrayElement => "array element",
            Self::Subscript => "subscript",
            Self::Coercion => "coercion",
            Self::Assignment => "assignment",
            Self::FunctionReturn => "return value",
            Self::Conformance => "protocol conformance",
        }
    }
}

impl fmt::Display for ConstraintSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// One relation between two types, anchored at the node that produced it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub site: ConstraintSite,
    pub node: Option<NodeId>,
}

/// Ordered constraints; order fixes both diagnostics and forward
/// substitution.
pub type ConstraintSystem = Vec<Constraint>;

impl Constraint {
    pub fn equal(
        expected: DataType,
        found: DataType,
        site: ConstraintSite,
        node: Option<NodeId>,
    ) -> Self {
        Constraint {
            kind: ConstraintKind::Equal(expected, found),
            site,
            node,
        }
    }

    pub fn conforms(
        ty: DataType,
        protocol: DataType,
        site: ConstraintSite,
        node: Option<NodeId>,
    ) -> Self {
        Constraint {
            kind: ConstraintKind::Conforms(ty, protocol),
            site,
            node,
        }
    }

    /// This constraint with `subst` applied to both sides.
    #[must_use]
    pub fn substituted(&self, subst: &Substitution) -> Constraint {
        let kind = match &self.kind {
            ConstraintKind::Equal(a, b) => ConstraintKind::Equal(subst.apply(a), subst.apply(b)),
            ConstraintKind::Conforms(a, b) => {
                ConstraintKind::Conforms(subst.apply(a), subst.apply(b))
            }
        };
        Constraint {
            kind,
            site: self.site,
            node: self.node,
        }
    }
}
