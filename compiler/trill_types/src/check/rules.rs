//! Rules checked after solving: Bool operands, literal bounds, shift widths
//! and implicit downcasts from `Any`. Nodes typed `Error` are skipped.

use trill_ir::{DataType, InfixOp, Literal, LiteralKind, NodeId, NodeKind, PrefixOp, Span};

use super::TypeChecker;
use crate::{SemaContext, TypeCheckError, TypeErrorKind};

impl<C: SemaContext + ?Sized> TypeChecker<'_, C> {
    /// Ternary conditions and `!` operands must be canonically `Bool`.
    ///
    /// The solver lets `Any` through an equality, so this runs on the solved
    /// types. Returns `false` if any operand failed.
    pub(super) fn check_bool_operands(&mut self, nodes: &[NodeId]) -> bool {
        let ast = self.ast;
        let mut ok = true;
        for &id in nodes {
            let (operand, ternary) = match ast.kind(id) {
                NodeKind::Ternary { condition, .. } => (*condition, true),
                NodeKind::Prefix {
                    op: PrefixOp::Not,
                    operand,
                } => (*operand, false),
                _ => continue,
            };
            let ty = self.type_of(operand);
            if ty.is_error() || self.ctx.canonical_type(&ty) == DataType::Bool {
                continue;
            }
            let kind = if ternary {
                TypeErrorKind::NonBoolTernary {
                    got: self.type_name(&ty),
                }
            } else {
                TypeErrorKind::InvalidPrefixOperand {
                    op: "!",
                    ty: self.type_name(&ty),
                }
            };
            let span = ast.span(operand);
            self.errors
                .push(TypeCheckError::new(kind, span).with_highlight(span));
            ok = false;
        }
        ok
    }

    pub(super) fn check_rules(&mut self, nodes: &[NodeId]) {
        let ast = self.ast;
        for &id in nodes {
            match ast.kind(id) {
                NodeKind::Call { .. } | NodeKind::Subscript { .. } => self.check_call_args(id),
                NodeKind::Literal(Literal {
                    kind: LiteralKind::Int(value),
                    ty,
                }) => self.check_int_literal(id, *value, ty),
                NodeKind::Infix {
                    op, lhs, rhs, op_span, ..
                } => {
                    if op.is_shift() {
                        self.check_shift(*lhs, *rhs);
                    }
                    if *op == InfixOp::Assign {
                        let target = self.type_of(*lhs);
                        self.check_downcast(&target, *rhs, *op_span, &[ast.span(*lhs)]);
                    }
                }
                _ => {}
            }
        }
    }

    fn check_int_literal(&mut self, id: NodeId, value: i128, ty: &DataType) {
        if ty.is_error() {
            return;
        }
        let DataType::Int { width, signed } = self.ctx.canonical_type(ty) else {
            return;
        };
        // The unsigned maximum literal is always in range.
        if value == i128::from(u64::MAX) {
            return;
        }
        let (min, max) = int_bounds(width, signed);
        let raw = value.to_string();
        let ty = self.type_name(ty);
        let kind = if value < min {
            TypeErrorKind::Underflow { raw, ty }
        } else if value > max {
            TypeErrorKind::Overflow { raw, ty }
        } else {
            return;
        };
        let span = self.ast.span(id);
        self.errors
            .push(TypeCheckError::new(kind, span).with_highlight(span));
    }

    fn check_shift(&mut self, lhs: NodeId, rhs: NodeId) {
        let ast = self.ast;
        let amount_node = ast.unparen(rhs);
        let NodeKind::Literal(Literal {
            kind: LiteralKind::Int(amount),
            ..
        }) = ast.kind(amount_node)
        else {
            return;
        };
        let lhs_ty = self.type_of(lhs);
        let Some(width) = self.ctx.canonical_type(&lhs_ty).int_width() else {
            return;
        };
        if *amount >= i128::from(width) {
            let span = ast.span(amount_node);
            let kind = TypeErrorKind::ShiftPastBitWidth {
                ty: self.type_name(&lhs_ty),
                amount: *amount,
            };
            self.errors
                .push(TypeCheckError::new(kind, span).with_highlight(span));
        }
    }

    /// A value of type `Any` stored into a location of another type needs an
    /// explicit cast.
    pub(super) fn check_downcast(
        &mut self,
        target: &DataType,
        value: NodeId,
        span: Span,
        highlights: &[Span],
    ) {
        let found = self.type_of(value);
        if found.is_error() || target.is_error() {
            return;
        }
        if self.ctx.canonical_type(&found) != DataType::Any
            || self.ctx.canonical_type(target) == DataType::Any
        {
            return;
        }
        let mut error = TypeCheckError::new(
            TypeErrorKind::CannotDowncastFromAny {
                ty: self.type_name(target),
            },
            span,
        );
        for &highlight in highlights {
            error = error.with_highlight(highlight);
        }
        self.errors.push(error.with_highlight(self.ast.span(value)));
    }
}

/// Inclusive value range of an integer type.
fn int_bounds(width: u8, signed: bool) -> (i128, i128) {
    let width = u32::from(width.clamp(1, 64));
    if signed {
        let half = 1i128 << (width - 1);
        (-half, half - 1)
    } else {
        (0, (1i128 << width) - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::int_bounds;
    use pretty_assertions::assert_eq;

    #[test]
    fn bounds_per_width() {
        assert_eq!(int_bounds(8, false), (0, 255));
        assert_eq!(int_bounds(8, true), (-128, 127));
        assert_eq!(int_bounds(16, true), (-32768, 32767));
        assert_eq!(
            int_bounds(64, false),
            (0, i128::from(u64::MAX))
        );
        assert_eq!(
            int_bounds(64, true),
            (i128::from(i64::MIN), i128::from(i64::MAX))
        );
    }
}
