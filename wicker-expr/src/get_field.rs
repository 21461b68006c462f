use std::any::Any;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use wicker_error::WickerResult;
use wicker_node::{FieldName, NodeArena, NodeId};

use crate::{ExprRef, KeyExpr, whole};

/// Accesses a named member of an object-shaped value.
#[derive(Debug, Clone, Eq, Hash)]
#[allow(clippy::derived_hash_with_manual_eq)]
pub struct GetField {
    field: FieldName,
    child: ExprRef,
}

impl GetField {
    /// Build a field access over `child`.
    pub fn new_expr(field: impl Into<FieldName>, child: ExprRef) -> ExprRef {
        Arc::new(Self {
            field: field.into(),
            child,
        })
    }

    /// The accessed field name.
    pub fn field(&self) -> &FieldName {
        &self.field
    }

    /// The expression producing the accessed object.
    pub fn child(&self) -> &ExprRef {
        &self.child
    }

    /// Whether `expr` is a field access.
    pub fn is(expr: &ExprRef) -> bool {
        expr.as_any().is::<Self>()
    }
}

/// Access a top-level field of the record.
pub fn field(name: impl Into<FieldName>) -> ExprRef {
    GetField::new_expr(name, whole())
}

/// Access a field of the value produced by `child`.
pub fn get_field(name: impl Into<FieldName>, child: ExprRef) -> ExprRef {
    GetField::new_expr(name, child)
}

impl Display for GetField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.child, &self.field)
    }
}

impl KeyExpr for GetField {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn evaluate(&self, arena: &mut NodeArena, scope: NodeId) -> WickerResult<NodeId> {
        let child = self.child.evaluate(arena, scope)?;
        Ok(arena.get_field(child, &self.field))
    }

    fn children(&self) -> Vec<&ExprRef> {
        vec![self.child()]
    }

    fn replacing_children(self: Arc<Self>, children: Vec<ExprRef>) -> ExprRef {
        assert_eq!(children.len(), 1);
        Self::new_expr(self.field().clone(), children[0].clone())
    }
}

impl PartialEq for GetField {
    fn eq(&self, other: &GetField) -> bool {
        self.field == other.field && self.child.eq(&other.child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(arena: &mut NodeArena) -> NodeId {
        let obj = arena.object();
        let name = arena.text("ada");
        arena.put_field(obj, "name", name);
        obj
    }

    #[test]
    fn reads_present_field() {
        let mut arena = NodeArena::new();
        let root = person(&mut arena);
        let id = field("name").evaluate(&mut arena, root).unwrap();
        assert_eq!(arena.node(id).as_text(), Some("ada"));
    }

    #[test]
    fn absent_field_is_missing() {
        let mut arena = NodeArena::new();
        let root = person(&mut arena);
        let id = field("age").evaluate(&mut arena, root).unwrap();
        assert!(id.is_missing());
    }

    #[test]
    fn nested_access_through_missing_stays_missing() {
        let mut arena = NodeArena::new();
        let root = person(&mut arena);
        let expr = get_field("street", field("address"));
        let id = expr.evaluate(&mut arena, root).unwrap();
        assert!(id.is_missing());
    }
}
