use std::any::Any;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use wicker_error::{WickerResult, wicker_bail};
use wicker_node::{Node, NodeArena, NodeId};

use crate::{ExprRef, KeyExpr};

/// Computes the cardinality of an array or object value.
///
/// Never positionally addressable, so layouts always classify it into the
/// calculated partition.
#[derive(Debug, Clone, Eq, Hash)]
#[allow(clippy::derived_hash_with_manual_eq)]
pub struct ElementCount {
    child: ExprRef,
}

impl ElementCount {
    /// Build a cardinality expression over `child`.
    pub fn new_expr(child: ExprRef) -> ExprRef {
        Arc::new(Self { child })
    }

    /// The expression producing the counted value.
    pub fn child(&self) -> &ExprRef {
        &self.child
    }

    /// Whether `expr` is a cardinality expression.
    pub fn is(expr: &ExprRef) -> bool {
        expr.as_any().is::<Self>()
    }
}

/// Count the elements of the value produced by `child`.
pub fn element_count(child: ExprRef) -> ExprRef {
    ElementCount::new_expr(child)
}

impl Display for ElementCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "count({})", self.child)
    }
}

impl KeyExpr for ElementCount {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn evaluate(&self, arena: &mut NodeArena, scope: NodeId) -> WickerResult<NodeId> {
        let child = self.child.evaluate(arena, scope)?;
        let count = match arena.node(child) {
            Node::Array(elements) => elements.len(),
            Node::Object(fields) => fields.len(),
            Node::Missing | Node::Null => 0,
            other => wicker_bail!("cannot count elements of {} node", other.kind()),
        };
        Ok(arena.integer(count as i64))
    }

    fn children(&self) -> Vec<&ExprRef> {
        vec![self.child()]
    }

    fn replacing_children(self: Arc<Self>, children: Vec<ExprRef>) -> ExprRef {
        assert_eq!(children.len(), 1);
        Self::new_expr(children[0].clone())
    }
}

impl PartialEq for ElementCount {
    fn eq(&self, other: &ElementCount) -> bool {
        self.child.eq(&other.child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;

    #[test]
    fn counts_array_elements() {
        let mut arena = NodeArena::new();
        let root = arena.object();
        let xs = arena.array();
        let one = arena.integer(1);
        arena.push_element(xs, one);
        arena.put_field(root, "xs", xs);

        let id = element_count(field("xs")).evaluate(&mut arena, root).unwrap();
        assert_eq!(arena.node(id).as_integer(), Some(1));
    }

    #[test]
    fn absent_value_counts_zero() {
        let mut arena = NodeArena::new();
        let root = arena.object();
        let id = element_count(field("xs")).evaluate(&mut arena, root).unwrap();
        assert_eq!(arena.node(id).as_integer(), Some(0));
    }

    #[test]
    fn scalar_value_is_an_error() {
        let mut arena = NodeArena::new();
        let root = arena.object();
        let v = arena.integer(3);
        arena.put_field(root, "xs", v);
        assert!(element_count(field("xs")).evaluate(&mut arena, root).is_err());
    }
}
