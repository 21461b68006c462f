use std::any::Any;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use wicker_error::{WickerResult, wicker_panic};
use wicker_node::{Node, NodeArena, NodeId};

use crate::{ExprRef, KeyExpr};

/// Accesses one literal index or an inclusive index range of an array value.
///
/// Negative indexes count from the back of the array at evaluation time; only
/// a non-negative range is *fixed-size*, i.e. resolvable to record positions
/// without looking at the data.
#[derive(Debug, Clone, Eq, Hash)]
#[allow(clippy::derived_hash_with_manual_eq)]
pub struct ArrayAccess {
    start: i64,
    end: i64,
    child: ExprRef,
}

impl ArrayAccess {
    /// Build a single-index access over `child`.
    pub fn index(index: i64, child: ExprRef) -> ExprRef {
        Arc::new(Self {
            start: index,
            end: index,
            child,
        })
    }

    /// Build an inclusive range access over `child`.
    pub fn range(start: i64, end: i64, child: ExprRef) -> ExprRef {
        Arc::new(Self { start, end, child })
    }

    /// The first accessed index.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// The last accessed index.
    pub fn end(&self) -> i64 {
        self.end
    }

    /// The expression producing the accessed array.
    pub fn child(&self) -> &ExprRef {
        &self.child
    }

    /// Whether this access addresses exactly one index.
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Whether the accessed positions are known without looking at the data.
    pub fn is_fixed_size(&self) -> bool {
        0 <= self.start && self.start <= self.end
    }

    /// Split a fixed-size access into its per-index single-step accessors.
    pub fn decompose(&self) -> Vec<ExprRef> {
        if !self.is_fixed_size() {
            wicker_panic!("cannot decompose non-fixed-size array access {}", self);
        }
        (self.start..=self.end)
            .map(|index| Self::index(index, self.child.clone()))
            .collect()
    }

    /// Whether `expr` is an array access.
    pub fn is(expr: &ExprRef) -> bool {
        expr.as_any().is::<Self>()
    }
}

impl Display for ArrayAccess {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_single() {
            write!(f, "{}[{}]", self.child, self.start)
        } else {
            write!(f, "{}[{}:{}]", self.child, self.start, self.end)
        }
    }
}

impl KeyExpr for ArrayAccess {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn evaluate(&self, arena: &mut NodeArena, scope: NodeId) -> WickerResult<NodeId> {
        let child = self.child.evaluate(arena, scope)?;
        if self.is_single() {
            return Ok(arena.element(child, self.start));
        }
        let len = arena.element_count(child) as i64;
        let resolve = |index: i64| if index < 0 { len + index } else { index };
        let (start, end) = (resolve(self.start), resolve(self.end));
        let elements = (start..=end)
            .map(|index| {
                // A doubly-negative index must not wrap around a second time
                // inside `element`.
                if index < 0 {
                    NodeId::MISSING
                } else {
                    arena.element(child, index)
                }
            })
            .collect();
        Ok(arena.push(Node::Array(elements)))
    }

    fn children(&self) -> Vec<&ExprRef> {
        vec![self.child()]
    }

    fn replacing_children(self: Arc<Self>, children: Vec<ExprRef>) -> ExprRef {
        assert_eq!(children.len(), 1);
        Arc::new(Self {
            start: self.start,
            end: self.end,
            child: children[0].clone(),
        })
    }
}

impl PartialEq for ArrayAccess {
    fn eq(&self, other: &ArrayAccess) -> bool {
        self.start == other.start && self.end == other.end && self.child.eq(&other.child)
    }
}

#[cfg(test)]
mod tests {
    use wicker_error::WickerUnwrap;

    use super::*;
    use crate::field;

    fn numbers(arena: &mut NodeArena) -> NodeId {
        let root = arena.object();
        let xs = arena.array();
        for v in [10, 20, 30] {
            let node = arena.integer(v);
            arena.push_element(xs, node);
        }
        arena.put_field(root, "xs", xs);
        root
    }

    #[test]
    fn single_index_reads_element() {
        let mut arena = NodeArena::new();
        let root = numbers(&mut arena);
        let id = ArrayAccess::index(1, field("xs"))
            .evaluate(&mut arena, root)
            .wicker_unwrap();
        assert_eq!(arena.node(id).as_integer(), Some(20));
    }

    #[test]
    fn negative_index_counts_from_back() {
        let mut arena = NodeArena::new();
        let root = numbers(&mut arena);
        let id = ArrayAccess::index(-1, field("xs"))
            .evaluate(&mut arena, root)
            .wicker_unwrap();
        assert_eq!(arena.node(id).as_integer(), Some(30));
    }

    #[test]
    fn range_produces_subarray() {
        let mut arena = NodeArena::new();
        let root = numbers(&mut arena);
        let id = ArrayAccess::range(0, 1, field("xs"))
            .evaluate(&mut arena, root)
            .wicker_unwrap();
        assert_eq!(arena.render(id), "[10,20]");
    }

    #[test]
    fn decompose_yields_single_steps() {
        let access = ArrayAccess::range(0, 2, field("xs"));
        let access = access
            .as_any()
            .downcast_ref::<ArrayAccess>()
            .unwrap()
            .decompose();
        assert_eq!(access.len(), 3);
        assert_eq!(&access[0], &ArrayAccess::index(0, field("xs")));
        assert_eq!(&access[2], &ArrayAccess::index(2, field("xs")));
    }

    #[test]
    fn fixed_size_requires_non_negative_range() {
        let fixed = ArrayAccess::index(0, field("xs"));
        let tail = ArrayAccess::index(-1, field("xs"));
        let fixed = fixed.as_any().downcast_ref::<ArrayAccess>().unwrap();
        let tail = tail.as_any().downcast_ref::<ArrayAccess>().unwrap();
        assert!(fixed.is_fixed_size());
        assert!(!tail.is_fixed_size());
    }
}
