use std::cmp::Ordering;

use wicker_error::{WickerResult, wicker_bail};
use wicker_node::{FieldName, NodeArena, NodeId};

/// A typed overlay bound to one backing object node at a time.
///
/// Implementations hold nothing but the backing handle; every operation
/// delegates to the node behind it, so the overlay is a pure lens, never a
/// second source of truth. Rebinding replaces which node is borrowed — it
/// aliases, it does not copy — and a view must stay confined to one thread,
/// like the record whose arena it reads.
pub trait NodeView: Sized + 'static {
    /// Stable name identifying this capability type in persisted layouts.
    const TYPE_NAME: &'static str;

    /// Wrap an existing backing node.
    fn bind(backing: NodeId) -> Self;

    /// The handle of the current backing node.
    fn backing(&self) -> NodeId;

    /// Replace the backing node.
    fn rebind(&mut self, backing: NodeId);

    /// Create a view over a freshly allocated empty object node.
    fn new(arena: &mut NodeArena) -> Self {
        let backing = arena.object();
        Self::bind(backing)
    }

    /// Read a field; the missing sentinel when absent. Never fails.
    fn get(&self, arena: &NodeArena, field: &str) -> NodeId {
        arena.get_field(self.backing(), field)
    }

    /// Read a field, collapsing both missing and explicit null to `None`.
    fn get_or_null(&self, arena: &NodeArena, field: &str) -> Option<NodeId> {
        let id = self.get(arena, field);
        (!id.is_absent()).then_some(id)
    }

    /// Write a field.
    fn put(&mut self, arena: &mut NodeArena, field: impl Into<FieldName>, value: NodeId) {
        arena.put_field(self.backing(), field, value);
    }

    /// Write a field, storing the canonical null for `None`.
    ///
    /// Never stores the missing sentinel: an absent input becomes an explicit
    /// null, not a hole.
    fn put_or_null(
        &mut self,
        arena: &mut NodeArena,
        field: impl Into<FieldName>,
        value: Option<NodeId>,
    ) {
        self.put(arena, field, value.unwrap_or(NodeId::NULL));
    }

    /// Read a field and rebind `target` over the value.
    ///
    /// Aliases the read node by handle — no copy is made, and rebinding never
    /// mutates the value as read elsewhere. Returns `Ok(None)` when the field
    /// is missing or null, and an error when a present value is not an object
    /// (a typed view can only overlay object nodes).
    fn get_typed<'v, V: NodeView>(
        &self,
        arena: &NodeArena,
        field: &str,
        target: &'v mut V,
    ) -> WickerResult<Option<&'v mut V>> {
        let value = self.get(arena, field);
        if value.is_absent() {
            return Ok(None);
        }
        if arena.node(value).as_object().is_none() {
            wicker_bail!(
                "cannot rebind typed view {} over {} node",
                V::TYPE_NAME,
                arena.kind(value)
            );
        }
        target.rebind(value);
        Ok(Some(target))
    }

    /// Store a view's backing node under `field`, or the canonical null.
    fn put_typed<V: NodeView>(
        &mut self,
        arena: &mut NodeArena,
        field: impl Into<FieldName>,
        value: Option<&V>,
    ) {
        let id = value.map(V::backing).unwrap_or(NodeId::NULL);
        self.put(arena, field, id);
    }

    /// A new view of the same concrete type over a deep clone of the backing
    /// node.
    fn clone_view(&self, arena: &mut NodeArena) -> Self {
        let backing = arena.deep_clone(self.backing());
        Self::bind(backing)
    }

    /// Number of fields of the backing node.
    fn field_count(&self, arena: &NodeArena) -> usize {
        arena.field_count(self.backing())
    }

    /// Iterate the backing node's fields in name order.
    fn fields<'a>(&self, arena: &'a NodeArena) -> impl Iterator<Item = (&'a FieldName, NodeId)> {
        arena.fields(self.backing())
    }

    /// Remove a field from the backing node.
    fn remove(&mut self, arena: &mut NodeArena, field: &str) {
        arena.remove_field(self.backing(), field);
    }

    /// Remove every field of the backing node.
    fn clear(&mut self, arena: &mut NodeArena) {
        arena.clear_fields(self.backing());
    }

    /// Replace the backing node's contents with a copy of another object
    /// node's fields, aliasing the children by handle.
    fn copy_value_from(&mut self, arena: &mut NodeArena, src: NodeId) {
        arena.clear_fields(self.backing());
        arena.copy_fields(self.backing(), src);
    }

    /// Compare the backing node against another subtree.
    fn compare(&self, arena: &NodeArena, other: NodeId) -> Ordering {
        arena.compare(self.backing(), other)
    }

    /// Render the backing node.
    fn render(&self, arena: &NodeArena) -> String {
        arena.render(self.backing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    struct Plain {
        backing: NodeId,
    }

    impl NodeView for Plain {
        const TYPE_NAME: &'static str = "Plain";

        fn bind(backing: NodeId) -> Self {
            Self { backing }
        }

        fn backing(&self) -> NodeId {
            self.backing
        }

        fn rebind(&mut self, backing: NodeId) {
            self.backing = backing;
        }
    }

    #[test]
    fn get_never_fails() {
        let mut arena = NodeArena::new();
        let view = Plain::new(&mut arena);
        assert!(view.get(&arena, "anything").is_missing());
        assert_eq!(view.get_or_null(&arena, "anything"), None);
    }

    #[test]
    fn get_or_null_collapses_both_sentinels() {
        let mut arena = NodeArena::new();
        let mut view = Plain::new(&mut arena);
        view.put(&mut arena, "explicit", NodeId::NULL);
        assert!(view.get(&arena, "explicit").is_null());
        assert_eq!(view.get_or_null(&arena, "explicit"), None);
    }

    #[test]
    fn put_or_null_stores_null_marker() {
        let mut arena = NodeArena::new();
        let mut view = Plain::new(&mut arena);
        view.put_or_null(&mut arena, "v", None);
        assert!(view.get(&arena, "v").is_null());
        let n = arena.integer(2);
        view.put_or_null(&mut arena, "v", Some(n));
        assert_eq!(view.get(&arena, "v"), n);
    }

    #[test]
    fn get_typed_rebinds_without_copying() {
        let mut arena = NodeArena::new();
        let mut parent = Plain::new(&mut arena);
        let child_node = arena.object();
        let name = arena.text("ada");
        arena.put_field(child_node, "name", name);
        parent.put(&mut arena, "child", child_node);

        let mut child_view = Plain::new(&mut arena);
        assert!(
            parent
                .get_typed(&arena, "child", &mut child_view)
                .unwrap()
                .is_some()
        );
        assert_eq!(child_view.backing(), child_node);

        // Writing through the rebound view is visible through the parent.
        let age = arena.integer(36);
        child_view.put(&mut arena, "age", age);
        assert_eq!(arena.get_field(child_node, "age"), age);
    }

    #[test]
    fn get_typed_collapses_absent_to_none() {
        let mut arena = NodeArena::new();
        let mut parent = Plain::new(&mut arena);
        parent.put(&mut arena, "explicit", NodeId::NULL);
        let mut child = Plain::new(&mut arena);
        assert!(parent.get_typed(&arena, "explicit", &mut child).unwrap().is_none());
        assert!(parent.get_typed(&arena, "absent", &mut child).unwrap().is_none());
    }

    #[test]
    fn get_typed_rejects_non_object_values() {
        let mut arena = NodeArena::new();
        let mut parent = Plain::new(&mut arena);
        let scalar = arena.integer(1);
        parent.put(&mut arena, "v", scalar);
        let mut child = Plain::new(&mut arena);
        assert!(parent.get_typed(&arena, "v", &mut child).is_err());
    }

    #[test]
    fn get_then_put_typed_is_a_noop() {
        let mut arena = NodeArena::new();
        let mut parent = Plain::new(&mut arena);
        let child_node = arena.object();
        let v = arena.integer(7);
        arena.put_field(child_node, "v", v);
        parent.put(&mut arena, "child", child_node);
        let before = arena.deep_clone(parent.backing());

        let mut child = Plain::new(&mut arena);
        parent.get_typed(&arena, "child", &mut child).unwrap();
        parent.put_typed(&mut arena, "child", Some(&child));

        assert!(arena.deep_eq(parent.backing(), before));
        assert_eq!(parent.get(&arena, "child"), child_node);
    }

    #[test]
    fn put_typed_none_stores_null() {
        let mut arena = NodeArena::new();
        let mut parent = Plain::new(&mut arena);
        parent.put_typed::<Plain>(&mut arena, "child", None);
        assert!(parent.get(&arena, "child").is_null());
    }

    #[test]
    fn clone_view_is_deep() {
        let mut arena = NodeArena::new();
        let mut view = Plain::new(&mut arena);
        let v = arena.integer(1);
        view.put(&mut arena, "v", v);

        let mut clone = view.clone_view(&mut arena);
        assert!(arena.deep_eq(view.backing(), clone.backing()));
        assert_ne!(view.backing(), clone.backing());

        let v2 = arena.integer(2);
        clone.put(&mut arena, "v", v2);
        assert!(!arena.deep_eq(view.backing(), clone.backing()));
    }

    #[test]
    fn copy_value_from_replaces_contents() {
        let mut arena = NodeArena::new();
        let mut view = Plain::new(&mut arena);
        let stale = arena.integer(0);
        view.put(&mut arena, "stale", stale);

        let src = arena.object();
        let fresh = arena.integer(1);
        arena.put_field(src, "fresh", fresh);
        view.copy_value_from(&mut arena, src);

        assert!(view.get(&arena, "stale").is_missing());
        assert_eq!(view.get(&arena, "fresh"), fresh);
    }
}
