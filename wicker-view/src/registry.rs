use std::any::TypeId;
use std::fmt::{Display, Formatter};

use hashbrown::HashMap;
use wicker_error::{WickerError, WickerResult, wicker_panic};
use wicker_node::{NodeArena, NodeId};

use crate::NodeView;

/// The registered descriptor of a typed view capability.
///
/// This is what a layout caches when a target type is attached: the compiled
/// accessor logic is identified once, and instances are created on demand
/// against a record's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewType {
    name: &'static str,
    type_id: TypeId,
}

impl ViewType {
    /// The descriptor of a concrete view type.
    pub fn of<V: NodeView>() -> Self {
        Self {
            name: V::TYPE_NAME,
            type_id: TypeId::of::<V>(),
        }
    }

    /// The view type's stable name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this descriptor identifies the concrete type `V`.
    pub fn is<V: NodeView>(&self) -> bool {
        self.type_id == TypeId::of::<V>()
    }

    /// A fresh type-erased instance over a new empty object node.
    pub fn instance(&self, arena: &mut NodeArena) -> AnyView {
        let backing = arena.object();
        self.overlay(backing)
    }

    /// A type-erased instance aliasing an existing backing node.
    pub fn overlay(&self, backing: NodeId) -> AnyView {
        AnyView { ty: *self, backing }
    }
}

impl Display for ViewType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The typed view factory: an explicit registry of capability types.
///
/// Deserialized layouts carry their target type by name only, so attaching
/// one requires the registry that maps names back to compiled view types.
/// The registry is always passed as an argument, never ambient state.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    types: HashMap<&'static str, ViewType>,
}

impl ViewRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a concrete view type under its [`NodeView::TYPE_NAME`].
    ///
    /// Re-registering the same type is a no-op; registering a different type
    /// under an already-taken name is a setup bug.
    pub fn register<V: NodeView>(&mut self) -> &mut Self {
        let ty = ViewType::of::<V>();
        match self.types.get(ty.name()) {
            Some(existing) if *existing != ty => {
                wicker_panic!("view type name {} registered twice", ty.name())
            }
            Some(_) => {}
            None => {
                log::trace!("registered view type {}", ty.name());
                self.types.insert(ty.name(), ty);
            }
        }
        self
    }

    /// Whether `name` identifies a registered view type.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Resolve a view type by name.
    pub fn resolve(&self, name: &str) -> WickerResult<ViewType> {
        self.types
            .get(name)
            .copied()
            .ok_or_else(|| WickerError::UnsupportedCapability {
                type_name: name.to_string(),
            })
    }

    /// A fresh, independently mutable instance of the concrete view type `V`.
    pub fn view_for<V: NodeView>(&self, arena: &mut NodeArena) -> WickerResult<V> {
        let ty = self.resolve(V::TYPE_NAME)?;
        if !ty.is::<V>() {
            return Err(WickerError::UnsupportedCapability {
                type_name: V::TYPE_NAME.to_string(),
            });
        }
        Ok(V::new(arena))
    }

    /// A fresh type-erased instance of the view type registered under `name`.
    pub fn view_by_name(&self, name: &str, arena: &mut NodeArena) -> WickerResult<AnyView> {
        Ok(self.resolve(name)?.instance(arena))
    }
}

/// A type-erased typed view, used where the concrete type is only known by
/// name — typically right after deserializing a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyView {
    ty: ViewType,
    backing: NodeId,
}

impl AnyView {
    /// The descriptor of the wrapped view type.
    pub fn view_type(&self) -> ViewType {
        self.ty
    }

    /// The handle of the current backing node.
    pub fn backing(&self) -> NodeId {
        self.backing
    }

    /// Replace the backing node.
    pub fn rebind(&mut self, backing: NodeId) {
        self.backing = backing;
    }

    /// Recover the concrete view, if this wraps exactly the type `V`.
    pub fn downcast<V: NodeView>(&self) -> Option<V> {
        self.ty.is::<V>().then(|| V::bind(self.backing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    struct Alpha {
        backing: NodeId,
    }

    impl NodeView for Alpha {
        const TYPE_NAME: &'static str = "Alpha";

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

    #[derive(Debug, PartialEq, Eq)]
    struct Beta {
        backing: NodeId,
    }

    impl NodeView for Beta {
        const TYPE_NAME: &'static str = "Beta";

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
    fn resolve_unknown_name_is_unsupported() {
        let registry = ViewRegistry::new();
        let err = registry.resolve("Nope").unwrap_err();
        assert!(matches!(err, WickerError::UnsupportedCapability { .. }));
    }

    #[test]
    fn view_for_requires_registration() {
        let mut arena = NodeArena::new();
        let mut registry = ViewRegistry::new();
        assert!(registry.view_for::<Alpha>(&mut arena).is_err());
        registry.register::<Alpha>();
        let view = registry.view_for::<Alpha>(&mut arena).unwrap();
        assert_eq!(view.field_count(&arena), 0);
    }

    #[test]
    fn instances_are_independent() {
        let mut arena = NodeArena::new();
        let mut registry = ViewRegistry::new();
        registry.register::<Alpha>();
        let mut a = registry.view_for::<Alpha>(&mut arena).unwrap();
        let b = registry.view_for::<Alpha>(&mut arena).unwrap();
        assert_ne!(a.backing(), b.backing());
        let v = arena.integer(1);
        a.put(&mut arena, "v", v);
        assert_eq!(b.field_count(&arena), 0);
    }

    #[test]
    fn downcast_checks_the_concrete_type() {
        let mut arena = NodeArena::new();
        let mut registry = ViewRegistry::new();
        registry.register::<Alpha>().register::<Beta>();
        let erased = registry.view_by_name("Alpha", &mut arena).unwrap();
        assert!(erased.downcast::<Alpha>().is_some());
        assert!(erased.downcast::<Beta>().is_none());
    }

    #[test]
    fn reregistering_same_type_is_idempotent() {
        let mut registry = ViewRegistry::new();
        registry.register::<Alpha>().register::<Alpha>();
        assert!(registry.contains("Alpha"));
    }
}
