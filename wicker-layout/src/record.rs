use std::sync::Arc;

use wicker_error::WickerResult;
use wicker_expr::ExprRef;
use wicker_node::{NodeArena, NodeId};
use wicker_view::AnyView;

use crate::RecordLayout;

/// One logical data item flowing between pipeline stages: a backing tree node
/// bound to the layout that defines its addressing scheme.
///
/// The record owns its node store; the layout is shared, never owned. Records
/// are single-owner, single-thread objects processed by one worker at a time.
#[derive(Debug)]
pub struct Record {
    layout: Arc<RecordLayout>,
    arena: NodeArena,
    root: NodeId,
}

impl Record {
    /// Create an empty record bound to `layout`.
    pub fn new(layout: Arc<RecordLayout>) -> Self {
        Self {
            layout,
            arena: NodeArena::new(),
            root: NodeId::MISSING,
        }
    }

    /// Bind an already-populated node store to `layout`.
    pub fn from_parts(layout: Arc<RecordLayout>, arena: NodeArena, root: NodeId) -> Self {
        Self {
            layout,
            arena,
            root,
        }
    }

    /// The layout defining this record's addressing scheme.
    pub fn layout(&self) -> &Arc<RecordLayout> {
        &self.layout
    }

    /// The backing node.
    pub fn node(&self) -> NodeId {
        self.root
    }

    /// Replace the backing node.
    pub fn set_node(&mut self, root: NodeId) {
        self.root = root;
    }

    /// The record's node store.
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// The record's node store, mutably.
    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    /// Resolve `expr` against the layout and evaluate it on the backing node.
    ///
    /// Resolving first guarantees that a key the layout never registered fails
    /// with `UnknownKeyExpression` instead of quietly evaluating.
    pub fn read(&mut self, expr: &ExprRef) -> WickerResult<NodeId> {
        self.layout.slot_of(expr)?;
        expr.evaluate(&mut self.arena, self.root)
    }

    /// Overlay the layout's target view type on the backing node, if one is
    /// attached.
    pub fn typed_node(&self) -> Option<AnyView> {
        self.layout.target_type().map(|ty| ty.overlay(self.root))
    }
}
