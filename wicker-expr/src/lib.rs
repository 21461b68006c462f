//! Key expressions for Wicker
//!
//! A key expression addresses data within a record: the whole record, a field
//! of it, a fixed array position, or a value computed from it. Expressions are
//! shared behind [`ExprRef`] and compared structurally, which is what lets the
//! record layout deduplicate them and use them as index keys.

use std::any::Any;
use std::fmt::{Debug, Display};
use std::sync::Arc;

use dyn_hash::DynHash;
use wicker_error::WickerResult;
use wicker_node::{NodeArena, NodeId};

mod array_access;
mod constant;
mod element_count;
mod forms;
mod get_field;
mod path;
mod whole;

pub use array_access::*;
pub use constant::*;
pub use element_count::*;
pub use forms::*;
pub use get_field::*;
pub use path::*;
pub use whole::*;

/// A shared, structurally comparable key expression.
pub type ExprRef = Arc<dyn KeyExpr>;

/// An expression addressing data within a record.
pub trait KeyExpr: Debug + Send + Sync + DynEq + DynHash + Display {
    /// Convert expression reference to reference of [`Any`] type
    fn as_any(&self) -> &dyn Any;

    /// Evaluate this expression against the subtree rooted at `scope`.
    ///
    /// Returns [`NodeId::MISSING`] when the addressed position has no value;
    /// evaluation may allocate into the arena (computed expressions do).
    fn evaluate(&self, arena: &mut NodeArena, scope: NodeId) -> WickerResult<NodeId>;

    /// The child expressions, outermost first.
    fn children(&self) -> Vec<&ExprRef>;

    /// Rebuild this expression with its children replaced.
    fn replacing_children(self: Arc<Self>, children: Vec<ExprRef>) -> ExprRef;
}

// Adapted from apache/datafusion https://github.com/apache/datafusion/blob/f31ca5b927c040ce03f6a3c8c8dc3d7f4ef5be34/datafusion/physical-expr-common/src/physical_expr.rs#L156
/// [`KeyExpr`] can't be constrained by [`Eq`] directly because it must remain object
/// safe. To ease implementation blanket implementation is provided for [`Eq`] types.
pub trait DynEq {
    /// Compare against any other value, false when the types differ.
    fn dyn_eq(&self, other: &dyn Any) -> bool;
}

impl<T: Eq + Any> DynEq for T {
    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<Self>() == Some(self)
    }
}

impl PartialEq for dyn KeyExpr {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other.as_any())
    }
}

impl Eq for dyn KeyExpr {}

dyn_hash::hash_trait_object!(KeyExpr);
