use std::any::Any;
use std::fmt::Display;
use std::sync::{Arc, LazyLock};

use wicker_error::WickerResult;
use wicker_node::{NodeArena, NodeId};

use crate::{ExprRef, KeyExpr};

static WHOLE: LazyLock<ExprRef> = LazyLock::new(|| Arc::new(WholeValue));

/// The distinguished expression denoting the entire record.
///
/// Never a field: layouts resolve it to the out-of-band `VALUE_INDEX` slot
/// instead of assigning it a table position.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct WholeValue;

impl WholeValue {
    /// The shared whole-value expression.
    pub fn new_expr() -> ExprRef {
        WHOLE.clone()
    }

    /// Whether `expr` is the whole-value expression.
    pub fn is(expr: &ExprRef) -> bool {
        // All instances come from the shared singleton, so the pointer check
        // settles the common case before falling back to the type check.
        Arc::ptr_eq(expr, &WHOLE) || expr.as_any().is::<Self>()
    }
}

impl Display for WholeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$")
    }
}

impl KeyExpr for WholeValue {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn evaluate(&self, _arena: &mut NodeArena, scope: NodeId) -> WickerResult<NodeId> {
        Ok(scope)
    }

    fn children(&self) -> Vec<&ExprRef> {
        vec![]
    }

    fn replacing_children(self: Arc<Self>, children: Vec<ExprRef>) -> ExprRef {
        assert_eq!(children.len(), 0);
        self
    }
}

// Return a shared pointer to the whole-value token.
pub fn whole() -> ExprRef {
    WholeValue::new_expr()
}
