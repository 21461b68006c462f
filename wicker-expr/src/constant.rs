use std::any::Any;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use wicker_error::WickerResult;
use wicker_node::{Node, NodeArena, NodeId};

use crate::{ExprRef, KeyExpr};

/// A scalar literal value carried inside an expression tree.
///
/// Floats compare and hash bitwise so that constants can live in the same
/// structural maps as every other expression.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum LitValue {
    /// The explicit null value.
    Null,
    /// A boolean literal.
    Bool(bool),
    /// An integer literal.
    Integer(i64),
    /// A float literal.
    Float(f64),
    /// A text literal.
    Text(String),
}

impl PartialEq for LitValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LitValue::Null, LitValue::Null) => true,
            (LitValue::Bool(l), LitValue::Bool(r)) => l == r,
            (LitValue::Integer(l), LitValue::Integer(r)) => l == r,
            (LitValue::Float(l), LitValue::Float(r)) => l.to_bits() == r.to_bits(),
            (LitValue::Text(l), LitValue::Text(r)) => l == r,
            _ => false,
        }
    }
}

impl Eq for LitValue {}

impl Hash for LitValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            LitValue::Null => {}
            LitValue::Bool(b) => b.hash(state),
            LitValue::Integer(v) => v.hash(state),
            LitValue::Float(v) => v.to_bits().hash(state),
            LitValue::Text(s) => s.hash(state),
        }
    }
}

impl From<bool> for LitValue {
    fn from(value: bool) -> Self {
        LitValue::Bool(value)
    }
}

impl From<i64> for LitValue {
    fn from(value: i64) -> Self {
        LitValue::Integer(value)
    }
}

impl From<f64> for LitValue {
    fn from(value: f64) -> Self {
        LitValue::Float(value)
    }
}

impl From<&str> for LitValue {
    fn from(value: &str) -> Self {
        LitValue::Text(value.to_string())
    }
}

impl From<String> for LitValue {
    fn from(value: String) -> Self {
        LitValue::Text(value)
    }
}

impl Display for LitValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LitValue::Null => write!(f, "null"),
            LitValue::Bool(b) => write!(f, "{b}"),
            LitValue::Integer(v) => write!(f, "{v}"),
            LitValue::Float(v) => write!(f, "{v}"),
            LitValue::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

/// A constant expression, evaluating to its literal regardless of the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constant {
    value: LitValue,
}

impl Constant {
    /// Build a constant expression.
    pub fn new_expr(value: impl Into<LitValue>) -> ExprRef {
        Arc::new(Self {
            value: value.into(),
        })
    }

    /// The literal value.
    pub fn value(&self) -> &LitValue {
        &self.value
    }

    /// Whether `expr` is a constant.
    pub fn is(expr: &ExprRef) -> bool {
        expr.as_any().is::<Self>()
    }
}

/// Build a constant expression from a literal.
pub fn lit(value: impl Into<LitValue>) -> ExprRef {
    Constant::new_expr(value)
}

impl Display for Constant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.value, f)
    }
}

impl KeyExpr for Constant {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn evaluate(&self, arena: &mut NodeArena, _scope: NodeId) -> WickerResult<NodeId> {
        let node = match &self.value {
            LitValue::Null => Node::Null,
            LitValue::Bool(b) => Node::Bool(*b),
            LitValue::Integer(v) => Node::Integer(*v),
            LitValue::Float(v) => Node::Float(*v),
            LitValue::Text(s) => Node::Text(s.clone()),
        };
        Ok(arena.push(node))
    }

    fn children(&self) -> Vec<&ExprRef> {
        vec![]
    }

    fn replacing_children(self: Arc<Self>, children: Vec<ExprRef>) -> ExprRef {
        assert_eq!(children.len(), 0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_to_literal() {
        let mut arena = NodeArena::new();
        let root = arena.object();
        let id = lit(9i64).evaluate(&mut arena, root).unwrap();
        assert_eq!(arena.node(id).as_integer(), Some(9));
        let id = lit(LitValue::Null).evaluate(&mut arena, root).unwrap();
        assert!(id.is_null());
    }

    #[test]
    fn float_literals_compare_bitwise() {
        assert_eq!(&lit(1.5f64), &lit(1.5f64));
        assert_ne!(&lit(1.5f64), &lit(2.5f64));
        assert_eq!(&lit(f64::NAN), &lit(f64::NAN));
    }
}
