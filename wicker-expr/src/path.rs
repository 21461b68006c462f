use crate::{ArrayAccess, ExprRef, GetField, WholeValue};

/// Whether `expr` is reachable at a fixed array position: a chain of field
/// accesses and fixed single-index array accesses rooted at the whole value.
///
/// This is the record layout's notion of a *direct* candidate; everything
/// else must be computed by evaluating the expression against the record.
pub fn is_fixed_path(expr: &ExprRef) -> bool {
    if WholeValue::is(expr) {
        return true;
    }
    if let Some(access) = expr.as_any().downcast_ref::<GetField>() {
        return is_fixed_path(access.child());
    }
    if let Some(access) = expr.as_any().downcast_ref::<ArrayAccess>() {
        return access.is_single() && access.is_fixed_size() && is_fixed_path(access.child());
    }
    false
}
