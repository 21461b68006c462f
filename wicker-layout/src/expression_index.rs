use hashbrown::HashMap;
use wicker_expr::{ArrayAccess, ExprRef, WholeValue, is_fixed_path};

/// Bidirectional bookkeeping used while a layout is under construction.
///
/// Classifies each candidate key expression as a *direct* slot (accepted,
/// registered at a proposed position) or leaves it for the *calculated*
/// partition (rejected). Expressions are deduplicated by structural equality;
/// re-adding one resolves to its already-assigned position. Construction is
/// single-threaded and the index is discarded once the layout's tables are
/// frozen.
#[derive(Debug, Default)]
pub struct ExpressionIndex {
    index: HashMap<ExprRef, usize>,
}

impl ExpressionIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `expr` as a direct candidate at `proposed` and report whether it
    /// was accepted.
    ///
    /// Accepted are: the whole-value singleton (which the caller drops before
    /// slot assignment — it never takes a numbered slot), fixed paths, and
    /// fixed-size array ranges whose decomposed single-step accessors are all
    /// already registered at contiguous ascending positions. Everything else
    /// must be calculated at read time.
    pub fn add(&mut self, expr: &ExprRef, proposed: usize) -> bool {
        if WholeValue::is(expr) {
            return true;
        }
        if let Some(access) = expr.as_any().downcast_ref::<ArrayAccess>() {
            if !access.is_fixed_size() {
                return false;
            }
            if !access.is_single() {
                return self.add_range(expr, access, proposed);
            }
        }
        if is_fixed_path(expr) {
            self.index.entry(expr.clone()).or_insert(proposed);
            return true;
        }
        false
    }

    fn add_range(&mut self, expr: &ExprRef, access: &ArrayAccess, proposed: usize) -> bool {
        let mut expected = None;
        for step in access.decompose() {
            let Some(&slot) = self.index.get(&step) else {
                return false;
            };
            match expected {
                Some(want) if slot != want => return false,
                _ => expected = Some(slot + 1),
            }
        }
        self.index.entry(expr.clone()).or_insert(proposed);
        true
    }

    /// The position assigned to `expr`, if it was accepted as direct.
    pub fn get(&self, expr: &ExprRef) -> Option<usize> {
        self.index.get(expr).copied()
    }
}

#[cfg(test)]
mod tests {
    use wicker_expr::{element_count, field, lit};

    use super::*;

    #[test]
    fn field_accesses_are_direct() {
        let mut index = ExpressionIndex::new();
        assert!(index.add(&field("a"), 0));
        assert_eq!(index.get(&field("a")), Some(0));
    }

    #[test]
    fn duplicates_resolve_to_the_first_position() {
        let mut index = ExpressionIndex::new();
        assert!(index.add(&field("a"), 0));
        assert!(index.add(&field("a"), 5));
        assert_eq!(index.get(&field("a")), Some(0));
    }

    #[test]
    fn whole_value_is_accepted_but_never_registered() {
        let mut index = ExpressionIndex::new();
        assert!(index.add(&wicker_expr::whole(), 0));
        assert_eq!(index.get(&wicker_expr::whole()), None);
    }

    #[test]
    fn computed_expressions_are_rejected() {
        let mut index = ExpressionIndex::new();
        assert!(!index.add(&element_count(field("xs")), 0));
        assert!(!index.add(&lit(1i64), 0));
        assert!(!index.add(&ArrayAccess::index(-1, field("xs")), 0));
    }

    #[test]
    fn range_requires_contiguously_registered_steps() {
        let range = ArrayAccess::range(0, 1, field("xs"));

        let mut index = ExpressionIndex::new();
        assert!(!index.add(&range, 0));

        assert!(index.add(&ArrayAccess::index(0, field("xs")), 0));
        assert!(index.add(&ArrayAccess::index(1, field("xs")), 1));
        assert!(index.add(&range, 2));
    }

    #[test]
    fn range_rejects_non_contiguous_steps() {
        let mut index = ExpressionIndex::new();
        assert!(index.add(&ArrayAccess::index(0, field("xs")), 0));
        assert!(index.add(&field("gap"), 1));
        assert!(index.add(&ArrayAccess::index(1, field("xs")), 2));
        assert!(!index.add(&ArrayAccess::range(0, 1, field("xs")), 3));
    }
}
