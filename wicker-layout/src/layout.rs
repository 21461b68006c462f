use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use wicker_error::{WickerError, WickerResult, wicker_err};
use wicker_expr::{ArrayAccess, ExprRef, WholeValue, whole};
use wicker_node::NodeArena;
use wicker_view::{AnyView, ViewRegistry, ViewType};

use crate::ExpressionIndex;

/// The frozen addressing schema shared by every record of a compiled pipeline.
///
/// Built once, single-threaded, from the ordered set of key expressions the
/// plan uses anywhere; immutable and freely shared across readers afterwards.
/// Direct slots occupy positions `0..num_direct_slots()`, calculated slots
/// follow at `num_direct_slots()..num_total_slots()`, and the whole-value
/// expression resolves to the out-of-band [`RecordLayout::VALUE_INDEX`].
#[derive(Debug)]
pub struct RecordLayout {
    direct: Vec<ExprRef>,
    calculated: Vec<ExprRef>,
    direct_index: HashMap<ExprRef, usize>,
    calculated_index: HashMap<ExprRef, usize>,
    target: Option<ViewType>,
}

impl RecordLayout {
    /// The slot of the whole-value expression, distinct from every table slot.
    pub const VALUE_INDEX: usize = usize::MAX;

    /// Build a layout from the ordered key expressions of a plan.
    ///
    /// Expressions are partitioned into direct and calculated slots preserving
    /// first-seen order; structural duplicates resolve to their first slot and
    /// the whole-value expression never takes a numbered slot.
    pub fn create(keys: impl IntoIterator<Item = ExprRef>) -> Self {
        let mut index = ExpressionIndex::new();
        let mut seen = HashSet::new();
        let mut direct = Vec::new();
        let mut calculated = Vec::new();
        for key in keys {
            if !seen.insert(key.clone()) {
                continue;
            }
            if index.add(&key, direct.len()) {
                if !WholeValue::is(&key) {
                    direct.push(key);
                }
            } else {
                calculated.push(key);
            }
        }

        let direct_index = direct
            .iter()
            .cloned()
            .enumerate()
            .map(|(slot, expr)| (expr, slot))
            .collect();
        let calculated_index = calculated
            .iter()
            .cloned()
            .enumerate()
            .map(|(slot, expr)| (expr, slot))
            .collect();
        log::debug!(
            "created record layout with {} direct and {} calculated slots",
            direct.len(),
            calculated.len()
        );
        Self {
            direct,
            calculated,
            direct_index,
            calculated_index,
            target: None,
        }
    }

    /// The layout of a pipeline that addresses no keys at all.
    pub fn empty() -> Self {
        Self::create([])
    }

    /// The slot assigned to `expr`.
    ///
    /// The whole-value expression resolves to [`RecordLayout::VALUE_INDEX`];
    /// any expression absent from the construction input is a schema bug and
    /// fails with [`WickerError::UnknownKeyExpression`].
    pub fn slot_of(&self, expr: &ExprRef) -> WickerResult<usize> {
        if WholeValue::is(expr) {
            return Ok(Self::VALUE_INDEX);
        }
        if let Some(&slot) = self.direct_index.get(expr) {
            return Ok(slot);
        }
        if let Some(&slot) = self.calculated_index.get(expr) {
            return Ok(self.direct.len() + slot);
        }
        Err(self.unknown(expr))
    }

    /// The slots addressed by `expr`, one per decomposed component.
    ///
    /// A fixed-size array range resolves to the slot of each single-step
    /// accessor, supporting bulk replace-all-matching-positions operations;
    /// the whole-value expression resolves to `[VALUE_INDEX]`; everything
    /// else resolves like [`RecordLayout::slot_of`].
    pub fn slots_of(&self, expr: &ExprRef) -> WickerResult<Vec<usize>> {
        if WholeValue::is(expr) {
            return Ok(vec![Self::VALUE_INDEX]);
        }
        if let Some(access) = expr.as_any().downcast_ref::<ArrayAccess>() {
            if access.is_fixed_size() && !access.is_single() {
                return access
                    .decompose()
                    .iter()
                    .map(|step| self.slot_of(step))
                    .collect();
            }
        }
        Ok(vec![self.slot_of(expr)?])
    }

    /// The expression assigned to `slot`; the inverse of [`RecordLayout::slot_of`].
    pub fn expression_at(&self, slot: usize) -> WickerResult<ExprRef> {
        if slot == Self::VALUE_INDEX {
            return Ok(whole());
        }
        if let Some(expr) = self.direct.get(slot) {
            return Ok(expr.clone());
        }
        self.calculated
            .get(slot - self.direct.len())
            .cloned()
            .ok_or_else(|| wicker_err!(OutOfBounds: slot, self.num_total_slots()))
    }

    /// Number of direct slots.
    pub fn num_direct_slots(&self) -> usize {
        self.direct.len()
    }

    /// Number of slots across both partitions.
    pub fn num_total_slots(&self) -> usize {
        self.direct.len() + self.calculated.len()
    }

    /// The direct partition, in slot order.
    pub fn direct_slots(&self) -> &[ExprRef] {
        &self.direct
    }

    /// The calculated partition, in slot order.
    pub fn calculated_slots(&self) -> &[ExprRef] {
        &self.calculated
    }

    /// Every registered key expression, direct partition first.
    pub fn key_expressions(&self) -> Vec<ExprRef> {
        self.direct
            .iter()
            .chain(self.calculated.iter())
            .cloned()
            .collect()
    }

    /// The slots of several expressions at once.
    pub fn slots(&self, exprs: &[ExprRef]) -> WickerResult<Vec<usize>> {
        exprs.iter().map(|expr| self.slot_of(expr)).collect()
    }

    /// Associate a typed-view capability with this layout.
    ///
    /// Part of initialization: attach before the layout escapes to concurrent
    /// readers. The resolved view type (the compiled accessor logic) is
    /// cached; instances are created on demand via
    /// [`RecordLayout::typed_node`].
    pub fn set_target_type(&mut self, registry: &ViewRegistry, name: &str) -> WickerResult<()> {
        if name.is_empty() {
            return Err(WickerError::NullTarget);
        }
        let ty = registry.resolve(name)?;
        log::debug!("attached target type {} to record layout", ty);
        self.target = Some(ty);
        Ok(())
    }

    /// Builder form of [`RecordLayout::set_target_type`].
    pub fn with_target_type(mut self, registry: &ViewRegistry, name: &str) -> WickerResult<Self> {
        self.set_target_type(registry, name)?;
        Ok(self)
    }

    /// The attached typed-view capability, if any.
    pub fn target_type(&self) -> Option<ViewType> {
        self.target
    }

    /// A fresh instance of the attached view type over a new object node.
    pub fn typed_node(&self, arena: &mut NodeArena) -> Option<AnyView> {
        self.target.map(|ty| ty.instance(arena))
    }

    fn unknown(&self, expr: &ExprRef) -> WickerError {
        WickerError::UnknownKeyExpression {
            expression: expr.to_string(),
            registered: self
                .key_expressions()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Schema identity: the two expression tables, element-wise. The target type
/// is a late-bound annotation and excluded.
impl PartialEq for RecordLayout {
    fn eq(&self, other: &Self) -> bool {
        self.direct == other.direct && self.calculated == other.calculated
    }
}

impl Eq for RecordLayout {}

impl Hash for RecordLayout {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.direct.hash(state);
        self.calculated.hash(state);
    }
}

impl Display for RecordLayout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] [{}]",
            self.direct.iter().format(", "),
            self.calculated.iter().format(", ")
        )
    }
}

// Layouts are published once and read concurrently without locking.
static_assertions::assert_impl_all!(RecordLayout: Send, Sync);
