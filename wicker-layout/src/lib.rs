//! Record layouts for Wicker
//!
//! A record layout is the frozen schema of a compiled pipeline: it assigns
//! every distinct key expression a stable slot, splitting the expressions
//! reachable at a fixed array position (*direct* slots) from those whose value
//! must be computed against the record (*calculated* slots). Layouts are built
//! once, shared read-only across workers, and persisted as an ordered
//! key-expression list from which the slot tables are re-derived.

pub use expression_index::*;
pub use layout::*;
pub use manifest::*;
pub use record::*;
pub use source::*;

mod expression_index;
mod layout;
mod manifest;
mod record;
mod source;
