//! Typed views over Wicker nodes
//!
//! A typed view is a strongly typed lens over an untyped object node: it owns
//! no data, holds the handle of its backing node, and reads/writes fields
//! through a statically known accessor set. Concrete views are declared with
//! [`typed_view!`], which generates the accessor logic at compile time — the
//! original design's reflective wrapper generation, resolved statically so
//! that constructing a view can never fail at runtime.

pub use registry::*;
pub use view::*;

mod macros;
mod registry;
mod view;

#[doc(hidden)]
pub mod __private {
    pub use paste::paste;
    pub use wicker_error::WickerResult;
    pub use wicker_node::{NodeArena, NodeId};
}
