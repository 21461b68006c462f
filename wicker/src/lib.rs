//! Record layouts and typed views for tree-shaped pipeline data.

pub use wicker_layout::*;
pub use {
    wicker_error as error, wicker_expr as expr, wicker_node as node, wicker_view as view,
};
