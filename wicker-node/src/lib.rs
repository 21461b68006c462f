//! The generic tree-node store for Wicker
//!
//! Every value flowing between pipeline stages is a tree of dynamically typed
//! nodes. Nodes live in a [`NodeArena`] and are addressed through copyable
//! [`NodeId`] handles, so that typed overlays can alias a subtree without
//! copying it and without handing out shared mutable references. The two
//! absence sentinels ("missing" and explicit "null") are canonical handles,
//! making sentinel checks identity comparisons.

pub use arena::*;
pub use node::*;

mod arena;
mod node;
