use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use wicker_error::{WickerResult, wicker_bail, wicker_err, wicker_panic};

use crate::{FieldName, Node, NodeKind};

/// A copyable handle to a node inside a [`NodeArena`].
///
/// Handles are only meaningful for the arena that produced them. The two
/// sentinel handles [`NodeId::MISSING`] and [`NodeId::NULL`] are shared by
/// every arena, so sentinel checks are plain identity comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The canonical handle of the missing sentinel.
    pub const MISSING: NodeId = NodeId(0);
    /// The canonical handle of the explicit null sentinel.
    pub const NULL: NodeId = NodeId(1);

    /// Whether this is the missing sentinel.
    pub fn is_missing(self) -> bool {
        self == Self::MISSING
    }

    /// Whether this is the explicit null sentinel.
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }

    /// Whether this handle carries no value (missing or null).
    pub fn is_absent(self) -> bool {
        self.is_missing() || self.is_null()
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            NodeId::MISSING => write!(f, "#missing"),
            NodeId::NULL => write!(f, "#null"),
            NodeId(raw) => write!(f, "#{raw}"),
        }
    }
}

/// The node store backing one record's value tree.
///
/// All structural operations go through the arena; handles stay valid for its
/// whole lifetime (nodes are never deallocated individually). An arena is a
/// single-owner, single-thread object, like the record that carries it.
#[derive(Debug, Clone)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeArena {
    /// Create an arena holding only the two sentinel nodes.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::Missing, Node::Null],
        }
    }

    /// Number of nodes in the arena, sentinels included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add a node, returning its handle.
    ///
    /// Sentinel nodes are interned to their canonical handles instead of
    /// allocating a new slot.
    pub fn push(&mut self, node: Node) -> NodeId {
        match node {
            Node::Missing => NodeId::MISSING,
            Node::Null => NodeId::NULL,
            node => {
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(node);
                id
            }
        }
    }

    /// Add an empty object node.
    pub fn object(&mut self) -> NodeId {
        self.push(Node::Object(BTreeMap::new()))
    }

    /// Add an empty array node.
    pub fn array(&mut self) -> NodeId {
        self.push(Node::Array(Vec::new()))
    }

    /// Add a text node.
    pub fn text(&mut self, value: impl Into<String>) -> NodeId {
        self.push(Node::Text(value.into()))
    }

    /// Add an integer node.
    pub fn integer(&mut self, value: i64) -> NodeId {
        self.push(Node::Integer(value))
    }

    /// Add a float node.
    pub fn float(&mut self, value: f64) -> NodeId {
        self.push(Node::Float(value))
    }

    /// Add a boolean node.
    pub fn boolean(&mut self, value: bool) -> NodeId {
        self.push(Node::Bool(value))
    }

    /// Read a node through its handle.
    pub fn node(&self, id: NodeId) -> &Node {
        match self.nodes.get(id.index()) {
            Some(node) => node,
            None => wicker_panic!("dangling node handle {}", id),
        }
    }

    /// Mutably read a node through its handle.
    ///
    /// The sentinel slots are immutable; handing out a mutable reference to
    /// them would let one record's "null" leak mutations into every other use.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        if id.is_absent() {
            wicker_panic!("sentinel node {} is immutable", id);
        }
        match self.nodes.get_mut(id.index()) {
            Some(node) => node,
            None => wicker_panic!("dangling node handle {}", id),
        }
    }

    /// The kind of the node behind `id`.
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind()
    }

    // --- object operations -------------------------------------------------

    /// Read a field of an object node.
    ///
    /// Returns [`NodeId::MISSING`] when the field is absent or `obj` is not an
    /// object; field reads never fail.
    pub fn get_field(&self, obj: NodeId, field: &str) -> NodeId {
        match self.node(obj) {
            Node::Object(fields) => fields.get(field).copied().unwrap_or(NodeId::MISSING),
            _ => NodeId::MISSING,
        }
    }

    /// Write a field of an object node.
    pub fn put_field(&mut self, obj: NodeId, field: impl Into<FieldName>, value: NodeId) {
        match self.node_mut(obj) {
            Node::Object(fields) => {
                fields.insert(field.into(), value);
            }
            other => {
                let kind = other.kind();
                wicker_panic!("cannot put field into {} node {}", kind, obj)
            }
        }
    }

    /// Remove a field from an object node.
    pub fn remove_field(&mut self, obj: NodeId, field: &str) {
        if let Node::Object(fields) = self.node_mut(obj) {
            fields.remove(field);
        }
    }

    /// Number of fields of an object node; 0 for any other kind.
    pub fn field_count(&self, obj: NodeId) -> usize {
        self.node(obj).as_object().map_or(0, BTreeMap::len)
    }

    /// Iterate an object node's fields in name order.
    pub fn fields(&self, obj: NodeId) -> impl Iterator<Item = (&FieldName, NodeId)> + '_ {
        self.node(obj)
            .as_object()
            .into_iter()
            .flat_map(|fields| fields.iter().map(|(name, id)| (name, *id)))
    }

    /// Copy every field of `src` into `dst`, aliasing the children by handle.
    pub fn copy_fields(&mut self, dst: NodeId, src: NodeId) {
        let entries = self
            .fields(src)
            .map(|(name, id)| (name.clone(), id))
            .collect::<Vec<_>>();
        for (name, id) in entries {
            self.put_field(dst, name, id);
        }
    }

    /// Remove every field of an object node.
    pub fn clear_fields(&mut self, obj: NodeId) {
        if let Node::Object(fields) = self.node_mut(obj) {
            fields.clear();
        }
    }

    // --- array operations --------------------------------------------------

    /// Read an array element.
    ///
    /// Negative indexes count from the back. Returns [`NodeId::MISSING`] when
    /// the index is out of range or `arr` is not an array.
    pub fn element(&self, arr: NodeId, index: i64) -> NodeId {
        let Some(elements) = self.node(arr).as_array() else {
            return NodeId::MISSING;
        };
        let resolved = if index < 0 {
            elements.len() as i64 + index
        } else {
            index
        };
        usize::try_from(resolved)
            .ok()
            .and_then(|i| elements.get(i).copied())
            .unwrap_or(NodeId::MISSING)
    }

    /// Append an element to an array node.
    pub fn push_element(&mut self, arr: NodeId, value: NodeId) {
        match self.node_mut(arr) {
            Node::Array(elements) => elements.push(value),
            other => {
                let kind = other.kind();
                wicker_panic!("cannot push element into {} node {}", kind, arr)
            }
        }
    }

    /// Replace an array element in place.
    pub fn set_element(&mut self, arr: NodeId, index: usize, value: NodeId) -> WickerResult<()> {
        match self.node_mut(arr) {
            Node::Array(elements) => {
                let len = elements.len();
                match elements.get_mut(index) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(wicker_err!(OutOfBounds: index, len)),
                }
            }
            other => {
                let kind = other.kind();
                wicker_bail!("cannot set element of {} node", kind)
            }
        }
    }

    /// Number of elements of an array node; 0 for any other kind.
    pub fn element_count(&self, arr: NodeId) -> usize {
        self.node(arr).as_array().map_or(0, <[NodeId]>::len)
    }

    // --- whole-tree operations ---------------------------------------------

    /// Deep-clone the subtree rooted at `id`, returning the clone's root.
    ///
    /// Sentinels clone to themselves.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        match self.node(id).clone() {
            Node::Missing => NodeId::MISSING,
            Node::Null => NodeId::NULL,
            Node::Array(elements) => {
                let cloned = elements
                    .into_iter()
                    .map(|element| self.deep_clone(element))
                    .collect();
                self.push(Node::Array(cloned))
            }
            Node::Object(fields) => {
                let cloned = fields
                    .into_iter()
                    .map(|(name, child)| (name, self.deep_clone(child)))
                    .collect();
                self.push(Node::Object(cloned))
            }
            scalar => self.push(scalar),
        }
    }

    /// Deep-copy a subtree out of another arena into this one.
    pub fn import_from(&mut self, other: &NodeArena, id: NodeId) -> NodeId {
        match other.node(id) {
            Node::Missing => NodeId::MISSING,
            Node::Null => NodeId::NULL,
            Node::Array(elements) => {
                let imported = elements
                    .clone()
                    .into_iter()
                    .map(|element| self.import_from(other, element))
                    .collect();
                self.push(Node::Array(imported))
            }
            Node::Object(fields) => {
                let imported = fields
                    .clone()
                    .into_iter()
                    .map(|(name, child)| (name, self.import_from(other, child)))
                    .collect();
                self.push(Node::Object(imported))
            }
            scalar => self.push(scalar.clone()),
        }
    }

    /// Structural equality of two subtrees.
    pub fn deep_eq(&self, a: NodeId, b: NodeId) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    /// Total order over subtrees: by kind rank first, then by value.
    ///
    /// Integers and floats share the numeric rank and compare by value.
    pub fn compare(&self, a: NodeId, b: NodeId) -> Ordering {
        let (left, right) = (self.node(a), self.node(b));
        match (left, right) {
            (Node::Bool(l), Node::Bool(r)) => l.cmp(r),
            (Node::Integer(l), Node::Integer(r)) => l.cmp(r),
            (Node::Float(l), Node::Float(r)) => l.total_cmp(r),
            (Node::Integer(l), Node::Float(r)) => (*l as f64).total_cmp(r),
            (Node::Float(l), Node::Integer(r)) => l.total_cmp(&(*r as f64)),
            (Node::Text(l), Node::Text(r)) => l.cmp(r),
            (Node::Array(l), Node::Array(r)) => {
                for (le, re) in l.iter().zip(r.iter()) {
                    match self.compare(*le, *re) {
                        Ordering::Equal => continue,
                        unequal => return unequal,
                    }
                }
                l.len().cmp(&r.len())
            }
            (Node::Object(l), Node::Object(r)) => {
                for ((ln, lv), (rn, rv)) in l.iter().zip(r.iter()) {
                    match ln.cmp(rn) {
                        Ordering::Equal => {}
                        unequal => return unequal,
                    }
                    match self.compare(*lv, *rv) {
                        Ordering::Equal => {}
                        unequal => return unequal,
                    }
                }
                l.len().cmp(&r.len())
            }
            _ => left.kind().cmp(&right.kind()),
        }
    }

    /// Render the subtree rooted at `id`.
    pub fn display(&self, id: NodeId) -> NodeDisplay<'_> {
        NodeDisplay { arena: self, id }
    }

    /// Render the subtree rooted at `id` into an owned string.
    pub fn render(&self, id: NodeId) -> String {
        self.display(id).to_string()
    }
}

/// Displays a subtree in a JSON-like textual form.
pub struct NodeDisplay<'a> {
    arena: &'a NodeArena,
    id: NodeId,
}

impl Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.arena.node(self.id) {
            Node::Missing => write!(f, "<missing>"),
            Node::Null => write!(f, "null"),
            Node::Bool(b) => write!(f, "{b}"),
            Node::Integer(v) => write!(f, "{v}"),
            Node::Float(v) => write!(f, "{v}"),
            Node::Text(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Node::Array(elements) => {
                let rendered = elements
                    .iter()
                    .map(|element| self.arena.display(*element))
                    .format(",");
                write!(f, "[{rendered}]")
            }
            Node::Object(fields) => {
                let rendered = fields
                    .iter()
                    .map(|(name, child)| format!("\"{}\":{}", name, self.arena.display(*child)))
                    .format(",");
                write!(f, "{{{rendered}}}")
            }
        }
    }
}
