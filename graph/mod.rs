/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph data structures for the tree canvas.
//!
//! Core structures:
//! - `GraphStore`: authoritative node/edge collection and ID allocator
//! - `Node`: free-text box with position, color, and neighbor set
//! - `EdgeKey`: canonical unordered node pair identifying a line
//!
//! An edge exists iff each endpoint's neighbor set contains the other
//! endpoint. Every mutation updates the edge set and both neighbor sets
//! together; nothing outside this module can touch either on its own.

use euclid::default::Point2D;
use log::{debug, warn};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::persistence::types::{PersistedBox, PersistedBoxStyle};
use crate::persistence::{SnapshotError, format_px, normalize_color, parse_css_length};

/// Stable node identity: a process-unique integer allocated by the store.
pub type NodeId = u64;

/// Canonical identity of a line: the unordered pair of its endpoints,
/// held with the lesser ID first. Constructing through [`EdgeKey::new`]
/// is the only way to obtain one, so duplicate edges between the same
/// two boxes cannot exist regardless of creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    lo: NodeId,
    hi: NodeId,
}

impl EdgeKey {
    /// Canonicalize an endpoint pair. Returns `None` for a self-pair.
    pub fn new(a: NodeId, b: NodeId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { lo: a, hi: b }),
            std::cmp::Ordering::Greater => Some(Self { lo: b, hi: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Lesser endpoint ID.
    pub fn lo(&self) -> NodeId {
        self.lo
    }

    /// Greater endpoint ID.
    pub fn hi(&self) -> NodeId {
        self.hi
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.lo, self.hi)
    }
}

/// A free-text box in the tree canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Stable node identity.
    pub id: NodeId,

    /// Free-form text content (opaque to the graph).
    pub content: String,

    /// Top-left corner in layout units.
    pub position: Point2D<f64>,

    /// Fill color as CSS color text.
    pub color: String,

    /// Symmetric adjacency cache. Mutated only by the store so it always
    /// mirrors the edge set.
    neighbors: BTreeSet<NodeId>,
}

impl Node {
    /// Neighbor IDs, sorted ascending (read-only view).
    pub fn neighbors(&self) -> &BTreeSet<NodeId> {
        &self.neighbors
    }
}

static EMPTY_NEIGHBORS: BTreeSet<NodeId> = BTreeSet::new();

/// Authoritative node/edge collection for one tree canvas.
///
/// Constructed with a single seed box; torn down and rebuilt whole on
/// import. Node insertion order is tracked so exports are deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStore {
    nodes: HashMap<NodeId, Node>,
    /// Node IDs in insertion order (drives export order).
    order: Vec<NodeId>,
    edges: BTreeSet<EdgeKey>,
    /// Next ID to allocate. Monotonic; import advances it past every
    /// restored ID so fresh boxes never collide with restored ones.
    next_id: NodeId,
}

impl GraphStore {
    /// Create a store holding the single seed box (ID 1) at `seed_position`.
    pub fn new(seed_position: Point2D<f64>) -> Self {
        let mut store = Self::empty();
        store.create_node(seed_position, "", crate::persistence::DEFAULT_BOX_COLOR);
        store
    }

    fn empty() -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            edges: BTreeSet::new(),
            next_id: 1,
        }
    }

    /// Allocate a fresh ID and insert a box with an empty neighbor set.
    pub fn create_node(
        &mut self,
        position: Point2D<f64>,
        content: impl Into<String>,
        color: &str,
    ) -> NodeId {
        let id = self.next_id;
        self.create_node_with_id(id, position, content, color)
    }

    /// Insert a box under a caller-chosen ID, advancing the allocator past
    /// it. Import path; the caller guarantees `id` is not already present.
    pub fn create_node_with_id(
        &mut self,
        id: NodeId,
        position: Point2D<f64>,
        content: impl Into<String>,
        color: &str,
    ) -> NodeId {
        debug_assert!(!self.nodes.contains_key(&id), "duplicate node id {id}");
        self.next_id = self.next_id.max(id + 1);
        self.nodes.insert(
            id,
            Node {
                id,
                content: content.into(),
                position,
                color: normalize_color(color),
                neighbors: BTreeSet::new(),
            },
        );
        self.order.push(id);
        id
    }

    /// Remove a box and every line incident to it. No-op for unknown IDs.
    pub fn delete_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(&id) else {
            debug!("delete_node: unknown node {id}");
            return;
        };
        for neighbor in &node.neighbors {
            if let Some(key) = EdgeKey::new(id, *neighbor) {
                self.edges.remove(&key);
            }
            if let Some(other) = self.nodes.get_mut(neighbor) {
                other.neighbors.remove(&id);
            }
        }
        self.order.retain(|candidate| *candidate != id);
    }

    /// Insert the line between `a` and `b`. Idempotent; no-op for a
    /// self-pair or when either endpoint is unknown.
    pub fn connect(&mut self, a: NodeId, b: NodeId) {
        let Some(key) = EdgeKey::new(a, b) else {
            return;
        };
        if !self.nodes.contains_key(&a) || !self.nodes.contains_key(&b) {
            debug!("connect: unknown endpoint in ({a}, {b})");
            return;
        }
        if !self.edges.insert(key) {
            return;
        }
        // Both representations change together.
        if let Some(node) = self.nodes.get_mut(&a) {
            node.neighbors.insert(b);
        }
        if let Some(node) = self.nodes.get_mut(&b) {
            node.neighbors.insert(a);
        }
    }

    /// Remove the line between `a` and `b` if present.
    pub fn disconnect(&mut self, a: NodeId, b: NodeId) {
        let Some(key) = EdgeKey::new(a, b) else {
            return;
        };
        if !self.edges.remove(&key) {
            return;
        }
        if let Some(node) = self.nodes.get_mut(&a) {
            node.neighbors.remove(&b);
        }
        if let Some(node) = self.nodes.get_mut(&b) {
            node.neighbors.remove(&a);
        }
    }

    /// Live neighbor set of `id` (empty for unknown IDs).
    pub fn neighbors(&self, id: NodeId) -> &BTreeSet<NodeId> {
        self.nodes
            .get(&id)
            .map(|node| &node.neighbors)
            .unwrap_or(&EMPTY_NEIGHBORS)
    }

    /// Membership test on the canonical pair.
    pub fn is_connected(&self, a: NodeId, b: NodeId) -> bool {
        EdgeKey::new(a, b).is_some_and(|key| self.edges.contains(&key))
    }

    /// Whether `id` is a known box.
    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get a box by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Node IDs in insertion order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    /// Iterate all lines in canonical (lo, hi) order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edges.iter().copied()
    }

    /// Count of boxes.
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Count of lines.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Move a box. Returns false for unknown IDs.
    pub fn set_position(&mut self, id: NodeId, position: Point2D<f64>) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => {
                debug!("set_position: unknown node {id}");
                false
            }
        }
    }

    /// Replace a box's text content. Returns false for unknown IDs.
    pub fn set_content(&mut self, id: NodeId, content: impl Into<String>) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Recolor a box, falling back to the default for unrecognized colors.
    /// Returns false for unknown IDs.
    pub fn set_color(&mut self, id: NodeId, color: &str) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.color = normalize_color(color);
                true
            }
            None => false,
        }
    }

    /// Serialize every box to its persisted form, in insertion order.
    /// Neighbor lists come out sorted ascending.
    pub fn to_boxes(&self) -> Vec<PersistedBox> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|node| PersistedBox {
                id: node.id.to_string(),
                content: node.content.clone(),
                style: PersistedBoxStyle {
                    left: format_px(node.position.x),
                    top: format_px(node.position.y),
                    background_color: node.color.clone(),
                },
                lines: node.neighbors.iter().map(|n| n.to_string()).collect(),
            })
            .collect()
    }

    /// Rebuild a store from persisted boxes.
    ///
    /// Two passes: first every box is created under its recorded ID (lines
    /// reference IDs that must already exist), then every recorded neighbor
    /// pair is connected. Each line is listed by both endpoints, so the
    /// second pass leans on `connect` idempotence; references to IDs absent
    /// from the box list are skipped, never materialized.
    pub fn from_boxes(boxes: &[PersistedBox]) -> Result<Self, SnapshotError> {
        let mut store = Self::empty();

        for pbox in boxes {
            let id = parse_node_id(&pbox.id)?;
            if store.nodes.contains_key(&id) {
                return Err(SnapshotError::Invalid(format!("duplicate box id {id}")));
            }
            let left = parse_css_length(&pbox.style.left)?;
            let top = parse_css_length(&pbox.style.top)?;
            store.create_node_with_id(
                id,
                Point2D::new(left, top),
                pbox.content.clone(),
                &pbox.style.background_color,
            );
        }

        for pbox in boxes {
            let id = parse_node_id(&pbox.id)?;
            for line in &pbox.lines {
                let Ok(neighbor) = line.trim().parse::<NodeId>() else {
                    warn!("import: box {id} lists malformed neighbor {line:?}; skipping");
                    continue;
                };
                if !store.has_node(neighbor) {
                    warn!("import: box {id} lists unknown neighbor {neighbor}; skipping");
                    continue;
                }
                store.connect(id, neighbor);
            }
        }

        Ok(store)
    }
}

fn parse_node_id(raw: &str) -> Result<NodeId, SnapshotError> {
    raw.trim()
        .parse::<NodeId>()
        .map_err(|_| SnapshotError::Invalid(format!("box id {raw:?} is not numeric")))
}
