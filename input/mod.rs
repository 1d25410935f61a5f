/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Pointer interaction for the tree canvas.
//!
//! Translates user gestures (drag, add-adjacent, delete, connect toggle)
//! into `GraphStore` operations and keeps derived line geometry in step
//! with box positions. The graph store is passed in explicitly per call;
//! the controller owns only gesture state, the box-handle registry, and
//! the geometry cache.
//!
//! Drag is an explicit state machine (`Idle`/`Dragging`) rather than
//! closure-captured flags, so the single-active-drag rule is visible and
//! testable. Position changes refresh every incident line before the
//! mutating call returns; stale geometry is never observable.

use euclid::default::{Point2D, Rect, Size2D, Vector2D};
use log::debug;
use std::collections::{BTreeMap, HashMap};

use crate::graph::{EdgeKey, GraphStore, NodeId};
use crate::persistence::DEFAULT_BOX_COLOR;

/// Capability set the rendering layer exposes per box.
///
/// The controller depends on exactly this surface: where a box is, how big
/// it is drawn, what color it carries, and how to take it off screen. Any
/// rendering technology that can answer these can host the canvas.
pub trait BoxVisual {
    fn position(&self) -> Point2D<f64>;
    fn set_position(&mut self, position: Point2D<f64>);
    fn size(&self) -> Size2D<f64>;
    fn color(&self) -> String;
    fn set_color(&mut self, color: &str);
    /// Remove the box from the display. Called once, on delete.
    fn remove(&mut self);
}

/// Gesture state for the single active pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        node: NodeId,
        /// Pointer offset from the box top-left, recorded at press.
        grab_offset: Vector2D<f64>,
    },
}

/// Derived screen-space geometry for one line. Endpoints are the centers
/// of the two boxes; a projection of store state, never consulted to
/// answer adjacency questions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometry {
    pub key: EdgeKey,
    /// Center of the box with the lesser ID.
    pub lo_end: Point2D<f64>,
    /// Center of the box with the greater ID.
    pub hi_end: Point2D<f64>,
}

impl EdgeGeometry {
    /// The endpoint belonging to `id`, or `None` when `id` is not an
    /// endpoint of this line.
    pub fn endpoint(&self, id: NodeId) -> Option<Point2D<f64>> {
        if id == self.key.lo() {
            Some(self.lo_end)
        } else if id == self.key.hi() {
            Some(self.hi_end)
        } else {
            None
        }
    }

    /// Midpoint of the line (label anchor).
    pub fn midpoint(&self) -> Point2D<f64> {
        self.lo_end.lerp(self.hi_end, 0.5)
    }
}

/// One row of the connect menu for a selected box.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectMenuEntry {
    pub id: NodeId,
    /// Box text content, for display.
    pub label: String,
    /// Whether the canonical pair (selected, id) is already a line.
    pub connected: bool,
}

/// Binds gestures to `GraphStore` calls and keeps line geometry current.
pub struct InteractionController {
    drag: DragState,
    visuals: HashMap<NodeId, Box<dyn BoxVisual>>,
    geometry: BTreeMap<EdgeKey, EdgeGeometry>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            drag: DragState::Idle,
            visuals: HashMap::new(),
            geometry: BTreeMap::new(),
        }
    }

    /// Hand the controller the rendered box for `id`. Lines incident to
    /// the box become drawable as soon as both endpoint visuals exist.
    pub fn register_visual(&mut self, store: &GraphStore, id: NodeId, visual: Box<dyn BoxVisual>) {
        self.visuals.insert(id, visual);
        self.refresh_incident_edges(store, id);
    }

    /// Current drag state (read-only).
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Center of the rendered box for `id`, or `None` when no visual is
    /// registered.
    pub fn box_center(&self, id: NodeId) -> Option<Point2D<f64>> {
        let visual = self.visuals.get(&id)?;
        let position = visual.position();
        let size = visual.size();
        Some(Point2D::new(
            position.x + size.width / 2.0,
            position.y + size.height / 2.0,
        ))
    }

    /// Geometry for one line, when both endpoint boxes are rendered.
    pub fn edge_geometry(&self, key: EdgeKey) -> Option<&EdgeGeometry> {
        self.geometry.get(&key)
    }

    /// All current line geometry, in canonical key order.
    pub fn edge_geometries(&self) -> impl Iterator<Item = &EdgeGeometry> {
        self.geometry.values()
    }

    /// Gesture-start: begin dragging `node`, recording the pointer offset
    /// from its top-left. Ignored while another drag is active or when the
    /// node is unknown.
    pub fn press(&mut self, store: &GraphStore, node: NodeId, pointer: Point2D<f64>) {
        if self.is_dragging() {
            debug!("press: drag already active; ignoring");
            return;
        }
        let Some(record) = store.node(node) else {
            debug!("press: unknown node {node}");
            return;
        };
        self.drag = DragState::Dragging {
            node,
            grab_offset: pointer - record.position,
        };
    }

    /// Gesture-move: while dragging and while the pointer is inside the
    /// canvas, move the dragged box to `pointer - grab_offset` and refresh
    /// every incident line. Moves outside the canvas are not applied; the
    /// drag stays active.
    pub fn motion(&mut self, store: &mut GraphStore, pointer: Point2D<f64>, canvas: Rect<f64>) {
        let DragState::Dragging { node, grab_offset } = self.drag else {
            return;
        };
        if !canvas.contains(pointer) {
            return;
        }
        self.apply_move(store, node, pointer - grab_offset);
    }

    /// Gesture-end: back to idle. No snapping; overlapping boxes are fine.
    pub fn release(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Programmatic move. Same propagation as a drag move: the store, the
    /// visual, and all incident line geometry update before returning.
    pub fn move_node(&mut self, store: &mut GraphStore, id: NodeId, position: Point2D<f64>) {
        if !store.has_node(id) {
            debug!("move_node: unknown node {id}");
            return;
        }
        self.apply_move(store, id, position);
    }

    fn apply_move(&mut self, store: &mut GraphStore, id: NodeId, position: Point2D<f64>) {
        store.set_position(id, position);
        if let Some(visual) = self.visuals.get_mut(&id) {
            visual.set_position(position);
        }
        self.refresh_incident_edges(store, id);
    }

    /// Create a box at the reference box's center (plus `offset`) and
    /// connect the two. The only path that combines creation with a new
    /// line. Returns the new ID, or `None` when the reference box has no
    /// rendered visual to center on.
    pub fn add_adjacent(
        &mut self,
        store: &mut GraphStore,
        reference: NodeId,
        offset: Vector2D<f64>,
    ) -> Option<NodeId> {
        let center = self.box_center(reference)?;
        let id = store.create_node(center + offset, "", DEFAULT_BOX_COLOR);
        store.connect(reference, id);
        // Geometry appears once the rendering layer registers the new
        // box's visual.
        Some(id)
    }

    /// Recolor a box in the store and its visual together. Unrecognized
    /// colors fall back to the default in both, never failing the action.
    pub fn recolor(&mut self, store: &mut GraphStore, id: NodeId, color: &str) {
        if !store.set_color(id, color) {
            return;
        }
        let applied = store.node(id).map(|node| node.color.clone());
        if let (Some(visual), Some(applied)) = (self.visuals.get_mut(&id), applied) {
            visual.set_color(&applied);
        }
    }

    /// Delete a box: disconnect each incident line (found via the neighbor
    /// set, never by scanning visuals), drop its geometry, remove the
    /// visual, then remove the box from the store. At no point does an
    /// edge reference a missing node.
    pub fn delete(&mut self, store: &mut GraphStore, node: NodeId) {
        let neighbors: Vec<NodeId> = store.neighbors(node).iter().copied().collect();
        for neighbor in neighbors {
            store.disconnect(node, neighbor);
            if let Some(key) = EdgeKey::new(node, neighbor) {
                self.geometry.remove(&key);
            }
        }
        if let Some(mut visual) = self.visuals.remove(&node) {
            visual.remove();
        }
        store.delete_node(node);
        if matches!(self.drag, DragState::Dragging { node: dragged, .. } if dragged == node) {
            self.drag = DragState::Idle;
        }
    }

    /// Connect-menu toggle: disconnect when the pair is already a line,
    /// connect otherwise. Returns whether the pair is connected after the
    /// call. Self-targets are a no-op.
    pub fn toggle_connection(
        &mut self,
        store: &mut GraphStore,
        selected: NodeId,
        target: NodeId,
    ) -> bool {
        if selected == target {
            return false;
        }
        if store.is_connected(selected, target) {
            store.disconnect(selected, target);
            if let Some(key) = EdgeKey::new(selected, target) {
                self.geometry.remove(&key);
            }
            false
        } else {
            store.connect(selected, target);
            if store.is_connected(selected, target) {
                self.refresh_pair(selected, target);
            }
            store.is_connected(selected, target)
        }
    }

    /// Connect-menu listing for `selected`: every other box, marked when
    /// its canonical pair with `selected` is already a line.
    pub fn connect_menu(&self, store: &GraphStore, selected: NodeId) -> Vec<ConnectMenuEntry> {
        store
            .node_ids()
            .iter()
            .filter(|id| **id != selected)
            .filter_map(|id| store.node(*id))
            .map(|node| ConnectMenuEntry {
                id: node.id,
                label: node.content.clone(),
                connected: store.is_connected(selected, node.id),
            })
            .collect()
    }

    /// Recompute geometry for every line incident to `id`.
    pub fn refresh_incident_edges(&mut self, store: &GraphStore, id: NodeId) {
        let neighbors: Vec<NodeId> = store.neighbors(id).iter().copied().collect();
        for neighbor in neighbors {
            self.refresh_pair(id, neighbor);
        }
    }

    /// Rebuild the whole geometry cache from the store (import path).
    pub fn rebuild_all_edges(&mut self, store: &GraphStore) {
        self.geometry.clear();
        for key in store.edges().collect::<Vec<_>>() {
            self.refresh_pair(key.lo(), key.hi());
        }
    }

    fn refresh_pair(&mut self, a: NodeId, b: NodeId) {
        let Some(key) = EdgeKey::new(a, b) else {
            return;
        };
        match (self.box_center(key.lo()), self.box_center(key.hi())) {
            (Some(lo_end), Some(hi_end)) => {
                self.geometry.insert(
                    key,
                    EdgeGeometry {
                        key,
                        lo_end,
                        hi_end,
                    },
                );
            }
            // One endpoint not rendered yet; nothing to draw.
            _ => {
                self.geometry.remove(&key);
            }
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}
