/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The Cornell note document.
//!
//! One note = heading + cue text + summary + the tree canvas graph. The
//! document is the unit of export/import: the whole thing serializes to a
//! single JSON file and restores from one. Import is atomic; a snapshot
//! that fails to parse or validate changes nothing.
//!
//! The cue-text highlight overlay is a collaborator, not part of the core:
//! it wraps text selections in colored spans that carry a target box ID.
//! The core's contribution is answering "is this ID a known box" and
//! listing IDs for a target picker; `CueLink` records the span convention.

use euclid::default::Point2D;

use crate::graph::{GraphStore, NodeId};
use crate::persistence::types::NoteSnapshot;
use crate::persistence::{self, SnapshotError};

/// An inline reference from the cue text to a box.
///
/// The overlay stores the target ID on the span it creates and resolves
/// it without the core's involvement; this type is the convention, not a
/// registry the core maintains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueLink {
    pub target: NodeId,
    /// Highlight color of the span.
    pub color: String,
}

/// A Cornell-method note with an embedded tree canvas.
pub struct NoteDocument {
    pub heading: String,
    pub cue_text: String,
    pub summary: String,
    graph: GraphStore,
}

impl NoteDocument {
    /// Fresh note: empty Cornell fields, one seed box at `seed_position`.
    pub fn new(seed_position: Point2D<f64>) -> Self {
        Self {
            heading: String::new(),
            cue_text: String::new(),
            summary: String::new(),
            graph: GraphStore::new(seed_position),
        }
    }

    /// The tree canvas graph (read-only).
    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    /// The tree canvas graph, for mutation through store operations.
    pub fn graph_mut(&mut self) -> &mut GraphStore {
        &mut self.graph
    }

    /// Overlay interface: is `id` a known box?
    pub fn has_node(&self, id: NodeId) -> bool {
        self.graph.has_node(id)
    }

    /// Overlay interface: box IDs in insertion order, for a target picker.
    pub fn list_node_ids(&self) -> &[NodeId] {
        self.graph.node_ids()
    }

    /// Resolve a cue-text link against the current graph. A link whose
    /// target box was deleted resolves to `None`; the overlay decides how
    /// to render the orphaned span.
    pub fn resolve_link(&self, link: &CueLink) -> Option<NodeId> {
        self.has_node(link.target).then_some(link.target)
    }

    /// Snapshot the whole document.
    pub fn export(&self) -> NoteSnapshot {
        NoteSnapshot {
            heading: self.heading.clone(),
            cue_text: self.cue_text.clone(),
            summary: self.summary.clone(),
            boxes: self.graph.to_boxes(),
        }
    }

    /// Replace the whole document from a snapshot. The replacement graph
    /// is fully built before any field changes; on error the document is
    /// untouched.
    pub fn import(&mut self, snapshot: NoteSnapshot) -> Result<(), SnapshotError> {
        let graph = GraphStore::from_boxes(&snapshot.boxes)?;
        self.heading = snapshot.heading;
        self.cue_text = snapshot.cue_text;
        self.summary = snapshot.summary;
        self.graph = graph;
        Ok(())
    }

    /// Export to the external JSON document (the downloadable file).
    pub fn export_json(&self) -> Result<String, SnapshotError> {
        persistence::to_json(&self.export())
    }

    /// Import from the external JSON document (a user-supplied file read
    /// into memory). Parse and validation happen before anything applies.
    pub fn import_json(&mut self, raw: &str) -> Result<(), SnapshotError> {
        let snapshot = persistence::from_json(raw)?;
        self.import(snapshot)
    }
}
