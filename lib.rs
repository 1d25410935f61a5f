/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph-editor core for a Cornell-method note with an embedded tree canvas.
//!
//! A note holds cue text, a summary, and a small node-link diagram of
//! free-text boxes connected by lines. This crate owns the diagram's
//! authoritative state and the interaction logic on top of it:
//!
//! - `graph`: node/edge collection, adjacency invariants, ID allocation
//! - `input`: drag protocol, connect/disconnect toggle, line geometry sync
//! - `note`: the Cornell note document owning one graph
//! - `persistence`: the JSON export/import document and its validation
//!
//! Rendering is a collaborator, not a concern: the canvas layer hands the
//! controller box handles (`input::BoxVisual`) and the crate never touches
//! a widget tree directly.

pub mod graph;
pub mod input;
pub mod note;
pub mod persistence;

pub use graph::{EdgeKey, GraphStore, NodeId};
pub use input::{BoxVisual, DragState, InteractionController};
pub use note::NoteDocument;
pub use persistence::SnapshotError;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
