/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Serializable types for the note export/import document.
//!
//! Field names follow the external JSON format exactly (`cueText`,
//! `backgroundColor`); IDs and neighbor references are strings in the
//! document even though the model uses integers.

use serde::{Deserialize, Serialize};

/// Inline box style as persisted: CSS lengths plus a fill color.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedBoxStyle {
    /// CSS length, e.g. `"120px"`.
    pub left: String,
    /// CSS length, e.g. `"40px"`.
    pub top: String,
    pub background_color: String,
}

/// Persisted box: one node of the tree plus its neighbor list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PersistedBox {
    /// Stable node identity, stringified.
    pub id: String,
    pub content: String,
    pub style: PersistedBoxStyle,
    /// Neighbor IDs as strings. Every line appears in both endpoints'
    /// lists; import de-duplicates through connect idempotence.
    pub lines: Vec<String>,
}

/// Full note document snapshot: Cornell fields plus every box.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NoteSnapshot {
    pub heading: String,
    pub cue_text: String,
    pub summary: String,
    /// Boxes in insertion order. Order is not semantically significant
    /// but is stable for deterministic round-trips.
    pub boxes: Vec<PersistedBox>,
}
