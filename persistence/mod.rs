/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Note document serialization.
//!
//! The only persistence in the system is the user-initiated export file: a
//! JSON document holding the Cornell fields and every box with its style
//! and neighbor list. Import is all-or-nothing; a document that fails to
//! parse or validate leaves the prior state untouched.

pub mod types;

use log::warn;
use std::fmt;

use types::NoteSnapshot;

/// Fill color applied when a box has no recognizable color of its own.
pub const DEFAULT_BOX_COLOR: &str = "#f5f0b5";

/// Import/export failure.
#[derive(Debug)]
pub enum SnapshotError {
    /// The document is not well-formed JSON of the expected shape.
    Json(String),
    /// The document parsed but violates a content rule (duplicate or
    /// non-numeric box IDs, malformed CSS lengths).
    Invalid(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Json(e) => write!(f, "JSON error: {e}"),
            SnapshotError::Invalid(e) => write!(f, "Invalid snapshot: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Serialize a snapshot to the external JSON document.
pub fn to_json(snapshot: &NoteSnapshot) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(snapshot).map_err(|e| SnapshotError::Json(e.to_string()))
}

/// Parse the external JSON document into a snapshot. Nothing is applied
/// here; the caller installs the result only after full validation.
pub fn from_json(raw: &str) -> Result<NoteSnapshot, SnapshotError> {
    serde_json::from_str(raw).map_err(|e| SnapshotError::Json(e.to_string()))
}

/// Render a layout coordinate as a CSS pixel length.
pub fn format_px(value: f64) -> String {
    format!("{value}px")
}

/// Parse a CSS length back to a layout coordinate. Accepts a `px` suffix
/// or a bare number; anything else fails the import.
pub fn parse_css_length(raw: &str) -> Result<f64, SnapshotError> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    number
        .parse::<f64>()
        .map_err(|_| SnapshotError::Invalid(format!("malformed CSS length {raw:?}")))
}

/// Normalize a CSS color, falling back to [`DEFAULT_BOX_COLOR`] when the
/// format is unrecognized. Cosmetic degradation only; never an error.
pub fn normalize_color(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_recognized_color(trimmed) {
        trimmed.to_string()
    } else {
        warn!("unrecognized color {raw:?}; using default");
        DEFAULT_BOX_COLOR.to_string()
    }
}

fn is_recognized_color(color: &str) -> bool {
    if let Some(hex) = color.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if (color.starts_with("rgb(") || color.starts_with("rgba(")) && color.ends_with(')') {
        return true;
    }
    // Named colors ("yellow", "lightsteelblue").
    !color.is_empty() && color.chars().all(|c| c.is_ascii_alphabetic())
}
