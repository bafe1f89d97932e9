//! Error types for plate cutting.

use thiserror::Error;

/// Errors surfaced to callers of the engine.
///
/// Pieces that do not fit are not errors; they are reported in
/// [`PackingResult::unplaced`](crate::types::PackingResult).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CutError {
    /// A cut request had the wrong shape (missing or non-numeric field).
    #[error("invalid request #{index}{}: field `{field}` {reason}", id_suffix(.id))]
    InvalidRequest {
        index: usize,
        id: Option<String>,
        field: &'static str,
        reason: String,
    },

    /// A `WxH` dimension string could not be read.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The requests add up to more pieces than the caller allows.
    #[error("{requested} pieces requested, at most {limit} allowed")]
    TooManyPieces { requested: u64, limit: u64 },

    /// The result could not be written out.
    #[error("cannot write output: {0}")]
    Output(String),

    /// The run was cancelled between plates.
    #[error("calculation cancelled after {plates_completed} plate(s)")]
    Cancelled { plates_completed: usize },
}

impl CutError {
    pub fn invalid_request(
        index: usize,
        id: Option<String>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRequest {
            index,
            id,
            field,
            reason: reason.into(),
        }
    }

    pub fn invalid_dimensions(details: impl Into<String>) -> Self {
        Self::InvalidDimensions(details.into())
    }
}

fn id_suffix(id: &Option<String>) -> String {
    id.as_ref().map(|id| format!(" (id {id})")).unwrap_or_default()
}
