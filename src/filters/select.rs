//! Per-frame filter selection.
//!
//! A camera frontend lists the available filters and applies exactly one
//! of them to each frame, picked by list position. The order of
//! [`FrameFilter::ALL`] is this crate's own; hosts map their menus onto it.

use std::fmt;

use ndarray::{Array3, ArrayView3};

use super::cartoon::cartoon_rgba;
use super::core::{ensure_rgba, ProcessingMode};
use super::edge::edges_rgba;
use crate::error::{FilterError, Result};

/// Filters selectable for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameFilter {
    /// Frame passes through unchanged
    #[default]
    None,
    /// Colorized edge visualization
    Edges,
    /// Ink outlines burned into the frame
    Cartoon,
}

impl FrameFilter {
    /// All filters in list order: none, edges, cartoon.
    pub const ALL: [FrameFilter; 3] = [
        FrameFilter::None,
        FrameFilter::Edges,
        FrameFilter::Cartoon,
    ];

    /// Filter at list position `index`.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(FilterError::UnknownFilter(index))
    }

    /// List position of this filter.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FrameFilter::None => "none",
            FrameFilter::Edges => "edges",
            FrameFilter::Cartoon => "cartoon",
        }
    }
}

impl fmt::Display for FrameFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply `filter` to a frame, returning the filtered copy.
pub fn apply_filter(
    frame: ArrayView3<u8>,
    filter: FrameFilter,
    mode: ProcessingMode,
) -> Result<Array3<u8>> {
    match filter {
        FrameFilter::None => {
            ensure_rgba(frame.shape())?;
            Ok(frame.to_owned())
        }
        FrameFilter::Edges => edges_rgba(frame, mode),
        FrameFilter::Cartoon => cartoon_rgba(frame, mode),
    }
}
