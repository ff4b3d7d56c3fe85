//! Cartoon filter: ink outlines burned into the frame.
//!
//! Two in-place stages over a single RGBA u8 buffer:
//!
//! 1. [`compute_edge_alpha`] - per-channel gradient of a sparse 3x3 tap grid,
//!    turned into an alpha mask on interior pixels. Colors are untouched.
//! 2. [`composite_with_alpha`] - premultiplies every pixel by its alpha and
//!    makes it opaque, so strong edges turn dark.
//!
//! Stage 1 finishes over the whole buffer before stage 2 starts.

use ndarray::{Array3, ArrayView3, ArrayViewMut1, ArrayViewMut3};
use tracing::debug;

use super::core::{
    dot, ensure_rgba, interior, pack_channel, pack_rgba, sample_taps, unpack_rgba,
    ProcessingMode,
};
use crate::error::Result;

/// Distance in pixels between neighboring taps.
pub const CARTOON_BORDER: usize = 8;

/// Gradient magnitude above which a channel marks an edge.
pub const EDGE_ALPHA_THRESHOLD: f32 = 0.4;

/// Alpha for the interior pixel at `(x, y)`, 0.0-1.0.
fn edge_alpha(src: &ArrayView3<u8>, x: usize, y: usize) -> f32 {
    let s = sample_taps(src, x, y, CARTOON_BORDER);

    let mut border = [0.0f32; 3];
    for c in 0..3 {
        let horiz = s[2][c] + s[5][c] + s[8][c] - (s[0][c] + s[3][c] + s[6][c]);
        let vert = s[0][c] + s[1][c] + s[2][c] - (s[6][c] + s[7][c] + s[8][c]);
        border[c] = (horiz * horiz + vert * vert).sqrt();
    }

    if border.iter().any(|&b| b > EDGE_ALPHA_THRESHOLD) {
        (1.0 - dot(border, border)).max(0.0)
    } else {
        1.0
    }
}

/// Stage 1: write an edge mask into the alpha channel of interior pixels.
///
/// Taps read only color channels and the stage writes only alpha, and all
/// alphas are computed before any is stored. Pixels within
/// [`CARTOON_BORDER`] of an edge keep their original alpha.
pub fn compute_edge_alpha(mut buffer: ArrayViewMut3<u8>, mode: ProcessingMode) -> Result<()> {
    ensure_rgba(buffer.shape())?;
    let (height, width, _) = buffer.dim();

    let rows = interior(height, CARTOON_BORDER);
    let cols = interior(width, CARTOON_BORDER);

    let source = buffer.view();
    let alphas = mode.map_rows(rows.clone(), |y| {
        cols.clone()
            .map(|x| pack_channel(edge_alpha(&source, x, y)))
            .collect::<Vec<u8>>()
    })?;

    for (y, row) in rows.zip(alphas) {
        for (x, alpha) in cols.clone().zip(row) {
            buffer[[y, x, 3]] = alpha;
        }
    }

    Ok(())
}

#[inline]
fn composite_pixel(mut px: ArrayViewMut1<u8>) {
    let mut color = unpack_rgba([px[0], px[1], px[2], px[3]]);

    let a = color[3];
    color[0] *= a;
    color[1] *= a;
    color[2] *= a;
    color[3] = 1.0;

    for (c, v) in pack_rgba(color).into_iter().enumerate() {
        px[c] = v;
    }
}

/// Stage 2: premultiply every pixel by its alpha and make it opaque.
///
/// Applies to the whole buffer, border included.
pub fn composite_with_alpha(buffer: ArrayViewMut3<u8>, mode: ProcessingMode) -> Result<()> {
    ensure_rgba(buffer.shape())?;
    mode.for_each_pixel(buffer, composite_pixel)
}

/// Run both cartoon stages on `buffer` in place.
///
/// # Arguments
/// * `buffer` - RGBA image (height, width, 4)
/// * `mode` - Row scheduling
///
/// # Errors
/// `InvalidShape` if the buffer is not RGBA. The buffer is left untouched
/// in that case.
pub fn cartoon_rgba_inplace(mut buffer: ArrayViewMut3<u8>, mode: ProcessingMode) -> Result<()> {
    ensure_rgba(buffer.shape())?;
    let (height, width, _) = buffer.dim();
    debug!(width, height, ?mode, "cartoon filter");

    // One pool for both stages
    mode.install(|mode| {
        compute_edge_alpha(buffer.view_mut(), mode)?;
        composite_with_alpha(buffer, mode)
    })
    .and_then(|stages| stages)
}

/// Apply the cartoon filter to a copy of `src`.
pub fn cartoon_rgba(src: ArrayView3<u8>, mode: ProcessingMode) -> Result<Array3<u8>> {
    let mut output = src.to_owned();
    cartoon_rgba_inplace(output.view_mut(), mode)?;
    Ok(output)
}
