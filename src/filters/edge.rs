//! Edge highlighting filter ("wireframe" look).
//!
//! Samples a sparse 3x3 grid of taps around each interior pixel, reduces
//! every tap to the length of its RGB vector, and maps the averaged
//! cross-center difference to a blue-tinted color.
//!
//! ## Buffers
//!
//! Source and destination are distinct RGBA u8 buffers of shape
//! (height, width, 4) with identical dimensions. Only interior pixels
//! (at least [`EDGE_BORDER`] from every side) are written; the rest of the
//! destination keeps whatever it held before the call.

use ndarray::{Array3, ArrayView3, ArrayViewMut3};
use tracing::debug;

use super::core::{
    ensure_same_size, interior, length, pack_channel, sample_taps, write_pixel, ProcessingMode,
};
use crate::error::Result;

/// Distance in pixels between neighboring taps.
pub const EDGE_BORDER: usize = 6;

/// Per-channel gains applied to the edge strength (R, G, B).
pub const EDGE_GAINS: [f32; 3] = [0.8, 1.2, 2.0];

/// Edge strength at `(x, y)`.
///
/// Averages the absolute differences of the four tap pairs straddling the
/// center: vertical, horizontal and both diagonals.
#[inline]
fn edge_delta(src: &ArrayView3<u8>, x: usize, y: usize) -> f32 {
    let taps = sample_taps(src, x, y, EDGE_BORDER);
    let pix = taps.map(length);

    ((pix[1] - pix[7]).abs()
        + (pix[5] - pix[3]).abs()
        + (pix[0] - pix[8]).abs()
        + (pix[2] - pix[6]).abs())
        * 0.25
}

/// Map an edge strength to an opaque output pixel.
#[inline]
fn edge_color(delta: f32) -> [u8; 4] {
    [
        pack_channel(EDGE_GAINS[0] * delta),
        pack_channel(EDGE_GAINS[1] * delta),
        pack_channel(EDGE_GAINS[2] * delta),
        255,
    ]
}

/// Write the edge visualization of `src` into `dst`.
///
/// # Arguments
/// * `src` - RGBA image (height, width, 4), read only
/// * `dst` - RGBA image with the same dimensions as `src`
/// * `mode` - Row scheduling
///
/// # Errors
/// `InvalidShape` if either buffer is not RGBA, `SizeMismatch` if their
/// dimensions differ. A buffer too small to have an interior is not an
/// error; nothing is written.
pub fn edges_rgba_into(
    src: ArrayView3<u8>,
    mut dst: ArrayViewMut3<u8>,
    mode: ProcessingMode,
) -> Result<()> {
    ensure_same_size(src.shape(), dst.shape())?;
    let (height, width, _) = src.dim();
    debug!(width, height, ?mode, "edge filter");

    let rows = interior(height, EDGE_BORDER);
    let cols = interior(width, EDGE_BORDER);

    let out = mode.map_rows(rows.clone(), |y| {
        cols.clone()
            .map(|x| edge_color(edge_delta(&src, x, y)))
            .collect::<Vec<_>>()
    })?;

    for (y, row) in rows.zip(out) {
        for (x, px) in cols.clone().zip(row) {
            write_pixel(&mut dst, x, y, px);
        }
    }

    Ok(())
}

/// Apply the edge filter, returning a new image.
///
/// The destination starts as a copy of `src`, so the untouched border keeps
/// the original frame.
pub fn edges_rgba(src: ArrayView3<u8>, mode: ProcessingMode) -> Result<Array3<u8>> {
    let mut output = src.to_owned();
    edges_rgba_into(src, output.view_mut(), mode)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;

    fn flat(h: usize, w: usize, rgba: [u8; 4]) -> Array3<u8> {
        Array3::from_shape_fn((h, w, 4), |(_, _, c)| rgba[c])
    }

    fn pattern(h: usize, w: usize) -> Array3<u8> {
        Array3::from_shape_fn((h, w, 4), |(y, x, c)| {
            if c == 3 {
                255
            } else {
                ((x * 37 + y * 91 + c * 53) % 256) as u8
            }
        })
    }

    #[test]
    fn test_flat_image_is_black_inside() {
        let src = flat(20, 20, [120, 60, 200, 255]);
        let mut dst = flat(20, 20, [9, 9, 9, 9]);

        edges_rgba_into(src.view(), dst.view_mut(), ProcessingMode::Sequential).unwrap();

        for y in 0..20 {
            for x in 0..20 {
                let px = [dst[[y, x, 0]], dst[[y, x, 1]], dst[[y, x, 2]], dst[[y, x, 3]]];
                if (6..14).contains(&x) && (6..14).contains(&y) {
                    assert_eq!(px, [0, 0, 0, 255], "interior pixel ({x}, {y})");
                } else {
                    assert_eq!(px, [9, 9, 9, 9], "border pixel ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_vertical_step_is_tinted() {
        // Gray step of 20/255: every interior pixel straddles it with three
        // of its four tap pairs, delta = 0.75 * sqrt(3) * 20/255.
        let src = Array3::from_shape_fn((20, 20, 4), |(_, x, c)| {
            if c == 3 {
                255
            } else if x < 10 {
                0
            } else {
                20
            }
        });

        let out = edges_rgba(src.view(), ProcessingMode::Sequential).unwrap();

        for y in 6..14 {
            for x in 6..14 {
                assert_eq!(out[[y, x, 0]], 21);
                assert_eq!(out[[y, x, 1]], 31);
                assert_eq!(out[[y, x, 2]], 52);
                assert_eq!(out[[y, x, 3]], 255);
            }
        }
    }

    #[test]
    fn test_strong_edge_saturates() {
        let src = Array3::from_shape_fn((20, 20, 4), |(_, x, c)| {
            if c == 3 || x >= 10 {
                255
            } else {
                0
            }
        });

        let out = edges_rgba(src.view(), ProcessingMode::Parallel).unwrap();
        assert_eq!(out[[10, 10, 0]], 255);
        assert_eq!(out[[10, 10, 1]], 255);
        assert_eq!(out[[10, 10, 2]], 255);
    }

    #[test]
    fn test_interior_alpha_is_opaque() {
        let src = Array3::from_shape_fn((24, 30, 4), |(y, x, c)| {
            ((x * 13 + y * 7 + c * 101) % 256) as u8
        });
        let out = edges_rgba(src.view(), ProcessingMode::Parallel).unwrap();

        for y in 6..18 {
            for x in 6..24 {
                assert_eq!(out[[y, x, 3]], 255);
            }
        }
    }

    #[test]
    fn test_deterministic_across_calls_and_modes() {
        let src = pattern(32, 40);

        let first = edges_rgba(src.view(), ProcessingMode::Sequential).unwrap();
        let second = edges_rgba(src.view(), ProcessingMode::Sequential).unwrap();
        let parallel = edges_rgba(src.view(), ProcessingMode::Parallel).unwrap();
        let pooled = edges_rgba(src.view(), ProcessingMode::ParallelWith(3)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, parallel);
        assert_eq!(first, pooled);
    }

    #[test]
    fn test_source_is_not_modified() {
        let src = pattern(20, 20);
        let before = src.clone();
        let mut dst = Array3::<u8>::zeros((20, 20, 4));
        edges_rgba_into(src.view(), dst.view_mut(), ProcessingMode::Parallel).unwrap();
        assert_eq!(src, before);
    }

    #[test]
    fn test_exact_double_border_writes_nothing() {
        let src = pattern(12, 12);
        let mut dst = flat(12, 12, [1, 2, 3, 4]);
        edges_rgba_into(src.view(), dst.view_mut(), ProcessingMode::Parallel).unwrap();
        assert_eq!(dst, flat(12, 12, [1, 2, 3, 4]));
    }

    #[test]
    fn test_tiny_buffer_is_noop() {
        let src = pattern(3, 5);
        let out = edges_rgba(src.view(), ProcessingMode::Sequential).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let src = pattern(20, 20);
        let mut dst = Array3::<u8>::zeros((20, 21, 4));
        let err = edges_rgba_into(src.view(), dst.view_mut(), ProcessingMode::Sequential);
        assert!(matches!(err, Err(FilterError::SizeMismatch { .. })));
    }

    #[test]
    fn test_rgb_input_is_rejected() {
        let src = Array3::<u8>::zeros((20, 20, 3));
        let err = edges_rgba(src.view(), ProcessingMode::Sequential);
        assert!(matches!(err, Err(FilterError::InvalidShape { .. })));
    }
}
