// sobel.rs — Edge-magnitude kernel, CPU reference implementation.
//
// One directional 3×3 gradient (the horizontal-edge-emphasizing Sobel
// operator), applied per pixel: weighted sum over the 3×3 neighborhood,
// per-channel absolute value, clamp to [0, 1], alpha forced to 1.0.
// There is no second pass and no magnitude combination — a single
// directional gradient only.
//
// BOUNDARY POLICY (load-bearing, do not "fix"):
//   - x == 0 or y == 0: no read, no write. The first row and first column
//     of the destination keep whatever the caller put there.
//   - x == W−1 or y == H−1: computed normally; the out-of-range +1
//     neighbors are edge-clamped reads.
// The asymmetry is intentional: downstream consumers depend on the exact
// write set, and both execution paths (CPU and GPU) must agree on it.
//
// The parallel path splits the destination into disjoint row slices
// (rayon); every unit of work reads only the shared source and writes its
// own row, so there is no synchronization anywhere. The sequential path
// exists for tests and small frames and is bit-identical.

use rayon::prelude::*;

use crate::image::{Image, Rgb, Rgba};

/// The fixed 3×3 gradient weights, indexed `[dx + 1][dy + 1]`
/// (column-major: one inner array per column of the neighborhood).
///
/// Each column and each row of the matrix sums to zero, so a constant
/// input field produces a zero gradient everywhere.
pub const EDGE_WEIGHTS: [[f32; 3]; 3] = [
    [1.0, 0.0, -1.0], // column x−1
    [2.0, 0.0, -2.0], // column x
    [1.0, 0.0, -1.0], // column x+1
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced at the filter's binding layer. The kernel itself is a
/// total function over its coordinate domain and cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    /// Source and destination images have different dimensions.
    DimensionMismatch {
        src: (usize, usize),
        dst: (usize, usize),
    },
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::DimensionMismatch { src, dst } => write!(
                f,
                "source ({}×{}) and destination ({}×{}) dimensions differ",
                src.0, src.1, dst.0, dst.1
            ),
        }
    }
}

impl std::error::Error for FilterError {}

// ---------------------------------------------------------------------------
// Kernel
// ---------------------------------------------------------------------------

/// Compute one destination pixel at an interior coordinate (x ≥ 1, y ≥ 1).
///
/// Reads the full 3×3 neighborhood (center included, weight zero),
/// accumulates the per-channel weighted sum, then |·| and clamp to [0, 1].
#[inline]
fn edge_pixel(src: &Image<Rgb>, x: usize, y: usize) -> Rgba {
    // x, y ≥ 1 puts the −1 neighbors in range; the +1 neighbors are
    // edge-clamped at the right/bottom border.
    let xs = [x - 1, x, (x + 1).min(src.width() - 1)];
    let ys = [y - 1, y, (y + 1).min(src.height() - 1)];

    let mut grad = Rgb::BLACK;
    for (c, column) in EDGE_WEIGHTS.iter().enumerate() {
        for (r, &weight) in column.iter().enumerate() {
            // SAFETY: xs/ys entries are clamped below width/height.
            let sample = unsafe { src.get_unchecked(xs[c], ys[r]) };
            grad += sample.scaled(weight);
        }
    }
    Rgba::opaque(grad.abs().clamped())
}

/// Fill one destination row (y ≥ 1). Column 0 is left untouched.
fn fill_row(src: &Image<Rgb>, y: usize, row: &mut [Rgba]) {
    for x in 1..src.width() {
        row[x] = edge_pixel(src, x, y);
    }
}

#[inline]
fn check_dimensions(src: &Image<Rgb>, dst: &Image<Rgba>) -> Result<(), FilterError> {
    if src.width() != dst.width() || src.height() != dst.height() {
        return Err(FilterError::DimensionMismatch {
            src: (src.width(), src.height()),
            dst: (dst.width(), dst.height()),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Run the edge-magnitude kernel over `src`, writing into `dst`.
///
/// Every interior coordinate (x ≥ 1, y ≥ 1) of `dst` receives exactly one
/// write; the first row and first column are never touched. Destination
/// rows are processed in parallel across worker threads — the output is
/// bit-identical to [`edge_magnitude_into_seq`] regardless of thread
/// count or scheduling, because units of work are independent and the
/// per-pixel arithmetic is identical.
///
/// # Errors
/// Returns [`FilterError::DimensionMismatch`] if the images differ in
/// size. The kernel itself has no failure path.
pub fn edge_magnitude_into(src: &Image<Rgb>, dst: &mut Image<Rgba>) -> Result<(), FilterError> {
    check_dimensions(src, dst)?;
    let width = src.width();
    let stride = dst.stride();
    dst.as_mut_slice()
        .par_chunks_mut(stride)
        .enumerate()
        .skip(1) // row 0 is never written
        .for_each(|(y, row)| fill_row(src, y, &mut row[..width]));
    Ok(())
}

/// Sequential variant of [`edge_magnitude_into`]. Same contract, same
/// output bits; useful for tiny frames and for pinning down test failures
/// without rayon in the stack.
pub fn edge_magnitude_into_seq(src: &Image<Rgb>, dst: &mut Image<Rgba>) -> Result<(), FilterError> {
    check_dimensions(src, dst)?;
    for y in 1..src.height() {
        fill_row(src, y, dst.row_mut(y));
    }
    Ok(())
}

/// Allocate a zeroed destination and run the kernel over `src`.
///
/// The unwritten first row and column come back as transparent black
/// (all channels zero) — the freshly allocated destination's state.
pub fn edge_magnitude(src: &Image<Rgb>) -> Image<Rgba> {
    let mut dst = Image::new(src.width(), src.height());
    edge_magnitude_into(src, &mut dst)
        .expect("destination allocated with source dimensions");
    dst
}
