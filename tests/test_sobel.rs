// tests/test_sobel.rs — Integration tests for the edge-magnitude kernel.
//
// These exercise the public API only (`cargo test --test test_sobel`)
// and pin down the kernel's observable contract: the boundary-skip
// policy, edge-clamped sampling, output range, determinism, and the
// parallel/sequential equivalence.

use edgeline::image::{Image, Rgb, Rgba};
use edgeline::sobel::{
    edge_magnitude, edge_magnitude_into, edge_magnitude_into_seq, FilterError,
};

const SENTINEL: Rgba = Rgba([0.125, 0.25, 0.5, 0.75]);

/// A deterministic textured source frame (diagonal ramps + blocks).
fn make_frame(w: usize, h: usize) -> Image<Rgb> {
    let mut img = Image::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let r = (x as f32 / w as f32 + y as f32 / h as f32) * 0.5;
            let g = if (x / 4 + y / 4) % 2 == 0 { 0.9 } else { 0.1 };
            let b = ((x * 7 + y * 13) % 32) as f32 / 31.0;
            img.set(x, y, Rgb::new(r, g, b));
        }
    }
    img
}

// ===== Boundary-skip policy =====

#[test]
fn boundary_row_and_column_never_written() {
    let src = make_frame(12, 9);
    let mut dst = Image::filled(12, 9, SENTINEL);
    edge_magnitude_into(&src, &mut dst).unwrap();

    for x in 0..12 {
        assert_eq!(dst.get(x, 0), SENTINEL, "row 0 written at x={x}");
    }
    for y in 0..9 {
        assert_eq!(dst.get(0, y), SENTINEL, "column 0 written at y={y}");
    }
    // Every interior pixel was overwritten (alpha forced to 1.0, which the
    // sentinel does not carry).
    for y in 1..9 {
        for x in 1..12 {
            assert_eq!(dst.get(x, y).a(), 1.0, "interior not written at ({x},{y})");
        }
    }
}

#[test]
fn last_row_and_column_are_computed() {
    // The skip applies to index 0 only — W−1 and H−1 are regular interior
    // coordinates with clamped neighbor reads.
    let src = make_frame(6, 6);
    let mut dst = Image::filled(6, 6, SENTINEL);
    edge_magnitude_into(&src, &mut dst).unwrap();
    assert_ne!(dst.get(5, 5), SENTINEL);
    assert_eq!(dst.get(5, 5).a(), 1.0);
    assert_ne!(dst.get(5, 1), SENTINEL);
    assert_ne!(dst.get(1, 5), SENTINEL);
}

// ===== Output range =====

#[test]
fn interior_channels_stay_in_unit_range() {
    let src = make_frame(32, 24);
    let dst = edge_magnitude(&src);
    for y in 1..24 {
        for x in 1..32 {
            let p = dst.get(x, y);
            for ch in 0..3 {
                assert!(
                    (0.0..=1.0).contains(&p.0[ch]),
                    "channel {ch} out of range at ({x},{y}): {}",
                    p.0[ch]
                );
            }
            assert_eq!(p.a(), 1.0);
        }
    }
}

// ===== Uniform input =====

#[test]
fn uniform_input_yields_zero_gradient() {
    let src = Image::filled(16, 16, Rgb::new(0.3, 0.6, 0.9));
    let dst = edge_magnitude(&src);
    for y in 1..16 {
        for x in 1..16 {
            assert_eq!(
                dst.get(x, y),
                Rgba::new(0.0, 0.0, 0.0, 1.0),
                "nonzero gradient at ({x},{y})"
            );
        }
    }
}

// ===== Edge-clamp sampling =====

#[test]
fn bottom_right_corner_clamps_instead_of_failing() {
    // Output at (W−1, H−1) must read the out-of-range (W, H) neighbors as
    // the edge pixels themselves. An enlarged image whose extra row and
    // column replicate the source's edges makes those reads in-range, so
    // the two outputs must agree exactly.
    let src = make_frame(5, 4);
    let mut extended: Image<Rgb> = Image::new(6, 5);
    for y in 0..5 {
        for x in 0..6 {
            extended.set(x, y, src.get(x.min(4), y.min(3)));
        }
    }

    let out = edge_magnitude(&src);
    let out_ext = edge_magnitude(&extended);
    assert_eq!(out.get(4, 3), out_ext.get(4, 3));
}

// ===== Determinism =====

#[test]
fn repeated_runs_are_byte_identical() {
    let src = make_frame(40, 30);
    let a = edge_magnitude(&src);
    let b = edge_magnitude(&src);
    for y in 0..30 {
        for x in 0..40 {
            assert_eq!(a.get(x, y), b.get(x, y), "nondeterminism at ({x},{y})");
        }
    }
}

#[test]
fn parallel_and_sequential_paths_agree_exactly() {
    let src = make_frame(33, 27); // odd sizes: uneven row partitions
    let mut par = Image::filled(33, 27, SENTINEL);
    let mut seq = Image::filled(33, 27, SENTINEL);
    edge_magnitude_into(&src, &mut par).unwrap();
    edge_magnitude_into_seq(&src, &mut seq).unwrap();
    for y in 0..27 {
        for x in 0..33 {
            assert_eq!(par.get(x, y), seq.get(x, y), "divergence at ({x},{y})");
        }
    }
}

// ===== Concrete scenarios =====

#[test]
fn uniform_3x3_scenario() {
    // All pixels (0.5, 0.5, 0.5): interior output is black, opaque;
    // row 0 and column 0 keep the sentinel.
    let src = Image::filled(3, 3, Rgb::splat(0.5));
    let mut dst = Image::filled(3, 3, SENTINEL);
    edge_magnitude_into(&src, &mut dst).unwrap();

    assert_eq!(dst.get(1, 1), Rgba::new(0.0, 0.0, 0.0, 1.0));
    for x in 0..3 {
        assert_eq!(dst.get(x, 0), SENTINEL);
    }
    for y in 0..3 {
        assert_eq!(dst.get(0, y), SENTINEL);
    }
}

#[test]
fn bright_pixel_above_center_saturates() {
    // Single white pixel at (1, 0) in a black 3×3. At (1, 1) it sits in
    // the weight-2 slot of the y−1 row: |2.0| clamps to fully saturated
    // white, alpha 1.0.
    let mut src: Image<Rgb> = Image::new(3, 3);
    src.set(1, 0, Rgb::splat(1.0));
    let dst = edge_magnitude(&src);
    assert_eq!(dst.get(1, 1), Rgba::new(1.0, 1.0, 1.0, 1.0));
}

// ===== Host-binding validation =====

#[test]
fn dimension_mismatch_is_surfaced() {
    let src: Image<Rgb> = Image::new(8, 8);
    let mut dst: Image<Rgba> = Image::new(9, 8);
    match edge_magnitude_into(&src, &mut dst) {
        Err(FilterError::DimensionMismatch { src, dst }) => {
            assert_eq!(src, (8, 8));
            assert_eq!(dst, (9, 8));
        }
        other => panic!("expected DimensionMismatch, got {other:?}"),
    }
    // The sequential path applies the same check.
    assert!(edge_magnitude_into_seq(&src, &mut dst).is_err());
}

// ===== Degenerate dimensions =====

#[test]
fn single_row_or_column_images_have_no_interior() {
    // 1×N and N×1: every coordinate has x == 0 or y == 0 — nothing is
    // ever written, and nothing panics.
    let src_row: Image<Rgb> = Image::filled(7, 1, Rgb::splat(0.8));
    let mut dst_row = Image::filled(7, 1, SENTINEL);
    edge_magnitude_into(&src_row, &mut dst_row).unwrap();
    for x in 0..7 {
        assert_eq!(dst_row.get(x, 0), SENTINEL);
    }

    let src_col: Image<Rgb> = Image::filled(1, 7, Rgb::splat(0.8));
    let mut dst_col = Image::filled(1, 7, SENTINEL);
    edge_magnitude_into(&src_col, &mut dst_col).unwrap();
    for y in 0..7 {
        assert_eq!(dst_col.get(0, y), SENTINEL);
    }
}

#[test]
fn two_by_two_interior_is_one_pixel() {
    // Smallest image with an interior: only (1, 1) is written, and all
    // of its +1 neighbors are clamped reads.
    let src = Image::from_vec(
        2,
        2,
        vec![
            Rgb::splat(0.0),
            Rgb::splat(1.0),
            Rgb::splat(0.0),
            Rgb::splat(1.0),
        ],
    );
    let mut dst = Image::filled(2, 2, SENTINEL);
    edge_magnitude_into(&src, &mut dst).unwrap();
    assert_eq!(dst.get(0, 0), SENTINEL);
    assert_eq!(dst.get(1, 0), SENTINEL);
    assert_eq!(dst.get(0, 1), SENTINEL);
    // Columns are uniform vertically (after clamping), so the directional
    // gradient cancels to zero.
    assert_eq!(dst.get(1, 1), Rgba::new(0.0, 0.0, 0.0, 1.0));
}
