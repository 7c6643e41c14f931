// benches/benchmarks.rs — CPU kernel benchmarks.
//
//   cargo bench
//
// Measures the edge-magnitude kernel at streaming-typical resolutions,
// sequential vs. row-parallel, reusing one destination so allocation
// stays out of the measurement.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use edgeline::image::{Image, Rgb, Rgba};
use edgeline::sobel::{edge_magnitude_into, edge_magnitude_into_seq};

/// Synthetic textured frame (ramps + blocks) — enough structure that the
/// gradient sums don't constant-fold into anything branch-predictable.
fn make_frame(w: usize, h: usize) -> Image<Rgb> {
    let mut img = Image::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let r = (x as f32 / w as f32 + y as f32 / h as f32) * 0.5;
            let g = if (x / 8 + y / 8) % 2 == 0 { 0.85 } else { 0.15 };
            let b = ((x * 7 + y * 13) % 64) as f32 / 63.0;
            img.set(x, y, Rgb::new(r, g, b));
        }
    }
    img
}

fn bench_edge_magnitude(c: &mut Criterion) {
    let mut group = c.benchmark_group("edge_magnitude");

    for &(w, h) in &[(640usize, 480usize), (1280, 720), (1920, 1080)] {
        let src = make_frame(w, h);
        let mut dst: Image<Rgba> = Image::new(w, h);
        let label = format!("{w}x{h}");

        group.bench_with_input(BenchmarkId::new("parallel", &label), &src, |b, src| {
            b.iter(|| edge_magnitude_into(src, &mut dst).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("sequential", &label), &src, |b, src| {
            b.iter(|| edge_magnitude_into_seq(src, &mut dst).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_edge_magnitude);
criterion_main!(benches);
