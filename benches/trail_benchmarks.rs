//! Benchmarks for the accumulation core.
//!
//! Run with: cargo bench
//! Run the parallel scan: cargo bench --features rayon
//!
//! No fixture files needed — frames are synthesised in memory.

use criterion::{Criterion, criterion_group, criterion_main};
use image::RgbImage;
use lighttrail::{TrailAccumulator, intensity};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

/// A frame with a diagonal brightness gradient, shifted by `phase` so that
/// successive frames actually win pixels from each other.
fn gradient_frame(phase: u32) -> RgbImage {
    RgbImage::from_fn(WIDTH, HEIGHT, |x, y| {
        let value = ((x + y + phase) % 256) as u8;
        image::Rgb([value, value / 2, 255 - value])
    })
}

fn benchmark_ingest(criterion: &mut Criterion) {
    let frames: Vec<RgbImage> = (0..8).map(|i| gradient_frame(i * 37)).collect();

    criterion.bench_function("ingest 8 x 720p frames", |bencher| {
        bencher.iter(|| {
            let mut accumulator = TrailAccumulator::new(WIDTH, HEIGHT).unwrap();
            for frame in &frames {
                accumulator.ingest(frame).unwrap();
            }
            accumulator.frames_seen()
        });
    });

    let frame = gradient_frame(0);
    criterion.bench_function("ingest one frame into a warm buffer", |bencher| {
        let mut accumulator = TrailAccumulator::new(WIDTH, HEIGHT).unwrap();
        accumulator.ingest(&gradient_frame(101)).unwrap();
        bencher.iter(|| {
            accumulator.ingest(&frame).unwrap();
        });
    });
}

fn benchmark_intensity(criterion: &mut Criterion) {
    let frame = gradient_frame(0);

    criterion.bench_function("intensity over a 720p frame", |bencher| {
        bencher.iter(|| {
            frame
                .pixels()
                .map(|pixel| intensity(pixel[0], pixel[1], pixel[2]) as u64)
                .sum::<u64>()
        });
    });
}

criterion_group!(benches, benchmark_ingest, benchmark_intensity);
criterion_main!(benches);
