//! Performance measurement for label clipping and tile sampling

// Criterion macros generate undocumented functions
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mosaictile::labels::{AbsoluteLabel, LabelFormat, PixelRect, labels_in_rect};
use mosaictile::sampling::{Mosaic, RegionRatios, SamplerConfig, TileSampler};
use ndarray::Array3;
use std::hint::black_box;

fn scattered_labels(count: usize) -> Vec<AbsoluteLabel> {
    (0..count)
        .map(|index| {
            let x_left = (index * 97 % 1800) as i64;
            let y_top = (index * 61 % 1100) as i64;
            AbsoluteLabel {
                class_id: (index % 5) as u32,
                x_left,
                y_top,
                x_right: x_left + 24,
                y_bottom: y_top + 18,
                area: 24 * 18,
            }
        })
        .collect()
}

/// Measures clipping cost as the mosaic label count grows
fn bench_labels_in_rect(c: &mut Criterion) {
    let mut group = c.benchmark_group("labels_in_rect");

    for label_count in &[100, 1000, 10000] {
        let labels = scattered_labels(*label_count);
        let rect = PixelRect::new(600, 400, 1240, 880);

        group.bench_with_input(
            BenchmarkId::from_parameter(label_count),
            label_count,
            |b, _| {
                b.iter(|| labels_in_rect(black_box(&labels), &rect, 0.5, false));
            },
        );
    }

    group.finish();
}

/// Measures full tile extraction including transform and conversion
fn bench_sample_tile(c: &mut Criterion) {
    let mosaic = Mosaic::new(Array3::from_elem((1200, 1900, 3), 0.5), scattered_labels(500));
    let config = SamplerConfig {
        tile_width: 640,
        tile_height: 480,
        min_labels: 1,
        seed: Some(12345),
        ..SamplerConfig::default()
    };

    let Ok(mut sampler) = TileSampler::new(&mosaic, &RegionRatios::FULL, config) else {
        return;
    };

    c.bench_function("sample_tile_640x480", |b| {
        b.iter(|| sampler.sample(black_box(LabelFormat::Normalized)));
    });
}

criterion_group!(benches, bench_labels_in_rect, bench_sample_tile);
criterion_main!(benches);
