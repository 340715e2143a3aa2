use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trainsafe_core::{Position, SpeedKmh, TrackId, TrainId};
use trainsafe_sim::{scan_conflicts, Train, STOP_THRESHOLD_KM};

fn fleet(size: usize) -> Vec<Train> {
    (0..size)
        .map(|index| {
            let lat = 20.0 + index as f64 * 0.02;
            Train::new(
                TrainId::new(format!("train-{index}")).expect("id"),
                format!("route {index}"),
                Position::new(lat, 77.0).expect("position"),
                Position::new(lat + 0.3, 77.2).expect("target"),
                SpeedKmh::new(90.0).expect("speed"),
                TrackId::new((index % 4 + 1) as u8).expect("track"),
            )
        })
        .collect()
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("conflict_scan");
    for size in [4usize, 16, 64] {
        group.bench_function(format!("pairwise_{size}"), |b| {
            let base = fleet(size);
            b.iter(|| {
                let mut trains = base.clone();
                black_box(scan_conflicts(&mut trains, STOP_THRESHOLD_KM))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
