use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sensor_spectrum::stream::{Channel, Sample, StreamConfig};
use sensor_spectrum::transform;

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    for &len in &[256usize, 1024, 4096] {
        let signal: Vec<f64> = (0..len).map(|n| (n as f64 * 0.05).sin()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(len), &signal, |b, signal| {
            b.iter(|| transform(black_box(signal), 44100.0))
        });
    }
    group.finish();
}

fn bench_on_sample(c: &mut Criterion) {
    let mut channel = match Channel::new(StreamConfig::default()) {
        Ok(channel) => channel,
        Err(e) => panic!("default config rejected: {}", e),
    };
    let mut t = 0i64;
    c.bench_function("on_sample_full_window", |b| {
        b.iter(|| {
            t += 1;
            channel.on_sample(black_box(Sample::new(t, (t as f64 * 0.01).sin())))
        })
    });
}

criterion_group!(benches, bench_transform, bench_on_sample);
criterion_main!(benches);
