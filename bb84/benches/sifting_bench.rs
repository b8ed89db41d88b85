// benches/sifting_bench.rs

use bb84::error_correction::{cascade_correction, initial_block_size};
use bb84::privacy_amplification::apply_privacy_amplification;
use bb84::qber::{estimate_error_rate, select_sample};
use bb84::{sift_trial, simulate_trial, ChannelModel, SampleSelection};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn benchmark_sifting(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let trial = simulate_trial(10_000, &ChannelModel::noisy(0.03), &mut rng).unwrap();

    c.bench_function("sift_10k", |b| {
        b.iter(|| sift_trial(black_box(&trial)).unwrap());
    });

    let sifted = sift_trial(&trial).unwrap();
    let sample = select_sample(sifted.len(), &SampleSelection::RandomFraction(0.5), &mut rng).unwrap();

    c.bench_function("estimate_error_rate_half", |b| {
        b.iter(|| estimate_error_rate(&sifted.sender, &sifted.receiver, black_box(&sample)).unwrap());
    });

    c.bench_function("simulate_trial_1k", |b| {
        let channel = ChannelModel::intercepted(0.5);
        b.iter(|| simulate_trial(1_000, &channel, &mut rng).unwrap());
    });
}

fn benchmark_distillation(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let trial = simulate_trial(4_000, &ChannelModel::noisy(0.03), &mut rng).unwrap();
    let sifted = sift_trial(&trial).unwrap();

    let block = initial_block_size(sifted.len(), 0.03);
    c.bench_function("cascade_correction_2k", |b| {
        b.iter(|| cascade_correction(&sifted.sender, black_box(&sifted.receiver), block, 7).unwrap());
    });

    c.bench_function("toeplitz_2k_to_1k", |b| {
        b.iter(|| apply_privacy_amplification(black_box(&sifted.sender), 1_000, 7));
    });
}

criterion_group!(benches, benchmark_sifting, benchmark_distillation);
criterion_main!(benches);
