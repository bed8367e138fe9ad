use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::{vector, Matrix3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use cemc::base::{Cluster, Operation, Operations};
use cemc::embed::{bcc_positions, EmbeddingData};
use cemc::identify::cluster_list;
use cemc::mc::{EnergyModel, ExchangeStep, LatticeConfig, McStep, SiteOperatorBasis};

fn bcc_operations() -> Operations {
    let permutations = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    let mut operations = Vec::with_capacity(96);
    for permutation in permutations {
        for signs in 0..8u32 {
            let mut rotation = Matrix3::zeros();
            for row in 0..3 {
                let sign = if signs & (1 << row) != 0 { -1.0 } else { 1.0 };
                rotation[(row, permutation[row])] = sign;
            }
            operations.push(Operation::new(rotation, vector![0.0, 0.0, 0.0]));
            operations.push(Operation::new(rotation, vector![0.5, 0.5, 0.5]));
        }
    }
    operations
}

fn sweep_benchmark(c: &mut Criterion) {
    let l = 4;
    let positions = bcc_positions(l);
    let num_sites = positions.len();
    let maximal = vec![Cluster::from_positions(vec![
        vector![0.0, 0.0, 0.0],
        vector![0.5, 0.5, 0.5],
    ])];
    let clusters = cluster_list(&maximal, &bcc_operations(), None);
    let embeddings = EmbeddingData::generate(&positions, &clusters, l).unwrap();
    let basis = SiteOperatorBasis::new(2).unwrap();
    let energy = EnergyModel::new(embeddings, basis, vec![1.0]).unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    let mut config = LatticeConfig::new(num_sites, 2);
    config.randomize(&[0.5, 0.5], &mut rng);
    let mut step = ExchangeStep::new();

    c.bench_function("exchange_sweep_bcc_l4", move |b| {
        b.iter(|| {
            let mut delta = 0.0;
            for _ in 0..num_sites {
                delta += step.attempt(&mut config, &energy, 0.5, &mut rng);
            }
            black_box(delta)
        })
    });
}

criterion_group!(benches, sweep_benchmark);
criterion_main!(benches);
