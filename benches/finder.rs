use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;

use pace_editing::bitmatrix::BitMatrix;
use pace_editing::config::{Conversion, Mode, Restriction};
use pace_editing::conflict::Policy;
use pace_editing::finder::center::Finder;
use pace_editing::finder::sparse::SparseFinder;
use pace_editing::rng::rng_from_seed;

/// A random graph at a fixed density, built with a deterministic seed so
/// repeated benchmark runs compare apples to apples.
fn random_graph(n: usize, edge_prob: f64, seed: u64) -> BitMatrix {
    let mut rng = rng_from_seed(seed);
    let mut g = BitMatrix::new(n);
    for u in 0..n {
        for v in (u + 1)..n {
            if rng.gen::<f64>() < edge_prob {
                g.set_edge(u, v);
            }
        }
    }
    g
}

fn finder_bench(c: &mut Criterion) {
    let g = random_graph(80, 0.08, 1);

    let finder = Finder::new(4, true);
    c.bench_function("Finder::find P4/C4 over 80 sparse vertices", |b| {
        b.iter(|| {
            let mut count = 0usize;
            finder.find(black_box(&g), |_| {
                count += 1;
                false
            });
            count
        })
    });

    let finder6 = Finder::new(6, true);
    c.bench_function("Finder::find P6/C6 over 80 sparse vertices", |b| {
        b.iter(|| {
            let mut count = 0usize;
            finder6.find(black_box(&g), |_| {
                count += 1;
                false
            });
            count
        })
    });

    c.bench_function("Finder::find_near a single pair", |b| {
        b.iter(|| {
            let mut count = 0usize;
            finder.find_near(black_box(&g), 3, 7, |_| {
                count += 1;
                false
            });
            count
        })
    });

    let e = BitMatrix::new(80);
    let policy = Policy::new(Mode::Edit, Restriction::None, Conversion::Normal);
    c.bench_function("SparseFinder::find dedups cycle over-reporting", |b| {
        b.iter(|| {
            let mut sparse = SparseFinder::new(finder, policy, 80);
            let mut count = 0usize;
            sparse.find(black_box(&g), black_box(&e), |_| {
                count += 1;
                false
            });
            count
        })
    });
}

criterion_group!(benches, finder_bench);
criterion_main!(benches);
