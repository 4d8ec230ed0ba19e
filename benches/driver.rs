use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pace_editing::config::{Conversion, DriverKind, LBKind, Length, Mode, Restriction, SelKind, SolverConfig};
use pace_editing::driver::{SequentialDriver, WorkStealingDriver};
use pace_editing::graph::EditGraph;

/// Several disjoint P4s: each needs exactly one edit and none interact,
/// so the branching factor stays small enough to benchmark repeatedly.
fn disjoint_p4s(copies: usize) -> EditGraph {
    let n = copies * 4;
    let edges = (0..copies).flat_map(|c| {
        let base = c * 4;
        [(base, base + 1), (base + 1, base + 2), (base + 2, base + 3)]
    });
    EditGraph::from_edges(n, edges)
}

fn sequential_config() -> SolverConfig {
    SolverConfig {
        mode: Mode::Edit,
        restriction: Restriction::Redundant,
        conversion: Conversion::Normal,
        length: Length::new(4, true),
        selector: SelKind::Most,
        lb: LBKind::Arw,
        driver: DriverKind::SingleThreaded,
        k_min: 0,
        k_max: 20,
        all_solutions: false,
        threads: 1,
    }
}

fn driver_bench(c: &mut Criterion) {
    let copies = 5;
    let base = disjoint_p4s(copies);

    let st_cfg = sequential_config();
    c.bench_function("SequentialDriver::solve over 5 disjoint P4s", |b| {
        b.iter(|| {
            let mut eg = base.clone();
            let driver = SequentialDriver::new(eg.size(), &st_cfg);
            driver.solve(black_box(&mut eg), copies, |_, _| false)
        })
    });

    let mut mt_cfg = sequential_config();
    mt_cfg.driver = DriverKind::WorkStealing;
    mt_cfg.threads = 4;
    c.bench_function("WorkStealingDriver::solve over 5 disjoint P4s, 4 threads", |b| {
        b.iter(|| {
            let mut eg = base.clone();
            let driver = WorkStealingDriver::new(eg.size(), &mt_cfg);
            driver.solve(black_box(&mut eg), copies, |_, _| false)
        })
    });
}

criterion_group!(benches, driver_bench);
criterion_main!(benches);
