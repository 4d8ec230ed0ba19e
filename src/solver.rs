//! Top-level entry point: validate a [`SolverConfig`], then iteratively
//! deepen over `k_min..=k_max` until a feasible edit count is found.
//!
//! Neither `original_source`'s `ST.hpp`/`MT.hpp` do this loop themselves —
//! it lives in their CLI driver, outside the files this crate ports. It's
//! included here because the `k_min`/`k_max`/`all_solutions` configuration
//! axes are otherwise unreachable from any public API.

use tracing::info;

use crate::bitmatrix::BitMatrix;
use crate::config::{DriverKind, SolverConfig};
use crate::driver::{SequentialDriver, WorkStealingDriver};
use crate::error::{Result, SolverError};
use crate::graph::EditGraph;

enum Driver {
    Sequential(SequentialDriver),
    WorkStealing(WorkStealingDriver),
}

pub struct Solver {
    config: SolverConfig,
    driver: Driver,
}

impl Solver {
    pub fn new(n: usize, config: SolverConfig) -> Result<Self> {
        config.validate()?;
        let driver = match config.driver {
            DriverKind::SingleThreaded => Driver::Sequential(SequentialDriver::new(n, &config)),
            DriverKind::WorkStealing => Driver::WorkStealing(WorkStealingDriver::new(n, &config)),
        };
        Ok(Solver { config, driver })
    }

    /// A lower bound on the number of edits `eg` needs, before editing.
    pub fn initial_lower_bound(&self, eg: &EditGraph) -> usize {
        match &self.driver {
            Driver::Sequential(d) => d.initial_lower_bound(eg),
            Driver::WorkStealing(d) => d.initial_lower_bound(eg),
        }
    }

    /// Search `k_min..=k_max` for the smallest feasible edit count. `write`
    /// is called with every accepted solution at the minimum feasible `k`;
    /// return `true` from it to keep searching for further solutions at
    /// that `k` (only useful when `config.all_solutions`), `false` to stop
    /// after the first. Returns the minimum feasible `k`, or `None` if no
    /// `k` in range admits a solution.
    pub fn solve(
        &self,
        eg: &mut EditGraph,
        mut write: impl FnMut(&BitMatrix, &BitMatrix) -> bool + Send,
    ) -> Result<Option<usize>> {
        if eg.size() == 0 {
            return Err(SolverError::InvariantViolation(
                "solve called on an empty graph".into(),
            ));
        }
        info!(
            n = eg.size(),
            length = self.config.length.l,
            with_cycles = self.config.length.with_cycles,
            mode = ?self.config.mode,
            restriction = ?self.config.restriction,
            conversion = ?self.config.conversion,
            driver = ?self.config.driver,
            threads = self.config.threads,
            "solve starting"
        );

        for k in self.config.k_min..=self.config.k_max {
            let found = match &self.driver {
                Driver::Sequential(d) => d.solve(eg, k, &mut write),
                Driver::WorkStealing(d) => {
                    // The work-stealing driver requires `write` to be `Sync`
                    // (it may be called from any worker thread); wrap the
                    // caller's `FnMut` behind a mutex so a single closure
                    // type satisfies both drivers' signatures.
                    let write = std::sync::Mutex::new(&mut write);
                    d.solve(eg, k, |g, e| (write.lock().unwrap())(g, e))
                }
            };
            if found {
                info!(k, "solve found minimum feasible k");
                return Ok(Some(k));
            }
        }
        info!(k_max = self.config.k_max, "no feasible k found in range");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Conversion, Length, LBKind, Mode, Restriction, SelKind};

    fn config(driver: DriverKind, threads: usize) -> SolverConfig {
        SolverConfig {
            mode: Mode::Edit,
            restriction: Restriction::Redundant,
            conversion: Conversion::Normal,
            length: Length::new(4, true),
            selector: SelKind::Most,
            lb: LBKind::Arw,
            driver,
            k_min: 0,
            k_max: 6,
            all_solutions: false,
            threads,
        }
    }

    #[test]
    fn sequential_solver_finds_minimum_k() {
        let mut eg = EditGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let solver = Solver::new(4, config(DriverKind::SingleThreaded, 1)).unwrap();
        let k = solver.solve(&mut eg, |_, _| false).unwrap();
        assert_eq!(k, Some(1));
    }

    #[test]
    fn work_stealing_solver_agrees_with_sequential() {
        let mut eg = EditGraph::from_edges(8, [(0, 1), (1, 2), (2, 3), (4, 5), (5, 6), (6, 7)]);
        let solver = Solver::new(8, config(DriverKind::WorkStealing, 4)).unwrap();
        let k = solver.solve(&mut eg, |_, _| false).unwrap();
        assert_eq!(k, Some(2));
    }

    #[test]
    fn already_solved_graph_reports_k_zero() {
        let mut eg = EditGraph::new(5);
        let solver = Solver::new(5, config(DriverKind::SingleThreaded, 1)).unwrap();
        let k = solver.solve(&mut eg, |_, _| false).unwrap();
        assert_eq!(k, Some(0));
    }

    #[test]
    fn invalid_config_is_rejected_before_any_solve() {
        let mut cfg = config(DriverKind::SingleThreaded, 1);
        cfg.k_min = 5;
        cfg.k_max = 1;
        assert!(Solver::new(4, cfg).is_err());
    }
}
