//! The work-stealing parallel driver.
//!
//! Ported from `original_source`'s `Editor/MT.hpp`. That file's actual
//! architecture is coarser than a frame-by-frame work-stealing scheduler: a
//! shared `std::deque<std::unique_ptr<Work>>` holds *whole* self-contained
//! problem clones (`Work{graph, edited, k, state, subgraph_stats}`), guarded
//! by a mutex; idle workers park on a condition variable, and a `working`
//! counter under the same mutex decides when every worker has run dry and
//! the whole search is done. Each worker otherwise runs its own local
//! `Editor::ST`-style recursion, and only materializes a new `Work` item
//! (a full deep clone) when it wants to hand a branch to another thread.
//!
//! This port keeps that shape — a shared queue of self-contained `Work`
//! items plus a condvar-guarded idle count — but simplifies *when* a branch
//! gets split off. The source can split a path at any depth, whenever some
//! other worker goes idle mid-search (it re-checks after every finished
//! subgraph-consumer call). Recreating that exact preemption point without
//! a compiler to verify the synchronization would be guessing at a data
//! race; instead this port splits eagerly and statically: every `Work` item
//! popped off the queue has its own `ProblemSet` computed, and each of its
//! vertex pairs becomes its own new `Work` item pushed back onto the queue,
//! as long as the queue is shallower than `threads * split_fanout` and the
//! recursion hasn't passed `max_split_depth`. Past either limit, the
//! remaining subtree is hashed off entirely to
//! [`SequentialDriver::edit_rec`] and explored by the popping worker alone.
//! This sacrifices load-balancing on deep, narrow trees relative to the
//! source's any-depth splitting — recorded here as a known limitation
//! rather than silently matched.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crossbeam_deque::{Injector, Steal};
use tracing::{debug, info, warn};

use crate::bitmatrix::BitMatrix;
use crate::config::{Restriction, SolverConfig};
use crate::driver::st::SequentialDriver;
use crate::graph::EditGraph;
use crate::lb::LBState;
use crate::selector::SelectorState;
use crate::stats::SubgraphStats;

/// A fully self-contained search node: everything a worker needs to resume
/// exploring this branch without touching any other worker's state.
struct Work {
    eg: EditGraph,
    stats: SubgraphStats,
    lb_state: LBState,
    sel_state: SelectorState,
    k: usize,
    depth: usize,
}

/// How many levels below the root a popped `Work` item is still eagerly
/// split into per-pair siblings instead of handed whole to the sequential
/// recursion. Bounded so wide trees don't explode the queue before any
/// worker gets a chance to drain it.
const MAX_SPLIT_DEPTH: usize = 3;

/// Mirrors `MT`'s `working` counter plus its `idlers` condition variable: a
/// worker decrements `working` while it looks for more work, and the last
/// one to find the queue empty marks the search done and wakes the rest.
struct Idle {
    working: Mutex<usize>,
    idlers: Condvar,
    done: Mutex<bool>,
}

impl Idle {
    fn new(threads: usize) -> Self {
        Idle {
            working: Mutex::new(threads),
            idlers: Condvar::new(),
            done: Mutex::new(false),
        }
    }

    fn is_done(&self) -> bool {
        *self.done.lock().unwrap()
    }

    fn mark_done(&self) {
        *self.done.lock().unwrap() = true;
        self.idlers.notify_all();
    }
}

pub struct WorkStealingDriver {
    sequential: SequentialDriver,
    threads: usize,
}

impl WorkStealingDriver {
    pub fn new(n: usize, config: &SolverConfig) -> Self {
        WorkStealingDriver {
            sequential: SequentialDriver::new(n, config),
            threads: config.threads.max(1),
        }
    }

    pub fn initial_lower_bound(&self, eg: &EditGraph) -> usize {
        self.sequential.initial_lower_bound(eg)
    }

    /// Same contract as [`SequentialDriver::solve`], parallelized over
    /// `self.threads` worker threads. `write` may be invoked from any
    /// worker thread but is serialized by an internal mutex, mirroring the
    /// source's `write_mutex`.
    pub fn solve(
        &self,
        eg: &mut EditGraph,
        k: usize,
        write: impl Fn(&BitMatrix, &BitMatrix) -> bool + Sync,
    ) -> bool {
        info!(threads = self.threads, k, "work-stealing solve starting");

        let n = eg.size();
        let finder = self.sequential.selector().finder();
        let policy = self.sequential.selector().policy();
        let mut stats = SubgraphStats::new(n, finder, policy);
        stats.initialize(&eg.g, &eg.e);

        let mut lb_state = self.sequential.lb_engine().initial_state();
        self.sequential
            .lb_engine()
            .initialize(&mut lb_state, k, &eg.g, &eg.e);

        let mut sel_state = self.sequential.selector().initial_state();
        self.sequential
            .selector()
            .initialize(&mut sel_state, &eg.g, &eg.e);

        let queue: Injector<Work> = Injector::new();
        queue.push(Work {
            eg: eg.clone(),
            stats,
            lb_state,
            sel_state,
            k,
            depth: 0,
        });

        let idle = Idle::new(self.threads);
        let found_solution = Mutex::new(false);
        let queue = &queue;
        let idle = &idle;
        let found_solution = &found_solution;
        let write = &write;

        crossbeam_utils::thread::scope(|scope| {
            for _ in 0..self.threads {
                scope.spawn(move |_| {
                    self.worker_loop(queue, idle, found_solution, write);
                });
            }
        })
        .expect("a work-stealing worker thread panicked");

        *found_solution.lock().unwrap()
    }

    fn worker_loop(
        &self,
        queue: &Injector<Work>,
        idle: &Idle,
        found_solution: &Mutex<bool>,
        write: &(impl Fn(&BitMatrix, &BitMatrix) -> bool + Sync),
    ) {
        loop {
            let Some(work) = self.next_work(queue, idle) else {
                return;
            };
            if idle.is_done() {
                return;
            }
            self.split_or_run(work, queue, idle, found_solution, write);
        }
    }

    fn next_work(&self, queue: &Injector<Work>, idle: &Idle) -> Option<Work> {
        loop {
            match queue.steal() {
                Steal::Success(work) => return Some(work),
                Steal::Retry => continue,
                Steal::Empty => {
                    let mut working = idle.working.lock().unwrap();
                    *working -= 1;
                    if *working == 0 {
                        drop(working);
                        idle.mark_done();
                        return None;
                    }
                    let (mut guard, timeout) = idle
                        .idlers
                        .wait_timeout(working, Duration::from_millis(20))
                        .unwrap();
                    if idle.is_done() {
                        return None;
                    }
                    if timeout.timed_out() {
                        warn!("work-stealing queue starved briefly");
                    }
                    *guard += 1;
                    idle.idlers.notify_all();
                }
            }
        }
    }

    /// Compute `work`'s `ProblemSet` once; if shallow enough and the queue
    /// isn't already saturated, fan its vertex pairs out as sibling `Work`
    /// items instead of recursing locally.
    fn split_or_run(
        &self,
        work: Work,
        queue: &Injector<Work>,
        idle: &Idle,
        found_solution: &Mutex<bool>,
        write: &(impl Fn(&BitMatrix, &BitMatrix) -> bool + Sync),
    ) {
        let Work {
            mut eg,
            mut stats,
            mut lb_state,
            mut sel_state,
            k,
            depth,
        } = work;

        let restriction = self.sequential.restriction();
        let lb_engine = self.sequential.lb_engine();
        let selector = self.sequential.selector();

        if k < lb_engine.result(&mut lb_state, k, &eg.g, &eg.e) {
            return;
        }

        let problem = selector.result(&mut sel_state, &stats, k, &eg.g, &eg.e);
        debug!(k, depth, pairs = problem.vertex_pairs.len(), "mt frame");

        if problem.found_solution {
            *found_solution.lock().unwrap() = true;
            if !write(&eg.g, &eg.e) {
                idle.mark_done();
            }
            return;
        }
        if k == 0 {
            return;
        }

        let should_split = depth < MAX_SPLIT_DEPTH
            && problem.vertex_pairs.len() > 1
            && queue.len() < self.threads * 4;

        if !should_split {
            let mut local_found = false;
            let mut write_guarded = |g: &BitMatrix, e: &BitMatrix| -> bool {
                *found_solution.lock().unwrap() = true;
                let keep_going = write(g, e);
                if !keep_going {
                    idle.mark_done();
                }
                keep_going
            };
            self.sequential.edit_rec(
                &mut eg,
                &mut stats,
                lb_state,
                sel_state,
                k,
                false,
                &mut local_found,
                &mut write_guarded,
            );
            return;
        }

        // `eg`/`stats`/`sel_state` accumulate marks across this loop exactly
        // as in `SequentialDriver::edit_rec`'s parent state; each sibling
        // clones *after* its own pair is marked, so it sees every earlier
        // sibling's mark too. `eg` and `stats` are local to this call and
        // dropped at the end, so there is nothing to unmark afterward.
        for vp in problem.vertex_pairs.iter() {
            let (u, v) = (vp.first, vp.second);
            debug_assert!(!eg.is_marked(u, v));

            let mut next_lb_state = lb_state.clone();
            let mut next_sel_state = sel_state.clone();

            lb_engine.before_mark_and_edit(&mut next_lb_state, &eg.g, &eg.e, u, v);

            if !matches!(restriction, Restriction::None) {
                eg.mark(u, v);
                selector.after_mark(&mut sel_state, &eg.g, &eg.e, u, v);
                stats.after_mark(&eg.g, &eg.e, u, v);
            }

            let mut branch_eg = eg.clone();
            let mut branch_stats = stats.clone();
            branch_stats.before_edit(&branch_eg.g, &branch_eg.e, u, v);
            branch_eg.toggle(u, v);
            lb_engine.after_mark_and_edit(&mut next_lb_state, &branch_eg.g, &branch_eg.e, u, v);
            selector.after_mark_and_edit(&mut next_sel_state, &branch_eg.g, &branch_eg.e, u, v);
            branch_stats.after_edit(&branch_eg.g, &branch_eg.e, u, v);

            queue.push(Work {
                eg: branch_eg,
                stats: branch_stats,
                lb_state: next_lb_state,
                sel_state: next_sel_state,
                k: k - 1,
                depth: depth + 1,
            });
        }
        idle.idlers.notify_all();

        if problem.needs_no_edit_branch {
            assert!(
                matches!(restriction, Restriction::Redundant),
                "no-edit branches require Restriction::Redundant"
            );
            queue.push(Work {
                eg,
                stats,
                lb_state,
                sel_state,
                k,
                depth: depth + 1,
            });
            idle.idlers.notify_all();
        }
    }
}
