//! The packing lower bound as a cloneable, incrementally-maintained state.
//!
//! Ported from `Consumer/LB_ARW.hpp`. `LBState` bundles everything the
//! original splits between "cheap consumer fields" and "cloned per-branch
//! state" into one `Clone` value: the driver clones it across sibling
//! branches exactly where the original clones its `State_Tuple_type`, so
//! backtracking falls out of ordinary Rust ownership instead of a separate
//! set of `before_undo_*`/`after_undo_*` hooks.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::bitmatrix::BitMatrix;
use crate::conflict::Policy;
use crate::finder::center::Finder;
use crate::lb::packing::LowerBoundPacking;

#[derive(Clone)]
pub struct LBState {
    packing: LowerBoundPacking,
    count: Vec<usize>,
    num_subgraphs: usize,
    sum_subgraphs_per_edge: usize,
    bound_calculated: bool,
}

impl LBState {
    pub fn new(n: usize) -> Self {
        LBState {
            packing: LowerBoundPacking::new(n),
            count: vec![0; n * n],
            num_subgraphs: 0,
            sum_subgraphs_per_edge: 0,
            bound_calculated: false,
        }
    }

    pub fn size(&self) -> usize {
        self.packing.size()
    }

    pub fn packing(&self) -> &LowerBoundPacking {
        &self.packing
    }
}

pub struct LBEngine {
    n: usize,
    finder: Finder,
    policy: Policy,
    local_search: bool,
}

impl LBEngine {
    pub fn new(n: usize, finder: Finder, policy: Policy, local_search: bool) -> Self {
        LBEngine {
            n,
            finder,
            policy,
            local_search,
        }
    }

    pub fn initial_state(&self) -> LBState {
        LBState::new(self.n)
    }

    #[inline]
    fn bump(&self, state: &mut LBState, a: usize, b: usize, delta: isize) {
        let n = self.n;
        if delta > 0 {
            state.count[a * n + b] += 1;
            state.count[b * n + a] += 1;
            state.sum_subgraphs_per_edge += 1;
        } else {
            state.count[a * n + b] -= 1;
            state.count[b * n + a] -= 1;
            state.sum_subgraphs_per_edge -= 1;
        }
    }

    /// Rebuild the packing from scratch by scanning every forbidden
    /// subgraph in the graph. Called once, before any edits.
    pub fn initialize(&self, state: &mut LBState, k: usize, g: &BitMatrix, e: &BitMatrix) {
        *state = self.initial_state();
        let policy = self.policy;
        let mut pending = Vec::new();
        self.finder.find(g, |path| {
            pending.push(path.to_vec());
            false
        });
        for path in &pending {
            let mut touches_bound = false;
            policy.for_all_edges_unordered(g, e, path, |a, b| {
                self.bump(state, a, b, 1);
                if state.packing.uses().has_edge(a, b) {
                    touches_bound = true;
                }
                false
            });
            state.num_subgraphs += 1;
            if !touches_bound {
                state.packing.add(g, e, &policy, path);
            }
            if state.packing.size() > k {
                break;
            }
        }
        state.bound_calculated = state.packing.size() > k;
    }

    /// Called on the way down, right before marking/editing `(u, v)`:
    /// drop every subgraph the edit is about to destroy from the running
    /// counts, and evict any packing member that uses `(u, v)`.
    pub fn before_mark_and_edit(&self, state: &mut LBState, g: &BitMatrix, e: &BitMatrix, u: usize, v: usize) {
        let policy = self.policy;
        let mut pending = Vec::new();
        self.finder.find_near(g, u, v, |path| {
            pending.push(path.to_vec());
            false
        });
        for path in &pending {
            policy.for_all_edges_unordered(g, e, path, |a, b| {
                self.bump(state, a, b, -1);
                false
            });
            state.num_subgraphs -= 1;
        }

        let mut keep = Vec::with_capacity(state.packing.subgraphs().len());
        let mut evicted = Vec::new();
        for sg in state.packing.subgraphs() {
            let has_uv = policy.for_all_edges_unordered(g, e, sg, |a, b| {
                (a == u && b == v) || (a == v && b == u)
            });
            if has_uv {
                evicted.push(sg.clone());
            } else {
                keep.push(sg.clone());
            }
        }
        if !evicted.is_empty() {
            let n = self.n;
            state.packing = LowerBoundPacking::new(n);
            for sg in keep {
                state.packing.add(g, e, &policy, &sg);
            }
        }
    }

    /// Called on the way down, right after marking/editing `(u, v)`: add
    /// back whatever forbidden subgraphs the edit just created, greedily
    /// extending the packing with any that don't overlap it.
    pub fn after_mark_and_edit(&self, state: &mut LBState, g: &BitMatrix, e: &BitMatrix, u: usize, v: usize) {
        let policy = self.policy;
        let mut pending = Vec::new();
        self.finder.find_near(g, u, v, |path| {
            pending.push(path.to_vec());
            false
        });
        for path in &pending {
            let mut touches_bound = false;
            policy.for_all_edges_unordered(g, e, path, |a, b| {
                self.bump(state, a, b, 1);
                if state.packing.uses().has_edge(a, b) {
                    touches_bound = true;
                }
                false
            });
            state.num_subgraphs += 1;
            if !touches_bound {
                state.packing.add(g, e, &policy, path);
            }
        }
        state.bound_calculated = false;
    }

    /// The lower bound itself: the packing size, after running the
    /// 2-improvement local search (if enabled) when the packing alone
    /// doesn't already exceed `k`.
    pub fn result(&self, state: &mut LBState, k: usize, g: &BitMatrix, e: &BitMatrix) -> usize {
        if !state.bound_calculated {
            state.bound_calculated = true;
            if self.local_search && state.packing.size() <= k {
                self.find_lb_2_improvements(state, k, g, e);
            }
        }
        state.packing.size()
    }

    /// Try to trade each packed subgraph for two disjoint replacements
    /// (strictly growing the packing), or failing that, a replacement with
    /// fewer remaining live neighbors (unchanged size, but more room for a
    /// later improvement). Mirrors `LB_ARW::find_lb_2_improvements`, with
    /// the snapshot-based undo machinery dropped in favor of owning
    /// `LBState` outright.
    fn find_lb_2_improvements(&self, state: &mut LBState, k: usize, g: &BitMatrix, e: &BitMatrix) {
        let policy = self.policy;
        let n = self.n;
        let seed = crate::rng::seed_from_packing(state.num_subgraphs, state.sum_subgraphs_per_edge as u64);
        let mut rng = crate::rng::rng_from_seed(seed);

        let mut rounds_no_improvement = 0usize;
        loop {
            let mut improvement_found = false;
            let mut bound_changed = false;

            let mut bound: Vec<Vec<usize>> = state.packing.subgraphs().to_vec();
            bound.shuffle(&mut rng);
            let mut uses = state.packing.uses().clone();

            let mut fsi = 0;
            while fsi < bound.len() {
                let fs = bound[fsi].clone();

                let mut pairs = Vec::new();
                let mut num_neighbors = 0usize;
                let mut num_pairs = 0usize;
                policy.for_all_edges_unordered(g, e, &fs, |a, b| {
                    let nn = state.count[a * n + b];
                    num_neighbors += nn;
                    pairs.push((a, b));
                    if nn > 1 {
                        num_pairs += 1;
                    }
                    false
                });

                if num_pairs > 1 {
                    for &(a, b) in &pairs {
                        uses.clear_edge(a, b);
                    }

                    let mut candidates_per_pair: Vec<Vec<Vec<usize>>> = vec![Vec::new(); pairs.len()];
                    for (pi, &(a, b)) in pairs.iter().enumerate() {
                        let mut cands = Vec::new();
                        self.finder.find_near_restricted(g, a, b, Some(&uses), |sg| {
                            cands.push(sg.to_vec());
                            false
                        });
                        candidates_per_pair[pi] = cands;
                        uses.set_edge(a, b);
                    }
                    for &(a, b) in &pairs {
                        uses.clear_edge(a, b);
                    }

                    let random_switch = rng.gen::<f64>() < 0.3;
                    let mut min_candidate_neighbors = num_neighbors;
                    let mut num_candidates_considered = 0usize;
                    let mut min_candidate = fs.clone();
                    let mut min_pairs = num_pairs;
                    let mut found_partner = false;

                    'pairs: for cands in &candidates_per_pair {
                        for cand_fs in cands.clone() {
                            let mut cand_pairs = 0usize;
                            let mut cand_neighbors = 0usize;
                            policy.for_all_edges_unordered(g, e, &cand_fs, |cu, cv| {
                                uses.set_edge(cu, cv);
                                let cn = state.count[cu * n + cv];
                                cand_neighbors += cn;
                                if cn > 1 {
                                    cand_pairs += 1;
                                }
                                false
                            });
                            num_candidates_considered += 1;

                            if cand_pairs == 1
                                || (min_pairs > 1
                                    && ((!random_switch && cand_neighbors < min_candidate_neighbors)
                                        || (random_switch
                                            && rng.gen::<f64>() < 1.0 / (num_candidates_considered as f64))))
                            {
                                min_pairs = cand_pairs;
                                min_candidate = cand_fs.clone();
                                min_candidate_neighbors = cand_neighbors;
                            }

                            for (ppi, &(pa, pb)) in pairs.iter().enumerate() {
                                if uses.has_edge(pa, pb) {
                                    continue;
                                }
                                for partner_fs in candidates_per_pair[ppi].clone() {
                                    let touches = policy.for_all_edges_unordered(g, e, &partner_fs, |x, y| {
                                        uses.has_edge(x, y)
                                    });
                                    if !touches {
                                        found_partner = true;
                                        improvement_found = true;
                                        policy.for_all_edges_unordered(g, e, &partner_fs, |x, y| {
                                            uses.set_edge(x, y);
                                            false
                                        });
                                        bound.push(partner_fs);
                                    }
                                }
                            }

                            if found_partner {
                                bound[fsi] = cand_fs;
                                break 'pairs;
                            } else {
                                policy.for_all_edges_unordered(g, e, &cand_fs, |cu, cv| {
                                    uses.clear_edge(cu, cv);
                                    false
                                });
                            }
                        }
                    }

                    if !found_partner {
                        if min_candidate != fs {
                            policy.for_all_edges_unordered(g, e, &min_candidate, |cu, cv| {
                                uses.set_edge(cu, cv);
                                false
                            });
                            bound[fsi] = min_candidate;
                            bound_changed = true;
                        } else {
                            for &(a, b) in &pairs {
                                uses.set_edge(a, b);
                            }
                        }
                    } else if k > 0 && k < bound.len() {
                        state.packing = rebuild_packing(n, g, e, &policy, &bound);
                        return;
                    }
                }
                fsi += 1;
            }

            state.packing = rebuild_packing(n, g, e, &policy, &bound);

            if improvement_found {
                rounds_no_improvement = 0;
            } else {
                rounds_no_improvement += 1;
            }
            if !(improvement_found || (rounds_no_improvement < 5 && bound_changed)) {
                break;
            }
        }
    }
}

fn rebuild_packing(n: usize, g: &BitMatrix, e: &BitMatrix, policy: &Policy, bound: &[Vec<usize>]) -> LowerBoundPacking {
    let mut packing = LowerBoundPacking::new(n);
    for sg in bound {
        packing.add(g, e, policy, sg);
    }
    packing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Conversion, Mode, Restriction};

    fn two_disjoint_p4s() -> BitMatrix {
        let mut g = BitMatrix::new(8);
        for i in 0..3 {
            g.set_edge(i, i + 1);
        }
        for i in 4..7 {
            g.set_edge(i, i + 1);
        }
        g
    }

    #[test]
    fn initialize_packs_disjoint_subgraphs() {
        let g = two_disjoint_p4s();
        let e = BitMatrix::new(8);
        let finder = Finder::new(4, true);
        let policy = Policy::new(Mode::Edit, Restriction::Redundant, Conversion::Normal);
        let engine = LBEngine::new(8, finder, policy, false);
        let mut state = engine.initial_state();
        engine.initialize(&mut state, 10, &g, &e);
        assert_eq!(state.size(), 2);
    }

    #[test]
    fn before_and_after_mark_and_edit_keep_packing_consistent() {
        let mut g = two_disjoint_p4s();
        let e = BitMatrix::new(8);
        let finder = Finder::new(4, true);
        let policy = Policy::new(Mode::Edit, Restriction::Redundant, Conversion::Normal);
        let engine = LBEngine::new(8, finder, policy, false);
        let mut state = engine.initial_state();
        engine.initialize(&mut state, 10, &g, &e);

        engine.before_mark_and_edit(&mut state, &g, &e, 1, 2);
        g.toggle_edge(1, 2);
        engine.after_mark_and_edit(&mut state, &g, &e, 1, 2);

        // Breaking one P4 should not disturb the other disjoint packed member.
        assert!(state.size() <= 2);
    }

    #[test]
    fn result_with_local_search_does_not_panic() {
        let g = two_disjoint_p4s();
        let e = BitMatrix::new(8);
        let finder = Finder::new(4, true);
        let policy = Policy::new(Mode::Edit, Restriction::Redundant, Conversion::Normal);
        let engine = LBEngine::new(8, finder, policy, true);
        let mut state = engine.initial_state();
        engine.initialize(&mut state, 10, &g, &e);
        let bound = engine.result(&mut state, 10, &g, &e);
        assert!(bound >= 2);
    }
}
