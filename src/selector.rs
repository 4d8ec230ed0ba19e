//! Branching selectors: given the current graph, pick the set of vertex
//! pairs the driver should try editing next.
//!
//! Ported from `original_source`'s `Consumer/S_First.hpp`,
//! `Consumer/S_Least_Unedited.hpp` and `Consumer/S_Most.hpp`. `First` and
//! `LeastUnedited` are stateless: every call re-scans the graph with
//! [`Finder::find`]. `Most` (and its `MostPruned`/`SingleMost` variants,
//! all three instances of the same underlying algorithm with different
//! `use_single`/`pruned` booleans, the same shape as `Most_Impl`'s template
//! parameters — though which variant gets `use_single` follows this crate's
//! own selector contract rather than the original's instantiation) keep an
//! incremental [`MostState`] updated via `after_mark`/`after_mark_and_edit`
//! so `result` only has to look at the pairs touched by the most recent
//! edit, not rescan the whole graph.

use crate::bitmatrix::BitMatrix;
use crate::conflict::Policy;
use crate::config::SelKind;
use crate::finder::center::Finder;
use crate::stats::SubgraphStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexPair {
    pub first: usize,
    pub second: usize,
    /// Whether `Restriction::Redundant`'s driver loop should re-check the
    /// lower bound before descending into this pair.
    pub update_lb: bool,
}

impl VertexPair {
    pub fn new(first: usize, second: usize) -> Self {
        VertexPair {
            first,
            second,
            update_lb: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProblemSet {
    pub vertex_pairs: Vec<VertexPair>,
    pub needs_no_edit_branch: bool,
    pub found_solution: bool,
}

impl ProblemSet {
    pub fn empty(&self) -> bool {
        self.vertex_pairs.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MostState {
    num_single_left: i64,
    one_left_subgraphs: Vec<Vec<usize>>,
    impossible_to_solve: bool,
}

#[derive(Debug, Clone)]
pub enum SelectorState {
    Stateless,
    Most(MostState),
}

pub struct Selector {
    kind: SelKind,
    finder: Finder,
    policy: Policy,
    use_single: bool,
    pruned: bool,
}

impl Selector {
    pub fn new(kind: SelKind, finder: Finder, policy: Policy) -> Self {
        // `Most` is the only variant that can collapse to a single pair plus a
        // no-edit branch; `MostPruned`/`SingleMost` only add the `pruned`
        // (update_lb_before) flag on top of the plain multi-pair branching.
        let (use_single, pruned) = match kind {
            SelKind::Most => (true, false),
            SelKind::MostPruned => (false, true),
            SelKind::SingleMost => (false, true),
            SelKind::First | SelKind::LeastUnedited => (false, false),
        };
        Selector {
            kind,
            finder,
            policy,
            use_single,
            pruned,
        }
    }

    pub fn finder(&self) -> Finder {
        self.finder
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    fn is_most_family(&self) -> bool {
        matches!(self.kind, SelKind::Most | SelKind::MostPruned | SelKind::SingleMost)
    }

    pub fn initial_state(&self) -> SelectorState {
        if self.is_most_family() {
            SelectorState::Most(MostState::default())
        } else {
            SelectorState::Stateless
        }
    }

    /// Scan the whole graph once to seed `Most`'s incremental state. No-op
    /// for the stateless selectors.
    pub fn initialize(&self, state: &mut SelectorState, g: &BitMatrix, e: &BitMatrix) {
        let ms = match state {
            SelectorState::Most(ms) => ms,
            SelectorState::Stateless => return,
        };
        *ms = MostState {
            num_single_left: self.finder.length() as i64,
            ..MostState::default()
        };
        if e.count_edges() > 0 {
            let policy = self.policy;
            let mut stop = false;
            self.finder.find(g, |path| {
                if stop {
                    return true;
                }
                let free = policy.count_eligible(g, e, path);
                if free == 1 {
                    ms.one_left_subgraphs.push(path.to_vec());
                } else if free == 0 {
                    ms.impossible_to_solve = true;
                    stop = true;
                }
                stop
            });
        }
    }

    pub fn after_mark(&self, state: &mut SelectorState, g: &BitMatrix, e: &BitMatrix, u: usize, v: usize) {
        let ms = match state {
            SelectorState::Most(ms) => ms,
            SelectorState::Stateless => return,
        };
        let policy = self.policy;
        self.finder.find_near(g, u, v, |path| {
            let free = policy.count_eligible(g, e, path);
            if free == 1 {
                ms.one_left_subgraphs.push(path.to_vec());
            } else if free == 0 {
                ms.impossible_to_solve = true;
            }
            false
        });
        ms.num_single_left -= 1;
    }

    pub fn after_mark_and_edit(&self, state: &mut SelectorState, g: &BitMatrix, e: &BitMatrix, u: usize, v: usize) {
        let ms = match state {
            SelectorState::Most(ms) => ms,
            SelectorState::Stateless => return,
        };
        let policy = self.policy;
        self.finder.find_near(g, u, v, |path| {
            let free = policy.count_eligible(g, e, path);
            if free == 1 {
                ms.one_left_subgraphs.push(path.to_vec());
            } else if free == 0 {
                ms.impossible_to_solve = true;
            }
            false
        });
        ms.num_single_left = self.finder.length() as i64;
    }

    pub fn result(
        &self,
        state: &mut SelectorState,
        stats: &SubgraphStats,
        k: usize,
        g: &BitMatrix,
        e: &BitMatrix,
    ) -> ProblemSet {
        match self.kind {
            SelKind::First => self.result_first(g, e),
            SelKind::LeastUnedited => self.result_least(g, e),
            SelKind::Most | SelKind::MostPruned | SelKind::SingleMost => self.result_most(state, stats, k, g, e),
        }
    }

    fn result_first(&self, g: &BitMatrix, e: &BitMatrix) -> ProblemSet {
        let mut problem = ProblemSet {
            found_solution: true,
            ..ProblemSet::default()
        };
        let policy = self.policy;
        self.finder.find(g, |path| {
            problem.found_solution = false;
            policy.for_all_edges_ordered(g, e, path, |a, b| {
                problem.vertex_pairs.push(VertexPair::new(a, b));
                false
            });
            true
        });
        problem
    }

    fn result_least(&self, g: &BitMatrix, e: &BitMatrix) -> ProblemSet {
        let mut problem = ProblemSet {
            found_solution: true,
            ..ProblemSet::default()
        };
        let policy = self.policy;
        self.finder.find(g, |path| {
            let free = policy.count_eligible(g, e, path);
            if free < problem.vertex_pairs.len() || problem.found_solution {
                problem.vertex_pairs.clear();
                problem.found_solution = false;
                policy.for_all_edges_ordered(g, e, path, |a, b| {
                    problem.vertex_pairs.push(VertexPair::new(a, b));
                    false
                });
                if free == 0 {
                    return true;
                }
            }
            false
        });
        problem
    }

    fn result_most(
        &self,
        state: &mut SelectorState,
        stats: &SubgraphStats,
        k: usize,
        g: &BitMatrix,
        e: &BitMatrix,
    ) -> ProblemSet {
        let ms = match state {
            SelectorState::Most(ms) => ms,
            SelectorState::Stateless => unreachable!("Most-family selector without MostState"),
        };
        let mut problem = ProblemSet {
            found_solution: stats.num_subgraphs == 0,
            ..ProblemSet::default()
        };
        if problem.found_solution || k == 0 || ms.impossible_to_solve {
            return problem;
        }

        while let Some(sg) = ms.one_left_subgraphs.pop() {
            if self.finder.is_subgraph_valid(g, &sg) {
                self.policy.for_all_edges_ordered(g, e, &sg, |a, b| {
                    problem.vertex_pairs.push(VertexPair::new(a, b));
                    false
                });
                debug_assert_eq!(problem.vertex_pairs.len(), 1);
                return problem;
            }
        }

        let n = stats.size();
        let mut max_subgraphs = 0usize;
        let mut node_pairs: Vec<(usize, usize)> = Vec::new();
        for u in 0..n {
            for v in (u + 1)..n {
                let num_fbs = stats.at(u, v);
                if num_fbs > max_subgraphs {
                    max_subgraphs = num_fbs;
                    node_pairs.clear();
                }
                if num_fbs == max_subgraphs && (num_fbs > 1 || node_pairs.is_empty()) {
                    node_pairs.push((u, v));
                }
            }
        }

        let mut best_pairs: Vec<(usize, usize, usize)> = Vec::new();
        for &(pu, pv) in &node_pairs {
            self.finder.find_near(g, pu, pv, |fs| {
                let mut current_pairs: Vec<(usize, usize, usize)> = Vec::new();
                self.policy.for_all_edges_unordered(g, e, fs, |a, b| {
                    current_pairs.push((a, b, stats.at(a, b)));
                    false
                });
                debug_assert!(current_pairs.len() > 1);
                current_pairs.sort_by(|x, y| y.2.cmp(&x.2));

                if best_pairs.is_empty() {
                    best_pairs = current_pairs.clone();
                } else {
                    let mut bi = 0;
                    let mut ci = 0;
                    while bi + 1 < best_pairs.len()
                        && ci + 1 < current_pairs.len()
                        && best_pairs[bi].2 == current_pairs[ci].2
                    {
                        bi += 1;
                        ci += 1;
                    }
                    if ci + 1 == current_pairs.len()
                        || (bi + 1 != best_pairs.len() && best_pairs[bi].2 < current_pairs[ci].2)
                    {
                        best_pairs = current_pairs.clone();
                    }
                }
                false
            });
        }

        if !self.use_single || ms.num_single_left <= 0 || max_subgraphs == 1 || best_pairs.len() == 2 {
            for i in 0..best_pairs.len() {
                let (a, b, _) = best_pairs[i];
                let update_lb = self.pruned && i > 0 && i + 1 < best_pairs.len() && best_pairs[i - 1].2 > 1;
                problem.vertex_pairs.push(VertexPair {
                    first: a,
                    second: b,
                    update_lb,
                });
            }
        } else if let Some(&(a, b)) = node_pairs.first() {
            problem.vertex_pairs.push(VertexPair::new(a, b));
            problem.needs_no_edit_branch = true;
        }

        problem
    }
}
