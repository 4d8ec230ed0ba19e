//! Incremental per-edge forbidden-subgraph counts.
//!
//! Ported from `original_source`'s `Finder/SubgraphStats.hpp`. Keeping an
//! exact count, per vertex pair, of how many forbidden subgraphs currently
//! use that pair as a structural edge lets the selector and lower bound
//! answer "is this pair still relevant" in O(1) instead of re-running the
//! finder. The count is kept in sync incrementally: every edit or mark goes
//! through `before_edit`/`after_edit`/`after_mark`/`after_unmark`, each of
//! which only re-scans the *local* neighborhood of the touched pair via
//! [`Finder::find_near`].

use crate::bitmatrix::BitMatrix;
use crate::conflict::Policy;
use crate::finder::center::Finder;

#[derive(Clone)]
pub struct SubgraphStats {
    n: usize,
    count: Vec<usize>,
    pub num_subgraphs: usize,
    pub sum_subgraphs_per_edge: usize,
    before_mark_count: Vec<usize>,
    finder: Finder,
    policy: Policy,
}

impl SubgraphStats {
    pub fn new(n: usize, finder: Finder, policy: Policy) -> Self {
        SubgraphStats {
            n,
            count: vec![0; n * n],
            num_subgraphs: 0,
            sum_subgraphs_per_edge: 0,
            before_mark_count: Vec::new(),
            finder,
            policy,
        }
    }

    #[inline]
    fn idx(&self, u: usize, v: usize) -> usize {
        u * self.n + v
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn at(&self, u: usize, v: usize) -> usize {
        self.count[self.idx(u, v)]
    }

    /// Recompute from scratch. Call once before the first edit.
    pub fn initialize(&mut self, g: &BitMatrix, e: &BitMatrix) {
        if self.n == 0 {
            return;
        }
        if self.num_subgraphs > 0 {
            self.count.iter_mut().for_each(|c| *c = 0);
            self.sum_subgraphs_per_edge = 0;
            self.num_subgraphs = 0;
        }
        let mut pending = Vec::new();
        self.finder.find(g, |path| {
            pending.push(path.to_vec());
            false
        });
        for path in pending {
            self.register_subgraph(g, e, &path);
        }
    }

    /// Call immediately before toggling the edge `(u, v)` in `g`.
    pub fn before_edit(&mut self, g: &BitMatrix, e: &BitMatrix, u: usize, v: usize) {
        if self.n == 0 {
            return;
        }
        self.verify(g, e);
        let mut pending = Vec::new();
        self.finder.find_near(g, u, v, |path| {
            pending.push(path.to_vec());
            false
        });
        for path in pending {
            self.remove_subgraph(g, e, &path);
        }
        debug_assert_eq!(self.at(u, v), 0);
    }

    /// Call immediately after toggling the edge `(u, v)` in `g`.
    pub fn after_edit(&mut self, g: &BitMatrix, e: &BitMatrix, u: usize, v: usize) {
        if self.n == 0 {
            return;
        }
        let mut pending = Vec::new();
        self.finder.find_near(g, u, v, |path| {
            pending.push(path.to_vec());
            false
        });
        for path in pending {
            self.register_subgraph(g, e, &path);
        }
        self.verify(g, e);
        debug_assert_eq!(self.at(u, v), 0);
    }

    /// Call immediately after marking `(u, v)` in `e`. Hides the pair's
    /// count so the selector no longer considers it, while saving the
    /// value for `after_unmark` to restore.
    pub fn after_mark(&mut self, g: &BitMatrix, e: &BitMatrix, u: usize, v: usize) {
        if self.n == 0 {
            return;
        }
        let idx = self.idx(u, v);
        self.sum_subgraphs_per_edge -= self.count[idx];
        self.before_mark_count.push(self.count[idx]);
        self.count[idx] = 0;
        self.verify(g, e);
    }

    /// Call immediately after unmarking `(u, v)` in `e`, undoing the most
    /// recent `after_mark` on this pair (`before_mark_count` is a stack: LIFO
    /// matching the driver's nested mark/unmark discipline).
    pub fn after_unmark(&mut self, g: &BitMatrix, e: &BitMatrix, u: usize, v: usize) {
        if self.n == 0 {
            return;
        }
        let restored = self
            .before_mark_count
            .pop()
            .expect("after_unmark without a matching after_mark");
        let idx = self.idx(u, v);
        self.count[idx] = restored;
        self.sum_subgraphs_per_edge += restored;
        self.verify(g, e);
    }

    fn register_subgraph(&mut self, g: &BitMatrix, e: &BitMatrix, path: &[usize]) {
        self.num_subgraphs += 1;
        let n = self.n;
        let count = &mut self.count;
        let sum = &mut self.sum_subgraphs_per_edge;
        self.policy.for_all_edges_unordered(g, e, path, |a, b| {
            count[a * n + b] += 1;
            count[b * n + a] += 1;
            *sum += 1;
            false
        });
    }

    fn remove_subgraph(&mut self, g: &BitMatrix, e: &BitMatrix, path: &[usize]) {
        self.num_subgraphs -= 1;
        let n = self.n;
        let count = &mut self.count;
        let sum = &mut self.sum_subgraphs_per_edge;
        self.policy.for_all_edges_unordered(g, e, path, |a, b| {
            count[a * n + b] -= 1;
            count[b * n + a] -= 1;
            *sum -= 1;
            false
        });
    }

    #[cfg(debug_assertions)]
    fn verify(&self, g: &BitMatrix, e: &BitMatrix) {
        let mut debug_count = vec![0usize; self.n * self.n];
        self.finder.find(g, |path| {
            self.policy.for_all_edges_unordered(g, e, path, |a, b| {
                debug_count[a * self.n + b] += 1;
                debug_count[b * self.n + a] += 1;
                false
            });
            false
        });
        for u in 0..self.n {
            for v in 0..self.n {
                if u == v {
                    continue;
                }
                debug_assert_eq!(
                    self.count[self.idx(u, v)],
                    debug_count[u * self.n + v],
                    "subgraph count desynced at ({u}, {v})"
                );
                debug_assert!(!e.has_edge(u, v) || self.count[self.idx(u, v)] == 0);
            }
        }
    }

    #[cfg(not(debug_assertions))]
    fn verify(&self, _g: &BitMatrix, _e: &BitMatrix) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Conversion, Mode, Restriction};

    fn policy() -> Policy {
        Policy::new(Mode::Edit, Restriction::Redundant, Conversion::Normal)
    }

    #[test]
    fn initialize_matches_direct_count() {
        let mut g = BitMatrix::new(4);
        g.set_edge(0, 1);
        g.set_edge(1, 2);
        g.set_edge(2, 3);
        let e = BitMatrix::new(4);
        let mut stats = SubgraphStats::new(4, Finder::new(4, true), policy());
        stats.initialize(&g, &e);
        assert_eq!(stats.num_subgraphs, 1);
        assert_eq!(stats.at(0, 3), 1);
        assert_eq!(stats.at(0, 1), 1);
    }

    #[test]
    fn edit_updates_counts_incrementally() {
        let mut g = BitMatrix::new(4);
        g.set_edge(0, 1);
        g.set_edge(1, 2);
        g.set_edge(2, 3);
        let e = BitMatrix::new(4);
        let mut stats = SubgraphStats::new(4, Finder::new(4, true), policy());
        stats.initialize(&g, &e);

        stats.before_edit(&g, &e, 1, 2);
        g.toggle_edge(1, 2);
        stats.after_edit(&g, &e, 1, 2);

        assert_eq!(stats.num_subgraphs, 0);
        assert_eq!(stats.at(0, 3), 0);
    }

    #[test]
    fn mark_then_unmark_restores_counts() {
        let mut g = BitMatrix::new(4);
        g.set_edge(0, 1);
        g.set_edge(1, 2);
        g.set_edge(2, 3);
        let mut e = BitMatrix::new(4);
        let mut stats = SubgraphStats::new(4, Finder::new(4, true), policy());
        stats.initialize(&g, &e);

        let before = stats.at(0, 3);
        e.set_edge(0, 3);
        stats.after_mark(&g, &e, 0, 3);
        assert_eq!(stats.at(0, 3), 0);

        e.clear_edge(0, 3);
        stats.after_unmark(&g, &e, 0, 3);
        assert_eq!(stats.at(0, 3), before);
    }
}
