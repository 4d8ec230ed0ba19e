//! A finder wrapper that reports each forbidden pair's edges at most once.
//!
//! [`super::center::Finder::find`] over-reports induced C_l: every one of
//! its ℓ edges independently qualifies as the "center edge" that seeds the
//! enumeration, so the same cycle is handed to the callback up to ℓ times
//! (a known, accepted limitation of center-based enumeration). Consumers
//! that only care
//! about each *edge of the graph* being considered once — rather than every
//! occurrence of every subgraph — can wrap the base finder in
//! `SparseFinder`, which remembers which pairs have already been "offered"
//! and skips any subgraph whose full edge set has already been covered.

use crate::bitmatrix::BitMatrix;
use crate::conflict::Policy;
use crate::finder::center::Finder;

pub struct SparseFinder {
    inner: Finder,
    policy: Policy,
    offered: BitMatrix,
}

impl SparseFinder {
    pub fn new(inner: Finder, policy: Policy, n: usize) -> Self {
        SparseFinder {
            inner,
            policy,
            offered: BitMatrix::new(n),
        }
    }

    pub fn reset(&mut self) {
        self.offered = BitMatrix::new(self.offered.size());
    }

    /// Enumerate subgraphs of `g`, skipping any whose entire structural edge
    /// set (under `policy`) has already been offered, and marking the edges
    /// of every subgraph that *is* reported.
    pub fn find(&mut self, g: &BitMatrix, e: &BitMatrix, mut cb: impl FnMut(&[usize]) -> bool) -> bool {
        let policy = self.policy;
        let offered = &mut self.offered;
        self.inner.find(g, |seq| {
            let already_covered = !policy.for_all_edges_unordered(g, e, seq, |a, b| {
                !offered.has_edge(a, b)
            });
            if already_covered {
                return false;
            }
            policy.for_all_edges_unordered(g, e, seq, |a, b| {
                offered.set_edge(a, b);
                false
            });
            cb(seq)
        })
    }
}
