//! The graph pair G (edges) and E (edit mask) the search driver operates on.

use crate::bitmatrix::BitMatrix;

/// G and E together: both are `n x n` symmetric bitmatrices of the same
/// shape. `EditGraph` only bundles them and
/// offers the toggle/mark helpers the driver composes into its
/// before_edit/after_edit/before_mark/after_mark protocol; it does not itself
/// enforce that protocol (that discipline lives in
/// [`crate::stats::SubgraphStats`] and [`crate::driver`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditGraph {
    pub g: BitMatrix,
    pub e: BitMatrix,
}

impl EditGraph {
    pub fn new(n: usize) -> Self {
        EditGraph {
            g: BitMatrix::new(n),
            e: BitMatrix::new(n),
        }
    }

    pub fn from_edges(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut g = BitMatrix::new(n);
        for (u, v) in edges {
            g.set_edge(u, v);
        }
        EditGraph {
            g,
            e: BitMatrix::new(n),
        }
    }

    pub fn size(&self) -> usize {
        self.g.size()
    }

    pub fn is_marked(&self, u: usize, v: usize) -> bool {
        self.e.has_edge(u, v)
    }

    pub fn mark(&mut self, u: usize, v: usize) {
        debug_assert!(
            !self.e.has_edge(u, v),
            "marking an already-marked pair ({u}, {v})"
        );
        self.e.set_edge(u, v);
    }

    pub fn unmark(&mut self, u: usize, v: usize) {
        debug_assert!(
            self.e.has_edge(u, v),
            "unmarking a pair that was never marked ({u}, {v})"
        );
        self.e.clear_edge(u, v);
    }

    pub fn toggle(&mut self, u: usize, v: usize) {
        self.g.toggle_edge(u, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_then_unmark_round_trips() {
        let mut eg = EditGraph::new(5);
        eg.mark(1, 2);
        assert!(eg.is_marked(1, 2));
        eg.unmark(1, 2);
        assert!(!eg.is_marked(1, 2));
    }

    #[test]
    fn from_edges_builds_symmetric_graph() {
        let eg = EditGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        assert!(eg.g.has_edge(0, 1));
        assert!(eg.g.has_edge(1, 0));
        assert_eq!(eg.g.count_edges(), 3);
    }
}
