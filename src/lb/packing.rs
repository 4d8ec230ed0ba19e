//! The packing itself: a set of forbidden subgraphs no two of which share an
//! editable pair, plus the `uses` matrix that makes "does this candidate
//! overlap the packing" an O(1) check per pair instead of an O(packing size)
//! scan.

use crate::bitmatrix::BitMatrix;
use crate::conflict::Policy;

#[derive(Clone)]
pub struct LowerBoundPacking {
    subgraphs: Vec<Vec<usize>>,
    uses: BitMatrix,
}

impl LowerBoundPacking {
    pub fn new(n: usize) -> Self {
        LowerBoundPacking {
            subgraphs: Vec::new(),
            uses: BitMatrix::new(n),
        }
    }

    pub fn clear(&mut self) {
        let n = self.uses.size();
        self.subgraphs.clear();
        self.uses = BitMatrix::new(n);
    }

    pub fn size(&self) -> usize {
        self.subgraphs.len()
    }

    pub fn subgraphs(&self) -> &[Vec<usize>] {
        &self.subgraphs
    }

    pub fn uses(&self) -> &BitMatrix {
        &self.uses
    }

    /// Add `path` to the packing unconditionally and mark its eligible
    /// pairs as used. Callers must already have verified disjointness
    /// (typically via [`Self::overlaps`]).
    pub fn add(&mut self, g: &BitMatrix, e: &BitMatrix, policy: &Policy, path: &[usize]) {
        policy.for_all_edges_unordered(g, e, path, |a, b| {
            self.uses.set_edge(a, b);
            false
        });
        self.subgraphs.push(path.to_vec());
    }

    /// True if any eligible pair of `path` is already used by the packing.
    pub fn overlaps(&self, g: &BitMatrix, e: &BitMatrix, policy: &Policy, path: &[usize]) -> bool {
        policy.for_all_edges_unordered(g, e, path, |a, b| self.uses.has_edge(a, b))
    }

    #[cfg(debug_assertions)]
    pub fn assert_valid(&self, g: &BitMatrix, e: &BitMatrix, policy: &Policy) {
        let mut recomputed = BitMatrix::new(self.uses.size());
        for sg in &self.subgraphs {
            policy.for_all_edges_unordered(g, e, sg, |a, b| {
                debug_assert!(
                    !recomputed.has_edge(a, b),
                    "packing members overlap at ({a}, {b})"
                );
                recomputed.set_edge(a, b);
                false
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Conversion, Mode, Restriction};

    #[test]
    fn add_then_overlaps() {
        let g = BitMatrix::new(5);
        let e = BitMatrix::new(5);
        let policy = Policy::new(Mode::Edit, Restriction::Redundant, Conversion::Normal);
        let mut packing = LowerBoundPacking::new(5);
        let path = [0usize, 1, 2, 3];
        assert!(!packing.overlaps(&g, &e, &policy, &path));
        packing.add(&g, &e, &policy, &path);
        assert_eq!(packing.size(), 1);
        assert!(packing.overlaps(&g, &e, &policy, &[1, 2, 3, 4]));
    }
}
