//! ConflictHelpers: the "edges of a forbidden subgraph" under the active
//! Mode/Restriction/Conversion policy.
//!
//! A forbidden subgraph is an ℓ-tuple of vertices `seq = [v_0, .., v_{l-1}]`.
//! Its *structural* edges are the `l - 1` consecutive pairs plus, depending
//! on `Conversion`, the closing pair `(v_0, v_{l-1})`. Which of those pairs
//! are actually *offered for editing* additionally depends on `Mode` (can
//! this direction of edit even apply to this pair right now?) and
//! `Restriction` (has this pair already been fixed by an ancestor branch?).

use crate::bitmatrix::BitMatrix;
use crate::config::{Conversion, Mode, Restriction};

/// The three orthogonal policy axes bundled together, since every consumer
/// of ConflictHelpers needs all three at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub mode: Mode,
    pub restriction: Restriction,
    pub conversion: Conversion,
}

impl Policy {
    pub fn new(mode: Mode, restriction: Restriction, conversion: Conversion) -> Self {
        Policy {
            mode,
            restriction,
            conversion,
        }
    }

    #[inline]
    fn mode_allows(&self, g: &BitMatrix, a: usize, b: usize) -> bool {
        match self.mode {
            Mode::Edit => true,
            Mode::DeleteOnly => g.has_edge(a, b),
            Mode::InsertOnly => !g.has_edge(a, b),
        }
    }

    #[inline]
    fn restriction_allows(&self, e: &BitMatrix, a: usize, b: usize) -> bool {
        match self.restriction {
            Restriction::None => true,
            Restriction::Undo | Restriction::Redundant => !e.has_edge(a, b),
        }
    }

    #[inline]
    fn eligible(&self, g: &BitMatrix, e: &BitMatrix, a: usize, b: usize) -> bool {
        self.mode_allows(g, a, b) && self.restriction_allows(e, a, b)
    }

    /// The ordered list of structural pairs of `seq`, including the closing
    /// pair at the position `Conversion` dictates (first for `Normal`, last
    /// for `Last`, omitted for `Skip`) — *before* Mode/Restriction filtering.
    /// Exposed mainly for tests; `for_all_edges_ordered`/`_unordered` are the
    /// entry points production code should use.
    pub fn structural_pairs(&self, seq: &[usize]) -> Vec<(usize, usize)> {
        let l = seq.len();
        let closing = (seq[0], seq[l - 1]);
        let consecutive = (0..l - 1).map(|i| (seq[i], seq[i + 1]));
        match self.conversion {
            Conversion::Skip => consecutive.collect(),
            Conversion::Normal => std::iter::once(closing).chain(consecutive).collect(),
            Conversion::Last => consecutive.chain(std::iter::once(closing)).collect(),
        }
    }

    /// Call `cb` once per pair of `seq` that is eligible for editing under
    /// this policy, in the deterministic order `structural_pairs` returns.
    /// Stops early (returning `true`) if `cb` returns `true`.
    pub fn for_all_edges_ordered(
        &self,
        g: &BitMatrix,
        e: &BitMatrix,
        seq: &[usize],
        mut cb: impl FnMut(usize, usize) -> bool,
    ) -> bool {
        for (a, b) in self.structural_pairs(seq) {
            if self.eligible(g, e, a, b) && cb(a, b) {
                return true;
            }
        }
        false
    }

    /// Same as `for_all_edges_ordered`, but the order is unspecified (callers
    /// must not rely on it — this is what `SubgraphStats` and the LB packing
    /// use, where only the *set* of eligible pairs matters).
    pub fn for_all_edges_unordered(
        &self,
        g: &BitMatrix,
        e: &BitMatrix,
        seq: &[usize],
        cb: impl FnMut(usize, usize) -> bool,
    ) -> bool {
        self.for_all_edges_ordered(g, e, seq, cb)
    }

    /// Count the eligible pairs without allocating.
    pub fn count_eligible(&self, g: &BitMatrix, e: &BitMatrix, seq: &[usize]) -> usize {
        let mut n = 0;
        self.for_all_edges_unordered(g, e, seq, |_, _| {
            n += 1;
            false
        });
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Conversion, Mode, Restriction};

    fn path_graph(n: usize) -> (BitMatrix, BitMatrix) {
        let mut g = BitMatrix::new(n);
        for i in 0..n - 1 {
            g.set_edge(i, i + 1);
        }
        (g, BitMatrix::new(n))
    }

    #[test]
    fn skip_omits_closing_pair() {
        let (g, e) = path_graph(4);
        let policy = Policy::new(Mode::Edit, Restriction::None, Conversion::Skip);
        let seq = [0, 1, 2, 3];
        let pairs = policy.structural_pairs(&seq);
        assert!(!pairs.contains(&(0, 3)));
        assert_eq!(pairs.len(), 3);
        let _ = (g, e);
    }

    #[test]
    fn last_places_closing_pair_last() {
        let policy = Policy::new(Mode::Edit, Restriction::None, Conversion::Last);
        let seq = [0, 1, 2, 3];
        let pairs = policy.structural_pairs(&seq);
        assert_eq!(*pairs.last().unwrap(), (0, 3));
    }

    #[test]
    fn normal_places_closing_pair_first() {
        let policy = Policy::new(Mode::Edit, Restriction::None, Conversion::Normal);
        let seq = [0, 1, 2, 3];
        let pairs = policy.structural_pairs(&seq);
        assert_eq!(pairs[0], (0, 3));
    }

    #[test]
    fn delete_only_filters_non_edges() {
        let (g, e) = path_graph(4);
        let policy = Policy::new(Mode::DeleteOnly, Restriction::None, Conversion::Normal);
        let seq = [0, 1, 2, 3];
        // (0,3) is a non-edge in a plain path, so it must be filtered out.
        assert_eq!(policy.count_eligible(&g, &e, &seq), 3);
    }

    #[test]
    fn insert_only_keeps_only_non_edges() {
        let (g, e) = path_graph(4);
        let policy = Policy::new(Mode::InsertOnly, Restriction::None, Conversion::Normal);
        let seq = [0, 1, 2, 3];
        assert_eq!(policy.count_eligible(&g, &e, &seq), 1);
    }

    #[test]
    fn restriction_skips_marked_pairs() {
        let (g, mut e) = path_graph(4);
        e.set_edge(1, 2);
        let policy = Policy::new(Mode::Edit, Restriction::Undo, Conversion::Skip);
        let seq = [0, 1, 2, 3];
        assert_eq!(policy.count_eligible(&g, &e, &seq), 2);
    }
}
