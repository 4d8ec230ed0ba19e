//! The center-based finder: fix a central edge (even ℓ) or central vertex
//! (odd ℓ), then extend outward one vertex at a time, checking at each step
//! that the new vertex is adjacent to exactly its path-neighbors among the
//! vertices placed so far.
//!
//! This is a direct-adjacency-check rendition of `original_source`'s
//! `Finder/Center.hpp`: the original keeps a running "forbidden" bitmask and
//! does the inducedness check via one bitwise AND; here each extension step
//! checks the handful of already-placed vertices directly (ℓ ≤ 6 in
//! practice, so this is a tiny constant-size loop), which keeps the
//! recursion easy to follow and to get right without a compiler at hand.
//! Candidate generation itself still goes through [`BitMatrix::neighbors`],
//! so the hot loop is still a bit-parallel word scan, not an O(n) vertex
//! scan.

use crate::bitmatrix::BitMatrix;

/// Enumerates every induced P_l, and (if configured) every induced C_l, of a
/// graph. ℓ and `with_cycles` are fixed at construction (morally
/// compile-time parameters) kept as plain fields here since this port
/// favors a small set of concrete types over per-axis generics.
#[derive(Debug, Clone, Copy)]
pub struct Finder {
    length: usize,
    with_cycles: bool,
}

impl Finder {
    pub fn new(length: usize, with_cycles: bool) -> Self {
        assert!(length >= 2, "length must be at least 2");
        assert!(
            !with_cycles || length >= 4,
            "cycles require length >= 4"
        );
        Finder {
            length,
            with_cycles,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn with_cycles(&self) -> bool {
        self.with_cycles
    }

    /// Enumerate every induced P_l/C_l of `g`. Stops early if `cb` returns
    /// `true`.
    pub fn find(&self, g: &BitMatrix, mut cb: impl FnMut(&[usize]) -> bool) -> bool {
        let l = self.length;
        let n = g.size();
        let mut path = vec![0usize; l];

        if l % 2 == 0 {
            let mid_lo = l / 2 - 1;
            let mid_hi = l / 2;
            for u in 0..n {
                for v in g.neighbors(u) {
                    if v <= u {
                        continue;
                    }
                    path[mid_lo] = u;
                    path[mid_hi] = v;
                    if self.extend(g, &mut path, mid_lo, mid_hi, None, &mut cb) {
                        return true;
                    }
                }
            }
        } else if l >= 3 {
            let mid = l / 2;
            for u in 0..n {
                let nbrs: Vec<usize> = g.neighbors(u).collect();
                for i in 0..nbrs.len() {
                    for j in (i + 1)..nbrs.len() {
                        let a = nbrs[i];
                        let b = nbrs[j];
                        if g.has_edge(a, b) {
                            continue; // would create a chord at distance 2
                        }
                        path[mid] = u;
                        path[mid - 1] = a;
                        path[mid + 1] = b;
                        if self.extend(g, &mut path, mid - 1, mid + 1, None, &mut cb) {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// Enumerate every induced P_l/C_l containing both `u` and `v`. If
    /// `forbidden` is given, any subgraph containing a pair it marks is
    /// skipped entirely (used by [`crate::lb`]'s local search to restrict
    /// candidates to edges outside the rest of the packing).
    pub fn find_near(&self, g: &BitMatrix, u: usize, v: usize, cb: impl FnMut(&[usize]) -> bool) -> bool {
        self.find_near_restricted(g, u, v, None, cb)
    }

    pub fn find_near_restricted(
        &self,
        g: &BitMatrix,
        u: usize,
        v: usize,
        forbidden: Option<&BitMatrix>,
        mut cb: impl FnMut(&[usize]) -> bool,
    ) -> bool {
        debug_assert_ne!(u, v);
        let l = self.length;
        let mut path = vec![0usize; l];

        if g.has_edge(u, v) {
            for p in 0..l - 1 {
                let q = p + 1;
                for &(a, b) in &[(u, v), (v, u)] {
                    path[p] = a;
                    path[q] = b;
                    if self.extend(g, &mut path, p, q, forbidden, &mut cb) {
                        return true;
                    }
                }
            }
        } else {
            for d in 2..l {
                for p in 0..=(l - 1 - d) {
                    let q = p + d;
                    for &(a, b) in &[(u, v), (v, u)] {
                        path[p] = a;
                        path[q] = b;
                        if self.fill_inner(g, &mut path, p, p, q, forbidden, &mut cb) {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// Fill the interior positions strictly between the fixed endpoints `p`
    /// and `q` (with `path[p]` and `path[q]` already set), growing one
    /// vertex at a time from the `p` side. `cur` is the rightmost filled
    /// position on that side so far (`cur == p` initially). Once `cur + 1 ==
    /// q` the interior is complete and outward extension takes over.
    fn fill_inner(
        &self,
        g: &BitMatrix,
        path: &mut [usize],
        p: usize,
        cur: usize,
        q: usize,
        forbidden: Option<&BitMatrix>,
        cb: &mut impl FnMut(&[usize]) -> bool,
    ) -> bool {
        if cur + 1 == q {
            return self.extend(g, path, p, q, forbidden, cb);
        }
        let new_pos = cur + 1;
        let anchor = path[cur];
        let filled: Vec<usize> = (p..=cur).chain(std::iter::once(q)).collect();
        for w in g.neighbors(anchor).collect::<Vec<_>>() {
            if filled.iter().any(|&fp| path[fp] == w) {
                continue;
            }
            if !self.consistent_against(g, path, &filled, new_pos, w, forbidden) {
                continue;
            }
            path[new_pos] = w;
            if self.fill_inner(g, path, p, new_pos, q, forbidden, cb) {
                return true;
            }
        }
        false
    }

    /// Grow the contiguous filled range `[lo, hi]` outward, alternating
    /// toward whichever end (0 or `l - 1`) has more remaining positions,
    /// until the whole path is filled, then hand the completed tuple to
    /// [`Self::finish`].
    fn extend(
        &self,
        g: &BitMatrix,
        path: &mut [usize],
        lo: usize,
        hi: usize,
        forbidden: Option<&BitMatrix>,
        cb: &mut impl FnMut(&[usize]) -> bool,
    ) -> bool {
        let l = self.length;
        let remaining_lo = lo;
        let remaining_hi = l - 1 - hi;

        if remaining_lo == 0 && remaining_hi == 0 {
            return self.finish(g, path, cb);
        }

        let filled: Vec<usize> = (lo..=hi).collect();

        if remaining_lo >= remaining_hi {
            let new_pos = lo - 1;
            let anchor = path[lo];
            for w in g.neighbors(anchor).collect::<Vec<_>>() {
                if filled.iter().any(|&fp| path[fp] == w) {
                    continue;
                }
                if !self.consistent_against(g, path, &filled, new_pos, w, forbidden) {
                    continue;
                }
                path[new_pos] = w;
                if self.extend(g, path, new_pos, hi, forbidden, cb) {
                    return true;
                }
            }
        } else {
            let new_pos = hi + 1;
            let anchor = path[hi];
            for w in g.neighbors(anchor).collect::<Vec<_>>() {
                if filled.iter().any(|&fp| path[fp] == w) {
                    continue;
                }
                if !self.consistent_against(g, path, &filled, new_pos, w, forbidden) {
                    continue;
                }
                path[new_pos] = w;
                if self.extend(g, path, lo, new_pos, forbidden, cb) {
                    return true;
                }
            }
        }
        false
    }

    /// `w`, to be placed at `new_pos`, must be adjacent to exactly its path
    /// neighbors among the already-filled positions — except the closing
    /// pair `{0, l-1}`, whose edge/non-edge status is resolved once in
    /// [`Self::finish`], and except any pair the caller has forbidden
    /// outright.
    fn consistent_against(
        &self,
        g: &BitMatrix,
        path: &[usize],
        filled: &[usize],
        new_pos: usize,
        w: usize,
        forbidden: Option<&BitMatrix>,
    ) -> bool {
        let l = self.length;
        for &q in filled {
            if let Some(fb) = forbidden {
                if fb.has_edge(w, path[q]) {
                    return false;
                }
            }
            let is_closing_pair = (new_pos == 0 && q == l - 1) || (new_pos == l - 1 && q == 0);
            if is_closing_pair {
                continue;
            }
            let required_adjacent = new_pos.abs_diff(q) == 1;
            if g.has_edge(w, path[q]) != required_adjacent {
                return false;
            }
        }
        true
    }

    /// Re-check that `seq` is still a valid induced P_l/C_l in `g`. Used by
    /// the `Most` selector family to re-validate a subgraph it cached before
    /// an unrelated edit elsewhere may have invalidated it.
    pub fn is_subgraph_valid(&self, g: &BitMatrix, seq: &[usize]) -> bool {
        let l = self.length;
        if seq.len() != l {
            return false;
        }
        for i in 0..l {
            for j in (i + 1)..l {
                let has_edge = g.has_edge(seq[i], seq[j]);
                let is_closing = i == 0 && j == l - 1;
                if is_closing {
                    if has_edge && !self.with_cycles {
                        return false;
                    }
                } else {
                    let should_be_edge = j - i == 1;
                    if has_edge != should_be_edge {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// The tuple is fully assigned; resolve the closing pair and, if it's a
    /// valid P_l (always) or C_l (only when `with_cycles`), report it.
    fn finish(&self, g: &BitMatrix, path: &[usize], cb: &mut impl FnMut(&[usize]) -> bool) -> bool {
        let l = self.length;
        let closing_is_edge = g.has_edge(path[0], path[l - 1]);
        if closing_is_edge && !self.with_cycles {
            return false;
        }
        cb(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_all(f: &Finder, g: &BitMatrix) -> Vec<Vec<usize>> {
        let mut out = Vec::new();
        f.find(g, |seq| {
            out.push(seq.to_vec());
            false
        });
        out
    }

    fn normalize(seq: &[usize]) -> Vec<usize> {
        let mut a = seq.to_vec();
        let mut b = seq.to_vec();
        b.reverse();
        if b < a {
            a = b;
        }
        a
    }

    #[test]
    fn finds_single_p4_in_a_path() {
        let mut g = BitMatrix::new(4);
        g.set_edge(0, 1);
        g.set_edge(1, 2);
        g.set_edge(2, 3);
        let f = Finder::new(4, true);
        let found = collect_all(&f, &g);
        assert_eq!(found.len(), 1);
        assert_eq!(normalize(&found[0]), vec![0, 1, 2, 3]);
    }

    #[test]
    fn rejects_chords() {
        // K4 minus nothing: every 4-subset is a clique, never an induced P4/C4.
        let mut g = BitMatrix::new(4);
        for u in 0..4 {
            for v in (u + 1)..4 {
                g.set_edge(u, v);
            }
        }
        let f = Finder::new(4, true);
        assert!(collect_all(&f, &g).is_empty());
    }

    #[test]
    fn c4_reported_without_cycles_disabled() {
        let mut g = BitMatrix::new(4);
        g.set_edge(0, 1);
        g.set_edge(1, 2);
        g.set_edge(2, 3);
        g.set_edge(3, 0);
        let f_no_cycles = Finder::new(4, false);
        assert!(collect_all(&f_no_cycles, &g).is_empty());

        let f_cycles = Finder::new(4, true);
        let found = collect_all(&f_cycles, &g);
        // Each of the 4 edges of the cycle can serve as the "center edge",
        // so the same induced C4 is reported up to `length` times.
        assert!(!found.is_empty());
        assert!(found.len() <= 4);
        for seq in &found {
            let mut sorted = seq.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn find_near_only_reports_subgraphs_with_both_vertices() {
        let mut g = BitMatrix::new(6);
        g.set_edge(0, 1);
        g.set_edge(1, 2);
        g.set_edge(2, 3);
        g.set_edge(3, 4);
        g.set_edge(4, 5);
        let f = Finder::new(4, true);
        let mut found = Vec::new();
        f.find_near(&g, 1, 2, |seq| {
            found.push(seq.to_vec());
            false
        });
        assert!(!found.is_empty());
        for seq in &found {
            assert!(seq.contains(&1) && seq.contains(&2));
        }
    }

    #[test]
    fn find_near_finds_every_global_subgraph_containing_the_pair() {
        let mut g = BitMatrix::new(5);
        g.set_edge(0, 1);
        g.set_edge(1, 2);
        g.set_edge(2, 3);
        g.set_edge(3, 4);
        let f = Finder::new(4, true);

        let all = collect_all(&f, &g);
        for pair in [(0usize, 1usize), (1, 2), (2, 3), (0, 2), (1, 3), (0, 3)] {
            let expected: Vec<_> = all
                .iter()
                .filter(|seq| seq.contains(&pair.0) && seq.contains(&pair.1))
                .collect();
            let mut got = Vec::new();
            f.find_near(&g, pair.0, pair.1, |seq| {
                got.push(seq.to_vec());
                false
            });
            assert_eq!(
                got.len(),
                expected.len(),
                "mismatch for pair {:?}: expected {} got {}",
                pair,
                expected.len(),
                got.len()
            );
        }
    }

    #[test]
    fn odd_length_five_path() {
        let mut g = BitMatrix::new(5);
        for i in 0..4 {
            g.set_edge(i, i + 1);
        }
        let f = Finder::new(5, false);
        let found = collect_all(&f, &g);
        assert_eq!(found.len(), 1);
        assert_eq!(normalize(&found[0]), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn disjoint_p4s_each_found_once() {
        let mut g = BitMatrix::new(8);
        for i in 0..3 {
            g.set_edge(i, i + 1);
        }
        for i in 4..7 {
            g.set_edge(i, i + 1);
        }
        let f = Finder::new(4, true);
        let found = collect_all(&f, &g);
        assert_eq!(found.len(), 2);
    }
}
