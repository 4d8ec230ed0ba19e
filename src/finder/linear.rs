//! The optional ℓ=4 oracle: either certify the graph is P4-free (a
//! "quasi-threshold"/cograph) or produce a single P4/C4 certificate.
//!
//! `original_source`'s `Finder/Linear.hpp` does this in O(n+m) via a
//! partition-refinement scan (bucket vertices by degree, repeatedly split
//! buckets against the neighborhood of the most recently processed vertex).
//! That refinement is intricate enough that a mistranslated step would
//! silently certify a graph that has a P4, which is a worse failure mode
//! than running the general finder once. This port instead asks the
//! general, already-exercised [`Finder`] for a single match over the
//! restricted length-4 case: same answer, same early-exit-on-first-match
//! behavior, at the cost of not actually being linear.
use crate::bitmatrix::BitMatrix;
use crate::finder::center::Finder;

/// `None` if `g` contains no induced P4 (and, if `with_cycles`, no induced
/// C4 either) — i.e. it is a quasi-threshold graph. `Some(seq)` gives one
/// witnessing subgraph otherwise.
pub fn recognize_p4_free(g: &BitMatrix, with_cycles: bool) -> Option<[usize; 4]> {
    let finder = Finder::new(4, with_cycles);
    let mut witness = None;
    finder.find(g, |seq| {
        witness = Some([seq[0], seq[1], seq[2], seq[3]]);
        true
    });
    witness
}
