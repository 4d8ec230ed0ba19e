//! The policy axes and top-level solver configuration.
//!
//! `Mode`, `Restriction` and `Conversion` are the three orthogonal axes the
//! original C++ encoded as template parameters. Here
//! they're plain sum types passed by value into the hot paths that need
//! them ([`crate::conflict`], [`crate::stats`], [`crate::driver`]) —
//! monomorphized through `#[inline]` rather than through generics, which
//! keeps the search core a single set of concrete types instead of an
//! exponential blow-up of instantiations per axis combination.

use crate::error::{Result, SolverError};

/// Which edit directions are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Both inserting and deleting edges are legal edits.
    Edit,
    /// Only deleting existing edges is legal.
    DeleteOnly,
    /// Only inserting non-edges is legal.
    InsertOnly,
}

/// Branching restriction: what happens to a pair once it has been branched
/// on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restriction {
    /// No restriction: a pair may be reconsidered in sibling branches.
    None,
    /// A pair is marked for the duration of its own subtree and unmarked on
    /// return (undone together with the edit).
    Undo,
    /// A pair is marked for the duration of its own subtree *and* stays
    /// marked for every later sibling in the same branching loop, only being
    /// unmarked once the whole loop returns. This is what makes the
    /// "mark-only, no edit" branch of [`crate::selector::SelKind::Most`]
    /// sound.
    Redundant,
}

/// Whether/when the "closing pair" `(v_0, v_{l-1})` of a forbidden subgraph
/// is offered for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// The closing pair is offered like any other, ordered first.
    Normal,
    /// The closing pair is offered last, after every other pair of the
    /// subgraph has been tried.
    Last,
    /// The closing pair is never offered. Only legal when `with_cycles` is
    /// `false` (see [`SolverConfig::validate`]) — without cycles the
    /// "closing pair" isn't part of any forbidden structure and skipping it
    /// is vacuous, so the combination `with_cycles = true` + `Skip` would
    /// silently under-edit cycles and is rejected.
    Skip,
}

/// Lower-bound engine variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LBKind {
    /// No lower bound; always reports 0 (never prunes).
    No,
    /// Greedy packing only (see [`crate::lb::LBEngine::greedy`]).
    Basic,
    /// Greedy packing improved by min-degree construction and 2-improvement
    /// local search (see [`crate::lb::LBEngine::local_search`]).
    Arw,
}

/// Branching selector variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelKind {
    First,
    LeastUnedited,
    Most,
    MostPruned,
    SingleMost,
}

/// Search driver variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    SingleThreaded,
    WorkStealing,
}

/// The forbidden length ℓ together with whether cycles are forbidden too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Length {
    pub l: usize,
    pub with_cycles: bool,
}

impl Length {
    pub fn new(l: usize, with_cycles: bool) -> Self {
        Length { l, with_cycles }
    }
}

/// Full configuration for one solve, aggregating every axis the core itself
/// interprets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    pub mode: Mode,
    pub restriction: Restriction,
    pub conversion: Conversion,
    pub length: Length,
    pub selector: SelKind,
    pub lb: LBKind,
    pub driver: DriverKind,
    pub k_min: usize,
    pub k_max: usize,
    pub all_solutions: bool,
    pub threads: usize,
}

impl SolverConfig {
    /// Validate the statically-checkable illegal configuration combinations.
    /// Dynamic conditions (e.g. a selector actually requesting a no-edit
    /// branch at runtime) are still enforced where they occur, in
    /// [`crate::driver`].
    pub fn validate(&self) -> Result<()> {
        if self.length.l < 2 {
            return Err(SolverError::ConfigInvalid(format!(
                "length must be at least 2, got {}",
                self.length.l
            )));
        }
        if self.length.with_cycles && self.length.l < 4 {
            return Err(SolverError::ConfigInvalid(format!(
                "cycles require length >= 4, got {}",
                self.length.l
            )));
        }
        if self.conversion == Conversion::Skip && self.length.with_cycles {
            return Err(SolverError::ConfigInvalid(
                "Conversion::Skip is only meaningful without cycles".into(),
            ));
        }
        let selector_can_request_no_edit_branch = matches!(self.selector, SelKind::Most);
        if selector_can_request_no_edit_branch && self.restriction != Restriction::Redundant {
            return Err(SolverError::ConfigInvalid(
                "selector Most can request a no-edit branch, which requires Restriction::Redundant"
                    .into(),
            ));
        }
        if self.k_min > self.k_max {
            return Err(SolverError::ConfigInvalid(format!(
                "k_min ({}) must not exceed k_max ({})",
                self.k_min, self.k_max
            )));
        }
        if self.driver == DriverKind::WorkStealing && self.threads == 0 {
            return Err(SolverError::ConfigInvalid(
                "work-stealing driver requires at least one thread".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SolverConfig {
        SolverConfig {
            mode: Mode::Edit,
            restriction: Restriction::Redundant,
            conversion: Conversion::Normal,
            length: Length::new(4, true),
            selector: SelKind::Most,
            lb: LBKind::Arw,
            driver: DriverKind::SingleThreaded,
            k_min: 0,
            k_max: 10,
            all_solutions: false,
            threads: 1,
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn skip_conversion_with_cycles_is_rejected() {
        let mut cfg = base_config();
        cfg.conversion = Conversion::Skip;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn most_requires_redundant_restriction() {
        let mut cfg = base_config();
        cfg.restriction = Restriction::Undo;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn single_most_does_not_require_redundant_restriction() {
        // Only `Most` itself can request a no-edit branch; `SingleMost` just
        // sets the `pruned` flag, so it must stay valid under any restriction.
        let mut cfg = base_config();
        cfg.selector = SelKind::SingleMost;
        cfg.restriction = Restriction::None;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn most_pruned_does_not_require_redundant_restriction() {
        let mut cfg = base_config();
        cfg.selector = SelKind::MostPruned;
        cfg.restriction = Restriction::Undo;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn k_min_above_k_max_is_rejected() {
        let mut cfg = base_config();
        cfg.k_min = 5;
        cfg.k_max = 2;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_threads_with_work_stealing_is_rejected() {
        let mut cfg = base_config();
        cfg.selector = SelKind::First;
        cfg.restriction = Restriction::None;
        cfg.driver = DriverKind::WorkStealing;
        cfg.threads = 0;
        assert!(cfg.validate().is_err());
    }
}
