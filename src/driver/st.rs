//! The single-threaded branch-and-bound driver.
//!
//! Ported from `original_source`'s `Editor/ST.hpp`. The recursive loop is
//! unchanged: check the lower bound, ask the selector which pairs to branch
//! on, mark/edit/recurse/undo for each, then (if the selector asked for it)
//! try the "no edit at all" branch before unmarking everything this node
//! marked.
//!
//! Backtracking state is handled differently than the source. `ST.hpp`
//! passes its `State_Tuple_type` into the recursive call *by value*, so a
//! sibling iteration continues from the parent's own copy — C++ value
//! semantics do the undoing for free. This port makes that explicit:
//! [`crate::lb::LBState`] and [`crate::selector::SelectorState`] are
//! `Clone`, and `edit_rec` clones them right before descending, exactly
//! where the source's implicit copy would have happened. `before_mark`/
//! `after_mark` (in contrast to `before_mark_and_edit`/`after_mark_and_edit`)
//! mutate the *parent's* state, because in the source they run before the
//! copy is taken — that ordering is preserved here too.

use tracing::debug;

use crate::bitmatrix::BitMatrix;
use crate::config::{Restriction, SolverConfig};
use crate::conflict::Policy;
use crate::finder::center::Finder;
use crate::graph::EditGraph;
use crate::lb::{LBEngine, LBState};
use crate::selector::{Selector, SelectorState};
use crate::stats::SubgraphStats;

/// One full single-threaded search, reusable across many `k` values against
/// the same graph shape.
pub struct SequentialDriver {
    restriction: Restriction,
    lb_engine: LBEngine,
    selector: Selector,
}

impl SequentialDriver {
    pub fn new(n: usize, config: &SolverConfig) -> Self {
        let finder = Finder::new(config.length.l, config.length.with_cycles);
        let policy = Policy::new(config.mode, config.restriction, config.conversion);
        let lb_engine = LBEngine::new(n, finder, policy, matches!(config.lb, crate::config::LBKind::Arw));
        let selector = Selector::new(config.selector, finder, policy);
        SequentialDriver {
            restriction: config.restriction,
            lb_engine,
            selector,
        }
    }

    pub(crate) fn restriction(&self) -> Restriction {
        self.restriction
    }

    pub(crate) fn lb_engine(&self) -> &LBEngine {
        &self.lb_engine
    }

    pub(crate) fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Lower bound on the number of edits needed, before any editing starts.
    /// Mirrors `ST::initialize`'s informational bound computation.
    pub fn initial_lower_bound(&self, eg: &EditGraph) -> usize {
        let mut lb_state = self.lb_engine.initial_state();
        self.lb_engine
            .initialize(&mut lb_state, usize::MAX, &eg.g, &eg.e);
        self.lb_engine.result(&mut lb_state, usize::MAX, &eg.g, &eg.e)
    }

    /// Search for a solution using at most `k` edits. `write` is called with
    /// every accepted solution's `(G, E)`; return `true` from it to keep
    /// searching for further solutions (`all_solutions`), `false` to stop
    /// immediately. Returns whether at least one solution was found.
    ///
    /// `eg` is restored bit-for-bit by the time this returns, matching the
    /// source's undo-completeness guarantee.
    pub fn solve(
        &self,
        eg: &mut EditGraph,
        k: usize,
        mut write: impl FnMut(&BitMatrix, &BitMatrix) -> bool,
    ) -> bool {
        let n = eg.size();
        let mut stats = SubgraphStats::new(n, self.selector.finder(), self.selector.policy());
        stats.initialize(&eg.g, &eg.e);

        let mut lb_state = self.lb_engine.initial_state();
        self.lb_engine.initialize(&mut lb_state, k, &eg.g, &eg.e);

        let mut sel_state = self.selector.initial_state();
        self.selector.initialize(&mut sel_state, &eg.g, &eg.e);

        let mut found_solution = false;
        self.edit_rec(
            eg,
            &mut stats,
            lb_state,
            sel_state,
            k,
            false,
            &mut found_solution,
            &mut write,
        );
        found_solution
    }

    pub(crate) fn edit_rec(
        &self,
        eg: &mut EditGraph,
        stats: &mut SubgraphStats,
        mut lb_state: LBState,
        mut sel_state: SelectorState,
        k: usize,
        calculate_bound: bool,
        found_solution: &mut bool,
        write: &mut impl FnMut(&BitMatrix, &BitMatrix) -> bool,
    ) -> bool {
        if calculate_bound && k < self.lb_engine.result(&mut lb_state, k, &eg.g, &eg.e) {
            return false;
        }

        let problem = self.selector.result(&mut sel_state, stats, k, &eg.g, &eg.e);
        debug!(k, pairs = problem.vertex_pairs.len(), "edit_rec frame");

        if problem.found_solution {
            *found_solution = true;
            return !write(&eg.g, &eg.e);
        }
        if k == 0 {
            return false;
        }

        let mut return_value = false;

        for vp in problem.vertex_pairs.iter() {
            let (u, v) = (vp.first, vp.second);
            debug_assert!(!eg.is_marked(u, v));

            if matches!(self.restriction, Restriction::Redundant)
                && vp.update_lb
                && k < self.lb_engine.result(&mut lb_state, k, &eg.g, &eg.e)
            {
                break;
            }

            let mut next_lb_state = lb_state.clone();
            let mut next_sel_state = sel_state.clone();

            self.lb_engine
                .before_mark_and_edit(&mut next_lb_state, &eg.g, &eg.e, u, v);

            if !matches!(self.restriction, Restriction::None) {
                eg.mark(u, v);
                self.selector.after_mark(&mut sel_state, &eg.g, &eg.e, u, v);
                stats.after_mark(&eg.g, &eg.e, u, v);
            }

            stats.before_edit(&eg.g, &eg.e, u, v);
            eg.toggle(u, v);
            self.lb_engine
                .after_mark_and_edit(&mut next_lb_state, &eg.g, &eg.e, u, v);
            self.selector
                .after_mark_and_edit(&mut next_sel_state, &eg.g, &eg.e, u, v);
            stats.after_edit(&eg.g, &eg.e, u, v);

            if self.edit_rec(
                eg,
                stats,
                next_lb_state,
                next_sel_state,
                k - 1,
                true,
                found_solution,
                write,
            ) {
                return_value = true;
            }

            stats.before_edit(&eg.g, &eg.e, u, v);
            eg.toggle(u, v);
            stats.after_edit(&eg.g, &eg.e, u, v);

            if matches!(self.restriction, Restriction::Undo) {
                eg.unmark(u, v);
                stats.after_unmark(&eg.g, &eg.e, u, v);
            }

            if return_value {
                break;
            }
        }

        if problem.needs_no_edit_branch && !return_value {
            assert!(
                matches!(self.restriction, Restriction::Redundant),
                "no-edit branches require Restriction::Redundant"
            );
            if self.edit_rec(eg, stats, lb_state, sel_state, k, true, found_solution, write) {
                return_value = true;
            }
        }

        if matches!(self.restriction, Restriction::Redundant) {
            for vp in problem.vertex_pairs.iter().rev() {
                if eg.is_marked(vp.first, vp.second) {
                    eg.unmark(vp.first, vp.second);
                    stats.after_unmark(&eg.g, &eg.e, vp.first, vp.second);
                }
            }
        }

        return_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Conversion, DriverKind, LBKind, Length, Mode, SelKind};

    fn config(selector: SelKind, restriction: Restriction) -> SolverConfig {
        SolverConfig {
            mode: Mode::Edit,
            restriction,
            conversion: Conversion::Normal,
            length: Length::new(4, true),
            selector,
            lb: LBKind::Basic,
            driver: DriverKind::SingleThreaded,
            k_min: 0,
            k_max: 10,
            all_solutions: false,
            threads: 1,
        }
    }

    #[test]
    fn already_solved_graph_needs_no_edits() {
        let mut eg = EditGraph::new(5);
        let cfg = config(SelKind::Most, Restriction::Redundant);
        let driver = SequentialDriver::new(5, &cfg);
        let mut solutions = 0;
        let found = driver.solve(&mut eg, 0, |_, _| {
            solutions += 1;
            false
        });
        assert!(found);
        assert_eq!(solutions, 1);
    }

    #[test]
    fn path_of_four_needs_one_edit() {
        let mut eg = EditGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let before = eg.clone();
        let cfg = config(SelKind::Most, Restriction::Redundant);
        let driver = SequentialDriver::new(4, &cfg);

        assert!(!driver.solve(&mut eg, 0, |_, _| false));
        assert_eq!(eg, before);

        let mut solutions = 0;
        let found = driver.solve(&mut eg, 1, |_, _| {
            solutions += 1;
            false
        });
        assert!(found);
        assert_eq!(solutions, 1);
        assert_eq!(eg, before, "solve must restore the graph bit-for-bit");
    }

    #[test]
    fn two_disjoint_p4s_need_two_edits() {
        let mut eg = EditGraph::from_edges(8, [(0, 1), (1, 2), (2, 3), (4, 5), (5, 6), (6, 7)]);
        let cfg = config(SelKind::Most, Restriction::Redundant);
        let driver = SequentialDriver::new(8, &cfg);

        assert!(!driver.solve(&mut eg, 1, |_, _| false));
        assert!(driver.solve(&mut eg, 2, |_, _| false));
    }

    #[test]
    fn first_selector_with_undo_restriction_also_solves() {
        let mut eg = EditGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let cfg = config(SelKind::First, Restriction::Undo);
        let driver = SequentialDriver::new(4, &cfg);
        assert!(driver.solve(&mut eg, 1, |_, _| false));
    }

    #[test]
    fn single_most_with_no_restriction_does_not_request_no_edit_branch() {
        // `SingleMost` never sets `needs_no_edit_branch`, so it must run under
        // `Restriction::None` without tripping the Redundant-only assert below.
        let mut eg = EditGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let cfg = config(SelKind::SingleMost, Restriction::None);
        let driver = SequentialDriver::new(4, &cfg);
        assert!(driver.solve(&mut eg, 1, |_, _| false));
    }
}
