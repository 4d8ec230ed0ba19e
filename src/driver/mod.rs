//! Search drivers: the recursive branch-and-bound loop that ties the
//! finder, lower bound, selector and policy together into a decision of
//! "which edit to try next".
//!
//! [`st::SequentialDriver`] is a direct port of `original_source`'s
//! `Editor/ST.hpp`. [`mt::WorkStealingDriver`] parallelizes it over a
//! `crossbeam-deque` injector, modeled on `Editor/MT.hpp`'s shared work
//! queue of fully self-contained problem clones (see that module's doc
//! comment for the one deliberate simplification this port makes).

pub mod mt;
pub mod st;

pub use mt::WorkStealingDriver;
pub use st::SequentialDriver;
