//! Lower-bounding via disjoint forbidden-subgraph packing.
//!
//! [`LBEngine`] maintains a packing of vertex-disjoint-in-edges forbidden
//! subgraphs: any feasible solution must spend at least one edit per packed
//! subgraph (no two subgraphs in the packing share an editable pair), so the
//! packing size is a valid lower bound on the edits still needed. Ported
//! from `original_source`'s `Consumer/LB_ARW.hpp` (packing + 2-improvement
//! local search) and `Consumer/LB_Basic.hpp`/`LB_Min_Deg.hpp` (the plain
//! greedy variant, `LBKind::Basic`).
//!
//! Unlike the original's split between per-consumer mutable fields and a
//! separately-cloned "state" tuple, this port keeps all of a branch's
//! bookkeeping in one `Clone`-able [`LBState`], and relies on the driver
//! cloning it across sibling branches the same way `Editor::ST` clones its
//! `State_Tuple_type` — see [`crate::driver::st`].

mod engine;
mod packing;

pub use engine::{LBEngine, LBState};
pub use packing::LowerBoundPacking;
