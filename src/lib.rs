//! Branch-and-bound core for forbidden-subgraph-free graph editing.
//!
//! Given an undirected graph G and a target length ℓ, find the minimum number
//! of edge edits that makes G free of induced P_ℓ (and, optionally, C_ℓ)
//! subgraphs. This crate implements only the search core: the finder, the
//! lower-bound engine, the branching selector and the two search drivers
//! (single-threaded and work-stealing). Graph I/O, CLI parsing and result
//! aggregation live outside this crate.

pub mod bitmatrix;
pub mod bucket_pq;
pub mod conflict;
pub mod config;
pub mod driver;
pub mod error;
pub mod finder;
pub mod graph;
pub mod lb;
pub mod rng;
pub mod selector;
pub mod solver;
pub mod stats;

pub use bitmatrix::BitMatrix;
pub use config::{Conversion, Mode, Restriction, SolverConfig};
pub use error::SolverError;
pub use graph::EditGraph;
pub use solver::Solver;
