//! Side-by-side alignment engine.
//!
//! Walks two `LineSource`s in lockstep under the direction of a parsed
//! positional report and streams `AlignedRow`s into a `RowSink`.

pub mod engine;
pub mod row;

pub use engine::{AlignError, AlignStats, AlignmentEngine, Boundary};
pub use row::{AlignedRow, RowKind, RowSink};
