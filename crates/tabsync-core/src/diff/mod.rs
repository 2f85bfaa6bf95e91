//! Positional diff between source rows and a snapshot.

pub mod engine;
pub mod model;

pub use engine::compute_diff;
pub use model::{DeleteOp, InsertOp, RowDiff, UpdateOp};
