//! Persistence layer: the tabular file codec and atomic snapshots.

pub mod csv;
pub mod snapshot;
