//! CSV input and output for batch runs.

pub mod charge_reader;
pub mod snapshot_writer;
