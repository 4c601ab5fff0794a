//! Batch fan-out and the budget loop that repeats it.

pub mod batch;
pub mod budget;

pub use batch::run_batch;
pub use budget::run_until_exhausted;
