pub mod batch;
pub mod patcher;

pub use batch::{BatchReport, BatchRunner};
