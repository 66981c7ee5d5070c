mod job;
mod report;

pub use job::*;
pub use report::*;
