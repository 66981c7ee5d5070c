mod inspect;
mod pack;

pub use inspect::*;
pub use pack::*;

use std::path::Path;

use crate::data::Job;

/// Reads the job file a command was pointed at.
fn read_job(path: &Path) -> anyhow::Result<Job> {
    match Job::read_from_file(path) {
        Ok(job) => Ok(job),
        Err(err) if err.is_not_found() => {
            anyhow::bail!("No job file found at {}", path.display())
        }
        Err(err) => Err(err.into()),
    }
}
