//! `cdsfetch count` – print the job count for a job space.

use anyhow::Result;

use crate::cli::JobSpaceArgs;

pub fn run_count(space: &JobSpaceArgs) -> Result<()> {
    let space = space.build()?;
    println!("{}", space.count());
    Ok(())
}
