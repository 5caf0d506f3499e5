//! `cdsfetch decode` – print the job at an index.

use anyhow::Result;

use crate::cli::{decode_at, resolve_index, JobSpaceArgs};

pub fn run_decode(space: &JobSpaceArgs, index: Option<i64>) -> Result<()> {
    let space = space.build()?;
    let index = resolve_index(index)?;
    let job = decode_at(&space, index)?;
    println!("{job}");
    Ok(())
}
