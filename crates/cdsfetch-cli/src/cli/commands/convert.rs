//! `cdsfetch convert` – turn netCDF file(s) into a chunked Zarr store.

use anyhow::Result;
use cdsfetch_core::convert::convert_to_zarr;
use std::path::{Path, PathBuf};

pub fn run_convert(inputs: &[PathBuf], output: &Path, overwrite: bool) -> Result<()> {
    convert_to_zarr(inputs, output, overwrite)?;
    println!("Converted {} file(s) to {}", inputs.len(), output.display());
    Ok(())
}
