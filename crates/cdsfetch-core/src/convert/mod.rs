//! netCDF → Zarr conversion.
//!
//! Normalizes coordinate-dimension names of retrieved archive files (the
//! archive labels the same axis differently across products), drops known
//! non-essential auxiliaries, and writes the result as a chunked Zarr V3
//! store. Multiple inputs are concatenated along the record axis in the
//! order given.

mod dataset;
mod rename;
mod zarr;

pub use dataset::{read_netcdf, ArrayData, Dataset};
pub use rename::{normalized_name, DROP_VARIABLES};
pub use zarr::write_zarr;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from reading, normalizing or writing datasets.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("destination already exists: {0} (pass overwrite to replace it)")]
    DestinationExists(PathBuf),

    #[error("netcdf: {0}")]
    Netcdf(#[from] netcdf::Error),

    #[error("zarr: {0}")]
    Zarr(String),

    #[error("inputs disagree on {0}")]
    Mismatch(String),

    #[error("no input files given")]
    NoInputs,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reads `inputs`, normalizes names, concatenates along the record axis, and
/// writes a chunked Zarr store at `output`.
///
/// Fails if `output` exists unless `overwrite` is set, in which case the
/// existing tree is removed first.
pub fn convert_to_zarr(
    inputs: &[PathBuf],
    output: &Path,
    overwrite: bool,
) -> Result<(), ConvertError> {
    if inputs.is_empty() {
        return Err(ConvertError::NoInputs);
    }

    let mut parts = Vec::with_capacity(inputs.len());
    for path in inputs {
        tracing::info!("reading {}", path.display());
        let mut ds = read_netcdf(path)?;
        ds.normalize();
        parts.push(ds);
    }

    let ds = dataset::concat_records(parts)?;
    tracing::info!(
        "writing {} variable(s) and {} coordinate(s) to {}",
        ds.vars.len(),
        ds.coords.len(),
        output.display()
    );
    zarr::write_zarr(&ds, output, overwrite)
}
