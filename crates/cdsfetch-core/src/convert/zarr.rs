//! Zarr V3 store writer.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use zarrs::array::{Array, ArrayBuilder, DataType, DimensionName, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs::group::GroupBuilder;
use zarrs_filesystem::FilesystemStore;

use super::dataset::{ArrayData, Dataset};
use super::ConvertError;

/// Chunk cap along the record (first) axis of data variables.
const RECORD_CHUNK: u64 = 24;
/// Chunk cap along the remaining axes.
const SPATIAL_CHUNK: u64 = 512;

fn zarr_err<E: std::fmt::Display>(e: E) -> ConvertError {
    ConvertError::Zarr(e.to_string())
}

/// Writes the dataset as one Zarr group: a 1-D array per coordinate plus a
/// chunked array per data variable.
pub fn write_zarr(ds: &Dataset, output: &Path, overwrite: bool) -> Result<(), ConvertError> {
    if output.exists() {
        if overwrite {
            fs::remove_dir_all(output)?;
        } else {
            return Err(ConvertError::DestinationExists(output.to_path_buf()));
        }
    }
    fs::create_dir_all(output)?;

    let store = Arc::new(FilesystemStore::new(output).map_err(zarr_err)?);
    let group = GroupBuilder::new()
        .build(store.clone(), "/")
        .map_err(zarr_err)?;
    group.store_metadata().map_err(zarr_err)?;

    for coord in &ds.coords {
        // Coordinates are small; keep each in a single chunk.
        let chunk = vec![(coord.values.len().max(1)) as u64];
        write_array(store.clone(), coord, chunk)?;
    }
    for var in &ds.vars {
        write_array(store.clone(), var, chunk_shape(&var.shape))?;
    }

    Ok(())
}

/// Record axis capped at `RECORD_CHUNK`, other axes at `SPATIAL_CHUNK`.
fn chunk_shape(shape: &[usize]) -> Vec<u64> {
    shape
        .iter()
        .enumerate()
        .map(|(axis, &len)| {
            let cap = if axis == 0 { RECORD_CHUNK } else { SPATIAL_CHUNK };
            (len as u64).clamp(1, cap)
        })
        .collect()
}

fn write_array(
    store: Arc<FilesystemStore>,
    array: &ArrayData,
    chunk: Vec<u64>,
) -> Result<(), ConvertError> {
    let shape: Vec<u64> = array.shape.iter().map(|&len| len as u64).collect();
    let chunk_grid: zarrs::array::ChunkGrid = chunk.try_into().map_err(zarr_err)?;

    let mut attrs = serde_json::Map::new();
    for (key, value) in &array.attrs {
        attrs.insert(key.clone(), serde_json::json!(value));
    }

    let dimension_names: Vec<DimensionName> = array
        .dims
        .iter()
        .map(|dim| DimensionName::from(dim.as_str()))
        .collect();

    let zarr_array = ArrayBuilder::new(
        shape.clone(),
        DataType::Float64,
        chunk_grid,
        FillValue::from(f64::NAN),
    )
    .dimension_names(Some(dimension_names))
    .attributes(attrs)
    .build(store, &format!("/{}", array.name))
    .map_err(zarr_err)?;

    zarr_array.store_metadata().map_err(zarr_err)?;

    if array.values.is_empty() {
        return Ok(());
    }

    let subset = ArraySubset::new_with_start_shape(vec![0; shape.len()], shape).map_err(zarr_err)?;
    zarr_array
        .store_array_subset_elements(&subset, &array.values)
        .map_err(zarr_err)?;

    Ok(())
}

/// Reads one array back in C order. Test helper and debugging aid.
pub(super) fn read_array(output: &Path, name: &str) -> Result<Vec<f64>, ConvertError> {
    let store = Arc::new(FilesystemStore::new(output).map_err(zarr_err)?);
    let array = Array::open(store, &format!("/{name}")).map_err(zarr_err)?;
    array
        .retrieve_array_subset_elements::<f64>(&array.subset_all())
        .map_err(zarr_err)
}
