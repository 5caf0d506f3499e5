//! In-memory dataset: dimensions, coordinate arrays and data variables.

use std::path::Path;

use super::rename::{normalized_name, DROP_VARIABLES};
use super::ConvertError;

/// One named array: a coordinate or a data variable, values flattened in
/// row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayData {
    pub name: String,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
    /// String attributes worth carrying over (units, long_name, …).
    pub attrs: Vec<(String, String)>,
}

/// A normalized view of one or more netCDF files.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub dims: Vec<(String, usize)>,
    pub coords: Vec<ArrayData>,
    pub vars: Vec<ArrayData>,
}

/// Reads a netCDF file into memory.
///
/// A variable whose single dimension shares its name is a coordinate;
/// everything else is a data variable. Scalar bookkeeping variables carry no
/// array data and are skipped.
pub fn read_netcdf(path: &Path) -> Result<Dataset, ConvertError> {
    let file = netcdf::open(path)?;

    let dims: Vec<(String, usize)> = file
        .dimensions()
        .map(|d| (d.name(), d.len()))
        .collect();

    let mut coords = Vec::new();
    let mut vars = Vec::new();
    for var in file.variables() {
        let dim_names: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        if dim_names.is_empty() {
            continue;
        }
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let values = var.get_values::<f64, _>(..)?;

        let mut attrs = Vec::new();
        for attr in var.attributes() {
            if let Ok(netcdf::AttributeValue::Str(s)) = attr.value() {
                attrs.push((attr.name().to_string(), s));
            }
        }

        let name = var.name();
        let array = ArrayData {
            name: name.clone(),
            dims: dim_names.clone(),
            shape,
            values,
            attrs,
        };
        if dim_names.len() == 1 && dim_names[0] == name {
            coords.push(array);
        } else {
            vars.push(array);
        }
    }

    Ok(Dataset { dims, coords, vars })
}

/// Concatenates datasets along the record axis of the first one, in order.
pub fn concat_records(mut parts: Vec<Dataset>) -> Result<Dataset, ConvertError> {
    if parts.is_empty() {
        return Err(ConvertError::NoInputs);
    }
    let mut base = parts.remove(0);
    if parts.is_empty() {
        return Ok(base);
    }
    let record = base.record_dim().ok_or_else(|| {
        ConvertError::Mismatch("a record dimension to concatenate along".to_string())
    })?;
    for part in parts {
        base.append(part, &record)?;
    }
    Ok(base)
}

impl Dataset {
    /// The axis multiple files are concatenated along.
    pub fn record_dim(&self) -> Option<String> {
        ["time", "forecast_reference_time"]
            .iter()
            .find(|name| self.dims.iter().any(|(d, _)| d == *name))
            .map(|s| s.to_string())
    }

    /// Applies the rename table to dimension and coordinate names and drops
    /// known auxiliaries. Data-variable names stay as retrieved.
    pub fn normalize(&mut self) {
        self.vars
            .retain(|v| !DROP_VARIABLES.contains(&v.name.as_str()));
        self.coords
            .retain(|c| !DROP_VARIABLES.contains(&c.name.as_str()));

        let present: Vec<String> = self
            .dims
            .iter()
            .map(|(name, _)| name.clone())
            .chain(self.coords.iter().map(|c| c.name.clone()))
            .chain(self.vars.iter().map(|v| v.name.clone()))
            .collect();

        for (name, _) in &mut self.dims {
            *name = normalized_name(name, &present);
        }
        for coord in &mut self.coords {
            coord.name = normalized_name(&coord.name, &present);
            for dim in &mut coord.dims {
                *dim = normalized_name(dim, &present);
            }
        }
        for var in &mut self.vars {
            for dim in &mut var.dims {
                *dim = normalized_name(dim, &present);
            }
        }
    }

    /// Appends `other` along `record`. Every non-record dimension, coordinate
    /// and variable must agree with ours; both files must carry the same
    /// names, in either direction.
    fn append(&mut self, other: Dataset, record: &str) -> Result<(), ConvertError> {
        for (name, _) in &self.dims {
            if !other.dims.iter().any(|(n, _)| n == name) {
                return Err(ConvertError::Mismatch(format!("dimension {name}")));
            }
        }
        for theirs in &other.coords {
            if !self.coords.iter().any(|c| c.name == theirs.name) {
                return Err(ConvertError::Mismatch(format!("coordinate {}", theirs.name)));
            }
        }
        for theirs in &other.vars {
            if !self.vars.iter().any(|v| v.name == theirs.name) {
                return Err(ConvertError::Mismatch(format!("variable {}", theirs.name)));
            }
        }

        for (name, len) in &other.dims {
            if name == record {
                continue;
            }
            let ours = self
                .dims
                .iter()
                .find(|(n, _)| n == name)
                .ok_or_else(|| ConvertError::Mismatch(format!("dimension {name}")))?;
            if ours.1 != *len {
                return Err(ConvertError::Mismatch(format!("dimension {name}")));
            }
        }
        let added = other
            .dims
            .iter()
            .find(|(n, _)| n == record)
            .map(|(_, len)| *len)
            .ok_or_else(|| ConvertError::Mismatch(format!("dimension {record}")))?;
        for (name, len) in &mut self.dims {
            if name == record {
                *len += added;
            }
        }

        for coord in &mut self.coords {
            let theirs = other
                .coords
                .iter()
                .find(|c| c.name == coord.name)
                .ok_or_else(|| ConvertError::Mismatch(format!("coordinate {}", coord.name)))?;
            if coord.dims.len() == 1 && coord.dims[0] == record {
                coord.values.extend_from_slice(&theirs.values);
                coord.shape[0] += theirs.shape[0];
            } else if coord.values != theirs.values {
                return Err(ConvertError::Mismatch(format!("coordinate {}", coord.name)));
            }
        }

        for var in &mut self.vars {
            let theirs = other
                .vars
                .iter()
                .find(|v| v.name == var.name)
                .ok_or_else(|| ConvertError::Mismatch(format!("variable {}", var.name)))?;
            if var.dims.first().map(String::as_str) == Some(record) {
                if var.dims != theirs.dims || var.shape[1..] != theirs.shape[1..] {
                    return Err(ConvertError::Mismatch(format!("variable {}", var.name)));
                }
                var.values.extend_from_slice(&theirs.values);
                var.shape[0] += theirs.shape[0];
            } else if var.values != theirs.values {
                return Err(ConvertError::Mismatch(format!("variable {}", var.name)));
            }
        }

        Ok(())
    }
}
