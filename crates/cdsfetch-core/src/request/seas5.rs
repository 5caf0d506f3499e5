//! SEAS5 seasonal-forecast requests.
//!
//! Seasonal retrievals select forecast initializations (year/month, day fixed
//! to the 1st) and a set of lead times in hours instead of wall-clock times.

use serde_json::{json, Map, Value};

use super::{validate_years, Area, RequestError, ALL_MONTHS};

/// Dataset for single-level seasonal forecasts.
pub const SINGLE_LEVEL_DATASET: &str = "seasonal-original-single-levels";
/// Dataset for pressure-level seasonal forecasts.
pub const PRESSURE_LEVEL_DATASET: &str = "seasonal-original-pressure-levels";

/// SEAS5 initializes on the first of the month.
pub const FORECAST_DAYS: [&str; 1] = ["01"];

/// Native SEAS5 output step.
pub const DEFAULT_LEAD_STEP_HOURS: u32 = 6;

/// Generates lead times from `start` to `end` hours inclusive, every `step`
/// hours, zero-padded to three digits (`"006"`, `"012"`, …).
pub fn lead_times(start: u32, end: u32, step: u32) -> Result<Vec<String>, RequestError> {
    if step == 0 || end < start {
        return Err(RequestError::InvalidLeadTimes);
    }
    Ok((start..=end)
        .step_by(step as usize)
        .map(|h| format!("{h:03}"))
        .collect())
}

/// One SEAS5 retrieval for a single variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Seas5Request {
    pub years: Vec<String>,
    pub variable: String,
    pub months: Vec<String>,
    pub days: Vec<String>,
    pub lead_times: Vec<String>,
    pub levels: Option<Vec<String>>,
    pub area: Option<Area>,
    pub format: String,
}

impl Seas5Request {
    /// A request covering every monthly initialization with the given lead times.
    pub fn new(
        years: Vec<String>,
        variable: impl Into<String>,
        lead_times: Vec<String>,
    ) -> Self {
        Self {
            years,
            variable: variable.into(),
            months: ALL_MONTHS.iter().map(|s| s.to_string()).collect(),
            days: FORECAST_DAYS.iter().map(|s| s.to_string()).collect(),
            lead_times,
            levels: None,
            area: None,
            format: "netcdf".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        validate_years(&self.years)?;
        if self.months.is_empty() {
            return Err(RequestError::EmptySelection("months"));
        }
        if self.days.is_empty() {
            return Err(RequestError::EmptySelection("days"));
        }
        if self.lead_times.is_empty() {
            return Err(RequestError::EmptySelection("lead times"));
        }
        if let Some(levels) = &self.levels {
            if levels.is_empty() {
                return Err(RequestError::EmptySelection("pressure levels"));
            }
        }
        if let Some(area) = &self.area {
            area.validate()?;
        }
        Ok(())
    }

    /// Which CDS dataset this request targets.
    pub fn dataset(&self) -> &'static str {
        if self.levels.is_some() {
            PRESSURE_LEVEL_DATASET
        } else {
            SINGLE_LEVEL_DATASET
        }
    }

    /// The JSON request body for the CDS API.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert("originating_centre".into(), json!("ecmwf"));
        body.insert("system".into(), json!("51"));
        body.insert("variable".into(), json!([self.variable]));
        body.insert("year".into(), json!(self.years));
        body.insert("month".into(), json!(self.months));
        body.insert("day".into(), json!(self.days));
        body.insert("leadtime_hour".into(), json!(self.lead_times));
        body.insert("data_format".into(), json!(self.format));
        if let Some(levels) = &self.levels {
            body.insert("pressure_level".into(), json!(levels));
        }
        if let Some(area) = self.area {
            body.insert("area".into(), area.to_json());
        }
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_times_are_zero_padded_and_inclusive() {
        let hours = lead_times(0, 24, DEFAULT_LEAD_STEP_HOURS).unwrap();
        assert_eq!(hours, vec!["000", "006", "012", "018", "024"]);
    }

    #[test]
    fn lead_times_past_end_are_clipped() {
        let hours = lead_times(0, 20, 6).unwrap();
        assert_eq!(hours, vec!["000", "006", "012", "018"]);
    }

    #[test]
    fn zero_step_or_inverted_range_rejected() {
        assert_eq!(lead_times(0, 24, 0), Err(RequestError::InvalidLeadTimes));
        assert_eq!(lead_times(48, 24, 6), Err(RequestError::InvalidLeadTimes));
    }

    #[test]
    fn body_carries_forecast_fields() {
        let request = Seas5Request::new(
            vec!["2010".to_string()],
            "total_precipitation",
            lead_times(0, 12, 6).unwrap(),
        );
        assert!(request.validate().is_ok());
        assert_eq!(request.dataset(), SINGLE_LEVEL_DATASET);

        let body = request.body();
        assert_eq!(body["originating_centre"], json!("ecmwf"));
        assert_eq!(body["system"], json!("51"));
        assert_eq!(body["day"], json!(["01"]));
        assert_eq!(body["leadtime_hour"], json!(["000", "006", "012"]));
        assert_eq!(body["data_format"], json!("netcdf"));
    }

    #[test]
    fn levels_switch_to_pressure_level_dataset() {
        let mut request = Seas5Request::new(
            vec!["2010".to_string()],
            "geopotential",
            lead_times(0, 12, 6).unwrap(),
        );
        request.levels = Some(vec!["500".to_string()]);
        assert_eq!(request.dataset(), PRESSURE_LEVEL_DATASET);
        assert_eq!(request.body()["pressure_level"], json!(["500"]));
    }
}
