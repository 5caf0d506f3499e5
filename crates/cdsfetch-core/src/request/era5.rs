//! ERA5 reanalysis requests.

use serde_json::{json, Map, Value};

use super::{validate_years, Area, RequestError, ALL_DAYS, ALL_MONTHS, HOURLY_TIMES};

/// Dataset for variables without a vertical level dimension.
pub const SINGLE_LEVEL_DATASET: &str = "reanalysis-era5-single-levels";
/// Dataset for variables on pressure levels.
pub const PRESSURE_LEVEL_DATASET: &str = "reanalysis-era5-pressure-levels";

/// One ERA5 retrieval: a set of years for one variable, hourly resolution
/// by default. Presence of `levels` decides which dataset is hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Era5Request {
    pub years: Vec<String>,
    pub variable: String,
    pub months: Vec<String>,
    pub days: Vec<String>,
    pub times: Vec<String>,
    pub levels: Option<Vec<String>>,
    pub area: Option<Area>,
    pub format: String,
}

impl Era5Request {
    /// A full-year, all-hours request for one variable in netCDF format.
    pub fn new(years: Vec<String>, variable: impl Into<String>) -> Self {
        Self {
            years,
            variable: variable.into(),
            months: ALL_MONTHS.iter().map(|s| s.to_string()).collect(),
            days: ALL_DAYS.iter().map(|s| s.to_string()).collect(),
            times: HOURLY_TIMES.iter().map(|s| s.to_string()).collect(),
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
        if self.times.is_empty() {
            return Err(RequestError::EmptySelection("times"));
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
        body.insert("product_type".into(), json!(["reanalysis"]));
        body.insert("year".into(), json!(self.years));
        body.insert("variable".into(), json!([self.variable]));
        body.insert("month".into(), json!(self.months));
        body.insert("day".into(), json!(self.days));
        body.insert("time".into(), json!(self.times));
        body.insert("format".into(), json!(self.format));
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
    fn single_level_request_targets_single_level_dataset() {
        let request = Era5Request::new(vec!["2001".to_string()], "2m_temperature");
        assert_eq!(request.dataset(), SINGLE_LEVEL_DATASET);
        assert!(request.validate().is_ok());

        let body = request.body();
        assert_eq!(body["product_type"], json!(["reanalysis"]));
        assert_eq!(body["year"], json!(["2001"]));
        assert_eq!(body["variable"], json!(["2m_temperature"]));
        assert_eq!(body["format"], json!("netcdf"));
        assert!(body.get("pressure_level").is_none());
        assert!(body.get("area").is_none());
    }

    #[test]
    fn levels_switch_to_pressure_level_dataset() {
        let mut request = Era5Request::new(vec!["2001".to_string()], "u_component_of_wind");
        request.levels = Some(vec!["500".to_string(), "850".to_string()]);
        assert_eq!(request.dataset(), PRESSURE_LEVEL_DATASET);
        assert_eq!(request.body()["pressure_level"], json!(["500", "850"]));
    }

    #[test]
    fn defaults_cover_the_whole_year() {
        let request = Era5Request::new(vec!["2001".to_string()], "2m_temperature");
        assert_eq!(request.months.len(), 12);
        assert_eq!(request.days.len(), 31);
        assert_eq!(request.times.len(), 24);
    }

    #[test]
    fn area_is_rendered_north_west_south_east() {
        let mut request = Era5Request::new(vec!["2001".to_string()], "2m_temperature");
        request.area = Some(Area {
            north: 70.0,
            west: -15.0,
            south: 30.0,
            east: 40.0,
        });
        assert_eq!(request.body()["area"], json!([70.0, -15.0, 30.0, 40.0]));
    }

    #[test]
    fn empty_levels_list_rejected() {
        let mut request = Era5Request::new(vec!["2001".to_string()], "u_component_of_wind");
        request.levels = Some(vec![]);
        assert_eq!(
            request.validate().unwrap_err(),
            RequestError::EmptySelection("pressure levels")
        );
    }

    #[test]
    fn invalid_year_refused_before_any_network_use() {
        let request = Era5Request::new(vec!["1890".to_string()], "2m_temperature");
        assert!(matches!(
            request.validate().unwrap_err(),
            RequestError::YearOutOfRange(1890, _)
        ));
    }
}
