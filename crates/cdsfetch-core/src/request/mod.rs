//! CDS retrieval request model.
//!
//! Builds the JSON bodies the Climate Data Store API expects for ERA5
//! reanalysis and SEAS5 seasonal-forecast retrievals, and validates the
//! temporal/spatial selections before anything touches the network.

pub mod era5;
pub mod seas5;

pub use era5::Era5Request;
pub use seas5::{lead_times, Seas5Request};

use chrono::Datelike;
use serde_json::Value;
use thiserror::Error;

/// Oldest year in the ERA5 archive.
pub const FIRST_ARCHIVE_YEAR: i32 = 1940;

/// All calendar months, zero-padded.
pub const ALL_MONTHS: [&str; 12] = [
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
];

/// All days of the month, zero-padded; the archive ignores days a month
/// does not have.
pub const ALL_DAYS: [&str; 31] = [
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12", "13", "14", "15", "16",
    "17", "18", "19", "20", "21", "22", "23", "24", "25", "26", "27", "28", "29", "30", "31",
];

/// Every hour of the day in `HH:00` form.
pub const HOURLY_TIMES: [&str; 24] = [
    "00:00", "01:00", "02:00", "03:00", "04:00", "05:00", "06:00", "07:00", "08:00", "09:00",
    "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00", "18:00", "19:00",
    "20:00", "21:00", "22:00", "23:00",
];

/// Errors from building or validating a retrieval request.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequestError {
    #[error("year {0} outside the archive range {FIRST_ARCHIVE_YEAR}..={1}")]
    YearOutOfRange(i32, i32),

    #[error("year `{0}` is not a number")]
    InvalidYear(String),

    #[error("area bounds must satisfy latitude in [-90, 90] and longitude in [-180, 180]")]
    InvalidArea,

    #[error("lead time range is empty or its step is zero")]
    InvalidLeadTimes,

    #[error("request selects no {0}")]
    EmptySelection(&'static str),
}

/// Geographic bounding box in degrees, CDS order: north, west, south, east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub north: f64,
    pub west: f64,
    pub south: f64,
    pub east: f64,
}

impl Area {
    pub fn validate(&self) -> Result<(), RequestError> {
        let lat_ok = |lat: f64| (-90.0..=90.0).contains(&lat);
        let lon_ok = |lon: f64| (-180.0..=180.0).contains(&lon);
        if lat_ok(self.north) && lat_ok(self.south) && lon_ok(self.west) && lon_ok(self.east) {
            Ok(())
        } else {
            Err(RequestError::InvalidArea)
        }
    }

    pub(crate) fn to_json(self) -> Value {
        serde_json::json!([self.north, self.west, self.south, self.east])
    }
}

/// Checks every year parses and lies within the archive range
/// (`FIRST_ARCHIVE_YEAR` up to the current year).
pub fn validate_years(years: &[String]) -> Result<(), RequestError> {
    if years.is_empty() {
        return Err(RequestError::EmptySelection("years"));
    }
    let current = chrono::Utc::now().year();
    for year in years {
        let parsed: i32 = year
            .trim()
            .parse()
            .map_err(|_| RequestError::InvalidYear(year.clone()))?;
        if !(FIRST_ARCHIVE_YEAR..=current).contains(&parsed) {
            return Err(RequestError::YearOutOfRange(parsed, current));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_within_bounds() {
        let area = Area {
            north: 60.0,
            west: -10.0,
            south: 35.0,
            east: 30.0,
        };
        assert!(area.validate().is_ok());
        assert_eq!(area.to_json(), serde_json::json!([60.0, -10.0, 35.0, 30.0]));
    }

    #[test]
    fn area_out_of_bounds() {
        let bad_lat = Area {
            north: 91.0,
            west: 0.0,
            south: 0.0,
            east: 10.0,
        };
        assert_eq!(bad_lat.validate(), Err(RequestError::InvalidArea));

        let bad_lon = Area {
            north: 10.0,
            west: -190.0,
            south: 0.0,
            east: 10.0,
        };
        assert_eq!(bad_lon.validate(), Err(RequestError::InvalidArea));
    }

    #[test]
    fn years_in_archive_range() {
        assert!(validate_years(&["1940".to_string(), "2001".to_string()]).is_ok());
    }

    #[test]
    fn years_before_archive_rejected() {
        let err = validate_years(&["1939".to_string()]).unwrap_err();
        assert!(matches!(err, RequestError::YearOutOfRange(1939, _)));
    }

    #[test]
    fn future_year_rejected() {
        let future = (chrono::Utc::now().year() + 1).to_string();
        assert!(matches!(
            validate_years(&[future]).unwrap_err(),
            RequestError::YearOutOfRange(..)
        ));
    }

    #[test]
    fn non_numeric_year_rejected() {
        assert_eq!(
            validate_years(&["MMXX".to_string()]).unwrap_err(),
            RequestError::InvalidYear("MMXX".to_string())
        );
    }

    #[test]
    fn empty_years_rejected() {
        assert_eq!(
            validate_years(&[]).unwrap_err(),
            RequestError::EmptySelection("years")
        );
    }
}
