//! The fixed coordinate rename table and drop list.

/// Auxiliary variables dropped during conversion.
pub const DROP_VARIABLES: &[&str] = &["valid_time_bnds"];

/// Maps an axis name to its canonical form, given every name present in the
/// dataset.
///
/// `valid_time` becomes `time` only for reanalysis-style files: when the
/// dataset has no `forecast_reference_time` axis and no `time` already.
/// `lat`/`lon` become `latitude`/`longitude` unless the long form exists.
pub fn normalized_name(name: &str, present: &[String]) -> String {
    let has = |wanted: &str| present.iter().any(|p| p == wanted);
    match name {
        "valid_time" if !has("forecast_reference_time") && !has("time") => "time".to_string(),
        "lat" if !has("latitude") => "latitude".to_string(),
        "lon" if !has("longitude") => "longitude".to_string(),
        _ => name.to_string(),
    }
}
