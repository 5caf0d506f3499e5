//! Parse and request-building tests for `download`, `convert` and `run`.

use serde_json::json;

use super::parse;
use crate::cli::commands::build_request;
use crate::cli::{CliCommand, Product};

#[test]
fn download_defaults_to_era5_netcdf() {
    let cmd = parse(&[
        "cdsfetch",
        "download",
        "--path",
        "out.nc",
        "--years",
        "2001",
        "--variable",
        "2m_temperature",
    ]);
    let CliCommand::Download(args) = cmd else {
        panic!("expected download command");
    };
    assert_eq!(args.retrieval.product, Product::Era5);
    assert_eq!(args.retrieval.format, "netcdf");
    assert!(args.levels.is_none());

    let (dataset, body) = build_request(
        &args.years,
        &args.variable,
        args.levels.clone(),
        &args.retrieval,
    )
    .unwrap();
    assert_eq!(dataset, "reanalysis-era5-single-levels");
    assert_eq!(body["variable"], json!(["2m_temperature"]));
    assert_eq!(body["year"], json!(["2001"]));
    assert!(body.get("pressure_level").is_none());
}

#[test]
fn levels_select_the_pressure_level_dataset() {
    let cmd = parse(&[
        "cdsfetch",
        "download",
        "--path",
        "out.nc",
        "--years",
        "2001",
        "--variable",
        "u_component_of_wind",
        "--levels",
        "500",
        "850",
    ]);
    let CliCommand::Download(args) = cmd else {
        panic!("expected download command");
    };

    let (dataset, body) = build_request(
        &args.years,
        &args.variable,
        args.levels.clone(),
        &args.retrieval,
    )
    .unwrap();
    assert_eq!(dataset, "reanalysis-era5-pressure-levels");
    assert_eq!(body["pressure_level"], json!(["500", "850"]));
}

#[test]
fn area_takes_four_corners() {
    let cmd = parse(&[
        "cdsfetch",
        "download",
        "--path",
        "out.nc",
        "--years",
        "2001",
        "--variable",
        "2m_temperature",
        "--area",
        "60",
        "-10",
        "35",
        "30",
    ]);
    let CliCommand::Download(args) = cmd else {
        panic!("expected download command");
    };
    let area = args.retrieval.parsed_area().unwrap();
    assert_eq!(area.north, 60.0);
    assert_eq!(area.west, -10.0);
    assert_eq!(area.south, 35.0);
    assert_eq!(area.east, 30.0);

    let (_, body) = build_request(
        &args.years,
        &args.variable,
        None,
        &args.retrieval,
    )
    .unwrap();
    assert_eq!(body["area"], json!([60.0, -10.0, 35.0, 30.0]));
}

#[test]
fn negative_corners_parse_for_southern_western_boxes() {
    let cmd = parse(&[
        "cdsfetch",
        "download",
        "--path",
        "out.nc",
        "--years",
        "2001",
        "--variable",
        "2m_temperature",
        "--area",
        "-10",
        "-75",
        "-35",
        "-40",
    ]);
    let CliCommand::Download(args) = cmd else {
        panic!("expected download command");
    };
    let area = args.retrieval.parsed_area().unwrap();
    assert_eq!(area.north, -10.0);
    assert_eq!(area.west, -75.0);
    assert_eq!(area.south, -35.0);
    assert_eq!(area.east, -40.0);
    assert!(area.validate().is_ok());
}

#[test]
fn seas5_requests_carry_lead_times() {
    let cmd = parse(&[
        "cdsfetch",
        "download",
        "--path",
        "out.nc",
        "--years",
        "2001",
        "--variable",
        "total_precipitation",
        "--product",
        "seas5",
        "--lead-end",
        "24",
    ]);
    let CliCommand::Download(args) = cmd else {
        panic!("expected download command");
    };

    let (dataset, body) = build_request(
        &args.years,
        &args.variable,
        None,
        &args.retrieval,
    )
    .unwrap();
    assert_eq!(dataset, "seasonal-original-single-levels");
    assert_eq!(body["originating_centre"], json!("ecmwf"));
    assert_eq!(
        body["leadtime_hour"],
        json!(["000", "006", "012", "018", "024"])
    );
}

#[test]
fn invalid_years_fail_request_building() {
    let cmd = parse(&[
        "cdsfetch",
        "download",
        "--path",
        "out.nc",
        "--years",
        "1890",
        "--variable",
        "2m_temperature",
    ]);
    let CliCommand::Download(args) = cmd else {
        panic!("expected download command");
    };
    assert!(build_request(&args.years, &args.variable, None, &args.retrieval).is_err());
}

#[test]
fn convert_parses_inputs_and_overwrite() {
    let cmd = parse(&[
        "cdsfetch",
        "convert",
        "--input",
        "a.nc",
        "b.nc",
        "--output",
        "out.zarr",
        "--overwrite",
    ]);
    let CliCommand::Convert {
        input,
        output,
        overwrite,
    } = cmd
    else {
        panic!("expected convert command");
    };
    assert_eq!(input.len(), 2);
    assert_eq!(output.to_string_lossy(), "out.zarr");
    assert!(overwrite);
}

#[test]
fn run_parses_job_space_and_retrieval_options() {
    let cmd = parse(&[
        "cdsfetch",
        "run",
        "--years",
        "2000",
        "2001",
        "--group-size",
        "2",
        "--single-variables",
        "2m_temperature",
        "--index",
        "0",
        "--output-dir",
        "/tmp/archive",
        "--no-convert",
    ]);
    let CliCommand::Run(args) = cmd else {
        panic!("expected run command");
    };
    assert_eq!(args.index, Some(0));
    assert_eq!(args.output_dir.to_string_lossy(), "/tmp/archive");
    assert!(args.no_convert);
    assert_eq!(args.space.build().unwrap().count(), 1);
}
