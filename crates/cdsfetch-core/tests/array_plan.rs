//! Integration test: plan a batch array and build the retrieval request for
//! every index, the way one array task would at runtime.

use cdsfetch_core::jobspace::JobSpace;
use cdsfetch_core::request::{era5, Era5Request};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn every_index_yields_a_valid_request_with_the_right_dataset() {
    let years = strings(&["2000", "2001", "2002", "2003", "2004"]);
    let single = strings(&["2m_temperature"]);
    let multi = strings(&["u_component_of_wind", "v_component_of_wind"]);
    let levels = strings(&["500", "850"]);

    let space = JobSpace::new(&years, 2, &single, &multi, &levels).unwrap();
    assert_eq!(space.count(), 9);

    for index in 0..space.count() {
        let job = space.decode(index).unwrap();

        let mut request = Era5Request::new(job.years.clone(), job.variable.clone());
        request.levels = job.levels.clone();
        request.validate().expect("request should validate");

        if single.contains(&job.variable) {
            assert_eq!(request.dataset(), era5::SINGLE_LEVEL_DATASET);
            assert!(request.body().get("pressure_level").is_none());
        } else {
            assert_eq!(request.dataset(), era5::PRESSURE_LEVEL_DATASET);
            assert_eq!(
                request.body()["pressure_level"],
                serde_json::json!(["500", "850"])
            );
        }
    }
}

#[test]
fn descriptor_lines_match_the_batch_contract() {
    let years = strings(&["2000", "2001", "2002", "2003", "2004"]);
    let space = JobSpace::singleton_years(
        &years,
        &strings(&["t2m"]),
        &strings(&["u", "v"]),
        &strings(&["850"]),
    )
    .unwrap();

    let mut lines = Vec::new();
    for index in 0..space.count() {
        lines.push(space.decode(index).unwrap().to_string());
    }

    assert_eq!(lines[0], "2000,t2m,");
    assert_eq!(lines[5], "2000,u,850");
    assert_eq!(lines[14], "2004,v,850");
    assert_eq!(lines.len(), 15);
}
