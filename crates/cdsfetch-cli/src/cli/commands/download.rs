//! `cdsfetch download` – retrieve one request from the Climate Data Store.

use anyhow::Result;
use cdsfetch_core::client::CdsClient;
use cdsfetch_core::config;
use cdsfetch_core::request::{lead_times, Era5Request, Seas5Request};

use crate::cli::{DownloadArgs, Product, RetrievalArgs};

pub fn run_download(args: &DownloadArgs) -> Result<()> {
    let (dataset, body) = build_request(
        &args.years,
        &args.variable,
        args.levels.clone(),
        &args.retrieval,
    )?;

    let cfg = config::load_or_init()?;
    let client = CdsClient::new(&cfg)?;
    let path = client.retrieve(dataset, &body, &args.path)?;
    println!("Retrieved {} to {}", args.variable, path.display());
    Ok(())
}

/// Builds the dataset name and request body for one (years, variable) job,
/// applying the temporal/spatial filters from the command line.
pub(crate) fn build_request(
    years: &[String],
    variable: &str,
    levels: Option<Vec<String>>,
    retrieval: &RetrievalArgs,
) -> Result<(&'static str, serde_json::Value)> {
    match retrieval.product {
        Product::Era5 => {
            let mut request = Era5Request::new(years.to_vec(), variable);
            if let Some(months) = &retrieval.months {
                request.months = months.clone();
            }
            if let Some(days) = &retrieval.days {
                request.days = days.clone();
            }
            if let Some(times) = &retrieval.times {
                request.times = times.clone();
            }
            request.levels = levels;
            request.area = retrieval.parsed_area();
            request.format = retrieval.format.clone();
            request.validate()?;
            Ok((request.dataset(), request.body()))
        }
        Product::Seas5 => {
            let hours = lead_times(
                retrieval.lead_start,
                retrieval.lead_end,
                retrieval.lead_step,
            )?;
            let mut request = Seas5Request::new(years.to_vec(), variable, hours);
            if let Some(months) = &retrieval.months {
                request.months = months.clone();
            }
            request.levels = levels;
            request.area = retrieval.parsed_area();
            request.format = retrieval.format.clone();
            request.validate()?;
            Ok((request.dataset(), request.body()))
        }
    }
}
