//! `cdsfetch run` – one batch-array task end to end: decode the index,
//! retrieve the job's file, convert it to Zarr.

use anyhow::{Context, Result};
use cdsfetch_core::client::CdsClient;
use cdsfetch_core::config;
use cdsfetch_core::convert::convert_to_zarr;

use super::build_request;
use crate::cli::{decode_at, resolve_index, RunArgs};

pub fn run_job(args: &RunArgs) -> Result<()> {
    let space = args.space.build()?;
    let index = resolve_index(args.index)?;
    let job = decode_at(&space, index)?;
    tracing::info!(index, job = %job, "running array task");

    let first = job.years.first().context("job has no years")?;
    let last = job.years.last().context("job has no years")?;
    let file_name = format!(
        "{}_{}-{}-{}.nc",
        args.retrieval.product.archive_slug(),
        job.variable,
        first,
        last
    );
    let target = args.output_dir.join(file_name);

    let (dataset, body) = build_request(
        &job.years,
        &job.variable,
        job.levels.clone(),
        &args.retrieval,
    )?;

    let cfg = config::load_or_init()?;
    let client = CdsClient::new(&cfg)?;
    let retrieved = client.retrieve(dataset, &body, &target)?;

    if args.no_convert {
        println!("{}", retrieved.display());
        return Ok(());
    }

    let store = retrieved.with_extension("zarr");
    convert_to_zarr(std::slice::from_ref(&retrieved), &store, args.overwrite)?;
    println!("{} -> {}", retrieved.display(), store.display());
    Ok(())
}
