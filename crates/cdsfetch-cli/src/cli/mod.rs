//! CLI for the cdsfetch CDS job-array downloader.

mod commands;

use anyhow::{bail, Context, Result};
use cdsfetch_core::jobspace::{JobDescriptor, JobSpace};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use commands::{run_convert, run_count, run_decode, run_download, run_job};

/// Top-level CLI for the cdsfetch downloader.
#[derive(Debug, Parser)]
#[command(name = "cdsfetch")]
#[command(about = "cdsfetch: batch-array downloader for the Climate Data Store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// The job-space description shared by every planning command. The same
/// arguments must be passed to `count`, `decode` and `run` for the indices
/// to line up.
#[derive(Debug, Args)]
pub struct JobSpaceArgs {
    /// Years spanned by the job space, in order.
    #[arg(long, num_args = 1.., required = true)]
    pub years: Vec<String>,

    /// Years per job; the final group may be smaller.
    #[arg(long, default_value = "1", value_name = "N")]
    pub group_size: usize,

    /// Variables without a vertical level dimension.
    #[arg(long, num_args = 1..)]
    pub single_variables: Vec<String>,

    /// Variables that need a pressure-level selection.
    #[arg(long, num_args = 1..)]
    pub multi_variables: Vec<String>,

    /// Pressure levels applied to every multi-level job.
    #[arg(long, num_args = 1..)]
    pub levels: Vec<String>,
}

impl JobSpaceArgs {
    pub fn build(&self) -> Result<JobSpace> {
        Ok(JobSpace::new(
            &self.years,
            self.group_size,
            &self.single_variables,
            &self.multi_variables,
            &self.levels,
        )?)
    }
}

/// Which archive product a retrieval hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Product {
    /// ERA5 hourly reanalysis.
    Era5,
    /// SEAS5 seasonal forecasts.
    Seas5,
}

impl Product {
    /// Prefix for files retrieved by `run`.
    pub fn archive_slug(self) -> &'static str {
        match self {
            Product::Era5 => "era5_cds",
            Product::Seas5 => "seas5_cds",
        }
    }
}

/// Temporal/spatial filters shared by `download` and `run`.
#[derive(Debug, Args)]
pub struct RetrievalArgs {
    /// Archive product to retrieve from.
    #[arg(long, value_enum, default_value_t = Product::Era5)]
    pub product: Product,

    /// Months to retrieve (default: all twelve).
    #[arg(long, num_args = 1..)]
    pub months: Option<Vec<String>>,

    /// Days to retrieve (default: all).
    #[arg(long, num_args = 1..)]
    pub days: Option<Vec<String>>,

    /// Times of day to retrieve (ERA5 only; default: hourly).
    #[arg(long, num_args = 1..)]
    pub times: Option<Vec<String>>,

    /// Bounding box as north west south east, in degrees.
    #[arg(long, num_args = 4, value_name = "DEG", allow_negative_numbers = true)]
    pub area: Option<Vec<f64>>,

    /// Data format requested from the archive.
    #[arg(long, default_value = "netcdf")]
    pub format: String,

    /// First SEAS5 lead time in hours.
    #[arg(long, default_value = "0", value_name = "HOURS")]
    pub lead_start: u32,

    /// Last SEAS5 lead time in hours.
    #[arg(long, default_value = "5160", value_name = "HOURS")]
    pub lead_end: u32,

    /// SEAS5 lead time step in hours.
    #[arg(long, default_value = "6", value_name = "HOURS")]
    pub lead_step: u32,
}

impl RetrievalArgs {
    pub fn parsed_area(&self) -> Option<cdsfetch_core::request::Area> {
        // clap enforces exactly four values.
        self.area.as_ref().map(|a| cdsfetch_core::request::Area {
            north: a[0],
            west: a[1],
            south: a[2],
            east: a[3],
        })
    }
}

/// One retrieval fully spelled out on the command line.
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Target path for the downloaded file.
    #[arg(long)]
    pub path: PathBuf,

    /// Years to retrieve.
    #[arg(long, num_args = 1.., required = true)]
    pub years: Vec<String>,

    /// Variable to retrieve (one per invocation).
    #[arg(long)]
    pub variable: String,

    /// Pressure levels; selects the pressure-level dataset when given.
    #[arg(long, num_args = 1..)]
    pub levels: Option<Vec<String>>,

    #[command(flatten)]
    pub retrieval: RetrievalArgs,
}

/// One batch-array task: decode, retrieve, convert.
#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub space: JobSpaceArgs,

    /// Zero-based job index; read from $SLURM_ARRAY_TASK_ID when omitted.
    #[arg(long)]
    pub index: Option<i64>,

    /// Directory the retrieved file (and Zarr store) land in.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Leave the retrieved netCDF as-is instead of converting it.
    #[arg(long)]
    pub no_convert: bool,

    /// Replace an existing Zarr store for this job.
    #[arg(long)]
    pub overwrite: bool,

    #[command(flatten)]
    pub retrieval: RetrievalArgs,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the number of jobs (to size the batch array before submitting).
    Count {
        #[command(flatten)]
        space: JobSpaceArgs,
    },

    /// Print one job as `<years>,<variable>,<levels>`.
    Decode {
        #[command(flatten)]
        space: JobSpaceArgs,

        /// Zero-based job index; read from $SLURM_ARRAY_TASK_ID when omitted.
        #[arg(long)]
        index: Option<i64>,
    },

    /// Retrieve one request from the Climate Data Store.
    Download(DownloadArgs),

    /// Convert retrieved netCDF file(s) into a chunked Zarr store.
    Convert {
        /// Input netCDF file(s), concatenated along time in the order given.
        #[arg(long, num_args = 1.., required = true)]
        input: Vec<PathBuf>,

        /// Output Zarr directory.
        #[arg(long)]
        output: PathBuf,

        /// Replace the output directory if it already exists.
        #[arg(long)]
        overwrite: bool,
    },

    /// Decode an index, retrieve its job, then convert it (one array task).
    Run(RunArgs),
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Count { space } => run_count(&space),
            CliCommand::Decode { space, index } => run_decode(&space, index),
            CliCommand::Download(args) => run_download(&args),
            CliCommand::Convert {
                input,
                output,
                overwrite,
            } => run_convert(&input, &output, overwrite),
            CliCommand::Run(args) => run_job(&args),
        }
    }
}

/// `--index` wins; otherwise the batch scheduler's array variable.
pub(crate) fn resolve_index(index: Option<i64>) -> Result<i64> {
    match index {
        Some(i) => Ok(i),
        None => {
            let raw = std::env::var("SLURM_ARRAY_TASK_ID")
                .context("no --index given and SLURM_ARRAY_TASK_ID is unset")?;
            raw.trim()
                .parse()
                .with_context(|| format!("SLURM_ARRAY_TASK_ID `{raw}` is not an integer"))
        }
    }
}

/// Decodes a possibly-negative index; negatives fail the same way as
/// indices past the end.
pub(crate) fn decode_at(space: &JobSpace, index: i64) -> Result<JobDescriptor> {
    let Ok(index) = usize::try_from(index) else {
        bail!(
            "index {index} out of range for job space of {} jobs",
            space.count()
        );
    };
    Ok(space.decode(index)?)
}

#[cfg(test)]
mod tests;
