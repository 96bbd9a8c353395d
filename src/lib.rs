pub mod cardinality;
pub mod categorical;
pub mod classify;
pub mod cli;
pub mod config;
pub mod correction;
pub mod countries;
pub mod data;
pub mod dictionary;
pub mod error;
pub mod io_utils;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod table;

use std::{env, fs, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{CleanArgs, Cli, Commands, InspectArgs},
    config::PipelineConfig,
    pipeline::Pipeline,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_cleaner", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Clean(args) => handle_clean(&args),
        Commands::Inspect(args) => handle_inspect(&args),
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            PipelineConfig::load(path).with_context(|| format!("Loading configuration {path:?}"))
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn apply_overrides(config: &mut PipelineConfig, args: &CleanArgs) {
    if let Some(policy) = args.on_unparseable_date {
        config.on_unparseable_date = policy;
    }
    if args.day_first {
        config.day_first = true;
    }
    if let Some(separator) = &args.phone_separator {
        config.phone_separator = separator.clone();
    }
    if let Some(chunk) = args.phone_chunk {
        config.phone_chunk = chunk;
    }
    if let Some(ratio) = args.noise_ratio {
        config.noise_ratio = ratio;
    }
    if let Some(max_distinct) = args.noise_max_distinct {
        config.noise_max_distinct = max_distinct;
    }
}

fn handle_clean(args: &CleanArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, args);
    config.validate()?;
    debug!("Pipeline configuration: {config:?}");

    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Cleaning '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );

    let pipeline = Pipeline::new(config)?;
    let mut table = io_utils::read_table(&args.input, delimiter, encoding)
        .with_context(|| format!("Reading {:?}", args.input))?;
    let report = pipeline
        .run(&mut table)
        .with_context(|| format!("Cleaning {:?}", args.input))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| io_utils::default_output_path(&args.input));
    io_utils::write_table(&table, &output, delimiter)?;
    info!(
        "Wrote {} row(s) x {} column(s) to {:?}",
        table.row_count(),
        table.columns().len(),
        output
    );

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report).context("Serializing run report")?;
        fs::write(path, json).with_context(|| format!("Writing run report to {path:?}"))?;
        info!("Run report written to {path:?}");
    }
    Ok(())
}

fn handle_inspect(args: &InspectArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let table = io_utils::read_table(&args.input, delimiter, encoding)
        .with_context(|| format!("Reading {:?}", args.input))?;

    let pipeline = Pipeline::new(config)?;
    let profiles = pipeline
        .plan(&table)
        .with_context(|| format!("Classifying columns of {:?}", args.input))?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&profiles).context("Serializing column profiles")?
        );
    } else {
        print!("{}", table::render_profiles(&profiles));
    }
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
