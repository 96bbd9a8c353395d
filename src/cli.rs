use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DatePolicy;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Infer column roles in a CSV file and normalize their values",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clean a CSV file and write clean-<name>.csv next to it
    Clean(CleanArgs),
    /// Show the inferred role and planned action for every column
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Input CSV file to clean
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (defaults to clean-<input stem>.csv beside the input)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// YAML pipeline configuration
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// What to do with rows whose dates cannot be parsed
    #[arg(long = "on-unparseable-date", value_enum)]
    pub on_unparseable_date: Option<DatePolicy>,
    /// Read ambiguous dates such as 03/04/2024 as day/month
    #[arg(long = "day-first")]
    pub day_first: bool,
    /// Separator placed between phone digit groups
    #[arg(long = "phone-separator")]
    pub phone_separator: Option<String>,
    /// Number of digits per phone group
    #[arg(long = "phone-chunk")]
    pub phone_chunk: Option<usize>,
    /// Drop untyped text columns whose cardinality ratio reaches this value
    #[arg(long = "noise-ratio")]
    pub noise_ratio: Option<f64>,
    /// Drop untyped text columns with more distinct values than this
    #[arg(long = "noise-max-distinct")]
    pub noise_max_distinct: Option<usize>,
    /// Write the run report as JSON to this path
    #[arg(long = "report")]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Input CSV file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// YAML pipeline configuration
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Print the column profiles as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
