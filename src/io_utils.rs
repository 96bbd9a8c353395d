//! CSV reading and writing for the cleaning pipeline.
//!
//! - **Delimiter resolution**: extension-based auto-detection (`.csv` → comma,
//!   `.tsv` → tab) with manual override support.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **TableSource / TableSink**: whole-table load into [`Table`] and the
//!   matching writer. Output always goes to a file; the run never writes a
//!   partially cleaned table.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

use crate::{data::Table, error::CleanError};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// `clean-<stem>.csv` alongside the input file.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let file_name = format!("clean-{stem}.csv");
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Loads a whole CSV file into a [`Table`].
///
/// Malformed input (ragged rows, undecodable bytes, I/O errors mid-file) is
/// reported as [`CleanError::Parse`].
pub fn read_table(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Table> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    read_table_from(BufReader::new(file), path, delimiter, encoding)
}

pub fn read_table_from<R: Read>(
    reader: R,
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Table> {
    let parse_error = |message: String| CleanError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let mut reader = open_csv_reader(reader, delimiter);
    let header_record = reader
        .byte_headers()
        .map_err(|err| parse_error(err.to_string()))?
        .clone();
    let headers =
        decode_record(&header_record, encoding).map_err(|err| parse_error(err.to_string()))?;
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(parse_error("missing header row".to_string()).into());
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.map_err(|err| parse_error(format!("row {}: {err}", idx + 2)))?;
        let decoded = decode_record(&record, encoding)
            .map_err(|err| parse_error(format!("row {}: {err}", idx + 2)))?;
        rows.push(decoded);
    }
    Table::from_rows(&headers, &rows).map_err(|err| parse_error(err.to_string()).into())
}

/// Writes a table as UTF-8 CSV, quoting only where needed.
pub fn write_table(table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
    write_table_to(table, BufWriter::new(file), delimiter)
        .with_context(|| format!("Writing cleaned table to {path:?}"))
}

pub fn write_table_to<W: Write>(table: &Table, writer: W, delimiter: u8) -> Result<()> {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true);
    let mut writer = builder.from_writer(writer);
    writer
        .write_record(table.headers())
        .context("Writing output headers")?;
    for (idx, row) in table.display_rows().enumerate() {
        writer
            .write_record(&row)
            .with_context(|| format!("Writing output row {}", idx + 2))?;
    }
    writer.flush().context("Flushing output writer")?;
    Ok(())
}
