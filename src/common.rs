use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use indexmap::IndexSet;
use jsonjoin::Record;
use serde_json::Value;
use tracing::debug;

use crate::pretty::{cell_text, render_table};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array
    Json,
    /// Single-line JSON array
    Compact,
    /// One JSON object per line
    Lines,
    /// Aligned, boxed table
    Table,
    /// Tab-separated values with a header row
    Tsv,
}

pub fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

fn reader_for_path(path: &Path) -> Result<Box<dyn Read>> {
    let reader: Box<dyn Read> = if is_stdin(path) {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        ))
    };
    Ok(reader)
}

/// Reads a JSON array of objects from `path` (`-` for stdin).
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let reader = reader_for_path(path)?;
    let value: Value = serde_json::from_reader(reader)
        .with_context(|| format!("failed to parse JSON from {}", path.display()))?;
    let records = into_records(value, &path.display().to_string())?;
    debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

pub fn into_records(value: Value, source: &str) -> Result<Vec<Record>> {
    let Value::Array(items) = value else {
        bail!("{} must contain a JSON array of objects", source);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(record) => Ok(record),
            _ => bail!("element {} in {} is not a JSON object", idx, source),
        })
        .collect()
}

pub fn output_writer(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match path {
        Some(path) if !is_stdin(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        _ => Box::new(BufWriter::new(io::stdout().lock())),
    };
    Ok(writer)
}

/// Field names across all records, in first-seen order.
pub fn column_union(records: &[Record]) -> Vec<String> {
    let mut columns: IndexSet<&str> = IndexSet::new();
    for record in records {
        for field in record.keys() {
            columns.insert(field.as_str());
        }
    }
    columns.into_iter().map(|s| s.to_string()).collect()
}

pub fn write_records<W: Write>(
    records: &[Record],
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, records)?;
            writeln!(writer)?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut *writer, records)?;
            writeln!(writer)?;
        }
        OutputFormat::Lines => {
            for record in records {
                serde_json::to_writer(&mut *writer, record)?;
                writeln!(writer)?;
            }
        }
        OutputFormat::Table => {
            let header = column_union(records);
            let rows = records
                .iter()
                .map(|record| {
                    header
                        .iter()
                        .map(|field| cell_text(record.get(field), None))
                        .collect()
                })
                .collect::<Vec<_>>();
            render_table(writer, Some(header.as_slice()), &rows)?;
        }
        OutputFormat::Tsv => write_tsv(records, writer)?,
    }
    Ok(())
}

fn write_tsv<W: Write>(records: &[Record], writer: &mut W) -> Result<()> {
    let header = column_union(records);
    if header.is_empty() {
        return Ok(());
    }

    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);
    tsv.write_record(&header)?;
    for record in records {
        tsv.write_record(header.iter().map(|field| cell_text(record.get(field), None)))?;
    }
    tsv.flush()?;
    Ok(())
}
