use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use crate::common::{column_union, load_records};

#[derive(Args, Debug)]
#[command(
    about = "Render a JSON record array as a pretty table",
    long_about = "Format a JSON array of objects into an aligned, boxed table for quick inspection. Columns are the union of all field names in the order they first appear; missing fields render as empty cells.\n\nExample:\n  jsonjoin pretty data/customers.json"
)]
pub struct PrettyArgs {
    /// Input JSON file (use '-' for stdin)
    #[arg(value_name = "FILE", default_value = "-")]
    pub file: PathBuf,

    /// Round floating-point values to N decimal places (enables scientific notation for tiny magnitudes)
    #[arg(short = 'r', long = "round", value_name = "DIGITS")]
    pub round: Option<u32>,
}

pub fn run(args: PrettyArgs) -> Result<()> {
    let records = load_records(&args.file)?;
    let header = column_union(&records);
    let rows = records
        .iter()
        .map(|record| {
            header
                .iter()
                .map(|field| cell_text(record.get(field), args.round))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut writer = BufWriter::new(io::stdout().lock());
    render_table(&mut writer, Some(header.as_slice()), &rows)?;
    writer.flush()?;
    Ok(())
}

/// Text shown for one field. Missing fields are empty, strings are unquoted
/// and nested values are compact JSON.
pub fn cell_text(value: Option<&Value>, digits: Option<u32>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) if number.is_f64() => match number.as_f64() {
            Some(float) => maybe_round_value(float, digits).unwrap_or_else(|| number.to_string()),
            None => number.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

fn maybe_round_value(number: f64, digits: Option<u32>) -> Option<String> {
    let places = digits?;
    if !number.is_finite() {
        return None;
    }
    let exponent = (places as i32).max(4);
    let threshold = 10f64.powi(-exponent);
    if number != 0.0 && number.abs() < threshold {
        Some(format_with_scientific(number, places))
    } else {
        Some(format_with_precision(number, places))
    }
}

fn format_with_precision(number: f64, places: u32) -> String {
    let precision = places as usize;
    let formatted = format!("{number:.precision$}");
    trim_trailing_zeros(formatted)
}

fn format_with_scientific(number: f64, places: u32) -> String {
    let precision = places as usize;
    let formatted = format!("{number:.precision$e}");
    trim_trailing_zeros(formatted)
}

fn trim_trailing_zeros(value: String) -> String {
    if let Some(idx) = value.find(['e', 'E']) {
        let (mantissa, exponent) = value.split_at(idx);
        let cleaned = trim_decimal_suffix(mantissa.to_string());
        return cleaned + exponent;
    }
    trim_decimal_suffix(value)
}

fn trim_decimal_suffix(mut value: String) -> String {
    if value.contains('.') {
        while value.ends_with('0') {
            value.pop();
        }
        if value.ends_with('.') {
            value.pop();
        }
        if value.is_empty() {
            return "0".to_string();
        }
    }
    value
}

pub fn render_table<W: Write>(
    writer: &mut W,
    header: Option<&[String]>,
    rows: &[Vec<String>],
) -> Result<()> {
    let column_count = compute_column_count(header, rows);
    if column_count == 0 {
        return Ok(());
    }

    let widths = compute_widths(column_count, header, rows);

    print_separator(writer, &widths)?;
    if let Some(header_row) = header {
        print_row(writer, header_row, &widths)?;
        print_separator(writer, &widths)?;
    }

    for row in rows {
        print_row(writer, row, &widths)?;
    }
    print_separator(writer, &widths)?;
    Ok(())
}

fn compute_column_count(header: Option<&[String]>, rows: &[Vec<String>]) -> usize {
    let mut count = header.map(|h| h.len()).unwrap_or(0);
    for row in rows {
        if row.len() > count {
            count = row.len();
        }
    }
    count
}

fn compute_widths(count: usize, header: Option<&[String]>, rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths = vec![0usize; count];
    if let Some(header_row) = header {
        for (idx, value) in header_row.iter().enumerate() {
            widths[idx] = widths[idx].max(value.chars().count());
        }
    }
    for row in rows {
        for (idx, value) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(value.chars().count());
        }
    }
    widths
}

fn print_separator<W: Write>(writer: &mut W, widths: &[usize]) -> Result<()> {
    write!(writer, "+")?;
    for width in widths {
        let segment = "-".repeat(width + 2);
        write!(writer, "{}+", segment)?;
    }
    writeln!(writer)?;
    Ok(())
}

fn print_row<W: Write>(writer: &mut W, row: &[String], widths: &[usize]) -> Result<()> {
    write!(writer, "|")?;
    for (idx, width) in widths.iter().enumerate() {
        let value = row.get(idx).map(|s| s.as_str()).unwrap_or("");
        write!(writer, " {:<width$} |", value, width = width)?;
    }
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rounds_numeric_values_to_requested_precision() {
        let value = json!(1.23456);
        assert_eq!(cell_text(Some(&value), Some(2)), "1.23");
    }

    #[test]
    fn formats_very_small_numbers_in_scientific_notation() {
        let value = json!(0.0000001234);
        assert_eq!(cell_text(Some(&value), Some(3)), "1.234e-7");
    }

    #[test]
    fn leaves_integers_and_text_unchanged() {
        let int = json!(42);
        let text = json!("NA");
        assert_eq!(cell_text(Some(&int), Some(2)), "42");
        assert_eq!(cell_text(Some(&text), Some(2)), "NA");
    }

    #[test]
    fn renders_missing_and_nested_values() {
        let nested = json!({"a": [1, null]});
        assert_eq!(cell_text(None, None), "");
        assert_eq!(cell_text(Some(&Value::Null), None), "null");
        assert_eq!(cell_text(Some(&nested), None), "{\"a\":[1,null]}");
    }

    #[test]
    fn renders_boxed_table() {
        let header = vec!["cid".to_string(), "city".to_string()];
        let rows = vec![
            vec!["1".to_string(), "X".to_string()],
            vec!["22".to_string(), String::new()],
        ];
        let mut buffer = Vec::new();
        render_table(&mut buffer, Some(header.as_slice()), &rows).unwrap();
        let expected = "\
+-----+------+
| cid | city |
+-----+------+
| 1   | X    |
| 22  |      |
+-----+------+
";
        assert_eq!(String::from_utf8(buffer).unwrap(), expected);
    }

    #[test]
    fn empty_table_prints_nothing() {
        let mut buffer = Vec::new();
        render_table(&mut buffer, None, &[]).unwrap();
        assert!(buffer.is_empty());
    }
}
