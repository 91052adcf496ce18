use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use jsonjoin::{JoinKind, join};
use tracing::{debug, info};

use crate::common::{OutputFormat, is_stdin, load_records, output_writer, write_records};

#[derive(Args, Debug)]
#[command(
    about = "Join two JSON record arrays on a key field",
    long_about = "Join two JSON arrays of objects on left[LEFT_KEY] == right[RIGHT_KEY]. Matching records are merged into one object; when both sides define a field the left value is kept. Output follows the order of the right file, with unmatched left records (left/full joins) appended at the end.\n\nExample:\n  jsonjoin join data/customers.json data/orders.json -l cid -r customer_id -t full"
)]
pub struct JoinArgs {
    /// Left JSON file (use '-' for stdin)
    #[arg(value_name = "LEFT")]
    pub left: PathBuf,

    /// Right JSON file (use '-' for stdin)
    #[arg(value_name = "RIGHT")]
    pub right: PathBuf,

    /// Key field used on both sides
    #[arg(short = 'k', long = "key", value_name = "FIELD")]
    pub key: Option<String>,

    /// Key field of the left records (overrides --key)
    #[arg(short = 'l', long = "left-key", value_name = "FIELD")]
    pub left_key: Option<String>,

    /// Key field of the right records (overrides --key)
    #[arg(short = 'r', long = "right-key", value_name = "FIELD")]
    pub right_key: Option<String>,

    /// Join kind: inner, left, right or full (alias: outer)
    #[arg(short = 't', long = "type", value_name = "KIND", default_value = "inner")]
    pub kind: JoinKind,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write the result to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: JoinArgs) -> Result<()> {
    let (left_key, right_key) = resolve_keys(
        args.key.as_deref(),
        args.left_key.as_deref(),
        args.right_key.as_deref(),
    )?;

    if is_stdin(&args.left) && is_stdin(&args.right) {
        bail!("only one of LEFT and RIGHT can be read from stdin");
    }

    let left = load_records(&args.left)?;
    let right = load_records(&args.right)?;
    info!(
        "joining {} left and {} right records ({} join on {} = {})",
        left.len(),
        right.len(),
        args.kind,
        left_key,
        right_key
    );

    let joined = join(args.kind, &left, &right, &left_key, &right_key).with_context(|| {
        format!(
            "failed to join {} with {}",
            args.left.display(),
            args.right.display()
        )
    })?;
    debug!(
        merged = joined.stats.merged,
        right_only = joined.stats.right_only,
        left_only = joined.stats.left_only,
        left_keys = joined.stats.left_keys,
        "join finished"
    );

    let mut writer = output_writer(args.output.as_deref())?;
    write_records(&joined.records, args.format, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn resolve_keys(
    key: Option<&str>,
    left_key: Option<&str>,
    right_key: Option<&str>,
) -> Result<(String, String)> {
    let left = left_key
        .or(key)
        .context("no key for the left records: pass --key or --left-key")?;
    let right = right_key
        .or(key)
        .context("no key for the right records: pass --key or --right-key")?;
    if left.is_empty() || right.is_empty() {
        bail!("key field names must not be empty");
    }
    Ok((left.to_string(), right.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_key_applies_to_both_sides() {
        let keys = resolve_keys(Some("id"), None, None).unwrap();
        assert_eq!(keys, ("id".to_string(), "id".to_string()));
    }

    #[test]
    fn side_keys_override_shared_key() {
        let keys = resolve_keys(Some("id"), Some("cid"), None).unwrap();
        assert_eq!(keys, ("cid".to_string(), "id".to_string()));

        let keys = resolve_keys(None, Some("cid"), Some("customer_id")).unwrap();
        assert_eq!(keys, ("cid".to_string(), "customer_id".to_string()));
    }

    #[test]
    fn missing_side_key_is_rejected() {
        let err = resolve_keys(None, Some("cid"), None).unwrap_err();
        assert!(err.to_string().contains("right records"));
        assert!(resolve_keys(None, None, None).is_err());
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(resolve_keys(Some(""), None, None).is_err());
    }
}
