use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(name = "printfleet", version, about = "Exercise the printer scheduling engine from the command line")]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,

    /// Path to a JSON file holding the fleet definition (a list of printers).
    #[clap(long, global = true)]
    pub fleet: PathBuf,

    /// Path to a JSON file holding the scorer weight vector; defaults to
    /// the engine's documented default weights when omitted.
    #[clap(long, global = true)]
    pub weights: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit an order (read from a JSON file) and print the assignment.
    Schedule {
        /// Path to a JSON file holding the order (print type -> requirement).
        #[clap(long)]
        order: PathBuf,

        /// Caller-supplied order id; a UUID is generated when omitted.
        #[clap(long)]
        order_id: Option<String>,

        /// Priority in [1, 10]; lower values are served first.
        #[clap(long, default_value_t = 5)]
        priority: u8,
    },

    /// Cancel a previously scheduled order, optionally scoped to one printer.
    Cancel {
        #[clap(long)]
        order_id: String,

        #[clap(long)]
        printer_id: Option<String>,
    },

    /// Apply a manual paper/ink delta to one printer and print its new status.
    Update {
        #[clap(long)]
        printer_id: String,

        /// Paper deltas as `kind=delta` pairs, e.g. `A4=-50,A3=10`.
        #[clap(long, value_delimiter = ',')]
        paper: Vec<String>,

        /// Ink deltas as `channel=delta` pairs, e.g. `black=-5.0`.
        #[clap(long, value_delimiter = ',')]
        ink: Vec<String>,
    },

    /// Mark a printer online or offline.
    SetOnline {
        #[clap(long)]
        printer_id: String,

        #[clap(long)]
        online: bool,
    },

    /// Print the current status of one printer.
    Status {
        #[clap(long)]
        printer_id: String,
    },

    /// Print fleet-wide totals.
    SystemStatus,
}

/// Parse a `key=value` delta list into `(key, value)` pairs. Shared by the
/// paper and ink delta flags; the caller picks the right numeric parser.
pub fn parse_deltas<T: std::str::FromStr>(raw: &[String]) -> anyhow::Result<Vec<(String, T)>>
where
    T::Err: std::fmt::Display,
{
    raw.iter()
        .map(|entry| {
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("expected `key=value`, got '{entry}'"))?;
            let value = value
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("invalid delta value in '{entry}': {e}"))?;
            Ok((key.to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_deltas() {
        let parsed: Vec<(String, i64)> = parse_deltas(&["A4=-50".to_string(), "A3=10".to_string()]).unwrap();
        assert_eq!(parsed, vec![("A4".to_string(), -50), ("A3".to_string(), 10)]);
    }

    #[test]
    fn rejects_entry_without_equals() {
        let err = parse_deltas::<i64>(&["A4-50".to_string()]).unwrap_err();
        assert!(err.to_string().contains("expected"));
    }
}
