//! jsonflat: Flatten nested JSON into single-level rows
//!
//! Usage:
//!   # Read from file, output flat JSON to stdout
//!   jsonflat data.json
//!
//!   # Read from stdin
//!   echo '{"id": 1, "user": {"name": "Ann"}}' | jsonflat
//!
//!   # Process NDJSON, drop nulls, emit INSERT statements
//!   jsonflat --ndjson --ignore-null --format sql --table events events.jsonl
//!
//! Set RUST_LOG=debug to see diagnostics on stderr.

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use jsonflat::{DatabaseRow, FlatMap, FlatWriter, FlattenConfig, Flattener, SqlWriter};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jsonflat")]
#[command(about = "Flatten nested JSON into single-level rows", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one JSON document per line)
    #[arg(long)]
    ndjson: bool,

    /// Don't treat a top-level array as a stream of records
    #[arg(long)]
    no_ignore_array: bool,

    /// TOML file with max_depth / ignore_null settings
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<String>,

    /// Maximum nesting depth to descend into (default: 100)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Drop null leaves instead of emitting them
    #[arg(long)]
    ignore_null: bool,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Table name for --format sql
    #[arg(long, short = 't')]
    table: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One flat JSON object per record
    Json,
    /// One INSERT statement per record
    Sql,
    /// Headers and SQL literals per record, as JSON
    Row,
}

/// Destination for flattened records
enum Output<W: Write> {
    Json(FlatWriter<W>),
    Sql(SqlWriter<W>),
    Row(W),
}

impl<W: Write> Output<W> {
    fn write_record(&mut self, record: &FlatMap) -> Result<()> {
        match self {
            Output::Json(writer) => writer.write_record(record),
            Output::Sql(writer) => writer.write_record(record),
            Output::Row(writer) => {
                let row = DatabaseRow::from_flat(record);
                let json = serde_json::to_string(&row).context("Failed to serialize row")?;
                writeln!(writer, "{}", json).context("Failed to write row")?;
                Ok(())
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        match self {
            Output::Json(writer) => writer.flush(),
            Output::Sql(writer) => writer.flush(),
            Output::Row(writer) => writer.flush().context("Failed to flush writer"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Build config: file first, flags override
    let mut config = match &args.config {
        Some(path) => FlattenConfig::load(path)?,
        None => FlattenConfig::default(),
    };
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    if args.ignore_null {
        config.ignore_null = true;
    }
    debug!(?config, "flatten configuration");

    let stdout = std::io::stdout().lock();
    let mut output = match args.format {
        OutputFormat::Json => Output::Json(FlatWriter::new(stdout)),
        OutputFormat::Row => Output::Row(stdout),
        OutputFormat::Sql => {
            let Some(table) = args.table.clone() else {
                bail!("--format sql requires --table");
            };
            Output::Sql(SqlWriter::new(stdout, table))
        }
    };

    let reader = if let Some(file_path) = &args.input {
        let file = File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?;
        Box::new(BufReader::new(file)) as Box<dyn Read>
    } else {
        Box::new(std::io::stdin()) as Box<dyn Read>
    };

    let flattener = Flattener::new(config);
    let count = process_reader(reader, &flattener, &args, &mut output)?;
    output.flush()?;

    info!(records = count, "flattening complete");
    Ok(())
}

/// Flatten every record in the input using SIMD-accelerated parsing when possible
fn process_reader<W: Write>(
    reader: Box<dyn Read>,
    flattener: &Flattener,
    args: &Args,
    output: &mut Output<W>,
) -> Result<usize> {
    let mut content = Vec::new();
    let mut buf_reader = BufReader::new(reader);
    buf_reader
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    let text = std::str::from_utf8(&content).context("Input is not valid UTF-8")?;
    if text.trim().is_empty() {
        return Ok(0);
    }

    if args.ndjson {
        return process_lines(text, flattener, output);
    }

    // simd-json parses in place, so keep the original bytes for the fallback
    let mut scratch = content.clone();
    match simd_json::serde::from_slice::<Value>(&mut scratch) {
        Ok(Value::Array(arr)) if !args.no_ignore_array => {
            let mut count = 0;
            for elem in arr {
                flatten_record(elem, flattener, output)?;
                count += 1;
            }
            Ok(count)
        }
        Ok(value) => {
            flatten_record(value, flattener, output)?;
            Ok(1)
        }
        Err(err) => {
            // Fallback to serde_json for NDJSON or malformed input
            debug!(error = %err, "input is not a single JSON document, reading lines");
            if !first_line_is_document(text) {
                // Not NDJSON either: report where the document itself breaks
                let detail = serde_json::from_str::<Value>(text)
                    .err()
                    .map_or_else(|| err.to_string(), |e| e.to_string());
                bail!("Failed to parse JSON document: {}", detail);
            }
            process_lines(text, flattener, output)
        }
    }
}

/// True when the first non-blank line parses as JSON on its own
fn first_line_is_document(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .is_some_and(|line| serde_json::from_str::<serde::de::IgnoredAny>(line).is_ok())
}

fn process_lines<W: Write>(
    text: &str,
    flattener: &Flattener,
    output: &mut Output<W>,
) -> Result<usize> {
    let mut count = 0;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse JSON on line {}", line_no + 1))?;
        flatten_record(value, flattener, output)
            .with_context(|| format!("Failed to flatten record on line {}", line_no + 1))?;
        count += 1;
    }

    Ok(count)
}

fn flatten_record<W: Write>(
    value: Value,
    flattener: &Flattener,
    output: &mut Output<W>,
) -> Result<()> {
    let record = flattener.flatten(value)?;
    output.write_record(&record)
}
