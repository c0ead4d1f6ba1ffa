//! Demo application counting against a reference and printing the diff.
//!
//! Run with:
//! ```bash
//! cargo run --example diff_demo --features demo -- \
//!     --reference apples=3,pears=1 --add apples:2 --add plums --compare
//! ```

use clap::{Parser, ValueEnum};
use tally::counter::{AddOptions, Counter};
use tally::diff::{Diff, DiffOptions};
use tally::observers::json::JsonObserver;
use tally::observers::table::{TableObserver, TableStyle};

/// Output format for the diff.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Pretty ASCII table
    Table,
    /// JSON format
    Json,
}

/// Table style selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StyleChoice {
    Ascii,
    #[default]
    Rounded,
    Sharp,
    Modern,
    Markdown,
    Dots,
    Blank,
}

impl From<StyleChoice> for TableStyle {
    fn from(choice: StyleChoice) -> Self {
        match choice {
            StyleChoice::Ascii => TableStyle::Ascii,
            StyleChoice::Rounded => TableStyle::Rounded,
            StyleChoice::Sharp => TableStyle::Sharp,
            StyleChoice::Modern => TableStyle::Modern,
            StyleChoice::Markdown => TableStyle::Markdown,
            StyleChoice::Dots => TableStyle::Dots,
            StyleChoice::Blank => TableStyle::Blank,
        }
    }
}

/// Demo application for tally - counters bounded by a reference.
///
/// Builds a counter from `--count` and `--reference`, applies every `--add`,
/// then prints the diff against the reference or against `--against`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Initial counts, as id=qty pairs
    #[arg(long, value_delimiter = ',', value_parser = parse_count)]
    count: Vec<(String, i64)>,

    /// Reference counts bounding every add, as id=qty pairs
    #[arg(long, value_delimiter = ',', value_parser = parse_count)]
    reference: Option<Vec<(String, i64)>>,

    /// Diff against these counts instead of the reference, as id=qty pairs
    #[arg(long, value_delimiter = ',', value_parser = parse_count)]
    against: Option<Vec<(String, i64)>>,

    /// Add to an id, as id or id:qty (repeatable)
    #[arg(long, value_parser = parse_add)]
    add: Vec<(String, i64)>,

    /// Ignore the reference when adding
    #[arg(long)]
    force: bool,

    /// Report identifiers with equal quantities too
    #[arg(long)]
    compare: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Table style
    #[arg(short, long, value_enum, default_value = "rounded")]
    style: StyleChoice,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Include timestamp in JSON output
    #[arg(long)]
    timestamp: bool,
}

fn parse_count(s: &str) -> Result<(String, i64), String> {
    let (id, qty) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid id=qty pair: no `=` found in `{}`", s))?;
    let qty = qty
        .parse()
        .map_err(|e| format!("invalid quantity in `{}`: {}", s, e))?;
    Ok((id.to_string(), qty))
}

fn parse_add(s: &str) -> Result<(String, i64), String> {
    match s.split_once(':') {
        Some((id, qty)) => {
            let qty = qty
                .parse()
                .map_err(|e| format!("invalid quantity in `{}`: {}", s, e))?;
            Ok((id.to_string(), qty))
        }
        None => Ok((s.to_string(), 1)),
    }
}

/// Renders the diff in the requested format.
fn render_output(args: &Args, diff: &Diff) -> String {
    match args.format {
        OutputFormat::Table => TableObserver::new()
            .with_style(args.style.into())
            .render_diff(diff),
        OutputFormat::Json => JsonObserver::new()
            .pretty(args.pretty)
            .include_timestamp(args.timestamp)
            .diff_to_json(diff)
            .unwrap_or_else(|e| format!("Error: {}", e)),
    }
}

fn main() {
    let args = Args::parse();

    let mut counter: Counter = match &args.reference {
        Some(reference) => Counter::with_reference(args.count.clone(), reference.clone()),
        None => Counter::from_counts(args.count.clone()),
    };

    for (id, qty) in &args.add {
        let options = AddOptions::new().qty(*qty).force(args.force);
        if !counter.add_with(id, options) {
            eprintln!("rejected: {} +{} exceeds the reference", id, qty);
        }
    }

    eprintln!("{}", TableObserver::new().render_counter(&counter));

    let options = DiffOptions::new().include_same(args.compare);
    let diff = match &args.against {
        Some(against) => counter.diff_against(&Counter::from_counts(against.clone()), options),
        None => match counter.diff(options) {
            Ok(diff) => diff,
            Err(e) => {
                eprintln!("Error [{}]: {}", e.code(), e);
                std::process::exit(1);
            }
        },
    };

    println!("{}", render_output(&args, &diff));
}
