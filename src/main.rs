//! rowfilter - filter JSON rows with a typed filter expression

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use rowfilter::{Filter, Header, Variant};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// rowfilter - keep the rows matching a filter expression
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Filter expression, e.g. `qty >= 10 and contains(name, "an")`
    filter: String,

    /// JSON header file: an array of {"name", "affinity"} objects
    #[arg(short = 'H', long)]
    header: Option<PathBuf>,

    /// Extra column as name:affinity, appended after the header file columns
    #[arg(short, long = "column", value_name = "NAME:AFFINITY")]
    columns: Vec<String>,

    /// Rows as JSON lines, one array per row (stdin when omitted)
    #[arg(short, long)]
    rows: Option<PathBuf>,

    /// Print the compiled expression instead of filtering
    #[arg(short, long)]
    explain: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let header = build_header(args)?;
    let filter = Filter::compile(&args.filter, &header).context("Failed to compile filter")?;

    if args.explain {
        let affinity = filter
            .expression()
            .map(|expr| expr.affinity().to_string())
            .unwrap_or_else(|| "BOOLEAN".to_string());
        println!("{} : {}", filter, affinity);
        return Ok(());
    }
    if filter.is_empty() {
        log::info!("Empty filter, every row matches");
    }

    let reader: Box<dyn BufRead> = match &args.rows {
        Some(path) => Box::new(BufReader::new(
            File::open(path)
                .with_context(|| format!("Failed to open rows file {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let mut out = BufWriter::new(io::stdout().lock());

    let (total, matched) = filter_rows(&filter, &header, reader, &mut out)?;
    out.flush().context("Failed to write output")?;
    log::info!("{} of {} rows matched", matched, total);
    Ok(())
}

fn build_header(args: &Args) -> Result<Header> {
    let mut header = match &args.header {
        Some(path) => Header::load(path)?,
        None => Header::default(),
    };
    for column in &args.columns {
        header.push(Header::parse_column(column)?);
    }
    if header.is_empty() {
        bail!("No columns given; use --header or --column");
    }
    log::debug!(
        "Header: {}",
        header
            .iter()
            .map(|item| format!("{}:{}", item.name, item.affinity))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(header)
}

/// Write every matching row to `out`, returning (rows read, rows matched)
fn filter_rows(
    filter: &Filter,
    header: &Header,
    reader: impl BufRead,
    out: &mut impl Write,
) -> Result<(usize, usize)> {
    let mut total = 0;
    let mut matched = 0;

    for (number, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read rows")?;
        if line.trim().is_empty() {
            continue;
        }
        let raw: Vec<Variant> = serde_json::from_str(&line)
            .with_context(|| format!("Invalid row on line {}", number + 1))?;
        let row = header
            .conform(raw)
            .with_context(|| format!("Invalid row on line {}", number + 1))?;

        total += 1;
        if filter.matches(&row) {
            matched += 1;
            serde_json::to_writer(&mut *out, &row).context("Failed to write output")?;
            writeln!(out).context("Failed to write output")?;
        }
    }
    Ok((total, matched))
}
