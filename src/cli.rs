//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{enrich, top_n, validate_config};
use crate::domain::equity::EquityReference;
use crate::domain::error::OverlapError;
use crate::domain::merge::Membership;
use crate::domain::overlap::{EtfOverlapCalculator, OverlapReport, OverlapRow};
use crate::ports::config_port::ConfigPort;
use crate::ports::equity_port::EquityPort;
use crate::ports::holdings_port::HoldingsPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "etf-overlap", about = "Compare the holdings of two ETFs")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare two ETFs and show their overlapping holdings
    Compare {
        #[arg(short, long)]
        config: PathBuf,
        etf_a: String,
        etf_b: String,
        /// Overlapping holdings to show per ETF (overrides [report] top_n)
        #[arg(long)]
        top: Option<usize>,
        /// Write the lesser ETF's full overlap table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the normalized holdings of one ETF
    Holdings {
        #[arg(short, long)]
        config: PathBuf,
        etf: String,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Options for one `compare` run, resolved from CLI flags and config.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub etf_a: String,
    pub etf_b: String,
    pub top_n: usize,
    pub enrich: bool,
    pub output: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Compare {
            config,
            etf_a,
            etf_b,
            top,
            output,
        } => run_compare(&config, &etf_a, &etf_b, top, output),
        Command::Holdings { config, etf } => run_holdings(&config, &etf),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn load_validated(path: &PathBuf) -> Result<(FileConfigAdapter, CsvAdapter), ExitCode> {
    tracing::info!(path = %path.display(), "loading config");
    let config = load_config(path)?;
    let data = validate_config(&config)
        .and_then(|()| CsvAdapter::from_config(&config))
        .map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        })?;
    Ok((config, data))
}

/// `compare` options from the command line, falling back to config values.
pub fn build_compare_options(
    config: &dyn ConfigPort,
    etf_a: &str,
    etf_b: &str,
    top: Option<usize>,
    output: Option<PathBuf>,
) -> CompareOptions {
    CompareOptions {
        etf_a: etf_a.trim().to_uppercase(),
        etf_b: etf_b.trim().to_uppercase(),
        top_n: top.filter(|n| *n > 0).unwrap_or_else(|| top_n(config)),
        enrich: enrich(config),
        output,
    }
}

fn run_compare(
    config_path: &PathBuf,
    etf_a: &str,
    etf_b: &str,
    top: Option<usize>,
    output: Option<PathBuf>,
) -> ExitCode {
    let (config, data) = match load_validated(config_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let options = build_compare_options(&config, etf_a, etf_b, top, output);

    match run_compare_pipeline(&data, &data, &CsvReportAdapter::new(), &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Run a comparison against the given ports and print the summary to stdout.
pub fn run_compare_pipeline(
    holdings: &dyn HoldingsPort,
    equities: &dyn EquityPort,
    report_port: &dyn ReportPort,
    options: &CompareOptions,
) -> Result<(), OverlapError> {
    let calculator = EtfOverlapCalculator::new(holdings, EquityReference::new(equities));
    let report = calculator.compare(&options.etf_a, &options.etf_b)?;

    println!("{}", format_summary(&report)?);

    for etf in [report.lesser(), report.greater()] {
        let rows = if options.enrich {
            calculator.top_overlap_holdings(&report, etf, options.top_n)?
        } else {
            let mut rows = report.ranked_overlap(etf)?;
            rows.truncate(options.top_n);
            rows
        };
        println!();
        println!("Top {} overlapping holdings by weight in {}:", options.top_n, etf);
        print!("{}", format_rows(&rows));
    }

    if let Some(path) = &options.output {
        let etf = report.lesser();
        let rows = if options.enrich {
            calculator.overlap_holdings(&report, etf)?
        } else {
            report.ranked_overlap(etf)?
        };
        report_port.write(etf, &rows, &path.display().to_string())?;
        tracing::info!(path = %path.display(), rows = rows.len(), "overlap report written");
    }

    Ok(())
}

pub fn format_summary(report: &OverlapReport) -> Result<String, OverlapError> {
    let merged = &report.merged;
    let mut out = String::new();
    out.push_str(&format!("=== {} vs {} ===\n", report.etf_a(), report.etf_b()));
    out.push_str(&format!(
        "Holdings:        {} shared, {} only in {}, {} only in {}\n",
        merged.count(Membership::Both),
        merged.count(Membership::OnlyA),
        report.etf_a(),
        merged.count(Membership::OnlyB),
        report.etf_b(),
    ));
    out.push_str(&format!(
        "Total shares:    {} {:.0}, {} {:.0}\n",
        report.etf_a(),
        report.size.total_shares_a,
        report.etf_b(),
        report.size.total_shares_b,
    ));
    out.push_str(&format!(
        "Greater / lesser: {} / {}\n",
        report.greater(),
        report.lesser()
    ));
    for etf in [report.etf_a(), report.etf_b()] {
        out.push_str(&format!(
            "Overlap in {}: {:.0}%\n",
            etf,
            report.overlap_percent(etf)? * 100.0
        ));
    }
    Ok(out)
}

pub fn format_rows(rows: &[OverlapRow]) -> String {
    if rows.is_empty() {
        return "  (no overlapping holdings)\n".to_string();
    }
    rows.iter()
        .map(|r| {
            format!(
                "  {:<8} {:<32} {:>7.2}% {:>14.0}  {} / {} / {}\n",
                r.symbol,
                r.name,
                r.percent * 100.0,
                r.shares,
                r.sector.as_deref().unwrap_or("-"),
                r.industry.as_deref().unwrap_or("-"),
                r.country.as_deref().unwrap_or("-"),
            )
        })
        .collect()
}

fn run_holdings(config_path: &PathBuf, etf: &str) -> ExitCode {
    let (_config, data) = match load_validated(config_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let etf = etf.trim().to_uppercase();
    let calculator = EtfOverlapCalculator::new(&data, EquityReference::new(&data));
    let rows = match calculator.load_holdings(&etf) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for row in &rows {
        println!(
            "{:<8} {:<32} {:>7.2}% {:>14.0}",
            row.symbol,
            row.name,
            row.percent * 100.0,
            row.shares
        );
    }
    eprintln!("{} holdings in {}", rows.len(), etf);
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let (config, _data) = match load_validated(config_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    eprintln!("Configuration is valid (top_n = {}).", top_n(&config));
    ExitCode::SUCCESS
}
