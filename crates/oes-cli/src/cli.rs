//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "oes-drift",
    version,
    about = "ICP-OES drift correction and CRM verification",
    long_about = "Detect instrument drift in ICP-OES acquisition runs using\n\
                  interspersed reference material (RM) measurements, correct\n\
                  sample values, and verify CRM recoveries against certificate\n\
                  tolerances."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan a run CSV for reference points and print the segment table.
    Scan(ScanArgs),

    /// Scan, optimize, and apply drift corrections for one reference group.
    Correct(CorrectArgs),

    /// Verify CRM recoveries against certificate tolerances.
    Verify(VerifyArgs),
}

#[derive(Parser)]
pub struct ScanArgs {
    /// Path to the run CSV (Solution Label column plus element columns).
    #[arg(value_name = "RUN_CSV")]
    pub run_csv: PathBuf,

    /// Keyword identifying reference rows by label prefix.
    #[arg(long = "keyword", default_value = "RM")]
    pub keyword: String,
}

#[derive(Parser)]
pub struct CorrectArgs {
    /// Path to the run CSV.
    #[arg(value_name = "RUN_CSV")]
    pub run_csv: PathBuf,

    /// Element column to correct.
    #[arg(long = "element", value_name = "NAME")]
    pub element: String,

    /// Reference group number; defaults to the lowest scanned group.
    #[arg(long = "reference", value_name = "N")]
    pub reference: Option<i64>,

    /// Keyword identifying reference rows by label prefix.
    #[arg(long = "keyword", default_value = "RM")]
    pub keyword: String,

    /// Optimization applied to reference current values before the commit.
    #[arg(long = "optimize", value_enum, default_value = "none")]
    pub optimize: OptimizeArg,

    /// Optimize over the whole run instead of per segment.
    #[arg(long = "global")]
    pub global: bool,

    /// Interpolate ratios stepwise across each interval.
    #[arg(long = "stepwise")]
    pub stepwise: bool,

    /// Write the change-log as JSON to this path.
    #[arg(long = "json", value_name = "PATH")]
    pub json: Option<PathBuf>,
}

#[derive(Parser)]
pub struct VerifyArgs {
    /// Path to the run CSV.
    #[arg(value_name = "RUN_CSV")]
    pub run_csv: PathBuf,

    /// Element column to verify.
    #[arg(long = "element", value_name = "NAME")]
    pub element: String,

    /// Certified concentration from the CRM certificate.
    #[arg(long = "certified", value_name = "VALUE")]
    pub certified: f64,

    /// Label prefix identifying CRM rows (case-insensitive).
    #[arg(long = "crm-label", default_value = "CRM")]
    pub crm_label: String,

    /// Label prefix identifying blank rows (case-insensitive).
    #[arg(long = "blank-label", default_value = "Blank")]
    pub blank_label: String,

    /// Absolute tolerance half-width for certified values below 10.
    #[arg(long = "range-low", default_value_t = 2.0)]
    pub range_low: f64,

    /// Percent tolerance for certified values in [10, 100).
    #[arg(long = "range-mid", default_value_t = 20.0)]
    pub range_mid: f64,

    /// Percent tolerance for certified values in [100, 1000).
    #[arg(long = "range-high1", default_value_t = 10.0)]
    pub range_high1: f64,

    /// Percent tolerance for certified values in [1000, 10000).
    #[arg(long = "range-high2", default_value_t = 8.0)]
    pub range_high2: f64,

    /// Percent tolerance for certified values in [10000, 100000).
    #[arg(long = "range-high3", default_value_t = 5.0)]
    pub range_high3: f64,

    /// Percent tolerance for certified values of 100000 and above.
    #[arg(long = "range-high4", default_value_t = 3.0)]
    pub range_high4: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptimizeArg {
    /// Leave current values as scanned.
    None,
    /// Flatten every point to the first point's value.
    Flat,
    /// Remove the drift trend by regression.
    ZeroSlope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
