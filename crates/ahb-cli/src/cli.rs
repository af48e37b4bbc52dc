//! CLI argument definitions for the AHB comparison tool.

use std::path::PathBuf;
use std::str::FromStr;

use ahb_model::FormatVersion;
use ahb_output::ExportFormat;
use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "ahb-diff",
    version,
    about = "Compare AHB tables across EDIFACT format versions",
    long_about = "Compare machine-readable AHB tables between format versions.\n\n\
                  Rows are aligned by section name and tagged as unchanged, modified,\n\
                  added or removed. Results are written as CSV and/or XLSX and can be\n\
                  cached in a SQLite database."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

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

impl Cli {
    /// Logging configuration from the global flags.
    ///
    /// `--log-level` beats `-v/-q`, which beat `RUST_LOG`. With `--color auto`,
    /// ANSI output is used only when logging to a terminal.
    pub fn log_config(&self, stderr_is_terminal: bool) -> LogConfig {
        let mut config = LogConfig::default()
            .with_level(self.verbosity.tracing_level_filter())
            .with_format(self.log_format.into())
            .with_log_file(self.log_file.clone())
            .with_ansi(match self.color.color {
                ColorChoice::Always => true,
                ColorChoice::Never => false,
                ColorChoice::Auto => self.log_file.is_none() && stderr_is_terminal,
            });
        if let Some(level) = self.log_level {
            config = config.with_explicit_level(level.into());
        } else if self.verbosity.is_present() {
            config = config.with_explicit_level(self.verbosity.tracing_level_filter());
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare every pruefid of consecutive (or, with --all-pairs, all) format version pairs.
    Batch(BatchArgs),

    /// Compare two pruefids across arbitrary format versions.
    Compare(CompareArgs),

    /// List format versions, or the pruefids of one format version.
    Versions(VersionsArgs),
}

#[derive(Args)]
pub struct InputArgs {
    /// Root directory with one subdirectory per format version
    /// (default: $AHB_DIFF_INPUT_DIR or data/machine-readable_anwendungshandbuecher).
    #[arg(long = "input-dir", value_name = "DIR")]
    pub input_dir: Option<PathBuf>,
}

impl InputArgs {
    pub fn root(&self) -> PathBuf {
        self.input_dir
            .clone()
            .unwrap_or_else(ahb_ingest::default_input_root)
    }
}

#[derive(Args)]
pub struct BatchArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory; results land in <DIR>/<subsequent>_<previous>/<message_format>/.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Output format to generate.
    #[arg(long = "format", value_enum, default_value = "both")]
    pub format: OutputFormatArg,

    /// Also store line results and summaries in this SQLite database.
    #[arg(long = "db", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Compare every older version with every newer one, not only neighbours.
    #[arg(long = "all-pairs")]
    pub all_pairs: bool,
}

#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory for the comparison files.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Older side of the comparison, as FORMAT_VERSION:PRUEFID (e.g. FV2410:55001).
    #[arg(long = "previous", value_name = "FV:PID")]
    pub previous: UnitRef,

    /// Newer side of the comparison, as FORMAT_VERSION:PRUEFID (e.g. FV2504:55001).
    #[arg(long = "subsequent", value_name = "FV:PID")]
    pub subsequent: UnitRef,

    /// Output format to generate.
    #[arg(long = "format", value_enum, default_value = "xlsx")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct VersionsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// List the pruefids of this format version instead of the versions.
    #[arg(long = "format-version", value_name = "FV")]
    pub format_version: Option<FormatVersion>,
}

/// One side of a single comparison: a pruefid within a format version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRef {
    pub format_version: FormatVersion,
    pub pruefid: String,
}

impl FromStr for UnitRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (version, pruefid) = s
            .split_once(':')
            .ok_or_else(|| format!("expected FORMAT_VERSION:PRUEFID, got '{s}'"))?;
        let format_version = FormatVersion::parse(version.trim()).map_err(|e| e.to_string())?;
        let pruefid = pruefid.trim();
        if pruefid.is_empty() {
            return Err(format!("missing pruefid in '{s}'"));
        }
        Ok(Self {
            format_version,
            pruefid: pruefid.to_string(),
        })
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Xlsx,
    Both,
}

impl From<OutputFormatArg> for ExportFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Csv => ExportFormat::Csv,
            OutputFormatArg::Xlsx => ExportFormat::Xlsx,
            OutputFormatArg::Both => ExportFormat::Both,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(value: LogLevelArg) -> Self {
        match value {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_ref_parses_version_and_pruefid() {
        let unit: UnitRef = "FV2504:55001".parse().unwrap();
        assert_eq!(unit.format_version.as_str(), "FV2504");
        assert_eq!(unit.pruefid, "55001");
    }

    #[test]
    fn unit_ref_rejects_malformed_input() {
        assert!("FV2504".parse::<UnitRef>().is_err());
        assert!("FV2504:".parse::<UnitRef>().is_err());
        assert!("2504:55001".parse::<UnitRef>().is_err());
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn default_logging_defers_to_rust_log() {
        let config = parse(&["ahb-diff", "versions"]).log_config(false);
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert!(!config.with_ansi);
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn log_level_flag_overrides_verbosity() {
        let cli = parse(&[
            "ahb-diff",
            "-v",
            "--log-level",
            "trace",
            "--log-format",
            "json",
            "versions",
        ]);
        let config = cli.log_config(true);
        assert_eq!(config.level_filter, LevelFilter::TRACE);
        assert!(!config.use_env_filter);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn verbosity_disables_env_filter() {
        let config = parse(&["ahb-diff", "-v", "versions"]).log_config(true);
        assert_eq!(config.level_filter, LevelFilter::INFO);
        assert!(!config.use_env_filter);
        assert!(config.with_ansi);
    }

    #[test]
    fn log_file_disables_automatic_color() {
        let cli = parse(&["ahb-diff", "--log-file", "ahb.log", "versions"]);
        let config = cli.log_config(true);
        assert!(!config.with_ansi);
        assert_eq!(config.log_file, Some(PathBuf::from("ahb.log")));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
