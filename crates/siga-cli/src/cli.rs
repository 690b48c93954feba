use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "siga", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level (overrides `logging.level` in the config file)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Path to a siga.toml configuration file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Worker threads for parallel normalization ("auto" = all cores)
    #[arg(long, global = true, default_value = "auto")]
    pub threads: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a SIGA export and write it back as CSV
    Normalize {
        /// SIGA CSV export (semicolon-delimited)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Output CSV file (stdout when omitted)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Source encoding (latin1 or utf8)
        #[arg(long)]
        encoding: Option<String>,
        /// Write per-field fallback diagnostics as JSON
        #[arg(long, value_hint = ValueHint::FilePath)]
        diagnostics: Option<PathBuf>,
    },
    /// Normalize a SIGA export and replace the stored table with it
    Import {
        /// SIGA CSV export (semicolon-delimited)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Store directory (created if missing; previous contents are replaced)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        store: PathBuf,
        /// Source encoding (latin1 or utf8)
        #[arg(long)]
        encoding: Option<String>,
    },
    /// Total canonical power grouped by state or generation type
    Summary {
        /// SIGA CSV export (semicolon-delimited)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Grouping key
        #[arg(long, value_enum, default_value_t = SummaryBy::State)]
        by: SummaryBy,
        /// Comma-separated generation-type codes to keep (e.g. "UHE,EOL")
        #[arg(long)]
        types: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Source encoding (latin1 or utf8)
        #[arg(long)]
        encoding: Option<String>,
    },
    /// Export facilities that have both coordinates
    Map {
        /// SIGA CSV export (semicolon-delimited)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Output format (inferred from the output extension when omitted)
        #[arg(long, value_enum)]
        format: Option<MapFormat>,
        /// Comma-separated generation-type codes to keep (e.g. "UHE,EOL")
        #[arg(long)]
        types: Option<String>,
        /// Source encoding (latin1 or utf8)
        #[arg(long)]
        encoding: Option<String>,
    },
    /// Show the active generation-type code table
    Codes,
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SummaryBy {
    /// Group by state code (SigUFPrincipal)
    State,
    /// Group by generation-type label
    Type,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MapFormat {
    Csv,
    Json,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
