pub mod cli;
pub mod config;

pub use cli::{build_cli_command, Cli, Commands, MapFormat, SummaryBy};
pub use config::{load_siga_config, SigaConfig};
