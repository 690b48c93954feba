use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap_complete::{generate, Shell};
use siga_cli::build_cli_command;

pub fn handle(shell: Shell, out: Option<&Path>) -> Result<()> {
    let mut command = build_cli_command();
    match out {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("creating completion script '{}'", path.display()))?;
            generate(shell, &mut command, "siga", &mut file);
        }
        None => generate(shell, &mut command, "siga", &mut io::stdout()),
    }
    Ok(())
}
