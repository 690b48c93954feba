use std::io::{self, Write};

use anyhow::Result;
use siga_cli::SigaConfig;
use siga_core::LabelFallback;
use tabwriter::TabWriter;

pub fn handle(config: &SigaConfig) -> Result<()> {
    let normalizer = config.normalizer();
    let table = normalizer.table();

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "Code\tLabel\tColor")?;
    for code in table.codes() {
        let label = table.label_for(code);
        let color = table.color_for(&label).unwrap_or("-");
        writeln!(writer, "{code}\t{label}\t{color}")?;
    }
    writer.flush()?;

    let policy = match table.fallback {
        LabelFallback::EchoCode => "unknown codes are shown as-is".to_string(),
        LabelFallback::Sentinel => format!(
            "unknown codes are shown as '{}'",
            table.sentinel_label()
        ),
    };
    println!("\nFallback: {policy}");
    Ok(())
}
