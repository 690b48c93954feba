use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use siga_cli::{SigaConfig, SummaryBy};
use siga_core::summary::{filter_by_codes, power_by_label, power_by_state};
use tabwriter::TabWriter;

use crate::commands::util::{load_batch, parse_types};

pub fn handle(
    config: &SigaConfig,
    input: &Path,
    by: SummaryBy,
    types: Option<&str>,
    json: bool,
    encoding: Option<&str>,
) -> Result<()> {
    let batch = load_batch(input, config, encoding, false)?;
    let selected = filter_by_codes(&batch.records, &parse_types(types));

    let totals = match by {
        SummaryBy::State => power_by_state(selected.iter().copied()),
        SummaryBy::Type => power_by_label(selected.iter().copied()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
        return Ok(());
    }

    let heading = match by {
        SummaryBy::State => "State",
        SummaryBy::Type => "Type",
    };
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "{heading}\tFacilities\tPower (kW)")?;
    for total in &totals {
        writeln!(
            writer,
            "{}\t{}\t{:.2}",
            total.key, total.facilities, total.power_kw
        )?;
    }
    writer.flush()?;
    Ok(())
}
