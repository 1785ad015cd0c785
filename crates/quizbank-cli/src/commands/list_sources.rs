//! The `quizbank list-sources` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizbank_sources::{check_sources, load_config_from, QuizbankConfig};

pub async fn execute(config_path: Option<PathBuf>, check: bool) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    tracing::debug!(sources = config.sources.len(), check, "listing sources");

    if check {
        run_checks(&config).await
    } else {
        println!("{}", sources_table(&config));
        Ok(())
    }
}

fn sources_table(config: &QuizbankConfig) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Name", "Type", "Location", "Default"]);

    for name in config.source_names() {
        let Some(source) = config.sources.get(name) else {
            continue;
        };
        let default = if name == config.default_source { "*" } else { "" };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(source.kind()),
            Cell::new(source.location()),
            Cell::new(default),
        ]);
    }
    table
}

async fn run_checks(config: &QuizbankConfig) -> Result<()> {
    let results = check_sources(config).await;

    let mut table = Table::new();
    table.set_header(vec!["Name", "Loader", "Status", "Time"]);
    for result in &results {
        let status = match &result.outcome {
            Ok(count) => format!("OK ({count} questions)"),
            Err(e) => format!("FAIL: {e}"),
        };
        table.add_row(vec![
            Cell::new(&result.name),
            Cell::new(&result.describe),
            Cell::new(status),
            Cell::new(format!("{}ms", result.duration_ms)),
        ]);
    }
    println!("{table}");

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    tracing::info!(checked = results.len(), failed, "source check finished");
    anyhow::ensure!(failed == 0, "{failed} of {} source(s) failed", results.len());
    println!("All {} sources OK.", results.len());
    Ok(())
}
