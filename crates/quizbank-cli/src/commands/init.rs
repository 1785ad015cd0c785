//! The `quizbank init` command.

use std::path::Path;

use anyhow::{Context, Result};

use quizbank_core::catalog::SAMPLE_MARKUP;

pub fn execute() -> Result<()> {
    write_starter(Path::new("."))?;

    println!("\nNext steps:");
    println!("  1. Run: quizbank validate --file assets/geology1.xml");
    println!("  2. Run: quizbank list-sources --check");
    println!("  3. Run: quizbank play --source geology");

    Ok(())
}

fn write_starter(root: &Path) -> Result<()> {
    write_if_missing(root, "quizbank.toml", SAMPLE_CONFIG)?;

    std::fs::create_dir_all(root.join("assets")).context("failed to create assets/")?;
    write_if_missing(root, "assets/geology1.xml", SAMPLE_MARKUP)?;
    Ok(())
}

fn write_if_missing(root: &Path, relative: &str, content: &str) -> Result<()> {
    let path = root.join(relative);
    if path.exists() {
        println!("{relative} already exists, skipping.");
    } else {
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {relative}");
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizbank configuration

default_source = "geology"
asset_dir = "./assets"
http_timeout_secs = 30

[sources.geology]
type = "markup"
asset = "geology1.xml"

# Simulated remote endpoint serving the sample science quiz.
[sources.science-demo]
type = "canned"
delay_ms = 2000

# [sources.science-online]
# type = "remote"
# url = "${QUIZBANK_SCIENCE_URL}"
"#;
