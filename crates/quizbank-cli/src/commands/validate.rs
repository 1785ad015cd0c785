//! The `quizbank validate` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use quizbank_core::markup::parse_markup;
use quizbank_core::remote::parse_remote;
use quizbank_core::validate::{validate_quiz, ValidationWarning};
use quizbank_core::Quiz;

/// Machine-readable output of `validate --json`.
#[derive(Serialize)]
struct ValidationReport<'a> {
    quiz: &'a Quiz,
    warnings: &'a [ValidationWarning],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Markup,
    Json,
}

impl Format {
    fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "markup" | "xml" => Ok(Format::Markup),
            "json" => Ok(Format::Json),
            other => anyhow::bail!("unknown format '{other}' (expected markup or json)"),
        }
    }

    fn infer(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xml") => Ok(Format::Markup),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
            _ => anyhow::bail!(
                "cannot infer format of {}; pass --format markup|json",
                path.display()
            ),
        }
    }
}

pub fn execute(file: PathBuf, format: Option<String>, json: bool) -> Result<()> {
    let format = match format {
        Some(name) => Format::parse(&name)?,
        None => Format::infer(&file)?,
    };
    tracing::debug!(file = %file.display(), ?format, "validating quiz");

    let bytes =
        std::fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;
    let quiz = parse(format, &bytes).with_context(|| format!("invalid quiz: {}", file.display()))?;
    let warnings = validate_quiz(&quiz);

    if json {
        let report = ValidationReport {
            quiz: &quiz,
            warnings: &warnings,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Quiz: {} ({} questions)", quiz.title(), quiz.len());
    for w in &warnings {
        let prefix = w
            .question_index
            .map(|i| format!("  [question {}]", i + 1))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Quiz is valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}

fn parse(format: Format, bytes: &[u8]) -> Result<Quiz> {
    let parsed = match format {
        Format::Markup => {
            let text = std::str::from_utf8(bytes).context("markup is not valid UTF-8")?;
            parse_markup(text)
        }
        Format::Json => parse_remote(bytes),
    };
    parsed.map_err(|e| anyhow::anyhow!(e.user_message()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizbank_core::catalog::{SAMPLE_MARKUP, SAMPLE_REMOTE_JSON};

    #[test]
    fn format_inference() {
        assert_eq!(Format::infer(Path::new("a/quiz.XML")).unwrap(), Format::Markup);
        assert_eq!(Format::infer(Path::new("quiz.json")).unwrap(), Format::Json);
        assert!(Format::infer(Path::new("quiz.txt")).is_err());
        assert_eq!(Format::parse("xml").unwrap(), Format::Markup);
        assert!(Format::parse("yaml").is_err());
    }

    #[test]
    fn parses_both_formats() {
        let quiz = parse(Format::Markup, SAMPLE_MARKUP.as_bytes()).unwrap();
        assert_eq!(quiz.title(), "Geology Basics");

        let quiz = parse(Format::Json, SAMPLE_REMOTE_JSON.as_bytes()).unwrap();
        assert_eq!(quiz.len(), 4);
    }

    #[test]
    fn json_report_shape() {
        let quiz = parse(Format::Markup, SAMPLE_MARKUP.as_bytes()).unwrap();
        let warnings = vec![ValidationWarning {
            question_index: Some(1),
            message: "duplicate option: Quartz".into(),
        }];
        let report = ValidationReport {
            quiz: &quiz,
            warnings: &warnings,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["quiz"]["title"], "Geology Basics");
        assert_eq!(json["quiz"]["questions"][1]["correct_index"], 2);
        assert_eq!(json["quiz"]["questions"][0]["options"][0], "Basalt");
        assert_eq!(json["warnings"][0]["question_index"], 1);
    }

    #[test]
    fn load_errors_use_user_message() {
        let err = parse(Format::Markup, b"<quiz></quiz>").unwrap_err();
        assert_eq!(err.to_string(), "The quiz does not contain any questions");
    }
}
