//! The `quizbank play` command.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizbank_core::session::ScreenView;
use quizbank_core::summary::QuizResult;
use quizbank_core::{Advance, ContentLoader, LoadOutcome, Question, QuizSession};
use quizbank_sources::{create_loader, load_config_from};

pub async fn execute(
    source: Option<String>,
    config_path: Option<PathBuf>,
    save_result: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let name = source.unwrap_or_else(|| config.default_source.clone());
    let loader = create_loader(&name, config.source(&name)?, &config)?;
    tracing::info!(source = %name, loader = %loader.describe(), "starting quiz");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(
        loader,
        &mut stdin.lock(),
        &mut stdout.lock(),
        save_result.as_deref(),
    )
    .await
}

/// Drive one session over line-oriented input until the user leaves.
async fn run<R: BufRead, W: Write>(
    loader: Arc<dyn ContentLoader>,
    input: &mut R,
    out: &mut W,
    save_result: Option<&Path>,
) -> Result<()> {
    let session = QuizSession::new();
    writeln!(out, "Loading quiz...")?;
    out.flush()?;

    match session.request_load(loader)?.wait().await {
        LoadOutcome::Ready { .. } => {}
        LoadOutcome::Failed(_) => anyhow::bail!("{}", session.snapshot().error_message()),
        other => anyhow::bail!("quiz load did not complete: {other:?}"),
    }
    show_title(out, &session)?;

    loop {
        let state = session.snapshot();
        match state.view() {
            ScreenView::InProgress {
                quiz,
                index,
                question,
                is_last,
                ..
            } => {
                show_question(out, index, quiz.len(), question)?;

                let Some(line) = prompt(input, out, &answer_prompt(question, is_last))? else {
                    return Ok(());
                };
                if line.eq_ignore_ascii_case("m") {
                    session.back_to_menu();
                    writeln!(out, "Back to menu.")?;
                    return Ok(());
                }

                let Some(choice) = parse_choice(&line, question.options().len()) else {
                    writeln!(
                        out,
                        "Please enter a number between 1 and {}.",
                        question.options().len()
                    )?;
                    continue;
                };
                session.select_answer(choice)?;
                match session.advance()? {
                    Advance::Next { correct } | Advance::Completed { correct, .. } => {
                        show_feedback(out, question, correct)?
                    }
                    Advance::Ignored => {}
                }
            }
            ScreenView::Completed { .. } => {
                if let Some(result) = state.result() {
                    show_result(out, &result)?;
                    if let Some(path) = save_result {
                        save_json(&result, path)?;
                        writeln!(out, "Result saved to {}", path.display())?;
                    }
                }
                let Some(line) = prompt(input, out, "Press r to restart, Enter to exit: ")? else {
                    return Ok(());
                };
                if !line.eq_ignore_ascii_case("r") {
                    return Ok(());
                }
                session.restart()?;
                show_title(out, &session)?;
            }
            ScreenView::Error { message } => anyhow::bail!("{message}"),
            ScreenView::Menu | ScreenView::Loading => return Ok(()),
        }
    }
}

/// Save a result as pretty-printed JSON, replacing any earlier round.
fn save_json(result: &QuizResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("failed to serialize result")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write result to {}", path.display()))?;
    tracing::debug!(path = %path.display(), "saved result");
    Ok(())
}

fn show_title<W: Write>(out: &mut W, session: &QuizSession) -> Result<()> {
    if let Some(quiz) = session.snapshot().quiz() {
        writeln!(out, "\n=== {} ===", quiz.title())?;
    }
    Ok(())
}

fn answer_prompt(question: &Question, is_last: bool) -> String {
    let action = if is_last { "finish" } else { "next question" };
    format!(
        "Your answer (1-{}, m for menu; {action}): ",
        question.options().len()
    )
}

/// Map a 1-based option number to an index.
fn parse_choice(line: &str, options: usize) -> Option<usize> {
    match line.parse::<usize>() {
        Ok(n) if (1..=options).contains(&n) => Some(n - 1),
        _ => None,
    }
}

/// Print `text` and read one trimmed line; `None` on end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
) -> Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    if read == 0 {
        writeln!(out)?;
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn show_question<W: Write>(
    out: &mut W,
    index: usize,
    total: usize,
    question: &Question,
) -> Result<()> {
    writeln!(out, "\nQuestion {} of {}", index + 1, total)?;
    writeln!(out, "{}", question.text())?;
    for (i, option) in question.options().iter().enumerate() {
        writeln!(out, "  {}. {option}", i + 1)?;
    }
    Ok(())
}

fn show_feedback<W: Write>(out: &mut W, question: &Question, correct: bool) -> Result<()> {
    if correct {
        writeln!(out, "Correct!")?;
    } else {
        writeln!(out, "Incorrect. The answer was: {}", question.correct_option())?;
    }
    Ok(())
}

fn show_result<W: Write>(out: &mut W, result: &QuizResult) -> Result<()> {
    writeln!(out, "\n=== Quiz Complete: {} ===", result.title)?;
    writeln!(
        out,
        "Score: {} / {} ({}%)",
        result.score, result.total, result.percentage
    )?;
    writeln!(out, "{}", result.grade.message())?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct answer", "Result"]);
    for entry in &result.review {
        table.add_row(vec![
            Cell::new(entry.question_index + 1),
            Cell::new(&entry.prompt),
            Cell::new(&entry.chosen_text),
            Cell::new(&entry.correct_text),
            Cell::new(if entry.is_correct { "OK" } else { "WRONG" }),
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}
