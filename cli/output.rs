use anyhow::{Context, Result};
use colored::*;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use xcombine_core::{AppError, Composed, Config, TerminalBranch, Termination, compose};

// --- Combined file writing ---

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outputs_written: usize,
    pub early_terminated: usize,
    pub write_failures: usize,
    pub discontinuity_warnings: usize,
}

/// Composes and persists every terminal branch. Per-output write failures
/// are logged and skipped; the run continues with the remaining branches.
pub fn write_outputs(
    terminals: &[TerminalBranch<'_>],
    config: &Config,
    quiet: bool,
) -> Result<RunSummary> {
    let output_dir = &config.general.output_dir;
    fs::create_dir_all(output_dir).map_err(|e| AppError::DirCreation {
        path: output_dir.clone(),
        source: e,
    })?;

    let mut summary = RunSummary::default();
    for terminal in terminals {
        if terminal.branch.files.is_empty() {
            continue;
        }
        if terminal.termination == Termination::NoMatch {
            summary.early_terminated += 1;
        }

        let composed = compose(&terminal.branch, config);
        let path = output_dir.join(&composed.filename);
        if let Err(e) = fs::write(&path, &composed.content) {
            log::error!("Failed to write '{}': {}. Skipping output.", path.display(), e);
            summary.write_failures += 1;
            continue;
        }
        summary.outputs_written += 1;

        if !quiet {
            println!(
                "{} {} ({})",
                "✅".green(),
                composed.filename.blue(),
                terminal.branch.chain().dimmed()
            );
        }
        report_warnings(&composed, &mut summary, quiet);
    }

    Ok(summary)
}

fn report_warnings(composed: &Composed, summary: &mut RunSummary, quiet: bool) {
    for warning in &composed.warnings {
        summary.discontinuity_warnings += 1;
        log::warn!("{}: {}", composed.filename, warning);
        if !quiet {
            println!("   {} {}", "⚠️".yellow(), warning.yellow());
        }
    }
}

pub fn print_summary(summary: &RunSummary, quiet: bool) {
    if quiet {
        return;
    }
    println!();
    println!("{}", " Combination Summary ".green().bold().underline());
    println!(
        "{:<28} {}",
        "Output files written:".green(),
        summary.outputs_written.to_string().cyan()
    );
    println!(
        "{:<28} {}",
        "Early-terminated branches:".green(),
        summary.early_terminated.to_string().cyan()
    );
    println!(
        "{:<28} {}",
        "Discontinuity warnings:".green(),
        summary.discontinuity_warnings.to_string().cyan()
    );
    if summary.write_failures > 0 {
        println!(
            "{:<28} {}",
            "Write failures:".red(),
            summary.write_failures.to_string().red()
        );
    }
    println!();
}

// --- Shared helpers for save-style commands ---

/// Asks before clobbering `path`. In quiet mode an existing target is an
/// error, since there is no way to ask.
pub fn confirm_overwrite(path: &Path, quiet: bool) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    if quiet {
        anyhow::bail!(
            "Target file '{}' exists. Overwrite prevented in quiet mode.",
            path.display()
        );
    }
    print!(
        "{} File already exists at '{}'. Overwrite? [{}/{}] ",
        "⚠️".yellow(),
        path.display().to_string().cyan(),
        "y".green(),
        "N".red()
    );
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .context("Failed to read user input")?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}

pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    let mut file =
        File::create(path).with_context(|| format!("Failed to create file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to file {}", path.display()))?;
    Ok(())
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
