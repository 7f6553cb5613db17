use crate::cli_args::PlanArgs;
use crate::load_config_for_command;
use crate::output::write_to_stdout;
use anyhow::{Context, Result};
use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use xcombine_core::{self as core, Termination, compose};

#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub groups: usize,
    pub outputs: Vec<PlannedOutput>,
}

#[derive(Debug, Serialize)]
pub struct PlannedOutput {
    pub filename: String,
    pub sources: Vec<String>,
    pub tags: Vec<String>,
    pub terminated_early: bool,
    pub warnings: Vec<String>,
}

pub fn handle_plan_command(args: PlanArgs, quiet: bool) -> Result<()> {
    let config = load_config_for_command(&args.source, Some(&args.overrides))
        .context("Failed to load configuration")?;

    let groups = core::scan_groups(&config.general.source_dir, &config)
        .context("Failed to scan group folders")?;
    let terminals =
        core::combine(&groups, &config).context("Failed to combine the group files")?;

    let report = PlanReport {
        groups: groups.len(),
        outputs: terminals
            .iter()
            .filter(|t| !t.branch.files.is_empty())
            .map(|t| {
                let composed = compose(&t.branch, &config);
                PlannedOutput {
                    filename: composed.filename,
                    sources: t
                        .branch
                        .files
                        .iter()
                        .map(|f| f.orig_name.clone())
                        .collect(),
                    tags: t.branch.sorted_tags(),
                    terminated_early: t.termination == Termination::NoMatch,
                    warnings: composed.warnings,
                }
            })
            .collect(),
    };

    match args.format.as_deref() {
        Some("json") => {
            let content = serde_json::to_string_pretty(&report)
                .context("Failed to serialize plan report")?;
            write_to_stdout(&content)
        }
        _ => print_plan_pretty_table(&report, quiet),
    }
}

fn print_plan_pretty_table(report: &PlanReport, quiet: bool) -> Result<()> {
    if !quiet {
        println!();
        println!("{}", " Planned Outputs ".green().bold().underline());
        println!(
            "{:<16} {}",
            "Groups:".green(),
            report.groups.to_string().cyan()
        );
        println!(
            "{:<16} {}",
            "Outputs:".green(),
            report.outputs.len().to_string().cyan()
        );
    }

    if report.outputs.is_empty() {
        if !quiet {
            println!("\n{}", "(No outputs would be produced)".yellow());
        }
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Output").fg(Color::Green),
        Cell::new("Sources").fg(Color::Green),
        Cell::new("Tags").fg(Color::Green),
        Cell::new("Status").fg(Color::Green),
        Cell::new("Warnings").fg(Color::Green),
    ]);
    for planned in &report.outputs {
        let status = if planned.terminated_early {
            Cell::new("cut short").fg(Color::Yellow)
        } else {
            Cell::new("complete")
        };
        table.add_row(vec![
            Cell::new(&planned.filename).fg(Color::Cyan),
            Cell::new(planned.sources.join("\n")),
            Cell::new(planned.tags.join(", ")).fg(Color::DarkGrey),
            status,
            Cell::new(planned.warnings.join("\n")).fg(Color::Yellow),
        ]);
    }
    println!("{table}");
    Ok(())
}
