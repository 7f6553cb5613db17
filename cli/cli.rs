mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use std::path::PathBuf;
use std::process;

use cli_args::{Cli, Commands, OverrideOpts, SourceOpts};
use xcombine_core::{AppError, Config, config};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = match e.downcast_ref::<AppError>() {
                Some(AppError::Config(_))
                | Some(AppError::TomlParse(_))
                | Some(AppError::TomlSerialize(_)) => 1,
                Some(AppError::Io(_))
                | Some(AppError::FileRead { .. })
                | Some(AppError::FileWrite { .. })
                | Some(AppError::DirCreation { .. })
                | Some(AppError::Scan(_)) => 2,
                Some(AppError::GroupLayout(_)) => 3,
                Some(AppError::InvalidArgument(_)) => 5,
                Some(_) => 1,
                None => 1,
            };
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(command) => match command {
            Commands::Combine(args) => {
                log::debug!("Executing 'combine' command...");
                commands::combine::handle_combine_command(args, quiet)?;
            }
            Commands::Plan(args) => {
                log::debug!("Executing 'plan' command...");
                commands::plan::handle_plan_command(args, quiet)?;
            }
            Commands::Config(args) => {
                log::debug!("Executing 'config' command...");
                commands::config::handle_config_command(&args, quiet)?;
            }
            Commands::Completion(args) => {
                log::debug!("Executing 'completion' command...");
                commands::completion::handle_completion_command(&args, quiet)?;
            }
        },
    }
    Ok(())
}

// Helper function to load config considering CLI options.
// Used by the combine and plan command modules.
pub fn load_config_for_command(
    source_opts: &SourceOpts,
    overrides: Option<&OverrideOpts>,
) -> Result<Config> {
    let config_path = Config::resolve_config_path(
        source_opts.config_file.as_ref(),
        source_opts.disable_config_file,
    )
    .context("Failed to resolve configuration path")?;

    let mut config = match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    // Source dir precedence: CLI flag, then environment, then config file.
    if let Some(dir) = &source_opts.source_dir {
        config.general.source_dir = dir.clone();
    } else if let Ok(dir) = std::env::var(config::SOURCE_DIR_ENV) {
        if !dir.is_empty() {
            log::debug!("Source dir taken from {}: {}", config::SOURCE_DIR_ENV, dir);
            config.general.source_dir = PathBuf::from(dir);
        }
    }
    if let Some(dir) = &source_opts.output_dir {
        config.general.output_dir = dir.clone();
    }

    if let Some(ov) = overrides {
        config = merge_config_with_cli_overrides(config, ov)?;
    }

    config.normalize();
    log::trace!("Config after CLI overrides: {:?}", config);
    Ok(config)
}

fn merge_config_with_cli_overrides(mut config: Config, ov: &OverrideOpts) -> Result<Config> {
    log::trace!("Applying CLI overrides to config...");

    if let Some(sep) = &ov.content_separator {
        config.content.separator = sep.clone();
    }
    if let Some(sep) = &ov.filename_separator {
        config.naming.separator = sep.clone();
    }
    if ov.include_extension {
        config.naming.include_extension = true;
    }
    if ov.exclude_extension {
        config.naming.include_extension = false;
    }
    if let Some(marker) = &ov.hide_marker {
        config.naming.hide_marker = marker.clone();
    }
    if let Some(mode) = &ov.extension_mode {
        config.naming.extension_mode = mode.parse()?;
    }
    if let Some(ext) = &ov.custom_extension {
        config.naming.custom_extension = ext.clone();
    }
    if ov.enable_tag_matching {
        config.matching.enabled = true;
    }
    if ov.disable_tag_matching {
        config.matching.enabled = false;
    }
    if let Some(style) = &ov.brackets {
        config.matching.brackets = style.parse()?;
    }

    Ok(config)
}
