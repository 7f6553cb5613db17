use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

use crate::cli_args::ConfigArgs;
use crate::output::{confirm_overwrite, write_text_file, write_to_stdout};
use xcombine_core::{Config, config::DEFAULT_CONFIG_FILENAME};

pub fn handle_config_command(args: &ConfigArgs, quiet: bool) -> Result<()> {
    let default_toml =
        Config::default_toml().context("Failed to serialize the default configuration")?;

    if !args.save {
        return write_to_stdout(&default_toml);
    }

    let save_path = Path::new(DEFAULT_CONFIG_FILENAME);
    if !confirm_overwrite(save_path, quiet)? {
        println!("Save cancelled.");
        return Ok(());
    }
    write_text_file(save_path, &default_toml)?;

    if !quiet {
        println!(
            "{} Default configuration saved to: {}",
            "✅".green(),
            save_path.display().to_string().blue()
        );
    }
    Ok(())
}
