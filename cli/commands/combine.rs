use crate::cli_args::CombineArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use xcombine_core::{self as core, Config};

pub fn handle_combine_command(args: CombineArgs, quiet: bool) -> Result<()> {
    let config = load_config_for_command(&args.source, Some(&args.overrides))
        .context("Failed to load configuration")?;
    log_effective_config(&config);

    let groups = core::scan_groups(&config.general.source_dir, &config)
        .context("Failed to scan group folders")?;

    let terminals =
        core::combine(&groups, &config).context("Failed to combine the group files")?;
    log::info!("Traversal finished with {} terminal branches", terminals.len());

    let summary = output::write_outputs(&terminals, &config, quiet)
        .context("Failed to write combined output files")?;
    output::print_summary(&summary, quiet);
    Ok(())
}

fn log_effective_config(config: &Config) {
    log::info!("Source directory: {}", config.general.source_dir.display());
    log::info!("Output directory: {}", config.general.output_dir.display());
    log::info!(
        "Tag matching: {} ({:?} brackets)",
        if config.matching.enabled {
            "enabled"
        } else {
            "disabled"
        },
        config.matching.brackets
    );
    log::info!(
        "Extension mode: {:?}{}",
        config.naming.extension_mode,
        if config.naming.extension_mode == core::ExtensionMode::Custom {
            format!(" ({})", config.naming.custom_extension)
        } else {
            String::new()
        }
    );
    log::info!("Hide marker: {}", config.naming.hide_marker);
    log::info!("Filename separator: '{}'", config.naming.separator);
    log::info!("Content separator: {:?}", config.content.separator);
}
