use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct SourceOpts {
    #[arg(
        long,
        help = "Directory containing the '(<number>)-<name>' group folders (default: configs).",
        help_heading = "Source Layout",
        value_name = "PATH"
    )]
    pub source_dir: Option<PathBuf>,

    #[arg(
        long,
        help = "Directory the combined files are written to (default: current dir).",
        help_heading = "Source Layout",
        value_name = "PATH"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify path/filename of the TOML config file (default: ./xcombine.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "disable_config_file",
        help_heading = "Source Layout"
    )]
    pub config_file: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config_file",
        help_heading = "Source Layout"
    )]
    pub disable_config_file: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OverrideOpts {
    #[arg(
        long,
        help = "Separator inserted between combined file contents; \\n and \\t are unescaped.",
        value_name = "SEPARATOR",
        help_heading = "Content"
    )]
    pub content_separator: Option<String>,

    #[arg(
        long,
        help = "Separator joining the name parts of the output filename [default: -].",
        value_name = "SEPARATOR",
        help_heading = "Naming"
    )]
    pub filename_separator: Option<String>,

    #[arg(
        long,
        help = "Build name parts from full base names (with extension).",
        overrides_with = "exclude_extension",
        help_heading = "Naming"
    )]
    pub include_extension: bool,

    #[arg(
        long,
        help = "Build name parts from stems only [default].",
        overrides_with = "include_extension",
        help_heading = "Naming"
    )]
    pub exclude_extension: bool,

    #[arg(
        long,
        help = "Substring hiding a file from the output filename [default: [hide]].",
        value_name = "MARKER",
        help_heading = "Naming"
    )]
    pub hide_marker: Option<String>,

    #[arg(
        long,
        help = "Where the output extension comes from.",
        value_name = "MODE",
        value_parser = ["first", "last", "none", "custom"],
        help_heading = "Naming"
    )]
    pub extension_mode: Option<String>,

    #[arg(
        long,
        help = "Extension used with --extension-mode custom [default: .txt].",
        value_name = "EXT",
        help_heading = "Naming"
    )]
    pub custom_extension: Option<String>,

    #[arg(
        long,
        help = "Force tag-based matching on [default].",
        overrides_with = "disable_tag_matching",
        help_heading = "Matching"
    )]
    pub enable_tag_matching: bool,

    #[arg(
        long,
        help = "Disable tag-based matching; every tagged file matches.",
        overrides_with = "enable_tag_matching",
        help_heading = "Matching"
    )]
    pub disable_tag_matching: bool,

    #[arg(
        long,
        help = "Bracket style recognized around tags.",
        value_name = "STYLE",
        value_parser = ["ascii", "full-width", "both"],
        help_heading = "Matching"
    )]
    pub brackets: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Combine tagged text files from ordered group folders.",
    long_about = "xcombine scans a source directory of ordered group folders, matches their \nfiles layer by layer through tags embedded in the filenames, and writes one \ncombined file per surviving branch. Output names derive from the combined \nfilenames.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  xcombine combine --source-dir configs --output-dir dist\n  xcombine plan -f json\n  xcombine config --save\n  xcombine completion --shell fish",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "c",
        about = "Scan the group folders and write the combined output files."
    )]
    Combine(CombineArgs),

    #[command(
        visible_alias = "p",
        about = "Dry run: show which outputs would be produced, without writing."
    )]
    Plan(PlanArgs),

    #[command(about = "Show or save the default configuration file structure.")]
    Config(ConfigArgs),

    #[command(about = "Generate or save shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CombineArgs {
    #[clap(flatten)]
    pub source: SourceOpts,
    #[clap(flatten)]
    pub overrides: OverrideOpts,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[clap(flatten)]
    pub source: SourceOpts,
    #[clap(flatten)]
    pub overrides: OverrideOpts,

    #[arg(
        short = 'f',
        long,
        help = "Set the plan output format.",
        value_name = "FORMAT",
        value_parser = ["text", "json"],
        help_heading = "Output Formatting"
    )]
    pub format: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        long,
        help = "Save default config structure to ./xcombine.toml (prompts overwrite)."
    )]
    pub save: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_name = "SHELL",
        help = "Shell to generate completions for (fish, bash, zsh) [default: fish]"
    )]
    pub shell: Option<String>,
    #[arg(
        long,
        help = "Save completion script to default location (prompts overwrite)."
    )]
    pub save: bool,
}
