use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_CONFIG_FILENAME: &str = "xcombine.toml";
pub const DEFAULT_SOURCE_DIR: &str = "configs";
pub const SOURCE_DIR_ENV: &str = "XCOMBINE_SOURCE_DIR";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Inserted between the contents of combined files. Literal `\n` and
    /// `\t` sequences are unescaped after loading.
    #[serde(default = "default_content_separator")]
    pub separator: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NamingConfig {
    #[serde(default = "default_filename_separator")]
    pub separator: String,
    #[serde(default = "default_false")]
    pub include_extension: bool,
    /// Files whose name contains this substring are excluded from the
    /// output filename. They still contribute content.
    #[serde(default = "default_hide_marker")]
    pub hide_marker: String,
    #[serde(default)]
    pub extension_mode: ExtensionMode,
    #[serde(default = "default_custom_extension")]
    pub custom_extension: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub brackets: BracketStyle,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionMode {
    #[default]
    First,
    Last,
    None,
    Custom,
}

impl FromStr for ExtensionMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "first" => Ok(ExtensionMode::First),
            "last" => Ok(ExtensionMode::Last),
            "none" => Ok(ExtensionMode::None),
            "custom" => Ok(ExtensionMode::Custom),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown extension mode '{}'. Use first, last, none or custom.",
                other
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BracketStyle {
    Ascii,
    FullWidth,
    #[default]
    Both,
}

impl FromStr for BracketStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ascii" => Ok(BracketStyle::Ascii),
            "full-width" => Ok(BracketStyle::FullWidth),
            "both" => Ok(BracketStyle::Both),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown bracket style '{}'. Use ascii, full-width or both.",
                other
            ))),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_source_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE_DIR)
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_content_separator() -> String {
    "\n\n".to_string()
}
fn default_filename_separator() -> String {
    "-".to_string()
}
fn default_hide_marker() -> String {
    "[hide]".to_string()
}
fn default_custom_extension() -> String {
    ".txt".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
        }
    }
}
impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            separator: default_content_separator(),
        }
    }
}
impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            separator: default_filename_separator(),
            include_extension: default_false(),
            hide_marker: default_hide_marker(),
            extension_mode: ExtensionMode::default(),
            custom_extension: default_custom_extension(),
        }
    }
}
impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            brackets: BracketStyle::default(),
        }
    }
}

/// Turns literal `\n` / `\t` escape sequences into real control characters,
/// so separators can be passed through flags and TOML basic strings alike.
pub fn unescape_separator(raw: &str) -> String {
    raw.replace("\\n", "\n").replace("\\t", "\t")
}

impl Config {
    pub fn resolve_config_path(
        cli_config_file: Option<&String>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(p_str) => {
                let expanded = shellexpand::tilde(p_str);
                let mut path = PathBuf::from(expanded.as_ref());
                if !path.exists() && path.extension().is_none() {
                    path.set_extension("toml");
                }
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path))
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn load_from_path(config_path: &std::path::Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        toml::from_str::<Config>(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })
    }

    /// Applies post-merge fixups: tilde expansion on directories and escape
    /// unescaping on the content separator. Call once after all CLI
    /// overrides are in place.
    pub fn normalize(&mut self) {
        let source = self.general.source_dir.to_string_lossy().to_string();
        self.general.source_dir = PathBuf::from(shellexpand::tilde(&source).as_ref());
        let output = self.general.output_dir.to_string_lossy().to_string();
        self.general.output_dir = PathBuf::from(shellexpand::tilde(&output).as_ref());
        self.content.separator = unescape_separator(&self.content.separator);
    }

    pub fn default_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&Config::default())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_documented_values() {
        let config = Config::default();
        assert_eq!(config.general.source_dir, PathBuf::from("configs"));
        assert_eq!(config.general.output_dir, PathBuf::from("."));
        assert_eq!(config.content.separator, "\n\n");
        assert_eq!(config.naming.separator, "-");
        assert!(!config.naming.include_extension);
        assert_eq!(config.naming.hide_marker, "[hide]");
        assert_eq!(config.naming.extension_mode, ExtensionMode::First);
        assert_eq!(config.naming.custom_extension, ".txt");
        assert!(config.matching.enabled);
        assert_eq!(config.matching.brackets, BracketStyle::Both);
    }

    #[test]
    fn default_toml_roundtrips() {
        let text = Config::default_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [naming]
            separator = "_"
            extension_mode = "custom"
            custom_extension = "md"

            [matching]
            brackets = "full-width"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.naming.separator, "_");
        assert_eq!(parsed.naming.extension_mode, ExtensionMode::Custom);
        assert_eq!(parsed.naming.custom_extension, "md");
        assert_eq!(parsed.matching.brackets, BracketStyle::FullWidth);
        assert_eq!(parsed.content.separator, "\n\n");
        assert!(parsed.matching.enabled);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = toml::from_str::<Config>("[naming]\ntypo_field = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn separator_unescaping() {
        assert_eq!(unescape_separator("\\n\\n"), "\n\n");
        assert_eq!(unescape_separator("--\\t--"), "--\t--");
        assert_eq!(unescape_separator("\n"), "\n");
        assert_eq!(unescape_separator("plain"), "plain");
    }

    #[test]
    fn enum_parsing_from_cli_strings() {
        assert_eq!(
            "first".parse::<ExtensionMode>().unwrap(),
            ExtensionMode::First
        );
        assert_eq!(
            "CUSTOM".parse::<ExtensionMode>().unwrap(),
            ExtensionMode::Custom
        );
        assert!("middle".parse::<ExtensionMode>().is_err());
        assert_eq!(
            "full-width".parse::<BracketStyle>().unwrap(),
            BracketStyle::FullWidth
        );
        assert!("curly".parse::<BracketStyle>().is_err());
    }

    #[test]
    fn normalize_unescapes_separator() {
        let mut config = Config::default();
        config.content.separator = "\\n---\\n".to_string();
        config.normalize();
        assert_eq!(config.content.separator, "\n---\n");
    }
}
