//! Configuration management for mdc-docs.
//!
//! Parses `mdc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `rules.cross_reference_base`
//! - `output.manifest`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override rules source directory.
    pub source_dir: Option<PathBuf>,
    /// Override base URL for resolved cross-references.
    pub cross_reference_base: Option<String>,
    /// Override manifest output path.
    pub manifest: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdc.toml";

const DEFAULT_SOURCE_DIR: &str = ".cursor/rules";
const DEFAULT_TARGET_PATH: &str = "rules";
const DEFAULT_CROSS_REFERENCE_BASE: &str = "/cursor/rules";
const DEFAULT_CONFIG_DIR_INFIX: &str = ".cursor/rules/";
const DEFAULT_EXTENSION: &str = "mdc";
const DEFAULT_MAIN_RULE: &str = "main";
const DEFAULT_MANIFEST: &str = ".mdc/manifest.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rules configuration (paths are relative strings from TOML).
    rules: RulesConfigRaw,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,

    /// Resolved rules configuration (set after loading).
    #[serde(skip)]
    pub rules_resolved: RulesConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw rules configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RulesConfigRaw {
    source_dir: Option<String>,
    target_path: Option<String>,
    cross_reference_base: Option<String>,
    config_dir_infix: Option<String>,
    extension: Option<String>,
    main_rule: Option<String>,
    include_metadata: Option<bool>,
}

/// Resolved rules configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesConfig {
    /// Directory containing the rule documents.
    pub source_dir: PathBuf,
    /// Route segment the rendering layer mounts rule pages under.
    pub target_path: String,
    /// Prefix for resolved cross-reference URLs, without trailing slash.
    pub cross_reference_base: String,
    /// Literal infix marking links that spell out the rules directory
    /// (e.g. `./.cursor/rules/adr.mdc`). Empty disables the special case.
    pub config_dir_infix: String,
    /// Rule document extension without the leading dot.
    pub extension: String,
    /// Rule that the base URL redirects to, without extension.
    pub main_rule: String,
    /// Whether rule metadata is included in the manifest.
    pub include_metadata: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            target_path: DEFAULT_TARGET_PATH.to_owned(),
            cross_reference_base: DEFAULT_CROSS_REFERENCE_BASE.to_owned(),
            config_dir_infix: DEFAULT_CONFIG_DIR_INFIX.to_owned(),
            extension: DEFAULT_EXTENSION.to_owned(),
            main_rule: DEFAULT_MAIN_RULE.to_owned(),
            include_metadata: true,
        }
    }
}

impl RulesConfig {
    /// URL the base path redirects to (`{base}/{main_rule}`).
    #[must_use]
    pub fn main_rule_url(&self) -> String {
        format!("{}/{}", self.cross_reference_base, self.main_rule)
    }
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    manifest: Option<String>,
}

/// Resolved output configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Path the site manifest is written to.
    pub manifest: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(DEFAULT_MANIFEST),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`rules.cross_reference_base`").
        field: String,
        /// Error message (e.g., "${`RULES_BASE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Normalize a base URL: trailing slashes are dropped so joins never double them.
fn normalize_base(base: &str) -> String {
    base.trim().trim_end_matches('/').to_owned()
}

/// Normalize the config directory infix to end with a single `/`.
fn normalize_infix(infix: &str) -> String {
    let trimmed = infix.trim().replace('\\', "/");
    if trimmed.is_empty() || trimmed.ends_with('/') {
        trimmed
    } else {
        format!("{trimmed}/")
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged result
    /// is validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a required value is missing.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.rules_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(base) = &settings.cross_reference_base {
            self.rules.cross_reference_base = Some(base.clone());
            self.rules_resolved.cross_reference_base = normalize_base(base);
        }
        if let Some(manifest) = &settings.manifest {
            self.output_resolved.manifest.clone_from(manifest);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            rules: RulesConfigRaw::default(),
            output: OutputConfigRaw::default(),
            rules_resolved: RulesConfig {
                source_dir: base.join(DEFAULT_SOURCE_DIR),
                ..RulesConfig::default()
            },
            output_resolved: OutputConfig {
                manifest: base.join(DEFAULT_MANIFEST),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// A missing source directory or cross-reference base is fatal: no
    /// document is processed with an incomplete configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_rules()?;
        self.validate_output()?;
        Ok(())
    }

    /// Validate rules configuration.
    fn validate_rules(&self) -> Result<(), ConfigError> {
        let rules = &self.rules_resolved;

        if rules.source_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "rules.source_dir cannot be empty".to_owned(),
            ));
        }

        // The raw value is checked because a bare "/" normalizes to "".
        let raw_base = self
            .rules
            .cross_reference_base
            .as_deref()
            .unwrap_or(&rules.cross_reference_base);
        require_non_empty(raw_base, "rules.cross_reference_base")?;
        if !rules.cross_reference_base.is_empty()
            && !rules.cross_reference_base.starts_with('/')
            && !rules.cross_reference_base.starts_with("http://")
            && !rules.cross_reference_base.starts_with("https://")
        {
            return Err(ConfigError::Validation(
                "rules.cross_reference_base must start with '/' or http(s)://".to_owned(),
            ));
        }

        require_non_empty(&rules.extension, "rules.extension")?;
        require_non_empty(&rules.main_rule, "rules.main_rule")?;

        Ok(())
    }

    /// Validate output configuration.
    fn validate_output(&self) -> Result<(), ConfigError> {
        if self.output_resolved.manifest.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output.manifest cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref base) = self.rules.cross_reference_base {
            self.rules.cross_reference_base =
                Some(expand::expand_env(base, "rules.cross_reference_base")?);
        }
        if let Some(ref manifest) = self.output.manifest {
            self.output.manifest = Some(expand::expand_env(manifest, "output.manifest")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory and fill defaults.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let raw = &self.rules;
        self.rules_resolved = RulesConfig {
            source_dir: config_dir.join(raw.source_dir.as_deref().unwrap_or(DEFAULT_SOURCE_DIR)),
            target_path: raw
                .target_path
                .as_deref()
                .unwrap_or(DEFAULT_TARGET_PATH)
                .trim_matches('/')
                .to_owned(),
            cross_reference_base: normalize_base(
                raw.cross_reference_base
                    .as_deref()
                    .unwrap_or(DEFAULT_CROSS_REFERENCE_BASE),
            ),
            config_dir_infix: normalize_infix(
                raw.config_dir_infix
                    .as_deref()
                    .unwrap_or(DEFAULT_CONFIG_DIR_INFIX),
            ),
            extension: raw
                .extension
                .as_deref()
                .unwrap_or(DEFAULT_EXTENSION)
                .trim_start_matches('.')
                .to_owned(),
            main_rule: raw
                .main_rule
                .clone()
                .unwrap_or_else(|| DEFAULT_MAIN_RULE.to_owned()),
            include_metadata: raw.include_metadata.unwrap_or(true),
        };

        // An explicitly empty source_dir stays empty so validation rejects it.
        if raw.source_dir.as_deref().is_some_and(|s| s.trim().is_empty()) {
            self.rules_resolved.source_dir = PathBuf::new();
        }

        self.output_resolved = OutputConfig {
            manifest: config_dir.join(self.output.manifest.as_deref().unwrap_or(DEFAULT_MANIFEST)),
        };
    }
}
