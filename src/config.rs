//! Application configuration management.
//!
//! Settings are merged from several layers, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config FILE`, else the platform config directory)
//! 3. Environment variables prefixed with `ROWDUPE_`
//!    (e.g. `ROWDUPE_INCLUDE_ROOT_CAUSE=true`)
//! 4. CLI flags, applied by [`Config::apply_analyze_args`]
//!
//! # Example file
//!
//! ```toml
//! include_root_cause = true
//! include_conflict_summary = true
//! output = "json"
//! delimiter = ";"
//! null_values = ["", "NA", "-"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisOptions;
use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::table::{CsvSource, TableSource, DEFAULT_NULL_VALUES};

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "ROWDUPE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build the root cause report by default
    pub include_root_cause: bool,
    /// Build the conflict set summary by default
    pub include_conflict_summary: bool,
    /// Inspect duplicate groups in parallel
    pub parallel: bool,
    /// Default output format
    pub output: OutputFormat,
    /// Input field delimiter
    pub delimiter: char,
    /// Cell texts read as missing values
    pub null_values: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_root_cause: false,
            include_conflict_summary: false,
            parallel: false,
            output: OutputFormat::Text,
            delimiter: ',',
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Config {
    /// Load the configuration from `path`, or the default location if `None`.
    ///
    /// Falls back to defaults (plus environment overrides) when the file is
    /// missing or invalid.
    #[must_use]
    pub fn load(path: Option<&Path>) -> Self {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from_path(path),
            None => Self::load_layers(None),
        }
    }

    /// Load the configuration from a specific TOML file.
    #[must_use]
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        Self::load_layers(Some(path.as_ref()))
    }

    /// Load the configuration, reporting invalid files as errors.
    ///
    /// A missing file is not an error; its layer is simply empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment variable cannot be
    /// deserialized into [`Config`].
    pub fn try_load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::figment(Some(path.as_ref()))
            .extract()
            .with_context(|| format!("invalid configuration in {}", path.as_ref().display()))
    }

    fn load_layers(path: Option<&Path>) -> Self {
        match Self::figment(path).extract() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring invalid configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
    }

    /// Save the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "rowdupe", "rowdupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply the flags of the analyze subcommand on top of this configuration.
    ///
    /// Boolean flags only ever switch a feature on.
    pub fn apply_analyze_args(&mut self, args: &AnalyzeArgs) {
        self.include_root_cause |= args.root_cause;
        self.include_conflict_summary |= args.conflict_summary;
        self.parallel |= args.parallel;
        if let Some(output) = args.output {
            self.output = output;
        }
        if let Some(delimiter) = args.delimiter {
            self.delimiter = delimiter;
        }
    }

    /// Analysis options derived from this configuration.
    #[must_use]
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions::default()
            .with_root_cause(self.include_root_cause)
            .with_conflict_summary(self.include_conflict_summary)
            .with_parallel(self.parallel)
    }

    /// CSV source configured with this delimiter and null markers.
    ///
    /// # Errors
    ///
    /// Returns an error if the delimiter is not a single-byte ASCII character.
    pub fn csv_source(&self) -> Result<CsvSource> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| format!("delimiter must be ASCII, got '{}'", self.delimiter))?;
        Ok(CsvSource::default()
            .with_delimiter(delimiter)
            .with_null_values(self.null_values.clone()))
    }

    /// Reader for `path`: a workbook reader for spreadsheet extensions,
    /// otherwise the CSV source from [`Config::csv_source`].
    ///
    /// # Errors
    ///
    /// Returns an error if the delimiter is not a single-byte ASCII character.
    pub fn table_source(&self, path: &Path) -> Result<TableSource> {
        Ok(TableSource::for_path(path, self.csv_source()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_args() -> AnalyzeArgs {
        AnalyzeArgs {
            file: PathBuf::from("data.csv"),
            column: "id".to_string(),
            root_cause: false,
            conflict_summary: false,
            output: None,
            export_dir: None,
            delimiter: None,
            parallel: false,
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.include_root_cause);
        assert!(!config.include_conflict_summary);
        assert_eq!(config.output, OutputFormat::Text);
        assert_eq!(config.delimiter, ',');
        assert!(config.null_values.contains(&"NA".to_string()));
    }

    #[test]
    fn test_cli_flags_override() {
        let mut config = Config::default();
        let mut args = analyze_args();
        args.root_cause = true;
        args.output = Some(OutputFormat::Json);
        args.delimiter = Some(';');
        config.apply_analyze_args(&args);

        assert!(config.include_root_cause);
        assert!(!config.include_conflict_summary);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.delimiter, ';');
    }

    #[test]
    fn test_absent_flags_keep_configured_values() {
        let mut config = Config {
            include_conflict_summary: true,
            output: OutputFormat::Csv,
            ..Config::default()
        };
        config.apply_analyze_args(&analyze_args());
        assert!(config.include_conflict_summary);
        assert_eq!(config.output, OutputFormat::Csv);
    }

    #[test]
    fn test_analysis_options() {
        let config = Config {
            include_root_cause: true,
            parallel: true,
            ..Config::default()
        };
        let options = config.analysis_options();
        assert!(options.include_root_cause);
        assert!(!options.include_conflict_summary);
        assert!(options.parallel);
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let config = Config {
            delimiter: '§',
            ..Config::default()
        };
        assert!(config.csv_source().is_err());
    }

    #[test]
    fn test_table_source_by_extension() {
        let config = Config::default();
        assert!(matches!(
            config.table_source(Path::new("book.XLSX")).unwrap(),
            TableSource::Workbook(_)
        ));
        assert!(matches!(
            config.table_source(Path::new("data.csv")).unwrap(),
            TableSource::Csv(_)
        ));
    }

    #[test]
    fn test_toml_contains_keys() {
        let toml = Config::default().to_toml().unwrap();
        assert!(toml.contains("include_root_cause = false"));
        assert!(toml.contains("output = \"text\""));
        assert!(toml.contains("delimiter = \",\""));
    }
}
