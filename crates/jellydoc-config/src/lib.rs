//! Configuration management for jellydoc.
//!
//! Parses `jellydoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Path values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `source.model`
//! - `output.dir`
//! - `output.site_dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the type description model path.
    pub model: Option<PathBuf>,
    /// Override the output directory receiving `taglib.xml`.
    pub output_dir: Option<PathBuf>,
    /// Override the report site directory.
    pub site_dir: Option<PathBuf>,
    /// Override the doc comment format.
    pub doc_format: Option<DocFormat>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "jellydoc.toml";

/// Name of the generated tag library document.
pub const TAGLIB_FILENAME: &str = "taglib.xml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source configuration (paths are relative strings from TOML).
    source: SourceConfigRaw,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Extraction configuration.
    pub extract: ExtractConfig,

    /// Resolved source configuration (set after loading).
    #[serde(skip)]
    pub source_resolved: SourceConfig,
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

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SourceConfigRaw {
    model: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    site_dir: Option<String>,
}

/// Resolved source configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SourceConfig {
    /// JSON type description model produced by the introspection step.
    pub model: PathBuf,
}

/// Resolved output configuration with absolute paths.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Directory receiving `taglib.xml` and schema artifacts.
    pub dir: PathBuf,
    /// Directory receiving the rendered reference report.
    pub site_dir: PathBuf,
}

impl OutputConfig {
    /// Location of the generated `taglib.xml`.
    #[must_use]
    pub fn taglib_path(&self) -> PathBuf {
        self.dir.join(TAGLIB_FILENAME)
    }
}

/// How doc comment prose is turned into HTML before re-emission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocFormat {
    /// Comment prose is HTML and is sanitized as-is.
    #[default]
    Html,
    /// Comment prose is lightweight markup rendered to HTML first.
    Markup,
}

impl std::str::FromStr for DocFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Self::Html),
            "markup" => Ok(Self::Markup),
            other => Err(ConfigError::Validation(format!(
                "unknown doc format '{other}' (expected 'html' or 'markup')"
            ))),
        }
    }
}

/// Extraction configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Format of doc comment prose.
    pub doc_format: DocFormat,
    /// Qualified name of the interface marking a class as a tag.
    pub tag_interface: String,
    /// Package annotation carrying the namespace URI in its `value`.
    pub uri_annotation: String,
    /// Class annotation marking a tag without nested content.
    pub no_content_annotation: String,
    /// Setter annotation marking a required attribute.
    pub required_annotation: String,
    /// Setter annotation marking a deprecated attribute.
    pub deprecated_annotation: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            doc_format: DocFormat::default(),
            tag_interface: "org.apache.commons.jelly.Tag".to_owned(),
            uri_annotation: "org.jvnet.maven.jellydoc.annotation.TagLibUri".to_owned(),
            no_content_annotation: "org.jvnet.maven.jellydoc.annotation.NoContent".to_owned(),
            required_annotation: "org.jvnet.maven.jellydoc.annotation.Required".to_owned(),
            deprecated_annotation: "java.lang.Deprecated".to_owned(),
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
        /// Config field path (e.g., "`output.dir`").
        field: String,
        /// Error message (e.g., "${`TARGET_DIR`} not set").
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

/// Require a path field to be non-empty.
fn require_path(value: &Path, field: &str) -> Result<(), ConfigError> {
    if value.as_os_str().is_empty() {
        return Err(ConfigError::Validation(format!("{field} must be specified")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `jellydoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the effective configuration is invalid.
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
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(model) = &settings.model {
            self.source_resolved.model.clone_from(model);
        }
        if let Some(dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(dir);
        }
        if let Some(site_dir) = &settings.site_dir {
            self.output_resolved.site_dir.clone_from(site_dir);
        }
        if let Some(doc_format) = settings.doc_format {
            self.extract.doc_format = doc_format;
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
            source: SourceConfigRaw::default(),
            output: OutputConfigRaw::default(),
            extract: ExtractConfig::default(),
            source_resolved: SourceConfig {
                model: base.join("target/jellydoc/model.json"),
            },
            output_resolved: OutputConfig {
                dir: base.join("target"),
                site_dir: base.join("target/site"),
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
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_path(&self.output_resolved.dir, "output.dir")?;
        require_path(&self.output_resolved.site_dir, "output.site_dir")?;
        require_path(&self.source_resolved.model, "source.model")?;
        self.validate_extract()
    }

    fn validate_extract(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.extract.tag_interface, "extract.tag_interface")?;
        require_non_empty(&self.extract.uri_annotation, "extract.uri_annotation")?;
        require_non_empty(
            &self.extract.no_content_annotation,
            "extract.no_content_annotation",
        )?;
        require_non_empty(
            &self.extract.required_annotation,
            "extract.required_annotation",
        )?;
        require_non_empty(
            &self.extract.deprecated_annotation,
            "extract.deprecated_annotation",
        )?;
        Ok(())
    }

    /// Expand environment variable references in path strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref model) = self.source.model {
            self.source.model = Some(expand::expand_env(model, "source.model")?);
        }
        if let Some(ref dir) = self.output.dir {
            self.output.dir = Some(expand::expand_env(dir, "output.dir")?);
        }
        if let Some(ref site_dir) = self.output.site_dir {
            self.output.site_dir = Some(expand::expand_env(site_dir, "output.site_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// An absent `output.dir` defaults to `target` next to the config file,
    /// like the build directory of the host project. An explicitly empty
    /// one is rejected here, before it could silently collapse onto the
    /// config directory.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = &self.output.dir {
            require_non_empty(dir, "output.dir")?;
        }
        if let Some(site_dir) = &self.output.site_dir {
            require_non_empty(site_dir, "output.site_dir")?;
        }

        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.source_resolved = SourceConfig {
            model: resolve(self.source.model.as_deref(), "target/jellydoc/model.json"),
        };
        let dir = resolve(self.output.dir.as_deref(), "target");
        let site_dir = match self.output.site_dir.as_deref() {
            Some(site_dir) => config_dir.join(site_dir),
            None => dir.join("site"),
        };
        self.output_resolved = OutputConfig { dir, site_dir };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(
            config.source_resolved.model,
            PathBuf::from("/test/target/jellydoc/model.json")
        );
        assert_eq!(config.output_resolved.dir, PathBuf::from("/test/target"));
        assert_eq!(
            config.output_resolved.site_dir,
            PathBuf::from("/test/target/site")
        );
        assert_eq!(
            config.output_resolved.taglib_path(),
            PathBuf::from("/test/target/taglib.xml")
        );
        assert_eq!(config.extract.doc_format, DocFormat::Html);
        assert_eq!(config.extract.tag_interface, "org.apache.commons.jelly.Tag");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.extract.doc_format, DocFormat::Html);
        assert_eq!(
            config.extract.required_annotation,
            "org.jvnet.maven.jellydoc.annotation.Required"
        );
    }

    #[test]
    fn test_parse_extract_config() {
        let toml = r#"
[extract]
doc_format = "markup"
tag_interface = "org.example.Tag"
uri_annotation = "org.example.Uri"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.extract.doc_format, DocFormat::Markup);
        assert_eq!(config.extract.tag_interface, "org.example.Tag");
        assert_eq!(config.extract.uri_annotation, "org.example.Uri");
        assert_eq!(
            config.extract.no_content_annotation,
            "org.jvnet.maven.jellydoc.annotation.NoContent"
        );
    }

    #[test]
    fn test_parse_unknown_doc_format_fails() {
        let toml = r#"
[extract]
doc_format = "textile"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_doc_format_from_str() {
        assert_eq!("markup".parse::<DocFormat>().unwrap(), DocFormat::Markup);
        assert_eq!("html".parse::<DocFormat>().unwrap(), DocFormat::Html);
        assert!("wiki".parse::<DocFormat>().is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[source]
model = "build/model.json"

[output]
dir = "build"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();

        assert_eq!(
            config.source_resolved.model,
            PathBuf::from("/project/build/model.json")
        );
        assert_eq!(config.output_resolved.dir, PathBuf::from("/project/build"));
        assert_eq!(
            config.output_resolved.site_dir,
            PathBuf::from("/project/build/site")
        );
    }

    #[test]
    fn test_explicit_site_dir() {
        let toml = r#"
[output]
dir = "build"
site_dir = "public/reference"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();

        assert_eq!(
            config.output_resolved.site_dir,
            PathBuf::from("/project/public/reference")
        );
    }

    #[test]
    fn test_empty_output_dir_is_configuration_error() {
        let toml = r#"
[output]
dir = ""
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.resolve_paths(Path::new("/project")).unwrap_err();

        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("output.dir"));
    }

    #[test]
    fn test_absent_output_dir_defaults_to_target() {
        let toml = r#"
[source]
model = "model.json"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();
        config.validate().unwrap();

        assert_eq!(config.output_resolved.dir, PathBuf::from("/project/target"));
        assert_eq!(
            config.output_resolved.taglib_path(),
            PathBuf::from("/project/target/taglib.xml")
        );
    }

    #[test]
    fn test_validate_rejects_empty_tag_interface() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.extract.tag_interface = String::new();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("extract.tag_interface"));
    }

    #[test]
    fn test_validate_rejects_missing_output_dir_from_cli() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            output_dir: Some(PathBuf::new()),
            ..Default::default()
        });

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output.dir"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            model: Some(PathBuf::from("/custom/model.json")),
            doc_format: Some(DocFormat::Markup),
            ..Default::default()
        });

        assert_eq!(
            config.source_resolved.model,
            PathBuf::from("/custom/model.json")
        );
        assert_eq!(config.extract.doc_format, DocFormat::Markup);
        assert_eq!(config.output_resolved.dir, PathBuf::from("/test/target")); // Unchanged
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/jellydoc.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[output]
dir = "out"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.output_resolved.dir, dir.path().join("out"));
        assert_eq!(config.config_path, Some(path));
    }
}
