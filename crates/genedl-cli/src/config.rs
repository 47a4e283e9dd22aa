//! Configuration loading

use anyhow::{ensure, Result};
use genedl_core::{IdentifierConfig, LayoutConfig, PipelineConfig};
use genedl_edl::EdlStyle;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub sections: SectionsConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub style: EdlStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Prefix keeping feature records apart from ADBase.template records
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Record name length limit
    #[serde(default = "default_max_len")]
    pub max_len: usize,
    /// Characters kept of each camel-case word when a name is too long
    #[serde(default = "default_word_len")]
    pub word_len: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            max_len: default_max_len(),
            word_len: default_word_len(),
        }
    }
}

fn default_prefix() -> String {
    IdentifierConfig::default().prefix
}

fn default_max_len() -> usize {
    IdentifierConfig::default().max_len
}

fn default_word_len() -> usize {
    IdentifierConfig::default().word_len
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionsConfig {
    /// Larger categories are split into numbered sections
    #[serde(default = "default_max_features")]
    pub max_features: usize,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
        }
    }
}

fn default_max_features() -> usize {
    PipelineConfig::default().max_section_features
}

impl Config {
    /// Convert to the generator settings, rejecting limits no name can meet
    pub fn to_pipeline_config(&self) -> Result<PipelineConfig> {
        let naming = &self.naming;
        ensure!(
            naming.max_len > naming.prefix.len(),
            "naming.max_len ({}) must be longer than the prefix {:?}",
            naming.max_len,
            naming.prefix
        );
        ensure!(naming.word_len > 0, "naming.word_len must be at least 1");
        ensure!(
            self.sections.max_features > 0,
            "sections.max_features must be at least 1"
        );

        Ok(PipelineConfig {
            identifiers: IdentifierConfig {
                prefix: naming.prefix.clone(),
                max_len: naming.max_len,
                word_len: naming.word_len,
            },
            max_section_features: self.sections.max_features,
            layout: self.layout.clone(),
        })
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.to_pipeline_config().unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genedl.toml");
        std::fs::write(
            &path,
            r#"
[naming]
prefix = "CAM_"
word_len = 4

[layout]
max_height = 1000

[style]
font_class = "helvetica"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        let pipeline = config.to_pipeline_config().unwrap();
        assert_eq!(pipeline.identifiers.prefix, "CAM_");
        assert_eq!(pipeline.identifiers.max_len, 20);
        assert_eq!(pipeline.identifiers.word_len, 4);
        assert_eq!(pipeline.max_section_features, 32);
        assert_eq!(pipeline.layout.max_height, 1000);
        assert_eq!(pipeline.layout.row_pitch, 25);
        assert_eq!(config.style.font_class, "helvetica");
        assert_eq!(config.style.fg_control, 25);
    }

    #[test]
    fn test_default_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genedl.toml");
        save_default_config(&path).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.to_pipeline_config().unwrap(), PipelineConfig::default());
        assert_eq!(config.style, EdlStyle::default());
    }

    #[test]
    fn test_naming_limits_are_checked() {
        let mut config = Config::default();
        config.naming.max_len = 0;
        assert!(config.to_pipeline_config().is_err());

        config.naming.max_len = 3;
        let err = config.to_pipeline_config().unwrap_err();
        assert!(err.to_string().contains("longer than the prefix"));

        config.naming.max_len = 4;
        assert!(config.to_pipeline_config().is_ok());

        config.naming.word_len = 0;
        assert!(config.to_pipeline_config().is_err());
    }

    #[test]
    fn test_empty_sections_are_rejected() {
        let mut config = Config::default();
        config.sections.max_features = 0;
        assert!(config.to_pipeline_config().is_err());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genedl.toml");
        std::fs::write(&path, "[sections]\nmax_features = \"many\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }
}
