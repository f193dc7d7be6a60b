//! Configuration management for pneu-checker
//!
//! Config stored at: ~/.config/pneu-checker/config.json

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use pneu_types::{ConfigError, OutputFormat, Result};
use pneu_vision::CommandExtractor;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Store directory override
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Command that reads tire and plate photos, e.g. `gemini-vision --json`
    #[serde(default)]
    pub extractor_command: Option<String>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Extra attempts per photo when the extractor fails
    #[serde(default = "default_extraction_retries")]
    pub extraction_retries: u32,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_extraction_retries() -> u32 {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: None,
            extractor_command: None,
            output_format: default_output_format(),
            extraction_retries: default_extraction_retries(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("pneu-checker");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the store directory path
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }

        let store_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("pneu-checker");
        Ok(store_dir)
    }

    /// Build the configured extractor
    pub fn extractor(&self) -> Result<CommandExtractor> {
        match self.extractor_command.as_deref() {
            Some(cmd) if !cmd.trim().is_empty() => CommandExtractor::new(cmd),
            _ => Err(ConfigError::ExtractorNotConfigured.into()),
        }
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Pneu Checker Configuration")?;
        writeln!(f, "==========================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Store dir:          {}",
            self.store_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(
            f,
            "Extractor command:  {}",
            self.extractor_command.as_deref().unwrap_or("(not set)")
        )?;
        writeln!(f, "Output format:      {}", self.output_format)?;
        writeln!(f, "Extraction retries: {}", self.extraction_retries)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:        {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: Config = serde_json::from_str(r#"{"extractor_command": "ai-read"}"#).unwrap();
        assert_eq!(config.output_format, OutputFormat::Table);
        assert_eq!(config.extraction_retries, 2);
        assert!(config.store_dir.is_none());
        assert!(config.extractor().is_ok());
    }

    #[test]
    fn test_extractor_not_configured() {
        let config = Config::default();
        assert!(config.extractor().is_err());
    }

    #[test]
    fn test_store_dir_override() {
        let config = Config {
            store_dir: Some(PathBuf::from("/tmp/pneu")),
            ..Config::default()
        };
        assert_eq!(config.store_dir().unwrap(), PathBuf::from("/tmp/pneu"));
    }
}
