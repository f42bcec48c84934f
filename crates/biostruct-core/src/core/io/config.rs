use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid data block name '{0}': must be non-empty and contain no whitespace")]
    InvalidBlockName(String),
}

/// Options shared by the PDB and mmCIF serializers.
///
/// Loaded from TOML, every key is optional:
///
/// ```toml
/// write_header = true
/// write_connections = false
/// data_block_name = "MY_MODEL"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterConfig {
    /// Emit header, citation, cross-reference and crystal records.
    pub write_header: bool,
    /// Emit CONECT records / the `_struct_conn` category.
    pub write_connections: bool,
    /// Overrides the mmCIF `data_` block name (defaults to the PDB code).
    pub data_block_name: Option<String>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            write_header: true,
            write_connections: true,
            data_block_name: None,
        }
    }
}

impl WriterConfig {
    pub fn builder() -> WriterConfigBuilder {
        WriterConfigBuilder::new()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match &self.data_block_name {
            Some(name) if name.is_empty() || name.contains(char::is_whitespace) => {
                Err(ConfigError::InvalidBlockName(name.clone()))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct WriterConfigBuilder {
    write_header: Option<bool>,
    write_connections: Option<bool>,
    data_block_name: Option<String>,
}

impl WriterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_header(mut self, enabled: bool) -> Self {
        self.write_header = Some(enabled);
        self
    }
    pub fn write_connections(mut self, enabled: bool) -> Self {
        self.write_connections = Some(enabled);
        self
    }
    pub fn data_block_name(mut self, name: &str) -> Self {
        self.data_block_name = Some(name.to_string());
        self
    }

    pub fn build(self) -> Result<WriterConfig, ConfigError> {
        let defaults = WriterConfig::default();
        let config = WriterConfig {
            write_header: self.write_header.unwrap_or(defaults.write_header),
            write_connections: self
                .write_connections
                .unwrap_or(defaults.write_connections),
            data_block_name: self.data_block_name,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn builder_fills_in_defaults() {
        let config = WriterConfig::builder().write_connections(false).build().unwrap();
        assert!(config.write_header);
        assert!(!config.write_connections);
        assert_eq!(config.data_block_name, None);
        assert_eq!(WriterConfigBuilder::new().build().unwrap(), WriterConfig::default());
    }

    #[test]
    fn builder_rejects_block_name_with_whitespace() {
        let result = WriterConfig::builder().data_block_name("my model").build();
        assert!(matches!(result, Err(ConfigError::InvalidBlockName(_))));
    }

    #[test]
    fn from_toml_str_accepts_partial_tables() {
        let config = WriterConfig::from_toml_str("data_block_name = \"1ABC_FIXED\"").unwrap();
        assert!(config.write_header);
        assert_eq!(config.data_block_name.as_deref(), Some("1ABC_FIXED"));
    }

    #[test]
    fn from_toml_str_rejects_unknown_keys() {
        let result = WriterConfig::from_toml_str("write_everything = true");
        assert!(matches!(result, Err(ConfigError::Toml { .. })));
    }

    #[test]
    fn load_reads_config_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("writer.toml");
        fs::write(&file_path, "write_header = false\nwrite_connections = false\n").unwrap();

        let config = WriterConfig::load(&file_path).unwrap();
        assert!(!config.write_header);
        assert!(!config.write_connections);
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = WriterConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
