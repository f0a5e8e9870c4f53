use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::error::ConfigError;

/// The input files describing one NXapm entry. Each input is optional; an entry
/// built from fewer inputs simply carries less metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryConfig {
    pub entry_id: u32,
    #[serde(default)]
    pub eln_path: Option<PathBuf>,
    #[serde(default)]
    pub oasis_config_path: Option<PathBuf>,
    #[serde(default)]
    pub cameca_path: Option<PathBuf>,
}

/// Structure representing the application configuration. Contains the output location
/// and the list of entries to convert.
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub output_path: PathBuf,
    #[serde(default)]
    pub verbose: bool,
    pub entries: Vec<EntryConfig>,
}

impl Default for Config {
    /// Generate a new Config object with a single example entry. Paths are placeholders.
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("None"),
            verbose: false,
            entries: vec![EntryConfig {
                entry_id: 1,
                eln_path: Some(PathBuf::from("None.eln_data.yaml")),
                oasis_config_path: Some(PathBuf::from("None.oasis.specific.yaml")),
                cameca_path: None,
            }],
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }

    /// Check that there is work to do and that every entry id is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::NoEntries);
        }
        let mut seen = BTreeSet::new();
        for entry in self.entries.iter() {
            if entry.entry_id == 0 {
                return Err(ConfigError::InvalidEntryId(entry.entry_id));
            }
            if !seen.insert(entry.entry_id) {
                return Err(ConfigError::DuplicateEntryId(entry.entry_id));
            }
        }
        Ok(())
    }

    /// Get the path to the output template of an entry
    pub fn get_output_file_name(&self, entry_id: u32) -> Result<PathBuf, ConfigError> {
        let output_file_path = self
            .output_path
            .join(format!("{}.yaml", Self::get_entry_str(entry_id)));
        if self.output_path.exists() {
            Ok(output_file_path)
        } else {
            Err(ConfigError::BadFilePath(self.output_path.clone()))
        }
    }

    fn get_entry_str(entry_id: u32) -> String {
        format!("entry_{entry_id:0>4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_YAML: &str = r#"
output_path: /tmp
verbose: true
entries:
  - entry_id: 1
    eln_path: /data/R5076_38411.eln_data.yaml
    oasis_config_path: /data/berlin.oasis.specific.yaml
  - entry_id: 2
    cameca_path: /data/R5076_38412.cameca
"#;

    #[test]
    fn test_deserialize() {
        let config: Config = serde_yaml::from_str(CONFIG_YAML).unwrap();
        assert!(config.verbose);
        assert_eq!(config.entries.len(), 2);
        assert_eq!(
            config.entries[0].eln_path.as_deref(),
            Some(Path::new("/data/R5076_38411.eln_data.yaml"))
        );
        assert_eq!(config.entries[1].eln_path, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let mut config: Config = serde_yaml::from_str(CONFIG_YAML).unwrap();
        config.entries[1].entry_id = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateEntryId(1))
        ));
        config.entries[1].entry_id = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEntryId(0))
        ));
        config.entries.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoEntries)));
    }

    #[test]
    fn test_output_file_name() {
        let mut config = Config::default();
        config.output_path = std::env::temp_dir();
        assert_eq!(
            config.get_output_file_name(7).unwrap(),
            std::env::temp_dir().join("entry_0007.yaml")
        );
        config.output_path = PathBuf::from("/definitely/not/a/real/directory");
        assert!(matches!(
            config.get_output_file_name(7),
            Err(ConfigError::BadFilePath(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join("libapm_mapper_config_round_trip.yaml");
        let config = Config::default();
        config.write_config_file(&path).unwrap();
        assert_eq!(Config::read_config_file(&path).unwrap(), config);
        assert!(matches!(
            Config::read_config_file(Path::new("/definitely/not/a/config.yaml")),
            Err(ConfigError::BadFilePath(_))
        ));
    }
}
