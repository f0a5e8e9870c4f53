use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

use super::constants::PATH_DELIMITER;
use super::error::MetadataError;

/// A single value in a MetadataStore.
///
/// Lists of mappings (the way the ELN custom schema delivers users, laser sources, ...)
/// are kept as Records, where each record is flattened into its own store. Other lists
/// keep their elements as they are, including nested lists and mappings.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    List(Vec<MetadataValue>),
    Records(Vec<MetadataStore>),
}

impl MetadataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_records(&self) -> Option<&[MetadataStore]> {
        match self {
            Self::Records(records) => Some(records),
            _ => None,
        }
    }
}

impl Display for MetadataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::List(values) => {
                let items: Vec<String> = values.iter().map(|value| value.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Self::Records(records) => write!(f, "<{} records>", records.len()),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// MetadataStore is the flattened view of a metadata document.
///
/// Nested mappings are collapsed into slash-delimited keys, so that
/// `sample: {grain_diameter: {value: 3.5}}` is stored under `sample/grain_diameter/value`.
/// Keys are kept ordered. A store is read-only once a mapping is applied to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataStore {
    entries: BTreeMap<String, MetadataValue>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document and flatten it
    pub fn from_yaml_str(yaml_str: &str) -> Result<Self, MetadataError> {
        let value: Value = serde_yaml::from_str(yaml_str)?;
        Self::from_yaml_value(&value)
    }

    /// Flatten an already parsed YAML document. An empty document yields an empty store.
    pub fn from_yaml_value(value: &Value) -> Result<Self, MetadataError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(mapping) => Ok(Self::from_mapping(mapping)),
            Value::Tagged(tagged) => Self::from_yaml_value(&tagged.value),
            _ => Err(MetadataError::RootNotMapping),
        }
    }

    /// Read and flatten a YAML file
    pub fn read_yaml_file(path: &Path) -> Result<Self, MetadataError> {
        if !path.exists() {
            return Err(MetadataError::BadFilePath(path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml_str)
    }

    /// Load an input file if its name ends with one of the accepted suffixes.
    ///
    /// Files with other names, and files which do not exist, are skipped with a warning
    /// and yield None; the entry is then converted from whatever other inputs are available.
    pub fn load_input_file(path: &Path, suffixes: &[&str]) -> Result<Option<Self>, MetadataError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        if !suffixes.iter().any(|suffix| file_name.ends_with(suffix)) {
            spdlog::warn!(
                "{} is not an accepted input (expected a name ending in {}), skipping",
                path.display(),
                suffixes.join(" or ")
            );
            return Ok(None);
        }

        match Self::read_yaml_file(path) {
            Ok(store) => {
                let size = path.metadata().map(|m| m.len()).unwrap_or(0);
                spdlog::info!(
                    "Extracted {} keys from {} ({})",
                    store.len(),
                    path.display(),
                    human_bytes::human_bytes(size as f64)
                );
                for (key, value) in store.iter() {
                    spdlog::debug!("key: {key}, value: {value}");
                }
                Ok(Some(store))
            }
            Err(MetadataError::BadFilePath(missing)) => {
                spdlog::warn!("File {} not found, skipping", missing.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Get the text stored at key, None if absent or not text
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetadataValue::as_text)
    }

    /// Get the records stored at key, None if absent or not a list of mappings
    pub fn records(&self, key: &str) -> Option<&[MetadataStore]> {
        self.get(key).and_then(MetadataValue::as_records)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetadataValue)> {
        self.entries.iter()
    }

    fn from_mapping(mapping: &Mapping) -> Self {
        let mut store = Self::default();
        store.flatten_mapping("", mapping);
        store
    }

    fn flatten_mapping(&mut self, prefix: &str, mapping: &Mapping) {
        for (key, value) in mapping {
            let Some(key) = key_to_string(key) else {
                spdlog::debug!("Skipping metadata with a non-scalar key below {prefix:?}");
                continue;
            };
            let full_key = if prefix.is_empty() {
                key
            } else {
                format!("{prefix}{PATH_DELIMITER}{key}")
            };
            match value {
                Value::Mapping(nested) => self.flatten_mapping(&full_key, nested),
                _ => {
                    if let Some(converted) = convert_value(value) {
                        self.entries.insert(full_key, converted);
                    }
                }
            }
        }
    }
}

fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(key) => Some(key.clone()),
        Value::Number(key) => Some(key.to_string()),
        Value::Bool(key) => Some(key.to_string()),
        _ => None,
    }
}

/// Convert a YAML leaf into a MetadataValue. Nulls are dropped.
fn convert_value(value: &Value) -> Option<MetadataValue> {
    match value {
        Value::Null => None,
        Value::Bool(value) => Some(MetadataValue::Boolean(*value)),
        Value::Number(number) => match number.as_i64() {
            Some(value) => Some(MetadataValue::Integer(value)),
            None => number.as_f64().map(MetadataValue::Real),
        },
        Value::String(value) => Some(MetadataValue::Text(value.clone())),
        Value::Sequence(items) => {
            if !items.is_empty() && items.iter().all(Value::is_mapping) {
                Some(MetadataValue::Records(
                    items
                        .iter()
                        .filter_map(Value::as_mapping)
                        .map(MetadataStore::from_mapping)
                        .collect(),
                ))
            } else {
                Some(MetadataValue::List(
                    items.iter().filter_map(convert_value).collect(),
                ))
            }
        }
        Value::Mapping(mapping) => Some(MetadataValue::Records(vec![
            MetadataStore::from_mapping(mapping),
        ])),
        Value::Tagged(tagged) => convert_value(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ELN_YAML: &str = r#"
entry:
  run_number: "42"
  start_time: 2024-01-01T10:00:00+00:00
sample:
  alias: Sample-A
  grain_diameter:
    value: 3.5
    unit: µm
  is_polycrystalline: true
  empty_field:
user:
  - name: Jane Doe
    orcid: 0000-0001-2345-6789
  - name: John Doe
    social:
      platform: mastodon
tags: [apt, leap, 5000]
"#;

    #[test]
    fn test_flatten_nested_mappings() {
        let store = MetadataStore::from_yaml_str(ELN_YAML).unwrap();
        assert_eq!(store.text("entry/run_number"), Some("42"));
        assert_eq!(store.text("sample/alias"), Some("Sample-A"));
        assert_eq!(
            store.get("sample/grain_diameter/value"),
            Some(&MetadataValue::Real(3.5))
        );
        assert_eq!(store.text("sample/grain_diameter/unit"), Some("µm"));
        assert_eq!(
            store.get("sample/is_polycrystalline"),
            Some(&MetadataValue::Boolean(true))
        );
        assert!(!store.contains("sample"));
        assert!(!store.contains("sample/grain_diameter"));
    }

    #[test]
    fn test_nulls_are_absent() {
        let store = MetadataStore::from_yaml_str(ELN_YAML).unwrap();
        assert!(!store.contains("sample/empty_field"));
    }

    #[test]
    fn test_records_are_flattened_individually() {
        let store = MetadataStore::from_yaml_str(ELN_YAML).unwrap();
        let users = store.records("user").unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].text("name"), Some("Jane Doe"));
        assert_eq!(users[0].text("orcid"), Some("0000-0001-2345-6789"));
        assert_eq!(users[1].text("social/platform"), Some("mastodon"));
        assert!(!users[1].contains("orcid"));
    }

    #[test]
    fn test_scalar_lists() {
        let store = MetadataStore::from_yaml_str(ELN_YAML).unwrap();
        assert_eq!(
            store.get("tags"),
            Some(&MetadataValue::List(vec![
                MetadataValue::from("apt"),
                MetadataValue::from("leap"),
                MetadataValue::Integer(5000),
            ]))
        );
        assert_eq!(store.get("tags").unwrap().to_string(), "[apt, leap, 5000]");
    }

    #[test]
    fn test_nested_lists_are_kept() {
        let store =
            MetadataStore::from_yaml_str("matrix: [[1, 0], [0, 1]]
mixed: [1, {a: 2}]
empty: []
")
                .unwrap();
        assert!(matches!(
            store.get("matrix"),
            Some(MetadataValue::List(rows)) if matches!(rows[0], MetadataValue::List(_))
        ));
        assert!(matches!(
            store.get("mixed"),
            Some(MetadataValue::List(items)) if matches!(items[1], MetadataValue::Records(_))
        ));
        assert_eq!(store.get("empty"), Some(&MetadataValue::List(vec![])));
    }

    #[test]
    fn test_empty_document() {
        let store = MetadataStore::from_yaml_str("").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_root_must_be_mapping() {
        match MetadataStore::from_yaml_str("- a\n- b\n") {
            Err(MetadataError::RootNotMapping) => (),
            other => panic!("Expected RootNotMapping, got {other:?}"),
        }
    }

    #[test]
    fn test_load_input_file() {
        let dir = std::env::temp_dir().join("libapm_mapper_metadata_load");
        std::fs::create_dir_all(&dir).unwrap();
        let accepted = dir.join("run42.eln_data.yaml");
        std::fs::write(&accepted, ELN_YAML).unwrap();
        let rejected = dir.join("run42.notes.yaml");
        std::fs::write(&rejected, ELN_YAML).unwrap();
        let suffixes = ["eln_data.yaml", "eln_data.yml"];

        let store = MetadataStore::load_input_file(&accepted, &suffixes)
            .unwrap()
            .unwrap();
        assert_eq!(store.text("sample/alias"), Some("Sample-A"));

        assert_eq!(
            MetadataStore::load_input_file(&rejected, &suffixes).unwrap(),
            None
        );
        assert_eq!(
            MetadataStore::load_input_file(&dir.join("missing.eln_data.yml"), &suffixes).unwrap(),
            None
        );

        let broken = dir.join("broken.eln_data.yaml");
        std::fs::write(&broken, "sample: [unclosed\n").unwrap();
        assert!(MetadataStore::load_input_file(&broken, &suffixes).is_err());
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("libapm_mapper_does_not_exist.eln_data.yaml");
        match MetadataStore::read_yaml_file(&path) {
            Err(MetadataError::BadFilePath(p)) => assert_eq!(p, path),
            other => panic!("Expected BadFilePath, got {other:?}"),
        }
    }
}
