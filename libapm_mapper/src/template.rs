use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use super::conversion::Number;
use super::error::TemplateError;
use super::metadata::MetadataValue;

/// A value stored in the Template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TemplateValue {
    Text(String),
    Boolean(bool),
    Integer(i64),
    Real(f64),
    TextArray(Vec<String>),
    IntegerArray(Vec<i64>),
    RealArray(Vec<f64>),
}

impl TemplateValue {
    /// Copy a metadata value verbatim.
    ///
    /// Records, and lists holding records or other lists, have no template
    /// representation. An empty list is an empty text array.
    pub fn from_metadata(value: &MetadataValue) -> Option<Self> {
        match value {
            MetadataValue::Text(text) => Some(Self::Text(text.clone())),
            MetadataValue::Integer(value) => Some(Self::Integer(*value)),
            MetadataValue::Real(value) => Some(Self::Real(*value)),
            MetadataValue::Boolean(value) => Some(Self::Boolean(*value)),
            MetadataValue::List(values) => Self::from_list(values),
            MetadataValue::Records(_) => None,
        }
    }

    fn from_list(values: &[MetadataValue]) -> Option<Self> {
        if values
            .iter()
            .any(|value| matches!(value, MetadataValue::List(_) | MetadataValue::Records(_)))
        {
            return None;
        }
        if values.is_empty() {
            return Some(Self::TextArray(Vec::new()));
        }

        let array = if values
            .iter()
            .all(|value| matches!(value, MetadataValue::Integer(_)))
        {
            Self::IntegerArray(
                values
                    .iter()
                    .filter_map(|value| match value {
                        MetadataValue::Integer(value) => Some(*value),
                        _ => None,
                    })
                    .collect(),
            )
        } else if values
            .iter()
            .all(|value| matches!(value, MetadataValue::Integer(_) | MetadataValue::Real(_)))
        {
            Self::RealArray(
                values
                    .iter()
                    .filter_map(|value| match value {
                        MetadataValue::Integer(value) => Some(*value as f64),
                        MetadataValue::Real(value) => Some(*value),
                        _ => None,
                    })
                    .collect(),
            )
        } else {
            Self::TextArray(values.iter().map(|value| value.to_string()).collect())
        };
        Some(array)
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for TemplateValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for TemplateValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for TemplateValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<Number> for TemplateValue {
    fn from(value: Number) -> Self {
        match value {
            Number::Integer(value) => Self::Integer(value),
            Number::Real(value) => Self::Real(value),
        }
    }
}

/// The Template accumulates resolved NeXus paths and their values for one entry.
///
/// It is only ever written to while parsing. Once complete it is handed off, as YAML,
/// to the schema verification and HDF5 serialization stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Template {
    entries: BTreeMap<String, TemplateValue>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a value at a resolved path. Later writes to the same path win.
    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<TemplateValue>) {
        self.entries.insert(path.into(), value.into());
    }

    pub fn get(&self, path: &str) -> Option<&TemplateValue> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TemplateValue)> {
        self.entries.iter()
    }

    pub fn to_yaml_string(&self) -> Result<String, TemplateError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Dump the template to a YAML file, truncating any existing file
    pub fn write_yaml_file(&self, path: &Path) -> Result<(), TemplateError> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(self.to_yaml_string()?.as_bytes())?;
        Ok(())
    }
}
