use std::path::Path;

use super::cameca_cfg::CAMECA_TO_NEXUS;
use super::constants::CAMECA_FILE_SUFFIXES;
use super::error::ParserError;
use super::mapping::apply_mapping;
use super::metadata::MetadataStore;
use super::template::Template;

/// Parse metadata collected from IVAS / AP Suite and dumped as YAML (*.cameca)
#[derive(Debug, Clone)]
pub struct CamecaParser {
    entry_id: u32,
    store: Option<MetadataStore>,
}

impl CamecaParser {
    pub fn new(path: &Path, entry_id: u32) -> Result<Self, ParserError> {
        spdlog::info!("Extracting data from IVAS/APSuite file: {}", path.display());
        let store = MetadataStore::load_input_file(path, &CAMECA_FILE_SUFFIXES)?;
        Ok(Self {
            entry_id: entry_id.max(1),
            store,
        })
    }

    pub fn from_store(store: MetadataStore, entry_id: u32) -> Self {
        Self {
            entry_id: entry_id.max(1),
            store: Some(store),
        }
    }

    /// Nothing is written unless a file was loaded and holds keys
    pub fn parse(&self, template: &mut Template) -> Result<(), ParserError> {
        let Some(store) = self.store.as_ref().filter(|store| !store.is_empty()) else {
            return Ok(());
        };
        apply_mapping(&CAMECA_TO_NEXUS, store, &[self.entry_id], template)?;
        Ok(())
    }
}
