use std::path::Path;

use super::constants::OASIS_CONFIG_FILE_SUFFIXES;
use super::error::ParserError;
use super::mapping::apply_mapping;
use super::metadata::MetadataStore;
use super::oasis_cfg::{CITATION_TO_NEXUS, CSYS_MCSTASLIKE_TO_NEXUS, OASISCONFIG_TO_NEXUS};
use super::template::Template;

const CITATION_KEY: &str = "citation";

/// Parse the deployment-specific configuration of a NOMAD Oasis
#[derive(Debug, Clone)]
pub struct OasisConfigParser {
    entry_id: u32,
    store: Option<MetadataStore>,
}

impl OasisConfigParser {
    pub fn new(path: &Path, entry_id: u32) -> Result<Self, ParserError> {
        spdlog::info!(
            "Extracting data from deployment-specific configuration file: {}",
            path.display()
        );
        let store = MetadataStore::load_input_file(path, &OASIS_CONFIG_FILE_SUFFIXES)?;
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

    fn parse_citations(
        &self,
        store: &MetadataStore,
        template: &mut Template,
    ) -> Result<(), ParserError> {
        let Some(citations) = store.records(CITATION_KEY) else {
            return Ok(());
        };
        for (cite_id, citation) in (1..).zip(citations.iter().filter(|c| !c.is_empty())) {
            apply_mapping(
                &CITATION_TO_NEXUS,
                citation,
                &[self.entry_id, cite_id],
                template,
            )?;
        }
        Ok(())
    }

    /// Write the deployment quantities, the reference frame and the citations.
    ///
    /// The reference frame is made of literals, so it is only written once a
    /// configuration file was actually loaded and holds keys.
    pub fn parse(&self, template: &mut Template) -> Result<(), ParserError> {
        let Some(store) = self.store.as_ref().filter(|store| !store.is_empty()) else {
            return Ok(());
        };
        let identifier = [self.entry_id];
        apply_mapping(&OASISCONFIG_TO_NEXUS, store, &identifier, template)?;
        apply_mapping(&CSYS_MCSTASLIKE_TO_NEXUS, store, &identifier, template)?;
        self.parse_citations(store, template)
    }
}
