use std::path::{Path, PathBuf};

use super::checksum::sha256_of_file;
use super::constants::{ELN_FILE_SUFFIXES, PATH_DELIMITER};
use super::eln_cfg::{
    ELN_ENTRY_TABLES, IDENTIFIER_TO_NEXUS, LASER_SOURCE_DYNAMIC_TO_NEXUS,
    LASER_SOURCE_STATIC_TO_NEXUS, USER_TO_NEXUS, WORKFLOW_CHECKSUMS, WORKFLOW_PREFIX_SRC,
    WORKFLOW_PREFIX_TRG,
};
use super::error::ParserError;
use super::mapping::apply_mapping;
use super::metadata::MetadataStore;
use super::template::{Template, TemplateValue};
use super::variadic::resolve_variadic_path;

const PULSE_MODE_KEY: &str = "instrument/pulser/pulse_mode";
const LASER_SOURCE_KEY: &str = "instrument/pulser/laser_source";
const USER_KEY: &str = "user";

/// Parse the eln_data.yaml dump of a NOMAD Oasis custom schema ELN.
///
/// The ELN carries the pieces of information which vendor files typically lack
/// (who measured, which specimen, how the instrument was set up). The parser does not
/// check that the result is a valid NXapm instance; that is left to the verification
/// stage downstream.
#[derive(Debug, Clone)]
pub struct ElnParser {
    entry_id: u32,
    store: Option<MetadataStore>,
    /// Relative workflow file paths are resolved against this directory
    base_dir: PathBuf,
}

impl ElnParser {
    /// Load an ELN dump. Files not named *eln_data.yaml or *eln_data.yml are ignored.
    pub fn new(path: &Path, entry_id: u32) -> Result<Self, ParserError> {
        spdlog::info!("Extracting data from ELN file: {}", path.display());
        let store = MetadataStore::load_input_file(path, &ELN_FILE_SUFFIXES)?;
        Ok(Self {
            entry_id: entry_id.max(1),
            store,
            base_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        })
    }

    /// Parser over an in-memory store; workflow files are resolved against the
    /// working directory
    pub fn from_store(store: MetadataStore, entry_id: u32) -> Self {
        Self {
            entry_id: entry_id.max(1),
            store: Some(store),
            base_dir: PathBuf::new(),
        }
    }

    pub fn entry_id(&self) -> u32 {
        self.entry_id
    }

    /// Copy the laser sources of the pulser. Nothing is written for voltage pulsing.
    fn parse_pulser_source(
        &self,
        store: &MetadataStore,
        template: &mut Template,
    ) -> Result<(), ParserError> {
        if store.text(PULSE_MODE_KEY) == Some("voltage") {
            return Ok(());
        }

        let Some(sources) = store.records(LASER_SOURCE_KEY) else {
            spdlog::warn!("pulse_mode != voltage but no laser details specified!");
            return Ok(());
        };
        for (laser_id, source) in (1..).zip(sources) {
            let identifier = [self.entry_id, laser_id];
            apply_mapping(&LASER_SOURCE_STATIC_TO_NEXUS, source, &identifier, template)?;
            apply_mapping(&LASER_SOURCE_DYNAMIC_TO_NEXUS, source, &identifier, template)?;
        }
        Ok(())
    }

    /// Copy every non-empty user record, numbering users from 1
    fn parse_user(&self, store: &MetadataStore, template: &mut Template) -> Result<(), ParserError> {
        let Some(users) = store.records(USER_KEY) else {
            return Ok(());
        };
        let mut user_id = 1;
        for user in users.iter().filter(|user| !user.is_empty()) {
            let identifier = [self.entry_id, user_id];
            apply_mapping(&USER_TO_NEXUS, user, &identifier, template)?;
            if user.contains("orcid") {
                apply_mapping(&IDENTIFIER_TO_NEXUS, user, &identifier, template)?;
            }
            user_id += 1;
        }
        spdlog::debug!("Parsed {} user(s) for entry {}", user_id - 1, self.entry_id);
        Ok(())
    }

    /// Write the SHA-256 digest of every workflow file named in the ELN.
    /// Files which do not exist are skipped.
    fn parse_workflow(
        &self,
        store: &MetadataStore,
        template: &mut Template,
    ) -> Result<(), ParserError> {
        for (target, source) in WORKFLOW_CHECKSUMS {
            let key = format!("{WORKFLOW_PREFIX_SRC}{PATH_DELIMITER}{source}");
            let Some(file_name) = store.text(&key) else {
                continue;
            };
            let file_path = self.base_dir.join(file_name);
            if !file_path.exists() {
                spdlog::warn!(
                    "Workflow file {} does not exist, no checksum written for {key}",
                    file_path.display()
                );
                continue;
            }
            let digest = sha256_of_file(&file_path)
                .map_err(|e| ParserError::ChecksumError(file_path.clone(), e))?;
            let Some(path) = resolve_variadic_path(
                &format!("{WORKFLOW_PREFIX_TRG}/{target}"),
                &[self.entry_id],
            ) else {
                continue;
            };
            spdlog::debug!("Checksum of {}: {digest}", file_path.display());
            template.insert(path, TemplateValue::Text(digest));
        }
        Ok(())
    }

    /// Write everything the ELN holds. Nothing is written unless a file was loaded
    /// and holds keys.
    pub fn parse(&self, template: &mut Template) -> Result<(), ParserError> {
        let Some(store) = self.store.as_ref().filter(|store| !store.is_empty()) else {
            return Ok(());
        };
        self.parse_user(store, template)?;
        self.parse_pulser_source(store, template)?;
        let identifier = [self.entry_id];
        for table in ELN_ENTRY_TABLES {
            apply_mapping(table, store, &identifier, template)?;
        }
        self.parse_workflow(store, template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateValue;

    const ELN_YAML: &str = r#"
entry:
  run_number: "42"
  start_time: "2024-05-02T09:30:00+00:00"
sample:
  alias: Fe-Cr alloy
  grain_diameter:
    value: 12.5
    unit: µm
specimen:
  alias: tip-7
  is_polycrystalline: yes
instrument:
  instrument_name: LEAP 5000 XS
  pulser:
    pulse_mode: laser
    pulse_frequency:
      value: 250.0
      unit: kHz
    laser_source:
      - name: UV laser
        wavelength:
          value: 355.0
          unit: nm
        power:
          value: 2.5
          unit: nW
        pulse_energy:
          value: 40
          unit: pJ
      - name: backup laser
user:
  - name: Jane Doe
    affiliation: NOMAD
    orcid: 0000-0001-2345-6789
  - {}
  - name: John Doe
"#;

    fn parse_yaml(yaml: &str, entry_id: u32) -> Template {
        let store = MetadataStore::from_yaml_str(yaml).unwrap();
        let mut template = Template::new();
        ElnParser::from_store(store, entry_id)
            .parse(&mut template)
            .unwrap();
        template
    }

    #[test]
    fn test_single_entry_tables() {
        let template = parse_yaml(ELN_YAML, 1);
        assert_eq!(
            template.get("/ENTRY[entry1]/run_number"),
            Some(&TemplateValue::from("42"))
        );
        assert_eq!(
            template.get("/ENTRY[entry1]/sample/alias"),
            Some(&TemplateValue::from("Fe-Cr alloy"))
        );
        assert_eq!(
            template.get("/ENTRY[entry1]/sample/grain_diameter"),
            Some(&TemplateValue::Real(12.5))
        );
        assert_eq!(
            template.get("/ENTRY[entry1]/sample/grain_diameter/@units"),
            Some(&TemplateValue::from("µm"))
        );
        assert_eq!(
            template.get("/ENTRY[entry1]/specimen/is_polycrystalline"),
            Some(&TemplateValue::Boolean(true))
        );
        assert_eq!(
            template.get(
                "/ENTRY[entry1]/measurement/event_data_apm_set/event_data_apm/instrument/pulser/pulse_frequency"
            ),
            Some(&TemplateValue::Real(250.0))
        );
        assert!(!template.contains("/ENTRY[entry1]/sample/description"));
    }

    #[test]
    fn test_laser_sources() {
        let template = parse_yaml(ELN_YAML, 2);
        let static_prefix = "/ENTRY[entry2]/measurement/instrument/pulser";
        assert_eq!(
            template.get(&format!("{static_prefix}/sourceID[source1]/name")),
            Some(&TemplateValue::from("UV laser"))
        );
        assert_eq!(
            template.get(&format!("{static_prefix}/sourceID[source1]/wavelength")),
            Some(&TemplateValue::Real(355.0))
        );
        assert_eq!(
            template.get(&format!("{static_prefix}/sourceID[source2]/name")),
            Some(&TemplateValue::from("backup laser"))
        );
        let dynamic_prefix = "/ENTRY[entry2]/measurement/event_data_apm_set/event_data_apm/instrument/pulser";
        assert_eq!(
            template.get(&format!("{dynamic_prefix}/sourceID[source1]/power/@units")),
            Some(&TemplateValue::from("nW"))
        );
        assert!(!template.contains(&format!("{dynamic_prefix}/sourceID[source2]/power")));
    }

    #[test]
    fn test_voltage_pulsing_skips_lasers() {
        let yaml = ELN_YAML.replace("pulse_mode: laser", "pulse_mode: voltage");
        let template = parse_yaml(&yaml, 1);
        assert!(template
            .iter()
            .all(|(path, _)| !path.contains("sourceID[source")));
        assert_eq!(
            template.get("/ENTRY[entry1]/measurement/instrument/pulser/pulse_mode"),
            Some(&TemplateValue::from("voltage"))
        );
    }

    #[test]
    fn test_users_are_numbered_consecutively() {
        let template = parse_yaml(ELN_YAML, 1);
        assert_eq!(
            template.get("/ENTRY[entry1]/USER[user1]/name"),
            Some(&TemplateValue::from("Jane Doe"))
        );
        assert_eq!(
            template.get("/ENTRY[entry1]/USER[user1]/identifierNAME[identifier]/service"),
            Some(&TemplateValue::from("orcid"))
        );
        assert_eq!(
            template.get("/ENTRY[entry1]/USER[user1]/identifierNAME[identifier]/identifier"),
            Some(&TemplateValue::from("0000-0001-2345-6789"))
        );
        // The empty record does not consume an id
        assert_eq!(
            template.get("/ENTRY[entry1]/USER[user2]/name"),
            Some(&TemplateValue::from("John Doe"))
        );
        assert!(!template.contains("/ENTRY[entry1]/USER[user2]/identifierNAME[identifier]/service"));
        assert!(!template.contains("/ENTRY[entry1]/USER[user3]/name"));
    }

    #[test]
    fn test_entry_zero_is_coerced() {
        let parser = ElnParser::from_store(MetadataStore::new(), 0);
        assert_eq!(parser.entry_id(), 1);
    }

    #[test]
    fn test_unaccepted_file_writes_nothing() {
        let dir = std::env::temp_dir().join("libapm_mapper_eln_reader");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("measurement.yaml");
        std::fs::write(&path, ELN_YAML).unwrap();

        let mut template = Template::new();
        ElnParser::new(&path, 1).unwrap().parse(&mut template).unwrap();
        assert!(template.is_empty());
    }

    #[test]
    fn test_missing_file_writes_nothing() {
        let path = std::env::temp_dir().join("libapm_mapper_no_such_run.eln_data.yaml");
        let parser = ElnParser::new(&path, 1).unwrap();
        let mut template = Template::new();
        parser.parse(&mut template).unwrap();
        assert!(template.is_empty());
    }

    #[test]
    fn test_workflow_checksums() {
        let dir = std::env::temp_dir().join("libapm_mapper_eln_workflow");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("R5076_38411.rhit"), b"Hello, World!").unwrap();
        let yaml = format!(
            "{ELN_YAML}workflow:\n  hit_dat_file: R5076_38411.rhit\n  recon_cfg_file: missing.root\n"
        );
        let eln_path = dir.join("R5076_38411.eln_data.yaml");
        std::fs::write(&eln_path, yaml).unwrap();

        let mut template = Template::new();
        ElnParser::new(&eln_path, 1)
            .unwrap()
            .parse(&mut template)
            .unwrap();
        assert_eq!(
            template.get("/ENTRY[entry1]/atom_probe/hit_finding/SERIALIZED[serialized]/checksum"),
            Some(&TemplateValue::from(
                "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
            ))
        );
        assert!(!template.contains("/ENTRY[entry1]/atom_probe/reconstruction/config/checksum"));
        assert!(!template.contains("/ENTRY[entry1]/atom_probe/raw_data/SERIALIZED[serialized]/checksum"));
        assert!(template.iter().all(|(_, value)| *value != TemplateValue::from("R5076_38411.rhit")));
    }

    #[test]
    fn test_unreadable_workflow_file_is_an_error() {
        let dir = std::env::temp_dir().join("libapm_mapper_eln_unreadable");
        std::fs::create_dir_all(dir.join("raw.d")).unwrap();
        let eln_path = dir.join("run.eln_data.yaml");
        std::fs::write(&eln_path, "workflow:\n  raw_dat_file: raw.d\n").unwrap();

        let mut template = Template::new();
        let result = ElnParser::new(&eln_path, 1).unwrap().parse(&mut template);
        assert!(matches!(result, Err(ParserError::ChecksumError(..))));
    }

    #[test]
    fn test_bad_boolean_is_an_error() {
        let yaml = ELN_YAML.replace("is_polycrystalline: yes", "is_polycrystalline: perhaps");
        let store = MetadataStore::from_yaml_str(&yaml).unwrap();
        let mut template = Template::new();
        assert!(ElnParser::from_store(store, 1).parse(&mut template).is_err());
    }
}
