use super::constants::{NX_APM_ADEF_NAME, PROGRAM_NAME, PROGRAM_VERSION};
use super::error::ParserError;
use super::mapping::{apply_mapping, Functor, MappingTable};
use super::metadata::MetadataStore;
use super::template::Template;

/// Application definition and the software which produced the template
pub const APPDEF_TO_NEXUS: MappingTable = MappingTable {
    name: "appdef",
    prefix_trg: Some("/ENTRY[entry*]"),
    prefix: None,
    prefix_src: None,
    functors: &[
        Functor::use_text("definition", NX_APM_ADEF_NAME),
        Functor::use_text("profiling/programID[program1]/program", PROGRAM_NAME),
        Functor::use_text(
            "profiling/programID[program1]/program/@version",
            PROGRAM_VERSION,
        ),
    ],
};

/// Add the NXapm application definition specific contextualization to an entry
#[derive(Debug, Clone)]
pub struct AppDefParser {
    entry_id: u32,
}

impl AppDefParser {
    pub fn new(entry_id: u32) -> Self {
        Self {
            entry_id: entry_id.max(1),
        }
    }

    pub fn parse(&self, template: &mut Template) -> Result<(), ParserError> {
        apply_mapping(
            &APPDEF_TO_NEXUS,
            &MetadataStore::new(),
            &[self.entry_id],
            template,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateValue;

    #[test]
    fn test_appdef() {
        let mut template = Template::new();
        AppDefParser::new(2).parse(&mut template).unwrap();
        assert_eq!(
            template.get("/ENTRY[entry2]/definition"),
            Some(&TemplateValue::from("NXapm"))
        );
        assert_eq!(
            template.get("/ENTRY[entry2]/profiling/programID[program1]/program"),
            Some(&TemplateValue::from("libapm_mapper"))
        );
        assert!(template.contains("/ENTRY[entry2]/profiling/programID[program1]/program/@version"));
    }

    #[test]
    fn test_entry_zero_is_coerced() {
        let mut template = Template::new();
        AppDefParser::new(0).parse(&mut template).unwrap();
        assert!(template.contains("/ENTRY[entry1]/definition"));
    }
}
