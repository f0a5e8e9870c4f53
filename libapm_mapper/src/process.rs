use std::sync::mpsc::Sender;

use super::appdef::AppDefParser;
use super::cameca_reader::CamecaParser;
use super::config::{Config, EntryConfig};
use super::eln_reader::ElnParser;
use super::error::ProcessorError;
use super::oasis_config_reader::OasisConfigParser;
use super::template::Template;
use super::worker_status::EntryStatus;

/// Build the template of a single entry from all of its configured inputs.
///
/// Parsers run in a fixed order against the same template: application definition,
/// deployment configuration, ELN, then Cameca. A later parser overwrites paths written
/// by an earlier one.
pub fn process_entry(entry: &EntryConfig) -> Result<Template, ProcessorError> {
    let mut template = Template::new();
    AppDefParser::new(entry.entry_id).parse(&mut template)?;

    if let Some(path) = &entry.oasis_config_path {
        OasisConfigParser::new(path, entry.entry_id)?.parse(&mut template)?;
    }
    if let Some(path) = &entry.eln_path {
        ElnParser::new(path, entry.entry_id)?.parse(&mut template)?;
    }
    if let Some(path) = &entry.cameca_path {
        CamecaParser::new(path, entry.entry_id)?.parse(&mut template)?;
    }
    Ok(template)
}

/// The function to be called by a separate thread (typically the CLI).
///
/// Converts every configured entry in order and writes each template as YAML into the
/// output directory. Progress is reported per entry.
pub fn process(config: Config, tx: Sender<EntryStatus>) -> Result<(), ProcessorError> {
    config.validate()?;
    for entry in config.entries.iter() {
        spdlog::info!("Processing entry {}...", entry.entry_id);
        tx.send(EntryStatus::new(0.0, entry.entry_id))?;

        let output_path = config.get_output_file_name(entry.entry_id)?;
        let template = process_entry(entry)?;
        template.write_yaml_file(&output_path)?;
        let size = output_path.metadata().map(|m| m.len()).unwrap_or(0);
        spdlog::info!(
            "Wrote {} paths to {} ({})",
            template.len(),
            output_path.display(),
            human_bytes::human_bytes(size as f64)
        );

        tx.send(EntryStatus::new(1.0, entry.entry_id))?;
        spdlog::info!("Finished processing entry {}.", entry.entry_id);
    }
    Ok(())
}
