//! Mapping tables from the NOMAD Oasis ELN custom schema (eln_data.yaml) onto NXapm.
//!
//! Until the custom schema and NXapm share a harmonized vocabulary, these tables name
//! explicitly which piece of the ELN lands on which NeXus concept.
use super::mapping::{Functor, MappingTable};

pub const ENTRY_TO_NEXUS: MappingTable = MappingTable {
    name: "entry",
    prefix_trg: Some("/ENTRY[entry*]"),
    prefix: None,
    prefix_src: Some("entry"),
    functors: &[
        Functor::to_str_from("experiment_alias", "run_number"),
        Functor::to_str("run_number"),
        Functor::to_str("operation_mode"),
        Functor::to_str("method"),
        Functor::to_str("start_time"),
        Functor::to_str("end_time"),
        Functor::to_str("experiment_description"),
    ],
};

pub const SAMPLE_TO_NEXUS: MappingTable = MappingTable {
    name: "sample",
    prefix_trg: Some("/ENTRY[entry*]/sample"),
    prefix: None,
    prefix_src: Some("sample"),
    functors: &[
        Functor::use_text("method", "experiment"),
        Functor::to_str("alias"),
        Functor::to_str("description"),
        Functor::to_str_from("grain_diameter/@units", "grain_diameter/unit"),
        Functor::to_str_from("grain_diameter_error/@units", "grain_diameter/unit"),
        Functor::to_str_from(
            "heat_treatment_temperature/@units",
            "heat_treatment_temperature/unit",
        ),
        Functor::to_str_from(
            "heat_treatment_temperature_error/@units",
            "heat_treatment_temperature_error/unit",
        ),
        Functor::to_str_from(
            "heat_treatment_quenching_rate/@units",
            "heat_treatment_quenching_rate/unit",
        ),
        Functor::to_str_from(
            "heat_treatment_quenching_rate_error/@units",
            "heat_treatment_quenching_rate_error/unit",
        ),
        Functor::to_real_from("grain_diameter", "grain_diameter/value"),
        Functor::to_real_from("grain_diameter_error", "grain_diameter_error/value"),
        Functor::to_real_from(
            "heat_treatment_temperature",
            "heat_treatment_temperature/value",
        ),
        Functor::to_real_from(
            "heat_treatment_temperature_error",
            "heat_treatment_temperature_error/value",
        ),
        Functor::to_real_from(
            "heat_treatment_quenching_rate",
            "heat_treatment_quenching_rate/value",
        ),
        Functor::to_real_from(
            "heat_treatment_quenching_rate_error",
            "heat_treatment_quenching_rate_error/value",
        ),
    ],
};

pub const SPECIMEN_TO_NEXUS: MappingTable = MappingTable {
    name: "specimen",
    prefix_trg: Some("/ENTRY[entry*]/specimen"),
    prefix: None,
    prefix_src: Some("specimen"),
    functors: &[
        Functor::to_str("alias"),
        Functor::to_str("preparation_date"),
        Functor::to_str("description"),
        Functor::to_str_from("initial_radius/@units", "initial_radius/unit"),
        Functor::to_str_from("shank_angle/@units", "shank_angle/unit"),
        Functor::to_bool("is_polycrystalline"),
        Functor::to_bool("is_amorphous"),
        Functor::to_real_from("initial_radius", "initial_radius/value"),
        Functor::to_real_from("shank_angle", "shank_angle/value"),
    ],
};

pub const INSTRUMENT_STATIC_TO_NEXUS: MappingTable = MappingTable {
    name: "instrument_static",
    prefix_trg: Some("/ENTRY[entry*]/measurement/instrument"),
    prefix: None,
    prefix_src: Some("instrument"),
    functors: &[
        Functor::to_str("status"),
        Functor::to_str("instrument_name"),
        Functor::to_str("location"),
        Functor::to_str_from("fabrication/vendor", "fabrication_vendor"),
        Functor::to_str_from("fabrication/model", "fabrication_model"),
        Functor::to_str_from("fabrication/identifier", "fabrication_identifier"),
        Functor::to_str_from("reflectron/status", "reflectron_status"),
        Functor::to_str_from("local_electrode/name", "local_electrode_name"),
        Functor::to_str_from("pulser/pulse_mode", "pulser/pulse_mode"),
        Functor::to_str_from(
            "analysis_chamber/flight_path/@units",
            "nominal_flight_path/unit",
        ),
        Functor::to_real_from("analysis_chamber/flight_path", "nominal_flight_path/value"),
    ],
};

pub const INSTRUMENT_DYNAMIC_TO_NEXUS: MappingTable = MappingTable {
    name: "instrument_dynamic",
    prefix_trg: Some("/ENTRY[entry*]/measurement/event_data_apm_set/event_data_apm/instrument"),
    prefix: None,
    prefix_src: Some("instrument"),
    functors: &[
        Functor::use_text("control/target_detection_rate/@units", "ions/pulse"),
        Functor::to_str_from("control/evaporation_control", "evaporation_control"),
        Functor::to_str_from(
            "pulser/pulse_frequency/@units",
            "pulser/pulse_frequency/unit",
        ),
        Functor::to_str_from(
            "analysis_chamber/chamber_pressure/@units",
            "chamber_pressure/unit",
        ),
        Functor::to_str_from(
            "stage_lab/base_temperature/@units",
            "stage_lab/base_temperature/unit",
        ),
        Functor::to_real_from("control/target_detection_rate", "target_detection_rate"),
        Functor::to_real_from("pulser/pulse_frequency", "pulser/pulse_frequency/value"),
        Functor::to_real_from("pulser/pulse_fraction", "pulser/pulse_fraction/value"),
        Functor::to_real_from("analysis_chamber/chamber_pressure", "chamber_pressure/value"),
        Functor::to_real_from("stage_lab/base_temperature", "base_temperature/value"),
    ],
};

// Laser sources are delivered as a list of records; identifier is [entry_id, source_id]
pub const LASER_SOURCE_STATIC_TO_NEXUS: MappingTable = MappingTable {
    name: "laser_source_static",
    prefix_trg: Some("/ENTRY[entry*]/measurement/instrument/pulser/sourceID[source*]"),
    prefix: None,
    prefix_src: None,
    functors: &[
        Functor::to_str("name"),
        Functor::to_str_from("wavelength/@units", "wavelength/unit"),
        Functor::to_real_from("wavelength", "wavelength/value"),
    ],
};

pub const LASER_SOURCE_DYNAMIC_TO_NEXUS: MappingTable = MappingTable {
    name: "laser_source_dynamic",
    prefix_trg: Some(
        "/ENTRY[entry*]/measurement/event_data_apm_set/event_data_apm/instrument/pulser/sourceID[source*]",
    ),
    prefix: None,
    prefix_src: None,
    functors: &[
        Functor::to_str_from("power/@units", "power/unit"),
        Functor::to_str_from("pulse_energy/@units", "pulse_energy/unit"),
        Functor::to_real_from("power", "power/value"),
        Functor::to_real_from("pulse_energy", "pulse_energy/value"),
    ],
};

pub const RANGE_TO_NEXUS: MappingTable = MappingTable {
    name: "ranging",
    prefix_trg: Some("/ENTRY[entry*]/atom_probe/ranging"),
    prefix: None,
    prefix_src: Some("ranging"),
    functors: &[
        Functor::to_str_from("programID[program1]/program", "program"),
        Functor::to_str_from("programID[program1]/program/@version", "program_version"),
    ],
};

pub const RECON_TO_NEXUS: MappingTable = MappingTable {
    name: "reconstruction",
    prefix_trg: Some("/ENTRY[entry*]/atom_probe/reconstruction"),
    prefix: None,
    prefix_src: Some("reconstruction"),
    functors: &[
        Functor::to_str_from("programID[program1]/program", "program"),
        Functor::to_str_from("programID[program1]/program/@version", "program_version"),
        Functor::to_str_from("field_of_view/@units", "field_of_view/unit"),
        Functor::to_str("protocol_name"),
        Functor::to_str("crystallographic_calibration"),
        Functor::to_str("parameter"),
        Functor::to_real_from("field_of_view", "field_of_view/value"),
    ],
};

// The workflow names files; their SHA-256 digests are written, not the paths
pub const WORKFLOW_PREFIX_TRG: &str = "/ENTRY[entry*]/atom_probe";
pub const WORKFLOW_PREFIX_SRC: &str = "workflow";
/// (target, source) pairs below the workflow prefixes
pub const WORKFLOW_CHECKSUMS: [(&str, &str); 3] = [
    ("raw_data/SERIALIZED[serialized]/checksum", "raw_dat_file"),
    ("hit_finding/SERIALIZED[serialized]/checksum", "hit_dat_file"),
    ("reconstruction/config/checksum", "recon_cfg_file"),
];

// Users are delivered as a list of records; identifier is [entry_id, user_id]
pub const USER_TO_NEXUS: MappingTable = MappingTable {
    name: "user",
    prefix_trg: Some("/ENTRY[entry*]/USER[user*]"),
    prefix: None,
    prefix_src: None,
    functors: &[
        Functor::to_str("name"),
        Functor::to_str("affiliation"),
        Functor::to_str("address"),
        Functor::to_str("email"),
        Functor::to_str("telephone_number"),
        Functor::to_str("role"),
        Functor::to_str("social_media_name"),
        Functor::to_str("social_media_platform"),
    ],
};

pub const IDENTIFIER_TO_NEXUS: MappingTable = MappingTable {
    name: "user_identifier",
    prefix_trg: Some("/ENTRY[entry*]/USER[user*]"),
    prefix: None,
    prefix_src: None,
    functors: &[
        Functor::use_text("identifierNAME[identifier]/service", "orcid"),
        Functor::use_bool("identifierNAME[identifier]/is_persistent", true),
        Functor::to_str_from("identifierNAME[identifier]/identifier", "orcid"),
    ],
};

/// Tables applied once per entry, in this order
pub const ELN_ENTRY_TABLES: [&MappingTable; 7] = [
    &ENTRY_TO_NEXUS,
    &SAMPLE_TO_NEXUS,
    &SPECIMEN_TO_NEXUS,
    &INSTRUMENT_STATIC_TO_NEXUS,
    &INSTRUMENT_DYNAMIC_TO_NEXUS,
    &RANGE_TO_NEXUS,
    &RECON_TO_NEXUS,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variadic::resolve_variadic_path;

    #[test]
    fn test_tables_resolve() {
        let tables = ELN_ENTRY_TABLES.iter().copied().chain([
            &LASER_SOURCE_STATIC_TO_NEXUS,
            &LASER_SOURCE_DYNAMIC_TO_NEXUS,
            &USER_TO_NEXUS,
            &IDENTIFIER_TO_NEXUS,
        ]);
        for table in tables {
            let prefix = table.target_prefix().unwrap();
            assert!(prefix.starts_with("/ENTRY[entry*]"), "{}", table.name);
            for functor in table.functors {
                let path = format!("{prefix}/{}", functor.target());
                let resolved = resolve_variadic_path(&path, &[1, 1]).unwrap();
                assert!(!resolved.contains('*'), "{resolved}");
            }
        }
    }

    #[test]
    fn test_workflow_checksums_resolve() {
        for (target, _) in WORKFLOW_CHECKSUMS {
            let resolved =
                resolve_variadic_path(&format!("{WORKFLOW_PREFIX_TRG}/{target}"), &[4]).unwrap();
            assert!(resolved.starts_with("/ENTRY[entry4]/atom_probe/"));
            assert!(resolved.ends_with("/checksum"));
        }
    }
}
