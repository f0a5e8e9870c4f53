//! Mapping tables for deployment-specific configuration files (*.oasis.specific.yaml).
//!
//! These carry the pieces of information that are the same for every measurement made
//! at one facility, such as where the instrument is located and which reference frame
//! conventions the facility follows.
use super::mapping::{Functor, MappingTable};

pub const OASISCONFIG_TO_NEXUS: MappingTable = MappingTable {
    name: "oasis_config",
    prefix_trg: Some("/ENTRY[entry*]/measurement/instrument"),
    prefix: None,
    prefix_src: None,
    functors: &[
        Functor::to_str("instrument_name"),
        Functor::to_str("location"),
        Functor::to_str_from("fabrication/vendor", "fabrication_vendor"),
        Functor::to_str_from("fabrication/model", "fabrication_model"),
        Functor::to_str_from("fabrication/identifier", "fabrication_identifier"),
    ],
};

/// The McStas-like reference frame: the z-axis points along the direction of an ion
/// leaving the apex along the longest direction of the specimen
pub const CSYS_MCSTASLIKE_TO_NEXUS: MappingTable = MappingTable {
    name: "coordinate_system",
    prefix_trg: Some("/ENTRY[entry*]/coordinate_system_set/COORDINATE_SYSTEM[coordinate_system]"),
    prefix: None,
    prefix_src: None,
    functors: &[
        Functor::use_text(
            "alias",
            "Following the idea of McStas that the z-axis points along the direction of an ion leaving the apex along the longest direction of the specimen.",
        ),
        Functor::use_text("type", "cartesian"),
        Functor::use_text("handedness", "right_handed"),
        Functor::use_text(
            "x_direction",
            "Direction 1 that is perpendicular to the z_direction for a right_handed cartesian",
        ),
        Functor::use_text("x_alias", "x-axis"),
        Functor::use_text(
            "y_direction",
            "Direction 2 that is perpendicular to the xaxis_direction and the z_direction for a right_handed cartesian",
        ),
        Functor::use_text("y_alias", "y-axis"),
        Functor::use_text(
            "z_direction",
            "Direction of an ion travelling hypothetically exactly along the assumed axis that is parallel to the longest direction of the specimen.",
        ),
        Functor::use_text("z_alias", "z-axis"),
        Functor::use_text(
            "origin",
            "E.g. a characteristic point e.g. initial apex or center of the base of the specimen or something else.",
        ),
    ],
};

// Citations are delivered as a list of records; identifier is [entry_id, cite_id]
pub const CITATION_TO_NEXUS: MappingTable = MappingTable {
    name: "citation",
    prefix_trg: Some("/ENTRY[entry*]/CITE[cite*]"),
    prefix: None,
    prefix_src: None,
    functors: &[
        Functor::to_str("authors"),
        Functor::to_str("doi"),
        Functor::to_str("description"),
        Functor::to_str("url"),
    ],
};
