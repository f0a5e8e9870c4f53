//! Mapping table for metadata collected from IVAS / AP Suite (Cameca) files.
//!
//! The Cameca keys are the field names of the vendor's ROOT/HDF5 metadata, dumped to
//! YAML by the vendor-format library before mapping.
use super::mapping::{Functor, MappingTable};

pub const CAMECA_TO_NEXUS: MappingTable = MappingTable {
    name: "cameca",
    prefix_trg: Some("/ENTRY[entry*]"),
    prefix: None,
    prefix_src: Some(""),
    functors: &[
        Functor::to_str_from("reconstruction/quality", "fQuality"),
        Functor::to_str_from("reconstruction/primary_element", "fPrimaryElement"),
        Functor::to_str_from("measurement/instrument/local_electrode/name", "fApertureName"),
        Functor::to_str_from("measurement/instrument/instrument_name", "fAtomProbeName"),
        Functor::to_str_from("measurement/instrument/fabrication/model", "fLeapModel"),
        Functor::to_str_from(
            "measurement/instrument/pulser/sourceID[source1]/fabrication/model",
            "fLaserModel",
        ),
        Functor::to_str_from("measurement/instrument/comments", "fInstrumentComment"),
        Functor::to_str_from("atom_probe/raw_data/serialized/path", "fRawPathName"),
        Functor::to_str_from("measurement/status", "fResults"),
        Functor::to_str_from("specimen/description", "fSpecimenCondition"),
        Functor::to_str_from("specimen/alias", "fSpecimenName"),
        Functor::to_str_from("start_time", "fStartISO8601"),
        Functor::JoinStr {
            trg: "experiment_description",
            srcs: &["fProjectName", "fName", "fComments"],
        },
        Functor::to_real_from("reconstruction/efficiency", "fEfficiency"),
        Functor::to_real_from("reconstruction/evaporation_field", "fEvaporationField"),
        Functor::to_real_from("reconstruction/flight_path", "fFlightPath"),
        Functor::to_real_from("reconstruction/image_compression", "fImageCompression"),
        Functor::to_real_from("reconstruction/kfactor", "fKfactor"),
        Functor::to_real_from("reconstruction/volume", "fReconVolume"),
        Functor::to_real_from("reconstruction/shank_angle", "fShankAngle"),
        Functor::to_real_from("reconstruction/obb/xmax", "fXmax"),
        Functor::to_real_from("reconstruction/obb/xmin", "fXmin"),
        Functor::to_real_from("reconstruction/obb/ymax", "fYmax"),
        Functor::to_real_from("reconstruction/obb/ymin", "fYmin"),
        Functor::to_real_from("reconstruction/obb/zmax", "fZmax"),
        Functor::to_real_from("reconstruction/obb/zmin", "fZmin"),
        Functor::to_real_from(
            "measurement/instrument/analysis_chamber/pressure",
            "fAnalysisPressure",
        ),
        Functor::to_real_from(
            "measurement/instrument/local_electrode/voltage",
            "fAnodeAccelVoltage",
        ),
        Functor::to_real_from("elapsed_time", "fElapsedTime"),
        Functor::to_real_from(
            "measurement/instrument/pulser/pulse_frequency",
            "fInitialPulserFreq",
        ),
        Functor::to_real_from(
            "measurement/instrument/ion_detector/mcp_efficiency",
            "fMcpEfficiency",
        ),
        Functor::to_real_from(
            "measurement/instrument/ion_detector/mesh_efficiency",
            "fMeshEfficiency",
        ),
        Functor::to_real_from(
            "measurement/instrument/analysis_chamber/flight_path",
            "fMaximumFlightPathMm",
        ),
        Functor::to_real_from(
            "measurement/stage/specimen_temperature",
            "fSpecimenTemperature",
        ),
        Functor::to_real_from(
            "atom_probe/voltage_and_bowl/tof_zero_estimate",
            "fT0Estimate",
        ),
        // unsigned integers
        Functor::to_unsigned_from(
            "measurement/instrument/fabrication/serial_number",
            "fSerialNumber",
        ),
        Functor::to_unsigned_from("run_number", "fRunNumber"),
    ],
};
