/// Name of the NeXus application definition the template is written for
pub const NX_APM_ADEF_NAME: &str = "NXapm";
/// Program name reported in the profiling section of every entry
pub const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");
/// Program version reported in the profiling section of every entry
pub const PROGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Placeholder marker inside variadic paths
pub const VARIADIC_MARKER: char = '*';
/// Delimiter used when flattening nested metadata into keys
pub const PATH_DELIMITER: &str = "/";


// Accepted input file names
pub const ELN_FILE_SUFFIXES: [&str; 2] = ["eln_data.yaml", "eln_data.yml"];
pub const OASIS_CONFIG_FILE_SUFFIXES: [&str; 2] = [".oasis.specific.yaml", ".oasis.specific.yml"];
pub const CAMECA_FILE_SUFFIXES: [&str; 1] = [".cameca"];
