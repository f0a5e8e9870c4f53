//! # apm_mapper
//!
//! apm_mapper collects the metadata of an atom probe microscopy (APM) measurement from the
//! places it usually lives and maps it onto the paths of the NeXus NXapm application
//! definition. Vendor files (pos, epos, apt, rng, rrng, ...) lack most of the context of a
//! measurement: who measured, which specimen, how the instrument was set up. That context
//! is kept in a NOMAD Oasis ELN, in a deployment-specific configuration file, and in
//! metadata dumped from IVAS / AP Suite. apm_mapper reads these YAML files and writes one
//! template per entry: a flat mapping from resolved NeXus paths to values.
//!
//! The template is the hand-off format for the verification and HDF5 serialization stage.
//! apm_mapper does not check that a template is a valid NXapm instance.
//!
//! ## Building & Install
//!
//! To build and install the CLI use `cargo install --path ./apm_mapper_cli` from the top
//! level repository. The binary will be installed to your cargo install location
//! (typically something like `~/.cargo/bin/`).
//!
//! ## Configuration
//!
//! A batch is described by a YAML configuration file. A template can be generated with
//! `apm_mapper_cli new --path config.yaml`. The format is as follows:
//!
//! ```yml
//! output_path: /path/to/output/
//! verbose: false
//! entries:
//! - entry_id: 1
//!   eln_path: /path/to/R5076_38411.eln_data.yaml
//!   oasis_config_path: /path/to/berlin.oasis.specific.yaml
//!   cameca_path: null
//! ```
//!
//! - output_path: An existing directory to which the templates (`entry_0001.yaml`, ...)
//! are written
//! - verbose: If true, every key read from an input file is logged
//! - entries: The entries to convert. Entry ids must be positive and unique. Each input is
//! optional; inputs are only read if their file name ends in the expected suffix
//! (`eln_data.yaml`/`eln_data.yml`, `.oasis.specific.yaml`/`.oasis.specific.yml`,
//! `.cameca`).
//!
//! ## Mapping
//!
//! Each input file is flattened into a [`metadata::MetadataStore`], keyed by slash-delimited
//! paths (`sample/grain_diameter/value`). Static [`mapping::MappingTable`]s name which source
//! key lands on which target path and how the value is converted along the way. Target
//! paths are variadic: every `*` is replaced, left to right, by the identifier of the entry
//! and, where needed, the user, laser source, or citation being mapped.
//!
//! ```text
//! /ENTRY[entry*]/USER[user*]/name  +  [1, 2]  ->  /ENTRY[entry1]/USER[user2]/name
//! ```
//!
//! Missing source keys are skipped silently. Values which are present but cannot be
//! converted (a number field holding text, say) abort the entry with an error.
//!
//! ## Output
//!
//! apm_mapper_cli will output one YAML template per entry and a log file
//! (`apm_mapper.log`). The log file contains the detailed status of every entry, and which
//! inputs were skipped. It is not advised to delete the log files.
pub mod appdef;
pub mod cameca_cfg;
pub mod cameca_reader;
pub mod checksum;
pub mod config;
pub mod constants;
pub mod conversion;
pub mod eln_cfg;
pub mod eln_reader;
pub mod error;
pub mod mapping;
pub mod metadata;
pub mod oasis_cfg;
pub mod oasis_config_reader;
pub mod process;
pub mod template;
pub mod variadic;
pub mod worker_status;
