// A mapping table describes how named pieces of source metadata land on NeXus paths.
// Every entry in a table is a Functor: it takes some input from the MetadataStore (or
// a literal), transforms it, and writes the result at a variadic target path below the
// table's target prefix. Variadic paths are resolved with the identifier handed to
// apply_mapping, e.g. [entry_id] or [entry_id, user_id].
//
// Missing sources are not errors. The surrounding converter verifies the template
// against the application definition afterwards, so an incomplete template is the
// normal degraded mode. Each functor application reports what happened instead.
use std::fmt::Display;

use super::constants::PATH_DELIMITER;
use super::conversion::{
    interpret_as_boolean, string_to_number, string_to_unsigned, to_unix_timestamp,
    unix_to_iso8601, Number,
};
use super::error::{ConversionError, MappingError};
use super::metadata::{MetadataStore, MetadataValue};
use super::template::{Template, TemplateValue};
use super::variadic::resolve_variadic_path;

/// A literal value written by the Use functor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Text(&'static str),
    Boolean(bool),
}

impl From<Literal> for TemplateValue {
    fn from(value: Literal) -> Self {
        match value {
            Literal::Text(text) => Self::Text(text.to_string()),
            Literal::Boolean(value) => Self::Boolean(value),
        }
    }
}

/// The families of mapping functors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctorKind {
    Use,
    MapToStr,
    MapToBool,
    MapToReal,
    MapToRealAndMultiply,
    MapToRealAndJoin,
    UnixToIso8601,
    JoinStr,
}

impl Display for FunctorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Use => "use",
            Self::MapToStr => "map_to_str",
            Self::MapToBool => "map_to_bool",
            Self::MapToReal => "map_to_real",
            Self::MapToRealAndMultiply => "map_to_real_and_multiply",
            Self::MapToRealAndJoin => "map_to_real_and_join",
            Self::UnixToIso8601 => "unix_to_iso8601",
            Self::JoinStr => "join_str",
        };
        write!(f, "{name}")
    }
}

/// A single mapping rule.
///
/// `trg` is relative to the table's target prefix and `src` relative to its source
/// prefix. Where `src` is optional, None means the source key is named like the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Functor {
    /// Write a literal
    Use { trg: &'static str, value: Literal },
    /// Copy the source value as is
    ToStr {
        trg: &'static str,
        src: Option<&'static str>,
    },
    /// Interpret the source value as a boolean
    ToBool {
        trg: &'static str,
        src: Option<&'static str>,
    },
    /// Convert the source value to a number
    ToReal {
        trg: &'static str,
        src: Option<&'static str>,
    },
    /// Convert the source value to an unsigned 32-bit integer
    ToUnsigned {
        trg: &'static str,
        src: Option<&'static str>,
    },
    /// Convert several source values to an array of reals; all must be present
    ToRealArray {
        trg: &'static str,
        srcs: &'static [&'static str],
    },
    /// Convert the source value to a number and scale it
    ToRealAndMultiply {
        trg: &'static str,
        src: &'static str,
        factor: f64,
    },
    /// Convert several source values to a numeric array; all must be present
    ToRealAndJoin {
        trg: &'static str,
        srcs: &'static [&'static str],
    },
    /// Convert a UNIX timestamp to an ISO8601 string in UTC
    UnixToIso8601 {
        trg: &'static str,
        src: &'static str,
    },
    /// Join several source values with a single space; all must be present
    JoinStr {
        trg: &'static str,
        srcs: &'static [&'static str],
    },
}

impl Functor {
    pub const fn use_text(trg: &'static str, text: &'static str) -> Self {
        Self::Use {
            trg,
            value: Literal::Text(text),
        }
    }

    pub const fn use_bool(trg: &'static str, value: bool) -> Self {
        Self::Use {
            trg,
            value: Literal::Boolean(value),
        }
    }

    pub const fn to_str(trg: &'static str) -> Self {
        Self::ToStr { trg, src: None }
    }

    pub const fn to_str_from(trg: &'static str, src: &'static str) -> Self {
        Self::ToStr {
            trg,
            src: Some(src),
        }
    }

    pub const fn to_bool(trg: &'static str) -> Self {
        Self::ToBool { trg, src: None }
    }

    pub const fn to_real(trg: &'static str) -> Self {
        Self::ToReal { trg, src: None }
    }

    pub const fn to_real_from(trg: &'static str, src: &'static str) -> Self {
        Self::ToReal {
            trg,
            src: Some(src),
        }
    }

    pub const fn to_unsigned_from(trg: &'static str, src: &'static str) -> Self {
        Self::ToUnsigned {
            trg,
            src: Some(src),
        }
    }

    pub fn kind(&self) -> FunctorKind {
        match self {
            Self::Use { .. } => FunctorKind::Use,
            Self::ToStr { .. } => FunctorKind::MapToStr,
            Self::ToBool { .. } => FunctorKind::MapToBool,
            Self::ToReal { .. } | Self::ToUnsigned { .. } | Self::ToRealArray { .. } => {
                FunctorKind::MapToReal
            }
            Self::ToRealAndMultiply { .. } => FunctorKind::MapToRealAndMultiply,
            Self::ToRealAndJoin { .. } => FunctorKind::MapToRealAndJoin,
            Self::UnixToIso8601 { .. } => FunctorKind::UnixToIso8601,
            Self::JoinStr { .. } => FunctorKind::JoinStr,
        }
    }

    /// The target path relative to the table prefix
    pub fn target(&self) -> &'static str {
        match self {
            Self::Use { trg, .. }
            | Self::ToStr { trg, .. }
            | Self::ToBool { trg, .. }
            | Self::ToReal { trg, .. }
            | Self::ToUnsigned { trg, .. }
            | Self::ToRealArray { trg, .. }
            | Self::ToRealAndMultiply { trg, .. }
            | Self::ToRealAndJoin { trg, .. }
            | Self::UnixToIso8601 { trg, .. }
            | Self::JoinStr { trg, .. } => *trg,
        }
    }
}

/// A static mapping configuration for one semantic concept (sample, specimen, user, ...)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingTable {
    pub name: &'static str,
    pub prefix_trg: Option<&'static str>,
    /// Older alias of prefix_trg, only consulted when prefix_trg is None
    pub prefix: Option<&'static str>,
    pub prefix_src: Option<&'static str>,
    pub functors: &'static [Functor],
}

impl MappingTable {
    /// Get the variadic target prefix. A table without one is a configuration bug.
    pub fn target_prefix(&self) -> Result<&'static str, MappingError> {
        self.prefix_trg
            .or(self.prefix)
            .ok_or(MappingError::MissingPrefix(self.name))
    }

    /// Construct the full source key for a source name local to this table
    pub fn source_key(&self, src: &str) -> String {
        match self.prefix_src {
            None | Some("") => src.to_string(),
            Some(prefix) if prefix.ends_with(PATH_DELIMITER) => format!("{prefix}{src}"),
            Some(prefix) => format!("{prefix}{PATH_DELIMITER}{src}"),
        }
    }
}

/// What happened when a single functor was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOutcome {
    /// A value was written at the resolved path
    Written(String),
    /// The source key was absent, nothing was written
    SkippedMissingSource(String),
    /// The target path could not be resolved with the identifier, nothing was written
    SkippedUnresolvablePath(String),
}

impl MappingOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// Apply every functor of a mapping table, writing into the template.
///
/// Functors are applied in table order. Returns one outcome per functor. Fails before
/// writing anything if the table has no target prefix, and fails with the conversion
/// error if a present source value cannot be converted.
pub fn apply_mapping(
    table: &MappingTable,
    store: &MetadataStore,
    identifier: &[u32],
    template: &mut Template,
) -> Result<Vec<MappingOutcome>, MappingError> {
    let prefix_trg = table.target_prefix()?;

    let mut outcomes = Vec::with_capacity(table.functors.len());
    for functor in table.functors {
        let outcome = apply_functor(table, prefix_trg, functor, store, identifier, template)?;
        if !outcome.is_written() {
            spdlog::trace!("{} {}: {:?}", table.name, functor.kind(), outcome);
        }
        outcomes.push(outcome);
    }

    let n_written = outcomes.iter().filter(|o| o.is_written()).count();
    spdlog::debug!(
        "Mapping {} with identifier {:?}: {} written, {} skipped",
        table.name,
        identifier,
        n_written,
        outcomes.len() - n_written
    );
    Ok(outcomes)
}

fn apply_functor(
    table: &MappingTable,
    prefix_trg: &str,
    functor: &Functor,
    store: &MetadataStore,
    identifier: &[u32],
    template: &mut Template,
) -> Result<MappingOutcome, MappingError> {
    let value = match *functor {
        Functor::Use { value, .. } => TemplateValue::from(value),
        Functor::ToStr { trg, src } => {
            let key = table.source_key(src.unwrap_or(trg));
            let Some(value) = store.get(&key) else {
                return Ok(MappingOutcome::SkippedMissingSource(key));
            };
            TemplateValue::from_metadata(value).ok_or(MappingError::UnsupportedValue(key))?
        }
        Functor::ToBool { trg, src } => {
            let key = table.source_key(src.unwrap_or(trg));
            let Some(value) = store.get(&key) else {
                return Ok(MappingOutcome::SkippedMissingSource(key));
            };
            TemplateValue::Boolean(convert(&key, value, interpret_as_boolean)?)
        }
        Functor::ToReal { trg, src } => {
            let key = table.source_key(src.unwrap_or(trg));
            let Some(value) = store.get(&key) else {
                return Ok(MappingOutcome::SkippedMissingSource(key));
            };
            TemplateValue::from(convert(&key, value, string_to_number)?)
        }
        Functor::ToUnsigned { trg, src } => {
            let key = table.source_key(src.unwrap_or(trg));
            let Some(value) = store.get(&key) else {
                return Ok(MappingOutcome::SkippedMissingSource(key));
            };
            TemplateValue::Integer(i64::from(convert(&key, value, string_to_unsigned)?))
        }
        Functor::ToRealArray { srcs, .. } => {
            let numbers = match collect_numbers(table, store, srcs)? {
                Ok(numbers) => numbers,
                Err(missing) => return Ok(MappingOutcome::SkippedMissingSource(missing)),
            };
            TemplateValue::RealArray(numbers.iter().map(Number::as_f64).collect())
        }
        Functor::ToRealAndMultiply { src, factor, .. } => {
            let key = table.source_key(src);
            let Some(value) = store.get(&key) else {
                return Ok(MappingOutcome::SkippedMissingSource(key));
            };
            TemplateValue::Real(factor * convert(&key, value, string_to_number)?.as_f64())
        }
        Functor::ToRealAndJoin { srcs, .. } => {
            let numbers = match collect_numbers(table, store, srcs)? {
                Ok(numbers) => numbers,
                Err(missing) => return Ok(MappingOutcome::SkippedMissingSource(missing)),
            };
            join_numbers(&numbers)
        }
        Functor::UnixToIso8601 { src, .. } => {
            let key = table.source_key(src);
            let Some(value) = store.get(&key) else {
                return Ok(MappingOutcome::SkippedMissingSource(key));
            };
            let seconds = convert(&key, value, to_unix_timestamp)?;
            TemplateValue::Text(convert(&key, &seconds, |s| unix_to_iso8601(*s))?)
        }
        Functor::JoinStr { srcs, .. } => {
            let mut parts = Vec::with_capacity(srcs.len());
            for src in srcs {
                let key = table.source_key(src);
                match store.get(&key) {
                    Some(value) => parts.push(value.to_string()),
                    None => return Ok(MappingOutcome::SkippedMissingSource(key)),
                }
            }
            TemplateValue::Text(parts.join(" "))
        }
    };

    let variadic_path = format!("{prefix_trg}/{}", functor.target());
    match resolve_variadic_path(&variadic_path, identifier) {
        Some(path) => {
            template.insert(path.clone(), value);
            Ok(MappingOutcome::Written(path))
        }
        None => Ok(MappingOutcome::SkippedUnresolvablePath(variadic_path)),
    }
}

/// Run a conversion helper, attaching the source key to any error
fn convert<T, R>(
    key: &str,
    value: &T,
    helper: impl Fn(&T) -> Result<R, ConversionError>,
) -> Result<R, MappingError> {
    helper(value).map_err(|source| MappingError::Conversion {
        key: key.to_string(),
        source,
    })
}

/// Convert all listed sources to numbers, preserving order.
///
/// The inner Err carries the first missing source key; nothing is converted in that case.
fn collect_numbers(
    table: &MappingTable,
    store: &MetadataStore,
    srcs: &[&str],
) -> Result<Result<Vec<Number>, String>, MappingError> {
    let mut values: Vec<(String, &MetadataValue)> = Vec::with_capacity(srcs.len());
    for src in srcs {
        let key = table.source_key(src);
        match store.get(&key) {
            Some(value) => values.push((key, value)),
            None => return Ok(Err(key)),
        }
    }

    let mut numbers = Vec::with_capacity(values.len());
    for (key, value) in values {
        numbers.push(convert(&key, value, string_to_number)?);
    }
    Ok(Ok(numbers))
}

/// Integers stay integral unless a real is mixed in
fn join_numbers(numbers: &[Number]) -> TemplateValue {
    if numbers.iter().all(|n| matches!(n, Number::Integer(_))) {
        TemplateValue::IntegerArray(
            numbers
                .iter()
                .filter_map(|n| match n {
                    Number::Integer(value) => Some(*value),
                    Number::Real(_) => None,
                })
                .collect(),
        )
    } else {
        TemplateValue::RealArray(numbers.iter().map(Number::as_f64).collect())
    }
}
