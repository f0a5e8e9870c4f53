use time::macros::format_description;
use time::OffsetDateTime;

use super::error::ConversionError;
use super::metadata::MetadataValue;

const TRUTHY: [&str; 6] = ["true", "yes", "y", "on", "1", "t"];
const FALSY: [&str; 6] = ["false", "no", "n", "off", "0", "f"];

/// A number read from the metadata. Integers are kept apart from reals so that
/// counters and serial numbers stay integral in the template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Integer(value) => *value as f64,
            Self::Real(value) => *value,
        }
    }
}

/// Convert a metadata value to a number.
///
/// Text is trimmed and parsed as an integer first, then as a real.
pub fn string_to_number(value: &MetadataValue) -> Result<Number, ConversionError> {
    match value {
        MetadataValue::Integer(value) => Ok(Number::Integer(*value)),
        MetadataValue::Real(value) => Ok(Number::Real(*value)),
        MetadataValue::Text(text) => {
            let trimmed = text.trim();
            if let Ok(value) = trimmed.parse::<i64>() {
                Ok(Number::Integer(value))
            } else if let Ok(value) = trimmed.parse::<f64>() {
                Ok(Number::Real(value))
            } else {
                Err(ConversionError::NotANumber(text.clone()))
            }
        }
        other => Err(ConversionError::NotANumber(other.to_string())),
    }
}

/// Convert a metadata value to an unsigned 32-bit integer (counters, serial numbers)
pub fn string_to_unsigned(value: &MetadataValue) -> Result<u32, ConversionError> {
    match string_to_number(value) {
        Ok(Number::Integer(number)) => {
            u32::try_from(number).map_err(|_| ConversionError::NotAnUnsigned(value.to_string()))
        }
        _ => Err(ConversionError::NotAnUnsigned(value.to_string())),
    }
}

/// Interpret a metadata value as a boolean, accepting the common textual forms
pub fn interpret_as_boolean(value: &MetadataValue) -> Result<bool, ConversionError> {
    match value {
        MetadataValue::Boolean(value) => Ok(*value),
        MetadataValue::Integer(0) => Ok(false),
        MetadataValue::Integer(1) => Ok(true),
        MetadataValue::Text(text) => {
            let lowered = text.trim().to_lowercase();
            if TRUTHY.contains(&lowered.as_str()) {
                Ok(true)
            } else if FALSY.contains(&lowered.as_str()) {
                Ok(false)
            } else {
                Err(ConversionError::NotABoolean(text.clone()))
            }
        }
        other => Err(ConversionError::NotABoolean(other.to_string())),
    }
}

/// Read a UNIX timestamp (seconds) from a metadata value
pub fn to_unix_timestamp(value: &MetadataValue) -> Result<i64, ConversionError> {
    match value {
        MetadataValue::Integer(value) => Ok(*value),
        MetadataValue::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| ConversionError::NotATimestamp(text.clone())),
        other => Err(ConversionError::NotATimestamp(other.to_string())),
    }
}

/// Convert a UNIX timestamp (seconds) to an ISO8601 string in UTC
pub fn unix_to_iso8601(seconds: i64) -> Result<String, ConversionError> {
    let format = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
    );
    let datetime = OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|e| ConversionError::TimestampRange(seconds, e))?;
    Ok(datetime.format(&format)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_number() {
        assert_eq!(
            string_to_number(&MetadataValue::from("42")).unwrap(),
            Number::Integer(42)
        );
        assert_eq!(
            string_to_number(&MetadataValue::from(" 3.5 ")).unwrap(),
            Number::Real(3.5)
        );
        assert_eq!(
            string_to_number(&MetadataValue::from("1e-3")).unwrap(),
            Number::Real(0.001)
        );
        assert_eq!(
            string_to_number(&MetadataValue::Real(2.0)).unwrap(),
            Number::Real(2.0)
        );
        assert!(string_to_number(&MetadataValue::from("n/a")).is_err());
        assert!(string_to_number(&MetadataValue::Boolean(true)).is_err());
    }

    #[test]
    fn test_string_to_unsigned() {
        assert_eq!(string_to_unsigned(&MetadataValue::from("5076")).unwrap(), 5076);
        assert_eq!(string_to_unsigned(&MetadataValue::Integer(0)).unwrap(), 0);
        assert!(string_to_unsigned(&MetadataValue::Integer(-1)).is_err());
        assert!(string_to_unsigned(&MetadataValue::Real(3.0)).is_err());
        assert!(string_to_unsigned(&MetadataValue::from("12.5")).is_err());
        assert!(string_to_unsigned(&MetadataValue::Integer(i64::from(u32::MAX) + 1)).is_err());
    }

    #[test]
    fn test_interpret_as_boolean() {
        assert!(interpret_as_boolean(&MetadataValue::from("True")).unwrap());
        assert!(interpret_as_boolean(&MetadataValue::from("yes")).unwrap());
        assert!(!interpret_as_boolean(&MetadataValue::from("off")).unwrap());
        assert!(!interpret_as_boolean(&MetadataValue::Integer(0)).unwrap());
        assert!(interpret_as_boolean(&MetadataValue::Boolean(true)).unwrap());
        assert!(interpret_as_boolean(&MetadataValue::from("maybe")).is_err());
        assert!(interpret_as_boolean(&MetadataValue::Integer(2)).is_err());
    }

    #[test]
    fn test_unix_to_iso8601() {
        assert_eq!(unix_to_iso8601(0).unwrap(), "1970-01-01T00:00:00+00:00");
        assert_eq!(
            unix_to_iso8601(1_700_000_000).unwrap(),
            "2023-11-14T22:13:20+00:00"
        );
        assert!(unix_to_iso8601(i64::MAX).is_err());
    }

    #[test]
    fn test_to_unix_timestamp() {
        assert_eq!(to_unix_timestamp(&MetadataValue::Integer(12)).unwrap(), 12);
        assert_eq!(to_unix_timestamp(&MetadataValue::from("12")).unwrap(), 12);
        assert!(to_unix_timestamp(&MetadataValue::from("12.5")).is_err());
    }
}
