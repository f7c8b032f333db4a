//! Field-level validation shared by every entity and transfer shape.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Open key/value metadata. Insertion order is preserved.
pub type Metadata = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be at most {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    #[error("{field} allows at most {max} fractional digits (got {actual})")]
    TooManyFractionalDigits {
        field: &'static str,
        max: u32,
        actual: u32,
    },
    #[error("{field} allows at most {max} digits before the decimal point (got {actual})")]
    TooManyWholeDigits {
        field: &'static str,
        max: u32,
        actual: u32,
    },
    #[error("{field} cannot be null")]
    NotNullable { field: &'static str },
    #[error("{field} has not been assigned")]
    Unassigned { field: &'static str },
    #[error("{field} is already assigned and cannot change")]
    AlreadyAssigned { field: &'static str },
    #[error("{end} must not precede {start}")]
    InvertedRange {
        start: &'static str,
        end: &'static str,
    },
    #[error("{field} is required")]
    Missing { field: String },
    #[error("{field}: {message}")]
    InvalidValue { field: String, message: String },
    #[error("malformed input: {0}")]
    Malformed(String),
}

impl ValidationError {
    /// The offending field, when the failure is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::TooLong { field, .. }
            | ValidationError::TooManyFractionalDigits { field, .. }
            | ValidationError::TooManyWholeDigits { field, .. }
            | ValidationError::NotNullable { field }
            | ValidationError::Unassigned { field }
            | ValidationError::AlreadyAssigned { field } => Some(*field),
            ValidationError::InvertedRange { end, .. } => Some(*end),
            ValidationError::Missing { field } | ValidationError::InvalidValue { field, .. } => {
                Some(field.as_str())
            }
            ValidationError::Malformed(_) => None,
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::Malformed(err.to_string())
    }
}

/// Attribute a decoding failure to the field it happened in. Syntax errors
/// and failures at the document root stay `Malformed`.
impl From<serde_path_to_error::Error<serde_json::Error>> for ValidationError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        let inner = err.into_inner();
        if !inner.is_data() {
            return ValidationError::Malformed(inner.to_string());
        }

        let message = inner.to_string();
        if let Some(name) = missing_field(&message) {
            let field = if path == "." {
                name.to_string()
            } else {
                format!("{path}.{name}")
            };
            return ValidationError::Missing { field };
        }
        if path == "." {
            return ValidationError::Malformed(message);
        }
        ValidationError::InvalidValue {
            field: path,
            message,
        }
    }
}

/// The key named by serde's "missing field `x`" message.
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split_once('`').map(|(name, _)| name)
}

/// Implemented by every shape that carries bounded fields.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Deserialize a JSON body and validate it in one step. Decoding failures
/// carry the path of the offending field.
pub fn parse<T>(body: &[u8]) -> Result<T, ValidationError>
where
    T: DeserializeOwned + Validate,
{
    let mut de = serde_json::Deserializer::from_slice(body);
    let value: T = serde_path_to_error::deserialize(&mut de)?;
    de.end()?;
    value.validate()?;
    Ok(value)
}

/// Reject text longer than `max` characters.
pub fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

/// Precision bounds of a fixed-point column, as in `DECIMAL(max_digits, decimal_places)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalBounds {
    pub max_digits: u32,
    pub decimal_places: u32,
}

/// `DECIMAL(12, 8)`, used for latitude and longitude.
pub const COORDINATE: DecimalBounds = DecimalBounds {
    max_digits: 12,
    decimal_places: 8,
};

/// Reject decimals that do not fit `bounds` exactly. Values are never rounded;
/// trailing fractional zeros are not significant.
pub fn check_decimal(
    field: &'static str,
    value: &Decimal,
    bounds: DecimalBounds,
) -> Result<(), ValidationError> {
    let normalized = value.normalize();
    let decimals = normalized.scale();
    let significant = normalized
        .mantissa()
        .unsigned_abs()
        .checked_ilog10()
        .map_or(1, |d| d + 1);
    let whole = significant.max(decimals) - decimals;

    if decimals > bounds.decimal_places {
        return Err(ValidationError::TooManyFractionalDigits {
            field,
            max: bounds.decimal_places,
            actual: decimals,
        });
    }
    let max_whole = bounds.max_digits - bounds.decimal_places;
    if whole > max_whole {
        return Err(ValidationError::TooManyWholeDigits {
            field,
            max: max_whole,
            actual: whole,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(check_len("name", "ééé", 3).is_ok());
        assert_eq!(
            check_len("name", "éééé", 3),
            Err(ValidationError::TooLong {
                field: "name",
                max: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn coordinate_accepts_full_precision() {
        assert!(check_decimal("lat", &dec("-33.86882012"), COORDINATE).is_ok());
        assert!(check_decimal("lng", &dec("9999.99999999"), COORDINATE).is_ok());
        assert!(check_decimal("lng", &dec("0"), COORDINATE).is_ok());
    }

    #[test]
    fn coordinate_rejects_ninth_fractional_digit() {
        let err = check_decimal("lat", &dec("12.123456789"), COORDINATE).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooManyFractionalDigits {
                field: "lat",
                max: 8,
                actual: 9
            }
        );
        assert_eq!(err.field(), Some("lat"));
    }

    #[test]
    fn trailing_zeros_are_not_significant() {
        assert!(check_decimal("lat", &dec("12.1234567800"), COORDINATE).is_ok());
    }

    #[test]
    fn coordinate_rejects_fifth_whole_digit() {
        assert_eq!(
            check_decimal("lng", &dec("12345.5"), COORDINATE),
            Err(ValidationError::TooManyWholeDigits {
                field: "lng",
                max: 4,
                actual: 5
            })
        );
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        struct Anything;
        impl Validate for Anything {
            fn validate(&self) -> Result<(), ValidationError> {
                Ok(())
            }
        }
        impl<'de> serde::Deserialize<'de> for Anything {
            fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                <serde::de::IgnoredAny as serde::Deserialize>::deserialize(d).map(|_| Anything)
            }
        }

        let err = parse::<Anything>(b"{not json").err().unwrap();
        assert!(matches!(err, ValidationError::Malformed(_)));
        assert_eq!(err.field(), None);

        let err = parse::<Anything>(b"{} trailing").err().unwrap();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[derive(Debug, serde::Deserialize)]
    struct Named {
        #[allow(dead_code)]
        name: String,
        #[allow(dead_code)]
        #[serde(default)]
        tags: Vec<String>,
    }

    impl Validate for Named {
        fn validate(&self) -> Result<(), ValidationError> {
            Ok(())
        }
    }

    #[test]
    fn wrong_type_names_the_field() {
        let err = parse::<Named>(br#"{"name":5}"#).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "name"));
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn nested_failures_carry_the_full_path() {
        let err = parse::<Named>(br#"{"name":"a","tags":["x",1]}"#).unwrap_err();
        assert_eq!(err.field(), Some("tags[1]"));
    }

    #[test]
    fn missing_key_names_the_field() {
        let err = parse::<Named>(b"{}").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Missing {
                field: "name".to_string()
            }
        );
    }

    #[test]
    fn non_object_body_is_malformed() {
        let err = parse::<Named>(b"5").unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }
}
