//! Three-state field used by the partial-update shapes.
//!
//! A missing key deserializes to [`Patch::Absent`] (with `#[serde(default)]`
//! on the field), an explicit `null` to [`Patch::Null`], anything else to
//! [`Patch::Value`]. Consumers apply only fields that are not absent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::validate::ValidationError;

#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    /// Leave the target field unchanged.
    Absent,
    /// Clear the target field.
    Null,
    /// Replace the target field.
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Patch::Null)
    }

    /// The new value, if any, for a field the entity never allows to be null.
    pub fn non_null(&self, field: &'static str) -> Result<Option<&T>, ValidationError> {
        match self {
            Patch::Absent => Ok(None),
            Patch::Null => Err(ValidationError::NotNullable { field }),
            Patch::Value(v) => Ok(Some(v)),
        }
    }

    /// `None` when absent, `Some(None)` when null, `Some(Some(v))` when set.
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Patch::Value(value)
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Absent | Patch::Null => serializer.serialize_none(),
            Patch::Value(v) => v.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Probe {
        #[serde(default, skip_serializing_if = "Patch::is_absent")]
        note: Patch<String>,
    }

    #[test]
    fn missing_key_is_absent() {
        let probe: Probe = serde_json::from_value(json!({})).unwrap();
        assert!(probe.note.is_absent());
    }

    #[test]
    fn explicit_null_is_distinct_from_absent() {
        let probe: Probe = serde_json::from_value(json!({ "note": null })).unwrap();
        assert!(probe.note.is_null());
        assert_eq!(probe.note.into_option(), Some(None));
    }

    #[test]
    fn value_round_trips_through_json() {
        let probe: Probe = serde_json::from_value(json!({ "note": "hi" })).unwrap();
        assert_eq!(probe.note, Patch::Value("hi".to_string()));
        assert_eq!(serde_json::to_value(&probe).unwrap(), json!({ "note": "hi" }));
        assert_eq!(serde_json::to_value(Probe::default()).unwrap(), json!({}));
    }

    #[test]
    fn null_rejected_where_not_nullable() {
        let patch: Patch<String> = Patch::Null;
        assert_eq!(
            patch.non_null("source"),
            Err(ValidationError::NotNullable { field: "source" })
        );
        assert_eq!(Patch::<String>::Absent.non_null("source"), Ok(None));
    }
}
