use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::validate::{Validate, ValidationError};

/// Query criteria for listing observations.
///
/// Declares the filter vocabulary only; translating it into predicates is the
/// query layer's job. `start_date`..=`end_date` bounds `observed_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finding_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ObservationFilter {
    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.finding_type.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.created_by.is_none()
            && self.source.is_none()
    }
}

impl Validate for ObservationFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(ValidationError::InvertedRange {
                    start: "start_date",
                    end: "end_date",
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate::parse;

    #[test]
    fn empty_object_is_empty_filter() {
        let filter: ObservationFilter = parse(b"{}").unwrap();
        assert!(filter.is_empty());
        assert_eq!(serde_json::to_string(&filter).unwrap(), "{}");
    }

    #[test]
    fn open_ended_range_is_valid() {
        let filter: ObservationFilter =
            parse(br#"{"start_date":"2024-01-01T00:00:00Z","source":"field-app"}"#).unwrap();
        assert!(!filter.is_empty());
        assert_eq!(filter.end_date, None);
        assert_eq!(filter.source.as_deref(), Some("field-app"));
    }

    #[test]
    fn single_instant_range_is_valid() {
        let filter: ObservationFilter = parse(
            br#"{"start_date":"2024-01-01T00:00:00Z","end_date":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(filter.start_date, filter.end_date);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = parse::<ObservationFilter>(
            br#"{"start_date":"2024-02-01T00:00:00Z","end_date":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("end_date"));
        assert_eq!(err.to_string(), "end_date must not precede start_date");
    }
}
