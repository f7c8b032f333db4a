use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use super::shapes::ObservationCreate;
use crate::schema::validate::{check_decimal, check_len, Validate, ValidationError, COORDINATE};

pub const KPS_ID_MAX: usize = 100;
pub const FINDING_TYPE_MAX: usize = 100;
pub const NOTES_MAX: usize = 2000;
pub const PHOTO_URL_MAX: usize = 500;
pub const SOURCE_MAX: usize = 100;
pub const CREATED_BY_MAX: usize = 255;

/// A single field-reported finding. Maps to the `observations` table.
///
/// `observed_at` is when the finding happened; `created_at` is when the
/// record was made. Coordinates are `DECIMAL(12, 8)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    id: Option<i64>,
    pub external_id: String,
    pub observed_at: DateTime<Utc>,
    pub lat: Decimal,
    pub lng: Decimal,
    pub finding_type: String,
    pub notes: String,
    pub photo_url: Option<String>,
    pub source: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Database row representation of an observation. Timestamps are
/// `TIMESTAMP` without time zone, holding UTC wall time.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ObservationRow {
    pub id: i32,
    pub kps_id: String,
    pub observed_at: NaiveDateTime,
    pub lat: Decimal,
    pub lng: Decimal,
    pub finding_type: String,
    pub notes: String,
    pub photo_url: Option<String>,
    pub source: String,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

impl From<ObservationRow> for Observation {
    fn from(row: ObservationRow) -> Self {
        Self {
            id: Some(i64::from(row.id)),
            external_id: row.kps_id,
            observed_at: row.observed_at.and_utc(),
            lat: row.lat,
            lng: row.lng,
            finding_type: row.finding_type,
            notes: row.notes,
            photo_url: row.photo_url,
            source: row.source,
            created_by: row.created_by,
            created_at: row.created_at.and_utc(),
        }
    }
}

impl Observation {
    /// Build an unsaved observation stamped with the current time.
    pub fn new(input: ObservationCreate) -> Result<Self, ValidationError> {
        Self::new_at(input, Utc::now())
    }

    pub fn new_at(
        input: ObservationCreate,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        input.validate()?;
        Ok(Self {
            id: None,
            external_id: input.external_id,
            observed_at: input.observed_at,
            lat: input.lat,
            lng: input.lng,
            finding_type: input.finding_type,
            notes: input.notes,
            photo_url: input.photo_url,
            source: input.source,
            created_by: input.created_by,
            created_at,
        })
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn assign_id(&mut self, id: i64) -> Result<(), ValidationError> {
        if self.id.is_some() {
            return Err(ValidationError::AlreadyAssigned { field: "id" });
        }
        tracing::debug!(id, kps_id = %self.external_id, "observation id assigned");
        self.id = Some(id);
        Ok(())
    }
}

impl Validate for Observation {
    fn validate(&self) -> Result<(), ValidationError> {
        check_len("kps_id", &self.external_id, KPS_ID_MAX)?;
        check_decimal("lat", &self.lat, COORDINATE)?;
        check_decimal("lng", &self.lng, COORDINATE)?;
        check_len("finding_type", &self.finding_type, FINDING_TYPE_MAX)?;
        check_len("notes", &self.notes, NOTES_MAX)?;
        if let Some(url) = &self.photo_url {
            check_len("photo_url", url, PHOTO_URL_MAX)?;
        }
        check_len("source", &self.source, SOURCE_MAX)?;
        check_len("created_by", &self.created_by, CREATED_BY_MAX)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn create() -> ObservationCreate {
        ObservationCreate {
            external_id: "OBS-1".to_string(),
            observed_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            lat: Decimal::from_str("59.91273800").unwrap(),
            lng: Decimal::from_str("10.74609000").unwrap(),
            finding_type: "erosion".to_string(),
            notes: String::new(),
            photo_url: None,
            source: "field-app".to_string(),
            created_by: "surveyor@example.org".to_string(),
        }
    }

    #[test]
    fn new_leaves_id_unassigned_and_stamps_now() {
        let before = Utc::now();
        let obs = Observation::new(create()).unwrap();
        let after = Utc::now();

        assert_eq!(obs.id(), None);
        assert!(obs.created_at >= before && obs.created_at <= after);
        assert_ne!(obs.created_at, obs.observed_at);
    }

    #[test]
    fn notes_boundary() {
        let mut input = create();
        input.notes = "n".repeat(NOTES_MAX);
        assert!(Observation::new(input.clone()).is_ok());

        input.notes.push('n');
        assert_eq!(
            Observation::new(input).unwrap_err(),
            ValidationError::TooLong {
                field: "notes",
                max: NOTES_MAX,
                actual: NOTES_MAX + 1
            }
        );
    }

    #[test]
    fn rejects_overprecise_latitude() {
        let mut input = create();
        input.lat = Decimal::from_str("59.912738001").unwrap();
        assert_eq!(Observation::new(input).unwrap_err().field(), Some("lat"));
    }

    #[test]
    fn rejects_overlong_photo_url() {
        let mut input = create();
        input.photo_url = Some(format!("https://img.example.org/{}", "p".repeat(PHOTO_URL_MAX)));
        assert_eq!(
            Observation::new(input).unwrap_err().field(),
            Some("photo_url")
        );
    }

    #[test]
    fn row_timestamps_are_read_as_utc() {
        let observed = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let created = Utc.with_ymd_and_hms(2024, 3, 2, 17, 45, 30).unwrap();
        let row = ObservationRow {
            id: 5,
            kps_id: "OBS-5".to_string(),
            observed_at: observed.naive_utc(),
            lat: Decimal::from_str("-33.86882012").unwrap(),
            lng: Decimal::from_str("151.20929300").unwrap(),
            finding_type: "erosion".to_string(),
            notes: String::new(),
            photo_url: None,
            source: "field-app".to_string(),
            created_by: "surveyor@example.org".to_string(),
            created_at: created.naive_utc(),
        };

        let obs = Observation::from(row);
        assert_eq!(obs.id(), Some(5));
        assert_eq!(obs.observed_at, observed);
        assert_eq!(obs.created_at, created);
        assert_eq!(obs.lat, Decimal::from_str("-33.86882012").unwrap());
        assert!(obs.validate().is_ok());
    }

    #[test]
    fn id_is_immutable_once_assigned() {
        let mut obs = Observation::new(create()).unwrap();
        obs.assign_id(3).unwrap();
        assert!(obs.assign_id(3).is_err());
        assert_eq!(obs.id(), Some(3));
    }
}
