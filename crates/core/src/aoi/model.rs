use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use super::shapes::AoiCreate;
use crate::schema::validate::{check_len, Metadata, Validate, ValidationError};

pub const NAME_MAX: usize = 255;
pub const KPS_CODE_MAX: usize = 50;

/// A named geospatial region. Maps to the `aois` table.
///
/// `external_code` is the kps classification code; the store keeps it unique.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaOfInterest {
    id: Option<i64>,
    pub name: String,
    /// GeoJSON geometry or feature. Not inspected; JSON `null` is allowed.
    pub geometry: Value,
    pub external_code: String,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
}

/// Database row representation of an AOI.
///
/// `id` is `INTEGER` and `created_at` is `TIMESTAMP` without time zone,
/// holding UTC wall time.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AoiRow {
    pub id: i32,
    pub name: String,
    pub geojson: Value,
    pub kps_code: String,
    #[sqlx(json)]
    pub meta: Metadata,
    pub created_at: NaiveDateTime,
}

impl From<AoiRow> for AreaOfInterest {
    fn from(row: AoiRow) -> Self {
        Self {
            id: Some(i64::from(row.id)),
            name: row.name,
            geometry: row.geojson,
            external_code: row.kps_code,
            metadata: row.meta,
            created_at: row.created_at.and_utc(),
        }
    }
}

impl AreaOfInterest {
    /// Build an unsaved AOI stamped with the current time.
    pub fn new(input: AoiCreate) -> Result<Self, ValidationError> {
        Self::new_at(input, Utc::now())
    }

    pub fn new_at(input: AoiCreate, created_at: DateTime<Utc>) -> Result<Self, ValidationError> {
        input.validate()?;
        Ok(Self {
            id: None,
            name: input.name,
            geometry: input.geometry,
            external_code: input.external_code,
            metadata: input.metadata,
            created_at,
        })
    }

    /// Store-assigned identity, `None` until persisted.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Record the identity handed out by the store. Identity never changes
    /// once set.
    pub fn assign_id(&mut self, id: i64) -> Result<(), ValidationError> {
        if self.id.is_some() {
            return Err(ValidationError::AlreadyAssigned { field: "id" });
        }
        tracing::debug!(id, kps_code = %self.external_code, "aoi id assigned");
        self.id = Some(id);
        Ok(())
    }
}

impl Validate for AreaOfInterest {
    fn validate(&self) -> Result<(), ValidationError> {
        check_len("name", &self.name, NAME_MAX)?;
        check_len("kps_code", &self.external_code, KPS_CODE_MAX)?;
        Ok(())
    }
}
