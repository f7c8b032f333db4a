//! Transfer shapes for observations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::model::{
    Observation, CREATED_BY_MAX, FINDING_TYPE_MAX, KPS_ID_MAX, NOTES_MAX, PHOTO_URL_MAX,
    SOURCE_MAX,
};
use crate::schema::decimal;
use crate::schema::patch::Patch;
use crate::schema::timestamp;
use crate::schema::validate::{check_decimal, check_len, Validate, ValidationError, COORDINATE};

/// Input for recording an observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationCreate {
    #[serde(rename = "kps_id")]
    pub external_id: String,
    pub observed_at: DateTime<Utc>,
    #[serde(deserialize_with = "decimal::exact")]
    pub lat: Decimal,
    #[serde(deserialize_with = "decimal::exact")]
    pub lng: Decimal,
    pub finding_type: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub source: String,
    pub created_by: String,
}

impl Validate for ObservationCreate {
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

/// Partial update of an observation. The kps id and `created_by` are fixed
/// at creation; `photo_url` is the only field that accepts `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub observed_at: Patch<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "decimal::exact_patch",
        skip_serializing_if = "Patch::is_absent"
    )]
    pub lat: Patch<Decimal>,
    #[serde(
        default,
        deserialize_with = "decimal::exact_patch",
        skip_serializing_if = "Patch::is_absent"
    )]
    pub lng: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub finding_type: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub notes: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub photo_url: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub source: Patch<String>,
}

impl ObservationUpdate {
    pub fn is_empty(&self) -> bool {
        self.observed_at.is_absent()
            && self.lat.is_absent()
            && self.lng.is_absent()
            && self.finding_type.is_absent()
            && self.notes.is_absent()
            && self.photo_url.is_absent()
            && self.source.is_absent()
    }

    /// Apply every present field to `target`. Nothing is written unless the
    /// whole patch validates.
    pub fn apply(self, target: &mut Observation) -> Result<(), ValidationError> {
        self.validate()?;

        let mut changed = Vec::new();
        if let Patch::Value(observed_at) = self.observed_at {
            target.observed_at = observed_at;
            changed.push("observed_at");
        }
        if let Patch::Value(lat) = self.lat {
            target.lat = lat;
            changed.push("lat");
        }
        if let Patch::Value(lng) = self.lng {
            target.lng = lng;
            changed.push("lng");
        }
        if let Patch::Value(finding_type) = self.finding_type {
            target.finding_type = finding_type;
            changed.push("finding_type");
        }
        if let Patch::Value(notes) = self.notes {
            target.notes = notes;
            changed.push("notes");
        }
        if let Some(photo_url) = self.photo_url.into_option() {
            target.photo_url = photo_url;
            changed.push("photo_url");
        }
        if let Patch::Value(source) = self.source {
            target.source = source;
            changed.push("source");
        }

        tracing::debug!(id = ?target.id(), ?changed, "observation patch applied");
        Ok(())
    }
}

impl Validate for ObservationUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        self.observed_at.non_null("observed_at")?;
        if let Some(lat) = self.lat.non_null("lat")? {
            check_decimal("lat", lat, COORDINATE)?;
        }
        if let Some(lng) = self.lng.non_null("lng")? {
            check_decimal("lng", lng, COORDINATE)?;
        }
        if let Some(finding_type) = self.finding_type.non_null("finding_type")? {
            check_len("finding_type", finding_type, FINDING_TYPE_MAX)?;
        }
        if let Some(notes) = self.notes.non_null("notes")? {
            check_len("notes", notes, NOTES_MAX)?;
        }
        if let Patch::Value(url) = &self.photo_url {
            check_len("photo_url", url, PHOTO_URL_MAX)?;
        }
        if let Some(source) = self.source.non_null("source")? {
            check_len("source", source, SOURCE_MAX)?;
        }
        Ok(())
    }
}

/// Serialization-ready view of a persisted observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationResponse {
    pub id: i64,
    pub kps_id: String,
    /// ISO-8601, UTC.
    pub observed_at: String,
    pub lat: Decimal,
    pub lng: Decimal,
    pub finding_type: String,
    pub notes: String,
    pub photo_url: Option<String>,
    pub source: String,
    pub created_by: String,
    /// ISO-8601, UTC.
    pub created_at: String,
}

impl TryFrom<&Observation> for ObservationResponse {
    type Error = ValidationError;

    fn try_from(obs: &Observation) -> Result<Self, Self::Error> {
        let id = obs.id().ok_or(ValidationError::Unassigned { field: "id" })?;
        Ok(Self {
            id,
            kps_id: obs.external_id.clone(),
            observed_at: timestamp::render(&obs.observed_at),
            lat: obs.lat,
            lng: obs.lng,
            finding_type: obs.finding_type.clone(),
            notes: obs.notes.clone(),
            photo_url: obs.photo_url.clone(),
            source: obs.source.clone(),
            created_by: obs.created_by.clone(),
            created_at: timestamp::render(&obs.created_at),
        })
    }
}
