//! Transfer shapes for Areas of Interest.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::{AreaOfInterest, KPS_CODE_MAX, NAME_MAX};
use crate::schema::patch::Patch;
use crate::schema::timestamp;
use crate::schema::validate::{check_len, Metadata, Validate, ValidationError};

/// Input for creating an AOI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AoiCreate {
    pub name: String,
    #[serde(rename = "geojson")]
    pub geometry: Value,
    #[serde(rename = "kps_code")]
    pub external_code: String,
    #[serde(rename = "meta", default)]
    pub metadata: Metadata,
}

impl Validate for AoiCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        check_len("name", &self.name, NAME_MAX)?;
        check_len("kps_code", &self.external_code, KPS_CODE_MAX)?;
        Ok(())
    }
}

/// Partial update of an AOI. The kps code is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AoiUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
    /// `null` stores a JSON null geometry.
    #[serde(rename = "geojson", default, skip_serializing_if = "Patch::is_absent")]
    pub geometry: Patch<Value>,
    /// `null` resets the metadata to an empty map.
    #[serde(rename = "meta", default, skip_serializing_if = "Patch::is_absent")]
    pub metadata: Patch<Metadata>,
}

impl AoiUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_absent() && self.geometry.is_absent() && self.metadata.is_absent()
    }

    /// Apply every present field to `target`. Nothing is written unless the
    /// whole patch validates.
    pub fn apply(self, target: &mut AreaOfInterest) -> Result<(), ValidationError> {
        self.validate()?;

        let mut changed = Vec::new();
        if let Patch::Value(name) = self.name {
            target.name = name;
            changed.push("name");
        }
        if let Some(geometry) = self.geometry.into_option() {
            target.geometry = geometry.unwrap_or(Value::Null);
            changed.push("geojson");
        }
        if let Some(metadata) = self.metadata.into_option() {
            target.metadata = metadata.unwrap_or_default();
            changed.push("meta");
        }

        tracing::debug!(id = ?target.id(), ?changed, "aoi patch applied");
        Ok(())
    }
}

impl Validate for AoiUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = self.name.non_null("name")? {
            check_len("name", name, NAME_MAX)?;
        }
        Ok(())
    }
}

/// Serialization-ready view of a persisted AOI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AoiResponse {
    pub id: i64,
    pub name: String,
    pub geojson: Value,
    pub kps_code: String,
    pub meta: Metadata,
    /// ISO-8601, UTC.
    pub created_at: String,
}

impl TryFrom<&AreaOfInterest> for AoiResponse {
    type Error = ValidationError;

    fn try_from(aoi: &AreaOfInterest) -> Result<Self, Self::Error> {
        let id = aoi.id().ok_or(ValidationError::Unassigned { field: "id" })?;
        Ok(Self {
            id,
            name: aoi.name.clone(),
            geojson: aoi.geometry.clone(),
            kps_code: aoi.external_code.clone(),
            meta: aoi.metadata.clone(),
            created_at: timestamp::render(&aoi.created_at),
        })
    }
}
