//! Logical layout of the external record store.
//!
//! The tables are provisioned outside this workspace; these declarations are
//! what the repositories read and write, and how a store constraint failure
//! is traced back to the field it guards.

pub const AOIS_TABLE: &str = "aois";
pub const OBSERVATIONS_TABLE: &str = "observations";

/// Column list of `aois`, primary key first.
pub const AOI_COLUMNS: &[&str] = &["id", "name", "geojson", "kps_code", "meta", "created_at"];

/// Column list of `observations`, primary key first.
pub const OBSERVATION_COLUMNS: &[&str] = &[
    "id",
    "kps_id",
    "observed_at",
    "lat",
    "lng",
    "finding_type",
    "notes",
    "photo_url",
    "source",
    "created_by",
    "created_at",
];

/// A uniqueness constraint enforced by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    AoiCode,
    ObservationId,
}

impl UniqueKey {
    pub const ALL: [UniqueKey; 2] = [UniqueKey::AoiCode, UniqueKey::ObservationId];

    pub fn table(self) -> &'static str {
        match self {
            UniqueKey::AoiCode => AOIS_TABLE,
            UniqueKey::ObservationId => OBSERVATIONS_TABLE,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            UniqueKey::AoiCode => "kps_code",
            UniqueKey::ObservationId => "kps_id",
        }
    }

    /// PostgreSQL's default name for a `UNIQUE` column constraint.
    pub fn constraint(self) -> String {
        format!("{}_{}_key", self.table(), self.column())
    }

    /// Map a violated constraint name back to its key.
    pub fn from_constraint(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.constraint() == name)
    }
}
