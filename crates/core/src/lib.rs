//! Schema layer for the fieldwatch observation tracker.
//!
//! Two persisted entities, [`AreaOfInterest`] and [`Observation`], plus the
//! Create / Update / Response / Filter shapes the API layer marshals.

pub mod aoi;
pub mod observation;
pub mod schema;

pub use aoi::model::{AoiRow, AreaOfInterest};
pub use aoi::shapes::{AoiCreate, AoiResponse, AoiUpdate};
pub use observation::filter::ObservationFilter;
pub use observation::model::{Observation, ObservationRow};
pub use observation::shapes::{ObservationCreate, ObservationResponse, ObservationUpdate};
pub use schema::patch::Patch;
pub use schema::validate::{parse, Metadata, Validate, ValidationError};
