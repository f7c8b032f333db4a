use fieldwatch_core::schema::store::{OBSERVATIONS_TABLE, OBSERVATION_COLUMNS};
use fieldwatch_core::{Observation, ObservationRow, Validate};
use sqlx::PgPool;

use super::{expect_one_row, insert_sql, map_write_error, select_by_id_sql, store_id, update_sql};
use crate::error::{ApiError, ApiResult};

/// Columns an `ObservationUpdate` can change.
const PATCHABLE: &[&str] = &[
    "observed_at",
    "lat",
    "lng",
    "finding_type",
    "notes",
    "photo_url",
    "source",
];

/// Persist a new observation and record the id the store hands back.
pub async fn insert(pool: &PgPool, obs: &mut Observation) -> ApiResult<()> {
    obs.validate()?;
    let sql = insert_sql(OBSERVATIONS_TABLE, &OBSERVATION_COLUMNS[1..]);
    let id: i32 = sqlx::query_scalar(&sql)
        .bind(&obs.external_id)
        .bind(obs.observed_at.naive_utc())
        .bind(obs.lat)
        .bind(obs.lng)
        .bind(&obs.finding_type)
        .bind(&obs.notes)
        .bind(&obs.photo_url)
        .bind(&obs.source)
        .bind(&obs.created_by)
        .bind(obs.created_at.naive_utc())
        .fetch_one(pool)
        .await
        .map_err(map_write_error)?;
    obs.assign_id(i64::from(id))?;
    Ok(())
}

pub async fn find(pool: &PgPool, id: i64) -> ApiResult<Option<Observation>> {
    let Some(key) = store_id(id) else {
        return Ok(None);
    };
    let sql = select_by_id_sql(OBSERVATIONS_TABLE, OBSERVATION_COLUMNS);
    let row = sqlx::query_as::<_, ObservationRow>(&sql)
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Observation::from))
}

/// Write back the patchable columns of a persisted observation.
pub async fn update(pool: &PgPool, id: i64, obs: &Observation) -> ApiResult<()> {
    obs.validate()?;
    let key = store_id(id).ok_or_else(|| ApiError::NotFound(format!("observation {id}")))?;
    let sql = update_sql(OBSERVATIONS_TABLE, PATCHABLE);
    let result = sqlx::query(&sql)
        .bind(key)
        .bind(obs.observed_at.naive_utc())
        .bind(obs.lat)
        .bind(obs.lng)
        .bind(&obs.finding_type)
        .bind(&obs.notes)
        .bind(&obs.photo_url)
        .bind(&obs.source)
        .execute(pool)
        .await
        .map_err(map_write_error)?;
    expect_one_row(result.rows_affected(), "observation", id)
}
