use fieldwatch_core::schema::store::{AOIS_TABLE, AOI_COLUMNS};
use fieldwatch_core::{AoiRow, AreaOfInterest, Validate};
use sqlx::types::Json;
use sqlx::PgPool;

use super::{expect_one_row, insert_sql, map_write_error, select_by_id_sql, store_id, update_sql};
use crate::error::{ApiError, ApiResult};

/// Columns an `AoiUpdate` can change.
const PATCHABLE: &[&str] = &["name", "geojson", "meta"];

/// Persist a new AOI and record the id the store hands back.
pub async fn insert(pool: &PgPool, aoi: &mut AreaOfInterest) -> ApiResult<()> {
    aoi.validate()?;
    let sql = insert_sql(AOIS_TABLE, &AOI_COLUMNS[1..]);
    let id: i32 = sqlx::query_scalar(&sql)
        .bind(&aoi.name)
        .bind(&aoi.geometry)
        .bind(&aoi.external_code)
        .bind(Json(&aoi.metadata))
        .bind(aoi.created_at.naive_utc())
        .fetch_one(pool)
        .await
        .map_err(map_write_error)?;
    aoi.assign_id(i64::from(id))?;
    Ok(())
}

pub async fn find(pool: &PgPool, id: i64) -> ApiResult<Option<AreaOfInterest>> {
    let Some(key) = store_id(id) else {
        return Ok(None);
    };
    let sql = select_by_id_sql(AOIS_TABLE, AOI_COLUMNS);
    let row = sqlx::query_as::<_, AoiRow>(&sql)
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(AreaOfInterest::from))
}

/// Write back the patchable columns of a persisted AOI.
pub async fn update(pool: &PgPool, id: i64, aoi: &AreaOfInterest) -> ApiResult<()> {
    aoi.validate()?;
    let key = store_id(id).ok_or_else(|| ApiError::NotFound(format!("aoi {id}")))?;
    let sql = update_sql(AOIS_TABLE, PATCHABLE);
    let result = sqlx::query(&sql)
        .bind(key)
        .bind(&aoi.name)
        .bind(&aoi.geometry)
        .bind(Json(&aoi.metadata))
        .execute(pool)
        .await
        .map_err(map_write_error)?;
    expect_one_row(result.rows_affected(), "aoi", id)
}
