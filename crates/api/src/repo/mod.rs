//! sqlx access to the `aois` and `observations` tables.
//!
//! The tables and their `UNIQUE` constraints are provisioned outside this
//! service. A duplicate kps code or id surfaces here as a unique violation and
//! is turned into a conflict naming the column.
//!
//! Primary keys are `INTEGER` and timestamps `TIMESTAMP` without time zone;
//! rows are decoded through the core `*Row` types and converted to entities.

pub mod aois;
pub mod observations;

use fieldwatch_core::schema::store::UniqueKey;

use crate::error::{ApiError, ApiResult};

/// Narrow an entity id to the store's `INTEGER` key. Ids outside that range
/// cannot name a row.
fn store_id(id: i64) -> Option<i32> {
    i32::try_from(id).ok()
}

/// An update that touched no row means the record is gone.
fn expect_one_row(affected: u64, what: &str, id: i64) -> ApiResult<()> {
    if affected == 0 {
        return Err(ApiError::NotFound(format!("{what} {id}")));
    }
    Ok(())
}

/// Map a failed insert or update to an API error.
fn map_write_error(err: sqlx::Error) -> ApiError {
    let violated = err
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .map(|db| db.constraint().map(str::to_owned));
    match violated {
        Some(constraint) => conflict_for(constraint.as_deref()),
        None => ApiError::Database(err),
    }
}

fn conflict_for(constraint: Option<&str>) -> ApiError {
    match constraint.and_then(UniqueKey::from_constraint) {
        Some(key) => ApiError::Conflict(format!("{} already exists", key.column())),
        None => ApiError::Conflict("record already exists".to_string()),
    }
}

/// `SELECT <columns> FROM <table> WHERE id = $1`
fn select_by_id_sql(table: &str, columns: &[&str]) -> String {
    format!("SELECT {} FROM {table} WHERE id = $1", columns.join(", "))
}

/// `INSERT INTO <table> (<columns>) VALUES ($1, ..) RETURNING id`
fn insert_sql(table: &str, columns: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|n| format!("${n}")).collect();
    format!(
        "INSERT INTO {table} ({}) VALUES ({}) RETURNING id",
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// `UPDATE <table> SET c1 = $2, .. WHERE id = $1`
fn update_sql(table: &str, columns: &[&str]) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(n, column)| format!("{column} = ${}", n + 2))
        .collect();
    format!("UPDATE {table} SET {} WHERE id = $1", assignments.join(", "))
}
