//! Foreign-key existence checks run inside write transactions, so a bad id
//! surfaces as a typed error naming the field instead of a driver message.

use sqlx::{PgConnection, SqliteConnection};

use crate::error::AppError;

/// A referenced row: `table.column = value`, reported as `field` when missing.
#[derive(Debug, Clone, Copy)]
pub struct Reference {
    pub table: &'static str,
    pub column: &'static str,
    pub field: &'static str,
}

pub const ORGANIZER: Reference = Reference { table: "organizer", column: "id", field: "organizer_id" };
pub const VENUE: Reference = Reference { table: "venue", column: "id", field: "venue_id" };
pub const SPACE: Reference = Reference { table: "space", column: "id", field: "space_id" };
pub const EVENT: Reference = Reference { table: "event", column: "id", field: "event_id" };
pub const IMAGE: Reference = Reference { table: "image", column: "id", field: "image_id" };
pub const USER: Reference = Reference { table: "users", column: "id", field: "user_id" };
pub const USER_ROLE: Reference = Reference { table: "user_role", column: "id", field: "user_role_id" };
pub const LOCALE: Reference = Reference { table: "i18n_locale", column: "id", field: "i18n_locale_id" };
pub const LICENSE_TYPE: Reference = Reference { table: "license_type", column: "id", field: "license_type_id" };
pub const EVENT_TYPE: Reference = Reference { table: "event_type", column: "type_id", field: "event_type_id" };
pub const GENRE_TYPE: Reference = Reference { table: "genre_type", column: "type_id", field: "genre_type_id" };
pub const VENUE_TYPE: Reference = Reference { table: "venue_type", column: "type_id", field: "venue_type_id" };
pub const SPACE_TYPE: Reference = Reference { table: "space_type", column: "type_id", field: "space_type_id" };
pub const IMAGE_TYPE: Reference = Reference { table: "image_type", column: "type_id", field: "image_type_id" };

pub async fn pg_ensure_exists(conn: &mut PgConnection, reference: Reference, value: i32) -> Result<(), AppError> {
    let sql = format!(
        "SELECT 1 FROM {} WHERE {} = $1 LIMIT 1",
        reference.table, reference.column
    );
    let found = sqlx::query_scalar::<_, i32>(&sql)
        .bind(value)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::Database)?;

    match found {
        Some(_) => Ok(()),
        None => Err(AppError::invalid_reference(reference.field, value)),
    }
}

pub async fn pg_ensure_all_exist(conn: &mut PgConnection, reference: Reference, values: &[i32]) -> Result<(), AppError> {
    for value in values {
        pg_ensure_exists(conn, reference, *value).await?;
    }
    Ok(())
}

pub async fn sqlite_ensure_exists(conn: &mut SqliteConnection, reference: Reference, value: i32) -> Result<(), AppError> {
    let sql = format!(
        "SELECT 1 FROM {} WHERE {} = ? LIMIT 1",
        reference.table, reference.column
    );
    let found = sqlx::query_scalar::<_, i32>(&sql)
        .bind(value)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::Database)?;

    match found {
        Some(_) => Ok(()),
        None => Err(AppError::invalid_reference(reference.field, value)),
    }
}

pub async fn sqlite_ensure_all_exist(conn: &mut SqliteConnection, reference: Reference, values: &[i32]) -> Result<(), AppError> {
    for value in values {
        sqlite_ensure_exists(conn, reference, *value).await?;
    }
    Ok(())
}
