use crate::domain::models::event::{
    Event, EventDate, EventDetail, EventOccurrence, EventQuery, EventUpdate, NewEvent, NewEventDate,
};
use crate::domain::ports::EventRepository;
use crate::domain::services::links::{dedup_ids, diff_links};
use crate::error::AppError;
use crate::infra::repositories::integrity::{
    sqlite_ensure_all_exist, sqlite_ensure_exists, EVENT, EVENT_TYPE, GENRE_TYPE, IMAGE, ORGANIZER, SPACE, VENUE,
};
use crate::infra::repositories::occurrence_query::{occurrence_statement, Dialect, SqlParam};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

const EVENT_COLUMNS: &str = "id, organizer_id, venue_id, space_id, title, description, created_at, modified_at";
const DATE_COLUMNS: &str = "id, event_id, venue_id, space_id, date_start, date_end, entry_time, created_at, modified_at";

struct LinkTable {
    table: &'static str,
    type_column: &'static str,
}

const EVENT_TYPE_LINKS: LinkTable = LinkTable { table: "event_link_types", type_column: "event_type_id" };
const GENRE_TYPE_LINKS: LinkTable = LinkTable { table: "genre_link_types", type_column: "genre_type_id" };

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn linked_ids(conn: &mut SqliteConnection, links: &LinkTable, event_id: i32) -> Result<Vec<i32>, AppError> {
    sqlx::query_scalar::<_, i32>(&format!(
        "SELECT {col} FROM {table} WHERE event_id = ? ORDER BY {col}",
        col = links.type_column,
        table = links.table
    ))
        .bind(event_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(AppError::Database)
}

/// Brings the link rows of `event_id` in line with `wanted`.
async fn sync_links(conn: &mut SqliteConnection, links: &LinkTable, event_id: i32, wanted: &[i32]) -> Result<(), AppError> {
    let current = linked_ids(conn, links, event_id).await?;
    let diff = diff_links(&current, wanted);

    for type_id in &diff.removed {
        sqlx::query(&format!(
            "DELETE FROM {} WHERE event_id = ? AND {} = ?",
            links.table, links.type_column
        ))
            .bind(event_id)
            .bind(type_id)
            .execute(&mut *conn)
            .await
            .map_err(AppError::Database)?;
    }
    for type_id in &diff.added {
        sqlx::query(&format!(
            "INSERT INTO {} (event_id, {}) VALUES (?, ?)",
            links.table, links.type_column
        ))
            .bind(event_id)
            .bind(type_id)
            .execute(&mut *conn)
            .await
            .map_err(AppError::Database)?;
    }

    if !diff.is_empty() {
        debug!(event_id, table = links.table, added = ?diff.added, removed = ?diff.removed, "Links updated");
    }
    Ok(())
}

async fn set_main_image(conn: &mut SqliteConnection, event_id: i32, image_id: i32) -> Result<(), AppError> {
    sqlx::query("UPDATE event_link_images SET main_image = 0 WHERE event_id = ? AND image_id <> ?")
        .bind(event_id)
        .bind(image_id)
        .execute(&mut *conn)
        .await
        .map_err(AppError::Database)?;

    sqlx::query(
        r#"INSERT INTO event_link_images (event_id, image_id, main_image) VALUES (?, ?, 1)
           ON CONFLICT (event_id, image_id) DO UPDATE SET main_image = 1"#,
    )
        .bind(event_id)
        .bind(image_id)
        .execute(&mut *conn)
        .await
        .map_err(AppError::Database)?;
    Ok(())
}

async fn set_date_main_image(conn: &mut SqliteConnection, event_date_id: i32, image_id: i32) -> Result<(), AppError> {
    sqlx::query("UPDATE event_date_link_images SET main_image = 0 WHERE event_date_id = ? AND image_id <> ?")
        .bind(event_date_id)
        .bind(image_id)
        .execute(&mut *conn)
        .await
        .map_err(AppError::Database)?;

    sqlx::query(
        r#"INSERT INTO event_date_link_images (event_date_id, image_id, main_image) VALUES (?, ?, 1)
           ON CONFLICT (event_date_id, image_id) DO UPDATE SET main_image = 1"#,
    )
        .bind(event_date_id)
        .bind(image_id)
        .execute(&mut *conn)
        .await
        .map_err(AppError::Database)?;
    Ok(())
}

async fn insert_date(conn: &mut SqliteConnection, event_id: i32, date: &NewEventDate) -> Result<EventDate, AppError> {
    if let Some(venue_id) = date.venue_id {
        sqlite_ensure_exists(conn, VENUE, venue_id).await?;
    }
    if let Some(space_id) = date.space_id {
        sqlite_ensure_exists(conn, SPACE, space_id).await?;
    }
    if let Some(image_id) = date.main_image_id {
        sqlite_ensure_exists(conn, IMAGE, image_id).await?;
    }

    let event_date = sqlx::query_as::<_, EventDate>(&format!(
        r#"INSERT INTO event_date (event_id, venue_id, space_id, date_start, date_end, entry_time, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?)
           RETURNING {DATE_COLUMNS}"#
    ))
        .bind(event_id)
        .bind(date.venue_id)
        .bind(date.space_id)
        .bind(date.date_start)
        .bind(date.date_end)
        .bind(date.entry_time)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await
        .map_err(AppError::Database)?;

    if let Some(image_id) = date.main_image_id {
        set_date_main_image(conn, event_date.id, image_id).await?;
    }
    Ok(event_date)
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn search(&self, query: &EventQuery) -> Result<Vec<EventOccurrence>, AppError> {
        let statement = occurrence_statement(Dialect::Sqlite, query);
        debug!(params = statement.params.len(), "Running occurrence search");

        let mut q = sqlx::query_as::<_, EventOccurrence>(&statement.sql);
        for param in statement.params {
            q = match param {
                SqlParam::Int(v) => q.bind(v),
                SqlParam::BigInt(v) => q.bind(v),
                SqlParam::Text(v) => q.bind(v),
                SqlParam::Timestamp(v) => q.bind(v),
            };
        }

        q.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn create(&self, event: &NewEvent) -> Result<EventDetail, AppError> {
        let event_type_ids = dedup_ids(&event.event_type_ids);
        let genre_type_ids = dedup_ids(&event.genre_type_ids);
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlite_ensure_exists(&mut tx, ORGANIZER, event.organizer_id).await?;
        sqlite_ensure_exists(&mut tx, VENUE, event.venue_id).await?;
        if let Some(space_id) = event.space_id {
            sqlite_ensure_exists(&mut tx, SPACE, space_id).await?;
        }
        sqlite_ensure_all_exist(&mut tx, EVENT_TYPE, &event_type_ids).await?;
        sqlite_ensure_all_exist(&mut tx, GENRE_TYPE, &genre_type_ids).await?;
        if let Some(image_id) = event.main_image_id {
            sqlite_ensure_exists(&mut tx, IMAGE, image_id).await?;
        }

        let created = sqlx::query_as::<_, Event>(&format!(
            r#"INSERT INTO event (organizer_id, venue_id, space_id, title, description, created_at)
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING {EVENT_COLUMNS}"#
        ))
            .bind(event.organizer_id)
            .bind(event.venue_id)
            .bind(event.space_id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let event_date = insert_date(&mut tx, created.id, &event.date).await?;

        sync_links(&mut tx, &EVENT_TYPE_LINKS, created.id, &event_type_ids).await?;
        sync_links(&mut tx, &GENRE_TYPE_LINKS, created.id, &genre_type_ids).await?;

        if let Some(image_id) = event.main_image_id {
            set_main_image(&mut tx, created.id, image_id).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        info!(event_id = created.id, event_date_id = event_date.id, "Event created");
        Ok(EventDetail { event: created, event_date, event_type_ids, genre_type_ids })
    }

    async fn add_date(&self, event_id: i32, date: &NewEventDate) -> Result<EventDate, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlite_ensure_exists(&mut tx, EVENT, event_id).await?;
        let event_date = insert_date(&mut tx, event_id, date).await?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(event_date)
    }

    async fn update_by_date(&self, event_date_id: i32, update: &EventUpdate) -> Result<EventDetail, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let current = sqlx::query_as::<_, EventDate>(&format!(
            "SELECT {DATE_COLUMNS} FROM event_date WHERE id = ?"
        ))
            .bind(event_date_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Event date with id {event_date_id} not found")))?;

        let stored = sqlx::query_as::<_, Event>(&format!("SELECT {EVENT_COLUMNS} FROM event WHERE id = ?"))
            .bind(current.event_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        let dates = update.merge_date(&current)?;

        if let Some(venue_id) = update.venue_id {
            sqlite_ensure_exists(&mut tx, VENUE, venue_id).await?;
        }
        if let Some(Some(space_id)) = update.space_id {
            sqlite_ensure_exists(&mut tx, SPACE, space_id).await?;
        }
        for image_id in [update.main_image_id, update.date_main_image_id].into_iter().flatten() {
            sqlite_ensure_exists(&mut tx, IMAGE, image_id).await?;
        }
        let event_type_ids = update.event_type_ids.as_deref().map(dedup_ids);
        let genre_type_ids = update.genre_type_ids.as_deref().map(dedup_ids);
        if let Some(ids) = &event_type_ids {
            sqlite_ensure_all_exist(&mut tx, EVENT_TYPE, ids).await?;
        }
        if let Some(ids) = &genre_type_ids {
            sqlite_ensure_all_exist(&mut tx, GENRE_TYPE, ids).await?;
        }

        let now = Utc::now();

        let event = sqlx::query_as::<_, Event>(&format!(
            r#"UPDATE event SET title = ?, description = ?, venue_id = ?, space_id = ?, modified_at = ?
               WHERE id = ? RETURNING {EVENT_COLUMNS}"#
        ))
            .bind(update.title.as_ref().unwrap_or(&stored.title))
            .bind(update.description.as_ref().unwrap_or(&stored.description))
            .bind(update.venue_id.unwrap_or(stored.venue_id))
            .bind(update.space_id.unwrap_or(stored.space_id))
            .bind(now)
            .bind(stored.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let event_date = sqlx::query_as::<_, EventDate>(&format!(
            r#"UPDATE event_date SET date_start = ?, date_end = ?, entry_time = ?, modified_at = ?
               WHERE id = ? RETURNING {DATE_COLUMNS}"#
        ))
            .bind(dates.date_start)
            .bind(dates.date_end)
            .bind(dates.entry_time)
            .bind(now)
            .bind(event_date_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if let Some(ids) = &event_type_ids {
            sync_links(&mut tx, &EVENT_TYPE_LINKS, event.id, ids).await?;
        }
        if let Some(ids) = &genre_type_ids {
            sync_links(&mut tx, &GENRE_TYPE_LINKS, event.id, ids).await?;
        }
        if let Some(image_id) = update.main_image_id {
            set_main_image(&mut tx, event.id, image_id).await?;
        }
        if let Some(image_id) = update.date_main_image_id {
            set_date_main_image(&mut tx, event_date_id, image_id).await?;
        }

        let event_type_ids = linked_ids(&mut tx, &EVENT_TYPE_LINKS, event.id).await?;
        let genre_type_ids = linked_ids(&mut tx, &GENRE_TYPE_LINKS, event.id).await?;

        tx.commit().await.map_err(AppError::Database)?;

        info!(event_id = event.id, event_date_id, "Event updated");
        Ok(EventDetail { event, event_date, event_type_ids, genre_type_ids })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(&format!("SELECT {EVENT_COLUMNS} FROM event WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_date(&self, event_date_id: i32) -> Result<Option<EventDate>, AppError> {
        sqlx::query_as::<_, EventDate>(&format!("SELECT {DATE_COLUMNS} FROM event_date WHERE id = ?"))
            .bind(event_date_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM event WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event with id {id} not found")));
        }
        info!(event_id = id, "Event deleted");
        Ok(())
    }
}
