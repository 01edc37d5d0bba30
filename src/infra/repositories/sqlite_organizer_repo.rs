use crate::domain::models::{
    organizer::{Organizer, OrganizerInput, OrganizerStats, UserOrganizer},
    user::OrganizerPermissions,
};
use crate::domain::ports::OrganizerRepository;
use crate::error::AppError;
use crate::infra::repositories::integrity::{sqlite_ensure_exists, USER, USER_ROLE};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;

const COLUMNS: &str = "id, name, description, contact_email, contact_phone, website_url, street, house_number, postal_code, city, country, created_at, modified_at";

pub struct SqliteOrganizerRepo {
    pool: SqlitePool,
}

impl SqliteOrganizerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizerRepository for SqliteOrganizerRepo {
    async fn create(&self, input: &OrganizerInput, owner_id: i32, role_id: i32) -> Result<Organizer, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlite_ensure_exists(&mut tx, USER, owner_id).await?;
        sqlite_ensure_exists(&mut tx, USER_ROLE, role_id).await?;

        let organizer = sqlx::query_as::<_, Organizer>(&format!(
            r#"INSERT INTO organizer (
                name, description, contact_email, contact_phone, website_url,
                street, house_number, postal_code, city, country, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}"#
        ))
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.website_url)
            .bind(&input.street)
            .bind(&input.house_number)
            .bind(&input.postal_code)
            .bind(&input.city)
            .bind(&input.country)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query("INSERT INTO user_organizer_links (user_id, organizer_id, user_role_id) VALUES (?, ?, ?)")
            .bind(owner_id)
            .bind(organizer.id)
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        info!(organizer_id = organizer.id, owner_id, "Organizer created");
        Ok(organizer)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Organizer>, AppError> {
        sqlx::query_as::<_, Organizer>(&format!("SELECT {COLUMNS} FROM organizer WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Organizer>, AppError> {
        sqlx::query_as::<_, Organizer>(&format!("SELECT {COLUMNS} FROM organizer ORDER BY name, id"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, id: i32, input: &OrganizerInput) -> Result<Organizer, AppError> {
        sqlx::query_as::<_, Organizer>(&format!(
            r#"UPDATE organizer SET
                name = ?, description = ?, contact_email = ?, contact_phone = ?, website_url = ?,
                street = ?, house_number = ?, postal_code = ?, city = ?, country = ?, modified_at = ?
               WHERE id = ? RETURNING {COLUMNS}"#
        ))
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.website_url)
            .bind(&input.street)
            .bind(&input.house_number)
            .bind(&input.postal_code)
            .bind(&input.city)
            .bind(&input.country)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Organizer with id {id} not found")))
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM organizer WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Organizer with id {id} not found")));
        }
        Ok(())
    }

    async fn stats(&self, id: i32, now: DateTime<Utc>) -> Result<OrganizerStats, AppError> {
        sqlx::query_as::<_, OrganizerStats>(
            r#"SELECT o.id AS organizer_id,
                (SELECT COUNT(*) FROM venue v WHERE v.organizer_id = o.id) AS count_venues,
                (SELECT COUNT(*) FROM space s JOIN venue v ON v.id = s.venue_id
                  WHERE v.organizer_id = o.id) AS count_spaces,
                (SELECT COUNT(DISTINCT e.id) FROM event e
                  LEFT JOIN event_date ed ON ed.event_id = e.id
                  WHERE e.organizer_id = o.id
                    AND (ed.date_start IS NULL OR ed.date_start >= ?)) AS count_events
               FROM organizer o WHERE o.id = ?"#,
        )
            .bind(now)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Organizer with id {id} not found")))
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<UserOrganizer>, AppError> {
        sqlx::query_as::<_, UserOrganizer>(
            r#"SELECT o.id AS organizer_id, o.name AS organizer_name,
                      l.user_role_id, r.organization AS can_edit
               FROM user_organizer_links l
               JOIN organizer o ON o.id = l.organizer_id
               JOIN user_role r ON r.id = l.user_role_id
               WHERE l.user_id = ?
               ORDER BY o.name, o.id"#,
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn permissions(&self, user_id: i32, organizer_id: i32) -> Result<Option<OrganizerPermissions>, AppError> {
        sqlx::query_as::<_, OrganizerPermissions>(
            r#"SELECT r.organization, r.venue, r.space, r.event
               FROM user_organizer_links l
               JOIN user_role r ON r.id = l.user_role_id
               WHERE l.user_id = ? AND l.organizer_id = ?"#,
        )
            .bind(user_id)
            .bind(organizer_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
