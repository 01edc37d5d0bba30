use crate::domain::models::{
    geo::{Bbox, VenueName, VenuePoint},
    venue::{UserVenueRole, Venue, VenueDetail, VenueInput},
};
use crate::domain::ports::VenueRepository;
use crate::domain::services::links::{dedup_ids, diff_links};
use crate::domain::services::venue_search::{candidate_terms, rank_venues};
use crate::error::AppError;
use crate::infra::repositories::integrity::{
    sqlite_ensure_all_exist, sqlite_ensure_exists, ORGANIZER, USER, USER_ROLE, VENUE, VENUE_TYPE,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

const COLUMNS: &str = "id, organizer_id, name, street, house_number, postal_code, city, country_code, state_code, longitude, latitude, opened_at, closed_at, created_at, modified_at";

pub struct SqliteVenueRepo {
    pool: SqlitePool,
}

impl SqliteVenueRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn linked_type_ids(conn: &mut SqliteConnection, venue_id: i32) -> Result<Vec<i32>, AppError> {
    sqlx::query_scalar::<_, i32>(
        "SELECT venue_type_id FROM venue_link_types WHERE venue_id = ? ORDER BY venue_type_id",
    )
        .bind(venue_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(AppError::Database)
}

#[async_trait]
impl VenueRepository for SqliteVenueRepo {
    async fn create(&self, organizer_id: i32, input: &VenueInput) -> Result<Venue, AppError> {
        let type_ids = dedup_ids(&input.venue_type_ids);
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlite_ensure_exists(&mut tx, ORGANIZER, organizer_id).await?;
        sqlite_ensure_all_exist(&mut tx, VENUE_TYPE, &type_ids).await?;

        let venue = sqlx::query_as::<_, Venue>(&format!(
            r#"INSERT INTO venue (
                organizer_id, name, street, house_number, postal_code, city, country_code, state_code,
                longitude, latitude, opened_at, closed_at, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}"#
        ))
            .bind(organizer_id)
            .bind(&input.name)
            .bind(&input.street)
            .bind(&input.house_number)
            .bind(&input.postal_code)
            .bind(&input.city)
            .bind(&input.country_code)
            .bind(&input.state_code)
            .bind(input.longitude)
            .bind(input.latitude)
            .bind(input.opened_at)
            .bind(input.closed_at)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for type_id in &type_ids {
            sqlx::query("INSERT INTO venue_link_types (venue_id, venue_type_id) VALUES (?, ?)")
                .bind(venue.id)
                .bind(type_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        info!(venue_id = venue.id, organizer_id, "Venue created");
        Ok(venue)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Venue>, AppError> {
        sqlx::query_as::<_, Venue>(&format!("SELECT {COLUMNS} FROM venue WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_detail(&self, id: i32, lang: &str) -> Result<Option<VenueDetail>, AppError> {
        let Some(venue) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let types = sqlx::query_as::<_, (i32, Option<String>)>(
            r#"SELECT vlt.venue_type_id, vt.name
               FROM venue_link_types vlt
               LEFT JOIN (
                   SELECT t.type_id, t.name FROM venue_type t
                   JOIN i18n_locale l ON l.id = t.i18n_locale_id
                   WHERE l.iso_639_1 = ?
               ) vt ON vt.type_id = vlt.venue_type_id
               WHERE vlt.venue_id = ?
               ORDER BY vlt.venue_type_id"#,
        )
            .bind(lang)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(Some(VenueDetail {
            venue,
            venue_type_ids: types.iter().map(|(type_id, _)| *type_id).collect(),
            venue_types: types.into_iter().filter_map(|(_, name)| name).collect(),
        }))
    }

    async fn list(&self) -> Result<Vec<Venue>, AppError> {
        sqlx::query_as::<_, Venue>(&format!("SELECT {COLUMNS} FROM venue ORDER BY name, id"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, id: i32, input: &VenueInput) -> Result<Venue, AppError> {
        let wanted = dedup_ids(&input.venue_type_ids);
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlite_ensure_all_exist(&mut tx, VENUE_TYPE, &wanted).await?;

        let venue = sqlx::query_as::<_, Venue>(&format!(
            r#"UPDATE venue SET
                name = ?, street = ?, house_number = ?, postal_code = ?, city = ?,
                country_code = ?, state_code = ?, longitude = ?, latitude = ?,
                opened_at = ?, closed_at = ?, modified_at = ?
               WHERE id = ? RETURNING {COLUMNS}"#
        ))
            .bind(&input.name)
            .bind(&input.street)
            .bind(&input.house_number)
            .bind(&input.postal_code)
            .bind(&input.city)
            .bind(&input.country_code)
            .bind(&input.state_code)
            .bind(input.longitude)
            .bind(input.latitude)
            .bind(input.opened_at)
            .bind(input.closed_at)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Venue with id {id} not found")))?;

        let current = linked_type_ids(&mut tx, id).await?;
        let diff = diff_links(&current, &wanted);

        for type_id in &diff.removed {
            sqlx::query("DELETE FROM venue_link_types WHERE venue_id = ? AND venue_type_id = ?")
                .bind(id)
                .bind(type_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }
        for type_id in &diff.added {
            sqlx::query("INSERT INTO venue_link_types (venue_id, venue_type_id) VALUES (?, ?)")
                .bind(id)
                .bind(type_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(venue)
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM venue WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Venue with id {id} not found")));
        }
        Ok(())
    }

    async fn within_bbox(&self, bbox: &Bbox) -> Result<Vec<VenuePoint>, AppError> {
        sqlx::query_as::<_, VenuePoint>(
            r#"SELECT id, name, longitude, latitude FROM venue
               WHERE longitude IS NOT NULL AND latitude IS NOT NULL
                 AND longitude BETWEEN ? AND ?
                 AND latitude BETWEEN ? AND ?
               ORDER BY name, id"#,
        )
            .bind(bbox.xmin)
            .bind(bbox.xmax)
            .bind(bbox.ymin)
            .bind(bbox.ymax)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn search_names(&self, query: &str) -> Result<Vec<VenueName>, AppError> {
        let candidates = match candidate_terms(query) {
            Some(terms) if terms.is_empty() => return Ok(Vec::new()),
            Some(terms) => {
                let clause = vec!["instr(lower(name), ?) > 0"; terms.len()].join(" OR ");
                let sql = format!("SELECT id AS venue_id, name AS venue_name FROM venue WHERE {clause}");
                let mut q = sqlx::query_as::<_, VenueName>(&sql);
                for term in &terms {
                    q = q.bind(term);
                }
                q.fetch_all(&self.pool).await
            }
            None => {
                sqlx::query_as::<_, VenueName>("SELECT id AS venue_id, name AS venue_name FROM venue")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(AppError::Database)?;

        debug!(query, candidates = candidates.len(), "Ranking venue names");
        Ok(rank_venues(query, candidates))
    }

    async fn link_user(&self, user_id: i32, venue_id: i32, role_id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlite_ensure_exists(&mut tx, USER, user_id).await?;
        sqlite_ensure_exists(&mut tx, VENUE, venue_id).await?;
        sqlite_ensure_exists(&mut tx, USER_ROLE, role_id).await?;

        sqlx::query("INSERT INTO user_venue_links (user_id, venue_id, user_role_id) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(venue_id)
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)
    }

    async fn list_user_roles(&self, user_id: i32) -> Result<Vec<UserVenueRole>, AppError> {
        sqlx::query_as::<_, UserVenueRole>(
            r#"SELECT v.id AS venue_id, v.name AS venue_name,
                      r.id AS user_role_id, r.name AS user_role_name
               FROM user_venue_links l
               JOIN venue v ON v.id = l.venue_id
               JOIN user_role r ON r.id = l.user_role_id
               WHERE l.user_id = ?
               ORDER BY v.name, v.id, r.id"#,
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
