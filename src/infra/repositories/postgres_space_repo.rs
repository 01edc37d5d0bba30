use crate::domain::models::space::{Space, SpaceInput};
use crate::domain::ports::SpaceRepository;
use crate::error::AppError;
use crate::infra::repositories::integrity::{pg_ensure_exists, SPACE_TYPE, VENUE};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

const COLUMNS: &str = "id, venue_id, name, total_capacity, seating_capacity, space_type_id, building_level, url, created_at, modified_at";

pub struct PostgresSpaceRepo {
    pool: PgPool,
}

impl PostgresSpaceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SpaceRepository for PostgresSpaceRepo {
    async fn create(&self, venue_id: i32, input: &SpaceInput) -> Result<Space, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        pg_ensure_exists(&mut tx, VENUE, venue_id).await?;
        if let Some(space_type_id) = input.space_type_id {
            pg_ensure_exists(&mut tx, SPACE_TYPE, space_type_id).await?;
        }

        let space = sqlx::query_as::<_, Space>(&format!(
            r#"INSERT INTO space (
                venue_id, name, total_capacity, seating_capacity, space_type_id, building_level, url, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}"#
        ))
            .bind(venue_id)
            .bind(&input.name)
            .bind(input.total_capacity)
            .bind(input.seating_capacity)
            .bind(input.space_type_id)
            .bind(input.building_level)
            .bind(&input.url)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        info!(space_id = space.id, venue_id, "Space created");
        Ok(space)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Space>, AppError> {
        sqlx::query_as::<_, Space>(&format!("SELECT {COLUMNS} FROM space WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, venue_id: Option<i32>) -> Result<Vec<Space>, AppError> {
        sqlx::query_as::<_, Space>(&format!(
            "SELECT {COLUMNS} FROM space WHERE ($1::int IS NULL OR venue_id = $1) ORDER BY name, id"
        ))
            .bind(venue_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, id: i32, input: &SpaceInput) -> Result<Space, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(space_type_id) = input.space_type_id {
            pg_ensure_exists(&mut tx, SPACE_TYPE, space_type_id).await?;
        }

        let space = sqlx::query_as::<_, Space>(&format!(
            r#"UPDATE space SET
                name = $1, total_capacity = $2, seating_capacity = $3, space_type_id = $4,
                building_level = $5, url = $6, modified_at = $7
               WHERE id = $8 RETURNING {COLUMNS}"#
        ))
            .bind(&input.name)
            .bind(input.total_capacity)
            .bind(input.seating_capacity)
            .bind(input.space_type_id)
            .bind(input.building_level)
            .bind(&input.url)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Space with id {id} not found")))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(space)
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM space WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Space with id {id} not found")));
        }
        Ok(())
    }
}
