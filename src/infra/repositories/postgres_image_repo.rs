use crate::domain::models::image::{Image, ImageInput};
use crate::domain::ports::ImageRepository;
use crate::error::AppError;
use crate::infra::repositories::integrity::{pg_ensure_exists, IMAGE_TYPE, LICENSE_TYPE};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

const COLUMNS: &str = "id, origin_name, source_name, mime_type, license_type_id, image_type_id, alt_text, caption, copyright, created_by, created_at";

pub struct PostgresImageRepo {
    pool: PgPool,
}

impl PostgresImageRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PostgresImageRepo {
    async fn create(&self, input: &ImageInput) -> Result<Image, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(license_type_id) = input.license_type_id {
            pg_ensure_exists(&mut tx, LICENSE_TYPE, license_type_id).await?;
        }
        if let Some(image_type_id) = input.image_type_id {
            pg_ensure_exists(&mut tx, IMAGE_TYPE, image_type_id).await?;
        }

        let image = sqlx::query_as::<_, Image>(&format!(
            r#"INSERT INTO image (
                origin_name, source_name, mime_type, license_type_id, image_type_id,
                alt_text, caption, copyright, created_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUMNS}"#
        ))
            .bind(&input.origin_name)
            .bind(&input.source_name)
            .bind(&input.mime_type)
            .bind(input.license_type_id)
            .bind(input.image_type_id)
            .bind(&input.alt_text)
            .bind(&input.caption)
            .bind(&input.copyright)
            .bind(&input.created_by)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(image)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Image>, AppError> {
        sqlx::query_as::<_, Image>(&format!("SELECT {COLUMNS} FROM image WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
