use crate::domain::models::user::{NewUser, User, UserUpdate};
use crate::domain::ports::UserRepository;
use crate::error::AppError;
use crate::infra::repositories::integrity::{pg_ensure_exists, LOCALE};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

const COLUMNS: &str = "id, first_name, last_name, email_address, username, password_hash, disabled, i18n_locale_id, created_at, modified_at";

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(locale_id) = user.i18n_locale_id {
            pg_ensure_exists(&mut tx, LOCALE, locale_id).await?;
        }

        let created = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (
                first_name, last_name, email_address, username, password_hash, disabled, i18n_locale_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
            RETURNING {COLUMNS}"#
        ))
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email_address)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.i18n_locale_id)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE LOWER(email_address) = LOWER($1)"
        ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, id: i32, update: &UserUpdate) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(locale_id) = update.i18n_locale_id {
            pg_ensure_exists(&mut tx, LOCALE, locale_id).await?;
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users SET
                first_name = COALESCE($1, first_name),
                last_name = COALESCE($2, last_name),
                i18n_locale_id = COALESCE($3, i18n_locale_id),
                password_hash = COALESCE($4, password_hash),
                modified_at = $5
               WHERE id = $6 RETURNING {COLUMNS}"#
        ))
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(update.i18n_locale_id)
            .bind(&update.password_hash)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("User with id {id} not found")))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(user)
    }
}
