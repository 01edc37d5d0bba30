use crate::domain::models::user::{NewUser, User, UserUpdate};
use crate::domain::ports::UserRepository;
use crate::error::AppError;
use crate::infra::repositories::integrity::{sqlite_ensure_exists, LOCALE};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, first_name, last_name, email_address, username, password_hash, disabled, i18n_locale_id, created_at, modified_at";

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(locale_id) = user.i18n_locale_id {
            sqlite_ensure_exists(&mut tx, LOCALE, locale_id).await?;
        }

        let created = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (
                first_name, last_name, email_address, username, password_hash, disabled, i18n_locale_id, created_at
            ) VALUES (?, ?, ?, ?, ?, 0, ?, ?)
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
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE LOWER(email_address) = LOWER(?)"
        ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, id: i32, update: &UserUpdate) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(locale_id) = update.i18n_locale_id {
            sqlite_ensure_exists(&mut tx, LOCALE, locale_id).await?;
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users SET
                first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                i18n_locale_id = COALESCE(?, i18n_locale_id),
                password_hash = COALESCE(?, password_hash),
                modified_at = ?
               WHERE id = ? RETURNING {COLUMNS}"#
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
