use crate::domain::models::lookup::{
    Country, ImageType, LicenseType, Locale, LocalizedType, State, TypeTable, UserRole,
};
use crate::domain::ports::LookupRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresLookupRepo {
    pool: PgPool,
}

impl PostgresLookupRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LookupRepository for PostgresLookupRepo {
    async fn list_types(&self, table: TypeTable, lang: Option<&str>) -> Result<Vec<LocalizedType>, AppError> {
        let sql = format!(
            "SELECT t.type_id, t.name, t.i18n_locale_id AS locale_id, l.iso_639_1 \
             FROM {} t JOIN i18n_locale l ON l.id = t.i18n_locale_id \
             WHERE ($1::text IS NULL OR l.iso_639_1 = $1) \
             ORDER BY t.name, t.type_id",
            table.table()
        );
        sqlx::query_as::<_, LocalizedType>(&sql)
            .bind(lang)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_image_types(&self, lang: Option<&str>) -> Result<Vec<ImageType>, AppError> {
        sqlx::query_as::<_, ImageType>(
            r#"SELECT t.type_id AS image_type_id, t.name AS image_type_name,
                      t.description AS image_type_description, t.i18n_locale_id AS image_locale_id
               FROM image_type t JOIN i18n_locale l ON l.id = t.i18n_locale_id
               WHERE ($1::text IS NULL OR l.iso_639_1 = $1)
               ORDER BY t.name"#,
        )
            .bind(lang)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_license_types(&self, lang: Option<&str>) -> Result<Vec<LicenseType>, AppError> {
        sqlx::query_as::<_, LicenseType>(
            r#"SELECT t.id AS license_type_id, t.name AS license_type_name,
                      t.short_name AS license_type_short_name, t.url AS license_type_url,
                      t.i18n_locale_id AS license_locale_id
               FROM license_type t JOIN i18n_locale l ON l.id = t.i18n_locale_id
               WHERE ($1::text IS NULL OR l.iso_639_1 = $1)
               ORDER BY t.name"#,
        )
            .bind(lang)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_locales(&self) -> Result<Vec<Locale>, AppError> {
        sqlx::query_as::<_, Locale>(
            "SELECT id AS locale_id, name AS locale_name, iso_639_1 AS locale_code FROM i18n_locale ORDER BY id",
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_user_roles(&self) -> Result<Vec<UserRole>, AppError> {
        sqlx::query_as::<_, UserRole>(
            "SELECT id, name, organization, venue, space, event FROM user_role ORDER BY id",
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_countries(&self, lang: Option<&str>) -> Result<Vec<Country>, AppError> {
        sqlx::query_as::<_, Country>(
            r#"SELECT code AS country_code, name AS country_name, iso_639_1 AS country_iso_639_1
               FROM country WHERE ($1::text IS NULL OR iso_639_1 = $1) ORDER BY name"#,
        )
            .bind(lang)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_country_by_name(&self, name: &str) -> Result<Option<Country>, AppError> {
        sqlx::query_as::<_, Country>(
            "SELECT code AS country_code, name AS country_name, iso_639_1 AS country_iso_639_1 FROM country WHERE name = $1",
        )
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_countries_by_code(&self, code: &str) -> Result<Vec<Country>, AppError> {
        sqlx::query_as::<_, Country>(
            "SELECT code AS country_code, name AS country_name, iso_639_1 AS country_iso_639_1 FROM country WHERE code = $1",
        )
            .bind(code)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_states(&self) -> Result<Vec<State>, AppError> {
        sqlx::query_as::<_, State>(
            "SELECT code AS state_code, name AS state_name, country_code AS state_country_code FROM state ORDER BY name",
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_state_by_name(&self, name: &str) -> Result<Option<State>, AppError> {
        sqlx::query_as::<_, State>(
            "SELECT code AS state_code, name AS state_name, country_code AS state_country_code FROM state WHERE name = $1",
        )
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_state_by_code(&self, code: &str) -> Result<Option<State>, AppError> {
        sqlx::query_as::<_, State>(
            "SELECT code AS state_code, name AS state_name, country_code AS state_country_code FROM state WHERE code = $1",
        )
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
