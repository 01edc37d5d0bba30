use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} must be a number, got {1:?}")]
    NotANumber(&'static str, String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,
    pub reset_token_expire_minutes: i64,
    /// Public base URL, always ending in `/`.
    pub base_url: String,
    pub upload_dir: PathBuf,
    pub frontend_url: String,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: number("PORT", 3000)?,
            secret_key: required("SECRET_KEY")?,
            access_token_expire_minutes: number("ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
            refresh_token_expire_days: number("REFRESH_TOKEN_EXPIRE_DAYS", 7)?,
            reset_token_expire_minutes: number("RESET_TOKEN_EXPIRE_MINUTES", 15)?,
            base_url: normalize_base_url(
                &env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000/".to_string()),
            ),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()).into(),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()).into(),
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn number<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::NotANumber(key, raw)),
        Err(_) => Ok(default),
    }
}

pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        assert_eq!(normalize_base_url("https://uranus.example"), "https://uranus.example/");
        assert_eq!(normalize_base_url("https://uranus.example/"), "https://uranus.example/");
        assert_eq!(normalize_base_url(" http://localhost:3000/api "), "http://localhost:3000/api/");
    }
}
