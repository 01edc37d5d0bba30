use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::models::auth::{Claims, TokenType};
use crate::error::AppError;

pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    reset_ttl: Duration,
}

impl AuthService {
    pub fn new(config: &Config) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            access_ttl: Duration::minutes(config.access_token_expire_minutes),
            refresh_ttl: Duration::days(config.refresh_token_expire_days),
            reset_ttl: Duration::minutes(config.reset_token_expire_minutes),
        }
    }

    pub fn create_access_token(&self, subject: &str, expires: Option<Duration>) -> Result<String, AppError> {
        self.issue(subject, TokenType::Access, expires.unwrap_or(self.access_ttl))
    }

    pub fn create_refresh_token(&self, subject: &str, expires: Option<Duration>) -> Result<String, AppError> {
        self.issue(subject, TokenType::Refresh, expires.unwrap_or(self.refresh_ttl))
    }

    pub fn create_reset_token(&self, subject: &str) -> Result<String, AppError> {
        self.issue(subject, TokenType::Reset, self.reset_ttl)
    }

    pub fn decode_access_token(&self, token: &str) -> Result<String, AppError> {
        self.subject_of(token, TokenType::Access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<String, AppError> {
        self.subject_of(token, TokenType::Refresh)
    }

    pub fn decode_reset_token(&self, token: &str) -> Result<String, AppError> {
        self.subject_of(token, TokenType::Reset)
    }

    fn issue(&self, subject: &str, typ: TokenType, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + ttl).timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            typ,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            error!("JWT encoding failed: {}", e);
            AppError::Internal
        })
    }

    fn subject_of(&self, token: &str, expected: TokenType) -> Result<String, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!("Rejected token: {}", e);
            AppError::Unauthorized
        })?;

        if data.claims.typ != expected {
            debug!("Rejected token of type {:?}, expected {:?}", data.claims.typ, expected);
            return Err(AppError::Unauthorized);
        }
        Ok(data.claims.sub)
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalWithMsg(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|_| AppError::Internal)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn service() -> AuthService {
        AuthService::new(&Config {
            database_url: "sqlite::memory:".into(),
            port: 0,
            secret_key: "unit-test-secret".into(),
            access_token_expire_minutes: 30,
            refresh_token_expire_days: 7,
            reset_token_expire_minutes: 15,
            base_url: "http://localhost/".into(),
            upload_dir: PathBuf::from("./uploads"),
            frontend_url: "http://localhost:5173".into(),
            log_dir: PathBuf::from("./logs"),
        })
    }

    #[test]
    fn tokens_round_trip_by_type() {
        let auth = service();
        let access = auth.create_access_token("7", None).unwrap();
        let refresh = auth.create_refresh_token("7", None).unwrap();
        let reset = auth.create_reset_token("7").unwrap();

        assert_eq!(auth.decode_access_token(&access).unwrap(), "7");
        assert_eq!(auth.verify_refresh_token(&refresh).unwrap(), "7");
        assert_eq!(auth.decode_reset_token(&reset).unwrap(), "7");
    }

    #[test]
    fn wrong_token_type_is_rejected() {
        let auth = service();
        let access = auth.create_access_token("7", None).unwrap();
        assert!(matches!(auth.verify_refresh_token(&access), Err(AppError::Unauthorized)));
        assert!(matches!(auth.decode_reset_token(&access), Err(AppError::Unauthorized)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = service();
        let token = auth.create_access_token("7", Some(Duration::minutes(-5))).unwrap();
        assert!(matches!(auth.decode_access_token(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("Correct-Horse-42").unwrap();
        assert!(verify_password("Correct-Horse-42", &hash).unwrap());
        assert!(!verify_password("wrong-Horse-42", &hash).unwrap());
    }
}
