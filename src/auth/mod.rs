use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id,
            email,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum AuthCryptoError {
    TokenGeneration(String),
    TokenInvalid(String),
    InvalidSecret,
    HashFailure(String),
}

impl std::fmt::Display for AuthCryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthCryptoError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            AuthCryptoError::TokenInvalid(msg) => write!(f, "Invalid JWT token: {}", msg),
            AuthCryptoError::InvalidSecret => write!(f, "Invalid JWT secret"),
            AuthCryptoError::HashFailure(msg) => write!(f, "Password hashing error: {}", msg),
        }
    }
}

impl std::error::Error for AuthCryptoError {}

pub fn generate_jwt(claims: &Claims) -> Result<String, AuthCryptoError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthCryptoError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key)
        .map_err(|e| AuthCryptoError::TokenGeneration(e.to_string()))
}

pub fn decode_jwt(token: &str) -> Result<Claims, AuthCryptoError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthCryptoError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthCryptoError::TokenInvalid(e.to_string()))
}

/// Hash a plaintext password into a salted PHC string
pub fn hash_password(password: &str) -> Result<String, AuthCryptoError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthCryptoError::HashFailure(e.to_string()))
}

/// Verify a plaintext password against a stored PHC string
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthCryptoError> {
    let parsed_hash =
        PasswordHash::new(stored_hash).map_err(|e| AuthCryptoError::HashFailure(e.to_string()))?;
    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn jwt_round_trip_preserves_user_id() {
        // Development config carries a fallback secret
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "alice@example.com".to_string());
        let token = generate_jwt(&claims).unwrap();
        let decoded = decode_jwt(&token).unwrap();
        assert_eq!(decoded.user_id, user_id);
        assert_eq!(decoded.email, "alice@example.com");
    }
}
