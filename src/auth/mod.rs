use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub access: String,
    pub kind: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: &str, access: &str, kind: TokenKind, ttl_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_string(),
            access: access.to_string(),
            kind: kind.as_str().to_string(),
            exp: (now + Duration::hours(ttl_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("Invalid token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Wrong token kind: expected {0}")]
    WrongKind(&'static str),
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }
    Ok(encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Decode and validate a token, rejecting tokens of the wrong kind so a
/// refresh token can never be used as an access token (or vice versa).
pub fn decode_token(token: &str, secret: &str, expected: TokenKind) -> Result<Claims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    if data.claims.kind != expected.as_str() {
        return Err(AuthError::WrongKind(expected.as_str()));
    }
    Ok(data.claims)
}

/// Salted SHA-256 digest in `salt$hex` form.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_roundtrip() {
        let claims = Claims::new(Uuid::new_v4(), "admin@gym.test", "admin", TokenKind::Access, 1);
        let token = encode_token(&claims, SECRET).unwrap();
        let decoded = decode_token(&token, SECRET, TokenKind::Access).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.email, "admin@gym.test");
        assert_eq!(decoded.access, "admin");
    }

    #[test]
    fn refresh_token_rejected_as_access() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.c", "user", TokenKind::Refresh, 1);
        let token = encode_token(&claims, SECRET).unwrap();
        assert!(matches!(
            decode_token(&token, SECRET, TokenKind::Access),
            Err(AuthError::WrongKind("access"))
        ));
    }

    #[test]
    fn tampered_token_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.c", "user", TokenKind::Access, 1);
        let token = encode_token(&claims, SECRET).unwrap();
        assert!(decode_token(&token, "other-secret", TokenKind::Access).is_err());
    }

    #[test]
    fn empty_secret_refused() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.c", "user", TokenKind::Access, 1);
        assert!(matches!(encode_token(&claims, ""), Err(AuthError::MissingSecret)));
    }

    #[test]
    fn password_hash_roundtrip() {
        let stored = hash_password("swordfish");
        assert!(verify_password("swordfish", &stored));
        assert!(!verify_password("sword", &stored));
    }

    #[test]
    fn password_hashes_are_salted() {
        assert_ne!(hash_password("swordfish"), hash_password("swordfish"));
    }

    #[test]
    fn malformed_stored_password_never_verifies() {
        assert!(!verify_password("anything", "not-a-digest"));
    }
}
