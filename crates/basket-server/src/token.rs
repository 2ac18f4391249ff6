//! Bearer tokens
//!
//! HS256 JWTs carrying the user's identity. Tokens are stateless: there is
//! no server-side session or revocation list.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use basket_core::models::UserProfile;

/// Default token lifetime
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Claims carried by an issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    pub fn user(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Sign a token for `user` valid for `ttl` from `now`
pub fn issue_token(
    user: &UserProfile,
    secret: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> jsonwebtoken::errors::Result<String> {
    let claims = Claims {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate signature and expiry, returning the claims
pub fn verify_token(token: &str, secret: &str) -> jsonwebtoken::errors::Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: 7,
            username: "anna".to_string(),
            email: "anna@example.com".to_string(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let now = Utc::now();
        let token = issue_token(&profile(), "secret", Duration::days(TOKEN_TTL_DAYS), now).unwrap();

        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.user(), profile());
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&profile(), "secret", Duration::days(1), Utc::now()).unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let issued = Utc::now() - Duration::days(8);
        let token = issue_token(&profile(), "secret", Duration::days(TOKEN_TTL_DAYS), issued).unwrap();
        assert!(verify_token(&token, "secret").is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(verify_token("not.a.token", "secret").is_err());
    }
}
