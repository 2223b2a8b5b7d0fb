use anyhow::{Result, bail};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Token kinds carried in the `type` claim. The auth extractor only accepts
/// access tokens; `/auth/refresh` only accepts refresh tokens.
pub const ACCESS: &str = "access";
pub const REFRESH: &str = "refresh";

/// JWT claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID, stringified.
    pub sub: String,
    #[serde(rename = "type")]
    pub token_type: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i32> {
        Ok(self.sub.parse()?)
    }
}

/// Sign a short-lived access token.
pub fn sign_access(user_id: i32, secret: &str, ttl_minutes: i64) -> Result<String> {
    sign(user_id, ACCESS, Duration::minutes(ttl_minutes), secret)
}

/// Sign a long-lived refresh token.
pub fn sign_refresh(user_id: i32, secret: &str, ttl_days: i64) -> Result<String> {
    sign(user_id, REFRESH, Duration::days(ttl_days), secret)
}

fn sign(user_id: i32, token_type: &str, ttl: Duration, secret: &str) -> Result<String> {
    let Some(expiration) = Utc::now().checked_add_signed(ttl) else {
        bail!("token expiration out of range");
    };

    let claims = Claims {
        sub: user_id.to_string(),
        token_type: token_type.to_string(),
        exp: expiration.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Verify signature and expiry, returning the claims.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
