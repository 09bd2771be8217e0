use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::jwt::JwtSettings;
use crate::middleware::auth::Claims;
use crate::models::user::{UserRole, UserStatus};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtToken {
    pub token: String,
}

/// Issue an HS256 bearer token for an active user.
///
/// Accounts are managed outside this service; the token is what its auth
/// middleware accepts.
pub fn generate_token(
    user_id: Uuid,
    username: &str,
    role: UserRole,
    jwt_settings: &JwtSettings,
) -> Result<JwtToken, jsonwebtoken::errors::Error> {
    let expires_at = Utc::now() + Duration::hours(jwt_settings.expiration_hours);

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role,
        status: UserStatus::Active,
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
    )?;

    Ok(JwtToken { token })
}
