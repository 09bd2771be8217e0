use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::jwt::JwtSettings;
use crate::models::user::{Actor, UserRole, UserStatus};

/// Bearer token payload. `sub` is the user id, `exp` a UTC timestamp.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// The user these claims authenticate, for service-level permission checks
    pub fn actor(&self) -> Option<Actor> {
        self.user_id().map(|user_id| Actor::new(user_id, self.role))
    }
}

/// Token of an `Authorization: Bearer <token>` header value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify an HS256 token and return its claims
pub fn decode_claims(token: &str, settings: &JwtSettings) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(settings.secret.expose_secret().as_bytes());
    decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256)).map(|data| data.claims)
}

/// Claims of an active user carried by the request's bearer token
pub fn authenticate_request(req: &ServiceRequest) -> Result<Claims, Error> {
    let settings = req
        .app_data::<web::Data<JwtSettings>>()
        .ok_or_else(|| ErrorInternalServerError("Authentication is not configured"))?;

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| ErrorUnauthorized("Missing or malformed bearer token"))?;

    let claims = decode_claims(token, settings).map_err(|e| {
        tracing::warn!("Rejected bearer token for {}: {}", req.path(), e);
        ErrorUnauthorized("Invalid token")
    })?;

    if claims.user_id().is_none() {
        return Err(ErrorUnauthorized("Invalid token subject"));
    }
    if claims.status != UserStatus::Active {
        tracing::warn!("Inactive user {} rejected", claims.username);
        return Err(ErrorUnauthorized("Account is not active"));
    }
    Ok(claims)
}

/// Requires an active user on every route of the wrapped scope and hands the
/// claims to handlers through the request extensions
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate_request(&req) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(e) => Box::pin(ready(Err(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::generate_token;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer   abc "), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("bearer abc"), None);
    }

    #[test]
    fn test_decode_claims_checks_signature() {
        let settings = JwtSettings::new("first-secret".to_string(), 1);
        let other = JwtSettings::new("second-secret".to_string(), 1);
        let user_id = Uuid::new_v4();
        let token = generate_token(user_id, "griff", UserRole::Coach, &settings).unwrap().token;

        let claims = decode_claims(&token, &settings).unwrap();
        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(claims.actor().map(|actor| actor.user_id), Some(user_id));

        assert!(decode_claims(&token, &other).is_err());
    }
}
