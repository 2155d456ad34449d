use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::config_loader, domain::value_objects::enums::actor_roles::ActorRole};

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: ActorRole,
}

pub fn decode_claims(token: &str, secret: &str) -> anyhow::Result<AccessClaims> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(jsonwebtoken::Algorithm::HS256);

    let token_data = decode::<AccessClaims>(token, &decoding_key, &validation)
        .map_err(|err| anyhow::anyhow!("JWT validation failed: {}", err))?;

    Ok(token_data.claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            ))?;

        let auth_str = auth_header.to_str().map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header".to_string(),
            )
        })?;

        if !auth_str.starts_with("Bearer ") {
            return Err((
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format".to_string(),
            ));
        }

        let token = &auth_str[7..];

        let config = config_loader::load().map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Failed to load auth config".to_string(),
            )
        })?;

        let claims = decode_claims(token, &config.auth.jwt_secret)
            .map_err(|err| (StatusCode::UNAUTHORIZED, err.to_string()))?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid user ID in token".to_string(),
            )
        })?;

        let role = ActorRole::from_str(&claims.role).ok_or((
            StatusCode::UNAUTHORIZED,
            "Unknown role in token".to_string(),
        ))?;

        Ok(AuthUser { user_id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn token_for(sub: &str, role: &str, exp_offset_secs: i64) -> String {
        let claims = AccessClaims {
            sub: sub.to_string(),
            role: role.to_string(),
            exp: (chrono::Utc::now().timestamp() + exp_offset_secs) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_decodes() {
        let user_id = Uuid::new_v4();
        let token = token_for(&user_id.to_string(), "mechanic", 3600);

        let claims = decode_claims(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "mechanic");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = token_for(&Uuid::new_v4().to_string(), "user", 3600);
        assert!(decode_claims(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = token_for(&Uuid::new_v4().to_string(), "user", -3600);
        assert!(decode_claims(&token, SECRET).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode_claims("not-a-jwt", SECRET).is_err());
    }
}
