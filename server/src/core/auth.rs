use crate::core::{AppError, AppState};
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Lifetime of tokens issued on sign-up and log-in.
pub fn user_token_ttl() -> Duration {
    Duration::weeks(2)
}

/// Lifetime of tokens issued to the shared guest account.
pub fn guest_token_ttl() -> Duration {
    Duration::minutes(30)
}

// contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,  // expiry time of the token
    pub iat: usize,  // issued at time of the token
}

#[instrument(skip(secret))]
pub fn encode_jwt(
    user_id: &str,
    ttl: Duration,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .inspect_err(|e| error!("Failed to encode JWT token: {:?}", e))
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(
    jwt_token: &str,
    secret: &str,
) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
    debug!("Decoding JWT token");
    decode(
        jwt_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let token = match req.headers().get(http::header::AUTHORIZATION) {
        Some(header) => {
            let value = header.to_str().map_err(|_| {
                warn!("Invalid authorization header format");
                AppError::unauthorized("Unauthorized")
            })?;
            bearer_token(value)
                .ok_or_else(|| {
                    warn!("Authorization header is not a bearer token");
                    AppError::unauthorized("Unauthorized")
                })?
                .to_string()
        }
        None => {
            warn!("Missing authorization header");
            return Err(AppError::unauthorized("Unauthorized"));
        }
    };

    let token_data = decode_jwt(&token, &state.jwt_secret).map_err(|e| {
        warn!("Failed to decode JWT token: {}", e);
        AppError::unauthorized("Unauthorized")
    })?;

    let current_user = state
        .user
        .find_by_id(&token_data.claims.sub)
        .await?
        .ok_or_else(|| {
            warn!("Token subject not found in database: {}", token_data.claims.sub);
            AppError::unauthorized("Unauthorized")
        })?;

    info!("User authenticated: {}", current_user.username);
    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn encoded_token_round_trips_subject() {
        let token = encode_jwt("user-1", user_token_ttl(), SECRET).unwrap();
        let data = decode_jwt(&token, SECRET).unwrap();

        assert_eq!(data.claims.sub, "user-1");
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn guest_tokens_expire_sooner_than_user_tokens() {
        let guest = decode_jwt(&encode_jwt("g", guest_token_ttl(), SECRET).unwrap(), SECRET).unwrap();
        let user = decode_jwt(&encode_jwt("u", user_token_ttl(), SECRET).unwrap(), SECRET).unwrap();

        assert!(guest.claims.exp < user.claims.exp);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = encode_jwt("user-1", user_token_ttl(), "other").unwrap();
        assert!(decode_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = encode_jwt("user-1", Duration::hours(-2), SECRET).unwrap();
        assert!(decode_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn bearer_token_requires_scheme_and_single_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer a b"), None);
    }
}
