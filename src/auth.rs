use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::{async_trait, Json};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::Pbkdf2;
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::db;
use crate::err::{replies, Error, Payload};
use crate::models::Login;
use crate::state::AppState;

/// Hashes a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Pbkdf2.hash_password(password.as_bytes(), &salt)?.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(hash) => Pbkdf2.verify_password(password.as_bytes(), &hash).is_ok(),
        Err(err) => {
            log::warn!("stored password hash is malformed: {}", err);
            false
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// HS256 keys shared by every request.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn issue(&self, user_id: i32) -> Result<String, Error> {
        self.issue_until(user_id, Utc::now() + self.ttl)
    }

    fn issue_until(&self, user_id: i32, expires_at: chrono::DateTime<Utc>) -> Result<String, Error> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding,
        )?)
    }

    /// Returns the user id carried by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<i32, Error> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &self.decoding,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|err| {
            log::debug!("rejected token: {}", err);
            Error::unauthorized("Invalid token")
        })?;
        data.claims
            .sub
            .parse()
            .map_err(|_| Error::unauthorized("Invalid token subject"))
    }
}

/// Takes the credential out of `Authorization: <scheme> <token>`.
fn credential(header: &str) -> Option<&str> {
    let (_, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Caller identified by a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| Error::unauthorized("Authorization header missing"))?
            .to_str()
            .map_err(|_| Error::unauthorized("Authorization header is not valid text"))?;
        let token =
            credential(header).ok_or_else(|| Error::unauthorized("Authorization header malformed"))?;
        let id = state.tokens.verify(token)?;
        Ok(Self { id })
    }
}

/// Caller whose role is `admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !db::users::is_admin(&state.pool, user.id).await? {
            log::info!("user {} denied access to an admin route", user.id);
            return Err(Error::forbidden("Forbidden!"));
        }
        Ok(Self(user))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoggedIn {
    token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    #[serde(rename = "userId")]
    user_id: i32,
    admin: bool,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Login>, JsonRejection>,
) -> Payload<LoggedIn> {
    let Json(login) = payload?;
    let user = db::users::find_by_username(&state.pool, &login.username).await?;
    let user = match user {
        Some(user) if verify_password(&login.password, &user.password) => user,
        _ => {
            log::info!("failed login for `{}`", login.username);
            return Err(Error::unauthorized("Invalid username or password"));
        }
    };

    let token = state.tokens.issue(user.id)?;
    log::debug!("issued token for user {}", user.id);
    replies(StatusCode::OK, "Success login!", LoggedIn { token })
}

pub async fn check(State(state): State<AppState>, user: AuthUser) -> Payload<Identity> {
    let admin = db::users::is_admin(&state.pool, user.id).await?;
    replies(
        StatusCode::OK,
        "Success check!",
        Identity {
            user_id: user.id,
            admin,
        },
    )
}

pub async fn check_admin(AdminUser(user): AdminUser) -> Payload<Identity> {
    replies(
        StatusCode::OK,
        "Success check!",
        Identity {
            user_id: user.id,
            admin: true,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new(b"unit-test-secret", Duration::hours(1))
    }

    #[test]
    fn passwords_verify_against_their_hash() {
        let hash = hash_password("admin123").unwrap();
        assert!(hash.starts_with("$pbkdf2"));
        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("admin124", &hash));
    }

    #[test]
    fn every_hash_gets_its_own_salt() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("admin123", "not-a-phc-string"));
    }

    #[test]
    fn token_carries_user_id() {
        let keys = keys();
        let token = keys.issue(42).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), 42);
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let token = TokenKeys::new(b"other", Duration::hours(1)).issue(42).unwrap();
        assert!(matches!(
            keys().verify(&token),
            Err(Error::Unauthorized { .. })
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys();
        let token = keys
            .issue_until(42, Utc::now() - Duration::hours(2))
            .unwrap();
        assert!(matches!(keys.verify(&token), Err(Error::Unauthorized { .. })));
    }

    #[test]
    fn credential_is_second_word_of_header() {
        assert_eq!(credential("Bearer abc.def"), Some("abc.def"));
        assert_eq!(credential("Token  abc"), Some("abc"));
        assert_eq!(credential("abc"), None);
        assert_eq!(credential("Bearer "), None);
    }

    #[tokio::test]
    async fn admin_check_reports_camel_case_user_id() {
        use axum::response::IntoResponse;

        let reply = check_admin(AdminUser(AuthUser { id: 7 })).await.unwrap();
        let response = reply.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["message"], "Success check!");
        assert_eq!(json["userId"], 7);
        assert_eq!(json["admin"], true);
        assert!(json.get("user_id").is_none());
    }
}
