use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tower::BoxError;

pub type Payload<T> = Result<Reply<T>, Error>;

pub async fn handler404(path: Uri) -> Error {
    Error::NotFound {
        message: format!("Invalid path: {}", path),
    }
}

pub fn proceeds<V>(value: V) -> Payload<V>
where
    V: Serialize,
{
    Ok(Reply::new(StatusCode::OK, None, value))
}

pub fn replies<V>(status: StatusCode, message: &'static str, value: V) -> Payload<V>
where
    V: Serialize,
{
    Ok(Reply::new(status, Some(message), value))
}

pub fn breaks<V>(err: Error) -> Payload<V> {
    Err(err)
}

/// Empty payload for replies that only carry a message.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Done {}

#[derive(Debug, Clone, Serialize)]
pub struct Success<V> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(flatten)]
    value: V,
}

#[derive(Debug, Clone)]
pub struct Reply<V> {
    status: StatusCode,
    body: Success<V>,
}

impl<V: Serialize> Reply<V> {
    pub fn new(status: StatusCode, message: Option<&'static str>, value: V) -> Self {
        Self {
            status,
            body: Success {
                success: true,
                message,
                value,
            },
        }
    }
}

impl<V> IntoResponse for Reply<V>
where
    V: Serialize,
{
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "error")]
pub enum Error {
    InvalidPayload { message: String },
    EmptyField { message: String },
    ScoreOutOfRange { message: String },
    Conflict { message: String },
    NotFound { message: String },
    Unauthorized { message: String },
    Forbidden { message: String },
    Timeout { message: String },
    InternalError { kind: &'static str, message: String },
}

impl Error {
    pub fn empty<S: Into<String>>(msg: S) -> Error {
        Error::EmptyField {
            message: msg.into(),
        }
    }

    pub fn conflict<S: Into<String>>(msg: S) -> Error {
        Error::Conflict {
            message: msg.into(),
        }
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Error {
        Error::NotFound {
            message: msg.into(),
        }
    }

    pub fn unauthorized<S: Into<String>>(msg: S) -> Error {
        Error::Unauthorized {
            message: msg.into(),
        }
    }

    pub fn forbidden<S: Into<String>>(msg: S) -> Error {
        Error::Forbidden {
            message: msg.into(),
        }
    }

    pub fn internal(kind: &'static str) -> Error {
        Error::InternalError {
            kind,
            message: "Internal Server Error".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidPayload { .. }
            | Error::EmptyField { .. }
            | Error::ScoreOutOfRange { .. } => StatusCode::BAD_REQUEST,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            Error::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Maps failures of the request timeout layer.
pub async fn handle_timeout(err: BoxError) -> Error {
    if err.is::<tower::timeout::error::Elapsed>() {
        Error::Timeout {
            message: "Request timed out".to_string(),
        }
    } else {
        log::error!("unhandled middleware error: {}", err);
        Error::internal("MiddlewareError")
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        log::error!("database error: {:?}", err);
        Error::internal("DatabaseError")
    }
}

impl From<pbkdf2::password_hash::Error> for Error {
    fn from(err: pbkdf2::password_hash::Error) -> Self {
        log::error!("password hashing error: {}", err);
        Error::internal("HashError")
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        log::error!("token signing error: {}", err);
        Error::internal("TokenError")
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidPayload {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidPayload {
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_maps_to_its_status() {
        assert_eq!(Error::empty("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(Error::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(Error::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            Error::internal("DatabaseError").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn errors_serialize_with_kind_and_message() {
        let json = serde_json::to_value(Error::conflict("Class already exists")).unwrap();
        assert_eq!(json["error"], "Conflict");
        assert_eq!(json["message"], "Class already exists");
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = Error::from(sqlx::Error::RowNotFound);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "DatabaseError");
        assert_eq!(json["message"], "Internal Server Error");
    }

    #[test]
    fn success_envelope_flattens_payload() {
        #[derive(Serialize)]
        struct Created {
            id: i32,
        }

        let reply = Reply::new(StatusCode::CREATED, Some("Success create class!"), Created { id: 4 });
        let json = serde_json::to_value(&reply.body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Success create class!");
        assert_eq!(json["id"], 4);

        let plain = serde_json::to_value(Reply::new(StatusCode::OK, None, Done {}).body).unwrap();
        assert!(plain.get("message").is_none());
    }
}
