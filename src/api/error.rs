use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use deadpool_redis::{redis::RedisError, CreatePoolError, PoolError};
use std::borrow::Cow;

/// Body of every error response: what went wrong and during which action.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ErrorBody {
    pub message: Cow<'static, str>,
    pub error_type: Cow<'static, str>,
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.error_type)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(ErrorBody),
    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorBody),
    #[error("Forbidden: {0}")]
    Forbidden(ErrorBody),
    #[error("Not Found: {0}")]
    NotFound(ErrorBody),
    #[error("Conflict: {0}")]
    Conflict(ErrorBody),
    #[error("Internal Server Error")]
    InternalServer,
}

/// The category line shown under an error message, e.g. "Virhe elokuvan lisäämisessä".
///
/// Services keep one per action and build their errors through it so that
/// every failure of that action is reported under the same heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorType(pub &'static str);

impl ErrorType {
    fn body(self, message: impl Into<Cow<'static, str>>) -> ErrorBody {
        ErrorBody { message: message.into(), error_type: Cow::Borrowed(self.0) }
    }

    pub fn bad_request(self, message: impl Into<Cow<'static, str>>) -> SystemError {
        SystemError::BadRequest(self.body(message))
    }

    pub fn unauthorized(self, message: impl Into<Cow<'static, str>>) -> SystemError {
        SystemError::Unauthorized(self.body(message))
    }

    pub fn forbidden(self, message: impl Into<Cow<'static, str>>) -> SystemError {
        SystemError::Forbidden(self.body(message))
    }

    pub fn not_found(self, message: impl Into<Cow<'static, str>>) -> SystemError {
        SystemError::NotFound(self.body(message))
    }

    pub fn conflict(self, message: impl Into<Cow<'static, str>>) -> SystemError {
        SystemError::Integrity(self.body(message))
    }
}

impl Error {
    pub fn bad_request(
        message: impl Into<Cow<'static, str>>,
        error_type: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::BadRequest(ErrorBody { message: message.into(), error_type: error_type.into() })
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            Error::BadRequest(body)
            | Error::Unauthorized(body)
            | Error::Forbidden(body)
            | Error::NotFound(body)
            | Error::Conflict(body) => body.clone(),
            Error::InternalServer => ErrorBody {
                message: "Palvelussa tapahtui virhe".into(),
                error_type: "Sisäinen virhe".into(),
            },
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    // jwt errors
    #[error("JWT Error")]
    JwtError(#[from] jsonwebtoken::errors::Error),
    // argon2 errors
    #[error("Hash Error")]
    HashError(#[from] argon2::password_hash::Error),
    // sqlx errors
    #[error("Database Error : {0}")]
    DatabaseError(Cow<'static, str>),
    #[error("Migration Error")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    // serde errors
    #[error("JSON Serialization/Deserialization Error")]
    JsonError(#[from] serde_json::Error),
    // redis errors
    #[error(transparent)]
    PoolInit(#[from] CreatePoolError),
    #[error("Redis pool error: {0}")]
    PoolGet(#[from] PoolError),
    #[error("Redis error")]
    RedisError(#[from] RedisError),
    // User facing errors
    #[error("Bad Request: {0}")]
    BadRequest(ErrorBody),
    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorBody),
    #[error("Forbidden: {0}")]
    Forbidden(ErrorBody),
    #[error("Not Found: {0}")]
    NotFound(ErrorBody),
    #[error("Integrity: {0}")]
    Integrity(ErrorBody),
    #[error("Database Conflict: {0:?}")]
    Conflict(Option<DbErrorMeta>),
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

fn conflict_message(meta: &Option<DbErrorMeta>) -> Cow<'static, str> {
    let Some(m) = meta else {
        return "Arvo on jo käytössä".into();
    };
    log::warn!("Unique violation (code {:?}): {}", m.code, m.message);

    let Some(constraint) = &m.constraint else {
        return "Arvo on jo käytössä".into();
    };

    // Postgres names unique constraints <table>_<column>_key
    let field = constraint.trim_end_matches("_key").split('_').next_back().unwrap_or("arvo");

    format!("Arvo kentälle {field} on jo käytössä").into()
}

#[derive(Debug)]
pub struct DbErrorMeta {
    pub code: Option<String>,
    pub constraint: Option<String>,
    pub message: String,
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::BadRequest(body) => Error::BadRequest(body),
            SystemError::Unauthorized(body) => Error::Unauthorized(body),
            SystemError::Forbidden(body) => Error::Forbidden(body),
            SystemError::NotFound(body) => Error::NotFound(body),
            SystemError::Integrity(body) => Error::Conflict(body),
            SystemError::Conflict(meta) => Error::Conflict(ErrorBody {
                message: conflict_message(&meta),
                error_type: "Virhe tietojen tallentamisessa".into(),
            }),
            _ => {
                log::error!("Internal Server Error: {:?}", value);
                Error::InternalServer
            }
        }
    }
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => {
                    return SystemError::Conflict(Some(DbErrorMeta {
                        code: db_err.code().map(|s| s.to_string()),
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }));
                }
                _ => {
                    log::error!("Unhandled DB error: {:?}", db_err);
                    return SystemError::DatabaseError(db_err.message().to_string().into());
                }
            }
        }
        log::error!("{:?}", err);
        SystemError::InternalError(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATEGORY: ErrorType = ErrorType("Virhe elokuvan lisäämisessä");

    #[test]
    fn error_type_keeps_message_and_category() {
        let err: Error = CATEGORY.bad_request("Virheellinen elokuvan nimi").into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.body(),
            ErrorBody {
                message: "Virheellinen elokuvan nimi".into(),
                error_type: "Virhe elokuvan lisäämisessä".into(),
            }
        );
    }

    #[test]
    fn categories_map_to_status_codes() {
        let cases: Vec<(SystemError, StatusCode)> = vec![
            (CATEGORY.unauthorized("x"), StatusCode::UNAUTHORIZED),
            (CATEGORY.forbidden("x"), StatusCode::FORBIDDEN),
            (CATEGORY.not_found("x"), StatusCode::NOT_FOUND),
            (CATEGORY.conflict("x"), StatusCode::CONFLICT),
            (SystemError::DatabaseError("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (system, status) in cases {
            assert_eq!(Error::from(system).status_code(), status);
        }
    }

    #[test]
    fn conflict_message_names_the_column() {
        let meta = Some(DbErrorMeta {
            code: Some("23505".into()),
            constraint: Some("users_username_key".into()),
            message: "duplicate key".into(),
        });
        assert_eq!(conflict_message(&meta), "Arvo kentälle username on jo käytössä");
        assert_eq!(conflict_message(&None), "Arvo on jo käytössä");
    }
}
