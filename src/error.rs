mod error_kind;

use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError, http::StatusCode};
use anyhow::anyhow;
use serde_json::json;
use std::fmt::{Debug, Display, Formatter};

pub use error_kind::ErrorKind;

/// Message returned for every authorization failure, regardless of which check failed.
pub const UNAUTHORIZED_MESSAGE: &str = "Authorization Not Valid.";

/// Message returned for input rejected by a database constraint. The database message itself names
/// tables and constraints and only goes to the logs.
const INVALID_INPUT_MESSAGE: &str = "Invalid reference or input value.";

/// Data Vault native error type.
#[derive(thiserror::Error)]
pub struct Error {
    root_cause: anyhow::Error,
    kind: ErrorKind,
}

impl Error {
    /// Creates a Client error instance with the given root cause.
    pub fn client_with_root_cause(root_cause: anyhow::Error) -> Self {
        Self {
            root_cause,
            kind: ErrorKind::ClientError,
        }
    }

    /// Creates a Client error instance with the given message.
    pub fn client<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self {
            root_cause: anyhow!(message),
            kind: ErrorKind::ClientError,
        }
    }

    /// Creates an authorization failure that never reveals which check failed.
    pub fn unauthorized() -> Self {
        Self {
            root_cause: anyhow!(UNAUTHORIZED_MESSAGE),
            kind: ErrorKind::Unauthorized,
        }
    }

    /// Creates a Not Found error instance with the given message.
    pub fn not_found<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self {
            root_cause: anyhow!(message),
            kind: ErrorKind::NotFound,
        }
    }

    /// Creates an Already Exists error instance with the given message.
    pub fn already_exists<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self {
            root_cause: anyhow!(message),
            kind: ErrorKind::AlreadyExists,
        }
    }

    /// Kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.root_cause, f)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.root_cause, f)
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::ClientError => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AlreadyExists => StatusCode::CONFLICT,
            ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponseBuilder::new(self.status_code()).json(json!({
            "message": match self.kind {
                ErrorKind::ClientError | ErrorKind::NotFound => self.root_cause.to_string(),
                ErrorKind::Unauthorized => UNAUTHORIZED_MESSAGE.to_string(),
                ErrorKind::AlreadyExists => "Resource already exists.".to_string(),
                ErrorKind::Unknown => "Internal Server Error".to_string(),
            }
        }))
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        err.downcast::<Error>().unwrap_or_else(|root_cause| {
            let kind = match root_cause.downcast_ref::<sqlx::Error>() {
                Some(sqlx::Error::Database(db_err)) => db_err
                    .code()
                    .and_then(|code| ErrorKind::from_database_code(&code)),
                _ => None,
            };

            match kind {
                Some(ErrorKind::ClientError) => Error {
                    root_cause: root_cause.context(INVALID_INPUT_MESSAGE),
                    kind: ErrorKind::ClientError,
                },
                kind => Error {
                    root_cause,
                    kind: kind.unwrap_or(ErrorKind::Unknown),
                },
            }
        })
    }
}
