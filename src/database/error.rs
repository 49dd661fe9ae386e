use std::fmt::{self, Display};

use warp::http::StatusCode;
use warp::reject::Reject;

/// Request-visible error taxonomy. `Storage` detail never reaches the
/// client; the rejection handler logs it and replies with an opaque body.
#[derive(Debug, Clone)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to put in the response body.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(info) | Self::NotFound(info) => info.clone(),
            Self::Storage(_) => String::from("internal error"),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(info) => write!(f, "validation error: {info}"),
            Self::NotFound(info) => write!(f, "not found: {info}"),
            Self::Storage(info) => write!(f, "storage error: {info}"),
        }
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}

pub struct QueryError {
    info: String,
}

impl QueryError {
    pub fn new(info: String) -> Self {
        Self { info }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::Configuration(e) => Self::new(format!("{e}")),
            sqlx::Error::Database(e) => Self::new(format!("{e}")),
            sqlx::Error::Io(e) => Self::new(format!("{e}")),
            sqlx::Error::Tls(e) => Self::new(format!("{e}")),
            sqlx::Error::Protocol(e) => Self::new(format!("{e}")),
            sqlx::Error::RowNotFound => Self::new(String::from("row not found")),
            sqlx::Error::TypeNotFound { type_name } => {
                Self::new(format!("type not found: {type_name}"))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => {
                Self::new(format!("column index out of bounds {index} ({len})"))
            }
            sqlx::Error::ColumnNotFound(e) => Self::new(format!("{e}")),
            sqlx::Error::ColumnDecode { index, source } => {
                Self::new(format!("column decode {index} ({source})"))
            }
            sqlx::Error::Decode(e) => Self::new(format!("{e}")),
            sqlx::Error::PoolTimedOut => Self::new(String::from("pool timed out")),
            sqlx::Error::PoolClosed => Self::new(String::from("pool closed")),
            sqlx::Error::WorkerCrashed => Self::new(String::from("worker crashed")),
            _ => Self::new(String::from("unknown error")),
        }
    }
}

impl Into<ApiError> for QueryError {
    fn into(self) -> ApiError {
        ApiError::Storage(self.info)
    }
}
