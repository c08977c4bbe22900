use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::models::common::ApiResponse;

pub type LeagueResult<T> = Result<T, LeagueError>;

/// Error taxonomy shared by the domain, storage and HTTP layers.
#[derive(Debug, thiserror::Error)]
pub enum LeagueError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{context}: {source}")]
    Internal {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl LeagueError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        LeagueError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        LeagueError::NotFound(message.into())
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        LeagueError::Duplicate(message.into())
    }

    /// Wraps a storage failure with the operation that was being attempted.
    ///
    /// ```ignore
    /// query.execute(&pool).await.map_err(LeagueError::storage("failed to insert match"))?;
    /// ```
    pub fn storage(context: &'static str) -> impl FnOnce(sqlx::Error) -> LeagueError {
        move |source| LeagueError::Internal {
            context: context.to_string(),
            source: Box::new(source),
        }
    }

    pub fn is_bad_request(&self) -> bool {
        matches!(self, LeagueError::BadRequest(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LeagueError::NotFound(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, LeagueError::Duplicate(_))
    }
}

impl ResponseError for LeagueError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeagueError::BadRequest(_) => StatusCode::BAD_REQUEST,
            LeagueError::NotFound(_) => StatusCode::NOT_FOUND,
            LeagueError::Duplicate(_) => StatusCode::CONFLICT,
            LeagueError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            LeagueError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            LeagueError::Internal { context, source } => {
                tracing::error!("Internal error: {}: {:?}", context, source);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(message))
    }
}
