use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use super::dto::ErrorBody;
use crate::github::GithubError;

pub const LIST_FAILED: &str = "Failed to fetch discussions";
pub const DISCUSSION_FAILED: &str = "Failed to fetch discussion";

/// Every way a request can fail, each mapped to one HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("GitHub token not configured. Please set GITHUB_TOKEN environment variable.")]
    MissingToken,

    #[error("Discussion number is required")]
    MissingNumber,

    #[error("Discussion number must be a valid integer, got {0:?}")]
    InvalidNumber(String),

    #[error("No discussion found with number: {0}")]
    NotFound(i32),

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        status: StatusCode,
        #[source]
        source: GithubError,
    },

    #[error("Unknown error")]
    Internal,
}

impl ApiError {
    /// Upstream failure while listing: always a server error.
    pub fn listing(source: GithubError) -> Self {
        ApiError::Upstream {
            context: LIST_FAILED,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            source,
        }
    }

    /// Upstream failure while fetching one discussion. GraphQL-level errors
    /// are reported as 400 since GitHub uses them for unresolvable numbers.
    pub fn by_number(source: GithubError) -> Self {
        let status = match source {
            GithubError::GraphQl(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::Upstream {
            context: DISCUSSION_FAILED,
            status,
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingNumber | ApiError::InvalidNumber(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { status, .. } => *status,
            ApiError::MissingToken | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        let (error, message) = match self {
            ApiError::MissingToken => ("GitHub token not configured", self.to_string()),
            ApiError::MissingNumber | ApiError::InvalidNumber(_) => ("Invalid discussion number", self.to_string()),
            ApiError::NotFound(_) => ("Discussion not found", self.to_string()),
            ApiError::Upstream { context, source, .. } => (*context, source.to_string()),
            ApiError::Internal => ("Internal server error", self.to_string()),
        };
        ErrorBody {
            error: error.to_string(),
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
