use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by the extraction pipeline.
///
/// Callers branch on the variant, never on message text: `UnsupportedSite`
/// and `NoRecipeFound` trigger the next strategy in the pipeline, everything
/// else is terminal for the request.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No scraper strategy is registered for the URL's domain
    #[error("no scraper strategy registered for this site")]
    UnsupportedSite,

    /// A strategy matched the site but scraping itself failed
    #[error("site scraper failed: {0}")]
    ExtractionFailed(String),

    /// The heuristic DOM extractor found no recipe content
    #[error("no recipe content found in page markup")]
    NoRecipeFound,

    /// Fetching the page failed (connection error or non-2xx status)
    #[error("failed to fetch URL: {0}")]
    Network(#[from] reqwest::Error),

    /// The language model endpoint could not be reached or answered garbage
    #[error("language model unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The language model did not answer within the configured deadline
    #[error("language model call timed out after {0:?}")]
    TimedOut(Duration),

    /// Model output was neither valid JSON nor recoverable recipe text
    #[error("model output could not be parsed as a recipe")]
    MalformedOutput,
}

/// Errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            // A site/URL problem is the client's to fix; a degraded model
            // backend is ours.
            ApiError::Extraction(e) => match e {
                ExtractError::ExtractionFailed(_) | ExtractError::Network(_) => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Extraction(e) => match e {
                ExtractError::UpstreamUnavailable(_)
                | ExtractError::TimedOut(_)
                | ExtractError::MalformedOutput => format!("LLM processing failed: {e}"),
                _ => format!("Error extracting recipe: {e}"),
            },
            ApiError::Database(_) => "internal database error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            log::error!("request failed: {self}");
        }
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_failed_maps_to_client_error() {
        let err = ApiError::Extraction(ExtractError::ExtractionFailed("boom".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn degraded_model_maps_to_server_error() {
        for e in [
            ExtractError::UpstreamUnavailable("down".into()),
            ExtractError::TimedOut(Duration::from_secs(45)),
            ExtractError::MalformedOutput,
        ] {
            assert_eq!(ApiError::Extraction(e).status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn database_detail_is_not_leaked() {
        let err = ApiError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.detail(), "internal database error");
    }
}
