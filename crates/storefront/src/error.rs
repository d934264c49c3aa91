//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::views::ProductGridView;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// The catalog is still loading.
    #[error("Catalog still loading")]
    Loading,

    /// The catalog failed to load; nothing is interactive.
    #[error("Catalog unavailable")]
    CatalogUnavailable,

    /// Template rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Render(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Loading | Self::CatalogUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Phase placeholders are HTML so HTMX can swap them in directly
        match &self {
            Self::Loading => (
                status,
                Html(placeholder("loading", ProductGridView::LOADING_MESSAGE)),
            )
                .into_response(),
            Self::CatalogUnavailable => (
                status,
                Html(placeholder("error", ProductGridView::FAILED_MESSAGE)),
            )
                .into_response(),
            // Don't expose internal error details to clients
            Self::Render(_) => (status, "Internal server error".to_string()).into_response(),
            Self::NotFound(_) | Self::BadRequest(_) => (status, self.to_string()).into_response(),
        }
    }
}

fn placeholder(class: &str, message: &str) -> String {
    format!("<div class=\"{class}\">{message}</div>")
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "add_to_cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
