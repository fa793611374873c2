use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::categories::CategoryError;
use crate::application::editor::EditorError;
use crate::application::error::ErrorReport;
use crate::application::posts::PostAdminError;
use crate::application::repos::RepoError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const NOT_FOUND: &str = "not_found";
    pub const DUPLICATE: &str = "duplicate";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const INVALID_CATEGORIES: &str = "invalid_categories";
    pub const REPO: &str = "repo_error";
    pub const UNAVAILABLE: &str = "unavailable";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }

    pub fn from_repo(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::not_found("Resource not found"),
            RepoError::Duplicate { constraint } => Self::new(
                StatusCode::CONFLICT,
                codes::DUPLICATE,
                "Duplicate record",
                Some(constraint),
            ),
            RepoError::InvalidInput { message } => Self::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_INPUT,
                "Invalid input",
                Some(message),
            ),
            RepoError::Persistence(message) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::REPO,
                "Persistence error",
                Some(message),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let hint = self.hint.clone();
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message(
            "infra::http::api",
            self.status,
            format!("{}: {}", self.code, hint.as_deref().unwrap_or(self.message)),
        )
        .attach(&mut response);
        response
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        Self::from_repo(err)
    }
}

impl From<PostAdminError> for ApiError {
    fn from(err: PostAdminError) -> Self {
        match err {
            PostAdminError::EmptyField(field) => {
                ApiError::bad_request("Missing required field", Some(field.to_string()))
            }
            PostAdminError::InvalidSlug { locale, slug } => {
                ApiError::bad_request("Invalid slug", Some(format!("{locale}: `{slug}`")))
            }
            PostAdminError::DuplicateLocale(locale) => {
                ApiError::bad_request("Duplicate locale", Some(locale))
            }
            PostAdminError::UnknownCategories(slugs) => ApiError::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_CATEGORIES,
                "Unknown categories",
                Some(slugs.join(", ")),
            ),
            PostAdminError::Domain(err) => {
                ApiError::bad_request("Invalid document", Some(err.to_string()))
            }
            PostAdminError::Repo(err) => ApiError::from_repo(err),
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::EmptyField(field) => {
                ApiError::bad_request("Missing required field", Some(field.to_string()))
            }
            CategoryError::InvalidSlug(slug) => {
                ApiError::bad_request("Invalid category slug", Some(slug))
            }
            CategoryError::Duplicate(slug) => ApiError::new(
                StatusCode::CONFLICT,
                codes::DUPLICATE,
                "Category already exists",
                Some(slug),
            ),
            CategoryError::NotFound => ApiError::not_found("Category not found"),
            CategoryError::Repo(err) => ApiError::from_repo(err),
        }
    }
}

impl From<EditorError> for ApiError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::Parse { message } => {
                ApiError::bad_request("Invalid HTML fragment", Some(message))
            }
        }
    }
}
