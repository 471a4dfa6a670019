use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Per-field validation messages, kept in the order the fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, Vec<String>)>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.0.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.0.push((field, vec![message])),
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|(name, _)| *name == field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First message, followed by how many others were collapsed.
    pub fn summary(&self) -> String {
        let mut all = self.0.iter().flat_map(|(_, messages)| messages.iter());
        let Some(first) = all.next() else {
            return "The given data was invalid.".to_string();
        };
        match all.count() {
            0 => first.clone(),
            1 => format!("{first} (and 1 more error)"),
            n => format!("{first} (and {n} more errors)"),
        }
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, messages) in &self.0 {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("post not found")]
    NotFound,
    #[error("{}", .0.summary())]
    Validation(FieldErrors),
    #[error("malformed request body: {0}")]
    MalformedPayload(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::MalformedPayload(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::NotFound => json!({ "message": "Not Found" }),
            ApiError::Validation(errors) => json!({
                "message": errors.summary(),
                "errors": errors,
            }),
            ApiError::MalformedPayload(reason) => json!({
                "message": reason,
                "errors": {},
            }),
            ApiError::Database(e) => {
                error!(error = %e, "Store query failed");
                json!({ "message": "Server Error" })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
