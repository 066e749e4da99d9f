//! Response decoding shared by every command that talks to the admin API.
//!
//! Error bodies look like
//! `{ "message": "...", "errors": [{ "name": "password", "errors": ["..."] }] }`;
//! both keys are optional.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::FieldError;
use crate::http::{HttpError, RequestBuilder, Response};
use crate::messages::{MessageKey, MessageProvider};

/// Page of results as returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub results: Vec<T>,
    pub page_size: u32,
    pub current_page: u32,
    pub total_items: u64,
    #[serde(default)]
    pub next: Option<u32>,
    #[serde(default)]
    pub previous: Option<u32>,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            page_size: 0,
            current_page: 1,
            total_items: 0,
            next: None,
            previous: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("rejected with {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("server responded {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl SubmissionError {
    pub fn from_response(response: &Response) -> Self {
        let body: ErrorBody = response.json().unwrap_or_default();
        let message = body.message.or(body.error).unwrap_or_default();
        match response.status {
            400 | 422 if !body.errors.is_empty() => Self::Validation(body.errors),
            401 if message.is_empty() => Self::NotAuthenticated,
            status => Self::Rejected { status, message },
        }
    }

    /// Text for a banner or notification.
    pub fn user_message(&self, messages: &dyn MessageProvider) -> String {
        match self {
            Self::NotAuthenticated => messages.message(MessageKey::NotAuthenticated).into_owned(),
            Self::Validation(errors) => errors
                .iter()
                .filter_map(FieldError::first_message)
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Rejected { message, .. } if !message.is_empty() => message.clone(),
            Self::Rejected { .. } | Self::Decode(_) => {
                messages.message(MessageKey::ServerError).into_owned()
            }
            Self::Http(_) => messages.message(MessageKey::NetworkError).into_owned(),
        }
    }

    /// Errors to apply to a form; anything that is not field-specific lands
    /// on `fallback_field`.
    pub fn into_field_errors(
        self,
        fallback_field: &str,
        messages: &dyn MessageProvider,
    ) -> Vec<FieldError> {
        match self {
            Self::Validation(errors) => errors,
            other => vec![FieldError::new(fallback_field, other.user_message(messages))],
        }
    }
}

pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, SubmissionError> {
    let response = request.send().await?;
    if !response.is_success() {
        return Err(SubmissionError::from_response(&response));
    }
    response
        .json()
        .map_err(|e| SubmissionError::Decode(e.to_string()))
}

/// For endpoints whose success body is ignored.
pub async fn send_empty(request: RequestBuilder) -> Result<(), SubmissionError> {
    let response = request.send().await?;
    if response.is_success() {
        Ok(())
    } else {
        Err(SubmissionError::from_response(&response))
    }
}
