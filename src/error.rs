//! Error types shared by the store, the handlers and the middleware.

use std::fmt;

use iron::status::{self, Status};
use iron::{IronError, Response};
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// `sort`/`direction` were both given but one of them is not recognised.
    #[error("Wrong sort or direction value")]
    InvalidSort,

    #[error("Malformed post body: {0}")]
    MalformedBody(String),

    #[error("Post with id= {0} not found")]
    PostNotFound(u64),

    /// The path segment in place of the id is not an integer.
    #[error("Post with id= {0} not found")]
    UnknownPostId(String),

    #[error("No search term given")]
    NoSearchTerm,

    /// No route matches the request path and method.
    #[error("Not Found")]
    RouteNotFound,

    #[error("Rate limit exceeded: {limit} per {window}")]
    RateLimited { limit: usize, window: Window },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Length of a rate-limit window, rendered the way clients see it in 429 bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window(pub i64);

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            60 => write!(f, "1 minute"),
            1 => write!(f, "1 second"),
            secs if secs % 60 == 0 => write!(f, "{} minutes", secs / 60),
            secs => write!(f, "{} seconds", secs),
        }
    }
}

/// `{"message": ...}` body used for errors and confirmations.
#[derive(Serialize)]
pub(crate) struct Message<'a> {
    pub message: &'a str,
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::InvalidSort | ApiError::MalformedBody(_) => status::BadRequest,
            ApiError::PostNotFound(_)
            | ApiError::UnknownPostId(_)
            | ApiError::NoSearchTerm
            | ApiError::RouteNotFound => status::NotFound,
            ApiError::RateLimited { .. } => status::TooManyRequests,
            ApiError::Internal(_) => status::InternalServerError,
        }
    }

    /// JSON body sent to the client.
    pub fn body(&self) -> String {
        if let ApiError::NoSearchTerm = self {
            return "[]".to_string();
        }
        let text = self.to_string();
        serde_json::to_string(&Message { message: &text })
            .unwrap_or_else(|_| r#"{"message":"Internal error"}"#.to_string())
    }

    pub fn response(&self) -> Response {
        Response::with((self.status(), self.body()))
    }
}

impl From<ApiError> for IronError {
    fn from(err: ApiError) -> IronError {
        let modifier = (err.status(), err.body());
        IronError::new(err, modifier)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> ApiError {
        ApiError::Internal(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_matches_api_contract() {
        let err = ApiError::PostNotFound(7);
        assert_eq!(err.status(), status::NotFound);
        assert_eq!(err.body(), r#"{"message":"Post with id= 7 not found"}"#);
    }

    #[test]
    fn invalid_sort_is_bad_request() {
        let err = ApiError::InvalidSort;
        assert_eq!(err.status(), status::BadRequest);
        assert_eq!(err.body(), r#"{"message":"Wrong sort or direction value"}"#);
    }

    #[test]
    fn missing_search_term_renders_empty_array() {
        assert_eq!(ApiError::NoSearchTerm.status(), status::NotFound);
        assert_eq!(ApiError::NoSearchTerm.body(), "[]");
    }

    #[test]
    fn route_miss_has_message_body() {
        assert_eq!(ApiError::RouteNotFound.status(), status::NotFound);
        assert_eq!(ApiError::RouteNotFound.body(), r#"{"message":"Not Found"}"#);
    }

    #[test]
    fn rate_limit_message_names_the_window() {
        let err = ApiError::RateLimited {
            limit: 100,
            window: Window(60),
        };
        assert_eq!(err.status(), status::TooManyRequests);
        assert_eq!(err.to_string(), "Rate limit exceeded: 100 per 1 minute");
        assert_eq!(Window(120).to_string(), "2 minutes");
        assert_eq!(Window(45).to_string(), "45 seconds");
    }
}
