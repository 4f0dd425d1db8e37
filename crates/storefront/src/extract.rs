//! Request extractors with JSON error bodies.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body whose decode failures answer with an [`AppError`]
/// body instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
            JsonRejection::JsonSyntaxError(err) => {
                format!("Invalid JSON syntax: {}", err.body_text())
            }
            JsonRejection::MissingJsonContentType(_) => {
                "Expected a request with Content-Type: application/json".to_string()
            }
            _ => "Failed to parse JSON body".to_string(),
        };
        Self::BadRequest(message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use axum::response::IntoResponse;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[allow(dead_code)]
        name: String,
    }

    async fn extract(content_type: &str, body: &'static str) -> Result<AppJson<Form>, AppError> {
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        AppJson::<Form>::from_request(request, &()).await
    }

    #[tokio::test]
    async fn test_valid_body() {
        assert!(extract("application/json", r#"{"name":"Signia"}"#).await.is_ok());
    }

    #[tokio::test]
    async fn test_syntax_error_is_bad_request() {
        let err = extract("application/json", "{not json").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg.starts_with("Invalid JSON syntax")));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_shape_and_content_type_are_bad_requests() {
        let err = extract("application/json", r#"{"name": 5}"#).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg.starts_with("Invalid JSON data")));

        let err = extract("text/plain", r#"{"name":"Signia"}"#).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
