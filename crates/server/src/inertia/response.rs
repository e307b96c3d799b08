use axum::{
    Json,
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use protocol::{
    PageObject,
    headers::{X_INERTIA, X_INERTIA_LOCATION},
};
use tracing::error;

use super::template::RootTemplate;
use crate::error::ApiError;

#[derive(Debug)]
pub enum InertiaResponse {
    /// Page object for an XHR visit
    Json(PageObject),
    /// Full document for a first load
    Html {
        page: PageObject,
        template: RootTemplate,
    },
    /// Full-page visit to `url`: 409 for XHR visits, a plain redirect otherwise
    Location { url: String, is_inertia: bool },
}

/// Response to a stale or external location visit
pub fn conflict(location: &str) -> Response {
    (StatusCode::CONFLICT, [(X_INERTIA_LOCATION, location.to_string())]).into_response()
}

impl IntoResponse for InertiaResponse {
    fn into_response(self) -> Response {
        match self {
            InertiaResponse::Json(page) => (
                StatusCode::OK,
                [
                    (HeaderName::from_static(X_INERTIA), HeaderValue::from_static("true")),
                    (header::VARY, HeaderValue::from_static(X_INERTIA)),
                ],
                Json(page),
            )
                .into_response(),
            InertiaResponse::Html { page, template } => match template.render(&page) {
                Ok(html) => (
                    StatusCode::OK,
                    [(header::VARY, X_INERTIA)],
                    Html(html),
                )
                    .into_response(),
                Err(e) => {
                    error!(component = %page.component, error = %e, "Failed to render root template");
                    ApiError::from(e).into_response()
                }
            },
            InertiaResponse::Location { url, is_inertia } => {
                if is_inertia {
                    conflict(&url)
                } else {
                    (StatusCode::FOUND, [(header::LOCATION, url)]).into_response()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{Map, Value, json};

    use super::*;

    fn page() -> PageObject {
        let mut props = Map::new();
        props.insert("events".to_string(), json!([]));
        PageObject::new("Events/Index", props, "/events", "c32b8e4965f418ad")
    }

    #[tokio::test]
    async fn test_json_response_headers_and_body() {
        let response = InertiaResponse::Json(page()).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[X_INERTIA], "true");
        assert_eq!(headers[header::VARY], X_INERTIA);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["component"], "Events/Index");
        assert_eq!(value["version"], "c32b8e4965f418ad");
    }

    #[tokio::test]
    async fn test_html_response_embeds_page() {
        let response = InertiaResponse::Html {
            page: page(),
            template: RootTemplate::default(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(X_INERTIA).is_none());

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        let embedded = utils::html::extract_data_page(&html).unwrap();
        assert_eq!(serde_json::from_str::<PageObject>(&embedded).unwrap(), page());
    }

    #[tokio::test]
    async fn test_location_visits() {
        let response = InertiaResponse::Location {
            url: "https://example.org/docs".to_string(),
            is_inertia: true,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(response.headers()[X_INERTIA_LOCATION], "https://example.org/docs");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());

        let response = InertiaResponse::Location {
            url: "https://example.org/docs".to_string(),
            is_inertia: false,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://example.org/docs");
    }
}
