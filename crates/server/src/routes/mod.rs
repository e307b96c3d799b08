use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::{
    inertia::{middleware::version_middleware, session::ensure_session},
    state::AppState,
};

pub mod events;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(events::router())
        .layer(middleware::from_fn_with_state(
            state.inertia.clone(),
            version_middleware,
        ))
        .layer(middleware::from_fn(ensure_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use protocol::headers::{
        X_INERTIA, X_INERTIA_LOCATION, X_INERTIA_PARTIAL_COMPONENT, X_INERTIA_PARTIAL_DATA,
        X_INERTIA_PARTIAL_EXCEPT, X_INERTIA_VERSION,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    const VERSION: &str = "c32b8e4965f418ad";
    const SESSION: &str = "inertia_session=test-session";

    fn app() -> Router {
        router(AppState::new(&Config::new("http://example.com", VERSION)))
    }

    fn xhr(method: Method, uri: &str, version: &str) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(X_INERTIA, "true")
            .header(X_INERTIA_VERSION, version)
            .header(header::COOKIE, SESSION)
    }

    fn json_body(value: Value) -> Body {
        Body::from(serde_json::to_vec(&value).unwrap())
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn prop_keys(page: &Value) -> Vec<String> {
        page["props"].as_object().unwrap().keys().cloned().collect()
    }

    #[tokio::test]
    async fn test_first_load_returns_html_document() {
        let app = app();
        let response = send(
            &app,
            Request::builder().uri("/events").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(X_INERTIA).is_none());
        assert_eq!(response.headers()[header::VARY], X_INERTIA);
        assert!(response.headers().get(header::SET_COOKIE).is_some());

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        let page: Value =
            serde_json::from_str(&utils::html::extract_data_page(&html).unwrap()).unwrap();
        assert_eq!(page["component"], "Events/Index");
        assert_eq!(page["url"], "/events");
        assert_eq!(page["version"], VERSION);
    }

    #[tokio::test]
    async fn test_matching_version_returns_page_object() {
        let app = app();
        let response = send(
            &app,
            xhr(Method::GET, "/events", VERSION).body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[X_INERTIA], "true");
        assert_eq!(response.headers()[header::VARY], X_INERTIA);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let page = body_json(response).await;
        assert_eq!(page["component"], "Events/Index");
        assert_eq!(page["url"], "/events");
        assert_eq!(page["version"], VERSION);
        assert_eq!(
            prop_keys(&page),
            vec!["appName", "events", "filters", "flash"]
        );
        assert_eq!(page["props"]["events"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_stale_version_get_conflicts() {
        let app = app();
        let response = send(
            &app,
            xhr(Method::GET, "/events/80", "d41d8cd98f00b204")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.headers()[X_INERTIA_LOCATION],
            "http://example.com/events/80"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_stale_version_non_get_is_not_a_conflict() {
        let app = app();

        let response = send(
            &app,
            xhr(Method::POST, "/events", "d41d8cd98f00b204")
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body(json!({"title": "Launch", "starts_at": "2027-01-01"})))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/events/81");

        let response = send(
            &app,
            xhr(Method::DELETE, "/events/1", "d41d8cd98f00b204")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_ne!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_put_patch_delete_redirects_become_see_other() {
        let app = app();

        let response = send(
            &app,
            xhr(Method::PUT, "/events/2", VERSION)
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body(json!({"title": "Async deep dive", "starts_at": "2026-11-12"})))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/events/2");

        let response = send(
            &app,
            xhr(Method::DELETE, "/events/2", VERSION)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/events");
    }

    #[tokio::test]
    async fn test_partial_reload_same_component() {
        let app = app();
        let response = send(
            &app,
            xhr(Method::GET, "/events", VERSION)
                .header(X_INERTIA_PARTIAL_COMPONENT, "Events/Index")
                .header(X_INERTIA_PARTIAL_DATA, "events,unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        let page = body_json(response).await;
        assert_eq!(prop_keys(&page), vec!["events", "flash"]);
    }

    #[tokio::test]
    async fn test_partial_reload_optional_and_except() {
        let app = app();
        let response = send(
            &app,
            xhr(Method::GET, "/events", VERSION)
                .header(X_INERTIA_PARTIAL_COMPONENT, "Events/Index")
                .header(X_INERTIA_PARTIAL_DATA, "stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        let page = body_json(response).await;
        assert_eq!(page["props"]["stats"], json!({"total": 3}));

        let response = send(
            &app,
            xhr(Method::GET, "/events", VERSION)
                .header(X_INERTIA_PARTIAL_COMPONENT, "Events/Index")
                .header(X_INERTIA_PARTIAL_EXCEPT, "events,appName")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        let page = body_json(response).await;
        assert_eq!(prop_keys(&page), vec!["filters", "flash"]);
    }

    #[tokio::test]
    async fn test_partial_reload_for_other_component_returns_full_props() {
        let app = app();
        let response = send(
            &app,
            xhr(Method::GET, "/login", VERSION)
                .header(X_INERTIA_PARTIAL_COMPONENT, "Events/Index")
                .header(X_INERTIA_PARTIAL_DATA, "events")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        let page = body_json(response).await;
        assert_eq!(page["component"], "Auth/Login");
        assert_eq!(
            prop_keys(&page),
            vec!["appName", "canResetPassword", "flash"]
        );
    }

    #[tokio::test]
    async fn test_flash_survives_version_conflict() {
        let app = app();

        let response = send(
            &app,
            xhr(Method::POST, "/events", VERSION)
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body(json!({"title": "Launch", "starts_at": "2027-01-01"})))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FOUND);

        // Assets changed between the POST and the follow-up GET.
        let response = send(
            &app,
            xhr(Method::GET, "/events/81", "d41d8cd98f00b204")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(
            &app,
            Request::builder()
                .uri("/events/81")
                .header(header::COOKIE, SESSION)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        let page: Value =
            serde_json::from_str(&utils::html::extract_data_page(&html).unwrap()).unwrap();
        assert_eq!(page["props"]["flash"], json!({"success": "Event created"}));
        assert_eq!(page["props"]["event"]["title"], "Launch");

        let response = send(
            &app,
            xhr(Method::GET, "/events/81", VERSION).body(Body::empty()).unwrap(),
        )
        .await;
        let page = body_json(response).await;
        assert_eq!(page["props"]["flash"], json!({}));
    }

    #[tokio::test]
    async fn test_invalid_form_flashes_errors() {
        let app = app();
        let response = send(
            &app,
            xhr(Method::POST, "/events", VERSION)
                .header(header::CONTENT_TYPE, "application/json")
                .body(json_body(json!({"title": ""})))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/events/create");

        let response = send(
            &app,
            xhr(Method::GET, "/events/create", VERSION)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        let page = body_json(response).await;
        let errors = page["props"]["flash"]["errors"].as_object().unwrap();
        assert_eq!(
            errors.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["starts_at", "title"]
        );
        assert!(errors["starts_at"].as_str().unwrap().contains("required"));
        assert!(errors["title"].as_str().unwrap().contains("shorter than 1 character"));
    }

    #[tokio::test]
    async fn test_missing_event_is_not_found() {
        let app = app();
        let response = send(
            &app,
            xhr(Method::GET, "/events/999", VERSION)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "event 999 not found");
    }

    #[tokio::test]
    async fn test_external_location_visit() {
        let app = app();
        let response = send(
            &app,
            xhr(Method::GET, "/docs", VERSION).body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.headers()[X_INERTIA_LOCATION],
            "https://inertiajs.com/the-protocol"
        );
    }
}
