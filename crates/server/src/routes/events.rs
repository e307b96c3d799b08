//! Demo event pages exercising full, partial and stale-version visits.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use services::services::{
    props::{Prop, Props},
    props_validator::{ValidationResult, validate},
    schema::PropsSchema,
};
use ts_rs::TS;

use crate::{
    error::ApiError,
    inertia::{Inertia, InertiaResponse},
    state::AppState,
};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Event {
    pub id: u64,
    pub title: String,
    pub starts_at: String,
    pub description: Option<String>,
}

impl Event {
    pub fn seed() -> Vec<Event> {
        vec![
            Event {
                id: 1,
                title: "Rust meetup".to_string(),
                starts_at: "2026-11-05T18:30:00Z".to_string(),
                description: Some("Lightning talks and pizza".to_string()),
            },
            Event {
                id: 2,
                title: "Async workshop".to_string(),
                starts_at: "2026-11-12T09:00:00Z".to_string(),
                description: None,
            },
            Event {
                id: 80,
                title: "Year-end party".to_string(),
                starts_at: "2026-12-18T19:00:00Z".to_string(),
                description: None,
            },
        ]
    }
}

/// Body of the create and update forms
#[derive(Debug, Deserialize, JsonSchema)]
pub struct EventForm {
    #[schemars(length(min = 1, max = 120))]
    pub title: String,
    #[schemars(length(min = 1))]
    pub starts_at: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub search: Option<String>,
}

fn redirect(to: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, to.to_string())]).into_response()
}

/// Validate a submitted form; failures are flashed back as `errors`
async fn validated_form(inertia: &Inertia, body: &Value) -> Result<Option<EventForm>, ApiError> {
    match validate::<EventForm>(&PropsSchema::of::<EventForm>()?, body) {
        ValidationResult::Valid(form) => Ok(Some(form)),
        ValidationResult::Invalid(err) => {
            inertia
                .flash("errors", serde_json::to_value(&err.errors)?)
                .await?;
            Ok(None)
        }
    }
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
    inertia: Inertia,
) -> Result<InertiaResponse, ApiError> {
    let events: Vec<Event> = {
        let events = state.events.read().await;
        match &query.search {
            Some(search) => {
                let needle = search.to_lowercase();
                events
                    .iter()
                    .filter(|event| event.title.to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            }
            None => events.clone(),
        }
    };

    let total = events.len();
    let props = Props::new()
        .with("events", serde_json::to_value(&events)?)
        .with("filters", json!({ "search": query.search }))
        .with("stats", Prop::optional(move || json!({ "total": total })));

    inertia.render("Events/Index", props).await
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    inertia: Inertia,
) -> Result<InertiaResponse, ApiError> {
    let event = state
        .events
        .read()
        .await
        .iter()
        .find(|event| event.id == id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("event {id}")))?;

    let props = Props::new().with("event", serde_json::to_value(&event)?);
    inertia.render("Events/Show", props).await
}

pub async fn create(inertia: Inertia) -> Result<InertiaResponse, ApiError> {
    inertia.render("Events/Create", Props::new()).await
}

pub async fn store(
    State(state): State<AppState>,
    inertia: Inertia,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let Some(form) = validated_form(&inertia, &body).await? else {
        return Ok(redirect("/events/create"));
    };

    let id = {
        let mut events = state.events.write().await;
        let id = events.iter().map(|event| event.id).max().unwrap_or(0) + 1;
        events.push(Event {
            id,
            title: form.title,
            starts_at: form.starts_at,
            description: form.description,
        });
        id
    };

    inertia.flash("success", json!("Event created")).await?;
    Ok(redirect(&format!("/events/{id}")))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    inertia: Inertia,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let Some(form) = validated_form(&inertia, &body).await? else {
        return Ok(redirect(&format!("/events/{id}")));
    };

    {
        let mut events = state.events.write().await;
        let event = events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("event {id}")))?;
        event.title = form.title;
        event.starts_at = form.starts_at;
        event.description = form.description;
    }

    inertia.flash("success", json!("Event updated")).await?;
    Ok(redirect(&format!("/events/{id}")))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    inertia: Inertia,
) -> Result<Response, ApiError> {
    {
        let mut events = state.events.write().await;
        let before = events.len();
        events.retain(|event| event.id != id);
        if events.len() == before {
            return Err(ApiError::NotFound(format!("event {id}")));
        }
    }

    inertia.flash("success", json!("Event deleted")).await?;
    Ok(redirect("/events"))
}

/// Stand-in for an authenticated area; always bounces to the login page
pub async fn dashboard() -> Response {
    redirect("/login")
}

pub async fn login(inertia: Inertia) -> Result<InertiaResponse, ApiError> {
    let props = Props::new().with("canResetPassword", json!(true));
    inertia.render("Auth/Login", props).await
}

/// External documentation, reached with a full-page visit
pub async fn docs(inertia: Inertia) -> InertiaResponse {
    inertia.location("https://inertiajs.com/the-protocol")
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(index).post(store))
        .route("/events/create", get(create))
        .route("/events/{id}", get(show).put(update).delete(destroy))
        .route("/dashboard", get(dashboard))
        .route("/login", get(login))
        .route("/docs", get(docs))
}
