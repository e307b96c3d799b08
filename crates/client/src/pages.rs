//! Plain-text renderers for the demo pages, used by `inertia-visit`.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use services::services::{
    pages::PageRegistry,
    props_validator::{Retry, SchemaValidationError, wrap},
    schema::{PropsSchema, SchemaError},
};

#[derive(Debug, Deserialize, JsonSchema)]
struct EventSummary {
    #[schemars(range(min = 1))]
    id: u64,
    #[schemars(length(min = 1))]
    title: String,
    starts_at: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct EventsIndexProps {
    events: Vec<EventSummary>,
    #[serde(default)]
    stats: Option<Stats>,
    #[serde(default)]
    flash: Map<String, Value>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct Stats {
    total: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct EventShowProps {
    event: EventSummary,
    #[serde(default)]
    flash: Map<String, Value>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct LoginProps {
    #[serde(rename = "canResetPassword")]
    can_reset_password: bool,
}

fn flash_lines(flash: &Map<String, Value>) -> String {
    flash
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("\n[{key}] {s}"),
            other => format!("\n[{key}] {other}"),
        })
        .collect()
}

fn fallback<T>(
    component: &'static str,
) -> impl Fn(&SchemaValidationError, Retry<'_, T, String>) -> String {
    move |err: &SchemaValidationError, _retry: Retry<'_, T, String>| {
        let details: Vec<String> = err
            .errors
            .iter()
            .map(|(path, message)| format!("  {path}: {message}"))
            .collect();
        format!("{component}: invalid props\n{}", details.join("\n"))
    }
}

/// Renderers for every page the demo server serves
pub fn registry() -> Result<PageRegistry<String>, SchemaError> {
    let index = wrap(
        PropsSchema::of::<EventsIndexProps>()?,
        |props: EventsIndexProps| {
            let mut out = match props.stats {
                Some(stats) => format!("{} events ({} total)", props.events.len(), stats.total),
                None => format!("{} events", props.events.len()),
            };
            for event in &props.events {
                out.push_str(&format!("\n  #{} {} at {}", event.id, event.title, event.starts_at));
            }
            out.push_str(&flash_lines(&props.flash));
            out
        },
        fallback("Events/Index"),
    )
    .log_errors(true);

    let show = wrap(
        PropsSchema::of::<EventShowProps>()?,
        |props: EventShowProps| {
            format!(
                "#{} {} at {}{}",
                props.event.id,
                props.event.title,
                props.event.starts_at,
                flash_lines(&props.flash)
            )
        },
        fallback("Events/Show"),
    )
    .log_errors(true);

    let login = wrap(
        PropsSchema::of::<LoginProps>()?,
        |props: LoginProps| {
            if props.can_reset_password {
                "Log in (password reset available)".to_string()
            } else {
                "Log in".to_string()
            }
        },
        fallback("Auth/Login"),
    )
    .log_errors(true);

    Ok(PageRegistry::new()
        .register("Events/Index", index)
        .register("Events/Show", show)
        .register("Auth/Login", login))
}
