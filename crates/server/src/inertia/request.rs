use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, Method, Uri, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use protocol::{
    PageObject, PartialReload,
    headers::{
        X_INERTIA, X_INERTIA_PARTIAL_COMPONENT, X_INERTIA_PARTIAL_DATA, X_INERTIA_PARTIAL_EXCEPT,
        X_INERTIA_VERSION, parse_csv,
    },
};
use serde_json::Value;
use services::services::props::{Prop, Props};
use tracing::debug;

use super::{InertiaState, response::InertiaResponse, session::SessionId};
use crate::error::ApiError;

/// Protocol headers of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InertiaRequest {
    pub method: Method,
    pub is_inertia: bool,
    pub version: Option<String>,
    pub partial: Option<PartialReload>,
    /// Path and query, as echoed in the page object's `url`
    pub url: String,
}

impl InertiaRequest {
    pub fn from_parts(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        let partial = header_str(headers, X_INERTIA_PARTIAL_COMPONENT).map(|component| {
            PartialReload {
                component: component.to_string(),
                only: header_str(headers, X_INERTIA_PARTIAL_DATA)
                    .map(parse_csv)
                    .unwrap_or_default(),
                except: header_str(headers, X_INERTIA_PARTIAL_EXCEPT)
                    .map(parse_csv)
                    .unwrap_or_default(),
            }
        });

        Self {
            method: method.clone(),
            is_inertia: is_inertia_request(headers),
            version: header_str(headers, X_INERTIA_VERSION).map(str::to_string),
            partial,
            url: path_and_query(uri),
        }
    }
}

pub fn is_inertia_request(headers: &HeaderMap) -> bool {
    header_str(headers, X_INERTIA).is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

pub fn path_and_query(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Handler-side entry point: render pages, flash data, issue location visits
pub struct Inertia {
    state: InertiaState,
    request: InertiaRequest,
    session: Option<SessionId>,
}

impl<S> FromRequestParts<S> for Inertia
where
    InertiaState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = match parts.extensions.get::<SessionId>() {
            Some(session) => Some(session.clone()),
            None => SessionId::from_jar(&CookieJar::from_headers(&parts.headers)),
        };

        Ok(Self {
            state: InertiaState::from_ref(state),
            request: InertiaRequest::from_parts(&parts.method, &parts.uri, &parts.headers),
            session,
        })
    }
}

impl Inertia {
    pub fn request(&self) -> &InertiaRequest {
        &self.request
    }

    /// Stage a flash value for the next page this session renders
    pub async fn flash(&self, key: &str, value: Value) -> Result<(), ApiError> {
        match &self.session {
            Some(session) => Ok(self.state.flash.flash(&session.0, key, value).await?),
            None => {
                debug!(key = %key, "No session, dropping flash value");
                Ok(())
            }
        }
    }

    /// Build the page object for `component` and pick the response format.
    ///
    /// Flash data is consumed here, so responses that never render keep it.
    pub async fn render(self, component: &str, props: Props) -> Result<InertiaResponse, ApiError> {
        let config = &self.state.config;
        let mut props = props.with_shared(&config.shared);

        let flash = match &self.session {
            Some(session) => self.state.flash.take(&session.0).await?,
            None => Default::default(),
        };
        props.insert("flash", Prop::always(Value::Object(flash)));

        let resolved = props.resolve(component, self.request.partial.as_ref());
        let page = PageObject::new(component, resolved, self.request.url, config.version.clone())
            .with_encrypt_history(config.encrypt_history);

        debug!(
            component = %page.component,
            url = %page.url,
            partial = self.request.partial.is_some(),
            props = page.props.len(),
            "Rendering page"
        );

        if self.request.is_inertia {
            Ok(InertiaResponse::Json(page))
        } else {
            Ok(InertiaResponse::Html {
                page,
                template: config.template.clone(),
            })
        }
    }

    /// Send the client to `url` with a full-page visit, e.g. an external site
    pub fn location(self, url: impl Into<String>) -> InertiaResponse {
        InertiaResponse::Location {
            url: url.into(),
            is_inertia: self.request.is_inertia,
        }
    }
}
