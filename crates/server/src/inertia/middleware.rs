use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::Response,
};
use protocol::headers::{X_INERTIA, X_INERTIA_VERSION};
use services::services::version::{Negotiation, VersionCheck, absolute_location, negotiate};
use tracing::info;

use super::{
    InertiaState,
    request::{header_str, is_inertia_request, path_and_query},
    response::conflict,
};

/// Version check in front of every page handler.
///
/// A stale GET page-data request is answered with 409 before any handler runs.
/// On the way out, every response gets `Vary: X-Inertia`, and a 302 answering an
/// XHR PUT/PATCH/DELETE becomes a 303 so the follow-up visit is a GET.
pub async fn version_middleware(
    State(state): State<InertiaState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let is_inertia = is_inertia_request(request.headers());

    if is_inertia {
        let location = absolute_location(&state.config.app_url, &path_and_query(request.uri()));
        let check = VersionCheck {
            method: &method,
            is_inertia,
            client_version: header_str(request.headers(), X_INERTIA_VERSION),
            location: &location,
        };

        if let Negotiation::Conflict { location } = negotiate(check, &state.config.version) {
            info!(
                method = %method,
                location = %location,
                "Stale asset version, forcing full page reload"
            );
            return with_vary(conflict(&location));
        }
    }

    let mut response = next.run(request).await;

    if is_inertia
        && response.status() == StatusCode::FOUND
        && [Method::PUT, Method::PATCH, Method::DELETE].contains(&method)
    {
        *response.status_mut() = StatusCode::SEE_OTHER;
    }

    with_vary(response)
}

fn with_vary(mut response: Response) -> Response {
    let already = response
        .headers()
        .get_all(header::VARY)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|name| name.trim().eq_ignore_ascii_case(X_INERTIA));

    if !already {
        response
            .headers_mut()
            .append(header::VARY, HeaderValue::from_static(X_INERTIA));
    }
    response
}
