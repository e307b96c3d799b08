//! Asset-version negotiation for page-data requests.

use axum::http::Method;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation {
    /// Serve the request normally
    Proceed,
    /// The client's assets are stale; it must reload `location` as a full page
    Conflict { location: String },
}

/// What the negotiator needs to know about an incoming request
#[derive(Debug, Clone, Copy)]
pub struct VersionCheck<'a> {
    pub method: &'a Method,
    pub is_inertia: bool,
    /// `X-Inertia-Version` as sent; a missing header counts as the empty version
    pub client_version: Option<&'a str>,
    /// Absolute URL of the request, echoed back on conflict
    pub location: &'a str,
}

/// Decide whether a request can be answered in place.
///
/// Only GET page-data requests can conflict. Other methods proceed even with a
/// stale version; the GET that follows their redirect is checked instead.
pub fn negotiate(check: VersionCheck<'_>, server_version: &str) -> Negotiation {
    if !check.is_inertia || check.method != Method::GET {
        return Negotiation::Proceed;
    }

    let client_version = check.client_version.unwrap_or_default();
    if client_version == server_version {
        return Negotiation::Proceed;
    }

    debug!(
        client_version = %client_version,
        server_version = %server_version,
        location = %check.location,
        "Asset version mismatch"
    );
    Negotiation::Conflict {
        location: check.location.to_string(),
    }
}

/// Resolve a request path against the application's public base URL
pub fn absolute_location(base_url: &str, path_and_query: &str) -> String {
    match Url::parse(base_url).and_then(|base| base.join(path_and_query)) {
        Ok(url) => url.to_string(),
        Err(e) => {
            warn!(base_url = %base_url, error = %e, "Invalid base url, using relative location");
            path_and_query.to_string()
        }
    }
}
