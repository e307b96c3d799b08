//! Header names used to negotiate page-data requests.
//!
//! Names are lowercase so they can be passed straight to `HeaderName::from_static`.

/// Marks a request as a page-data fetch, and a response as a page object
pub const X_INERTIA: &str = "x-inertia";
/// Client's last known asset version
pub const X_INERTIA_VERSION: &str = "x-inertia-version";
/// CSV of prop names requested by a partial reload
pub const X_INERTIA_PARTIAL_DATA: &str = "x-inertia-partial-data";
/// CSV of prop names a partial reload wants left out
pub const X_INERTIA_PARTIAL_EXCEPT: &str = "x-inertia-partial-except";
/// Component currently mounted on the client; partial directives only apply to it
pub const X_INERTIA_PARTIAL_COMPONENT: &str = "x-inertia-partial-component";
/// URL the client must load with a full-page navigation after a 409
pub const X_INERTIA_LOCATION: &str = "x-inertia-location";
pub const X_REQUESTED_WITH: &str = "x-requested-with";

/// Split a CSV header value into trimmed, non-empty prop names
pub fn parse_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_csv(names: &[String]) -> String {
    names.join(",")
}
