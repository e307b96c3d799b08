use axum::{extract::Request, middleware::Next, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "inertia_session";

/// Session identifier carried by the `inertia_session` cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn from_jar(jar: &CookieJar) -> Option<Self> {
        jar.get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
            .map(SessionId)
    }
}

/// Make sure every request has a session, issuing a cookie when it has none
pub async fn ensure_session(jar: CookieJar, mut request: Request, next: Next) -> impl IntoResponse {
    if let Some(session) = SessionId::from_jar(&jar) {
        request.extensions_mut().insert(session);
        return (jar, next.run(request).await);
    }

    let id = Uuid::new_v4().to_string();
    debug!(session = %id, "Starting new session");
    request.extensions_mut().insert(SessionId(id.clone()));

    let cookie = Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), next.run(request).await)
}
