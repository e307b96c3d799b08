//! Page navigation over HTTP.
//!
//! A visit moves `Idle -> Requesting -> {Satisfied | VersionConflict | NetworkError} -> Idle`.
//! Only one visit is in flight per navigator, so responses are applied in the
//! order they arrive. Redirects are followed here rather than by the HTTP client,
//! so a 409 is judged by the method of the request that actually received it.

use std::time::Duration;

use protocol::{
    NavigationRequest, PageObject, VisitMethod,
    headers::{
        X_INERTIA, X_INERTIA_LOCATION, X_INERTIA_PARTIAL_COMPONENT, X_INERTIA_PARTIAL_DATA,
        X_INERTIA_PARTIAL_EXCEPT, X_INERTIA_VERSION, X_REQUESTED_WITH, join_csv,
    },
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header, redirect};
use strum_macros::Display;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::NavigationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum VisitPhase {
    Idle,
    Requesting,
    Satisfied,
    VersionConflict,
    NetworkError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    /// The page object was applied in place
    Satisfied,
    /// The server answered 409, for a stale asset version or a location visit.
    /// `location` was loaded as a full page and is now the current page.
    FullReload { location: String },
    /// The server sent the client to another site; the current page is unchanged
    External { location: String },
}

pub struct Navigator {
    http: Client,
    base_url: Url,
    page: Option<PageObject>,
    phase: VisitPhase,
}

impl Navigator {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    const MAX_REDIRECTS: usize = 10;

    pub fn new(base_url: &str) -> Result<Self, NavigationError> {
        let base_url = Url::parse(base_url).map_err(|source| NavigationError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .user_agent(concat!("inertia-visit/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            page: None,
            phase: VisitPhase::Idle,
        })
    }

    /// Resume from a page object the client already holds, e.g. from history state
    pub fn with_page(base_url: &str, page: PageObject) -> Result<Self, NavigationError> {
        let mut navigator = Self::new(base_url)?;
        navigator.page = Some(page);
        Ok(navigator)
    }

    pub fn page(&self) -> Option<&PageObject> {
        self.page.as_ref()
    }

    /// Last asset version the server declared
    pub fn version(&self) -> Option<&str> {
        self.page.as_ref().map(|page| page.version.as_str())
    }

    pub fn phase(&self) -> VisitPhase {
        self.phase
    }

    /// First load: fetch the HTML document and read the embedded page object
    pub async fn boot(&mut self, path: &str) -> Result<&PageObject, NavigationError> {
        let url = self.resolve(path)?;
        self.transition(VisitPhase::Requesting);

        match self.full_page_load(url).await {
            Ok(page) => {
                self.transition(VisitPhase::Satisfied);
                self.transition(VisitPhase::Idle);
                Ok(self.page.insert(page))
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    pub async fn visit(
        &mut self,
        request: NavigationRequest,
    ) -> Result<VisitOutcome, NavigationError> {
        let url = self.resolve(&request.url)?;
        self.transition(VisitPhase::Requesting);

        let result = self.run_visit(url, &request).await;
        if let Err(e) = &result {
            self.fail(e);
        }
        result
    }

    async fn run_visit(
        &mut self,
        url: Url,
        request: &NavigationRequest,
    ) -> Result<VisitOutcome, NavigationError> {
        // Partial directives are scoped to the component currently mounted.
        let partial_component = match (&self.page, request.is_partial()) {
            (Some(page), true) => Some(page.component.clone()),
            _ => None,
        };
        let version = self.version().map(str::to_string);

        let build = |builder: RequestBuilder, method: &Method| {
            let mut builder = builder
                .header(X_INERTIA, "true")
                .header(X_REQUESTED_WITH, "XMLHttpRequest")
                .header(header::ACCEPT, "text/html, application/xhtml+xml");
            if let Some(version) = &version {
                builder = builder.header(X_INERTIA_VERSION, version);
            }
            if let Some(component) = &partial_component {
                builder = builder.header(X_INERTIA_PARTIAL_COMPONENT, component);
                if !request.only.is_empty() {
                    builder = builder.header(X_INERTIA_PARTIAL_DATA, join_csv(&request.only));
                }
                if !request.except.is_empty() {
                    builder = builder.header(X_INERTIA_PARTIAL_EXCEPT, join_csv(&request.except));
                }
            }
            match &request.data {
                Some(data) if *method != Method::GET && *method != Method::HEAD => builder.json(data),
                _ => builder,
            }
        };

        let (sent, response) = self
            .send_following(method(request.method), url, build)
            .await?;
        let status = response.status();

        if status == StatusCode::CONFLICT && sent == Method::GET {
            let location = response
                .headers()
                .get(X_INERTIA_LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
                .ok_or(NavigationError::MissingLocation)?;
            return self.follow_location(location).await;
        }

        let is_page = response.headers().contains_key(X_INERTIA);
        if !status.is_success() || !is_page {
            return Err(NavigationError::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.text().await?;
        let incoming: PageObject = serde_json::from_str(&body)?;
        self.apply(incoming, partial_component.as_deref());

        self.transition(VisitPhase::Satisfied);
        self.transition(VisitPhase::Idle);
        Ok(VisitOutcome::Satisfied)
    }

    /// Send a request and follow redirects the way a browser does.
    ///
    /// Returns the method of the last request sent along with its response.
    async fn send_following<B>(
        &self,
        mut method: Method,
        mut url: Url,
        build: B,
    ) -> Result<(Method, Response), NavigationError>
    where
        B: Fn(RequestBuilder, &Method) -> RequestBuilder,
    {
        for _ in 0..=Self::MAX_REDIRECTS {
            let response = build(self.http.request(method.clone(), url.clone()), &method)
                .send()
                .await?;

            let status = response.status();
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok());
            let Some(location) = location.filter(|_| status.is_redirection()) else {
                return Ok((method, response));
            };

            let next = url
                .join(location)
                .map_err(|source| NavigationError::InvalidUrl {
                    url: location.to_string(),
                    source,
                })?;
            method = redirect_method(status, method);
            debug!(status = status.as_u16(), to = %next, method = %method, "Following redirect");
            url = next;
        }

        Err(NavigationError::TooManyRedirects(url.to_string()))
    }

    /// Handle a 409: reload the location as a full page, dropping partial directives
    async fn follow_location(&mut self, location: String) -> Result<VisitOutcome, NavigationError> {
        self.transition(VisitPhase::VersionConflict);

        let target = self.resolve(&location)?;
        if target.origin() != self.base_url.origin() {
            info!(location = %location, "Leaving the application");
            self.transition(VisitPhase::Idle);
            return Ok(VisitOutcome::External { location });
        }

        info!(location = %location, "Performing full page load");
        let page = self.full_page_load(target).await?;
        self.page = Some(page);
        self.transition(VisitPhase::Idle);
        Ok(VisitOutcome::FullReload { location })
    }

    async fn full_page_load(&self, url: Url) -> Result<PageObject, NavigationError> {
        let (_, response) = self
            .send_following(Method::GET, url, |builder, _| {
                builder.header(header::ACCEPT, "text/html")
            })
            .await?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            return Err(NavigationError::UnexpectedStatus {
                status: status.as_u16(),
                url: final_url,
            });
        }

        let html = response.text().await?;
        let json = utils::html::extract_data_page(&html)
            .ok_or(NavigationError::MissingPageData(final_url))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Merge a partial response into the mounted page, or replace it
    fn apply(&mut self, incoming: PageObject, partial_component: Option<&str>) {
        let merge = partial_component == Some(incoming.component.as_str());
        if merge
            && let Some(current) = self.page.as_mut()
            && current.component == incoming.component
        {
            debug!(
                component = %incoming.component,
                props = incoming.props.len(),
                "Merging partial props"
            );
            current.merge_partial(incoming);
        } else {
            debug!(component = %incoming.component, url = %incoming.url, "Replacing page");
            self.page = Some(incoming);
        }
    }

    fn resolve(&self, target: &str) -> Result<Url, NavigationError> {
        self.base_url
            .join(target)
            .map_err(|source| NavigationError::InvalidUrl {
                url: target.to_string(),
                source,
            })
    }

    fn fail(&mut self, error: &NavigationError) {
        if matches!(error, NavigationError::Network(_)) {
            self.transition(VisitPhase::NetworkError);
        }
        warn!(error = %error, "Visit failed");
        self.transition(VisitPhase::Idle);
    }

    fn transition(&mut self, to: VisitPhase) {
        debug!(from = %self.phase, to = %to, "Visit phase");
        self.phase = to;
    }
}

fn method(method: VisitMethod) -> Method {
    match method {
        VisitMethod::Get => Method::GET,
        VisitMethod::Post => Method::POST,
        VisitMethod::Put => Method::PUT,
        VisitMethod::Patch => Method::PATCH,
        VisitMethod::Delete => Method::DELETE,
    }
}

/// Method for the request that follows a redirect: 303 always becomes GET, 301
/// and 302 turn a POST into a GET, and 307/308 keep the method and body.
fn redirect_method(status: StatusCode, method: Method) -> Method {
    match status {
        StatusCode::SEE_OTHER if method != Method::HEAD => Method::GET,
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND if method == Method::POST => Method::GET,
        _ => method,
    }
}
