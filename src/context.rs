use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::{header::HOST, request::Parts, HeaderMap},
};
use thiserror::Error;
use url::{form_urlencoded, Url};

/// Query keys rewritten on every navigation link
const PAGINATION_KEYS: [&str; 2] = ["limit", "page"];

/// Whether `X-Forwarded-*` headers from a reverse proxy are honoured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrustProxy(pub bool);

/// Request context could not be turned into an absolute url
#[derive(Error, Debug)]
pub enum ContextError {
    /// No host in headers nor uri
    #[error("request carries no host")]
    MissingHost,
    /// Host contains characters that do not belong to an authority
    #[error("invalid host `{0}`")]
    InvalidHost(String),
    /// Url parser rejected the result
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
}

/// Where a request was addressed to, used as a template for sibling page urls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// `scheme://host/path` without query nor fragment
    base: Url,
    /// Original query pairs minus `limit`/`page`, one entry per key
    carried: Vec<(String, String)>,
}

impl RequestContext {
    /// Build a context from the inbound request parts.
    /// # Errors
    /// `ContextError` when scheme, host and path do not form a valid url
    pub fn new(
        scheme: &str,
        host: &str,
        path: &str,
        query: Option<&str>,
    ) -> Result<Self, ContextError> {
        if host.is_empty() {
            return Err(ContextError::MissingHost);
        }
        if host.contains(['/', '?', '#', '@', '\\']) {
            return Err(ContextError::InvalidHost(host.to_owned()));
        }

        let mut base = Url::parse(&format!("{scheme}://{host}"))?;
        base.set_path(path);

        let mut carried: Vec<(String, String)> = Vec::new();
        let pairs = form_urlencoded::parse(query.unwrap_or_default().as_bytes());
        for (key, value) in pairs {
            if PAGINATION_KEYS.contains(&&*key) {
                continue;
            }
            // Last value wins, position of the first occurrence is kept
            match carried.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value.into_owned(),
                None => carried.push((key.into_owned(), value.into_owned())),
            }
        }

        Ok(Self { base, carried })
    }

    /// Absolute url of the request without its query
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Query parameters carried over to navigation links
    #[must_use]
    pub fn carried_params(&self) -> &[(String, String)] {
        &self.carried
    }

    /// Absolute url of another page of the same listing
    #[must_use]
    pub fn page_url(&self, limit: u32, page: u64) -> String {
        let mut url = self.base.clone();
        let _ = url
            .query_pairs_mut()
            .clear()
            .extend_pairs(&self.carried)
            .append_pair("limit", &limit.to_string())
            .append_pair("page", &page.to_string());
        url.into()
    }
}

fn header<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        // Proxies may chain values, the first one is the client facing hop
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    TrustProxy: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ContextError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TrustProxy(trust_proxy) = TrustProxy::from_ref(state);

        let scheme = trust_proxy
            .then(|| header(&parts.headers, "x-forwarded-proto"))
            .flatten()
            .filter(|p| p.eq_ignore_ascii_case("http") || p.eq_ignore_ascii_case("https"))
            .unwrap_or("http");

        let host = trust_proxy
            .then(|| header(&parts.headers, "x-forwarded-host"))
            .flatten()
            .or_else(|| parts.headers.get(HOST).and_then(|h| h.to_str().ok()))
            .or_else(|| parts.uri.authority().map(|a| a.as_str()))
            .ok_or(ContextError::MissingHost)?;

        // Nested routers see a stripped uri, links must use the full path
        let uri = parts.extensions.get::<OriginalUri>().map_or(&parts.uri, |o| &o.0);

        Self::new(&scheme.to_ascii_lowercase(), host, uri.path(), uri.query())
    }
}
