//! The per-invocation request context.
//!
//! A [`Context`] is created once per [`Api::invoke`](crate::Api::invoke),
//! lent mutably to every middleware in turn, and finalized by a single
//! [`Context::commit`].

use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::{
    AbortSignal, Body, Cache, Credentials, Error, Headers, Method, Mode, Redirect, Referrer,
    Request, Response, Result, Stage, Transport,
};

/// Resolve the effective address of a request.
///
/// An endpoint that is itself an absolute URL wins. Otherwise one trailing
/// slash is stripped from `base` and the non-empty `/`-separated segments of
/// the endpoint are appended.
///
/// ```
/// use fetchain_core::resolve_address;
///
/// assert_eq!(resolve_address("http://h/api/", Some("/v1//users/")), "http://h/api/v1/users");
/// assert_eq!(resolve_address("http://h", Some("https://other/x")), "https://other/x");
/// assert_eq!(resolve_address("http://h/", None), "http://h");
/// ```
#[must_use]
pub fn resolve_address(base: &str, endpoint: Option<&str>) -> String {
    if let Some(endpoint) = endpoint
        && Url::parse(endpoint).is_ok()
    {
        return endpoint.to_string();
    }

    let base = base.strip_suffix('/').unwrap_or(base);
    let mut address = base.to_string();
    for segment in endpoint
        .into_iter()
        .flat_map(|endpoint| endpoint.split('/'))
        .filter(|segment| !segment.is_empty())
    {
        address.push('/');
        address.push_str(segment);
    }
    address
}

/// Mutable description of one in-flight request.
pub struct Context {
    url: Url,
    method: Method,
    headers: Arc<Headers>,
    mode: Mode,
    credentials: Credentials,
    redirect: Redirect,
    cache: Cache,
    referrer: Referrer,
    body: Option<Body>,
    signal: Option<AbortSignal>,
    transport: Option<Arc<dyn Transport>>,
    stage: Stage,
    committed: bool,
    response: Option<Response>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .field("stage", &self.stage)
            .field("committed", &self.committed)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Build a context for `endpoint` relative to `base`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] when the resolved address is not an
    /// absolute URL.
    pub fn new(base: &str, endpoint: Option<&str>) -> Result<Self> {
        let address = resolve_address(base, endpoint);
        let url = Url::parse(&address).map_err(|source| Error::InvalidAddress {
            address: address.clone(),
            source,
        })?;

        Ok(Self {
            url,
            method: Method::default(),
            headers: Arc::default(),
            mode: Mode::default(),
            credentials: Credentials::default(),
            redirect: Redirect::default(),
            cache: Cache::default(),
            referrer: Referrer::default(),
            body: None,
            signal: None,
            transport: None,
            stage: Stage::Pending,
            committed: false,
            response: None,
        })
    }

    /// Attach the transport used by [`Context::commit`].
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    // ========================================================================
    // Address & method
    // ========================================================================

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Mutable target URL, e.g. to edit the query string.
    pub fn url_mut(&mut self) -> &mut Url {
        &mut self.url
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Set the HTTP method.
    pub fn set_method(&mut self, method: Method) -> &mut Self {
        self.method = method;
        self
    }

    // ========================================================================
    // Headers (copy-on-write)
    // ========================================================================

    /// Header value by exact (case-sensitive) name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Set one header, replacing any value under the same exact name.
    ///
    /// Snapshots taken with [`Context::headers_snapshot`] before the write do
    /// not observe it.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        Arc::make_mut(&mut self.headers).insert(name.into(), value.into());
        self
    }

    /// Remove one header by exact name.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        if !self.headers.contains_key(name) {
            return None;
        }
        Arc::make_mut(&mut self.headers).remove(name)
    }

    /// Current header mapping.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Shared snapshot of the current header mapping.
    #[must_use]
    pub fn headers_snapshot(&self) -> Arc<Headers> {
        Arc::clone(&self.headers)
    }

    // ========================================================================
    // Policies
    // ========================================================================

    /// Request mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Set the request mode.
    pub fn set_mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Credentials policy.
    #[must_use]
    pub const fn credentials(&self) -> Credentials {
        self.credentials
    }

    /// Set the credentials policy.
    pub fn set_credentials(&mut self, credentials: Credentials) -> &mut Self {
        self.credentials = credentials;
        self
    }

    /// Redirect policy.
    #[must_use]
    pub const fn redirect(&self) -> Redirect {
        self.redirect
    }

    /// Set the redirect policy.
    pub fn set_redirect(&mut self, redirect: Redirect) -> &mut Self {
        self.redirect = redirect;
        self
    }

    /// Cache policy.
    #[must_use]
    pub const fn cache(&self) -> Cache {
        self.cache
    }

    /// Set the cache policy.
    pub fn set_cache(&mut self, cache: Cache) -> &mut Self {
        self.cache = cache;
        self
    }

    /// Referrer policy.
    #[must_use]
    pub const fn referrer(&self) -> Referrer {
        self.referrer
    }

    /// Set the referrer policy.
    pub fn set_referrer(&mut self, referrer: Referrer) -> &mut Self {
        self.referrer = referrer;
        self
    }

    // ========================================================================
    // Body & signal
    // ========================================================================

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Mutable request body.
    pub fn body_mut(&mut self) -> Option<&mut Body> {
        self.body.as_mut()
    }

    /// Replace the request body.
    pub fn set_body(&mut self, body: impl Into<Body>) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    /// Take the request body out, leaving none.
    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }

    /// Cancellation signal.
    #[must_use]
    pub const fn signal(&self) -> Option<&AbortSignal> {
        self.signal.as_ref()
    }

    /// Attach a cancellation signal for the transport to honour.
    pub fn set_signal(&mut self, signal: AbortSignal) -> &mut Self {
        self.signal = Some(signal);
        self
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Where the pipeline currently is.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    /// `true` once [`Context::commit`] reached the transport.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.committed
    }

    /// The response stored by a successful commit.
    #[must_use]
    pub const fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Immutable snapshot of the request as it would be sent now.
    #[must_use]
    pub fn to_request(&self) -> Request {
        Request {
            method: self.method,
            url: self.url.clone(),
            headers: Arc::clone(&self.headers),
            body: self.body.clone(),
            mode: self.mode,
            credentials: self.credentials,
            redirect: self.redirect,
            cache: self.cache,
            referrer: self.referrer,
            signal: self.signal.clone(),
        }
    }

    /// Perform the transport call.
    ///
    /// Runs at most once per context: the response is stored on the context
    /// and carries the committed [`Request`].
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyCommitted`] on a second call, without touching the network;
    /// - [`Error::NoTransportConfigured`] when no transport was attached;
    /// - [`Error::Transport`] wrapping the transport's own failure.
    pub async fn commit(&mut self) -> Result<Response> {
        if self.committed {
            return Err(Error::AlreadyCommitted);
        }
        let transport = self
            .transport
            .clone()
            .ok_or(Error::NoTransportConfigured)?;

        self.committed = true;
        self.stage = Stage::Committing;
        let request = Arc::new(self.to_request());
        debug!(method = %request.method(), url = %request.url(), "committing request");

        let response = transport
            .send(Arc::clone(&request))
            .await
            .map_err(Error::transport)?
            .with_request(request);

        self.response = Some(response.clone());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert2::{check, let_assert};

    use super::*;
    use crate::BoxError;

    fn counting_transport(calls: Arc<AtomicUsize>) -> Arc<dyn Transport> {
        Arc::new(move |request: Arc<Request>| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                Ok::<_, BoxError>(Response::new(
                    200,
                    HashMap::new(),
                    format!("{} {}", request.method(), request.url()),
                ))
            }
        })
    }

    #[test]
    fn absolute_endpoint_wins() {
        let ctx = Context::new("http://base.test/api", Some("https://other.test/x?y=1"))
            .expect("context");
        assert_eq!(ctx.url().as_str(), "https://other.test/x?y=1");
    }

    #[test]
    fn relative_endpoint_is_joined() {
        let cases = [
            ("http://h:8080", Some("/123"), "http://h:8080/123"),
            ("http://h/api/", Some("users/"), "http://h/api/users"),
            ("http://h/api", Some("//a///b/"), "http://h/api/a/b"),
            ("http://h/api/", Some(""), "http://h/api"),
            ("http://h/api/", None, "http://h/api"),
        ];
        for (base, endpoint, expected) in cases {
            assert_eq!(resolve_address(base, endpoint), expected);
            let ctx = Context::new(base, endpoint).expect("context");
            assert_eq!(ctx.url().as_str().trim_end_matches('/'), expected);
        }
    }

    #[test]
    fn invalid_address_fails_fast() {
        let_assert!(Err(Error::InvalidAddress { address, .. }) = Context::new("/relative", Some("x")));
        check!(address == "/relative/x");
    }

    #[test]
    fn defaults() {
        let ctx = Context::new("http://h", None).expect("context");
        check!(ctx.method() == Method::Get);
        check!(ctx.mode() == Mode::Cors);
        check!(ctx.credentials() == Credentials::Include);
        check!(ctx.redirect() == Redirect::Follow);
        check!(ctx.cache() == Cache::Default);
        check!(ctx.referrer() == Referrer::Client);
        check!(ctx.headers().is_empty());
        check!(ctx.body().is_none());
        check!(ctx.stage() == Stage::Pending);
    }

    #[test]
    fn header_writes_are_copy_on_write() {
        let mut ctx = Context::new("http://h", None).expect("context");
        ctx.set_header("X-Trace", "1");
        let before = ctx.headers_snapshot();

        ctx.set_header("X-Trace", "2").set_header("x-trace", "lower");

        assert_eq!(before.get("X-Trace").map(String::as_str), Some("1"));
        assert_eq!(before.len(), 1);
        assert_eq!(ctx.header("X-Trace"), Some("2"));
        assert_eq!(ctx.header("x-trace"), Some("lower"));
        assert_eq!(ctx.headers().len(), 2);

        assert_eq!(ctx.remove_header("x-trace").as_deref(), Some("lower"));
        assert_eq!(ctx.remove_header("x-trace"), None);
    }

    #[tokio::test]
    async fn commit_without_transport_fails() {
        let mut ctx = Context::new("http://h", None).expect("context");
        let_assert!(Err(Error::NoTransportConfigured) = ctx.commit().await);
        check!(!ctx.is_committed());
    }

    #[tokio::test]
    async fn commit_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut ctx = Context::new("http://h", Some("/items"))
            .expect("context")
            .with_transport(counting_transport(Arc::clone(&calls)));
        ctx.set_method(Method::Delete);

        let response = ctx.commit().await.expect("response");
        assert_eq!(response.text().expect("utf8"), "DELETE http://h/items");
        let request = response.request().expect("committed request");
        assert_eq!(request.method(), Method::Delete);
        assert!(ctx.response().is_some());
        assert_eq!(ctx.stage(), Stage::Committing);

        let_assert!(Err(Error::AlreadyCommitted) = ctx.commit().await);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_wrapped() {
        let transport: Arc<dyn Transport> = Arc::new(|_request: Arc<Request>| async {
            Err::<Response, BoxError>("connection refused".into())
        });
        let mut ctx = Context::new("http://h", None)
            .expect("context")
            .with_transport(transport);

        let err = ctx.commit().await.expect_err("transport failure");
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "transport error: connection refused");
        assert!(ctx.response().is_none());
    }
}
