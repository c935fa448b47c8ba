//! HTTP transport using hyper-util.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tracing::debug;
use url::Url;

use crate::{
    BoxError, Method, Redirect, Request, Response, Transport, TransportConfig, TransportError,
    TransportFuture, connector::https_connector, redirect,
};

/// One hop of an exchange, re-targeted on each redirect.
#[derive(Debug, Clone)]
struct Outgoing {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Outgoing {
    /// Encode the committed request once; redirects reuse the result.
    fn prepare(request: &Request) -> Self {
        let mut headers: Vec<(String, String)> = request
            .headers()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let body = match request.body().cloned() {
            Some(body) => {
                let (implied, bytes) = body.into_bytes();
                if let Some(content_type) = implied
                    && request.header_ignore_case("content-type").is_none()
                {
                    headers.push(("content-type".to_string(), content_type));
                }
                bytes
            }
            None => Bytes::new(),
        };

        Self {
            method: request.method(),
            url: request.url().clone(),
            headers,
            body,
        }
    }

    /// Retarget after a redirect response with `status`.
    ///
    /// Credentials are dropped when the target has another origin.
    fn redirect(&mut self, status: u16, url: Url) {
        if self.url.origin() != url.origin() {
            self.headers
                .retain(|(name, _)| !redirect::is_credential_header(name));
        }
        let method = redirect::redirect_method(status, self.method);
        if method != self.method {
            self.body = Bytes::new();
            self.headers.retain(|(name, _)| {
                !name.eq_ignore_ascii_case("content-type")
                    && !name.eq_ignore_ascii_case("content-length")
            });
        }
        self.method = method;
        self.url = url;
    }

    fn to_hyper(&self) -> Result<http::Request<Full<Bytes>>, TransportError> {
        let mut builder = http::Request::builder()
            .method(http::Method::from(self.method))
            .uri(self.url.as_str());

        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder
            .body(Full::new(self.body.clone()))
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))
    }
}

/// [`Transport`] backed by a pooled hyper client with rustls.
///
/// Honours the request's abort signal, its [`Redirect`] policy and the
/// configured timeout. Mode, credentials, cache and referrer policies have
/// no meaning outside a browser and are ignored.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use fetchain::{Api, HyperTransport, TransportConfig};
///
/// let config = TransportConfig::builder().timeout(Duration::from_secs(5)).build();
/// let api = Api::with_transport("https://api.example.com", HyperTransport::with_config(config));
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: TransportConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperTransport {
    /// Create a transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with custom configuration.
    #[must_use]
    pub fn with_config(config: TransportConfig) -> Self {
        let connector = https_connector(&config);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner, config }
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Extract response headers as a `HashMap`.
    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    async fn round_trip(&self, outgoing: &Outgoing) -> Result<Response, TransportError> {
        let response = self
            .inner
            .request(outgoing.to_hyper()?)
            .await
            .map_err(Self::map_hyper_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::extract_headers(response.headers());

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?
            .to_bytes();

        Ok(Response::new(status, response_headers, body))
    }

    async fn exchange(&self, request: &Request) -> Result<Response, TransportError> {
        let mut outgoing = Outgoing::prepare(request);
        let mut hops = 0;

        loop {
            let response = self.round_trip(&outgoing).await?;
            let status = response.status();
            if !redirect::is_redirect(status) {
                return Ok(response);
            }

            match request.redirect() {
                Redirect::Manual => return Ok(response),
                Redirect::Error => {
                    return Err(TransportError::Redirect(format!(
                        "redirect ({status}) refused by policy"
                    )));
                }
                Redirect::Follow => {}
            }

            if hops >= self.config.max_redirects {
                return Err(TransportError::Redirect(format!(
                    "gave up after {hops} redirects"
                )));
            }

            let location = response.header("location").ok_or_else(|| {
                TransportError::Redirect(format!("{status} response without Location header"))
            })?;
            let url = redirect::resolve_location(&outgoing.url, location)?;
            debug!(%status, from = %outgoing.url, to = %url, "following redirect");

            outgoing.redirect(status, url);
            hops += 1;
        }
    }

    async fn execute(&self, request: Arc<Request>) -> Result<Response, TransportError> {
        debug!(method = %request.method(), url = %request.url(), "sending request");

        let timeout = self.config.timeout;
        let exchange = tokio::time::timeout(timeout, self.exchange(&request));

        let Some(signal) = request.signal() else {
            return exchange
                .await
                .unwrap_or(Err(TransportError::Timeout(timeout)));
        };
        if signal.is_aborted() {
            return Err(TransportError::Aborted);
        }

        tokio::select! {
            biased;
            () = signal.aborted() => Err(TransportError::Aborted),
            result = exchange => result.unwrap_or(Err(TransportError::Timeout(timeout))),
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> TransportError {
        let mut msg = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            msg.push_str(": ");
            msg.push_str(&cause.to_string());
            source = cause.source();
        }

        let lower = msg.to_ascii_lowercase();
        if lower.contains("ssl") || lower.contains("tls") || lower.contains("certificate") {
            return TransportError::Tls(msg);
        }

        TransportError::Connection(msg)
    }
}

impl Transport for HyperTransport {
    fn send(&self, request: Arc<Request>) -> TransportFuture {
        let transport = self.clone();
        Box::pin(async move {
            transport
                .execute(request)
                .await
                .map_err(BoxError::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::check;

    use super::*;
    use crate::{Body, Context, Form, Part};

    fn request(setup: impl FnOnce(&mut Context)) -> Request {
        let mut ctx = Context::new("http://h/upload", None).expect("context");
        setup(&mut ctx);
        ctx.to_request()
    }

    fn header<'a>(outgoing: &'a Outgoing, name: &str) -> Option<&'a str> {
        outgoing
            .headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn multipart_body_gets_its_boundary_header() {
        let request = request(|ctx| {
            let mut form = Form::with_boundary("XYZ");
            form.append(Part::text("field", "value"));
            ctx.set_body(form);
        });

        let outgoing = Outgoing::prepare(&request);

        check!(header(&outgoing, "content-type") == Some("multipart/form-data; boundary=XYZ"));
        check!(String::from_utf8_lossy(&outgoing.body).contains("value"));
    }

    #[test]
    fn explicit_content_type_is_kept() {
        let request = request(|ctx| {
            ctx.set_header("Content-Type", "multipart/mixed; boundary=XYZ");
            ctx.set_body(Body::from(Form::with_boundary("XYZ")));
        });

        let outgoing = Outgoing::prepare(&request);

        check!(outgoing.headers.len() == 1);
        check!(header(&outgoing, "content-type") == Some("multipart/mixed; boundary=XYZ"));
    }

    #[test]
    fn downgrading_redirect_drops_the_body() {
        let request = request(|ctx| {
            ctx.set_method(Method::Post);
            ctx.set_header("Content-Type", "application/json");
            ctx.set_header("x-trace", "1");
            ctx.set_body("{}");
        });
        let mut outgoing = Outgoing::prepare(&request);
        let target = Url::parse("http://h/done").expect("url");

        let mut kept = outgoing.clone();
        kept.redirect(307, target.clone());
        check!(kept.method == Method::Post);
        check!(kept.body.as_ref() == b"{}");

        outgoing.redirect(303, target);
        check!(outgoing.method == Method::Get);
        check!(outgoing.body.is_empty());
        check!(outgoing.url.as_str() == "http://h/done");
        check!(outgoing.headers == vec![("x-trace".to_string(), "1".to_string())]);
    }

    #[test]
    fn cross_origin_redirect_drops_credentials() {
        let request = request(|ctx| {
            ctx.set_header("Authorization", "Bearer secret");
            ctx.set_header("Cookie", "session=1");
            ctx.set_header("x-trace", "1");
        });

        let mut same_origin = Outgoing::prepare(&request);
        same_origin.redirect(302, Url::parse("http://h/elsewhere").expect("url"));
        check!(header(&same_origin, "authorization") == Some("Bearer secret"));
        check!(header(&same_origin, "cookie") == Some("session=1"));

        let mut other_origin = Outgoing::prepare(&request);
        other_origin.redirect(307, Url::parse("http://other:8080/").expect("url"));
        check!(header(&other_origin, "authorization").is_none());
        check!(header(&other_origin, "cookie").is_none());
        check!(header(&other_origin, "x-trace") == Some("1"));
    }

    #[test]
    fn head_survives_a_moved_redirect() {
        let request = request(|ctx| {
            ctx.set_method(Method::Head);
        });
        let mut outgoing = Outgoing::prepare(&request);

        outgoing.redirect(301, Url::parse("http://h/b").expect("url"));

        check!(outgoing.method == Method::Head);
    }

    #[test]
    fn hyper_request_carries_method_uri_and_headers() {
        let request = request(|ctx| {
            ctx.set_method(Method::Put);
            ctx.set_header("x-api-key", "secret");
        });

        let hyper_request = Outgoing::prepare(&request).to_hyper().expect("hyper request");

        check!(hyper_request.method() == http::Method::PUT);
        check!(hyper_request.uri() == "http://h/upload");
        check!(hyper_request.headers()["x-api-key"] == "secret");
    }

    #[test]
    fn headers_are_extracted() {
        let mut map = http::HeaderMap::new();
        map.insert("x-id", http::HeaderValue::from_static("42"));

        let headers = HyperTransport::extract_headers(&map);

        check!(headers == HashMap::from([("x-id".to_string(), "42".to_string())]));
    }
}
