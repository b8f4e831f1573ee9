// Request builder
//
// A single-owner builder: every setter takes `self` and returns it, and
// `send`/`send_raw` consume it. Invalid input (bad query escapes, bad header
// values, unserializable bodies) is reported once, when the request is
// resolved, before anything goes out on the wire.

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::client::{APPLICATION_KEY_HEADER, Client, sensitive_header};
use crate::error::Error;
use crate::query::QueryParams;
use crate::response::Response;

/// API version used when none is set.
pub const DEFAULT_API_VERSION: &str = "v2";

/// A request against one bridge, built up by chained setters.
///
/// ```no_run
/// # async fn demo(client: &huego_api::Client) -> Result<(), huego_api::Error> {
/// use huego_api::{Light, ResourceType};
///
/// let lights: Vec<Light> = client
///     .request()
///     .resource(ResourceType::Light)
///     .query("limit=10")
///     .send()
///     .await?
///     .into_data()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Request<'a> {
    client: &'a Client,

    method: Method,
    path: String,
    query: String,
    headers: HeaderMap,

    api_version: String,
    resource_type: String,
    resource_id: String,

    body: Option<Bytes>,
    cancel: Option<CancellationToken>,
    invalid: Option<Error>,
}

impl<'a> Request<'a> {
    /// A GET request for API version `v2` with no resource selected.
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            method: Method::GET,
            path: String::new(),
            query: String::new(),
            headers: HeaderMap::new(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            resource_type: String::new(),
            resource_id: String::new(),
            body: None,
            cancel: None,
            invalid: None,
        }
    }

    // ── Configuration ────────────────────────────────────────────────

    pub fn verb(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Resource type, e.g. `"light"` or [`ResourceType::Light`](crate::ResourceType).
    /// Lowercased when the path is built.
    pub fn resource(mut self, resource_type: impl AsRef<str>) -> Self {
        resource_type.as_ref().clone_into(&mut self.resource_type);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = id.into();
        self
    }

    /// API version segment of `/clip/{version}/`. Empty falls back to `v2`.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Raw path. Replaces the whole `/clip/...` path when non-empty.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Raw query string (no leading `?`). Validated when the request is resolved.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body and set `content-type`.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => {
                self.body = Some(Bytes::from(body));
                self.headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            Err(e) => self.record(Error::Serialization(e)),
        }
        self
    }

    /// Replace the whole header map.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set one header, replacing any existing values for `name`.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let parsed = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| e.to_string())
            .and_then(|n| {
                HeaderValue::from_str(value)
                    .map(|v| (n, v))
                    .map_err(|e| e.to_string())
            });
        match parsed {
            Ok((name, value)) => {
                self.headers.insert(name, value);
            }
            Err(reason) => self.record(Error::InvalidHeader {
                name: name.to_owned(),
                reason,
            }),
        }
        self
    }

    /// Authenticate this request with `application_key`, overriding the
    /// client's stored key. An empty key removes the header.
    pub fn username(mut self, application_key: &str) -> Self {
        if application_key.is_empty() {
            self.headers.remove(APPLICATION_KEY_HEADER);
            return self;
        }
        match sensitive_header(application_key) {
            Ok(value) => {
                self.headers.insert(APPLICATION_KEY_HEADER, value);
            }
            Err(e) => self.record(e),
        }
        self
    }

    /// Abort the in-flight call when `token` is cancelled.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn record(&mut self, err: Error) {
        if self.invalid.is_none() {
            self.invalid = Some(err);
        }
    }

    // ── Resolution ───────────────────────────────────────────────────

    /// Resolve the final URL.
    ///
    /// Path precedence: raw path, then `resource/{type}[/{id}]` under
    /// `/clip/{version}/`, then the bare `/clip/{version}/`. The query is
    /// re-encoded with sorted keys.
    pub fn url(&self) -> Result<Url, Error> {
        let mut url = self.client.base_url().clone();
        url.set_path(&self.resolve_path());

        let encoded = QueryParams::parse(&self.query)?.encode();
        url.set_query((!encoded.is_empty()).then_some(encoded.as_str()));
        url.set_fragment(None);

        Ok(url)
    }

    fn resolve_path(&self) -> String {
        if !self.path.is_empty() {
            return self.path.clone();
        }

        let version = if self.api_version.is_empty() {
            DEFAULT_API_VERSION
        } else {
            self.api_version.as_str()
        };
        let mut path = format!("/clip/{version}/");

        if !self.resource_type.is_empty() {
            path = join_path(&[&path, "resource", &self.resource_type.to_lowercase()]);
        }
        if !self.resource_id.is_empty() {
            path = join_path(&[&path, &self.resource_id]);
        }

        path
    }

    // ── Execution ────────────────────────────────────────────────────

    /// Execute the request and return the full response body.
    pub async fn send_raw(self) -> Result<Bytes, Error> {
        let url = self.url()?;

        let Self {
            client,
            method,
            mut headers,
            body,
            cancel,
            invalid,
            ..
        } = self;

        if let Some(err) = invalid {
            return Err(err);
        }

        // An explicit header on the request wins over the stored key.
        if !headers.contains_key(APPLICATION_KEY_HEADER) {
            if let Some(key) = client.application_key_header()? {
                headers.insert(APPLICATION_KEY_HEADER, key);
            }
        }

        debug!("{method} {url}");

        let mut builder = client.http().request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let exchange = async {
            let resp = builder.send().await?;
            let status = resp.status();
            let body = resp.bytes().await?;
            Ok::<_, Error>((status, body))
        };

        let (status, body) = match cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => return Err(Error::Cancelled),
                result = exchange => result?,
            },
            None => exchange.await?,
        };

        debug!(%status, bytes = body.len(), "response received");
        Ok(body)
    }

    /// Execute the request and decode the `{data, errors}` envelope.
    pub async fn send(self) -> Result<Response, Error> {
        let body = self.send_raw().await?;
        Response::from_body(body)
    }

    /// Execute the request and decode `data` into `T`.
    ///
    /// Bridge-reported errors fail the call only when the client was set
    /// up with [`Client::set_check_errors`].
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<T, Error> {
        let check = self.client.checks_errors();
        let response = self.send().await?;
        let response = if check { response.check_errors()? } else { response };
        response.into_data()
    }
}

/// Join path segments with single slashes and clean `.`/`..` components.
fn join_path(segments: &[&str]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in segments.iter().flat_map(|s| s.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("/{}", parts.join("/"))
}
