// Bridge client
//
// Holds the bridge base URL, the HTTP transport, and the stored application
// key. Requests borrow the client and pick up its transport and key as
// defaults; endpoint helpers (lights, etc.) live in their own files as
// inherent methods.

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::request::Request;
use crate::transport::TransportConfig;

/// Header carrying the application key on every authenticated request.
pub const APPLICATION_KEY_HEADER: &str = "hue-application-key";

const DEFAULT_SCHEME: &str = "https://";

/// HTTP client for a single Hue bridge.
///
/// Cheap to share by reference across tasks. The stored key only changes
/// through [`set_application_key`](Self::set_application_key), which needs
/// `&mut self`.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    application_key: Option<SecretString>,
    check_errors: bool,
}

impl Client {
    // ── Constructors ─────────────────────────────────────────────────

    /// Create a client for `host` using the default transport.
    ///
    /// `host` may be a full URL (`https://192.168.1.2`) or a bare
    /// `host[:port]`, in which case `https://` is assumed. An empty
    /// `application_key` means no key is stored.
    pub fn new(host: &str, application_key: &str) -> Result<Self, Error> {
        Self::with_transport(host, application_key, &TransportConfig::default())
    }

    /// Like [`new`](Self::new), but accepts any certificate and uses the
    /// fixed [`TransportConfig::insecure`] pooling and timeout preset.
    pub fn insecure(host: &str, application_key: &str) -> Result<Self, Error> {
        Self::with_transport(host, application_key, &TransportConfig::insecure())
    }

    /// Build the HTTP transport from an explicit `TransportConfig`.
    pub fn with_transport(
        host: &str,
        application_key: &str,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = parse_host(host)?;
        let http = transport.build_client()?;
        Self::assemble(http, base_url, application_key)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        host: &str,
        application_key: &str,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let base_url = parse_host(host)?;
        Self::assemble(http, base_url, application_key)
    }

    fn assemble(http: reqwest::Client, base_url: Url, application_key: &str) -> Result<Self, Error> {
        let application_key = stored_key(application_key)?;
        debug!(bridge = %base_url, authenticated = application_key.is_some(), "client created");
        Ok(Self {
            http,
            base_url,
            application_key,
            check_errors: false,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Scheme, host and port every request is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Replace the HTTP transport.
    pub fn set_http(&mut self, http: reqwest::Client) -> &mut Self {
        self.http = http;
        self
    }

    /// Replace the stored application key. An empty key clears it.
    pub fn set_application_key(&mut self, application_key: &str) -> Result<&mut Self, Error> {
        self.application_key = stored_key(application_key)?;
        Ok(self)
    }

    pub fn has_application_key(&self) -> bool {
        self.application_key.is_some()
    }

    /// Make [`Request::fetch`] and the typed accessors fail with
    /// [`Error::Bridge`] when the envelope carries errors. Off by default.
    pub fn set_check_errors(&mut self, enabled: bool) -> &mut Self {
        self.check_errors = enabled;
        self
    }

    pub fn checks_errors(&self) -> bool {
        self.check_errors
    }

    /// Header value for the stored key, if any.
    pub(crate) fn application_key_header(&self) -> Result<Option<HeaderValue>, Error> {
        self.application_key
            .as_ref()
            .map(|key| sensitive_header(key.expose_secret()))
            .transpose()
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Start a request against this bridge (API version `v2`).
    pub fn request(&self) -> Request<'_> {
        Request::new(self)
    }

    /// List every resource of `resource_type`.
    ///
    /// `GET /clip/v2/resource/{type}`
    pub async fn list_resources<T: DeserializeOwned>(
        &self,
        resource_type: impl AsRef<str>,
    ) -> Result<Vec<T>, Error> {
        self.request().resource(resource_type).fetch().await
    }

    /// Fetch one resource by id.
    ///
    /// `GET /clip/v2/resource/{type}/{id}`. The bridge answers with a
    /// list; an empty list becomes [`Error::NotFound`].
    pub async fn get_resource<T: DeserializeOwned>(
        &self,
        resource_type: impl AsRef<str>,
        id: &str,
    ) -> Result<T, Error> {
        let resource_type = resource_type.as_ref();
        let found: Vec<T> = self.request().resource(resource_type).id(id).fetch().await?;

        found.into_iter().next().ok_or_else(|| Error::NotFound {
            resource_type: resource_type.to_lowercase(),
            id: id.to_owned(),
        })
    }
}

/// Parse the bridge host, retrying with `https://` when it is not an
/// absolute URL with a host.
fn parse_host(host: &str) -> Result<Url, Error> {
    if host.is_empty() {
        return Err(Error::EmptyHost);
    }

    match Url::parse(host) {
        Ok(url) if url.has_host() => Ok(url),
        _ => Ok(Url::parse(&format!("{DEFAULT_SCHEME}{host}"))?),
    }
}

fn stored_key(application_key: &str) -> Result<Option<SecretString>, Error> {
    if application_key.is_empty() {
        return Ok(None);
    }
    // Reject keys that could never be sent as a header.
    sensitive_header(application_key)?;
    Ok(Some(SecretString::from(application_key.to_owned())))
}

pub(crate) fn sensitive_header(value: &str) -> Result<HeaderValue, Error> {
    let mut header = HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader {
        name: APPLICATION_KEY_HEADER.to_owned(),
        reason: e.to_string(),
    })?;
    header.set_sensitive(true);
    Ok(header)
}
