// Transport configuration for building the reqwest::Client a bridge Client uses.
//
// Every Client owns an explicitly constructed HTTP client; there is no
// process-wide fallback. The insecure preset mirrors the fixed pooling and
// timeout parameters used for bridges with self-signed certificates.

use std::path::PathBuf;
use std::time::Duration;

const USER_AGENT: &str = concat!("huego/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the bundled webpki root store.
    System,
    /// Trust an additional CA certificate from the given PEM file
    /// (e.g. the Hue bridge root CA).
    CustomCa(PathBuf),
    /// Accept any certificate (bridges ship self-signed certificates).
    DangerAcceptInvalid,
}

/// Transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Total per-request timeout. `None` disables it.
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub tcp_keepalive: Option<Duration>,
    pub pool_max_idle_per_host: Option<usize>,
    pub pool_idle_timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: None,
            tcp_keepalive: None,
            pool_max_idle_per_host: None,
            pool_idle_timeout: None,
        }
    }
}

impl TransportConfig {
    /// Preset used by [`Client::insecure`](crate::Client::insecure):
    /// certificate verification off, 30s dial and keepalive, 100 idle
    /// connections, 90s idle timeout.
    pub fn insecure() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(30)),
            tcp_keepalive: Some(Duration::from_secs(30)),
            pool_max_idle_per_host: Some(100),
            pool_idle_timeout: Some(Duration::from_secs(90)),
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect) = self.connect_timeout {
            builder = builder.connect_timeout(connect);
        }
        if let Some(keepalive) = self.tcp_keepalive {
            builder = builder.tcp_keepalive(keepalive);
        }
        if let Some(max_idle) = self.pool_max_idle_per_host {
            builder = builder.pool_max_idle_per_host(max_idle);
        }
        if let Some(idle) = self.pool_idle_timeout {
            builder = builder.pool_idle_timeout(idle);
        }

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path).map_err(|e| {
                    crate::error::Error::Tls(format!("failed to read CA cert: {e}"))
                })?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| crate::error::Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| crate::error::Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn insecure_preset_matches_fixed_parameters() {
        let cfg = TransportConfig::insecure();
        assert_eq!(cfg.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(cfg.connect_timeout, Some(Duration::from_secs(30)));
        assert_eq!(cfg.tcp_keepalive, Some(Duration::from_secs(30)));
        assert_eq!(cfg.pool_max_idle_per_host, Some(100));
        assert_eq!(cfg.pool_idle_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn default_verifies_certificates() {
        let cfg = TransportConfig::default();
        assert_eq!(cfg.tls, TlsMode::System);
        assert_eq!(cfg.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let cfg = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/huego-ca.pem")),
            ..TransportConfig::default()
        };
        let err = cfg.build_client().unwrap_err();
        assert!(matches!(err, crate::Error::Tls(_)), "got {err:?}");
    }

    #[test]
    fn presets_build() {
        TransportConfig::default().build_client().unwrap();
        TransportConfig::insecure()
            .with_timeout(Duration::from_secs(5))
            .build_client()
            .unwrap();
    }
}
