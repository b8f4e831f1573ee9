//! CLI error types with miette diagnostics.
//!
//! Maps `huego_api::Error` variants into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to bridge at {url}")]
    #[diagnostic(
        code(huego::connection_failed),
        help(
            "Check that the bridge is powered on and reachable.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(huego::tls_error),
        help(
            "Hue bridges use a self-signed certificate.\n\
             Use --insecure (-k) to accept it, or set ca_cert in your profile."
        )
    )]
    TlsError { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(huego::timeout),
        help("Increase the timeout with --timeout or check bridge responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("The bridge rejected the application key")]
    #[diagnostic(
        code(huego::auth_failed),
        help(
            "Verify the application key for profile '{profile}'.\n\
             Pass it with --app-key or set HUE_APP_KEY."
        )
    )]
    AuthFailed { profile: String },

    #[error("No application key configured for profile '{profile}'")]
    #[diagnostic(
        code(huego::no_credentials),
        help("Set app_key or app_key_env in the profile, pass --app-key, or set HUE_APP_KEY.")
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(huego::not_found),
        help("Run: huego {list_command} to see available ids")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Bridge error ({code}): {message}")]
    #[diagnostic(code(huego::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(huego::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No bridge configured for profile '{profile}'")]
    #[diagnostic(
        code(huego::no_bridge),
        help("Pass --bridge <host>, set HUE_BRIDGE, or add `bridge = \"...\"` to the profile.")
    )]
    NoBridge { profile: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(huego::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(huego::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(huego::json), help("Check the JSON body and try again."))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoBridge { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── huego_api::Error → CliError mapping ──────────────────────────────

impl From<huego_api::Error> for CliError {
    fn from(err: huego_api::Error) -> Self {
        use huego_api::Error as E;

        match err {
            E::EmptyHost => CliError::Validation {
                field: "bridge".into(),
                reason: "must not be empty".into(),
            },
            E::InvalidUrl(e) => CliError::Validation {
                field: "bridge".into(),
                reason: e.to_string(),
            },
            E::InvalidQuery { query, reason } => CliError::Validation {
                field: "query".into(),
                reason: format!("{query:?}: {reason}"),
            },
            E::InvalidHeader { name, reason } => CliError::Validation {
                field: format!("header {name}"),
                reason,
            },
            E::Serialization(e) => CliError::Json(e),
            E::Tls(message) => CliError::TlsError { message },

            E::Transport(e) if e.is_timeout() => CliError::Timeout,
            E::Transport(e) => CliError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: Box::new(e),
            },
            E::Cancelled => CliError::ApiError {
                code: "cancelled".into(),
                message: "request cancelled".into(),
            },

            E::Deserialization { message, .. } => CliError::ApiError {
                code: "decode".into(),
                message,
            },

            E::NotFound { resource_type, id } => CliError::NotFound {
                list_command: if resource_type == "light" {
                    "lights list".into()
                } else {
                    format!("resource {resource_type}")
                },
                resource_type,
                identifier: id,
            },

            E::Bridge { descriptions } => CliError::ApiError {
                code: "bridge".into(),
                message: descriptions.join("; "),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_list_hint() {
        let err = CliError::from(huego_api::Error::NotFound {
            resource_type: "light".into(),
            id: "abc".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        match err {
            CliError::NotFound { list_command, .. } => assert_eq!(list_command, "lights list"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn other_resources_point_at_resource_command() {
        let err = CliError::from(huego_api::Error::NotFound {
            resource_type: "room".into(),
            id: "r1".into(),
        });
        assert!(matches!(err, CliError::NotFound { ref list_command, .. } if list_command == "resource room"));
    }

    #[test]
    fn query_errors_are_usage_errors() {
        let err = CliError::from(huego_api::Error::InvalidQuery {
            query: "%zz".into(),
            reason: "invalid URL escape \"%zz\"".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn bridge_errors_join_descriptions() {
        let err = CliError::from(huego_api::Error::Bridge {
            descriptions: vec!["a".into(), "b".into()],
        });
        assert_eq!(err.to_string(), "Bridge error (bridge): a; b");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn empty_host_is_validation() {
        let err = CliError::from(huego_api::Error::EmptyHost);
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "bridge"));
    }
}
