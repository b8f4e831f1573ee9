// huego-api: Async Rust client for the Philips Hue bridge CLIP v2 API

pub mod client;
pub mod error;
pub mod lights;
pub mod query;
pub mod request;
pub mod resource;
pub mod response;
pub mod transport;

pub use client::{APPLICATION_KEY_HEADER, Client};
pub use error::Error;
pub use query::QueryParams;
pub use request::{DEFAULT_API_VERSION, Request};
pub use resource::{Light, ResourceType};
pub use response::{ApiError, Response};
pub use transport::{TlsMode, TransportConfig};

pub use reqwest::Method;
