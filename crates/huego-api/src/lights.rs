// Light endpoints
//
// Thin compositions of the request builder over `resource/light`.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::resource::{Light, ResourceType};

impl Client {
    /// List all lights known to the bridge.
    ///
    /// `GET /clip/v2/resource/light`
    pub async fn get_lights(&self) -> Result<Vec<Light>, Error> {
        debug!("listing lights");
        self.list_resources(ResourceType::Light).await
    }

    /// Fetch one light by id.
    ///
    /// `GET /clip/v2/resource/light/{id}`
    pub async fn get_light(&self, id: &str) -> Result<Light, Error> {
        debug!(id, "fetching light");
        self.get_resource(ResourceType::Light, id).await
    }
}
