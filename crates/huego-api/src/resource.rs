// CLIP v2 resource catalogue and typed resource models
//
// Only the light model is typed; every other resource type can still be
// fetched through `Client::list_resources` into a caller-defined struct or
// `serde_json::Value`.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Resource types addressable under `/clip/v2/resource/{type}`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceType {
    Light,
    GroupedLight,
    Room,
    Zone,
    Scene,
    SmartScene,
    Device,
    DevicePower,
    Bridge,
    BridgeHome,
    Motion,
    Temperature,
    LightLevel,
    Button,
    ZigbeeConnectivity,
    Entertainment,
    EntertainmentConfiguration,
    BehaviorScript,
    BehaviorInstance,
    GeofenceClient,
    Geolocation,
    Homekit,
}

/// Reference to another resource (`{ "rid": ..., "rtype": ... }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    pub rid: String,
    pub rtype: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub archetype: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnState {
    pub on: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimming {
    /// Brightness percentage, 0.0 - 100.0.
    pub brightness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_dim_level: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTemperature {
    /// Color temperature in mirek; `None` when the light is in xy color mode.
    pub mirek: Option<u16>,
    #[serde(default)]
    pub mirek_valid: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct XyPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub xy: XyPoint,
}

/// A light resource.
///
/// Only `id` is required; bridges omit capability blocks (dimming, color)
/// for lights that lack them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_v1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ResourceIdentifier>,
    #[serde(default)]
    pub metadata: LightMetadata,
    #[serde(default)]
    pub on: OnState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimming: Option<Dimming>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temperature: Option<ColorTemperature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Light {
    /// Display name from metadata, falling back to the id.
    pub fn name(&self) -> &str {
        if self.metadata.name.is_empty() {
            &self.id
        } else {
            &self.metadata.name
        }
    }

    pub fn is_on(&self) -> bool {
        self.on.on
    }

    pub fn brightness(&self) -> Option<f64> {
        self.dimming.map(|d| d.brightness)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn resource_types_render_snake_case() {
        assert_eq!(ResourceType::Light.to_string(), "light");
        assert_eq!(ResourceType::GroupedLight.as_ref(), "grouped_light");
        assert_eq!(
            ResourceType::EntertainmentConfiguration.to_string(),
            "entertainment_configuration"
        );
    }

    #[test]
    fn resource_types_parse_case_insensitively() {
        assert_eq!(ResourceType::from_str("Light").unwrap(), ResourceType::Light);
        assert_eq!(
            ResourceType::from_str("BRIDGE_HOME").unwrap(),
            ResourceType::BridgeHome
        );
        assert!(ResourceType::from_str("toaster").is_err());
    }

    #[test]
    fn every_resource_type_round_trips_through_its_name() {
        for rt in ResourceType::iter() {
            assert_eq!(ResourceType::from_str(rt.as_ref()).unwrap(), rt);
        }
    }

    #[test]
    fn minimal_light_decodes() {
        let light: Light = serde_json::from_value(json!({ "id": "1" })).unwrap();
        assert_eq!(light.id, "1");
        assert_eq!(light.name(), "1");
        assert!(!light.is_on());
        assert_eq!(light.brightness(), None);
    }

    #[test]
    fn full_light_decodes() {
        let light: Light = serde_json::from_value(json!({
            "id": "3f4ac4e9-d67a-4dbd-8a16-5ea7e373f281",
            "id_v1": "/lights/1",
            "owner": { "rid": "b9cb3a4f-0d2e-4a1b-9d8a-1f2c3d4e5f60", "rtype": "device" },
            "metadata": { "name": "Desk lamp", "archetype": "table_shade" },
            "on": { "on": true },
            "dimming": { "brightness": 62.5, "min_dim_level": 0.2 },
            "color_temperature": { "mirek": 366, "mirek_valid": true },
            "color": { "xy": { "x": 0.4573, "y": 0.41 } },
            "type": "light"
        }))
        .unwrap();

        assert_eq!(light.name(), "Desk lamp");
        assert!(light.is_on());
        assert_eq!(light.brightness(), Some(62.5));
        assert_eq!(light.color_temperature.unwrap().mirek, Some(366));
        assert_eq!(light.owner.unwrap().rtype, "device");
        assert_eq!(light.kind.as_deref(), Some("light"));
    }
}
