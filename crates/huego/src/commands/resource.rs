//! Generic resource command: any CLIP v2 resource type as JSON values.

use huego_api::{Client, ResourceType};
use serde_json::Value;
use tabled::Tabled;

use crate::cli::{GlobalOpts, ResourceArgs};
use crate::error::CliError;
use crate::output;

use super::{lookup_error, request_error};

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Value> for ResourceRow {
    fn from(v: &Value) -> Self {
        Self {
            id: id_of(v),
            kind: str_at(v, "/type"),
            name: str_at(v, "/metadata/name"),
        }
    }
}

fn str_at(v: &Value, pointer: &str) -> String {
    v.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn id_of(v: &Value) -> String {
    str_at(v, "/id")
}

fn detail(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_default()
}

/// Validate the type name against the known catalogue, keeping its
/// canonical spelling.
fn parse_type(raw: &str) -> Result<ResourceType, CliError> {
    raw.parse::<ResourceType>()
        .map_err(|_| CliError::Validation {
            field: "resource type".into(),
            reason: format!("unknown resource type '{raw}'"),
        })
}

pub async fn handle(
    client: &Client,
    profile: &str,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let resource_type = parse_type(&args.resource_type)?;

    let out = match args.id {
        Some(id) => {
            let value: Value = client
                .get_resource(resource_type, &id)
                .await
                .map_err(|e| lookup_error(e, profile, resource_type.as_ref(), &id))?;
            output::render_single(&global.output, &value, detail, id_of)
        }
        None => {
            let mut request = client.request().resource(resource_type);
            if let Some(query) = args.query {
                request = request.query(query);
            }
            let values: Vec<Value> = request
                .fetch()
                .await
                .map_err(|e| request_error(e, profile))?;
            output::render_list(&global.output, &values, |v| ResourceRow::from(v), id_of)
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn type_names_are_case_insensitive() {
        assert_eq!(parse_type("Grouped_Light").ok(), Some(ResourceType::GroupedLight));
        assert!(parse_type("toaster").is_err());
    }

    #[test]
    fn rows_read_common_fields() {
        let row = ResourceRow::from(&json!({
            "id": "r1",
            "type": "room",
            "metadata": { "name": "Kitchen" }
        }));
        assert_eq!(row.id, "r1");
        assert_eq!(row.kind, "room");
        assert_eq!(row.name, "Kitchen");
    }

    #[test]
    fn missing_fields_render_empty() {
        let row = ResourceRow::from(&json!({ "id": "b1" }));
        assert_eq!(row.name, "");
    }
}
