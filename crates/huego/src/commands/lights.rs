//! Light command handlers.

use huego_api::{Client, Light, ResourceType};
use tabled::Tabled;

use crate::cli::{GlobalOpts, LightsArgs, LightsCommand};
use crate::error::CliError;
use crate::output;

use super::{lookup_error, request_error};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LightRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "On")]
    on: String,
    #[tabled(rename = "Brightness")]
    brightness: String,
    #[tabled(rename = "Archetype")]
    archetype: String,
}

impl From<&Light> for LightRow {
    fn from(l: &Light) -> Self {
        Self {
            id: l.id.clone(),
            name: l.name().to_owned(),
            on: if l.is_on() { "on" } else { "off" }.into(),
            brightness: l
                .brightness()
                .map(|b| format!("{b:.0}%"))
                .unwrap_or_default(),
            archetype: l.metadata.archetype.clone().unwrap_or_default(),
        }
    }
}

fn detail(l: &Light) -> String {
    let mut lines = vec![
        format!("ID:          {}", l.id),
        format!("Name:        {}", l.name()),
        format!("On:          {}", if l.is_on() { "yes" } else { "no" }),
    ];
    if let Some(b) = l.brightness() {
        lines.push(format!("Brightness:  {b:.1}%"));
    }
    if let Some(ct) = l.color_temperature.as_ref().and_then(|c| c.mirek) {
        lines.push(format!("Color temp:  {ct} mirek"));
    }
    if let Some(color) = &l.color {
        lines.push(format!("Color xy:    {:.4}, {:.4}", color.xy.x, color.xy.y));
    }
    if let Some(archetype) = &l.metadata.archetype {
        lines.push(format!("Archetype:   {archetype}"));
    }
    if let Some(owner) = &l.owner {
        lines.push(format!("Owner:       {} {}", owner.rtype, owner.rid));
    }
    if let Some(v1) = &l.id_v1 {
        lines.push(format!("V1 id:       {v1}"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Client,
    profile: &str,
    args: LightsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LightsCommand::List => {
            let lights = client
                .get_lights()
                .await
                .map_err(|e| request_error(e, profile))?;
            let out = output::render_list(
                &global.output,
                &lights,
                |l| LightRow::from(l),
                |l| l.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LightsCommand::Get { id } => {
            let light = client
                .get_light(&id)
                .await
                .map_err(|e| lookup_error(e, profile, ResourceType::Light.as_ref(), &id))?;
            let out = output::render_single(&global.output, &light, detail, |l| l.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
