//! Command dispatch: bridges CLI args -> library requests -> output formatting.

pub mod config_cmd;
pub mod lights;
pub mod raw;
pub mod resource;

use huego_api::Client;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a bridge-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &Client,
    profile: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Lights(args) => lights::handle(client, profile, args, global).await,
        Command::Resource(args) => resource::handle(client, profile, args, global).await,
        Command::Raw(args) => raw::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

/// Map a library error, turning an "unauthorized" bridge report into an
/// authentication failure.
pub(crate) fn request_error(err: huego_api::Error, profile: &str) -> CliError {
    match &err {
        huego_api::Error::Bridge { descriptions } if mentions(descriptions, "unauthorized") => {
            CliError::AuthFailed {
                profile: profile.to_owned(),
            }
        }
        _ => err.into(),
    }
}

/// Like [`request_error`], for lookups by id: a "not found" bridge report
/// becomes [`CliError::NotFound`].
pub(crate) fn lookup_error(
    err: huego_api::Error,
    profile: &str,
    resource_type: &str,
    id: &str,
) -> CliError {
    match &err {
        huego_api::Error::Bridge { descriptions } if mentions(descriptions, "not found") => {
            huego_api::Error::NotFound {
                resource_type: resource_type.to_owned(),
                id: id.to_owned(),
            }
            .into()
        }
        _ => request_error(err, profile),
    }
}

fn mentions(descriptions: &[String], needle: &str) -> bool {
    descriptions
        .iter()
        .any(|d| d.to_ascii_lowercase().contains(needle))
}
