//! Raw request handler: arbitrary method and path with the key attached.

use huego_api::{Client, Method};
use serde_json::Value;

use crate::cli::{GlobalOpts, RawArgs};
use crate::error::CliError;
use crate::output;

fn parse_method(raw: &str) -> Result<Method, CliError> {
    Method::from_bytes(raw.to_ascii_uppercase().as_bytes()).map_err(|_| CliError::Validation {
        field: "method".into(),
        reason: format!("invalid HTTP method '{raw}'"),
    })
}

pub async fn handle(client: &Client, args: RawArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let method = parse_method(&args.method)?;

    let mut request = client.request().verb(method).path(args.path);
    if let Some(query) = args.query {
        request = request.query(query);
    }
    if let Some(data) = args.data {
        let body: Value = serde_json::from_str(&data)?;
        request = request.json(&body);
    }

    let body = request.send_raw().await?;

    // Non-JSON bodies are printed verbatim.
    let out = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => output::render_single(
            &global.output,
            &value,
            |v| serde_json::to_string_pretty(v).unwrap_or_default(),
            |v| v.to_string(),
        ),
        Err(_) => String::from_utf8_lossy(&body).into_owned(),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_are_case_insensitive() {
        assert_eq!(parse_method("put").ok(), Some(Method::PUT));
        assert_eq!(parse_method("GET").ok(), Some(Method::GET));
    }

    #[test]
    fn malformed_methods_are_rejected() {
        assert!(matches!(
            parse_method("GE T"),
            Err(CliError::Validation { .. })
        ));
    }
}
