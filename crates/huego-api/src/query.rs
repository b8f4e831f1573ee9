// Strict query-string parsing and canonical re-encoding.
//
// `url::form_urlencoded::parse` never fails, so malformed escapes would pass
// through silently. Requests instead validate the raw query here once, at
// resolution time, and re-encode it with sorted keys. Decoded components
// are kept as bytes so escapes that are not UTF-8 survive the round trip.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::error::Error;

/// Parsed query parameters, keyed in sorted order.
///
/// Values for a repeated key keep their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<Vec<u8>, Vec<Vec<u8>>>,
}

impl QueryParams {
    /// Parse a raw query string (without the leading `?`).
    ///
    /// Pairs are separated by `&`, empty pairs are skipped, and the key is
    /// split from the value at the first `=`. A `;` anywhere in a pair, or a
    /// `%` not followed by two hex digits, is rejected.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let mut values: BTreeMap<Vec<u8>, Vec<Vec<u8>>> = BTreeMap::new();

        for pair in raw.split('&') {
            if pair.is_empty() {
                continue;
            }
            if pair.contains(';') {
                return Err(invalid(raw, "invalid semicolon separator in query"));
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = unescape(key).map_err(|reason| invalid(raw, &reason))?;
            let value = unescape(value).map_err(|reason| invalid(raw, &reason))?;
            values.entry(key).or_default().push(value);
        }

        Ok(Self { values })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First value recorded for `key`, if it decoded to UTF-8.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key.as_bytes())
            .and_then(|v| v.first())
            .and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Encode as `application/x-www-form-urlencoded`, keys sorted.
    pub fn encode(&self) -> String {
        let mut pairs = Vec::new();
        for (key, values) in &self.values {
            let key: String = form_urlencoded::byte_serialize(key).collect();
            for value in values {
                let value: String = form_urlencoded::byte_serialize(value).collect();
                pairs.push(format!("{key}={value}"));
            }
        }
        pairs.join("&")
    }
}

fn invalid(raw: &str, reason: &str) -> Error {
    Error::InvalidQuery {
        query: raw.to_owned(),
        reason: reason.to_owned(),
    }
}

/// Percent-decode one component, treating `+` as a space.
fn unescape(component: &str) -> Result<Vec<u8>, String> {
    let bytes = component.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while let Some(&b) = bytes.get(i) {
        match b {
            b'%' => {
                let hi = bytes.get(i + 1).copied().and_then(hex_value);
                let lo = bytes.get(i + 2).copied().and_then(hex_value);
                let (Some(hi), Some(lo)) = (hi, lo) else {
                    let end = (i + 3).min(bytes.len());
                    let escape = String::from_utf8_lossy(bytes.get(i..end).unwrap_or_default());
                    return Err(format!("invalid URL escape {escape:?}"));
                };
                out.push(hi << 4 | lo);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            _ => {
                out.push(b);
                i += 1;
            }
        }
    }

    Ok(out)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
