//! Responses embedded in decoded dialog bodies
//!
//! Bodies may reference a response inline as `<a=ID>label</a>`. The host
//! renders these as links but never sends a button message for them.

use super::registry::ResponseOption;
use crate::error::DialogError;
use regex::Regex;
use std::sync::LazyLock;

/// `<a=ID>label` terminated by the next tag or the end of the body
static EMBEDDED_RESPONSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a=([^<>]*)>([^<]+)(?:<|$)").expect("valid regex"));

/// Parse all embedded responses, left to right
///
/// Either every reference parses or none are returned.
pub fn parse_embedded_responses(decoded: &str) -> Result<Vec<ResponseOption>, DialogError> {
    EMBEDDED_RESPONSE_RE
        .captures_iter(decoded)
        .map(|caps| {
            let raw = &caps[1];
            let label = &caps[2];
            let dialog_id = raw
                .parse::<u32>()
                .map_err(|_| DialogError::InvalidEmbeddedResponseId {
                    raw: raw.to_owned(),
                    label: label.to_owned(),
                })?;
            Ok(ResponseOption::embedded(dialog_id, label))
        })
        .collect()
}
