//! Host-encoded strings
//!
//! The host hands out buffers of UTF-16 code units that are not guaranteed
//! to be valid Unicode (entity names routinely contain lone surrogates), so
//! they are kept as raw units and only decoded through the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix the host uses for literal (non-rich) text
const PLAIN_TEXT_PREFIX: [u16; 2] = [0x108, 0x107];
/// Terminator closing a literal text segment
const PLAIN_TEXT_TERMINATOR: u16 = 0x1;

/// Owned copy of a host-encoded string
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "EncodedRepr", into = "Vec<u16>")]
pub struct EncodedText(Vec<u16>);

/// Traces may spell encoded strings as text or as raw code units
#[derive(Deserialize)]
#[serde(untagged)]
enum EncodedRepr {
    Text(String),
    Units(Vec<u16>),
}

impl From<EncodedRepr> for EncodedText {
    fn from(repr: EncodedRepr) -> Self {
        match repr {
            EncodedRepr::Text(text) => Self::from(text.as_str()),
            EncodedRepr::Units(units) => Self(units),
        }
    }
}

impl From<EncodedText> for Vec<u16> {
    fn from(text: EncodedText) -> Self {
        text.0
    }
}

impl From<&str> for EncodedText {
    fn from(text: &str) -> Self {
        Self(text.encode_utf16().collect())
    }
}

impl EncodedText {
    /// Copy a host buffer
    pub fn from_units(units: &[u16]) -> Self {
        Self(units.to_vec())
    }

    /// Wrap literal text in the host's plain-text envelope
    pub fn plain(text: &str) -> Self {
        let mut units = PLAIN_TEXT_PREFIX.to_vec();
        units.extend(text.encode_utf16());
        units.push(PLAIN_TEXT_TERMINATOR);
        Self(units)
    }

    pub fn units(&self) -> &[u16] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The literal text, if this is a plain-text envelope
    pub fn plain_text(&self) -> Option<String> {
        let inner = self
            .0
            .strip_prefix(PLAIN_TEXT_PREFIX.as_slice())?
            .strip_suffix(&[PLAIN_TEXT_TERMINATOR])?;
        String::from_utf16(inner).ok()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }
}

impl fmt::Debug for EncodedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncodedText(")?;
        for (i, unit) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{unit:04X}")?;
        }
        f.write_str(")")
    }
}
