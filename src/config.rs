// Stream configuration
use serde::{Deserialize, Serialize};

/// How pages carrying a different serial number are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerialPolicy {
    /// Reject any page whose serial number differs from the first page's.
    #[default]
    Strict,
    /// Accept every page regardless of serial number.
    Ignore,
}

/// Options for [`crate::Demuxer`] and [`crate::VorbisStream`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub serial_policy: SerialPolicy,
    /// Verify each page checksum after decoding it.
    pub verify_crc: bool,
}

impl StreamConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
