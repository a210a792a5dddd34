//! Serde helper: byte fields as lowercase hex strings.
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Envelope {
//!     #[serde(with = "crate::transaction::serde_hex")]
//!     cipher: Vec<u8>,
//! }
//! ```

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    hex::decode(&text).map_err(serde::de::Error::custom)
}
