//! Dispatch settings. Deserializable so hosts can embed them in their own config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_RESOLUTION_TTL_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_CACHE_PREFIX: &str = "quill:handler";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// How long a resolved handler binding stays cached.
    pub resolution_ttl_secs: u64,
    /// Prefix of resolution cache keys; the message type name follows.
    pub cache_prefix: String,
}

impl DispatchConfig {
    pub fn resolution_ttl(&self) -> Duration {
        Duration::from_secs(self.resolution_ttl_secs)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            resolution_ttl_secs: DEFAULT_RESOLUTION_TTL_SECS,
            cache_prefix: DEFAULT_CACHE_PREFIX.to_owned(),
        }
    }
}
