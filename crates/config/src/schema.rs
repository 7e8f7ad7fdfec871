//! Config schema types.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CourierConfig {
    pub messages: MessagesConfig,
    pub metrics: MetricsConfig,
}

/// Limits and delivery defaults for outgoing messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Maximum media caption length in UTF-8 bytes.
    pub max_caption_length: usize,
    /// Ask the delivery subsystem not to generate link previews for media
    /// captions.
    pub no_webpage: bool,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            max_caption_length: 4000,
            no_webpage: true,
        }
    }
}

/// Metrics collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Extra labels attached to every metric.
    pub labels: Vec<(String, String)>,
}
