use serde::{Deserialize, Serialize};

use super::defaults;

/// Escalation queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Tickets buffered for delivery before new ones spill to the backlog. Default: 256.
    pub channel_capacity: usize,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            channel_capacity: defaults::DEFAULT_ESCALATION_CHANNEL_CAPACITY,
        }
    }
}
