//! Access-layer configuration.

/// Configuration for the stock and family services.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Unit label reported in stock summaries (default: `unités`).
    pub unit: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            unit: "unités".into(),
        }
    }
}
