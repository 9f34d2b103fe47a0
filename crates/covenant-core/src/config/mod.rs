pub mod ledger_config;
pub mod pipeline_config;
pub mod retrieval_config;
pub mod router_config;

use serde::{Deserialize, Serialize};

pub use ledger_config::LedgerConfig;
pub use pipeline_config::PipelineConfig;
pub use retrieval_config::RetrievalConfig;
pub use router_config::{ModelTierEntry, PriceSchedule, RouterConfig};

/// Top-level configuration aggregating every subsystem config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CovenantConfig {
    pub ledger: LedgerConfig,
    pub router: RouterConfig,
    pub pipeline: PipelineConfig,
    pub retrieval: RetrievalConfig,
}

impl CovenantConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
