use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `risk_level` must stay consistent with `risk_score` bands (§3):
/// 0-3 low, 4-6 medium, 7-10 high. Producers enforce this, not consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// The level implied by a score, per the §3 band invariant.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=3 => RiskLevel::Low,
            4..=6 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcerningClause {
    pub section: String,
    pub concern: String,
    pub risk_level: RiskLevel,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub concerning_clauses: Vec<ConcerningClause>,
    pub key_terms: BTreeMap<String, String>,
}

impl RiskReport {
    /// Validate the §3 band invariant. `analyze_risk` calls this after
    /// parsing the model's JSON and rejects a mismatch as `Integrity`.
    pub fn is_band_consistent(&self) -> bool {
        self.risk_level == RiskLevel::from_score(self.risk_score)
    }
}
