use serde::{Deserialize, Serialize};

/// A discrete class of model request (GLOSSARY). Ord is derived so the type
/// can key a `BTreeMap` in `RouterConfig::tiers` deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    Simple,
    Balanced,
    Complex,
    Reasoning,
}

/// Result of a single ModelRouter.generate call (§4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub thinking_tokens: u64,
    pub cost: f64,
}
