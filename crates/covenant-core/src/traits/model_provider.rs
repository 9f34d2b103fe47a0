use crate::errors::CovenantResult;

/// Tuning knobs the router forwards on a single generation call.
#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    /// Honoured only in the REASONING tier; zeroed for the rest (§4.2).
    pub thinking_budget: Option<u64>,
    pub system_instruction: Option<String>,
}

/// Raw provider output before cost is computed (§6: ModelProvider has no
/// notion of price — that lives in `RouterConfig`).
#[derive(Debug, Clone)]
pub struct ProviderOutput {
    pub text: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub thinking_tokens: u64,
}

/// ModelProvider (collaborator used by ModelRouter, §6). A suspension point
/// (§5) — ModelRouter wraps the call in its own timeout rather than relying
/// on the provider to self-cancel.
#[allow(async_fn_in_trait)]
pub trait ModelProvider: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        config: &GenerationConfig,
    ) -> CovenantResult<ProviderOutput>;

    async fn embed(&self, texts: &[String]) -> CovenantResult<Vec<Vec<f32>>>;
}
