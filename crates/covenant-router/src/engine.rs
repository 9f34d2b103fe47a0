//! ModelRouter — maps a complexity tier to a model, and executes a single
//! generation call with timeout, bounded retry, and a circuit breaker
//! (§4.2).

use covenant_core::config::RouterConfig;
use covenant_core::errors::{CovenantError, CovenantResult};
use covenant_core::models::{ComplexityTier, GenerationResult};
use covenant_core::traits::model_provider::{GenerationConfig, ModelProvider};
use tracing::{info, warn};

use crate::breaker::{Admission, CircuitBreaker};
use crate::retry::backoff_delay;

/// Generic over the provider so tests can inject a scripted fault stream
/// (§8: "given an injected fault stream [Transient, Transient, OK]...").
pub struct ModelRouter<P: ModelProvider> {
    provider: P,
    config: RouterConfig,
    breaker: CircuitBreaker,
}

/// Extra knobs a caller may override for one `generate` call (§4.2's
/// `generate(..., *, thinking_budget?, system_instruction?, timeout?)`).
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub thinking_budget: Option<u64>,
    pub system_instruction: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl<P: ModelProvider> ModelRouter<P> {
    pub fn new(provider: P, config: RouterConfig) -> Self {
        let breaker = CircuitBreaker::new(
            config.breaker_fail_max,
            std::time::Duration::from_secs(config.breaker_reset_after_secs),
        );
        Self { provider, config, breaker }
    }

    pub async fn generate(
        &self,
        prompt: &str,
        complexity: ComplexityTier,
        options: GenerateOptions,
    ) -> CovenantResult<GenerationResult> {
        let tier = self
            .config
            .tiers
            .get(&complexity)
            .ok_or_else(|| CovenantError::ConfigError(format!("no tier entry for {complexity:?}")))?;

        if self.breaker.admit() == Admission::Rejected {
            warn!(?complexity, "router breaker open, rejecting call");
            return Err(CovenantError::ServiceUnavailable("model router breaker is open".into()));
        }

        let thinking_budget = if complexity == ComplexityTier::Reasoning { options.thinking_budget } else { None };
        let gen_config = GenerationConfig {
            thinking_budget,
            system_instruction: options.system_instruction.clone(),
        };

        let requested_timeout = options.timeout_secs.unwrap_or(self.config.default_timeout_secs);
        let timeout = std::time::Duration::from_secs(requested_timeout.min(self.config.max_timeout_secs));

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(attempt - 1, self.config.backoff_base_secs, self.config.backoff_cap_secs);
                tokio::time::sleep(delay).await;
            }

            let call = self.provider.generate(&tier.model, prompt, &gen_config);
            let outcome = tokio::time::timeout(timeout, call).await;

            let result = match outcome {
                Ok(Ok(output)) => Ok(output),
                Ok(Err(err)) => Err(err),
                Err(_) => Err(CovenantError::Timeout(timeout)),
            };

            match result {
                Ok(output) => {
                    self.breaker.on_success();
                    let cost = Self::compute_cost(
                        output.input_tokens,
                        output.output_tokens,
                        output.thinking_tokens,
                        tier.price.in_per_million,
                        tier.price.out_per_million,
                    );
                    return Ok(GenerationResult {
                        text: output.text,
                        model: tier.model.clone(),
                        input_tokens: output.input_tokens,
                        output_tokens: output.output_tokens,
                        thinking_tokens: output.thinking_tokens,
                        cost,
                    });
                }
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    info!(attempt, error = %err, "router retrying after transient failure");
                    continue;
                }
                Err(err) => {
                    self.breaker.on_failure();
                    return Err(err);
                }
            }
        }

        unreachable!("the loop above always returns on its last iteration")
    }

    pub async fn embed(&self, texts: &[String]) -> CovenantResult<Vec<Vec<f32>>> {
        self.provider.embed(texts).await
    }

    fn compute_cost(input_tokens: u64, output_tokens: u64, thinking_tokens: u64, in_price: f64, out_price: f64) -> f64 {
        let mut cost = (input_tokens as f64) * in_price / 1e6 + (output_tokens as f64) * out_price / 1e6;
        if thinking_tokens > 0 {
            cost += (thinking_tokens as f64) * in_price / 1e6;
        }
        cost
    }
}
