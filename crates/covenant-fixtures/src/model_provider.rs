//! A `ModelProvider` driven by a fixed script of outcomes, one per call,
//! matching the fake `covenant-router`'s own tests build inline — lifted out
//! here so the pipeline and facade crates can reuse it instead of
//! re-declaring it per test file.

use std::collections::VecDeque;
use std::sync::Mutex;

use covenant_core::errors::CovenantResult;
use covenant_core::traits::model_provider::{GenerationConfig, ModelProvider, ProviderOutput};

pub struct ScriptedProvider {
    generate_script: Mutex<VecDeque<CovenantResult<ProviderOutput>>>,
    embed_script: Mutex<VecDeque<CovenantResult<Vec<Vec<f32>>>>>,
}

impl ScriptedProvider {
    pub fn new(generate_script: Vec<CovenantResult<ProviderOutput>>, embed_script: Vec<CovenantResult<Vec<Vec<f32>>>>) -> Self {
        Self { generate_script: Mutex::new(generate_script.into_iter().collect()), embed_script: Mutex::new(embed_script.into_iter().collect()) }
    }

    /// Convenience for tests that only exercise `generate`; `embed` returns a
    /// zero vector per text so vector-persist stages still succeed.
    pub fn generate_only(generate_script: Vec<CovenantResult<ProviderOutput>>) -> Self {
        Self { generate_script: Mutex::new(generate_script.into_iter().collect()), embed_script: Mutex::new(VecDeque::new()) }
    }
}

impl ModelProvider for ScriptedProvider {
    async fn generate(&self, _model: &str, _prompt: &str, _config: &GenerationConfig) -> CovenantResult<ProviderOutput> {
        self.generate_script
            .lock()
            .expect("scripted provider mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedProvider.generate called more times than its script covers"))
    }

    async fn embed(&self, texts: &[String]) -> CovenantResult<Vec<Vec<f32>>> {
        let mut script = self.embed_script.lock().expect("scripted provider mutex poisoned");
        match script.pop_front() {
            Some(result) => result,
            None => Ok(texts.iter().map(|_| vec![0.0; 4]).collect()),
        }
    }
}

pub fn ok_output(text: &str) -> ProviderOutput {
    ProviderOutput { text: text.to_string(), input_tokens: 100, output_tokens: 50, thinking_tokens: 0 }
}
