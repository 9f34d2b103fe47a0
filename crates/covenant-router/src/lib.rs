//! # covenant-router
//!
//! ModelRouter: complexity-tiered model selection, per-call timeout,
//! bounded retry with backoff, and a circuit breaker over a `ModelProvider`
//! collaborator (§4.2).

pub mod breaker;
pub mod engine;
pub mod retry;

pub use breaker::{Admission, BreakerState, CircuitBreaker};
pub use engine::{GenerateOptions, ModelRouter};
