//! Stage scaffolding shared by AnalysisPipeline: a remaining-time budget
//! decremented as each stage runs (§5, §9 design notes). Stages report
//! outcomes by mutating `ContractAnalysisState` directly and calling
//! `push_error` on failure, not through a separate outcome type.

use std::time::{Duration, Instant};

/// A deadline shared across all stages of one pipeline run, decremented as
/// stages consume it (§5: "a reducing remaining-time budget").
#[derive(Debug, Clone, Copy)]
pub struct DeadlineBudget {
    deadline: Instant,
}

impl DeadlineBudget {
    pub fn starting_now(overall: Duration) -> Self {
        Self { deadline: Instant::now() + overall }
    }

    /// Time left before the overall deadline, zero if already past it.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}
