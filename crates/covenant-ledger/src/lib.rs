//! # covenant-ledger
//!
//! The cost accounting store: records every model call and serves daily
//! and ranged aggregates, broken down by model and operation, with bounded
//! retention (§4.1).

pub mod engine;
pub mod store;

pub use engine::CostLedger;
pub use store::MokaLedgerStore;
