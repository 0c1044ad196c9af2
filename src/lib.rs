//! Risk triage for helpline chat transcripts.
//!
//! A cheap keyword pass ([`flag`]) shortlists a corpus; the full analysis
//! ([`score`]) segments a transcript into turns, runs the detectors in
//! [`detect`] and folds their findings into a bounded score. [`identity`]
//! resolves operators and antennas for grouping. [`pipeline`] wires the two
//! stages together for hosts.

pub mod config;
pub mod detect;
pub mod error;
pub mod flag;
pub mod identity;
pub mod ingest;
pub mod output;
pub mod pipeline;
pub mod score;
pub mod transcript;

pub use config::ChatRiskConfig;
pub use error::ConfigError;
pub use pipeline::Pipeline;
pub use score::{RiskAnalyzer, RiskResult, Severity};
