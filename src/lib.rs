//! peaq-core - Perceptual Evaluation of Audio Quality (ITU-R BS.1387, Basic
//! version), distilled from Kabal's reference interpretation.
//!
//! Compares a reference and a test signal and produces the 11 Model Output
//! Variables plus the final Objective Difference Grade. Provides:
//! - Config: `AnalyzerConfig`, tunable per the documented open questions.
//! - Core: `Analyzer`, the stateful per-(ref,test)-pair orchestrator.
//! - Batch: `analyze_many` for independent pairs in parallel.

pub mod adapt;
pub mod aggregate;
pub mod analyzer;
pub mod config;
pub mod ear;
pub mod error;
pub mod fft;
pub mod modulation;
pub mod movs;
pub mod neuralnet;
pub mod spreading;
pub mod tables;
pub mod tconst;
pub mod time_spread;
pub mod window;

pub use analyzer::{analyze_many, Analyzer, PeaqReport};
pub use config::AnalyzerConfig;
pub use error::{PeaqError, Result};
