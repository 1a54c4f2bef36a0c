//! Transdrill · translation practice engine.
//!
//! Learners get source-language sentences from a no-repeat picker, type an
//! English translation, and receive a 0-5 score plus five suggested
//! translations. Scoring falls back from an external translation bridge to
//! per-language reference packs to a reference-free heuristic.

pub mod bridge;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod logic;
pub mod picker;
pub mod protocol;
pub mod refpack;
pub mod routes;
pub mod scoring;
pub mod session;
pub mod settings;
pub mod state;
pub mod suggest;
pub mod telemetry;
pub mod util;

pub use domain::{DrillItem, EvaluationResult, ReferencePack, Tier, TARGET_LANG};
pub use error::{BridgeError, DrillError};
pub use evaluator::Evaluator;
pub use picker::{SentencePicker, SentencePool};
pub use scoring::ScoreParams;
