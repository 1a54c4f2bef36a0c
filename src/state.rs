//! Application state: evaluator, practice sessions and catalog/settings locations.
//!
//! This module owns:
//!   - the evaluator (reference pack cache, optional translation bridge, score knobs)
//!   - the in-memory practice sessions, keyed by session id
//!   - the text root (sentence catalog) and the learner settings file
//!
//! Evaluation always targets English. Session locks are never held across the
//! bridge call. A session is dropped after its final answer, and sessions idle
//! longer than `SESSION_IDLE_TTL` are pruned whenever a new one starts.

use std::{collections::HashMap, path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::bridge::{build_bridge, TranslationBridge};
use crate::catalog::{list_categories, list_languages, load_pool};
use crate::config::TrainerConfig;
use crate::domain::{EvaluationResult, TARGET_LANG};
use crate::error::DrillError;
use crate::evaluator::Evaluator;
use crate::refpack::ReferenceStore;
use crate::session::{PracticeSession, SentenceTurn};
use crate::settings::{load_settings, save_settings, LearnerSettings};

pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

/// Handle returned when a session starts.
#[derive(Clone, Debug)]
pub struct SessionInfo {
    pub id: String,
    pub lang: String,
    pub category: String,
    pub total: usize,
}

/// Evaluation of a session's current sentence.
#[derive(Clone, Debug)]
pub struct SessionAnswer {
    pub sentence: String,
    pub round: usize,
    pub total: usize,
    pub result: EvaluationResult,
}

#[derive(Clone)]
pub struct AppState {
    pub evaluator: Evaluator,
    pub sessions: Arc<RwLock<HashMap<String, PracticeSession>>>,
    pub text_root: PathBuf,
    pub settings_path: PathBuf,
}

impl AppState {
    /// Build state from configuration, including the configured bridge (if any).
    #[instrument(level = "info", skip_all)]
    pub fn new(cfg: TrainerConfig) -> Self {
        let bridge = build_bridge(&cfg.bridge, &cfg.prompts);
        if bridge.is_none() {
            info!(target: "transdrill_backend", "No translation bridge (MT_PROVIDER unset). Using reference packs and heuristics.");
        }
        Self::with_bridge(cfg, bridge)
    }

    pub fn with_bridge(cfg: TrainerConfig, bridge: Option<Arc<dyn TranslationBridge>>) -> Self {
        info!(
            target: "transdrill_backend",
            refs_dir = %cfg.paths.refs_dir.display(),
            text_root = %cfg.paths.text_root.display(),
            scale = cfg.scoring.scale,
            offset = cfg.scoring.offset,
            "Trainer state ready"
        );
        let store = Arc::new(ReferenceStore::cached(cfg.paths.refs_dir.clone()));
        Self {
            evaluator: Evaluator::new(store, bridge, cfg.scoring),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            text_root: cfg.paths.text_root,
            settings_path: cfg.paths.settings_path,
        }
    }

    /// Score a free-standing translation attempt.
    pub async fn evaluate(&self, source_text: &str, user_text: &str, source_lang: &str) -> EvaluationResult {
        self.evaluator
            .evaluate(source_text, user_text, source_lang, TARGET_LANG)
            .await
    }

    pub fn languages(&self) -> Vec<String> {
        list_languages(&self.text_root)
    }

    pub fn categories(&self, lang: &str) -> Vec<String> {
        list_categories(&self.text_root, lang)
    }

    pub fn settings(&self) -> LearnerSettings {
        load_settings(&self.settings_path)
    }

    pub fn save_settings(&self, settings: LearnerSettings) -> Result<LearnerSettings, DrillError> {
        save_settings(&self.settings_path, settings)
    }

    /// Load the category's pool and register a new session with its own picker.
    #[instrument(level = "info", skip(self), fields(%lang, %category))]
    pub async fn start_session(&self, lang: &str, category: &str, rounds: Option<usize>) -> Result<SessionInfo, DrillError> {
        let pool = load_pool(&self.text_root, lang, category)?;
        self.prune_idle(SESSION_IDLE_TTL).await;
        let id = Uuid::new_v4().to_string();
        let session = PracticeSession::new(id.clone(), lang, category, pool, rounds);
        let info = SessionInfo { id: id.clone(), lang: session.lang.clone(), category: session.category.clone(), total: session.total };
        self.sessions.write().await.insert(id.clone(), session);
        info!(target: "drill", session = %id, total = info.total, "Practice session started");
        Ok(info)
    }

    #[instrument(level = "info", skip(self), fields(%session_id))]
    pub async fn next_sentence(&self, session_id: &str) -> Result<SentenceTurn, DrillError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| DrillError::UnknownSession(session_id.to_string()))?;
        let turn = session.advance(&mut rand::thread_rng())?;
        info!(target: "drill", session = %session_id, round = turn.round, total = turn.total, index = turn.index, "Sentence served");
        Ok(turn)
    }

    /// Evaluate `answer` against the session's current sentence.
    #[instrument(level = "info", skip(self, answer), fields(%session_id, answer_len = answer.len()))]
    pub async fn submit_answer(&self, session_id: &str, answer: &str) -> Result<SessionAnswer, DrillError> {
        let (sentence, lang, round, total, finished) = {
            let sessions = self.sessions.read().await;
            let session = sessions
                .get(session_id)
                .ok_or_else(|| DrillError::UnknownSession(session_id.to_string()))?;
            let sentence = session
                .current()
                .ok_or_else(|| DrillError::NoCurrentSentence(session_id.to_string()))?
                .to_string();
            (sentence, session.lang.clone(), session.round(), session.total, session.is_finished())
        };
        let result = self.evaluate(&sentence, answer, &lang).await;
        if finished && self.sessions.write().await.remove(session_id).is_some() {
            info!(target: "drill", session = %session_id, "Final round answered, session closed");
        }
        Ok(SessionAnswer { sentence, round, total, result })
    }

    /// Drop sessions untouched for at least `ttl`. Returns how many were removed.
    pub async fn prune_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.idle_for() < ttl);
        let pruned = before - sessions.len();
        if pruned > 0 {
            info!(target: "drill", pruned, remaining = sessions.len(), "Idle sessions pruned");
        }
        pruned
    }

    /// Re-read one language's reference pack from disk.
    #[instrument(level = "info", skip(self), fields(%lang))]
    pub fn reload_refs(&self, lang: &str) -> usize {
        let items = self.evaluator.reload_pack(lang);
        info!(target: "drill", %lang, items, "Reference pack reloaded");
        items
    }

    pub async fn end_session(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            info!(target: "drill", session = %session_id, "Practice session ended");
        } else {
            warn!(target: "drill", session = %session_id, "End requested for unknown session");
        }
        removed
    }
}
