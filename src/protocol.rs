//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::EvaluationResult;
use crate::session::SentenceTurn;
use crate::settings::LearnerSettings;
use crate::state::{SessionAnswer, SessionInfo};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Evaluate {
        #[serde(rename = "sourceText")]
        source_text: String,
        #[serde(rename = "userText")]
        user_text: String,
        #[serde(rename = "sourceLang", default)]
        source_lang: Option<String>,
    },
    ListLanguages,
    ListCategories {
        lang: String,
    },
    StartSession {
        #[serde(default)]
        lang: Option<String>,
        category: String,
        #[serde(default)]
        rounds: Option<usize>,
    },
    NextSentence {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    SubmitAnswer {
        #[serde(rename = "sessionId")]
        session_id: String,
        answer: String,
    },
    EndSession {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    GetSettings,
    ReloadRefs {
        lang: String,
    },
    SaveSettings {
        #[serde(rename = "srcLang")]
        src_lang: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Evaluation {
        #[serde(flatten)]
        result: EvaluationResult,
    },
    Languages {
        languages: Vec<String>,
    },
    Categories {
        lang: String,
        categories: Vec<String>,
    },
    Session {
        #[serde(flatten)]
        session: SessionOut,
    },
    Sentence {
        #[serde(flatten)]
        turn: SentenceTurn,
    },
    AnswerResult {
        #[serde(flatten)]
        answer: AnswerOut,
    },
    SessionEnded {
        #[serde(rename = "sessionId")]
        session_id: String,
        existed: bool,
    },
    Settings {
        #[serde(flatten)]
        settings: SettingsOut,
    },
    RefsReloaded {
        #[serde(flatten)]
        reload: RefsReloadOut,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct EvaluateIn {
    #[serde(rename = "sourceText")]
    pub source_text: String,
    #[serde(rename = "userText")]
    pub user_text: String,
    /// Falls back to the saved learner settings.
    #[serde(rename = "sourceLang", default)]
    pub source_lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoriesQuery {
    pub lang: String,
}
#[derive(Serialize)]
pub struct CategoriesOut {
    pub lang: String,
    pub categories: Vec<String>,
}

#[derive(Serialize)]
pub struct LanguagesOut {
    pub languages: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct StartSessionIn {
    #[serde(default)]
    pub lang: Option<String>,
    pub category: String,
    #[serde(default)]
    pub rounds: Option<usize>,
}
#[derive(Debug, Serialize)]
pub struct SessionOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub lang: String,
    pub category: String,
    pub total: usize,
}

impl From<SessionInfo> for SessionOut {
    fn from(s: SessionInfo) -> Self {
        Self { session_id: s.id, lang: s.lang, category: s.category, total: s.total }
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionRef {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub answer: String,
}
#[derive(Debug, Serialize)]
pub struct AnswerOut {
    pub sentence: String,
    pub round: usize,
    pub total: usize,
    #[serde(flatten)]
    pub result: EvaluationResult,
}

impl From<SessionAnswer> for AnswerOut {
    fn from(a: SessionAnswer) -> Self {
        Self { sentence: a.sentence, round: a.round, total: a.total, result: a.result }
    }
}

#[derive(Debug, Serialize)]
pub struct EndOut {
    pub existed: bool,
}

#[derive(Debug, Deserialize)]
pub struct SettingsIn {
    #[serde(rename = "srcLang")]
    pub src_lang: String,
}
#[derive(Debug, Serialize)]
pub struct SettingsOut {
    #[serde(rename = "srcLang")]
    pub src_lang: String,
    #[serde(rename = "tgtLang")]
    pub tgt_lang: String,
}

impl From<LearnerSettings> for SettingsOut {
    fn from(s: LearnerSettings) -> Self {
        Self { src_lang: s.src_lang, tgt_lang: s.tgt_lang }
    }
}

#[derive(Debug, Serialize)]
pub struct RefsReloadOut {
    pub lang: String,
    pub items: usize,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub bridge: Option<String>,
}
