//! Transdrill · Translation Practice Backend
//!
//! - Axum HTTP + WebSocket API
//! - Optional translation bridge (OpenAI or LibreTranslate, via MT_PROVIDER)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   TRAINER_CONFIG_PATH : path to TOML config (scoring, paths, bridge, prompts)
//!   MT_PROVIDER         : "openai" | "libre"; unset disables the bridge
//!   OPENAI_API_KEY      : credentials for the openai bridge
//!   LIBRE_URL           : default "http://localhost:5000"
//!   SCORE_SCALE / SCORE_OFFSET / PENALTY_FACTOR : scoring knobs
//!   REFS_DIR / TEXT_ROOT / SETTINGS_PATH        : data locations
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use transdrill_backend::config::TrainerConfig;
use transdrill_backend::routes::build_router;
use transdrill_backend::state::AppState;
use transdrill_backend::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared application state (reference packs, bridge, sessions).
  let state = Arc::new(AppState::new(TrainerConfig::from_env()));

  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "transdrill_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
