//! Per-match state arena.
//!
//! Each match is an independent unit of mutable state behind its own
//! `tokio::sync::Mutex`; every mutation is serialized through that lock,
//! and filtered reads snapshot under the same lock. The only cross-match
//! shared state is the read-only configuration.

use std::collections::HashMap;
use std::sync::Arc;

use gambit_core::config::GameConfig;
use gambit_core::dto::ViewerState;
use tokio::sync::{Mutex, RwLock};

use crate::filter::{self, Viewer};
use crate::state::GameState;

pub struct MatchArena {
    games: RwLock<HashMap<String, Arc<Mutex<GameState>>>>,
    config: GameConfig,
}

impl MatchArena {
    pub fn new(config: GameConfig) -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Create a match, or return the existing one for the id.
    pub async fn create(&self, id: &str) -> Arc<Mutex<GameState>> {
        let mut games = self.games.write().await;
        games
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::info!(game = id, "match created");
                Arc::new(Mutex::new(GameState::new(id, self.config.clone())))
            })
            .clone()
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<GameState>>> {
        self.games.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &str) {
        self.games.write().await.remove(id);
    }

    /// Snapshot a viewer projection under the match lock.
    pub async fn view(&self, id: &str, viewer: Viewer) -> Option<ViewerState> {
        let game = self.get(id).await?;
        let state = game.lock().await;
        Some(filter::for_viewer(&state, viewer))
    }
}
