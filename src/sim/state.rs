//! Game state and events
//!
//! Everything the controller owns that is not a scene node.

use serde::{Deserialize, Serialize};

use super::category::CollisionCategory;
use super::scene::NodeId;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball waiting at the spawn point for a tap
    TapToPlay,
    /// Tilt controls the ball
    Playing,
    /// Ball fell off; automatic reset pending
    GameOver,
}

/// Things that happened during a controller call, for the host HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    PearlCollected { node: NodeId, score: u64 },
    PearlRespawned { node: NodeId },
    Bumped { node: NodeId, category: CollisionCategory },
    /// Run score entered the high score table at `rank` (1-indexed)
    NewHighScore { score: u64, rank: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Pearls collected this run
    pub score: u64,
    /// Score of the previous run
    pub last_score: u64,
    /// Best score seen, including loaded high scores
    pub best_score: u64,
    /// Incremented on every reset; stale scheduled resets compare against it
    pub run: u32,
    /// Seconds spent Playing this run
    pub run_time: f32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::TapToPlay,
            score: 0,
            last_score: 0,
            best_score: 0,
            run: 0,
            run_time: 0.0,
        }
    }

    /// Score line for the HUD
    pub fn hud_text(&self, show_best: bool) -> String {
        match self.phase {
            GamePhase::TapToPlay => {
                if show_best {
                    format!("Tap to play  (last {}, best {})", self.last_score, self.best_score)
                } else {
                    format!("Tap to play  (last {})", self.last_score)
                }
            }
            GamePhase::Playing if show_best => {
                format!("Pearls {}  Best {}", self.score, self.best_score)
            }
            GamePhase::Playing => format!("Pearls {}", self.score),
            GamePhase::GameOver => format!("Game over  Pearls {}", self.score),
        }
    }
}
