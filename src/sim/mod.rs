//! Game simulation module
//!
//! All gameplay decisions live here. The host engine is reached only
//! through traits:
//! - `SceneEngine` for nodes, bodies and visibility
//! - `MotionSource` for tilt readings
//! - `AudioCuePlayer` (in `crate::audio`) for sound cues
//!
//! Time only moves when the host calls `GameController::on_frame_tick`.

pub mod category;
pub mod controller;
pub mod motion;
pub mod scene;
pub mod scheduler;
pub mod state;

pub use category::{CollisionCategory, ContactResponse};
pub use controller::GameController;
pub use motion::{MotionSampler, MotionSource, TiltSample, tilt_to_force};
pub use scene::{Contact, NodeId, SceneEngine, SceneNodes, SetupError, Transform};
pub use scheduler::{ScheduledAction, Scheduler};
pub use state::{GameEvent, GamePhase, GameState};
