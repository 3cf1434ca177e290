//! Engine: owns a scene and its shared resources and drives them one frame
//! at a time.
//!
//! # Invariants
//! - Each frame runs mod updates, then scene updates, then rendering.
//! - Every engine is an independent context; nothing is process-global.
//! - Mods are linked statically and registered before pre-initialization.

mod config;
mod context;
mod engine;
mod lifecycle;
mod modding;

pub use config::EngineConfig;
pub use context::EngineContext;
pub use engine::{Engine, Phase};
pub use lifecycle::{CleanUpEvent, FrameEvent, InitializeEvent, PreInitializeEvent};
pub use modding::{Mod, ModManager, ModRegistration};

use renderstar_assets::AssetError;
use renderstar_kernel::SceneError;

/// Errors from engine setup and mod hooks.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("a mod with registry name {0:?} is already loaded")]
    DuplicateMod(String),
    #[error("cannot {operation} while the engine is {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

pub fn crate_info() -> &'static str {
    "renderstar-engine v0.1.0"
}
