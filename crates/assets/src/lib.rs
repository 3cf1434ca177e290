//! Shared resources: the generic named registry plus shader and texture
//! descriptors and the manifest that lists them.
//!
//! # Invariants
//! - A registry holds at most one entry per name; the latest registration wins.
//! - Only `clean_up_all` runs entry clean-up; replacement and `unregister` don't.

mod manifest;
mod registry;
mod resources;

pub use manifest::AssetManifest;
pub use registry::{Manageable, Registry};
pub use resources::{
    DEFAULT_DOMAIN, Shader, ShaderRegistry, ShaderStage, Texture, TextureRegistry,
    content_fingerprint,
};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{kind} {name:?} listed twice in the asset manifest")]
    DuplicateEntry { kind: &'static str, name: String },
}

pub fn crate_info() -> &'static str {
    "renderstar-assets v0.1.0"
}
