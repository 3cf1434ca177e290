//! Developer tooling: read-only scene inspector.
//!
//! # Invariants
//! - Tools never change a pose, a component or the hierarchy.

mod inspector;

pub use inspector::{NodeInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "renderstar-tools v0.1.0"
}
