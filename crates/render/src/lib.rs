//! Drawable components and the renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the scene; they never mutate it.
//! - A [`Mesh`] never sits on a node without a [`ShaderBinding`] once the
//!   requirements from [`register_capabilities`] are declared.
//!
//! The GPU backend is outside this crate. [`DebugTextRenderer`] stands in for
//! it; the trait is stable, so a backend can replace it without touching
//! consumers.

mod mesh;
mod renderer;

pub use mesh::{Mesh, ShaderBinding, TextureBinding, Vertex};
pub use renderer::{DebugTextRenderer, Renderer};

use renderstar_kernel::Scene;

/// Declare the component requirements of the drawable components.
pub fn register_capabilities(scene: &mut Scene) {
    scene.declare_requirement::<Mesh, ShaderBinding>();
}

pub fn crate_info() -> &'static str {
    "renderstar-render v0.1.0"
}
