//! Scene kernel: nodes, components, transforms and the requirement table.
//!
//! # Invariants
//! - Every node holds exactly one Transform, which cannot be removed.
//! - A node holds at most one component per concrete type.
//! - A node has at most one parent and appears once in that parent's child list.
//! - Destroying a node runs every component's `clean_up` exactly once, parents
//!   before children.
//! - Attaching a component never leaves a declared requirement unsatisfied.

pub mod camera;
pub mod capability;
pub mod component;
pub mod entity;
pub mod node;
pub mod scene;
pub mod transform;

pub use camera::{Camera, CameraView};
pub use capability::{CapabilityError, CapabilityRegistry, Requirement};
pub use component::{AsAny, Component, ComponentContext, ComponentTag};
pub use entity::{Entity, EntityRegistration};
pub use node::Node;
pub use scene::{Scene, SceneError};
pub use transform::Transform;

pub fn crate_info() -> &'static str {
    "renderstar-kernel v0.1.0"
}
