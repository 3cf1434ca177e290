//! Shared types for the renderstar crates: node identity, local poses and
//! the angle conventions used by every transform.

mod types;

pub use types::{NodeId, Pose, euler_degrees_to_quat, wrap_degrees};
