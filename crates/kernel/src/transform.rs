//! Local pose plus a lazily recomputed world matrix.
//!
//! # Invariants
//! - A clean Transform's cached matrix equals `parent_world * local` as of the
//!   last write anywhere on its ancestor chain.
//! - Dirtiness only propagates on a Clean -> Dirty edge; an already dirty
//!   Transform never re-walks its subtree.
//! - If a Transform is clean, every ancestor is clean too.

use std::cell::Cell;

use glam::{Mat4, Vec3};
use renderstar_common::{NodeId, Pose, wrap_degrees};

use crate::component::Component;
use crate::scene::Scene;

/// The always-present component holding a node's pose.
///
/// Mutation goes through [`Scene`] so that descendants can be invalidated;
/// this type only exposes reads.
#[derive(Debug, Clone)]
pub struct Transform {
    pose: Pose,
    world: Cell<Mat4>,
    dirty: Cell<bool>,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self::from_pose(Pose::new(position, rotation, scale))
    }

    pub fn from_pose(pose: Pose) -> Self {
        Self {
            pose,
            world: Cell::new(Mat4::IDENTITY),
            dirty: Cell::new(true),
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn local_position(&self) -> Vec3 {
        self.pose.position
    }

    /// Euler angles in degrees (pitch, yaw, roll).
    pub fn local_rotation(&self) -> Vec3 {
        self.pose.rotation
    }

    pub fn local_scale(&self) -> Vec3 {
        self.pose.scale
    }

    pub fn local_matrix(&self) -> Mat4 {
        self.pose.matrix()
    }

    /// True while the cached world matrix is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Returns true on the Clean -> Dirty edge.
    fn mark_dirty(&self) -> bool {
        !self.dirty.replace(true)
    }

    fn cached(&self) -> Option<Mat4> {
        (!self.dirty.get()).then(|| self.world.get())
    }

    fn store(&self, world: Mat4) {
        self.world.set(world);
        self.dirty.set(false);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_pose(Pose::IDENTITY)
    }
}

impl Component for Transform {}

impl Scene {
    /// Replace the whole local pose of `id`.
    pub fn set_local_pose(&mut self, id: NodeId, pose: Pose) -> bool {
        self.write_pose(id, |p| *p = pose)
    }

    pub fn set_local_position(&mut self, id: NodeId, position: Vec3) -> bool {
        self.write_pose(id, |p| p.position = position)
    }

    /// Assign Euler degrees as given, without wrapping.
    pub fn set_local_rotation(&mut self, id: NodeId, rotation: Vec3) -> bool {
        self.write_pose(id, |p| p.rotation = rotation)
    }

    pub fn set_local_scale(&mut self, id: NodeId, scale: Vec3) -> bool {
        self.write_pose(id, |p| p.scale = scale)
    }

    pub fn translate(&mut self, id: NodeId, delta: Vec3) -> bool {
        self.write_pose(id, |p| p.position += delta)
    }

    /// Rotate by `delta` degrees; each resulting angle is wrapped into `[0, 360)`.
    pub fn rotate(&mut self, id: NodeId, delta: Vec3) -> bool {
        self.write_pose(id, |p| {
            let r = p.rotation + delta;
            p.rotation = Vec3::new(wrap_degrees(r.x), wrap_degrees(r.y), wrap_degrees(r.z));
        })
    }

    /// Add `delta` to the local scale.
    pub fn scale_by(&mut self, id: NodeId, delta: Vec3) -> bool {
        self.write_pose(id, |p| p.scale += delta)
    }

    /// World matrix of `id`, recomputed only if dirty.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let node = self.nodes.get(&id)?;
        let transform = node.transform();
        if let Some(world) = transform.cached() {
            return Some(world);
        }
        let local = transform.local_matrix();
        let world = match node.parent().and_then(|parent| self.world_matrix(parent)) {
            Some(parent_world) => parent_world * local,
            None => local,
        };
        transform.store(world);
        self.world_recomputes.set(self.world_recomputes.get() + 1);
        Some(world)
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.w_axis.truncate())
    }

    /// Local +Z carried into world space (scale included).
    pub fn forward(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.transform_vector3(Vec3::Z))
    }

    pub fn right(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.transform_vector3(Vec3::X))
    }

    pub fn up(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.transform_vector3(Vec3::Y))
    }

    /// Number of Transforms switched from clean to dirty so far.
    pub fn dirty_propagations(&self) -> u64 {
        self.dirty_propagations
    }

    /// Number of world matrices recomputed so far.
    pub fn world_recomputes(&self) -> u64 {
        self.world_recomputes.get()
    }

    fn write_pose(&mut self, id: NodeId, write: impl FnOnce(&mut Pose)) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        let mut pose = node.transform().pose();
        write(&mut pose);
        node.transform_mut().set_pose(pose);
        self.invalidate(id);
        true
    }

    /// Mark `id` dirty and, on the clean -> dirty edge, its whole subtree.
    pub(crate) fn invalidate(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            if node.transform().mark_dirty() {
                self.dirty_propagations += 1;
                stack.extend(node.children().iter().copied());
            }
        }
    }
}
