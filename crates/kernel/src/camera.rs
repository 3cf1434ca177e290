use glam::{Mat4, Vec3};
use renderstar_common::NodeId;

use crate::component::Component;
use crate::scene::Scene;

/// View and projection matrices handed to every render hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub view: Mat4,
    pub projection: Mat4,
    pub position: Vec3,
}

impl CameraView {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            position: Vec3::ZERO,
        }
    }
}

/// Perspective lens. Its node's Transform supplies position and orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Width over height of the target surface.
    pub aspect: f32,
}

impl Camera {
    pub fn new(fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            fov_degrees,
            near,
            far,
            ..Self::default()
        }
    }

    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.01,
            far: 500.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Component for Camera {}

impl Scene {
    /// Left-handed view looking along the node's forward axis, combined with
    /// the node's [`Camera`] projection.
    ///
    /// `None` if the node is missing or has no Camera.
    pub fn camera_view(&self, id: NodeId) -> Option<CameraView> {
        let camera = self.get_component::<Camera>(id)?;
        let position = self.world_position(id)?;
        let forward = self.forward(id)?;
        Some(CameraView {
            view: Mat4::look_to_lh(position, forward, Vec3::Y),
            projection: camera.projection(),
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn default_lens() {
        let camera = Camera::default();
        assert_eq!(camera.fov_degrees, 45.0);
        assert_eq!(camera.near, 0.01);
        assert_eq!(camera.far, 500.0);
    }

    #[test]
    fn view_requires_camera_component() {
        let mut scene = Scene::new();
        let id = scene.create_node("Eye");
        assert!(scene.camera_view(id).is_none());
        scene.attach_component(id, Camera::default()).unwrap();
        assert!(scene.camera_view(id).is_some());
    }

    #[test]
    fn point_ahead_of_camera_projects_to_center() {
        let mut scene = Scene::new();
        let id = scene.create_node("Eye");
        scene.set_local_position(id, Vec3::new(0.0, 0.0, -5.0));
        scene.attach_component(id, Camera::default()).unwrap();

        let view = scene.camera_view(id).unwrap();
        assert!(view.position.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));

        let clip = view.view_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn camera_follows_parent() {
        let mut scene = Scene::new();
        let player = scene.create_node("Player");
        let eye = scene.create_child(player, "Eye").unwrap();
        scene.attach_component(eye, Camera::default()).unwrap();
        scene.set_local_position(player, Vec3::new(3.0, 0.0, 0.0));

        let view = scene.camera_view(eye).unwrap();
        assert!(view.position.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn default_view_is_identity() {
        assert_eq!(CameraView::default().view_projection(), Mat4::IDENTITY);
    }
}
