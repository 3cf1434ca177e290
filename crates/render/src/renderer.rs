use renderstar_common::NodeId;
use renderstar_kernel::{CameraView, Scene};

use crate::mesh::{Mesh, ShaderBinding, TextureBinding};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and a camera and produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen from `camera`.
    fn render(&self, scene: &Scene, camera: &CameraView) -> Self::Output;
}

/// Renders the scene as indented text: one line per node, with its world
/// position and what it draws.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }

    fn node(&self, scene: &Scene, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = scene.get(id) else {
            return;
        };
        let p = scene.world_position(id).unwrap_or_default();
        out.push_str(&format!(
            "{:indent$}- {} [{}] pos=({:.2}, {:.2}, {:.2})",
            "",
            node.name(),
            id,
            p.x,
            p.y,
            p.z,
            indent = depth * 2
        ));
        if !node.is_active() {
            out.push_str(" (inactive)");
        }
        if let Some(mesh) = node.component::<Mesh>() {
            let shader = node
                .component::<ShaderBinding>()
                .map_or("-", |b| b.shader.as_str());
            out.push_str(&format!(
                " mesh(tris={}, shader={}",
                mesh.triangle_count(),
                shader
            ));
            if let Some(texture) = node.component::<TextureBinding>() {
                out.push_str(&format!(", texture={}", texture.texture));
            }
            out.push(')');
        }
        out.push('\n');

        for child in node.children() {
            self.node(scene, *child, depth + 1, out);
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, camera: &CameraView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene (nodes={}, roots={}) ===\n",
            scene.node_count(),
            scene.root_count()
        ));
        let eye = camera.position;
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1})\n",
            eye.x, eye.y, eye.z
        ));
        for (_, root) in scene.roots() {
            self.node(scene, root, 0, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register_capabilities;
    use glam::Vec3;

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = Scene::new();
        let output = DebugTextRenderer::new().render(&scene, &CameraView::default());

        assert!(output.contains("nodes=0"));
        assert!(output.contains("roots=0"));
    }

    #[test]
    fn debug_renderer_lists_hierarchy() {
        let mut scene = Scene::new();
        register_capabilities(&mut scene);
        let root = scene.create_node("Root");
        scene.set_local_position(root, Vec3::new(1.0, 2.0, 3.0));
        let child = scene.create_child(root, "Square").unwrap();
        scene.attach_component(child, Mesh::square()).unwrap();
        scene
            .attach_component(child, TextureBinding::new("brick"))
            .unwrap();

        let output = DebugTextRenderer::new().render(&scene, &CameraView::default());
        assert!(output.contains("nodes=2"));
        assert!(output.contains("- Root"));
        assert!(output.contains("  - Square"));
        assert!(output.contains("pos=(1.00, 2.00, 3.00)"));
        assert!(output.contains("mesh(tris=2, shader=default, texture=brick)"));
    }

    #[test]
    fn inactive_nodes_are_marked() {
        let mut scene = Scene::new();
        let root = scene.create_node("Hidden");
        scene.set_active(root, false);
        let output = DebugTextRenderer::new().render(&scene, &CameraView::default());
        assert!(output.contains("Hidden"));
        assert!(output.contains("(inactive)"));
    }
}
