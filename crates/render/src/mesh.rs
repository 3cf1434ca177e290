use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use renderstar_assets::{Shader, ShaderRegistry, Texture, TextureRegistry};
use renderstar_kernel::{CameraView, Component, ComponentContext};

/// Per-vertex data in the layout the backend uploads.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// White vertex with a zero normal.
    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            color: [1.0; 3],
            normal: [0.0; 3],
            uv: uv.to_array(),
        }
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal.to_array();
        self
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color.to_array();
        self
    }
}

/// Names the shader, in the shader registry, a node draws with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderBinding {
    pub shader: String,
}

impl ShaderBinding {
    pub fn new(shader: impl Into<String>) -> Self {
        Self {
            shader: shader.into(),
        }
    }

    pub fn resolve<'a>(&self, shaders: &'a ShaderRegistry) -> Option<&'a Shader> {
        shaders.get(&self.shader)
    }
}

impl Default for ShaderBinding {
    fn default() -> Self {
        Self::new("default")
    }
}

impl Component for ShaderBinding {}

/// Names the texture, in the texture registry, sampled by a node's mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBinding {
    pub texture: String,
}

impl TextureBinding {
    pub fn new(texture: impl Into<String>) -> Self {
        Self {
            texture: texture.into(),
        }
    }

    pub fn resolve<'a>(&self, textures: &'a TextureRegistry) -> Option<&'a Texture> {
        textures.get(&self.texture)
    }
}

impl Component for TextureBinding {}

/// Indexed triangle list drawn at its node's world pose.
///
/// Requires a [`ShaderBinding`] on the same node.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    model: Mat4,
    model_view_projection: Mat4,
    draws: u64,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            ..Self::default()
        }
    }

    /// Unit square in the XY plane, centered on the origin.
    pub fn square() -> Self {
        Self::new(
            vec![
                Vertex::new(Vec3::new(-0.5, -0.5, 0.0), Vec2::new(0.0, 1.0)),
                Vertex::new(Vec3::new(-0.5, 0.5, 0.0), Vec2::new(0.0, 0.0)),
                Vertex::new(Vec3::new(0.5, 0.5, 0.0), Vec2::new(1.0, 0.0)),
                Vertex::new(Vec3::new(0.5, -0.5, 0.0), Vec2::new(1.0, 1.0)),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// World matrix used by the last draw.
    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn model_view_projection(&self) -> Mat4 {
        self.model_view_projection
    }

    /// Number of frames this mesh was drawn in.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// True once the buffers were released by `clean_up`.
    pub fn is_released(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }
}

impl Component for Mesh {
    fn render(&mut self, ctx: &mut ComponentContext<'_>, camera: &CameraView) {
        if self.indices.is_empty() {
            return;
        }
        let Some(binding) = ctx.get::<ShaderBinding>() else {
            tracing::warn!(node = %ctx.owner(), "mesh has no shader binding, skipping draw");
            return;
        };
        let shader = binding.shader.clone();

        self.model = ctx.world_matrix();
        self.model_view_projection = camera.view_projection() * self.model;
        self.draws += 1;
        tracing::trace!(
            node = %ctx.owner(),
            shader = %shader,
            triangles = self.triangle_count(),
            "draw mesh"
        );
    }

    fn clean_up(&mut self) {
        self.vertices = Vec::new();
        self.indices = Vec::new();
    }
}
