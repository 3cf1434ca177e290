use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::AssetError;
use crate::registry::{Manageable, Registry};

/// Asset domain used when a descriptor does not name one.
pub const DEFAULT_DOMAIN: &str = "renderstar";

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

/// First eight bytes of the SHA-256 of `bytes`, little endian.
pub fn content_fingerprint(bytes: &[u8]) -> u64 {
    let digest = Sha256::digest(bytes);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head)
}

/// Shader program stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

impl ShaderStage {
    fn suffix(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "Vertex",
            ShaderStage::Pixel => "Pixel",
        }
    }
}

/// Descriptor of a shader program. The backend compiles it from the stage
/// sources under `Assets/<domain>/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shader {
    pub name: String,
    pub local_path: String,
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default)]
    pub uses_constant_buffer: bool,
    #[serde(default)]
    pub uses_sampler: bool,
    #[serde(skip)]
    released: bool,
}

impl Shader {
    pub fn new(name: impl Into<String>, local_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_path: local_path.into(),
            domain: default_domain(),
            uses_constant_buffer: false,
            uses_sampler: false,
            released: false,
        }
    }

    pub fn in_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_constant_buffer(mut self) -> Self {
        self.uses_constant_buffer = true;
        self
    }

    pub fn with_sampler(mut self) -> Self {
        self.uses_sampler = true;
        self
    }

    /// Source file of one stage, relative to the asset root.
    pub fn stage_path(&self, stage: ShaderStage) -> PathBuf {
        PathBuf::from("Assets")
            .join(&self.domain)
            .join(format!("{}{}.hlsl", self.local_path, stage.suffix()))
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Manageable for Shader {
    fn name(&self) -> &str {
        &self.name
    }

    fn clean_up(&mut self) {
        self.released = true;
    }
}

/// Descriptor of an image texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub name: String,
    pub local_path: String,
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Content fingerprint of the image file, once read.
    #[serde(default)]
    pub fingerprint: Option<u64>,
    #[serde(skip)]
    released: bool,
}

impl Texture {
    pub fn new(name: impl Into<String>, local_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_path: local_path.into(),
            domain: default_domain(),
            fingerprint: None,
            released: false,
        }
    }

    pub fn in_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Image file, relative to the asset root.
    pub fn path(&self) -> PathBuf {
        PathBuf::from("Assets")
            .join(&self.domain)
            .join(&self.local_path)
    }

    /// Fingerprint the image bytes.
    pub fn fingerprint_bytes(&mut self, bytes: &[u8]) -> u64 {
        let fingerprint = content_fingerprint(bytes);
        self.fingerprint = Some(fingerprint);
        fingerprint
    }

    /// Read the image under `root` and fingerprint it.
    pub fn fingerprint_file(&mut self, root: impl AsRef<Path>) -> Result<u64, AssetError> {
        let bytes = std::fs::read(root.as_ref().join(self.path()))?;
        Ok(self.fingerprint_bytes(&bytes))
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Manageable for Texture {
    fn name(&self) -> &str {
        &self.name
    }

    fn clean_up(&mut self) {
        self.released = true;
    }
}

pub type ShaderRegistry = Registry<Shader>;
pub type TextureRegistry = Registry<Texture>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_stage_paths() {
        let shader = Shader::new("default", "Shader/Default");
        assert_eq!(
            shader.stage_path(ShaderStage::Vertex),
            PathBuf::from("Assets/renderstar/Shader/DefaultVertex.hlsl")
        );
        assert_eq!(
            shader.stage_path(ShaderStage::Pixel),
            PathBuf::from("Assets/renderstar/Shader/DefaultPixel.hlsl")
        );
    }

    #[test]
    fn texture_path_uses_domain() {
        let texture = Texture::new("brick", "Texture/Brick.png").in_domain("demo");
        assert_eq!(texture.path(), PathBuf::from("Assets/demo/Texture/Brick.png"));
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        assert_eq!(content_fingerprint(b"brick"), content_fingerprint(b"brick"));
        assert_ne!(content_fingerprint(b"brick"), content_fingerprint(b"stone"));
    }

    #[test]
    fn fingerprint_file_reads_under_root() {
        let root = tempfile::tempdir().unwrap();
        let mut texture = Texture::new("brick", "Brick.png");
        let dir = root.path().join("Assets").join(DEFAULT_DOMAIN);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Brick.png"), b"not really a png").unwrap();

        let fingerprint = texture.fingerprint_file(root.path()).unwrap();
        assert_eq!(fingerprint, content_fingerprint(b"not really a png"));
        assert_eq!(texture.fingerprint, Some(fingerprint));
    }

    #[test]
    fn fingerprint_missing_file_is_io_error() {
        let root = tempfile::tempdir().unwrap();
        let mut texture = Texture::new("brick", "Missing.png");
        let err = texture.fingerprint_file(root.path()).unwrap_err();
        assert!(matches!(err, AssetError::Io(_)));
        assert!(texture.fingerprint.is_none());
    }

    #[test]
    fn unregistered_shader_is_released_by_its_owner() {
        let mut shaders = ShaderRegistry::new();
        shaders.register(Shader::new("default", "Shader/Default"));
        let mut shader = shaders.unregister("default").unwrap();
        assert!(!shader.is_released());
        shader.clean_up();
        assert!(shader.is_released());
    }

    #[test]
    fn clean_up_all_empties_both_registries() {
        let mut shaders = ShaderRegistry::new();
        shaders.register(Shader::new("default", "Shader/Default"));
        shaders.register(Shader::new("unlit", "Shader/Unlit"));
        let mut textures = TextureRegistry::new();
        textures.register(Texture::new("brick", "Texture/Brick.png"));

        shaders.clean_up_all();
        textures.clean_up_all();
        assert!(shaders.is_empty());
        assert!(textures.is_empty());
    }
}
