use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::AssetError;
use crate::registry::Manageable;
use crate::resources::{Shader, ShaderRegistry, Texture, TextureRegistry};

/// JSON list of the shaders and textures to register at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub shaders: Vec<Shader>,
    #[serde(default)]
    pub textures: Vec<Texture>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shader(mut self, shader: Shader) -> Self {
        self.shaders.push(shader);
        self
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.textures.push(texture);
        self
    }

    pub fn len(&self) -> usize {
        self.shaders.len() + self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty() && self.textures.is_empty()
    }

    /// Names must be unique per kind within one manifest.
    pub fn validate(&self) -> Result<(), AssetError> {
        check_unique("shader", self.shaders.iter().map(Manageable::name))?;
        check_unique("texture", self.textures.iter().map(Manageable::name))
    }

    /// Register every entry. Existing registry entries with the same name are
    /// replaced. Returns the number of entries registered.
    pub fn register_into(
        &self,
        shaders: &mut ShaderRegistry,
        textures: &mut TextureRegistry,
    ) -> Result<usize, AssetError> {
        self.validate()?;
        for shader in &self.shaders {
            shaders.register(shader.clone());
        }
        for texture in &self.textures {
            textures.register(texture.clone());
        }
        tracing::info!(
            shaders = self.shaders.len(),
            textures = self.textures.len(),
            "asset manifest registered"
        );
        Ok(self.len())
    }

    /// Save the manifest to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a manifest from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let manifest: Self = serde_json::from_reader(file)?;
        manifest.validate()?;
        Ok(manifest)
    }
}

fn check_unique<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), AssetError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(AssetError::DuplicateEntry {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::DEFAULT_DOMAIN;

    fn sample() -> AssetManifest {
        AssetManifest::new()
            .with_shader(Shader::new("default", "Shader/Default").with_constant_buffer())
            .with_texture(Texture::new("brick", "Texture/Brick.png"))
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let manifest = sample();
        manifest.save(tmp.path()).unwrap();

        let loaded = AssetManifest::load(tmp.path()).unwrap();
        assert_eq!(loaded, manifest);
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn domain_defaults_when_omitted() {
        let json = r#"{ "shaders": [{ "name": "default", "local_path": "Shader/Default" }] }"#;
        let manifest: AssetManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.shaders[0].domain, DEFAULT_DOMAIN);
        assert!(manifest.textures.is_empty());
    }

    #[test]
    fn register_into_fills_registries() {
        let mut shaders = ShaderRegistry::new();
        let mut textures = TextureRegistry::new();
        let count = sample().register_into(&mut shaders, &mut textures).unwrap();

        assert_eq!(count, 2);
        assert!(shaders.get("default").is_some_and(|s| s.uses_constant_buffer));
        assert!(textures.get("brick").is_some());
    }

    #[test]
    fn duplicate_names_rejected() {
        let manifest = sample().with_texture(Texture::new("brick", "Texture/Other.png"));
        let mut shaders = ShaderRegistry::new();
        let mut textures = TextureRegistry::new();

        let err = manifest.register_into(&mut shaders, &mut textures).unwrap_err();
        assert!(matches!(err, AssetError::DuplicateEntry { kind: "texture", .. }));
        assert!(shaders.is_empty());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AssetManifest::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, AssetError::Io(_)));
    }

    #[test]
    fn load_malformed_file_is_json_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "{ not json").unwrap();
        let err = AssetManifest::load(tmp.path()).unwrap_err();
        assert!(matches!(err, AssetError::Json(_)));
    }
}
