use renderstar_assets::{ShaderRegistry, TextureRegistry};
use renderstar_events::EventBus;
use renderstar_kernel::Scene;

/// Everything a mod can reach: the scene, the shared resource registries and
/// the event bus.
#[derive(Debug, Default)]
pub struct EngineContext {
    pub scene: Scene,
    pub shaders: ShaderRegistry,
    pub textures: TextureRegistry,
    pub events: EventBus,
    pub(crate) frame: u64,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
