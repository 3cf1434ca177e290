use renderstar_assets::{AssetManifest, Shader, Texture};
use renderstar_common::NodeId;
use renderstar_kernel::{Camera, CameraView};

use crate::EngineError;
use crate::config::EngineConfig;
use crate::context::EngineContext;
use crate::lifecycle::{CleanUpEvent, FrameEvent, InitializeEvent, PreInitializeEvent};
use crate::modding::{Mod, ModManager};

/// Where an engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Created,
    PreInitialized,
    Running,
    CleanedUp,
}

/// Frame driver: owns the context and the mods and runs the lifecycle.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    context: EngineContext,
    mods: ModManager,
    phase: Phase,
    camera: Option<NodeId>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            context: EngineContext::new(),
            mods: ModManager::new(),
            phase: Phase::Created,
            camera: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.context
    }

    pub fn mods(&self) -> &ModManager {
        &self.mods
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Load a statically linked mod. Only allowed before pre-initialization.
    pub fn register_mod(&mut self, instance: impl Mod + 'static) -> Result<(), EngineError> {
        self.expect_phase(Phase::Created, "register a mod")?;
        self.mods.register(Box::new(instance))
    }

    /// Create a root node, honouring `strict_names` from the config.
    pub fn create_root(&mut self, name: impl Into<String>) -> Result<NodeId, EngineError> {
        let scene = &mut self.context.scene;
        if self.config.strict_names {
            Ok(scene.try_create_node(name)?)
        } else {
            Ok(scene.create_node(name))
        }
    }

    /// Render through this node's [`Camera`] from now on.
    pub fn set_camera(&mut self, id: NodeId) {
        self.camera = Some(id);
    }

    /// View of the active camera, or the identity view when there is none.
    pub fn camera_view(&self) -> CameraView {
        self.camera
            .and_then(|id| self.context.scene.camera_view(id))
            .unwrap_or_default()
    }

    /// Register shared resources and run mod pre-initialization.
    pub fn pre_initialize(&mut self) -> Result<(), EngineError> {
        self.expect_phase(Phase::Created, "pre-initialize")?;
        let _span = tracing::info_span!("pre_initialize", title = %self.config.title).entered();

        renderstar_render::register_capabilities(&mut self.context.scene);
        match &self.config.manifest {
            Some(path) => {
                let manifest = AssetManifest::load(path)?;
                manifest.register_into(&mut self.context.shaders, &mut self.context.textures)?;
            }
            None => {
                self.context
                    .shaders
                    .register(Shader::new("default", "Shader/Default").with_constant_buffer());
                self.context
                    .textures
                    .register(Texture::new("brick", "Texture/Brick.png"));
            }
        }

        self.context.events.broadcast(&mut PreInitializeEvent::default());
        self.mods.pre_initialize(&mut self.context)?;
        self.phase = Phase::PreInitialized;
        Ok(())
    }

    /// Run mod initialization. The engine is ready for frames afterwards.
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        self.expect_phase(Phase::PreInitialized, "initialize")?;
        let _span = tracing::info_span!("initialize").entered();

        self.context.events.broadcast(&mut InitializeEvent::default());
        self.mods.initialize(&mut self.context)?;
        if self.camera.is_none() {
            self.camera = self.find_camera();
        }
        self.phase = Phase::Running;
        tracing::info!(
            mods = self.mods.len(),
            nodes = self.context.scene.node_count(),
            "engine ready"
        );
        Ok(())
    }

    /// Advance one frame: frame event, mod updates, then scene updates.
    pub fn update(&mut self) {
        if self.phase != Phase::Running {
            tracing::warn!(phase = ?self.phase, "update skipped");
            return;
        }
        self.context.frame += 1;
        let frame = self.context.frame;
        let _span = tracing::debug_span!("frame", frame).entered();

        self.context.events.broadcast(&mut FrameEvent::new(frame));
        self.mods.update(&mut self.context);
        self.context.scene.update_all();
    }

    /// Render the scene through `camera`.
    pub fn render(&mut self, camera: &CameraView) {
        if self.phase != Phase::Running {
            return;
        }
        self.context.scene.render_all(camera);
    }

    /// Tear everything down: mods, the scene, then the registries.
    pub fn clean_up(&mut self) {
        if self.phase == Phase::CleanedUp {
            return;
        }
        let _span = tracing::info_span!("clean_up").entered();
        self.context.events.broadcast(&mut CleanUpEvent::default());
        self.mods.clean_up(&mut self.context);
        self.context.scene.clean_up_all();
        self.context.shaders.clean_up_all();
        self.context.textures.clean_up_all();
        self.context.events.clear();
        self.camera = None;
        self.phase = Phase::CleanedUp;
    }

    /// Initialize if needed, then drive `ticks` frames of update and render.
    /// Returns the number of frames completed so far.
    pub fn run_headless(&mut self, ticks: u64) -> Result<u64, EngineError> {
        if self.phase == Phase::Created {
            self.pre_initialize()?;
        }
        if self.phase == Phase::PreInitialized {
            self.initialize()?;
        }
        self.expect_phase(Phase::Running, "run")?;
        for _ in 0..ticks {
            self.update();
            let view = self.camera_view();
            self.render(&view);
        }
        Ok(self.context.frame)
    }

    fn find_camera(&self) -> Option<NodeId> {
        let scene = &self.context.scene;
        scene.node_ids().find(|id| scene.has_component::<Camera>(*id))
    }

    fn expect_phase(&self, expected: Phase, operation: &'static str) -> Result<(), EngineError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidPhase {
                operation,
                phase: self.phase,
            })
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if self.phase != Phase::Created {
            self.clean_up();
        }
    }
}
