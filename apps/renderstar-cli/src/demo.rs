use glam::Vec3;
use renderstar_engine::{EngineContext, EngineError, FrameEvent, Mod, ModRegistration};
use renderstar_kernel::{Camera, Component, ComponentContext, Entity, EntityRegistration};
use renderstar_render::{Mesh, TextureBinding};

/// Turns its node around the Y axis every frame.
#[derive(Debug, Clone, Copy)]
pub struct Spinner {
    pub degrees_per_frame: f32,
}

impl Default for Spinner {
    fn default() -> Self {
        Self {
            degrees_per_frame: 2.0,
        }
    }
}

impl Component for Spinner {
    fn update(&mut self, ctx: &mut ComponentContext<'_>) {
        let owner = ctx.owner();
        ctx.scene_mut()
            .rotate(owner, Vec3::new(0.0, self.degrees_per_frame, 0.0));
    }
}

/// Builds the demo scene: a textured spinning square with an orbiting
/// satellite, watched by a player camera.
pub struct DemoMod {
    pub aspect_ratio: f32,
}

impl Mod for DemoMod {
    fn registration(&self) -> ModRegistration {
        ModRegistration::new("RenderStar Demo", "renderstar_demo")
            .description("Spinning square scene")
            .author("RenderStar")
            .version(env!("CARGO_PKG_VERSION"))
    }

    fn pre_initialize(&mut self, ctx: &mut EngineContext) -> Result<(), EngineError> {
        ctx.events.register(
            |e: &mut FrameEvent| {
                if e.frame % 30 == 0 {
                    tracing::info!(frame = e.frame, "frame");
                }
            },
            0,
        );
        Ok(())
    }

    fn initialize(&mut self, ctx: &mut EngineContext) -> Result<(), EngineError> {
        let scene = &mut ctx.scene;

        let square = scene.create_node("Square");
        scene.attach_component(square, Mesh::square())?;
        scene.attach_component(square, TextureBinding::new("brick"))?;
        scene.attach_component(square, Spinner::default())?;

        let satellite = scene.create_child(square, "Satellite")?;
        scene.set_local_position(satellite, Vec3::new(1.5, 0.0, 0.0));
        scene.set_local_scale(satellite, Vec3::splat(0.25));
        scene.attach_component(satellite, Mesh::square())?;

        let player = scene.create_node("Player");
        scene.set_local_position(player, Vec3::new(0.0, 0.0, -5.0));
        scene.attach_component(player, Entity::new(EntityRegistration::new("player", 20, 0.2)))?;
        let eye = scene.create_child(player, "Camera")?;
        scene.attach_component(eye, Camera::default().with_aspect(self.aspect_ratio))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderstar_engine::{Engine, EngineConfig};

    #[test]
    fn demo_scene_spins() {
        let mut engine = Engine::new(EngineConfig::default());
        engine
            .register_mod(DemoMod {
                aspect_ratio: 16.0 / 9.0,
            })
            .unwrap();
        engine.run_headless(10).unwrap();

        let scene = &engine.context().scene;
        assert_eq!(scene.node_count(), 4);
        let square = scene.find("Square").unwrap();
        let yaw = scene.get(square).unwrap().transform().local_rotation().y;
        assert!((yaw - 20.0).abs() < 1e-4);

        let satellite = scene.children(square)[0];
        let mesh = scene.get_component::<Mesh>(satellite).unwrap();
        assert_eq!(mesh.draws(), 10);

        let player = scene.find("Player").unwrap();
        let entity = scene.get_component::<Entity>(player).unwrap();
        assert_eq!(entity.health(), 20);
        assert!(!entity.is_dead());
    }
}
