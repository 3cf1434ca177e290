use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use glam::{Mat4, Vec3};
use renderstar_common::NodeId;

use crate::camera::CameraView;
use crate::node::Node;
use crate::scene::Scene;
use crate::transform::Transform;

/// Type-erased access to a concrete component.
///
/// Implemented for every `'static` type, so components never write it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A behaviour unit attached to exactly one node.
///
/// All hooks default to no-ops. While a hook runs the component is held
/// outside its node, so the context can reach sibling components and the rest
/// of the scene; a lookup of the running component itself yields `None`.
pub trait Component: AsAny {
    /// Called once, right after the component is attached.
    fn initialize(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Called once per frame from [`Scene::update_all`].
    fn update(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Called once per frame from [`Scene::render_all`].
    fn render(&mut self, _ctx: &mut ComponentContext<'_>, _camera: &CameraView) {}

    /// Called exactly once when the owning node is destroyed.
    ///
    /// Not called by [`Scene::remove_component`].
    fn clean_up(&mut self) {}
}

/// Identifies a component type. Equality and ordering use the `TypeId` only.
#[derive(Debug, Clone, Copy)]
pub struct ComponentTag {
    id: TypeId,
    name: &'static str,
}

impl ComponentTag {
    pub fn of<T: Component>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(index) => &self.name[index + 2..],
            None => self.name,
        }
    }

    pub fn is<T: Component>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for ComponentTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentTag {}

impl PartialOrd for ComponentTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComponentTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for ComponentTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for ComponentTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

/// What a lifecycle hook sees: the owning node and the scene around it.
pub struct ComponentContext<'a> {
    scene: &'a mut Scene,
    owner: NodeId,
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(scene: &'a mut Scene, owner: NodeId) -> Self {
        Self { scene, owner }
    }

    /// The node this component is attached to.
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn scene(&self) -> &Scene {
        &*self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut *self.scene
    }

    pub fn node(&self) -> Option<&Node> {
        self.scene.get(self.owner)
    }

    /// A sibling component on the owning node.
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.scene.get_component::<T>(self.owner)
    }

    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.scene.get_component_mut::<T>(self.owner)
    }

    pub fn has<T: Component>(&self) -> bool {
        self.scene.has_component::<T>(self.owner)
    }

    pub fn transform(&self) -> Option<&Transform> {
        self.node().map(Node::transform)
    }

    /// World matrix of the owner, identity if the owner was destroyed.
    pub fn world_matrix(&self) -> Mat4 {
        self.scene
            .world_matrix(self.owner)
            .unwrap_or(Mat4::IDENTITY)
    }

    pub fn world_position(&self) -> Vec3 {
        self.world_matrix().w_axis.truncate()
    }
}
