use std::any::Any;
use std::cell::Cell;
use std::collections::BTreeMap;

use renderstar_common::NodeId;

use crate::camera::CameraView;
use crate::capability::{CapabilityError, CapabilityRegistry};
use crate::component::{Component, ComponentContext, ComponentTag};
use crate::node::Node;
use crate::transform::Transform;

/// Errors from scene graph operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("a root node named {0:?} already exists")]
    DuplicateName(String),
    #[error("cannot attach {child} under {parent}: {child} is {parent} or one of its ancestors")]
    HierarchyCycle { parent: NodeId, child: NodeId },
    #[error("{component} was removed from {node} during its initialize hook")]
    Detached {
        node: NodeId,
        component: &'static str,
    },
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

/// A scene graph: the node arena plus the directory of named root nodes.
///
/// Each scene is an independent context; nothing here is process-global.
/// Roots are visited in directory (name) order.
#[derive(Debug, Default)]
pub struct Scene {
    pub(crate) nodes: BTreeMap<NodeId, Node>,
    directory: BTreeMap<String, NodeId>,
    capabilities: CapabilityRegistry,
    pub(crate) dirty_propagations: u64,
    pub(crate) world_recomputes: Cell<u64>,
}

impl Scene {
    /// Create an empty scene with no declared requirements.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capabilities(capabilities: CapabilityRegistry) -> Self {
        Self {
            capabilities,
            ..Default::default()
        }
    }

    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    /// Declare that attaching `T` requires an `R` on the same node.
    pub fn declare_requirement<T: Component, R: Component + Default>(&mut self) -> &mut Self {
        self.capabilities.require::<T, R>();
        self
    }

    // --- Directory ---

    /// Create a root node with a default Transform and register it under `name`.
    ///
    /// An existing root with the same name is replaced: it is destroyed along
    /// with its subtree.
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        let name = name.into();
        let id = self.spawn(name.clone());
        if let Some(previous) = self.directory.insert(name.clone(), id) {
            tracing::warn!(name = %name, replaced = %previous, "root name already registered, replacing");
            self.destroy_subtree(previous);
        }
        tracing::debug!(node = %id, name = %name, "created root node");
        id
    }

    /// Like [`create_node`](Self::create_node), but refuses to replace an
    /// existing root.
    pub fn try_create_node(&mut self, name: impl Into<String>) -> Result<NodeId, SceneError> {
        let name = name.into();
        if self.directory.contains_key(&name) {
            return Err(SceneError::DuplicateName(name));
        }
        Ok(self.create_node(name))
    }

    /// Create a node directly under `parent`. It gets no directory entry.
    pub fn create_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = self.spawn(name.into());
        self.link(parent, id);
        Ok(id)
    }

    /// Look up a root node by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.directory.get(name).copied()
    }

    /// Registered roots, in visiting order.
    pub fn roots(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.directory.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn root_count(&self) -> usize {
        self.directory.len()
    }

    // --- Nodes ---

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Every live node, including detached ones.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(Node::name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(Node::parent)
    }

    /// Children of `id`, empty if the node does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(Node::children).unwrap_or(&[])
    }

    pub fn is_active(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(Node::is_active)
    }

    /// Inactive nodes are skipped, with their subtree, by update and render.
    pub fn set_active(&mut self, id: NodeId, active: bool) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.active = active;
                true
            }
            None => false,
        }
    }

    fn spawn(&mut self, name: String) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(id, Node::new(name));
        id
    }

    // --- Components ---

    /// Attach `component` to `id`, first attaching any declared requirement
    /// the node lacks.
    ///
    /// Requirements are default-constructed and initialized in dependency
    /// order. A requirement cycle fails before anything is attached. A
    /// component of the same type already on the node is replaced and dropped
    /// without its `clean_up` hook. Attaching a [`Transform`] replaces the
    /// node's local pose; its declared requirements are attached as for any
    /// other component.
    pub fn attach_component<T: Component>(
        &mut self,
        id: NodeId,
        component: T,
    ) -> Result<&mut T, SceneError> {
        let tag = ComponentTag::of::<T>();
        let node = self.nodes.get(&id).ok_or(SceneError::NodeNotFound(id))?;

        let plan = self.capabilities.resolve(tag, |t| node.has_tag(t))?;
        for requirement in plan {
            tracing::debug!(
                node = %id,
                component = requirement.tag().short_name(),
                required_by = tag.short_name(),
                "attaching required component"
            );
            self.install(id, requirement.tag(), requirement.construct());
        }

        if let Some(transform) = (&component as &dyn Any).downcast_ref::<Transform>() {
            let pose = transform.pose();
            self.set_local_pose(id, pose);
        } else {
            self.install(id, tag, Box::new(component));
        }

        self.get_component_mut::<T>(id)
            .ok_or(SceneError::Detached {
                node: id,
                component: tag.short_name(),
            })
    }

    pub fn has_component<T: Component>(&self, id: NodeId) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|node| node.has_tag(ComponentTag::of::<T>()))
    }

    /// The `T` on `id`, or `None` if the node or component is absent.
    pub fn get_component<T: Component>(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(&id)?.component::<T>()
    }

    pub fn get_component_mut<T: Component>(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(&id)?.component_mut::<T>()
    }

    /// The `T` on the first direct child of `id` that has one.
    pub fn get_component_in_children<T: Component>(&self, id: NodeId) -> Option<&T> {
        self.children(id)
            .iter()
            .find_map(|child| self.get_component::<T>(*child))
    }

    /// Remove the `T` on `id`. Returns whether there was one.
    ///
    /// The removed component's `clean_up` hook is not run. The Transform
    /// cannot be removed.
    pub fn remove_component<T: Component>(&mut self, id: NodeId) -> bool {
        let tag = ComponentTag::of::<T>();
        if tag.is::<Transform>() {
            tracing::warn!(node = %id, "the Transform cannot be removed");
            return false;
        }
        self.nodes
            .get_mut(&id)
            .is_some_and(|node| node.components.remove(&tag).is_some())
    }

    fn install(&mut self, id: NodeId, tag: ComponentTag, mut component: Box<dyn Component>) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if node.components.insert(tag, None).is_some() {
            tracing::warn!(node = %id, component = tag.short_name(), "replacing attached component");
        }
        component.initialize(&mut ComponentContext::new(self, id));
        self.restore(id, tag, component);
    }

    /// Put a component back after one of its hooks ran.
    fn restore(&mut self, id: NodeId, tag: ComponentTag, mut component: Box<dyn Component>) {
        let Some(node) = self.nodes.get_mut(&id) else {
            // The node was destroyed while the hook ran; the component was
            // still owned by it.
            component.clean_up();
            return;
        };
        match node.components.get_mut(&tag) {
            Some(slot) if slot.is_none() => *slot = Some(component),
            // Removed or replaced while running: dropped without clean-up.
            _ => {}
        }
    }

    fn run_hook<F>(&mut self, id: NodeId, tag: ComponentTag, hook: &mut F)
    where
        F: FnMut(&mut dyn Component, &mut ComponentContext<'_>),
    {
        let Some(mut component) = self
            .nodes
            .get_mut(&id)
            .and_then(|node| node.components.get_mut(&tag))
            .and_then(Option::take)
        else {
            return;
        };
        hook(&mut *component, &mut ComponentContext::new(self, id));
        self.restore(id, tag, component);
    }

    // --- Hierarchy ---

    /// Make `child` a child of `parent`.
    ///
    /// A no-op if it already is. The child leaves its previous parent and,
    /// if it was a root, the directory.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let parent_node = self.nodes.get(&parent).ok_or(SceneError::NodeNotFound(parent))?;
        let child_node = self.nodes.get(&child).ok_or(SceneError::NodeNotFound(child))?;
        if parent_node.children.contains(&child) {
            return Ok(());
        }

        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(SceneError::HierarchyCycle { parent, child });
            }
            cursor = self.parent(current);
        }

        let previous = child_node.parent;
        let name = child_node.name.clone();
        if let Some(previous) = previous {
            self.remove_child(previous, child);
        }
        if self.directory.get(&name) == Some(&child) {
            self.directory.remove(&name);
        }
        self.link(parent, child);
        Ok(())
    }

    /// Detach `child` from `parent`. Returns whether it was a direct child.
    ///
    /// The child stays alive, unvisited, until reattached or destroyed.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return false;
        };
        let Some(index) = parent_node.children.iter().position(|c| *c == child) else {
            return false;
        };
        parent_node.children.remove(index);
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = None;
        }
        self.invalidate(child);
        true
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = Some(parent);
        }
        self.invalidate(child);
    }

    // --- Frame ---

    /// Run every component's `update` hook, depth-first from each root.
    pub fn update_all(&mut self) {
        let _span = tracing::debug_span!("scene_update").entered();
        for root in self.root_ids() {
            self.visit(root, &mut |component: &mut dyn Component, ctx: &mut ComponentContext<'_>| {
                component.update(ctx)
            });
        }
    }

    /// Run every component's `render` hook, depth-first from each root.
    pub fn render_all(&mut self, camera: &CameraView) {
        let _span = tracing::debug_span!("scene_render").entered();
        for root in self.root_ids() {
            self.visit(root, &mut |component: &mut dyn Component, ctx: &mut ComponentContext<'_>| {
                component.render(ctx, camera)
            });
        }
    }

    fn root_ids(&self) -> Vec<NodeId> {
        self.directory.values().copied().collect()
    }

    /// Pre-order: the node's own components, then its children. Inactive
    /// nodes are skipped with their subtree.
    fn visit<F>(&mut self, id: NodeId, hook: &mut F)
    where
        F: FnMut(&mut dyn Component, &mut ComponentContext<'_>),
    {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if !node.active {
            return;
        }
        let tags: Vec<ComponentTag> = node.components.keys().copied().collect();
        for tag in tags {
            self.run_hook(id, tag, hook);
        }

        let children = self.children(id).to_vec();
        for child in children {
            self.visit(child, hook);
        }
    }

    // --- Teardown ---

    /// Destroy a root and its subtree and drop its directory entry.
    ///
    /// Returns false if `id` is not a registered root.
    pub fn remove_root(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        if self.directory.get(&node.name) != Some(&id) {
            return false;
        }
        let name = node.name.clone();
        self.directory.remove(&name);
        let destroyed = self.destroy_subtree(id);
        tracing::debug!(node = %id, name = %name, destroyed, "removed root");
        true
    }

    /// Destroy any node and its subtree, unlinking it from its parent or the
    /// directory. Returns the number of nodes destroyed.
    pub fn destroy(&mut self, id: NodeId) -> usize {
        let Some(node) = self.nodes.get(&id) else {
            return 0;
        };
        let parent = node.parent;
        let name = node.name.clone();
        match parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.retain(|c| *c != id);
                }
            }
            None => {
                if self.directory.get(&name) == Some(&id) {
                    self.directory.remove(&name);
                }
            }
        }
        self.destroy_subtree(id)
    }

    /// Destroy every node, roots first, and clear the directory.
    pub fn clean_up_all(&mut self) {
        let _span = tracing::debug_span!("scene_clean_up").entered();
        let mut destroyed = 0;
        for root in self.root_ids() {
            destroyed += self.destroy_subtree(root);
        }
        self.directory.clear();

        let detached: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| *id)
            .collect();
        for id in detached {
            destroyed += self.destroy_subtree(id);
        }
        tracing::debug!(destroyed, "scene cleaned up");
    }

    /// Clean up every component of `id`, then recurse into its children.
    /// Leaves the node's table and child list empty before dropping it.
    fn destroy_subtree(&mut self, id: NodeId) -> usize {
        let Some(mut node) = self.nodes.remove(&id) else {
            return 0;
        };
        // An empty slot belongs to a hook still running; `restore` cleans it.
        for (_, mut slot) in std::mem::take(&mut node.components) {
            if let Some(component) = slot.as_mut() {
                component.clean_up();
            }
        }
        let mut destroyed = 1;
        for child in std::mem::take(&mut node.children) {
            destroyed += self.destroy_subtree(child);
        }
        destroyed
    }
}
