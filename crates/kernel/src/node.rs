use std::any::TypeId;
use std::collections::BTreeMap;

use renderstar_common::NodeId;

use crate::component::{AsAny, Component, ComponentTag};
use crate::transform::Transform;

/// A component slot. Empty while the component's own hook is running.
pub(crate) type Slot = Option<Box<dyn Component>>;

/// A hierarchical container of components and child nodes.
///
/// Nodes live in a [`Scene`](crate::Scene) and refer to each other by
/// [`NodeId`]. The parent link is non-owning; the child list decides what is
/// destroyed together with the node.
pub struct Node {
    pub(crate) name: String,
    pub(crate) active: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    transform: Transform,
    pub(crate) components: BTreeMap<ComponentTag, Slot>,
}

impl Node {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            active: true,
            parent: None,
            children: Vec::new(),
            transform: Transform::default(),
            components: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub(crate) fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// True if the node holds a component with this tag. The Transform is
    /// always held.
    pub fn has_tag(&self, tag: ComponentTag) -> bool {
        tag.is::<Transform>() || self.components.contains_key(&tag)
    }

    /// Tags of every held component, Transform first.
    pub fn component_tags(&self) -> Vec<ComponentTag> {
        std::iter::once(ComponentTag::of::<Transform>())
            .chain(self.components.keys().copied())
            .collect()
    }

    /// Number of components besides the Transform.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn component<T: Component>(&self) -> Option<&T> {
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            return self.transform.as_any().downcast_ref::<T>();
        }
        let component: &dyn Component = self.components.get(&ComponentTag::of::<T>())?.as_deref()?;
        component.as_any().downcast_ref::<T>()
    }

    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            return self.transform.as_any_mut().downcast_mut::<T>();
        }
        let component: &mut dyn Component = self
            .components
            .get_mut(&ComponentTag::of::<T>())?
            .as_deref_mut()?;
        component.as_any_mut().downcast_mut::<T>()
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tags: Vec<&str> = self
            .component_tags()
            .iter()
            .map(ComponentTag::short_name)
            .collect();
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("components", &tags)
            .finish()
    }
}
