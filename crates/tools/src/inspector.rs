use renderstar_common::NodeId;
use renderstar_kernel::Scene;

/// Scene inspector for developer tooling.
///
/// Read-only queries against a scene for debugging and CLI output. Reading
/// world positions may refresh cached matrices but never changes a pose.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene.
    pub fn summary(scene: &Scene) -> SceneSummary {
        let mut components = 0;
        let mut dirty = 0;
        let mut inactive = 0;
        for id in scene.node_ids() {
            if let Some(node) = scene.get(id) {
                components += node.component_count() + 1;
                dirty += usize::from(node.transform().is_dirty());
                inactive += usize::from(!node.is_active());
            }
        }
        SceneSummary {
            node_count: scene.node_count(),
            root_count: scene.root_count(),
            component_count: components,
            dirty_transforms: dirty,
            inactive_nodes: inactive,
            dirty_propagations: scene.dirty_propagations(),
            world_recomputes: scene.world_recomputes(),
        }
    }

    /// Pose and components of one node.
    pub fn inspect_node(scene: &Scene, id: NodeId) -> Option<NodeInfo> {
        let node = scene.get(id)?;
        let transform = node.transform();
        let world = scene.world_position(id)?;
        Some(NodeInfo {
            id,
            name: node.name().to_string(),
            active: node.is_active(),
            parent: node.parent(),
            children: node.children().len(),
            components: node
                .component_tags()
                .iter()
                .map(|tag| tag.short_name().to_string())
                .collect(),
            local_position: transform.local_position().to_array(),
            rotation_degrees: transform.local_rotation().to_array(),
            scale: transform.local_scale().to_array(),
            world_position: world.to_array(),
        })
    }

    /// Pre-order listing of every root and its descendants, two spaces of
    /// indent per level.
    pub fn tree(scene: &Scene) -> Vec<String> {
        let mut lines = Vec::new();
        for (_, root) in scene.roots() {
            Self::walk(scene, root, 0, &mut lines);
        }
        lines
    }

    fn walk(scene: &Scene, id: NodeId, depth: usize, lines: &mut Vec<String>) {
        let Some(node) = scene.get(id) else {
            return;
        };
        let components: Vec<&str> = node
            .component_tags()
            .iter()
            .map(|tag| tag.short_name())
            .collect();
        lines.push(format!(
            "{:indent$}{} [{}]",
            "",
            node.name(),
            components.join(", "),
            indent = depth * 2
        ));
        for child in node.children() {
            Self::walk(scene, *child, depth + 1, lines);
        }
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub node_count: usize,
    pub root_count: usize,
    /// Components across all nodes, Transforms included.
    pub component_count: usize,
    pub dirty_transforms: usize,
    pub inactive_nodes: usize,
    pub dirty_propagations: u64,
    pub world_recomputes: u64,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={} roots={} components={} dirty={} inactive={} propagations={} recomputes={}",
            self.node_count,
            self.root_count,
            self.component_count,
            self.dirty_transforms,
            self.inactive_nodes,
            self.dirty_propagations,
            self.world_recomputes
        )
    }
}

/// Detailed info about a single node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub active: bool,
    pub parent: Option<NodeId>,
    pub children: usize,
    pub components: Vec<String>,
    pub local_position: [f32; 3],
    pub rotation_degrees: [f32; 3],
    pub scale: [f32; 3],
    pub world_position: [f32; 3],
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node {:?} [{}] world=({:.2}, {:.2}, {:.2}) rot=({:.1}, {:.1}, {:.1}) scale=({:.2}, {:.2}, {:.2}) components=[{}]",
            self.name,
            self.id,
            self.world_position[0],
            self.world_position[1],
            self.world_position[2],
            self.rotation_degrees[0],
            self.rotation_degrees[1],
            self.rotation_degrees[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
            self.components.join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use renderstar_kernel::Camera;

    #[test]
    fn summary_empty_scene() {
        let scene = Scene::new();
        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.node_count, 0);
        assert_eq!(summary.root_count, 0);
        assert_eq!(summary.component_count, 0);
    }

    #[test]
    fn summary_counts_dirty_transforms() {
        let mut scene = Scene::new();
        let root = scene.create_node("Root");
        let child = scene.create_child(root, "Child").unwrap();
        scene.attach_component(child, Camera::default()).unwrap();

        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.node_count, 2);
        assert_eq!(summary.root_count, 1);
        assert_eq!(summary.component_count, 3);
        assert_eq!(summary.dirty_transforms, 2);

        scene.world_matrix(child);
        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.dirty_transforms, 0);
        assert_eq!(summary.world_recomputes, 2);
    }

    #[test]
    fn inspect_node_found() {
        let mut scene = Scene::new();
        let root = scene.create_node("Root");
        scene.set_local_position(root, Vec3::new(1.0, 2.0, 3.0));
        let child = scene.create_child(root, "Child").unwrap();

        let info = SceneInspector::inspect_node(&scene, child).unwrap();
        assert_eq!(info.name, "Child");
        assert_eq!(info.parent, Some(root));
        assert_eq!(info.local_position, [0.0, 0.0, 0.0]);
        assert_eq!(info.world_position, [1.0, 2.0, 3.0]);
        assert_eq!(info.components, vec!["Transform".to_string()]);
    }

    #[test]
    fn inspect_node_not_found() {
        let scene = Scene::new();
        assert!(SceneInspector::inspect_node(&scene, NodeId::new()).is_none());
    }

    #[test]
    fn tree_is_indented_preorder() {
        let mut scene = Scene::new();
        let a = scene.create_node("A");
        let a1 = scene.create_child(a, "A1").unwrap();
        scene.create_child(a1, "A1x").unwrap();
        scene.create_child(a, "A2").unwrap();
        let b = scene.create_node("B");
        scene.attach_component(b, Camera::default()).unwrap();

        let lines = SceneInspector::tree(&scene);
        assert_eq!(
            lines,
            vec![
                "A [Transform]",
                "  A1 [Transform]",
                "    A1x [Transform]",
                "  A2 [Transform]",
                "B [Transform, Camera]",
            ]
        );
    }

    #[test]
    fn summary_display() {
        let scene = Scene::new();
        let s = format!("{}", SceneInspector::summary(&scene));
        assert!(s.contains("nodes=0"));
    }
}
