//! Arena-backed component tree.
//!
//! [`ComponentTree`] stores components in a [`SlotMap`] keyed by [`NodeId`],
//! with parent-child links kept in both directions. A child's position in its
//! parent's child list is its z-order. Destroying a node destroys its whole
//! subtree.
//!
//! The tree implements [`TraversalAccess`] and [`FocusTreeAccess`], so it can
//! be handed directly to a [`LayoutComparator`](crate::LayoutComparator) or a
//! [`LayoutTraversalPolicy`](crate::LayoutTraversalPolicy).
//!
//! ```
//! use lattice_traversal::{ComponentTree, Point};
//!
//! let mut tree = ComponentTree::new();
//! let window = tree.insert_root("window");
//! let ok = tree.insert_child(window, "ok").unwrap();
//! tree.set_position(ok, Point::new(10, 40)).unwrap();
//!
//! assert_eq!(tree.parent(ok).unwrap(), Some(window));
//! assert_eq!(tree.z_order(ok).unwrap(), 0);
//! ```

use slotmap::{new_key_type, SlotMap};

use crate::access::{FocusTreeAccess, Point, Size, TraversalAccess};
use crate::error::{Result, TraversalError};
use crate::logging::targets;

new_key_type! {
    /// A stable identifier for a node in a [`ComponentTree`].
    ///
    /// IDs stay valid while the tree changes shape and become invalid when
    /// the node is destroyed.
    pub struct NodeId;
}

/// Per-node data.
#[derive(Debug)]
struct NodeData {
    name: String,
    position: Point,
    size: Size,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    traversal_root: bool,
    focus_cycle_root: bool,
    focusable: bool,
    visible: bool,
    enabled: bool,
}

impl NodeData {
    fn new(name: String) -> Self {
        Self {
            name,
            position: Point::ZERO,
            size: Size::ZERO,
            parent: None,
            children: Vec::new(),
            traversal_root: false,
            focus_cycle_root: false,
            focusable: false,
            visible: true,
            enabled: true,
        }
    }
}

/// A tree of positioned components.
#[derive(Debug, Default)]
pub struct ComponentTree {
    nodes: SlotMap<NodeId, NodeData>,
}

impl ComponentTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a detached node.
    pub fn insert(&mut self, name: impl Into<String>) -> NodeId {
        let name = name.into();
        tracing::trace!(target: targets::TREE, name = %name, "inserted node");
        self.nodes.insert(NodeData::new(name))
    }

    /// Insert a top-level node marked as a traversal root.
    pub fn insert_root(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.insert(name);
        self.nodes[id].traversal_root = true;
        id
    }

    /// Insert a node as the last (topmost z-order) child of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(TraversalError::InvalidNode);
        }
        let id = self.insert(name);
        self.nodes[id].parent = Some(parent);
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Remove a node and all of its descendants.
    #[tracing::instrument(skip(self), target = "lattice_traversal::tree", level = "trace")]
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        let descendants = self.collect_descendants(id)?;

        if let Some(parent_id) = self.nodes[id].parent {
            if let Some(parent) = self.nodes.get_mut(parent_id) {
                parent.children.retain(|&child| child != id);
            }
        }

        for child in descendants {
            self.nodes.remove(child);
        }
        self.nodes.remove(id);
        Ok(())
    }

    /// Collect all descendants, children before their parents.
    fn collect_descendants(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let data = self.nodes.get(current).ok_or(TraversalError::InvalidNode)?;
            for &child in &data.children {
                result.push(child);
                stack.push(child);
            }
        }
        result.reverse();
        Ok(result)
    }

    /// Whether the ID refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Move a node under a new parent, appending it at the top of the new
    /// parent's z-order. `None` detaches the node.
    pub fn set_parent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<()> {
        if !self.nodes.contains_key(id) {
            return Err(TraversalError::InvalidNode);
        }
        if let Some(parent_id) = new_parent {
            if !self.nodes.contains_key(parent_id) {
                return Err(TraversalError::InvalidNode);
            }
            if self.is_ancestor_of(id, parent_id) {
                return Err(TraversalError::CircularParentage);
            }
        }

        if let Some(old_parent) = self.nodes[id].parent {
            if let Some(data) = self.nodes.get_mut(old_parent) {
                data.children.retain(|&child| child != id);
            }
        }

        self.nodes[id].parent = new_parent;
        if let Some(parent_id) = new_parent {
            self.nodes[parent_id].children.push(id);
        }
        Ok(())
    }

    /// Check if `potential_ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_of(&self, potential_ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.nodes
            .get(id)
            .map(|d| d.parent)
            .ok_or(TraversalError::InvalidNode)
    }

    /// Children of a node in z-order.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        self.nodes
            .get(id)
            .map(|d| d.children.as_slice())
            .ok_or(TraversalError::InvalidNode)
    }

    /// Index of the node among its parent's children. Top-level nodes have
    /// z-order 0.
    pub fn z_order(&self, id: NodeId) -> Result<usize> {
        let data = self.nodes.get(id).ok_or(TraversalError::InvalidNode)?;
        let Some(parent) = data.parent else {
            return Ok(0);
        };
        Ok(self.nodes[parent]
            .children
            .iter()
            .position(|&child| child == id)
            .unwrap_or(0))
    }

    /// Move a node to `index` within its parent's child list. The index is
    /// clamped to the child count.
    pub fn set_z_order(&mut self, id: NodeId, index: usize) -> Result<()> {
        let parent = self.parent(id)?.ok_or(TraversalError::InvalidNode)?;
        let children = &mut self.nodes[parent].children;
        children.retain(|&child| child != id);
        let index = index.min(children.len());
        children.insert(index, id);
        Ok(())
    }

    /// Name of a node.
    pub fn name(&self, id: NodeId) -> Result<&str> {
        self.nodes
            .get(id)
            .map(|d| d.name.as_str())
            .ok_or(TraversalError::InvalidNode)
    }

    /// Position of a node relative to its parent.
    pub fn position(&self, id: NodeId) -> Result<Point> {
        self.nodes
            .get(id)
            .map(|d| d.position)
            .ok_or(TraversalError::InvalidNode)
    }

    /// Move a node within its parent.
    pub fn set_position(&mut self, id: NodeId, position: Point) -> Result<()> {
        self.nodes
            .get_mut(id)
            .map(|d| d.position = position)
            .ok_or(TraversalError::InvalidNode)
    }

    /// Size of a node.
    pub fn size(&self, id: NodeId) -> Result<Size> {
        self.nodes
            .get(id)
            .map(|d| d.size)
            .ok_or(TraversalError::InvalidNode)
    }

    /// Resize a node.
    pub fn set_size(&mut self, id: NodeId, size: Size) -> Result<()> {
        self.nodes
            .get_mut(id)
            .map(|d| d.size = size)
            .ok_or(TraversalError::InvalidNode)
    }

    /// Set position and size together.
    pub fn set_geometry(&mut self, id: NodeId, position: Point, size: Size) -> Result<()> {
        let data = self.nodes.get_mut(id).ok_or(TraversalError::InvalidNode)?;
        data.position = position;
        data.size = size;
        Ok(())
    }

    /// Mark or unmark a node as a traversal root.
    pub fn set_traversal_root(&mut self, id: NodeId, root: bool) -> Result<()> {
        self.nodes
            .get_mut(id)
            .map(|d| d.traversal_root = root)
            .ok_or(TraversalError::InvalidNode)
    }

    /// Mark or unmark a node as the root of a nested focus cycle.
    pub fn set_focus_cycle_root(&mut self, id: NodeId, cycle_root: bool) -> Result<()> {
        self.nodes
            .get_mut(id)
            .map(|d| d.focus_cycle_root = cycle_root)
            .ok_or(TraversalError::InvalidNode)
    }

    /// Whether the node accepts keyboard focus.
    pub fn set_focusable(&mut self, id: NodeId, focusable: bool) -> Result<()> {
        self.nodes
            .get_mut(id)
            .map(|d| d.focusable = focusable)
            .ok_or(TraversalError::InvalidNode)
    }

    /// Show or hide a node. Hiding a node hides its subtree.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<()> {
        self.nodes
            .get_mut(id)
            .map(|d| d.visible = visible)
            .ok_or(TraversalError::InvalidNode)
    }

    /// Enable or disable a node. Disabling a node disables its subtree.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        self.nodes
            .get_mut(id)
            .map(|d| d.enabled = enabled)
            .ok_or(TraversalError::InvalidNode)
    }

    /// Find the first node with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, d)| d.name == name)
            .map(|(id, _)| id)
    }

    /// The nearest traversal root at or above `id`.
    pub fn root_of(&self, id: NodeId) -> Result<Option<NodeId>> {
        let mut current = Some(id);
        while let Some(current_id) = current {
            let data = self.nodes.get(current_id).ok_or(TraversalError::InvalidNode)?;
            if data.traversal_root {
                return Ok(Some(current_id));
            }
            current = data.parent;
        }
        Ok(None)
    }

    /// Top-level nodes (those without a parent).
    pub fn top_level_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, d)| d.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// Walk from `id` up through its ancestors, checking a flag on each.
    fn all_ancestors(&self, id: NodeId, flag: impl Fn(&NodeData) -> bool) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            let Some(data) = self.nodes.get(current_id) else {
                return false;
            };
            if !flag(data) {
                return false;
            }
            current = data.parent;
        }
        true
    }
}

impl TraversalAccess for ComponentTree {
    type Id = NodeId;

    fn position(&self, id: NodeId) -> Point {
        self.nodes.get(id).map(|d| d.position).unwrap_or_default()
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|d| d.parent)
    }

    fn z_order(&self, id: NodeId) -> usize {
        ComponentTree::z_order(self, id).unwrap_or(0)
    }

    fn is_traversal_root(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|d| d.traversal_root)
    }
}

impl FocusTreeAccess for ComponentTree {
    fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(id)
            .map(|d| d.children.clone())
            .unwrap_or_default()
    }

    fn is_focusable(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|d| d.focusable)
    }

    fn is_visible(&self, id: NodeId) -> bool {
        self.all_ancestors(id, |d| d.visible)
    }

    fn is_enabled(&self, id: NodeId) -> bool {
        self.all_ancestors(id, |d| d.enabled)
    }

    fn is_focus_cycle_root(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|d| d.focus_cycle_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_with_buttons() -> (ComponentTree, NodeId, NodeId, NodeId) {
        let mut tree = ComponentTree::new();
        let window = tree.insert_root("window");
        let ok = tree.insert_child(window, "ok").unwrap();
        let cancel = tree.insert_child(window, "cancel").unwrap();
        (tree, window, ok, cancel)
    }

    #[test]
    fn test_insert_child_sets_both_links() {
        let (tree, window, ok, cancel) = window_with_buttons();
        assert_eq!(tree.parent(ok).unwrap(), Some(window));
        assert_eq!(tree.children(window).unwrap(), &[ok, cancel]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_insert_child_invalid_parent() {
        let (mut tree, window, _, _) = window_with_buttons();
        tree.destroy(window).unwrap();
        assert!(matches!(
            tree.insert_child(window, "orphan"),
            Err(TraversalError::InvalidNode)
        ));
    }

    #[test]
    fn test_z_order_follows_child_list() {
        let (mut tree, window, ok, cancel) = window_with_buttons();
        assert_eq!(tree.z_order(ok).unwrap(), 0);
        assert_eq!(tree.z_order(cancel).unwrap(), 1);
        assert_eq!(tree.z_order(window).unwrap(), 0);

        tree.set_z_order(cancel, 0).unwrap();
        assert_eq!(tree.z_order(cancel).unwrap(), 0);
        assert_eq!(tree.z_order(ok).unwrap(), 1);

        // Clamped to the end.
        tree.set_z_order(cancel, 99).unwrap();
        assert_eq!(tree.z_order(cancel).unwrap(), 1);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut tree = ComponentTree::new();
        let root = tree.insert_root("root");
        let panel = tree.insert_child(root, "panel").unwrap();
        let field = tree.insert_child(panel, "field").unwrap();

        assert!(matches!(
            tree.set_parent(root, Some(field)),
            Err(TraversalError::CircularParentage)
        ));
        assert!(matches!(
            tree.set_parent(panel, Some(panel)),
            Err(TraversalError::CircularParentage)
        ));
    }

    #[test]
    fn test_set_parent_moves_between_parents() {
        let mut tree = ComponentTree::new();
        let root = tree.insert_root("root");
        let left = tree.insert_child(root, "left").unwrap();
        let right = tree.insert_child(root, "right").unwrap();
        let field = tree.insert_child(left, "field").unwrap();

        tree.set_parent(field, Some(right)).unwrap();
        assert!(tree.children(left).unwrap().is_empty());
        assert_eq!(tree.children(right).unwrap(), &[field]);

        tree.set_parent(field, None).unwrap();
        assert_eq!(tree.parent(field).unwrap(), None);
        assert!(tree.top_level_nodes().contains(&field));
    }

    #[test]
    fn test_destroy_cascades() {
        let mut tree = ComponentTree::new();
        let root = tree.insert_root("root");
        let panel = tree.insert_child(root, "panel").unwrap();
        let field = tree.insert_child(panel, "field").unwrap();
        let other = tree.insert_child(root, "other").unwrap();

        tree.destroy(panel).unwrap();
        assert!(!tree.contains(panel));
        assert!(!tree.contains(field));
        assert_eq!(tree.children(root).unwrap(), &[other]);
        assert_eq!(tree.z_order(other).unwrap(), 0);
    }

    #[test]
    fn test_effective_visibility_and_enabled() {
        let mut tree = ComponentTree::new();
        let root = tree.insert_root("root");
        let panel = tree.insert_child(root, "panel").unwrap();
        let field = tree.insert_child(panel, "field").unwrap();

        assert!(FocusTreeAccess::is_visible(&tree, field));
        tree.set_visible(panel, false).unwrap();
        assert!(!FocusTreeAccess::is_visible(&tree, field));

        assert!(FocusTreeAccess::is_enabled(&tree, field));
        tree.set_enabled(root, false).unwrap();
        assert!(!FocusTreeAccess::is_enabled(&tree, field));
    }

    #[test]
    fn test_root_of_finds_nearest_root() {
        let mut tree = ComponentTree::new();
        let window = tree.insert_root("window");
        let dialog = tree.insert_child(window, "dialog").unwrap();
        tree.set_traversal_root(dialog, true).unwrap();
        let field = tree.insert_child(dialog, "field").unwrap();
        let loose = tree.insert("loose");

        assert_eq!(tree.root_of(field).unwrap(), Some(dialog));
        assert_eq!(tree.root_of(dialog).unwrap(), Some(dialog));
        assert_eq!(tree.root_of(loose).unwrap(), None);
    }

    #[test]
    fn test_geometry_and_lookup() {
        let (mut tree, _, ok, _) = window_with_buttons();
        tree.set_geometry(ok, Point::new(5, 7), Size::new(80, 24)).unwrap();
        assert_eq!(tree.position(ok).unwrap(), Point::new(5, 7));
        assert_eq!(tree.size(ok).unwrap(), Size::new(80, 24));
        assert_eq!(tree.find_by_name("ok"), Some(ok));
        assert_eq!(tree.find_by_name("missing"), None);
        assert_eq!(tree.name(ok).unwrap(), "ok");
    }
}
