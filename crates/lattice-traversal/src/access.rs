//! Capability traits through which traversal reads a component tree.
//!
//! The comparator never owns nodes. It only queries position, parent link,
//! sibling z-order and the traversal-root marker through [`TraversalAccess`].
//! Policies that also need to enumerate and filter candidates use the wider
//! [`FocusTreeAccess`].

use std::fmt;

/// A position in parent-relative coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The extent of a component.
///
/// Ordering does not look at sizes; they are kept so a tree can describe
/// real geometry and so debug output is meaningful.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// An empty size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Read-only queries the layout comparator needs from a component tree.
///
/// Implementations return neutral values for unknown IDs (`None` parent,
/// not a root). The comparator then reports such nodes as unattached.
pub trait TraversalAccess {
    /// Identifier of a node in the tree.
    type Id: Copy + Eq + fmt::Debug;

    /// Position of the node relative to its parent.
    fn position(&self, id: Self::Id) -> Point;

    /// Parent of the node, or `None` for a top-level node.
    fn parent(&self, id: Self::Id) -> Option<Self::Id>;

    /// Index of the node among its parent's children.
    ///
    /// Must be unique among siblings.
    fn z_order(&self, id: Self::Id) -> usize;

    /// Whether the node bounds an independent traversal cycle, such as a
    /// top-level window.
    fn is_traversal_root(&self, id: Self::Id) -> bool;
}

/// Tree queries needed to collect focus candidates.
pub trait FocusTreeAccess: TraversalAccess {
    /// Whether the ID refers to a live node.
    fn contains(&self, id: Self::Id) -> bool;

    /// Children of the node in z-order.
    fn children(&self, id: Self::Id) -> Vec<Self::Id>;

    /// Whether the node wants keyboard focus at all.
    fn is_focusable(&self, id: Self::Id) -> bool;

    /// Effective visibility, considering ancestors.
    fn is_visible(&self, id: Self::Id) -> bool;

    /// Effective enabled state, considering ancestors.
    fn is_enabled(&self, id: Self::Id) -> bool;

    /// Whether the node's descendants form their own focus cycle inside the
    /// enclosing traversal root, such as a tool bar or an embedded panel.
    fn is_focus_cycle_root(&self, id: Self::Id) -> bool;
}
