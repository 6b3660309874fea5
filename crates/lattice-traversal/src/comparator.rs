//! Layout-ordered comparison of components for focus traversal.
//!
//! [`LayoutComparator`] orders components the way a reader scans a window:
//! row by row (or column by column), in the reading direction of the
//! configured [`Orientation`]. Components whose secondary coordinate differs
//! by less than [`ROW_TOLERANCE`] count as being on the same row (or column).
//!
//! Components that are not siblings are first reduced to the children of
//! their lowest common ancestor, so a whole container sorts as one unit
//! among its siblings. An ancestor always sorts before its descendants.
//!
//! ```
//! use lattice_traversal::{ComponentTree, LayoutComparator, Point};
//! use std::cmp::Ordering;
//!
//! let mut tree = ComponentTree::new();
//! let window = tree.insert_root("window");
//! let name = tree.insert_child(window, "name").unwrap();
//! let email = tree.insert_child(window, "email").unwrap();
//! tree.set_position(name, Point::new(10, 0)).unwrap();
//! tree.set_position(email, Point::new(50, 0)).unwrap();
//!
//! let comparator = LayoutComparator::new();
//! assert_eq!(comparator.compare(&tree, name, email).unwrap(), Ordering::Less);
//! ```

use std::cmp::Ordering;

use serde::Deserialize;

use crate::access::TraversalAccess;
use crate::error::{Result, TraversalError};
use crate::logging::targets;

/// Secondary-axis distance below which two components share a row (or column).
pub const ROW_TOLERANCE: i32 = 10;

/// Upper bound on ancestry walks. Deeper chains are treated as unattached.
pub const MAX_ANCESTRY_DEPTH: usize = 4096;

/// Reading order used when comparing positions.
///
/// `horizontal` selects rows as the primary axis (otherwise columns), and
/// `left_to_right` selects the direction along rows (or the order of
/// columns in vertical layouts).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct Orientation {
    pub horizontal: bool,
    pub left_to_right: bool,
}

impl Orientation {
    /// Rows, read left to right.
    pub const LEFT_TO_RIGHT: Self = Self::new(true, true);
    /// Rows, read right to left.
    pub const RIGHT_TO_LEFT: Self = Self::new(true, false);
    /// Columns top to bottom, columns ordered left to right.
    pub const VERTICAL_LEFT_TO_RIGHT: Self = Self::new(false, true);
    /// Columns top to bottom, columns ordered right to left.
    pub const VERTICAL_RIGHT_TO_LEFT: Self = Self::new(false, false);

    /// Create an orientation from its two axes.
    pub const fn new(horizontal: bool, left_to_right: bool) -> Self {
        Self {
            horizontal,
            left_to_right,
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::LEFT_TO_RIGHT
    }
}

/// Orders components for focus traversal by layout position.
///
/// The comparator holds only its orientation. It reads node data through
/// [`TraversalAccess`] and allocates nothing beyond the two ancestry chains
/// built when comparing non-siblings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutComparator {
    orientation: Orientation,
}

impl LayoutComparator {
    /// Create a comparator for horizontal, left-to-right layouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a comparator with the given orientation.
    pub fn with_orientation(orientation: Orientation) -> Self {
        Self { orientation }
    }

    /// The current orientation.
    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Change the reading order used by subsequent comparisons.
    pub fn set_orientation(&mut self, horizontal: bool, left_to_right: bool) {
        self.orientation = Orientation::new(horizontal, left_to_right);
    }

    /// Compare two nodes of the same traversal root.
    ///
    /// # Errors
    ///
    /// - [`TraversalError::Unattached`] if either node's ancestry ends before
    ///   reaching a traversal root.
    /// - [`TraversalError::DisjointTrees`] if the nodes belong to different
    ///   traversal roots.
    pub fn compare<T: TraversalAccess>(&self, tree: &T, a: T::Id, b: T::Id) -> Result<Ordering> {
        if a == b {
            return Ok(Ordering::Equal);
        }

        let (mut a, mut b) = (a, b);
        let parent_a = tree.parent(a);
        if parent_a.is_none() || parent_a != tree.parent(b) {
            let chain_a = ancestry(tree, a)?;
            let chain_b = ancestry(tree, b)?;

            // Chains run node-to-root; the last entry is the traversal root.
            if chain_a.last() != chain_b.last() {
                return Err(TraversalError::disjoint(a, b));
            }

            let mut iter_a = chain_a.iter().rev();
            let mut iter_b = chain_b.iter().rev();
            loop {
                // A chain that runs out first belongs to the ancestor.
                let Some(&next_a) = iter_a.next() else {
                    return Ok(Ordering::Less);
                };
                let Some(&next_b) = iter_b.next() else {
                    return Ok(Ordering::Greater);
                };
                if next_a != next_b {
                    a = next_a;
                    b = next_b;
                    break;
                }
            }
            tracing::trace!(
                target: targets::COMPARATOR,
                ?a,
                ?b,
                "reduced to children of common ancestor"
            );
        }

        Ok(self.compare_siblings(tree, a, b))
    }

    /// Positional comparison of two nodes sharing a parent.
    fn compare_siblings<T: TraversalAccess>(&self, tree: &T, a: T::Id, b: T::Id) -> Ordering {
        let pa = tree.position(a);
        let pb = tree.position(b);
        let z_order = tree.z_order(a).cmp(&tree.z_order(b));

        let Orientation {
            horizontal,
            left_to_right,
        } = self.orientation;

        if horizontal {
            if (pa.y - pb.y).abs() < ROW_TOLERANCE {
                let along_row = if left_to_right {
                    pa.x.cmp(&pb.x)
                } else {
                    pb.x.cmp(&pa.x)
                };
                along_row.then(z_order)
            } else {
                row_order(pa.y, pb.y)
            }
        } else if (pa.x - pb.x).abs() < ROW_TOLERANCE {
            pa.y.cmp(&pb.y).then(z_order)
        } else if left_to_right {
            row_order(pa.x, pb.x)
        } else {
            row_order(pb.x, pa.x)
        }
    }

    /// Sort candidate nodes into traversal order.
    ///
    /// All nodes are checked for attachment before sorting. The row tolerance
    /// makes [`compare`](Self::compare) non-transitive for staircase layouts,
    /// so this uses a stable merge sort that tolerates an inconsistent order
    /// instead of `slice::sort_by`. If a comparison fails mid-sort, the error
    /// is returned and `nodes` still holds every input node.
    pub fn sort<T: TraversalAccess>(&self, tree: &T, nodes: &mut [T::Id]) -> Result<()> {
        let mut root = None;
        for &node in nodes.iter() {
            let node_root = ancestry(tree, node)?.last().copied();
            match root {
                None => root = Some((node, node_root)),
                Some((first, first_root)) if first_root != node_root => {
                    return Err(TraversalError::disjoint(first, node));
                }
                Some(_) => {}
            }
        }

        let mut scratch = Vec::with_capacity(nodes.len());
        merge_sort(nodes, &mut scratch, &mut |a, b| self.compare(tree, a, b))
    }
}

/// Stable top-down merge sort driven by a fallible comparison.
///
/// Never panics on a comparison that is not a total order. A merge is only
/// written back once it completed, so an error leaves `nodes` a permutation
/// of its input.
fn merge_sort<Id, F>(nodes: &mut [Id], scratch: &mut Vec<Id>, compare: &mut F) -> Result<()>
where
    Id: Copy,
    F: FnMut(Id, Id) -> Result<Ordering>,
{
    if nodes.len() < 2 {
        return Ok(());
    }
    let mid = nodes.len() / 2;
    merge_sort(&mut nodes[..mid], scratch, compare)?;
    merge_sort(&mut nodes[mid..], scratch, compare)?;

    // Halves already in order.
    if compare(nodes[mid - 1], nodes[mid])? != Ordering::Greater {
        return Ok(());
    }

    scratch.clear();
    let (mut left, mut right) = (0, mid);
    while left < mid && right < nodes.len() {
        if compare(nodes[right], nodes[left])? == Ordering::Less {
            scratch.push(nodes[right]);
            right += 1;
        } else {
            scratch.push(nodes[left]);
            left += 1;
        }
    }
    scratch.extend_from_slice(&nodes[left..mid]);
    scratch.extend_from_slice(&nodes[right..]);
    nodes.copy_from_slice(scratch);
    Ok(())
}

/// Ordering across rows: positions on different rows never compare equal.
#[inline]
fn row_order(a: i32, b: i32) -> Ordering {
    if a < b { Ordering::Less } else { Ordering::Greater }
}

/// Collect `node` and its ancestors up to and including the nearest
/// traversal root.
fn ancestry<T: TraversalAccess>(tree: &T, node: T::Id) -> Result<Vec<T::Id>> {
    let mut chain = Vec::new();
    let mut current = Some(node);
    while let Some(id) = current {
        if chain.len() >= MAX_ANCESTRY_DEPTH {
            break;
        }
        chain.push(id);
        if tree.is_traversal_root(id) {
            return Ok(chain);
        }
        current = tree.parent(id);
    }

    tracing::error!(
        target: targets::COMPARATOR,
        ?node,
        depth = chain.len(),
        "node is not attached to a traversal root"
    );
    Err(TraversalError::unattached(node))
}
