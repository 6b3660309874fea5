//! Layout-ordered focus traversal policy.
//!
//! [`LayoutTraversalPolicy`] answers "which component comes next?" for a
//! focus cycle. It collects the focus candidates below a cycle root, sorts
//! them with a [`LayoutComparator`], and walks the resulting order.
//!
//! # Candidates
//!
//! A component is accepted when it is focusable, visible and enabled (the
//! latter two considering its ancestors). Hidden subtrees are pruned.
//!
//! Nested focus cycle roots appear in the outer order as a single entry: the
//! root itself stands in for its whole subtree. When the walk lands on such
//! an entry and implicit down-cycle traversal is on, the policy steps into the
//! nested cycle (its first component going forward, its last going backward).
//!
//! Nested traversal roots are separate windows and are skipped entirely.

use crate::access::FocusTreeAccess;
use crate::comparator::{LayoutComparator, Orientation};
use crate::config::TraversalConfig;
use crate::error::{Result, TraversalError};
use crate::logging::targets;

/// Direction of a traversal step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Sorts focus candidates by layout position and walks them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutTraversalPolicy {
    comparator: LayoutComparator,
    config: TraversalConfig,
}

impl LayoutTraversalPolicy {
    /// Create a policy with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy from a configuration.
    pub fn from_config(config: TraversalConfig) -> Self {
        Self {
            comparator: LayoutComparator::with_orientation(config.orientation),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> TraversalConfig {
        self.config
    }

    /// The comparator used to sort candidates.
    pub fn comparator(&self) -> &LayoutComparator {
        &self.comparator
    }

    /// Change the reading order.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.config.orientation = orientation;
        self.comparator
            .set_orientation(orientation.horizontal, orientation.left_to_right);
    }

    /// Enable or disable wrap-around at the ends of the order.
    pub fn set_cycle(&mut self, cycle: bool) {
        self.config.cycle = cycle;
    }

    /// Enable or disable stepping into nested focus cycles.
    pub fn set_implicit_down_cycle(&mut self, implicit_down_cycle: bool) {
        self.config.implicit_down_cycle = implicit_down_cycle;
    }

    /// Whether a component can take focus.
    pub fn accept<T: FocusTreeAccess>(&self, tree: &T, id: T::Id) -> bool {
        tree.contains(id) && tree.is_focusable(id) && tree.is_visible(id) && tree.is_enabled(id)
    }

    /// The cycle root governing `id`: its nearest proper ancestor that is a
    /// focus cycle root or traversal root.
    pub fn cycle_root_of<T: FocusTreeAccess>(&self, tree: &T, id: T::Id) -> Option<T::Id> {
        let mut current = tree.parent(id);
        while let Some(ancestor) = current {
            if is_cycle_root(tree, ancestor) {
                return Some(ancestor);
            }
            current = tree.parent(ancestor);
        }
        None
    }

    /// All candidates of the focus cycle bounded by `root`, in traversal order.
    ///
    /// # Errors
    ///
    /// [`TraversalError::InvalidNode`] for an unknown root,
    /// [`TraversalError::NotCycleRoot`] if `root` bounds no focus cycle, and
    /// any comparator error raised while sorting.
    pub fn traversal_order<T: FocusTreeAccess>(&self, tree: &T, root: T::Id) -> Result<Vec<T::Id>> {
        if !tree.contains(root) {
            return Err(TraversalError::InvalidNode);
        }
        if !is_cycle_root(tree, root) {
            return Err(TraversalError::not_cycle_root(root));
        }

        let mut candidates = Vec::new();
        self.collect_candidates(tree, root, &mut candidates);
        self.comparator.sort(tree, &mut candidates)?;

        tracing::trace!(
            target: targets::POLICY,
            ?root,
            count = candidates.len(),
            "built traversal order"
        );
        Ok(candidates)
    }

    /// Depth-first collection of candidates below `parent`.
    fn collect_candidates<T: FocusTreeAccess>(
        &self,
        tree: &T,
        parent: T::Id,
        out: &mut Vec<T::Id>,
    ) {
        for child in tree.children(parent) {
            if !tree.is_visible(child) || tree.is_traversal_root(child) {
                continue;
            }

            if tree.is_focus_cycle_root(child) {
                let mut inner = Vec::new();
                self.collect_candidates(tree, child, &mut inner);
                if self.accept(tree, child) || !inner.is_empty() {
                    out.push(child);
                }
                continue;
            }

            if self.accept(tree, child) {
                out.push(child);
            }
            self.collect_candidates(tree, child, out);
        }
    }

    /// The first component of the cycle.
    pub fn first_component<T: FocusTreeAccess>(
        &self,
        tree: &T,
        root: T::Id,
    ) -> Result<Option<T::Id>> {
        let order = self.traversal_order(tree, root)?;
        self.scan(tree, &order, 0..order.len(), Direction::Forward)
    }

    /// The last component of the cycle.
    pub fn last_component<T: FocusTreeAccess>(
        &self,
        tree: &T,
        root: T::Id,
    ) -> Result<Option<T::Id>> {
        let order = self.traversal_order(tree, root)?;
        self.scan(tree, &order, (0..order.len()).rev(), Direction::Backward)
    }

    /// The component that should receive focus when the cycle is entered.
    pub fn default_component<T: FocusTreeAccess>(
        &self,
        tree: &T,
        root: T::Id,
    ) -> Result<Option<T::Id>> {
        self.first_component(tree, root)
    }

    /// The component after `current` in the cycle bounded by `root`.
    ///
    /// Returns the first component if `current` is not part of the cycle, and
    /// `None` past the end when wrap-around is disabled.
    pub fn component_after<T: FocusTreeAccess>(
        &self,
        tree: &T,
        root: T::Id,
        current: T::Id,
    ) -> Result<Option<T::Id>> {
        let order = self.traversal_order(tree, root)?;
        let Some(pos) = order.iter().position(|&id| id == current) else {
            return self.scan(tree, &order, 0..order.len(), Direction::Forward);
        };

        let len = order.len();
        let steps: Vec<usize> = if self.config.cycle {
            (1..=len).map(|offset| (pos + offset) % len).collect()
        } else {
            (pos + 1..len).collect()
        };
        self.scan(tree, &order, steps, Direction::Forward)
    }

    /// The component before `current` in the cycle bounded by `root`.
    ///
    /// Returns the last component if `current` is not part of the cycle, and
    /// `None` before the start when wrap-around is disabled.
    pub fn component_before<T: FocusTreeAccess>(
        &self,
        tree: &T,
        root: T::Id,
        current: T::Id,
    ) -> Result<Option<T::Id>> {
        let order = self.traversal_order(tree, root)?;
        let Some(pos) = order.iter().position(|&id| id == current) else {
            return self.scan(tree, &order, (0..order.len()).rev(), Direction::Backward);
        };

        let len = order.len();
        let steps: Vec<usize> = if self.config.cycle {
            (1..=len).map(|offset| (pos + len - offset) % len).collect()
        } else {
            (0..pos).rev().collect()
        };
        self.scan(tree, &order, steps, Direction::Backward)
    }

    /// Return the first entry of `order` (visited in `indices` order) that
    /// resolves to a focusable component.
    fn scan<T: FocusTreeAccess>(
        &self,
        tree: &T,
        order: &[T::Id],
        indices: impl IntoIterator<Item = usize>,
        direction: Direction,
    ) -> Result<Option<T::Id>> {
        for index in indices {
            if let Some(found) = self.resolve(tree, order[index], direction)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Map an entry of the order to the component that receives focus.
    fn resolve<T: FocusTreeAccess>(
        &self,
        tree: &T,
        candidate: T::Id,
        direction: Direction,
    ) -> Result<Option<T::Id>> {
        if self.config.implicit_down_cycle && tree.is_focus_cycle_root(candidate) {
            let inner = match direction {
                Direction::Forward => self.default_component(tree, candidate)?,
                Direction::Backward => self.last_component(tree, candidate)?,
            };
            if inner.is_some() {
                tracing::trace!(
                    target: targets::POLICY,
                    cycle_root = ?candidate,
                    ?inner,
                    "stepped into nested focus cycle"
                );
                return Ok(inner);
            }
        }
        Ok(self.accept(tree, candidate).then_some(candidate))
    }
}

fn is_cycle_root<T: FocusTreeAccess>(tree: &T, id: T::Id) -> bool {
    tree.is_traversal_root(id) || tree.is_focus_cycle_root(id)
}
