//! Keyboard focus tracking and Tab navigation.
//!
//! [`FocusManager`] remembers which component has focus and moves it through
//! the order computed by a [`LayoutTraversalPolicy`]. Every change is
//! announced on [`FocusManager::focus_changed`].
//!
//! Navigation happens inside the focus cycle of the focused component: if
//! focus sits inside a nested focus cycle root, Tab cycles within that root
//! until [`FocusManager::focus_up_cycle`] leaves it.
//!
//! ```
//! use lattice_traversal::{ComponentTree, FocusManager, FocusReason, Point};
//!
//! let mut tree = ComponentTree::new();
//! let window = tree.insert_root("window");
//! let name = tree.insert_child(window, "name").unwrap();
//! let email = tree.insert_child(window, "email").unwrap();
//! tree.set_position(email, Point::new(100, 0)).unwrap();
//! tree.set_focusable(name, true).unwrap();
//! tree.set_focusable(email, true).unwrap();
//!
//! let mut focus = FocusManager::new();
//! assert!(focus.focus_next(&tree, window).unwrap());
//! assert_eq!(focus.focused(), Some(name));
//! assert!(focus.focus_next(&tree, window).unwrap());
//! assert_eq!(focus.focused(), Some(email));
//! ```

use std::fmt;

use crate::access::FocusTreeAccess;
use crate::error::Result;
use crate::logging::targets;
use crate::policy::LayoutTraversalPolicy;
use crate::signal::Signal;

/// Why focus changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusReason {
    /// Forward keyboard navigation.
    Tab,
    /// Backward keyboard navigation.
    Backtab,
    /// Focus left a nested focus cycle.
    UpCycle,
    /// Focus entered a nested focus cycle.
    DownCycle,
    /// Focus moved by application code.
    Programmatic,
    /// Any other cause.
    Other,
}

/// Payload of [`FocusManager::focus_changed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusChange<Id> {
    /// The component that lost focus.
    pub old: Option<Id>,
    /// The component that gained focus.
    pub new: Option<Id>,
    /// What triggered the change.
    pub reason: FocusReason,
}

/// Tracks the focused component of one component tree.
pub struct FocusManager<Id> {
    focused: Option<Id>,
    policy: LayoutTraversalPolicy,
    /// Emitted after every focus change.
    pub focus_changed: Signal<FocusChange<Id>>,
}

impl<Id: fmt::Debug> fmt::Debug for FocusManager<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusManager")
            .field("focused", &self.focused)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<Id: Copy + Eq + fmt::Debug> Default for FocusManager<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Copy + Eq + fmt::Debug> FocusManager<Id> {
    /// Create a focus manager using the default policy.
    pub fn new() -> Self {
        Self::with_policy(LayoutTraversalPolicy::new())
    }

    /// Create a focus manager using the given policy.
    pub fn with_policy(policy: LayoutTraversalPolicy) -> Self {
        Self {
            focused: None,
            policy,
            focus_changed: Signal::new(),
        }
    }

    /// The traversal policy.
    pub fn policy(&self) -> &LayoutTraversalPolicy {
        &self.policy
    }

    /// Mutable access to the traversal policy.
    pub fn policy_mut(&mut self) -> &mut LayoutTraversalPolicy {
        &mut self.policy
    }

    /// The focused component.
    #[inline]
    pub fn focused(&self) -> Option<Id> {
        self.focused
    }

    /// Whether `id` has focus.
    #[inline]
    pub fn has_focus(&self, id: Id) -> bool {
        self.focused == Some(id)
    }

    /// Give focus to `id`.
    ///
    /// Returns `false` and leaves focus unchanged if the policy does not
    /// accept the component. Focusing the already focused component is a
    /// no-op that returns `true`.
    pub fn set_focus<T>(&mut self, tree: &T, id: Id, reason: FocusReason) -> bool
    where
        T: FocusTreeAccess<Id = Id>,
    {
        if !self.policy.accept(tree, id) {
            tracing::debug!(target: targets::FOCUS, ?id, "component cannot take focus");
            return false;
        }
        if self.focused == Some(id) {
            return true;
        }
        self.change_focus(Some(id), reason);
        true
    }

    /// Remove focus from whatever has it.
    pub fn clear_focus(&mut self, reason: FocusReason) {
        if self.focused.is_some() {
            self.change_focus(None, reason);
        }
    }

    /// Move focus forward within the current focus cycle of `root`'s tree.
    ///
    /// With nothing focused, focuses the first component of `root`.
    /// Returns `Ok(false)` if no component could be focused.
    pub fn focus_next<T>(&mut self, tree: &T, root: Id) -> Result<bool>
    where
        T: FocusTreeAccess<Id = Id>,
    {
        let target = match self.focused_in(tree) {
            Some(current) => {
                let cycle_root = self.cycle_root(tree, root, current);
                self.policy.component_after(tree, cycle_root, current)?
            }
            None => self.policy.first_component(tree, root)?,
        };
        Ok(self.focus_target(tree, target, FocusReason::Tab))
    }

    /// Move focus backward within the current focus cycle.
    ///
    /// With nothing focused, focuses the last component of `root`.
    pub fn focus_previous<T>(&mut self, tree: &T, root: Id) -> Result<bool>
    where
        T: FocusTreeAccess<Id = Id>,
    {
        let target = match self.focused_in(tree) {
            Some(current) => {
                let cycle_root = self.cycle_root(tree, root, current);
                self.policy.component_before(tree, cycle_root, current)?
            }
            None => self.policy.last_component(tree, root)?,
        };
        Ok(self.focus_target(tree, target, FocusReason::Backtab))
    }

    /// Focus the first component of `root`.
    pub fn focus_first<T>(&mut self, tree: &T, root: Id) -> Result<bool>
    where
        T: FocusTreeAccess<Id = Id>,
    {
        let target = self.policy.first_component(tree, root)?;
        Ok(self.focus_target(tree, target, FocusReason::Tab))
    }

    /// Focus the last component of `root`.
    pub fn focus_last<T>(&mut self, tree: &T, root: Id) -> Result<bool>
    where
        T: FocusTreeAccess<Id = Id>,
    {
        let target = self.policy.last_component(tree, root)?;
        Ok(self.focus_target(tree, target, FocusReason::Backtab))
    }

    /// Leave the nested focus cycle containing the focused component.
    ///
    /// Focus goes to the nested cycle root if it accepts focus, otherwise to
    /// the component after it in the enclosing cycle. Does nothing when focus
    /// is already in `root`'s own cycle.
    pub fn focus_up_cycle<T>(&mut self, tree: &T, root: Id) -> Result<bool>
    where
        T: FocusTreeAccess<Id = Id>,
    {
        let Some(current) = self.focused_in(tree) else {
            return Ok(false);
        };
        let nested = self.cycle_root(tree, root, current);
        if nested == root {
            return Ok(false);
        }

        let target = if self.policy.accept(tree, nested) {
            Some(nested)
        } else {
            let outer = self.cycle_root(tree, root, nested);
            let mut policy = self.policy;
            policy.set_implicit_down_cycle(false);
            policy.component_after(tree, outer, nested)?
        };
        Ok(self.focus_target(tree, target, FocusReason::UpCycle))
    }

    /// Enter the focus cycle rooted at the focused component.
    ///
    /// Focus goes to the default component of that cycle. Does nothing unless
    /// the focused component is a focus cycle root.
    pub fn focus_down_cycle<T>(&mut self, tree: &T) -> Result<bool>
    where
        T: FocusTreeAccess<Id = Id>,
    {
        let Some(current) = self.focused_in(tree) else {
            return Ok(false);
        };
        if !tree.is_focus_cycle_root(current) {
            return Ok(false);
        }
        let target = self.policy.default_component(tree, current)?;
        Ok(self.focus_target(tree, target, FocusReason::DownCycle))
    }

    /// The focused component, forgetting it if it was destroyed.
    fn focused_in<T>(&mut self, tree: &T) -> Option<Id>
    where
        T: FocusTreeAccess<Id = Id>,
    {
        match self.focused {
            Some(id) if !tree.contains(id) => {
                tracing::debug!(target: targets::FOCUS, ?id, "focused component no longer exists");
                self.focused = None;
                None
            }
            other => other,
        }
    }

    /// The focus cycle root of `id`, never above `root`.
    fn cycle_root<T>(&self, tree: &T, root: Id, id: Id) -> Id
    where
        T: FocusTreeAccess<Id = Id>,
    {
        if id == root {
            return root;
        }
        self.policy.cycle_root_of(tree, id).unwrap_or(root)
    }

    fn focus_target<T>(&mut self, tree: &T, target: Option<Id>, reason: FocusReason) -> bool
    where
        T: FocusTreeAccess<Id = Id>,
    {
        match target {
            Some(id) => self.set_focus(tree, id, reason),
            None => false,
        }
    }

    fn change_focus(&mut self, new: Option<Id>, reason: FocusReason) {
        let old = std::mem::replace(&mut self.focused, new);
        tracing::debug!(target: targets::FOCUS, ?old, ?new, ?reason, "focus changed");
        self.focus_changed.emit(FocusChange { old, new, reason });
    }
}
