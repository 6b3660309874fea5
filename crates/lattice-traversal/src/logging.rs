//! Logging targets and debug visualization.
//!
//! The crate logs through `tracing`. Install a subscriber in the application
//! to see the output:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("lattice_traversal::focus=debug")
//!     .init();
//! ```
//!
//! [`TreeDebug`] renders a [`ComponentTree`] with the data that drives
//! traversal order (positions, z-order, root markers), and [`format_order`]
//! renders a computed order on one line.

use std::fmt::Write as _;

use crate::access::{FocusTreeAccess, TraversalAccess};
use crate::error::Result;
use crate::tree::{ComponentTree, NodeId};

/// Target names for log filtering.
pub mod targets {
    /// Layout comparison.
    pub const COMPARATOR: &str = "lattice_traversal::comparator";
    /// Candidate collection and traversal steps.
    pub const POLICY: &str = "lattice_traversal::policy";
    /// Focus changes.
    pub const FOCUS: &str = "lattice_traversal::focus";
    /// Component tree mutation.
    pub const TREE: &str = "lattice_traversal::tree";
    /// Signal emission.
    pub const SIGNAL: &str = "lattice_traversal::signal";
    /// Configuration loading.
    pub const CONFIG: &str = "lattice_traversal::config";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// Renders a component tree for debugging.
#[derive(Debug, Clone)]
pub struct TreeDebug {
    style: TreeStyle,
    show_geometry: bool,
}

impl TreeDebug {
    /// Unicode output with positions and sizes.
    pub fn new() -> Self {
        Self {
            style: TreeStyle::Unicode,
            show_geometry: true,
        }
    }

    /// Use the given branch style.
    pub fn style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    /// Include or omit positions and sizes.
    pub fn show_geometry(mut self, show: bool) -> Self {
        self.show_geometry = show;
        self
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree(&self, tree: &ComponentTree, root: NodeId) -> Result<String> {
        let mut output = String::new();
        self.format_node(tree, root, "", None, &mut output)?;
        Ok(output)
    }

    /// `is_last` is `None` for the subtree root.
    fn format_node(
        &self,
        tree: &ComponentTree,
        id: NodeId,
        prefix: &str,
        is_last: Option<bool>,
        output: &mut String,
    ) -> Result<()> {
        let (tee, corner, pipe) = match self.style {
            TreeStyle::Ascii => ("+-- ", "`-- ", "|   "),
            TreeStyle::Unicode => (
                "\u{251c}\u{2500}\u{2500} ",
                "\u{2514}\u{2500}\u{2500} ",
                "\u{2502}   ",
            ),
        };

        output.push_str(prefix);
        match is_last {
            Some(true) => output.push_str(corner),
            Some(false) => output.push_str(tee),
            None => {}
        }

        let name = tree.name(id)?;
        output.push_str(if name.is_empty() { "(unnamed)" } else { name });
        let _ = write!(output, " z={}", tree.z_order(id)?);
        if self.show_geometry {
            let size = tree.size(id)?;
            let _ = write!(output, " at {} {}x{}", tree.position(id)?, size.width, size.height);
        }
        if TraversalAccess::is_traversal_root(tree, id) {
            output.push_str(" [root]");
        }
        if FocusTreeAccess::is_focus_cycle_root(tree, id) {
            output.push_str(" [cycle]");
        }
        if FocusTreeAccess::is_focusable(tree, id) {
            output.push_str(" [focusable]");
        }
        output.push('\n');

        let child_prefix = match is_last {
            Some(true) => format!("{prefix}    "),
            Some(false) => format!("{prefix}{pipe}"),
            None => prefix.to_owned(),
        };
        let children = tree.children(id)?;
        for (i, &child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            self.format_node(tree, child, &child_prefix, Some(last), output)?;
        }
        Ok(())
    }
}

impl Default for TreeDebug {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a traversal order as `name -> name -> ...`.
pub fn format_order(tree: &ComponentTree, order: &[NodeId]) -> Result<String> {
    let names = order
        .iter()
        .map(|&id| tree.name(id))
        .collect::<Result<Vec<_>>>()?;
    Ok(names.join(" -> "))
}
