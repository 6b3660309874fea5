//! Layout-ordered focus traversal for Horizon Lattice.
//!
//! This crate decides the order in which keyboard focus visits the
//! components of a window:
//!
//! - **Layout Comparator**: orders components by reading position, with row
//!   tolerance, reading direction and ancestry reduction
//! - **Traversal Policy**: collects focus candidates of a focus cycle and
//!   answers first/last/next/previous queries
//! - **Focus Manager**: tracks the focused component and moves it on Tab
//! - **Component Tree**: an arena-backed tree the other parts can work on
//! - **Signals**: change notification with explicit subscription handles
//!
//! Any tree can be ordered by implementing [`TraversalAccess`] (and
//! [`FocusTreeAccess`] for the policy and focus manager).
//!
//! # Example
//!
//! ```
//! use lattice_traversal::{
//!     ComponentTree, LayoutTraversalPolicy, Orientation, Point, TraversalConfig,
//! };
//!
//! let mut tree = ComponentTree::new();
//! let window = tree.insert_root("window");
//! for (name, x, y) in [("city", 100, 40), ("name", 0, 0), ("email", 100, 0)] {
//!     let id = tree.insert_child(window, name).unwrap();
//!     tree.set_position(id, Point::new(x, y)).unwrap();
//!     tree.set_focusable(id, true).unwrap();
//! }
//!
//! let policy = LayoutTraversalPolicy::from_config(TraversalConfig::with_orientation(
//!     Orientation::LEFT_TO_RIGHT,
//! ));
//! let order = policy.traversal_order(&tree, window).unwrap();
//! assert_eq!(
//!     lattice_traversal::logging::format_order(&tree, &order).unwrap(),
//!     "name -> email -> city"
//! );
//! ```

mod access;
mod comparator;
mod config;
mod error;
pub mod focus;
pub mod logging;
pub mod policy;
pub mod signal;
mod tree;

pub use access::{FocusTreeAccess, Point, Size, TraversalAccess};
pub use comparator::{LayoutComparator, Orientation, MAX_ANCESTRY_DEPTH, ROW_TOLERANCE};
pub use config::TraversalConfig;
pub use error::{Result, TraversalError};
pub use focus::{FocusChange, FocusManager, FocusReason};
pub use logging::{TreeDebug, TreeStyle};
pub use policy::LayoutTraversalPolicy;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use tree::{ComponentTree, NodeId};
