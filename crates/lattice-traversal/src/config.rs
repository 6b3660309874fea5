//! Traversal configuration.
//!
//! Configuration can be built in code or read from TOML:
//!
//! ```toml
//! cycle = true
//! implicit_down_cycle = true
//!
//! [orientation]
//! horizontal = true
//! left_to_right = false
//! ```
//!
//! Every key is optional; missing keys take the values of
//! [`TraversalConfig::default`].

use std::path::Path;

use serde::Deserialize;

use crate::comparator::Orientation;
use crate::error::{Result, TraversalError};
use crate::logging::targets;

/// Settings for a [`LayoutTraversalPolicy`](crate::LayoutTraversalPolicy).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraversalConfig {
    /// Reading order used to sort candidates.
    pub orientation: Orientation,
    /// Wrap from the last component to the first (and back).
    pub cycle: bool,
    /// Step into nested focus cycle roots instead of stopping on them.
    pub implicit_down_cycle: bool,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            cycle: true,
            implicit_down_cycle: true,
        }
    }
}

impl TraversalConfig {
    /// Default settings with the given orientation.
    pub fn with_orientation(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    /// Parse configuration from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|err| TraversalError::config(err.to_string()))
    }

    /// Read configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source =
            std::fs::read_to_string(path).map_err(|err| TraversalError::io(path, err))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            target: targets::CONFIG,
            path = %path.display(),
            ?config,
            "loaded traversal configuration"
        );
        Ok(config)
    }
}
