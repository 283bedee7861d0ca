//! Read-only view of the build system's compilation state.
//!
//! The snapshot is produced once per build by the surrounding build system
//! and shared by every document pipeline; assembly never mutates it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One named root unit of the build and its emitted files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    /// Entry name from the build configuration.
    pub name: String,

    /// Output files in the build's own load order.
    pub files: Vec<String>,

    /// Names of entries that must load before this one. Consulted by the
    /// `auto` sort strategy.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl EntryPoint {
    /// Create an entry point without dependencies.
    #[must_use]
    pub fn new(name: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            name: name.into(),
            files,
            depends_on: Vec::new(),
        }
    }

    /// Declare entries this one depends on.
    #[must_use]
    pub fn with_depends_on(mut self, depends_on: Vec<String>) -> Self {
        self.depends_on = depends_on;
        self
    }
}

/// Immutable snapshot of a finished compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSnapshot {
    /// Entry points in build configuration order.
    pub entry_points: Vec<EntryPoint>,

    /// All emitted output file names (used for manifest detection).
    pub assets: Vec<String>,

    /// Run-scoped hash for cache busting.
    pub hash: Option<String>,

    /// Configured public path; `None` when the build leaves it unset.
    pub public_path: Option<String>,

    /// Resolved output directory.
    pub output_dir: PathBuf,
}

impl BuildSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry point.
    #[must_use]
    pub fn with_entry_point(mut self, entry: EntryPoint) -> Self {
        self.entry_points.push(entry);
        self
    }

    /// Add an emitted asset file name.
    #[must_use]
    pub fn with_asset(mut self, file: impl Into<String>) -> Self {
        self.assets.push(file.into());
        self
    }

    /// Set the run hash.
    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Set an explicit public path.
    #[must_use]
    pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
        self.public_path = Some(public_path.into());
        self
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Entry names in build configuration order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entry_points.iter().map(|entry| entry.name.as_str())
    }

    /// Look up an entry point by name.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&EntryPoint> {
        self.entry_points.iter().find(|entry| entry.name == name)
    }
}
