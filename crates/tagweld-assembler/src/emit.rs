//! Asset emission sinks.
//!
//! Finished HTML is registered with the surrounding build keyed by output
//! name; the key is what keeps concurrently finishing pipelines from
//! colliding. The trait seam lets hosts plug their real compilation surface
//! in; the in-memory and directory sinks cover tests and standalone use.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use thiserror::Error;
use tracing::debug;

/// Emission errors.
#[derive(Debug, Error)]
pub enum EmitError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The sink rejected the output name.
    #[error("invalid output name: {0}")]
    InvalidName(String),
}

/// Result type for emission operations.
pub type Result<T> = std::result::Result<T, EmitError>;

/// Destination for finished HTML documents, keyed by output name.
pub trait AssetEmitter: Send + Sync {
    /// Register one finished document under its output name.
    fn emit(&self, output_name: &str, html: &str) -> Result<()>;
}

/// In-memory sink.
#[derive(Debug, Default)]
pub struct MemoryEmitter {
    documents: Mutex<BTreeMap<String, String>>,
}

impl MemoryEmitter {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The emitted HTML for an output name, if present.
    #[must_use]
    pub fn get(&self, output_name: &str) -> Option<String> {
        self.lock().get(output_name).cloned()
    }

    /// Number of emitted documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        match self.documents.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl AssetEmitter for MemoryEmitter {
    fn emit(&self, output_name: &str, html: &str) -> Result<()> {
        self.lock()
            .insert(output_name.to_string(), html.to_string());
        Ok(())
    }
}

/// Filesystem sink writing `<root>/<output name>`.
#[derive(Debug)]
pub struct DirEmitter {
    root: PathBuf,
}

impl DirEmitter {
    /// Create a sink rooted at the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Full path for an output name.
    #[must_use]
    pub fn path_for(&self, output_name: &str) -> PathBuf {
        self.root.join(output_name)
    }
}

impl AssetEmitter for DirEmitter {
    fn emit(&self, output_name: &str, html: &str) -> Result<()> {
        if output_name.is_empty() || Path::new(output_name).is_absolute() {
            return Err(EmitError::InvalidName(output_name.to_string()));
        }

        let path = self.path_for(output_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, html)?;
        debug!(path = %path.display(), "wrote document");
        Ok(())
    }
}
