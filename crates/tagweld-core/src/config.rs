//! Assembly configuration.
//!
//! Options controlling which entry points contribute assets to a document,
//! how they are ordered, and how the generated tags are placed.

use std::{cmp::Ordering, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    tag::AttrValue,
};

/// Which entry points contribute assets to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChunkSelection {
    /// Every entry point in the build.
    #[default]
    All,
    /// Only the named entry points. The list order doubles as the `manual`
    /// sort order.
    Named(Vec<String>),
}

impl ChunkSelection {
    /// Whether the named entry passes the include filter.
    #[must_use]
    pub fn includes(&self, entry_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(names) => names.iter().any(|name| name == entry_name),
        }
    }
}

/// Where generated script tags are placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inject {
    /// No tag injection; templates consume the tag groups through their
    /// parameters instead.
    Disabled,
    /// Scripts join the head group.
    Head,
    /// Scripts form the body group.
    #[default]
    Body,
}

/// Built-in entry ordering strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    /// Dependency-graph topological order: an entry's dependencies load
    /// before it, ties keep the build's order.
    Auto,
    /// The order of the configured include list.
    Manual,
    /// The build's own entry order.
    None,
    /// Lexicographic order by entry name.
    Alphabetical,
}

impl SortStrategy {
    /// Look up a built-in strategy by its configuration name.
    ///
    /// Unknown names are a fatal configuration error.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "auto" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            "none" => Ok(Self::None),
            "alphabetical" => Ok(Self::Alphabetical),
            other => Err(CoreError::config(format!(
                "\"{other}\" is not a valid chunk sort mode"
            ))),
        }
    }
}

/// Requested entry ordering as it appears in configuration: a strategy name
/// resolved during extraction, or an explicit comparator over entry names.
#[derive(Clone)]
pub enum SortMode {
    /// A named built-in strategy (`"auto"`, `"manual"`, `"none"`,
    /// `"alphabetical"`).
    Named(String),
    /// Caller-supplied two-argument comparator.
    Custom(Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>),
}

impl SortMode {
    /// Wrap a comparator closure.
    #[must_use]
    pub fn custom(compare: impl Fn(&str, &str) -> Ordering + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(compare))
    }
}

impl Default for SortMode {
    fn default() -> Self {
        Self::Named("auto".to_string())
    }
}

impl fmt::Debug for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Value side of one configured meta tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
    /// Shorthand: expands to `name="<key>" content="<value>"`.
    Content(String),
    /// Explicit attribute mapping, used verbatim.
    Attributes(Vec<(String, AttrValue)>),
    /// The entry is suppressed.
    Off,
}

/// Meta tag configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum MetaConfig {
    /// No generated meta tags.
    #[default]
    Disabled,
    /// Ordered logical-name to value mapping; tags are generated in this
    /// order.
    Entries(Vec<(String, MetaValue)>),
}

/// Options controlling how one output document is assembled.
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Entry points contributing assets.
    pub chunks: ChunkSelection,

    /// Entry points dropped even when included.
    pub exclude_chunks: Vec<String>,

    /// Entry ordering.
    pub sort_mode: SortMode,

    /// Script placement, or `Disabled` to leave the markup untouched.
    pub inject: Inject,

    /// Append the build hash to asset URLs as a cache-busting query
    /// parameter.
    pub hash: bool,

    /// Self-close void tags.
    pub xhtml: bool,

    /// Generated meta tags.
    pub meta: MetaConfig,

    /// Favicon source path.
    pub favicon: Option<String>,
}

impl AssembleOptions {
    /// Create options with the defaults: all chunks, `auto` sorting, body
    /// injection, no hashing, no meta tags, no favicon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict assets to the named entry points.
    #[must_use]
    pub fn with_chunks(mut self, names: Vec<String>) -> Self {
        self.chunks = ChunkSelection::Named(names);
        self
    }

    /// Drop the named entry points.
    #[must_use]
    pub fn with_exclude_chunks(mut self, names: Vec<String>) -> Self {
        self.exclude_chunks = names;
        self
    }

    /// Set the entry ordering.
    #[must_use]
    pub fn with_sort_mode(mut self, sort_mode: SortMode) -> Self {
        self.sort_mode = sort_mode;
        self
    }

    /// Set the script placement.
    #[must_use]
    pub fn with_inject(mut self, inject: Inject) -> Self {
        self.inject = inject;
        self
    }

    /// Enable cache-busting hash suffixes.
    #[must_use]
    pub fn with_hash(mut self, hash: bool) -> Self {
        self.hash = hash;
        self
    }

    /// Enable XHTML-style self-closing void tags.
    #[must_use]
    pub fn with_xhtml(mut self, xhtml: bool) -> Self {
        self.xhtml = xhtml;
        self
    }

    /// Configure generated meta tags.
    #[must_use]
    pub fn with_meta(mut self, entries: Vec<(String, MetaValue)>) -> Self {
        self.meta = MetaConfig::Entries(entries);
        self
    }

    /// Configure the favicon.
    #[must_use]
    pub fn with_favicon(mut self, favicon: impl Into<String>) -> Self {
        self.favicon = Some(favicon.into());
        self
    }
}
