//! Tagweld Core Library
//!
//! Core types for the tagweld HTML assembly engine: the canonical tag model,
//! assembly configuration, the build snapshot surface, and error handling.

pub mod config;
pub mod error;
pub mod snapshot;
pub mod tag;

pub use config::{AssembleOptions, ChunkSelection, Inject, MetaConfig, MetaValue, SortMode, SortStrategy};
pub use error::{CoreError, Result};
pub use snapshot::{BuildSnapshot, EntryPoint};
pub use tag::{AttrValue, HtmlTag};
