//! Tagweld Assembler Library
//!
//! HTML document assembly engine for tagweld.
//!
//! # Modules
//!
//! - [`extract`] - Asset extraction from a compilation snapshot
//! - [`tags`] - Tag generation and head/body grouping
//! - [`render`] - Template execution and tag injection
//! - [`hooks`] - Async interception points for external observers
//! - [`emit`] - Emission sinks
//! - [`pipeline`] - Pipeline orchestration

pub mod emit;
pub mod extract;
pub mod hooks;
pub mod pipeline;
pub mod render;
pub mod tags;

pub use emit::{AssetEmitter, DirEmitter, EmitError, MemoryEmitter};
pub use extract::{extract, AssetBundle, AssetReference};
pub use hooks::{BoxFuture, DocumentHooks, Hook, HookError, ListenerError};
pub use pipeline::{DocumentPipeline, PipelineError};
pub use render::{RenderError, TemplateFn, TemplateParameters};
pub use tags::{group_tags, AssetTags, TagGroups};
