//! Interception points for external pipeline observers.
//!
//! Each stage boundary is an async hook: listeners run in registration
//! order, receive the in-flight payload, and return it (possibly rewritten)
//! for the next listener and the following stage. A failing listener aborts
//! the owning pipeline.

use std::{fmt, future::Future, pin::Pin, sync::Arc};

use tagweld_core::tag::HtmlTag;
use thiserror::Error;

use crate::{extract::AssetBundle, tags::AssetTags};

/// Boxed future returned by hook listeners.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Error raised by a listener; carried unmodified.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

type Listener<P> = Arc<dyn Fn(P) -> BoxFuture<std::result::Result<P, ListenerError>> + Send + Sync>;

/// A listener failure, tagged with the interception point that raised it.
#[derive(Debug, Error)]
#[error("listener failed at {hook}: {error}")]
pub struct HookError {
    /// Interception point name.
    pub hook: &'static str,

    /// The listener's error, unmodified.
    pub error: ListenerError,
}

/// One interception point: an ordered chain of listeners over payload `P`.
pub struct Hook<P> {
    name: &'static str,
    listeners: Vec<Listener<P>>,
}

impl<P: Send + 'static> Hook<P> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: Vec::new(),
        }
    }

    /// Stage-boundary name, e.g. `before_emit`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Register a listener at the end of the chain.
    pub fn tap<F>(&mut self, listener: F)
    where
        F: Fn(P) -> BoxFuture<std::result::Result<P, ListenerError>> + Send + Sync + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    /// Run the chain, handing each listener the previous one's output.
    pub async fn call(&self, mut payload: P) -> std::result::Result<P, HookError> {
        for listener in &self.listeners {
            payload = listener(payload).await.map_err(|error| HookError {
                hook: self.name,
                error,
            })?;
        }
        Ok(payload)
    }
}

impl<P> fmt::Debug for Hook<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Payload at the boundary between extraction and tag generation.
#[derive(Debug, Clone)]
pub struct BeforeAssetTagGeneration {
    /// The extracted asset bundle.
    pub assets: AssetBundle,

    /// Output name of the document being assembled.
    pub output_name: String,
}

/// Payload carrying the generated but still ungrouped tags.
#[derive(Debug, Clone)]
pub struct AlterAssetTags {
    /// Generated tags by kind.
    pub tags: AssetTags,

    /// Output name of the document being assembled.
    pub output_name: String,
}

/// Payload carrying the grouped head and body tags.
#[derive(Debug, Clone)]
pub struct AlterAssetTagGroups {
    /// Tags destined for the document head.
    pub head_tags: Vec<HtmlTag>,

    /// Tags destined for the document body.
    pub body_tags: Vec<HtmlTag>,

    /// Output name of the document being assembled.
    pub output_name: String,
}

/// Payload carrying the rendered template output and the current groups.
#[derive(Debug, Clone)]
pub struct AfterTemplateExecution {
    /// Rendered HTML before injection.
    pub html: String,

    /// Tags destined for the document head.
    pub head_tags: Vec<HtmlTag>,

    /// Tags destined for the document body.
    pub body_tags: Vec<HtmlTag>,

    /// Output name of the document being assembled.
    pub output_name: String,
}

/// Payload carrying the final HTML just before emission.
#[derive(Debug, Clone)]
pub struct BeforeEmit {
    /// Final HTML.
    pub html: String,

    /// Output name of the document being assembled.
    pub output_name: String,
}

/// Terminal notification payload.
#[derive(Debug, Clone)]
pub struct AfterEmit {
    /// Output name of the emitted document.
    pub output_name: String,
}

/// The six interception points of a document pipeline, in firing order.
#[derive(Debug)]
pub struct DocumentHooks {
    /// After extraction, before tag generation.
    pub before_asset_tag_generation: Hook<BeforeAssetTagGeneration>,

    /// After tag generation, before grouping.
    pub alter_asset_tags: Hook<AlterAssetTags>,

    /// After grouping, before template execution.
    pub alter_asset_tag_groups: Hook<AlterAssetTagGroups>,

    /// After template execution, before injection.
    pub after_template_execution: Hook<AfterTemplateExecution>,

    /// After injection, before emission.
    pub before_emit: Hook<BeforeEmit>,

    /// After emission.
    pub after_emit: Hook<AfterEmit>,
}

impl DocumentHooks {
    /// Create the hook set with empty listener chains.
    #[must_use]
    pub fn new() -> Self {
        Self {
            before_asset_tag_generation: Hook::new("before_asset_tag_generation"),
            alter_asset_tags: Hook::new("alter_asset_tags"),
            alter_asset_tag_groups: Hook::new("alter_asset_tag_groups"),
            after_template_execution: Hook::new("after_template_execution"),
            before_emit: Hook::new("before_emit"),
            after_emit: Hook::new("after_emit"),
        }
    }
}

impl Default for DocumentHooks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listeners_run_in_registration_order() {
        let mut hook: Hook<Vec<u32>> = Hook::new("order");
        hook.tap(|mut payload: Vec<u32>| {
            Box::pin(async move {
                payload.push(1);
                Ok(payload)
            })
        });
        hook.tap(|mut payload: Vec<u32>| {
            Box::pin(async move {
                payload.push(2);
                Ok(payload)
            })
        });

        let result = hook.call(Vec::new()).await.unwrap();
        assert_eq!(result, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_listener_rewrites_payload() {
        let mut hook: Hook<BeforeEmit> = Hook::new("before_emit");
        hook.tap(|mut payload: BeforeEmit| {
            Box::pin(async move {
                payload.html = payload.html.replace("old", "new");
                Ok(payload)
            })
        });

        let result = hook
            .call(BeforeEmit {
                html: "<p>old</p>".to_string(),
                output_name: "index.html".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(result.html, "<p>new</p>");
    }

    #[tokio::test]
    async fn test_failing_listener_stops_the_chain() {
        let mut hook: Hook<u32> = Hook::new("failing");
        hook.tap(|_| Box::pin(async { Err("listener refused".into()) }));
        hook.tap(|payload: u32| Box::pin(async move { Ok(payload + 1) }));

        let err = hook.call(0).await.unwrap_err();
        assert_eq!(err.hook, "failing");
        assert!(err.to_string().contains("listener refused"));
    }

    #[tokio::test]
    async fn test_empty_hook_passes_payload_through() {
        let hook: Hook<u32> = Hook::new("empty");
        assert!(hook.is_empty());
        assert_eq!(hook.call(7).await.unwrap(), 7);
    }
}
