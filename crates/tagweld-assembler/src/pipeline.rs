//! Pipeline orchestration.
//!
//! Drives one output document through extraction, tag generation, grouping,
//! template execution, injection and emission, with an interception point
//! between every pair of stages. Independent output files run through
//! separate [`DocumentPipeline::run`] calls against the same shared
//! snapshot; a failing stage or listener unwinds only its own call.

use std::fmt;

use tagweld_core::{
    config::{AssembleOptions, Inject},
    error::CoreError,
    snapshot::BuildSnapshot,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    emit::{AssetEmitter, EmitError},
    extract::extract,
    hooks::{
        AfterEmit, AfterTemplateExecution, AlterAssetTagGroups, AlterAssetTags,
        BeforeAssetTagGeneration, BeforeEmit, DocumentHooks, HookError,
    },
    render::{inject_manifest, inject_tags, render_template, RenderError, TemplateFn, TemplateParameters},
    tags::{generate_tags, group_tags, TagGroups},
};

/// Pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] CoreError),

    /// Template execution error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// A listener aborted the pipeline.
    #[error("{0}")]
    Listener(#[from] HookError),

    /// Emission failed.
    #[error("emit error: {0}")]
    Emit(#[from] EmitError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Assembles one output document per [`run`](DocumentPipeline::run) call.
pub struct DocumentPipeline {
    options: AssembleOptions,
    template: TemplateFn,
    hooks: DocumentHooks,
}

impl DocumentPipeline {
    /// Create a pipeline over the given options and template.
    #[must_use]
    pub fn new(options: AssembleOptions, template: TemplateFn) -> Self {
        Self {
            options,
            template,
            hooks: DocumentHooks::new(),
        }
    }

    /// The pipeline's interception points.
    #[must_use]
    pub fn hooks(&self) -> &DocumentHooks {
        &self.hooks
    }

    /// Mutable access for listener registration.
    pub fn hooks_mut(&mut self) -> &mut DocumentHooks {
        &mut self.hooks
    }

    /// The configured options.
    #[must_use]
    pub fn options(&self) -> &AssembleOptions {
        &self.options
    }

    /// Drive one output document through every stage and emit the result.
    ///
    /// Returns the final HTML. A failing stage or listener aborts this call
    /// without emitting anything; other documents are unaffected.
    pub async fn run(
        &self,
        snapshot: &BuildSnapshot,
        output_name: &str,
        emitter: &dyn AssetEmitter,
    ) -> Result<String> {
        debug!(output = output_name, "assembling document");

        let assets = extract(snapshot, &self.options, output_name)?;
        let BeforeAssetTagGeneration { assets, .. } = self
            .hooks
            .before_asset_tag_generation
            .call(BeforeAssetTagGeneration {
                assets,
                output_name: output_name.to_string(),
            })
            .await?;

        let tags = generate_tags(&assets, &self.options.meta)?;
        let AlterAssetTags { tags, .. } = self
            .hooks
            .alter_asset_tags
            .call(AlterAssetTags {
                tags,
                output_name: output_name.to_string(),
            })
            .await?;

        let groups = group_tags(tags, self.options.inject);
        let AlterAssetTagGroups {
            head_tags,
            body_tags,
            ..
        } = self
            .hooks
            .alter_asset_tag_groups
            .call(AlterAssetTagGroups {
                head_tags: groups.head_tags,
                body_tags: groups.body_tags,
                output_name: output_name.to_string(),
            })
            .await?;

        let parameters = TemplateParameters {
            assets: assets.clone(),
            head_tags: head_tags.clone(),
            body_tags: body_tags.clone(),
            output_name: output_name.to_string(),
        };
        let html = render_template(&self.template, &parameters)?;

        let AfterTemplateExecution {
            html,
            head_tags,
            body_tags,
            ..
        } = self
            .hooks
            .after_template_execution
            .call(AfterTemplateExecution {
                html,
                head_tags,
                body_tags,
                output_name: output_name.to_string(),
            })
            .await?;

        let html = if self.options.inject == Inject::Disabled {
            html
        } else {
            inject_tags(
                &html,
                &TagGroups {
                    head_tags,
                    body_tags,
                },
                self.options.xhtml,
            )
        };
        let html = inject_manifest(&html, assets.manifest.as_deref());

        let BeforeEmit { html, .. } = self
            .hooks
            .before_emit
            .call(BeforeEmit {
                html,
                output_name: output_name.to_string(),
            })
            .await?;

        emitter.emit(output_name, &html)?;
        info!(output = output_name, bytes = html.len(), "emitted document");

        self.hooks
            .after_emit
            .call(AfterEmit {
                output_name: output_name.to_string(),
            })
            .await?;

        Ok(html)
    }
}

impl fmt::Debug for DocumentPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentPipeline")
            .field("options", &self.options)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tagweld_core::snapshot::EntryPoint;

    use crate::emit::MemoryEmitter;

    use super::*;

    fn snapshot() -> BuildSnapshot {
        BuildSnapshot::new()
            .with_entry_point(EntryPoint::new(
                "main",
                vec!["main.js".to_string(), "main.css".to_string()],
            ))
            .with_public_path("/assets/")
    }

    fn shell_template() -> TemplateFn {
        Arc::new(|_| Ok("<html><head></head><body></body></html>".to_string()))
    }

    #[tokio::test]
    async fn test_run_injects_and_emits() {
        let pipeline = DocumentPipeline::new(AssembleOptions::new(), shell_template());
        let emitter = MemoryEmitter::new();

        let html = pipeline.run(&snapshot(), "index.html", &emitter).await.unwrap();

        assert!(html.contains(r#"<link href="/assets/main.css" rel="stylesheet"></head>"#));
        assert!(html.contains(r#"<script src="/assets/main.js"></script></body>"#));
        assert_eq!(emitter.get("index.html").as_deref(), Some(html.as_str()));
    }

    #[tokio::test]
    async fn test_run_with_injection_disabled_keeps_template_output() {
        let options = AssembleOptions::new().with_inject(Inject::Disabled);
        let pipeline = DocumentPipeline::new(options, shell_template());
        let emitter = MemoryEmitter::new();

        let html = pipeline.run(&snapshot(), "index.html", &emitter).await.unwrap();

        assert_eq!(html, "<html><head></head><body></body></html>");
    }

    #[tokio::test]
    async fn test_template_receives_tag_parameters() {
        let template: TemplateFn = Arc::new(|parameters| {
            let head: String = parameters.head_tags.iter().map(|t| t.render(false)).collect();
            let body: String = parameters.body_tags.iter().map(|t| t.render(false)).collect();
            Ok(format!("<head>{head}</head><body>{body}</body>"))
        });
        let options = AssembleOptions::new().with_inject(Inject::Disabled);
        let pipeline = DocumentPipeline::new(options, template);
        let emitter = MemoryEmitter::new();

        let html = pipeline.run(&snapshot(), "index.html", &emitter).await.unwrap();

        assert!(html.contains(r#"<link href="/assets/main.css" rel="stylesheet">"#));
        assert!(html.contains(r#"<script src="/assets/main.js"></script>"#));
    }

    #[tokio::test]
    async fn test_template_error_aborts_without_emission() {
        let template: TemplateFn = Arc::new(|_| Err("template exploded".into()));
        let pipeline = DocumentPipeline::new(AssembleOptions::new(), template);
        let emitter = MemoryEmitter::new();

        let err = pipeline.run(&snapshot(), "index.html", &emitter).await.unwrap_err();

        assert!(matches!(err, PipelineError::Render(_)));
        assert!(err.to_string().contains("template exploded"));
        assert!(emitter.is_empty());
    }

    #[tokio::test]
    async fn test_listener_failure_aborts_without_emission() {
        let mut pipeline = DocumentPipeline::new(AssembleOptions::new(), shell_template());
        pipeline
            .hooks_mut()
            .before_emit
            .tap(|_| Box::pin(async { Err("vetoed".into()) }));
        let emitter = MemoryEmitter::new();

        let err = pipeline.run(&snapshot(), "index.html", &emitter).await.unwrap_err();

        assert!(matches!(err, PipelineError::Listener(_)));
        assert!(err.to_string().contains("before_emit"));
        assert!(emitter.is_empty());
    }

    #[tokio::test]
    async fn test_after_emit_failure_still_surfaces() {
        let mut pipeline = DocumentPipeline::new(AssembleOptions::new(), shell_template());
        pipeline
            .hooks_mut()
            .after_emit
            .tap(|_| Box::pin(async { Err("late failure".into()) }));
        let emitter = MemoryEmitter::new();

        let err = pipeline.run(&snapshot(), "index.html", &emitter).await.unwrap_err();

        assert!(err.to_string().contains("late failure"));
        // Emission itself happened before the terminal notification.
        assert_eq!(emitter.len(), 1);
    }

    #[tokio::test]
    async fn test_manifest_attribute_injected() {
        let snapshot = snapshot().with_asset("offline.appcache");
        let pipeline = DocumentPipeline::new(AssembleOptions::new(), shell_template());
        let emitter = MemoryEmitter::new();

        let html = pipeline.run(&snapshot, "index.html", &emitter).await.unwrap();

        assert!(html.starts_with(r#"<html manifest="offline.appcache">"#));
    }
}
