//! Tag generation.
//!
//! Pure transforms from extracted assets and configuration into the tag
//! model, and grouping of the result into head and body regions.

use tagweld_core::{
    config::{Inject, MetaConfig, MetaValue},
    error::{CoreError, Result},
    tag::HtmlTag,
};

use crate::extract::{AssetBundle, AssetReference};

/// Ungrouped generated tags for one document.
#[derive(Debug, Clone, Default)]
pub struct AssetTags {
    /// Script tags in load order.
    pub scripts: Vec<HtmlTag>,

    /// Stylesheet link tags in load order.
    pub styles: Vec<HtmlTag>,

    /// Meta tags in configuration order.
    pub meta: Vec<HtmlTag>,

    /// Favicon link tags.
    pub favicons: Vec<HtmlTag>,
}

/// Tags grouped by document region.
#[derive(Debug, Clone, Default)]
pub struct TagGroups {
    /// Tags spliced before `</head>`.
    pub head_tags: Vec<HtmlTag>,

    /// Tags spliced before `</body>`.
    pub body_tags: Vec<HtmlTag>,
}

/// One `script` tag per script asset, tagged with its entry point.
#[must_use]
pub fn script_tags(scripts: &[AssetReference]) -> Vec<HtmlTag> {
    scripts
        .iter()
        .map(|asset| {
            HtmlTag::new("script")
                .with_attribute("src", asset.path.as_str())
                .with_source_entry(asset.entry_name.as_str())
        })
        .collect()
}

/// One `link rel="stylesheet"` tag per style asset.
#[must_use]
pub fn style_tags(styles: &[AssetReference]) -> Vec<HtmlTag> {
    styles
        .iter()
        .map(|asset| {
            HtmlTag::void("link")
                .with_attribute("href", asset.path.as_str())
                .with_attribute("rel", "stylesheet")
                .with_source_entry(asset.entry_name.as_str())
        })
        .collect()
}

/// One `meta` tag per surviving configured entry, in configuration order.
///
/// `Content` values expand to `name`/`content` attribute pairs; `Attributes`
/// values are used verbatim; `Off` entries are suppressed. An entry that
/// expands to no attributes at all is a fatal configuration error.
pub fn meta_tags(meta: &MetaConfig) -> Result<Vec<HtmlTag>> {
    let MetaConfig::Entries(entries) = meta else {
        return Ok(Vec::new());
    };

    let mut tags = Vec::new();
    for (name, value) in entries {
        let tag = match value {
            MetaValue::Off => continue,
            MetaValue::Content(content) => HtmlTag::void("meta")
                .with_attribute("name", name.as_str())
                .with_attribute("content", content.as_str()),
            MetaValue::Attributes(attributes) => {
                let mut tag = HtmlTag::void("meta");
                tag.attributes = attributes.clone();
                tag
            }
        };
        if tag.attributes.is_empty() {
            return Err(CoreError::config(format!("invalid meta tag \"{name}\"")));
        }
        tags.push(tag);
    }
    Ok(tags)
}

/// A single `link rel="shortcut icon"` tag when a favicon is configured.
#[must_use]
pub fn favicon_tags(favicon: Option<&str>) -> Vec<HtmlTag> {
    match favicon {
        None => Vec::new(),
        Some(path) => vec![HtmlTag::void("link")
            .with_attribute("rel", "shortcut icon")
            .with_attribute("href", path)],
    }
}

/// Generate the full ungrouped tag set for a bundle.
pub fn generate_tags(assets: &AssetBundle, meta: &MetaConfig) -> Result<AssetTags> {
    Ok(AssetTags {
        scripts: script_tags(&assets.scripts),
        styles: style_tags(&assets.styles),
        meta: meta_tags(meta)?,
        favicons: favicon_tags(assets.favicon.as_deref()),
    })
}

/// Group tags into head and body regions.
///
/// The head always holds meta, favicons and styles, in that fixed order.
/// Scripts go wholesale to the body unless the head target was configured;
/// they are never split between the two groups.
#[must_use]
pub fn group_tags(tags: AssetTags, script_target: Inject) -> TagGroups {
    let mut groups = TagGroups::default();
    groups.head_tags.extend(tags.meta);
    groups.head_tags.extend(tags.favicons);
    groups.head_tags.extend(tags.styles);

    if script_target == Inject::Head {
        groups.head_tags.extend(tags.scripts);
    } else {
        groups.body_tags.extend(tags.scripts);
    }
    groups
}
