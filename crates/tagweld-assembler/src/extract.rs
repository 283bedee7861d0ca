//! Asset extraction from a compilation snapshot.
//!
//! Resolves the public path, filters and sorts the entry points, and
//! classifies their output files into script and style references.

use std::{
    collections::HashSet,
    path::{Component, Path},
    sync::LazyLock,
};

use regex::Regex;
use tagweld_core::{
    config::{AssembleOptions, ChunkSelection, SortMode, SortStrategy},
    error::Result,
    snapshot::BuildSnapshot,
};
use tracing::debug;

/// Extension of the legacy offline manifest.
const MANIFEST_EXTENSION: &str = "appcache";

/// Matches `.js` / `.css`, tolerating a trailing query string.
static EXTENSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(js|css)(\?|$)").expect("valid extension pattern"));

/// One resolved asset URL tagged with its producing entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    /// Entry point that produced the file.
    pub entry_name: String,

    /// Public-path-prefixed URL, optionally hash-suffixed.
    pub path: String,
}

/// All assets contributing to one output document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetBundle {
    /// URL prefix under which emitted files are served.
    pub public_path: String,

    /// Script references in load order.
    pub scripts: Vec<AssetReference>,

    /// Stylesheet references in load order.
    pub styles: Vec<AssetReference>,

    /// Offline manifest asset, if the build emitted one.
    pub manifest: Option<String>,

    /// Resolved favicon path, if configured.
    pub favicon: Option<String>,
}

/// Extract the filtered, sorted, public-path-resolved asset bundle for one
/// output document.
///
/// Fails only when an unknown sort mode name was requested.
pub fn extract(
    snapshot: &BuildSnapshot,
    options: &AssembleOptions,
    output_name: &str,
) -> Result<AssetBundle> {
    let public_path = resolve_public_path(snapshot, output_name);
    let entry_names = sorted_entry_names(snapshot, options)?;

    let mut bundle = AssetBundle {
        public_path: public_path.clone(),
        ..AssetBundle::default()
    };

    bundle.manifest = snapshot
        .assets
        .iter()
        .find(|file| {
            Path::new(file.as_str())
                .extension()
                .is_some_and(|ext| ext == MANIFEST_EXTENSION)
        })
        .map(|file| with_cache_bust(file.clone(), snapshot, options));

    bundle.favicon = options.favicon.as_deref().map(|favicon| {
        let file_name = Path::new(favicon)
            .file_name()
            .map_or_else(|| favicon.to_string(), |name| name.to_string_lossy().into_owned());
        with_cache_bust(format!("{public_path}{file_name}"), snapshot, options)
    });

    for entry_name in &entry_names {
        let Some(entry) = snapshot.entry(entry_name) else {
            continue;
        };
        for file in &entry.files {
            let path = with_cache_bust(format!("{public_path}{file}"), snapshot, options);
            // Source maps, images and other non script/style entry files are
            // expected; they simply stay out of the bundle.
            let Some(captures) = EXTENSION_PATTERN.captures(&path) else {
                continue;
            };
            let extension = captures[1].to_string();
            let reference = AssetReference {
                entry_name: entry_name.clone(),
                path,
            };
            if extension == "js" {
                bundle.scripts.push(reference);
            } else {
                bundle.styles.push(reference);
            }
        }
    }

    debug!(
        output = output_name,
        scripts = bundle.scripts.len(),
        styles = bundle.styles.len(),
        public_path = %bundle.public_path,
        "extracted assets"
    );

    Ok(bundle)
}

/// Filtered and sorted entry names for one document.
pub fn sorted_entry_names(
    snapshot: &BuildSnapshot,
    options: &AssembleOptions,
) -> Result<Vec<String>> {
    let filtered = filter_entry_names(snapshot, &options.chunks, &options.exclude_chunks);
    sort_entry_names(filtered, snapshot, options)
}

/// Keep entries present in the include list (all pass when unrestricted),
/// then drop excluded ones, preserving the snapshot's relative order.
fn filter_entry_names(
    snapshot: &BuildSnapshot,
    chunks: &ChunkSelection,
    exclude_chunks: &[String],
) -> Vec<String> {
    snapshot
        .entry_names()
        .filter(|name| chunks.includes(name))
        .filter(|name| !exclude_chunks.iter().any(|excluded| excluded == name))
        .map(str::to_string)
        .collect()
}

fn sort_entry_names(
    mut names: Vec<String>,
    snapshot: &BuildSnapshot,
    options: &AssembleOptions,
) -> Result<Vec<String>> {
    match &options.sort_mode {
        SortMode::Custom(compare) => {
            names.sort_by(|a, b| compare(a, b));
            Ok(names)
        }
        SortMode::Named(name) => match SortStrategy::from_name(name)? {
            SortStrategy::None => Ok(names),
            SortStrategy::Alphabetical => {
                names.sort();
                Ok(names)
            }
            SortStrategy::Manual => Ok(manual_order(names, &options.chunks)),
            SortStrategy::Auto => Ok(topological_order(names, snapshot)),
        },
    }
}

/// Order entries by their position in the include list; without an include
/// list there is nothing to order by and the build order stands.
fn manual_order(mut names: Vec<String>, chunks: &ChunkSelection) -> Vec<String> {
    let ChunkSelection::Named(configured) = chunks else {
        return names;
    };
    names.sort_by_key(|name| configured.iter().position(|candidate| candidate == name));
    names
}

/// Stable topological order over [`EntryPoint::depends_on`]: dependencies
/// first, ties keep the input order. Dependencies outside the filtered set
/// are ignored; a dependency cycle degrades to input order for the
/// remainder.
///
/// [`EntryPoint::depends_on`]: tagweld_core::snapshot::EntryPoint::depends_on
fn topological_order(names: Vec<String>, snapshot: &BuildSnapshot) -> Vec<String> {
    let members: HashSet<String> = names.iter().cloned().collect();
    let mut emitted: HashSet<String> = HashSet::new();
    let mut remaining = names;
    let mut ordered = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let ready = remaining.iter().position(|name| {
            snapshot.entry(name).is_none_or(|entry| {
                entry
                    .depends_on
                    .iter()
                    .filter(|dep| members.contains(dep.as_str()))
                    .all(|dep| emitted.contains(dep))
            })
        });
        match ready {
            Some(index) => {
                let name = remaining.remove(index);
                emitted.insert(name.clone());
                ordered.push(name);
            }
            None => {
                debug!("entry dependency cycle, keeping build order for remainder");
                ordered.append(&mut remaining);
            }
        }
    }

    ordered
}

/// Resolve the URL prefix for emitted files.
///
/// An explicitly configured public path is used verbatim with a single
/// trailing separator appended when missing; otherwise the prefix is the
/// relative path from the output document's directory up to the output
/// root, forward-slash normalized.
fn resolve_public_path(snapshot: &BuildSnapshot, output_name: &str) -> String {
    let mut public_path = match &snapshot.public_path {
        Some(path) => path.clone(),
        None => {
            let document_dir = snapshot
                .output_dir
                .join(Path::new(output_name).parent().unwrap_or_else(|| Path::new("")));
            relative_path(&document_dir, &snapshot.output_dir)
        }
    };
    if !public_path.is_empty() && !public_path.ends_with('/') {
        public_path.push('/');
    }
    public_path
}

/// Forward-slash relative path from one directory to another.
fn relative_path(from: &Path, to: &Path) -> String {
    let from: Vec<Component<'_>> = from.components().collect();
    let to: Vec<Component<'_>> = to.components().collect();
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common..from.len() {
        segments.push("..".to_string());
    }
    for component in &to[common..] {
        segments.push(component.as_os_str().to_string_lossy().into_owned());
    }
    segments.join("/")
}

/// Append the run hash as a cache-busting query parameter.
fn with_cache_bust(path: String, snapshot: &BuildSnapshot, options: &AssembleOptions) -> String {
    if !options.hash {
        return path;
    }
    match &snapshot.hash {
        Some(hash) if !hash.is_empty() => {
            let separator = if path.contains('?') { '&' } else { '?' };
            format!("{path}{separator}{hash}")
        }
        _ => path,
    }
}
