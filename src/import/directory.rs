//! Directory import: filesystem tree -> namespaces/tags on a single object.
//!
//! Directories map to namespaces under `root_path/dataset`, files to tags
//! whose values are the raw file bytes, with a content type guessed from the
//! file extension. Dot-prefixed files and directories are skipped. All
//! tag-values attach to one target object.

use std::fs;
use std::path::Path;

use tracing::info;
use walkdir::{DirEntry, WalkDir};

use crate::error::{ImportError, Result};
use crate::import::ObjectTarget;
use crate::paths::{ensure_namespace, ensure_namespace_path, ensure_tag, join_path};
use crate::store::{Namespace, StoreObject, TagStore, TagValue};

/// Marker used in previews when no content type could be guessed.
pub const UNKNOWN_CONTENT_TYPE: &str = "UNKNOWN";

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Path of `entry` relative to the walked root, slash-joined.
fn relative_path(entry: &DirEntry, root: &Path) -> String {
    let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
    let segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    segments.join("/")
}

/// Guess a content type from a filename's extension.
pub fn guess_content_type(name: &str) -> Option<&'static str> {
    let extension = name.rsplit_once('.').map(|(_, ext)| ext)?;
    let guessed = match extension.to_ascii_lowercase().as_str() {
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "xml" => "application/xml",
        "json" => "application/json",
        "yaml" | "yml" => "application/x-yaml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        _ => return None,
    };
    Some(guessed)
}

/// Render the namespaces/tags a directory import would create, without
/// touching the store.
pub fn preview_directory(
    dir: &Path,
    root_path: &str,
    dataset: &str,
    target: &ObjectTarget,
) -> Result<String> {
    let mut output = vec![
        format!("Preview of processing {}", dir.display()),
        String::new(),
        target.describe(),
        String::new(),
        "The following namespaces/tags will be generated.".to_string(),
        String::new(),
    ];
    let base = join_path([root_path, dataset]);
    for entry in WalkDir::new(dir).into_iter().filter_entry(|e| !is_hidden(e)) {
        let entry = entry.map_err(|err| ImportError::format(format!("walk error: {err}")))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let tag_path = join_path([base.as_str(), relative_path(&entry, dir).as_str()]);
        let content_type = entry
            .file_name()
            .to_str()
            .and_then(guess_content_type)
            .unwrap_or(UNKNOWN_CONTENT_TYPE);
        output.push(format!("{tag_path} CONTENT-TYPE: {content_type}"));
    }
    Ok(output.join("\n"))
}

/// Walk the tree and push every file's bytes as a tag-value on the target
/// object. Returns the tagged object.
pub fn import_directory<S: TagStore>(
    store: &mut S,
    dir: &Path,
    root_path: &str,
    dataset: &str,
    desc: &str,
    target: &ObjectTarget,
) -> Result<StoreObject> {
    let object = target.resolve(store)?;
    info!(object = %object.id, dir = %dir.display(), "importing directory");

    let base = join_path([root_path, dataset]);
    ensure_namespace_path(store, &base, dataset, desc)?;

    for entry in WalkDir::new(dir).into_iter().filter_entry(|e| !is_hidden(e)) {
        let entry = entry.map_err(|err| ImportError::format(format!("walk error: {err}")))?;
        let rel = relative_path(&entry, dir);
        if entry.file_type().is_dir() {
            if !rel.is_empty() {
                let ns_path = join_path([base.as_str(), rel.as_str()]);
                ensure_namespace(store, &ns_path, dataset, desc)?;
            }
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        // The walk visits a directory before its contents, so the file's
        // containing namespace already exists.
        let parent_rel = rel.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("");
        let namespace = Namespace {
            path: join_path([base.as_str(), parent_rel]),
        };
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let tag = ensure_tag(store, &namespace, &file_name, dataset, desc, false)?;
        let content_type = guess_content_type(&file_name);
        let bytes = fs::read(entry.path())?;
        info!(tag = %tag.path, bytes = bytes.len(), "pushing file");
        store.set_tag_value(&object, &tag.path, TagValue::Opaque(bytes), content_type)?;
    }

    info!(object = %object.id, "directory import finished");
    Ok(object)
}
