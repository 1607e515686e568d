//! Chrome bookmarks -> URL list.
//!
//! Reads the profile's `Bookmarks` JSON, walks every root folder, filters by
//! folder path and deduplicates by URL. The rendered list (one URL per line,
//! optionally `URL\tName`) is the input format `raged ingest --urls-file`
//! expects.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

const SKIPPED_SCHEMES: &[&str] = &["chrome://", "chrome-extension://"];

/// A node of the bookmarks tree. Missing fields default to empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookmarkNode {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub url: String,
    pub children: Vec<BookmarkNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkEntry {
    pub url: String,
    pub name: String,
    pub folder: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub lines: Vec<String>,
    pub total: usize,
}

/// Collect url entries below `node`, tracking the `/`-joined folder path.
pub fn walk(node: &BookmarkNode, folder_path: &str, out: &mut Vec<BookmarkEntry>) {
    match node.kind.as_str() {
        "folder" => {
            let current = if folder_path.is_empty() {
                node.name.clone()
            } else {
                format!("{}/{}", folder_path, node.name)
            };
            for child in &node.children {
                walk(child, &current, out);
            }
        }
        "url" => {
            if node.url.is_empty() || SKIPPED_SCHEMES.iter().any(|s| node.url.starts_with(s)) {
                return;
            }
            out.push(BookmarkEntry {
                url: node.url.clone(),
                name: node.name.clone(),
                folder: folder_path.to_string(),
            });
        }
        _ => {}
    }
}

/// Walk all roots in file order.
pub fn collect_entries(json: &str) -> Result<Vec<BookmarkEntry>> {
    let data: serde_json::Value = serde_json::from_str(json)?;
    let mut entries = Vec::new();

    let Some(roots) = data.get("roots").and_then(|r| r.as_object()) else {
        return Ok(entries);
    };

    for root in roots.values().filter(|v| v.is_object()) {
        let node = BookmarkNode::deserialize(root)?;
        walk(&node, "", &mut entries);
    }

    Ok(entries)
}

/// Case-insensitive folder filter, then dedup by URL keeping the first hit.
pub fn filter_and_dedup(entries: Vec<BookmarkEntry>, folder: &str) -> Vec<BookmarkEntry> {
    let folder = folder.to_lowercase();
    let mut seen = HashSet::new();

    entries
        .into_iter()
        .filter(|e| folder.is_empty() || e.folder.to_lowercase().contains(&folder))
        .filter(|e| seen.insert(e.url.clone()))
        .collect()
}

pub fn extract_from_str(json: &str, folder: &str, with_names: bool) -> Result<Extraction> {
    let unique = filter_and_dedup(collect_entries(json)?, folder);

    let lines: Vec<String> = unique
        .iter()
        .map(|e| {
            if with_names {
                format!("{}\t{}", e.url, e.name)
            } else {
                e.url.clone()
            }
        })
        .collect();

    Ok(Extraction {
        total: lines.len(),
        lines,
    })
}

pub fn extract_from_path(path: &Path, folder: &str, with_names: bool) -> Result<Extraction> {
    let raw = std::fs::read_to_string(path).map_err(|_| Error::BookmarksNotFound {
        path: path.to_path_buf(),
    })?;
    extract_from_str(&raw, folder, with_names)
}

/// Location of a Chrome profile's `Bookmarks` file on this platform.
pub fn chrome_bookmarks_path(profile: &str) -> Result<PathBuf> {
    let base = if cfg!(target_os = "windows") {
        dirs::data_local_dir().map(|d| d.join("Google").join("Chrome").join("User Data"))
    } else if cfg!(target_os = "macos") {
        dirs::config_dir().map(|d| d.join("Google").join("Chrome"))
    } else {
        dirs::config_dir().map(|d| d.join("google-chrome"))
    };

    base.map(|b| b.join(profile).join("Bookmarks"))
        .ok_or_else(|| Error::InvalidArgument("could not locate the user config directory".into()))
}

/// Newline-joined list with a trailing newline when non-empty.
pub fn render(lines: &[String]) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}
