use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::chunking::{chunk_with, ChunkSize};
use crate::collection::collection_name;
use crate::error::Result;

/// One chunk of a document, ready to be embedded and stored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChunkRecord {
    pub id: String,
    pub doc_id: String,
    pub collection: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub text: String,
}

/// A line of a URL list: `URL` or `URL\tName`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UrlEntry {
    pub url: String,
    pub name: Option<String>,
}

/// `<doc_id>:<chunk_index>`, the address the enrichment worker uses for a chunk.
pub fn chunk_id(doc_id: &str, chunk_index: usize) -> String {
    format!("{}:{}", doc_id, chunk_index)
}

/// Split a document into chunk records addressed to its collection.
pub fn plan_document(
    doc_id: &str,
    text: &str,
    collection: Option<&str>,
    size: ChunkSize,
) -> Vec<ChunkRecord> {
    let collection = collection_name(collection).to_string();
    let chunks = chunk_with(text, size);
    let total_chunks = chunks.len();

    debug!(
        "Planned {} chunk(s) for {} in '{}' (max {} chars)",
        total_chunks,
        doc_id,
        collection,
        size.get()
    );

    chunks
        .into_iter()
        .enumerate()
        .map(|(chunk_index, text)| ChunkRecord {
            id: chunk_id(doc_id, chunk_index),
            doc_id: doc_id.to_string(),
            collection: collection.clone(),
            chunk_index,
            total_chunks,
            text,
        })
        .collect()
}

/// Parse a newline-delimited URL list. Blank lines and `#` comments are skipped.
pub fn parse_url_list(input: &str) -> Vec<UrlEntry> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.split_once('\t') {
            Some((url, name)) => {
                let name = name.trim();
                UrlEntry {
                    url: url.trim().to_string(),
                    name: (!name.is_empty()).then(|| name.to_string()),
                }
            }
            None => UrlEntry {
                url: line.to_string(),
                name: None,
            },
        })
        .collect()
}

pub fn read_url_list(path: &Path) -> Result<Vec<UrlEntry>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_url_list(&content))
}
