mod bookmarks;
mod chunking;
mod collection;
mod config;
mod error;
mod ingest;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
    transport::stdio,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use chunking::{chunk_with, ChunkSize};
use config::Settings;

// ---- Tool Parameter Structs ----

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChunkParams {
    #[schemars(description = "Document text to split")]
    pub text: String,
    #[schemars(description = "Maximum characters per chunk (default from RAGED_MAX_CHARS, else 1800)")]
    #[serde(default)]
    pub max_chars: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanParams {
    #[schemars(description = "Identifier of the source document (URL, path, ...)")]
    pub doc_id: String,
    #[schemars(description = "Extracted document text")]
    pub text: String,
    #[schemars(description = "Target collection (empty = default)")]
    #[serde(default)]
    pub collection: Option<String>,
    #[schemars(description = "Maximum characters per chunk")]
    #[serde(default)]
    pub max_chars: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UrlListParams {
    #[schemars(description = "Path to a newline-delimited URL list (URL or URL<TAB>Name per line)")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BookmarksParams {
    #[schemars(description = "Chrome profile directory name")]
    #[serde(default)]
    pub profile: Option<String>,
    #[schemars(description = "Only bookmarks whose folder path contains this (case-insensitive)")]
    #[serde(default)]
    pub folder: String,
    #[schemars(description = "Emit URL<TAB>Name instead of URL only")]
    #[serde(default)]
    pub with_names: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CollectionParams {
    #[schemars(description = "Requested collection name (optional)")]
    #[serde(default)]
    pub name: Option<String>,
}

fn error_text(e: impl std::fmt::Display) -> CallToolResult {
    CallToolResult::success(vec![Content::text(format!("Error: {}", e))])
}

fn json_text<T: Serialize>(value: &T) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(json) => CallToolResult::success(vec![Content::text(json)]),
        Err(e) => error_text(e),
    }
}

// ---- MCP Server ----

#[derive(Clone)]
pub struct ChunkServer {
    settings: Arc<Settings>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ChunkServer {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            tool_router: Self::tool_router(),
        }
    }

    fn resolve_size(&self, max_chars: Option<i64>) -> error::Result<ChunkSize> {
        match max_chars {
            Some(n) => ChunkSize::new(n),
            None => Ok(self.settings.chunk_size),
        }
    }

    // ---- Tools ----

    #[tool(description = "Split document text into line-aligned chunks of at most max_chars characters. Lines are never split; a single line longer than the limit becomes its own chunk. Returns a JSON array of strings.")]
    fn chunk_text(
        &self,
        Parameters(params): Parameters<ChunkParams>,
    ) -> Result<CallToolResult, McpError> {
        let size = match self.resolve_size(params.max_chars) {
            Ok(s) => s,
            Err(e) => return Ok(error_text(e)),
        };
        let chunks = chunk_with(&params.text, size);
        info!(
            "chunk_text: {} chars -> {} chunk(s)",
            params.text.chars().count(),
            chunks.len()
        );
        Ok(json_text(&chunks))
    }

    #[tool(description = "Chunk a document and return the records to embed: id, doc_id, collection, chunk_index, total_chunks, text.")]
    fn plan_ingest(
        &self,
        Parameters(params): Parameters<PlanParams>,
    ) -> Result<CallToolResult, McpError> {
        if params.doc_id.is_empty() {
            return Ok(error_text("doc_id required."));
        }
        let size = match self.resolve_size(params.max_chars) {
            Ok(s) => s,
            Err(e) => return Ok(error_text(e)),
        };
        let collection = params
            .collection
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(self.settings.collection.as_str());

        let records = ingest::plan_document(&params.doc_id, &params.text, Some(collection), size);
        Ok(json_text(&records))
    }

    #[tool(description = "Parse a URL list file (as produced by extract-chrome-bookmarks) into entries.")]
    fn parse_url_list(
        &self,
        Parameters(params): Parameters<UrlListParams>,
    ) -> Result<CallToolResult, McpError> {
        match ingest::read_url_list(Path::new(&params.path)) {
            Ok(entries) => Ok(json_text(&entries)),
            Err(e) => {
                warn!("parse_url_list failed for {}: {}", params.path, e);
                Ok(error_text(e))
            }
        }
    }

    #[tool(description = "Extract Chrome bookmarks as a deduplicated URL list, optionally filtered by folder.")]
    fn extract_bookmarks(
        &self,
        Parameters(params): Parameters<BookmarksParams>,
    ) -> Result<CallToolResult, McpError> {
        let profile = params
            .profile
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(self.settings.chrome_profile.as_str());

        let extraction = bookmarks::chrome_bookmarks_path(profile).and_then(|path| {
            bookmarks::extract_from_path(&path, &params.folder, params.with_names)
        });

        match extraction {
            Ok(out) => {
                let mut text = bookmarks::render(&out.lines);
                text.push_str(&format!("# Total: {} unique bookmarks", out.total));
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => Ok(error_text(e)),
        }
    }

    #[tool(description = "Resolve the collection a document is stored in: the given name, or the default when empty.")]
    fn collection_name(
        &self,
        Parameters(params): Parameters<CollectionParams>,
    ) -> Result<CallToolResult, McpError> {
        let name = collection::collection_name(params.name.as_deref());
        Ok(CallToolResult::success(vec![Content::text(name.to_string())]))
    }
}

#[tool_handler]
impl ServerHandler for ChunkServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "raged chunker: splits documents into line-aligned chunks for embedding, \
                 plans chunk records per collection and extracts Chrome bookmarks as URL lists."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ---- Main ----

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("raged chunker starting...");

    let settings = Settings::from_env()?;
    info!("Chunk size: {} chars", settings.chunk_size.get());
    info!("Default collection: {}", settings.collection);
    info!("Chrome profile: {}", settings.chrome_profile);

    let server = ChunkServer::new(settings);

    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!("Failed to start server: {:?}", e))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    info!("MCP server running over stdio");
    service.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_with(pairs: &[(&str, &str)]) -> ChunkServer {
        let env: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let settings = Settings::from_lookup(|key| {
            env.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .unwrap();
        ChunkServer::new(settings)
    }

    fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    fn chunk_params(text: &str, max_chars: Option<i64>) -> Parameters<ChunkParams> {
        Parameters(ChunkParams {
            text: text.to_string(),
            max_chars,
        })
    }

    #[test]
    fn test_chunk_text_rejects_non_positive_size() {
        let server = server_with(&[]);
        for bad in [0, -3] {
            let result = server.chunk_text(chunk_params("a\nb", Some(bad))).unwrap();
            let text = text_of(&result);
            assert!(text.starts_with("Error: Invalid argument"), "{}", text);
        }
        assert!(server.resolve_size(Some(0)).is_err());
    }

    #[test]
    fn test_chunk_text_uses_settings_size_by_default() {
        let server = server_with(&[(config::ENV_MAX_CHARS, "4")]);
        let result = server.chunk_text(chunk_params("aaaa\nbbbb", None)).unwrap();
        let chunks: Vec<String> = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(chunks, vec!["aaaa", "bbbb"]);

        // explicit size wins over the settings
        let result = server.chunk_text(chunk_params("aaaa\nbbbb", Some(9))).unwrap();
        let chunks: Vec<String> = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(chunks, vec!["aaaa\nbbbb"]);
    }

    #[test]
    fn test_plan_ingest_falls_back_to_settings_collection() {
        let server = server_with(&[(config::ENV_COLLECTION, "reading")]);
        let result = server
            .plan_ingest(Parameters(PlanParams {
                doc_id: "doc-1".into(),
                text: "hello".into(),
                collection: Some(String::new()),
                max_chars: None,
            }))
            .unwrap();
        let records: serde_json::Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(records[0]["collection"], "reading");
        assert_eq!(records[0]["id"], "doc-1:0");
        assert_eq!(records[0]["total_chunks"], 1);
    }

    #[test]
    fn test_plan_ingest_rejects_bad_input() {
        let server = server_with(&[]);
        let result = server
            .plan_ingest(Parameters(PlanParams {
                doc_id: "doc-1".into(),
                text: "hello".into(),
                collection: None,
                max_chars: Some(0),
            }))
            .unwrap();
        assert!(text_of(&result).starts_with("Error: Invalid argument"));

        let result = server
            .plan_ingest(Parameters(PlanParams {
                doc_id: String::new(),
                text: "hello".into(),
                collection: None,
                max_chars: None,
            }))
            .unwrap();
        assert_eq!(text_of(&result), "Error: doc_id required.");
    }
}
