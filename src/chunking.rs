use crate::error::{Error, Result};

/// Default soft ceiling on chunk length, in characters.
pub const DEFAULT_MAX_CHARS: usize = 1800;

/// Chunk size validated at the boundary: always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSize(usize);

impl ChunkSize {
    pub fn new(value: i64) -> Result<Self> {
        if value <= 0 {
            return Err(Error::InvalidArgument(format!(
                "max_chars must be a positive integer, got {}",
                value
            )));
        }
        usize::try_from(value)
            .map(Self)
            .map_err(|_| Error::InvalidArgument(format!("max_chars out of range: {}", value)))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self(DEFAULT_MAX_CHARS)
    }
}

impl TryFrom<i64> for ChunkSize {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

/// Outer whitespace as the ingestion API trims it: the Unicode White_Space set
/// without NEL (U+0085), plus the byte order mark (U+FEFF).
fn is_trim_char(c: char) -> bool {
    (c.is_whitespace() && c != '\u{0085}') || c == '\u{FEFF}'
}

/// CRLF -> LF, then trim the whole document.
pub fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").trim_matches(is_trim_char).to_string()
}

/// Chunk with a size that already passed validation.
pub fn chunk_with(text: &str, size: ChunkSize) -> Vec<String> {
    chunk_text(text, size.get())
}

/// Greedy line packing: lines are never split, a chunk is flushed as soon as
/// the next line would push it past `max_chars`. A single line longer than
/// `max_chars` ends up alone in its own chunk.
///
/// Lengths are counted in `char`s. `max_chars == 0` is not rejected here:
/// every line becomes its own chunk (use [`ChunkSize`] to refuse it upstream).
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let clean = normalize(text);
    if clean.chars().count() <= max_chars {
        return vec![clean];
    }

    let mut parts = Vec::new();
    let mut buf: Vec<&str> = Vec::new();
    let mut current = 0usize;

    for line in clean.split('\n') {
        let line_len = line.chars().count();
        let added = if buf.is_empty() { line_len } else { line_len + 1 };

        if !buf.is_empty() && current + added > max_chars {
            parts.push(buf.join("\n"));
            buf.clear();
            current = 0;
        }

        // separator only counts when something is already buffered
        current += if buf.is_empty() { line_len } else { line_len + 1 };
        buf.push(line);
    }

    if !buf.is_empty() {
        parts.push(buf.join("\n"));
    }

    parts
}
