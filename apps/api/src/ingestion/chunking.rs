//! Word-window chunking for resumes.
//!
//! Text is split on whitespace and re-joined with single spaces, so chunk
//! boundaries are always word boundaries. Windows overlap by `overlap` words.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Window size and overlap, both in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl ChunkingConfig {
    /// Fine-grained windows for single-resume interactive scoring.
    pub const INTERACTIVE: ChunkingConfig = ChunkingConfig {
        chunk_size: 200,
        overlap: 75,
    };

    /// Coarse windows for ranking many resumes against one job.
    pub const BATCH: ChunkingConfig = ChunkingConfig {
        chunk_size: 400,
        overlap: 50,
    };

    /// A window that cannot advance produces exactly one chunk.
    pub fn is_degenerate(&self) -> bool {
        self.overlap >= self.chunk_size
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self::INTERACTIVE
    }
}

/// A window of a document's word sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// Zero-based window index within the document.
    pub position: usize,
    /// Identity assigned by the caller (e.g. `"<resume_id>_<position>"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Splits `text` into overlapping word windows.
///
/// `start_{i+1} = start_i + (chunk_size - overlap)`; the last window may be
/// shorter than `chunk_size`. Empty text or a zero `chunk_size` yields no
/// chunks.
pub fn chunk_text(text: &str, config: ChunkingConfig) -> Vec<Chunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || config.chunk_size == 0 {
        return Vec::new();
    }

    if config.is_degenerate() {
        debug!(
            chunk_size = config.chunk_size,
            overlap = config.overlap,
            "overlap >= chunk_size, emitting a single chunk"
        );
    }

    let step = config.chunk_size.saturating_sub(config.overlap);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + config.chunk_size).min(words.len());
        chunks.push(Chunk {
            text: words[start..end].join(" "),
            position: chunks.len(),
            id: None,
        });

        if step == 0 {
            break;
        }
        start += step;
    }

    chunks
}

/// Chunks a document and stamps each chunk with `"<document_id>_<position>"`.
pub fn chunk_document(document_id: &str, text: &str, config: ChunkingConfig) -> Vec<Chunk> {
    chunk_text(text, config)
        .into_iter()
        .map(|mut chunk| {
            chunk.id = Some(format!("{document_id}_{}", chunk.position));
            chunk
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    fn cfg(chunk_size: usize, overlap: usize) -> ChunkingConfig {
        ChunkingConfig {
            chunk_size,
            overlap,
        }
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunk_text("", cfg(5, 1)).is_empty());
        assert!(chunk_text("   \n\t ", cfg(5, 1)).is_empty());
    }

    #[test]
    fn test_overlap_equal_to_size_yields_single_chunk() {
        let chunks = chunk_text("a b c", cfg(5, 5));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "a b c");
    }

    #[test]
    fn test_overlap_larger_than_size_terminates() {
        let chunks = chunk_text(&words(50), cfg(10, 20));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text.split(' ').count(), 10);
    }

    #[test]
    fn test_zero_chunk_size_yields_no_chunks() {
        assert!(chunk_text("a b c", cfg(0, 0)).is_empty());
    }

    #[test]
    fn test_windows_advance_by_size_minus_overlap() {
        // 10 words, size 4, overlap 1 → starts at 0, 3, 6, 9
        let chunks = chunk_text(&words(10), cfg(4, 1));
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].text, "w0 w1 w2 w3");
        assert_eq!(chunks[1].text, "w3 w4 w5 w6");
        assert_eq!(chunks[2].text, "w6 w7 w8 w9");
        assert_eq!(chunks[3].text, "w9");
        let positions: Vec<usize> = chunks.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_every_word_is_covered() {
        let text = words(523);
        let chunks = chunk_text(&text, ChunkingConfig::INTERACTIVE);
        let last = chunks.last().unwrap();
        assert!(last.text.ends_with("w522"));
        assert!(chunks.iter().all(|c| c.text.split(' ').count() <= 200));
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let text = words(1000);
        assert_eq!(
            chunk_text(&text, ChunkingConfig::BATCH),
            chunk_text(&text, ChunkingConfig::BATCH)
        );
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let chunks = chunk_text("Rust\n\n  developer\twith   tokio", cfg(10, 2));
        assert_eq!(chunks[0].text, "Rust developer with tokio");
    }

    #[test]
    fn test_chunk_document_assigns_ids() {
        let chunks = chunk_document("alice", &words(10), cfg(4, 1));
        assert_eq!(chunks[0].id.as_deref(), Some("alice_0"));
        assert_eq!(chunks[3].id.as_deref(), Some("alice_3"));
    }

    #[test]
    fn test_preset_configs() {
        assert_eq!(ChunkingConfig::INTERACTIVE, cfg(200, 75));
        assert_eq!(ChunkingConfig::BATCH, cfg(400, 50));
        assert!(!ChunkingConfig::BATCH.is_degenerate());
        assert!(cfg(3, 3).is_degenerate());
    }
}
