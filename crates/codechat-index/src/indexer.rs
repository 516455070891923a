//! Embedding pipeline from chunks into the vector index.

use std::collections::HashMap;

use codechat_llm::LlmProvider;

use crate::chunker::Chunk;
use crate::error::Result;
use crate::store::VectorIndex;

/// Counters from one indexing run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub chunks_indexed: usize,
    pub embeddings_computed: usize,
    pub embeddings_reused: usize,
}

/// Embed every chunk and build the index. Chunks with identical content
/// hashes share one embedding call.
///
/// # Errors
///
/// Returns an error when an embedding request fails or a provider
/// returns vectors of inconsistent dimensions.
pub async fn build_index<P: LlmProvider>(
    chunks: Vec<Chunk>,
    provider: &P,
) -> Result<(VectorIndex, IndexReport)> {
    let mut index = VectorIndex::new();
    let mut report = IndexReport::default();
    let mut cache: HashMap<String, Vec<f32>> = HashMap::new();

    for chunk in chunks {
        let vector = if let Some(vector) = cache.get(&chunk.content_hash) {
            report.embeddings_reused += 1;
            vector.clone()
        } else {
            let vector = provider.embed(&chunk.text).await?;
            report.embeddings_computed += 1;
            cache.insert(chunk.content_hash.clone(), vector.clone());
            vector
        };
        index.insert(vector, chunk)?;
        report.chunks_indexed += 1;
    }

    tracing::info!(
        chunks = report.chunks_indexed,
        computed = report.embeddings_computed,
        reused = report.embeddings_reused,
        "built vector index"
    );
    Ok((index, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lang;
    use codechat_llm::mock::MockProvider;
    use std::path::PathBuf;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            text: text.to_string(),
            language: Lang::Rust,
            origin_path: PathBuf::from("lib.rs"),
            chunk_index: 0,
            overlap_with_previous: 0,
            content_hash: blake3::hash(text.as_bytes()).to_hex().to_string(),
        }
    }

    #[tokio::test]
    async fn indexes_every_chunk() {
        let provider = MockProvider::new();
        let chunks = vec![chunk("fn a() {}"), chunk("fn b() {}"), chunk("fn c() {}")];
        let (index, report) = build_index(chunks, &provider).await.unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(report.chunks_indexed, 3);
        assert_eq!(report.embeddings_computed, 3);
        assert_eq!(report.embeddings_reused, 0);
    }

    #[tokio::test]
    async fn duplicate_content_reuses_embeddings() {
        let provider = MockProvider::new();
        let chunks = vec![chunk("same"), chunk("same"), chunk("other")];
        let (index, report) = build_index(chunks, &provider).await.unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(report.embeddings_computed, 2);
        assert_eq!(report.embeddings_reused, 1);
    }

    #[tokio::test]
    async fn empty_input_builds_empty_index() {
        let provider = MockProvider::new();
        let (index, report) = build_index(Vec::new(), &provider).await.unwrap();
        assert!(index.is_empty());
        assert_eq!(report, IndexReport::default());
    }
}
