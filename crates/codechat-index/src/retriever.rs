//! Maximal-marginal-relevance retrieval over the vector index.

use codechat_llm::LlmProvider;

use crate::chunker::Chunk;
use crate::error::Result;
use crate::store::{ScoredPoint, VectorIndex, cosine_similarity};

#[derive(Clone, Copy, Debug)]
pub struct RetrieverConfig {
    /// Number of chunks returned.
    pub k: usize,
    /// Number of nearest candidates the MMR pass re-ranks.
    pub fetch_k: usize,
    /// Relevance weight; `1 - lambda` weights diversity.
    pub lambda: f32,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            k: 6,
            fetch_k: 20,
            lambda: 0.5,
        }
    }
}

/// Retrieves chunks relevant to a question, re-ranked for diversity.
#[derive(Clone, Copy, Debug, Default)]
pub struct Retriever {
    config: RetrieverConfig,
}

impl Retriever {
    #[must_use]
    pub fn new(config: RetrieverConfig) -> Self {
        Self { config }
    }

    /// Embed the question, fetch the nearest `fetch_k` candidates and
    /// select `k` of them by maximal marginal relevance.
    ///
    /// # Errors
    ///
    /// Returns an error when embedding the question fails.
    pub async fn retrieve<P: LlmProvider>(
        &self,
        index: &VectorIndex,
        provider: &P,
        question: &str,
    ) -> Result<Vec<Chunk>> {
        let query = provider.embed(question).await?;
        let candidates = index.search(&query, self.config.fetch_k);
        let selected = mmr_select(&query, &candidates, self.config.k, self.config.lambda);
        tracing::debug!(
            candidates = candidates.len(),
            selected = selected.len(),
            "retrieved context chunks"
        );
        Ok(selected
            .into_iter()
            .map(|i| candidates[i].chunk.clone())
            .collect())
    }
}

/// Greedy MMR selection. Each round picks the unselected candidate
/// maximizing `lambda * sim(query, c) - (1 - lambda) * max sim(c, s)`
/// over already selected `s`. Returns indices into `candidates` in
/// selection order.
fn mmr_select(query: &[f32], candidates: &[ScoredPoint], k: usize, lambda: f32) -> Vec<usize> {
    let mut selected: Vec<usize> = Vec::with_capacity(k.min(candidates.len()));
    while selected.len() < k && selected.len() < candidates.len() {
        let mut best: Option<(usize, f32)> = None;
        for (i, candidate) in candidates.iter().enumerate() {
            if selected.contains(&i) {
                continue;
            }
            let relevance = cosine_similarity(query, &candidate.vector);
            let redundancy = selected
                .iter()
                .map(|&s| cosine_similarity(&candidate.vector, &candidates[s].vector))
                .fold(f32::NEG_INFINITY, f32::max);
            let redundancy = if redundancy.is_finite() { redundancy } else { 0.0 };
            let score = lambda * relevance - (1.0 - lambda) * redundancy;
            if best.is_none_or(|(_, b)| score > b) {
                best = Some((i, score));
            }
        }
        match best {
            Some((i, _)) => selected.push(i),
            None => break,
        }
    }
    selected
}

/// Render retrieved chunks as the context block handed to the LLM.
#[must_use]
pub fn format_context(chunks: &[Chunk]) -> String {
    let mut out = String::new();
    for chunk in chunks {
        out.push_str("<document source=\"");
        out.push_str(&chunk.origin_path.display().to_string());
        out.push_str("\">\n");
        out.push_str(&chunk.text);
        if !chunk.text.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("</document>\n");
    }
    out
}
