//! In-memory vector index over chunks.

use uuid::Uuid;

use crate::chunker::Chunk;
use crate::error::{IndexError, Result};

#[derive(Clone, Debug)]
pub struct IndexPoint {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub chunk: Chunk,
}

/// A point scored against a query vector.
#[derive(Clone, Debug)]
pub struct ScoredPoint {
    pub id: Uuid,
    pub score: f32,
    pub vector: Vec<f32>,
    pub chunk: Chunk,
}

/// Flat in-memory index. Search is a linear cosine-similarity scan,
/// which is plenty for a single indexed directory.
#[derive(Clone, Debug, Default)]
pub struct VectorIndex {
    points: Vec<IndexPoint>,
    dim: Option<usize>,
}

impl VectorIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimension of stored vectors, fixed by the first insert.
    #[must_use]
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    /// Insert a chunk with its embedding.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DimensionMismatch`] when the vector's length
    /// differs from previously inserted vectors.
    pub fn insert(&mut self, vector: Vec<f32>, chunk: Chunk) -> Result<Uuid> {
        match self.dim {
            None => self.dim = Some(vector.len()),
            Some(expected) if expected != vector.len() => {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    got: vector.len(),
                });
            }
            Some(_) => {}
        }
        let id = Uuid::new_v4();
        self.points.push(IndexPoint { id, vector, chunk });
        Ok(id)
    }

    /// The `limit` points most similar to `query`, best first.
    /// Ties keep insertion order.
    #[must_use]
    pub fn search(&self, query: &[f32], limit: usize) -> Vec<ScoredPoint> {
        let mut scored: Vec<ScoredPoint> = self
            .points
            .iter()
            .map(|p| ScoredPoint {
                id: p.id,
                score: cosine_similarity(query, &p.vector),
                vector: p.vector.clone(),
                chunk: p.chunk.clone(),
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }
}

/// Cosine similarity in `[-1, 1]`. Zero-norm vectors score 0.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
