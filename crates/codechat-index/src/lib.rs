//! Source-code indexing: language detection, chunking, embedding and retrieval.

pub mod chunker;
pub mod error;
pub mod indexer;
pub mod languages;
pub mod retriever;
pub mod splitter;
pub mod store;

pub use chunker::{Chunk, ChunkerConfig, chunk_directory};
pub use error::IndexError;
pub use indexer::{IndexReport, build_index};
pub use languages::{Lang, detect_language};
pub use retriever::{Retriever, RetrieverConfig, format_context};
pub use store::{ScoredPoint, VectorIndex};
