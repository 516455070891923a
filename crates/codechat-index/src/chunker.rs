//! Directory walk and chunk production.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::languages::detect_language;
use crate::splitter::split_with_overlap;
use crate::{Lang, splitter::SplitPiece};

/// One embedded unit of source text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub language: Lang,
    pub origin_path: PathBuf,
    /// Position of this chunk within its file, starting at 0.
    pub chunk_index: usize,
    /// Characters at the front repeated from the previous chunk's tail.
    pub overlap_with_previous: usize,
    /// Hex-encoded blake3 hash of `text`.
    pub content_hash: String,
}

#[derive(Clone, Debug)]
pub struct ChunkerConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub ignore_folders: Vec<String>,
    pub ignore_files: Vec<String>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2500,
            chunk_overlap: 200,
            ignore_folders: vec![
                ".git".to_string(),
                "__pycache__".to_string(),
                "node_modules".to_string(),
                "target".to_string(),
            ],
            ignore_files: Vec::new(),
        }
    }
}

fn blake3_hex(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

fn chunk_file(path: &Path, language: Lang, config: &ChunkerConfig) -> Result<Vec<Chunk>> {
    let content = fs::read_to_string(path).map_err(|source| IndexError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    if content.is_empty() {
        return Ok(Vec::new());
    }

    let pieces = split_with_overlap(
        &content,
        language.separators(),
        config.chunk_size,
        config.chunk_overlap,
    );

    Ok(pieces
        .into_iter()
        .enumerate()
        .map(|(chunk_index, SplitPiece { text, overlap_with_previous })| Chunk {
            content_hash: blake3_hex(&text),
            text,
            language,
            origin_path: path.to_path_buf(),
            chunk_index,
            overlap_with_previous,
        })
        .collect())
}

/// Chunk every supported source file directly inside `directory`.
///
/// The walk is flat: subdirectories are not descended into. Files with
/// unrecognized extensions and entries on the ignore lists are skipped.
/// Entries are visited in name order so output is deterministic.
///
/// # Errors
///
/// Returns [`IndexError::InvalidDirectory`] when `directory` does not
/// exist or is not a directory, and [`IndexError::FileRead`] when a
/// selected file cannot be read.
pub fn chunk_directory(directory: &Path, config: &ChunkerConfig) -> Result<Vec<Chunk>> {
    if !directory.is_dir() {
        return Err(IndexError::InvalidDirectory(directory.to_path_buf()));
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(directory)
        .map_err(|source| IndexError::FileRead {
            path: directory.to_path_buf(),
            source,
        })?
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .collect();
    entries.sort();

    let mut chunks = Vec::new();
    for path in entries {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_dir() {
            if config.ignore_folders.iter().any(|f| f == name) {
                tracing::debug!(folder = %path.display(), "skipping ignored folder");
            }
            continue;
        }
        if config.ignore_files.iter().any(|f| f == name) {
            tracing::debug!(file = %path.display(), "skipping ignored file");
            continue;
        }
        let Some(language) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| detect_language(&e.to_lowercase()))
        else {
            continue;
        };

        let file_chunks = chunk_file(&path, language, config)?;
        tracing::debug!(
            file = %path.display(),
            language = language.id(),
            chunks = file_chunks.len(),
            "chunked file"
        );
        chunks.extend(file_chunks);
    }

    tracing::info!(
        directory = %directory.display(),
        chunks = chunks.len(),
        "chunked directory"
    );
    Ok(chunks)
}
