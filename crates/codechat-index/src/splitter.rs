//! Recursive separator-based text splitting.
//!
//! Splitting happens in two stages. First the text is cut into *base
//! pieces*: separators are tried in order, each piece stays within
//! `chunk_size` characters, and the concatenation of all base pieces is
//! exactly the input text. Then an overlap prefix is borrowed from the
//! tail of the previous base piece, recorded per piece so the original
//! text remains reconstructible.

/// One split piece. `overlap_with_previous` counts the characters at the
/// front of `text` that repeat the tail of the previous piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitPiece {
    pub text: String,
    pub overlap_with_previous: usize,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split at every occurrence of `sep`, keeping the separator attached to
/// the front of the following piece so pieces concatenate to the input.
fn split_keeping_separator<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(sep) {
        if idx > start {
            pieces.push(&text[start..idx]);
            start = idx;
        }
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Cut into windows of at most `chunk_size` characters.
fn split_by_chars(text: &str, chunk_size: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while char_len(rest) > chunk_size {
        let byte_end = rest
            .char_indices()
            .nth(chunk_size)
            .map_or(rest.len(), |(i, _)| i);
        pieces.push(&rest[..byte_end]);
        rest = &rest[byte_end..];
    }
    if !rest.is_empty() {
        pieces.push(rest);
    }
    pieces
}

/// Split `text` into base pieces of at most `chunk_size` characters.
///
/// Separators are tried in order; the first one present in the text is
/// used, and oversized pieces recurse with the remaining separators. An
/// empty-string separator acts as an unconditional character-window
/// fallback. The returned pieces concatenate to exactly `text`.
#[must_use]
pub fn split_text(text: &str, separators: &[&str], chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    if text.is_empty() {
        return Vec::new();
    }
    if char_len(text) <= chunk_size {
        return vec![text.to_string()];
    }

    let (sep, remaining) = separators
        .iter()
        .enumerate()
        .find(|(_, s)| s.is_empty() || text.contains(**s))
        .map_or(("", [].as_slice()), |(i, s)| (*s, &separators[i + 1..]));

    let splits = if sep.is_empty() {
        split_by_chars(text, chunk_size)
    } else {
        split_keeping_separator(text, sep)
    };

    let mut pieces = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0;
    for part in splits {
        let part_len = char_len(part);
        if part_len > chunk_size {
            if !buffer.is_empty() {
                pieces.push(std::mem::take(&mut buffer));
                buffer_len = 0;
            }
            pieces.extend(split_text(part, remaining, chunk_size));
        } else if buffer_len + part_len <= chunk_size {
            buffer.push_str(part);
            buffer_len += part_len;
        } else {
            pieces.push(std::mem::take(&mut buffer));
            buffer.push_str(part);
            buffer_len = part_len;
        }
    }
    if !buffer.is_empty() {
        pieces.push(buffer);
    }
    pieces
}

/// Split `text` and prepend each piece (except the first) with up to
/// `chunk_overlap` characters from the tail of the previous base piece.
/// The overlap never pushes a piece past `chunk_size` characters.
#[must_use]
pub fn split_with_overlap(
    text: &str,
    separators: &[&str],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<SplitPiece> {
    let bases = split_text(text, separators, chunk_size);
    let mut pieces = Vec::with_capacity(bases.len());
    for (i, base) in bases.iter().enumerate() {
        if i == 0 {
            pieces.push(SplitPiece {
                text: base.clone(),
                overlap_with_previous: 0,
            });
            continue;
        }
        let prev = &bases[i - 1];
        let prev_len = char_len(prev);
        let overlap = chunk_overlap
            .min(chunk_size.saturating_sub(char_len(base)))
            .min(prev_len);
        let byte_start = prev
            .char_indices()
            .nth(prev_len - overlap)
            .map_or(prev.len(), |(b, _)| b);
        let mut with_overlap = String::with_capacity(prev.len() - byte_start + base.len());
        with_overlap.push_str(&prev[byte_start..]);
        with_overlap.push_str(base);
        pieces.push(SplitPiece {
            text: with_overlap,
            overlap_with_previous: overlap,
        });
    }
    pieces
}
