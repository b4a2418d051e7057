//! Iteration splitter
//!
//! Segments a raw multi-iteration log blob into labeled iterations on
//! `ITERATION_<n>` delimiter lines. Thin preprocessing in front of the
//! correlation engine.

use crate::types::RawIteration;
use regex::Regex;
use std::sync::LazyLock;

static ITERATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"ITERATION_(\d+)").unwrap());

/// Split a log blob into `(iteration_id, text_block)` pairs.
///
/// Ids are the captured digit groups, in document order; they are not
/// required to be unique or sequential. Content preceding the first delimiter
/// is discarded. When no delimiter occurs at all, the whole blob becomes a
/// single iteration with id "01".
pub fn split_iterations(full_text: &str) -> Vec<RawIteration> {
    let mut iterations = Vec::new();
    let mut matches = ITERATION_RE.captures_iter(full_text).peekable();

    if matches.peek().is_none() {
        return vec![RawIteration {
            id: "01".to_string(),
            text: full_text.to_string(),
        }];
    }

    while let Some(captures) = matches.next() {
        let id = captures[1].to_string();
        let block_start = captures.get(0).map(|m| m.end()).unwrap_or(0);
        let block_end = matches
            .peek()
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(full_text.len());
        iterations.push(RawIteration {
            id,
            text: full_text[block_start..block_end].to_string(),
        });
    }

    iterations
}
