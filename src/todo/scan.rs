//! Bracket scanner producing TODO spans.

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One bracketed TODO. Rows and columns are zero-based character positions;
/// `col_end` is one past the closing bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoSpan {
    pub row_start: usize,
    pub col_start: usize,
    pub row_end: usize,
    pub col_end: usize,
    /// Bracketed text including both brackets. Line breaks are not kept.
    pub preview: String,
}

struct Open {
    row: usize,
    col: usize,
    content: String,
}

/// Scan `text` for `[...]` spans, returned in the order they close.
///
/// Unmatched closers are ignored and openers left on the stack are dropped.
pub fn scan_text(text: &str) -> Vec<TodoSpan> {
    let mut finished = Vec::new();
    let mut stack: Vec<Open> = Vec::new();

    for (row, line) in text.lines().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            match ch {
                '[' => stack.push(Open {
                    row,
                    col,
                    content: String::new(),
                }),
                ']' => {
                    if let Some(mut open) = stack.pop() {
                        open.content.push(ch);
                        finished.push(TodoSpan {
                            row_start: open.row,
                            col_start: open.col,
                            row_end: row,
                            col_end: col + 1,
                            preview: open.content,
                        });
                    }
                }
                _ => {}
            }
            for open in stack.iter_mut() {
                open.content.push(ch);
            }
        }
    }

    finished
}

/// Scan a fragment file. Invalid UTF-8 is replaced rather than rejected.
pub fn scan_fragment(path: &Path) -> Result<Vec<TodoSpan>, StorageError> {
    let bytes = std::fs::read(path).map_err(|e| StorageError::io(path, e))?;
    Ok(scan_text(&String::from_utf8_lossy(&bytes)))
}
