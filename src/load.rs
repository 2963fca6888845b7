//! Edge-list file loader.
//!
//! Two on-disk shapes are accepted and normalized to `(n, edges)`:
//!
//! - **Header-style**: the first line is the vertex count `N`, every
//!   subsequent line is `u v` with `0 <= u, v < N`.
//! - **SNAP-style**: lines starting with `#` or `%` are comments; every other
//!   line is `u v` with arbitrary non-negative ids, which are compacted to
//!   `[0..N)` in first-appearance order.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// ============================================================================
// Errors
// ============================================================================

/// Errors encountered while reading an edge-list file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// The file could not be opened or read.
    Io(String),
    /// The file contains no usable lines.
    Empty,
    /// A line could not be parsed as an edge (or, for the first header line,
    /// as a vertex count).
    BadLine {
        /// 1-based line number in the file.
        line: usize,
        /// The offending content, trimmed.
        content: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(msg) => write!(f, "I/O error: {msg}"),
            LoadError::Empty => write!(f, "edge list is empty"),
            LoadError::BadLine { line, content } => {
                write!(f, "line {line}: cannot parse {content:?} as an edge")
            }
        }
    }
}

impl std::error::Error for LoadError {}

// ============================================================================
// Public API
// ============================================================================

/// Loads an edge list from a file, auto-detecting the format.
///
/// A file whose first non-blank line is a lone integer and which contains no
/// comment lines is read header-style; anything else is read SNAP-style.
///
/// # Errors
/// Returns [`LoadError`] on I/O failure, an empty file, or an unparsable line.
pub fn load_edge_list(path: impl AsRef<Path>) -> Result<(usize, Vec<(u32, u32)>), LoadError> {
    let file = File::open(path).map_err(|e| LoadError::Io(e.to_string()))?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| LoadError::Io(e.to_string()))?;
        let trimmed = line.trim().to_string();
        if !trimmed.is_empty() {
            lines.push((index + 1, trimmed));
        }
    }
    parse_lines(&lines)
}

/// Parses pre-split edge-list lines; each entry is `(1-based line number, content)`.
///
/// # Errors
/// Returns [`LoadError`] if the input is empty or a line is unparsable.
pub fn parse_lines(lines: &[(usize, String)]) -> Result<(usize, Vec<(u32, u32)>), LoadError> {
    if lines.is_empty() {
        return Err(LoadError::Empty);
    }

    let has_comments = lines
        .iter()
        .any(|(_, l)| l.starts_with('#') || l.starts_with('%'));
    let header = !has_comments && lines[0].1.split_whitespace().count() == 1;

    if header {
        parse_header_style(lines)
    } else {
        parse_snap_style(lines)
    }
}

// ============================================================================
// Internal
// ============================================================================

fn parse_header_style(lines: &[(usize, String)]) -> Result<(usize, Vec<(u32, u32)>), LoadError> {
    let (first_no, first) = &lines[0];
    let n: usize = first.parse().map_err(|_| LoadError::BadLine {
        line: *first_no,
        content: first.clone(),
    })?;

    let mut edges = Vec::with_capacity(lines.len() - 1);
    for (line_no, content) in &lines[1..] {
        edges.push(parse_edge(*line_no, content)?);
    }
    Ok((n, edges))
}

fn parse_snap_style(lines: &[(usize, String)]) -> Result<(usize, Vec<(u32, u32)>), LoadError> {
    // Arbitrary ids are compacted to [0..N) in first-appearance order, so the
    // same file always yields the same vertex numbering.
    let mut remap: HashMap<u64, u32> = HashMap::new();
    let mut edges = Vec::new();

    for (line_no, content) in lines {
        if content.starts_with('#') || content.starts_with('%') {
            continue;
        }
        let (raw_u, raw_v) = parse_raw_edge(*line_no, content)?;
        let next = remap.len() as u32;
        let u = *remap.entry(raw_u).or_insert(next);
        let next = remap.len() as u32;
        let v = *remap.entry(raw_v).or_insert(next);
        edges.push((u, v));
    }

    if remap.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok((remap.len(), edges))
}

fn parse_edge(line_no: usize, content: &str) -> Result<(u32, u32), LoadError> {
    let (u, v) = parse_raw_edge(line_no, content)?;
    let narrow = |x: u64| {
        u32::try_from(x).map_err(|_| LoadError::BadLine {
            line: line_no,
            content: content.to_string(),
        })
    };
    Ok((narrow(u)?, narrow(v)?))
}

fn parse_raw_edge(line_no: usize, content: &str) -> Result<(u64, u64), LoadError> {
    let bad = || LoadError::BadLine {
        line: line_no,
        content: content.to_string(),
    };
    let mut tokens = content.split_whitespace();
    let u = tokens.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let v = tokens.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    if tokens.next().is_some() {
        return Err(bad());
    }
    Ok((u, v))
}

// ============================================================================
// Tests
// ============================================================================
