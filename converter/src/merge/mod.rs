//! Merge several Argenta exports into one line stream.
//!
//! Merging runs in two phases:
//!
//! 1. [`expand_paths`] resolves every argument to a canonical path and
//!    replaces directories with the `*.csv` files directly inside them.
//! 2. [`merge_files`] reads the flat file list. Only the first file may keep
//!    its header block; every other file loses its first
//!    [`HEADER_BLOCK_LINES`] lines. The result remembers which file each
//!    merged line came from.
//!
//! Every export is assumed to start with exactly one header row and one
//! metadata (or blank) row. Files with a different block size are not
//! detected.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MergeError, MergeResult};
use crate::input::decode;
use crate::logs::{log_debug_indent, log_info, log_warning};

/// Lines stripped from the top of every non-primary export.
pub const HEADER_BLOCK_LINES: usize = 2;

/// Extension of export files picked up from directories.
pub const EXPORT_EXTENSION: &str = "csv";

/// The part of a [`MergedInput`] read from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub path: PathBuf,
    /// Index of the segment's first line in the merged lines
    pub start: usize,
    /// Lines contributed
    pub len: usize,
    /// Lines dropped from the top of the file
    pub skipped: usize,
}

/// Merged lines plus their origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedInput {
    pub lines: Vec<String>,
    pub segments: Vec<Segment>,
}

impl MergedInput {
    /// Map a 1-based merged line number to its file and 1-based line there.
    pub fn locate(&self, line: u64) -> Option<(&Path, u64)> {
        let index = usize::try_from(line.checked_sub(1)?).ok()?;
        self.segments
            .iter()
            .find(|s| index >= s.start && index < s.start + s.len)
            .map(|s| (s.path.as_path(), (index - s.start + s.skipped + 1) as u64))
    }
}

/// Resolve `paths` into a flat, de-duplicated list of canonical file paths.
///
/// Directories expand non-recursively to their `*.csv` files, sorted by
/// path. A file reached twice is kept at its first position only.
pub fn expand_paths<P: AsRef<Path>>(paths: &[P]) -> MergeResult<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let resolved = canonical(path)?;
        let metadata = fs::metadata(&resolved).map_err(|source| MergeError::Io {
            path: resolved.clone(),
            source,
        })?;

        let candidates = if metadata.is_dir() {
            let dir_files = csv_files_in(&resolved)?;
            log_info(format!(
                "Directory {}: {} export file(s)",
                resolved.display(),
                dir_files.len()
            ));
            dir_files
        } else {
            vec![resolved]
        };

        for file in candidates {
            if seen.insert(file.clone()) {
                files.push(file);
            } else {
                log_warning(format!("Skipping duplicate input {}", file.display()));
            }
        }
    }

    Ok(files)
}

/// Read and concatenate the lines of every input.
///
/// With `include_header`, the first file is kept whole; otherwise its
/// header block is dropped like every other file's.
///
/// "First" means first in the expanded list. A directory does not get its
/// own header back: `[file, dir]` keeps only `file`'s header, and `[dir]`
/// without `include_header` keeps none.
pub fn read_files<P: AsRef<Path>>(paths: &[P], include_header: bool) -> MergeResult<Vec<String>> {
    Ok(merge_files(paths, include_header)?.lines)
}

/// Like [`read_files`], also recording which file each line came from.
pub fn merge_files<P: AsRef<Path>>(paths: &[P], include_header: bool) -> MergeResult<MergedInput> {
    let files = expand_paths(paths)?;
    let mut merged = MergedInput::default();

    for (i, file) in files.into_iter().enumerate() {
        let lines = read_file_lines(&file)?;
        let total = lines.len();
        let keep_all = i == 0 && include_header;
        let skipped = if keep_all { 0 } else { HEADER_BLOCK_LINES.min(total) };

        log_debug_indent(
            format!("{}: {} of {} lines", file.display(), total - skipped, total),
            1,
        );
        merged.segments.push(Segment {
            path: file,
            start: merged.lines.len(),
            len: total - skipped,
            skipped,
        });
        merged.lines.extend(lines.into_iter().skip(skipped));
    }

    Ok(merged)
}

fn canonical(path: &Path) -> MergeResult<PathBuf> {
    fs::canonicalize(path).map_err(|source| MergeError::PathNotFound {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_files_in(dir: &Path) -> MergeResult<Vec<PathBuf>> {
    let io_err = |source| MergeError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == EXPORT_EXTENSION) {
            files.push(canonical(&path)?);
        }
    }

    files.sort();
    Ok(files)
}

fn read_file_lines(path: &Path) -> MergeResult<Vec<String>> {
    let bytes = fs::read(path).map_err(|source| MergeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = decode(&bytes);
    if decoded.encoding != "utf-8" {
        log_info(format!("{}: decoded as {}", path.display(), decoded.encoding));
    }
    Ok(decoded.into_lines())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_single_file_with_header_unchanged() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "a.csv", "H1;H2\n\n1;2\n3;4\n");

        let lines = read_files(&[file], true).unwrap();
        assert_eq!(lines, vec!["H1;H2", "", "1;2", "3;4"]);
    }

    #[test]
    fn test_single_file_without_header() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "a.csv", "H1;H2\n\n1;2\n");

        let lines = read_files(&[file], false).unwrap();
        assert_eq!(lines, vec!["1;2"]);
    }

    #[test]
    fn test_second_file_loses_header_block() {
        let dir = tempdir().unwrap();
        let first = write(dir.path(), "a.csv", "H\n\nA1\nA2\n");
        let second = write(dir.path(), "b.csv", "H\nmeta\nB1\n");

        let lines = read_files(&[first, second], true).unwrap();
        assert_eq!(lines, vec!["H", "", "A1", "A2", "B1"]);
    }

    #[test]
    fn test_short_file_contributes_nothing() {
        let dir = tempdir().unwrap();
        let first = write(dir.path(), "a.csv", "H\n\nA1\n");
        let second = write(dir.path(), "b.csv", "H\n");

        let lines = read_files(&[first, second], true).unwrap();
        assert_eq!(lines, vec!["H", "", "A1"]);
    }

    #[test]
    fn test_directory_expands_sorted_csv_only() {
        let dir = tempdir().unwrap();
        write(dir.path(), "b.csv", "x");
        write(dir.path(), "a.csv", "x");
        write(dir.path(), "notes.txt", "x");
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let files = expand_paths(&[dir.path()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
        assert!(files.iter().all(|f| f.is_absolute()));
    }

    #[test]
    fn test_duplicates_merged_once() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "a.csv", "H\n\nA1\n");
        let alias = dir.path().join(".").join("a.csv");

        let files = expand_paths(&[file.clone(), alias, dir.path().to_path_buf()]).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_missing_path_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.csv");

        let err = read_files(&[missing.clone()], true).unwrap_err();
        match err {
            MergeError::PathNotFound { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_directory_after_file_keeps_no_second_header() {
        let dir = tempdir().unwrap();
        let lead = write(dir.path(), "lead.csv", "H\n\nL1\n");
        let exports = dir.path().join("exports");
        fs::create_dir(&exports).unwrap();
        write(&exports, "a.csv", "H\n\nA1\n");
        write(&exports, "b.csv", "H\n\nB1\n");

        let lines = read_files(&[lead, exports], true).unwrap();
        assert_eq!(lines, vec!["H", "", "L1", "A1", "B1"]);
    }

    #[test]
    fn test_directory_without_header() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.csv", "H\n\nA1\n");
        write(dir.path(), "b.csv", "H\n\nB1\n");

        let lines = read_files(&[dir.path()], false).unwrap();
        assert_eq!(lines, vec!["A1", "B1"]);
    }

    #[test]
    fn test_locate_maps_back_to_file_lines() {
        let dir = tempdir().unwrap();
        let first = write(dir.path(), "a.csv", "H\n\nA1\nA2\n");
        let second = write(dir.path(), "b.csv", "H\n\nB1\n");

        let merged = merge_files(&[first, second], true).unwrap();
        assert_eq!(merged.lines.len(), 5);

        let (path, line) = merged.locate(3).unwrap();
        assert!(path.ends_with("a.csv"));
        assert_eq!(line, 3);

        let (path, line) = merged.locate(5).unwrap();
        assert!(path.ends_with("b.csv"));
        assert_eq!(line, 3);

        assert!(merged.locate(0).is_none());
        assert!(merged.locate(6).is_none());
    }

    #[test]
    fn test_empty_directory_yields_nothing() {
        let dir = tempdir().unwrap();
        assert!(read_files(&[dir.path()], true).unwrap().is_empty());
    }
}
