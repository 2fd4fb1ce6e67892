// Output file naming for persisted records

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::constants::{MAX_STEM_BYTES, RECORD_FILE_EXTENSION, UNTITLED_STEM};

/// Filesystem-safe stem for a record title.
///
/// Whitespace, path separators, characters reserved on common filesystems
/// and control characters become `_`. Titles that reduce to nothing (or to
/// dots only) become `untitled`. The stem is cut on a character boundary at
/// `MAX_STEM_BYTES` bytes.
pub fn safe_stem(title: &str) -> String {
    let mut stem = String::new();
    for c in title.trim().chars().map(sanitize_char) {
        if stem.len() + c.len_utf8() > MAX_STEM_BYTES {
            break;
        }
        stem.push(c);
    }

    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        UNTITLED_STEM.to_string()
    } else {
        stem
    }
}

fn sanitize_char(c: char) -> char {
    match c {
        '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
        c if c.is_whitespace() || c.is_control() => '_',
        c => c,
    }
}

/// Assigns one unique path per record within a run.
///
/// The second record titled `X` lands in `X_2.json`, the third in
/// `X_3.json`, so same-titled postings never overwrite each other.
#[derive(Debug)]
pub struct OutputNamer {
    dir: PathBuf,
    used: HashSet<String>,
}

impl OutputNamer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            used: HashSet::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&mut self, title: &str) -> PathBuf {
        let base = safe_stem(title);
        let mut candidate = base.clone();
        let mut n = 1;
        while !self.used.insert(candidate.clone()) {
            n += 1;
            candidate = format!("{}_{}", base, n);
        }
        self.dir
            .join(format!("{}.{}", candidate, RECORD_FILE_EXTENSION))
    }
}
