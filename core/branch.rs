use std::collections::HashSet;
use std::path::PathBuf;

/// One file of a group, parsed and loaded. Immutable once scanned.
#[derive(Debug, Clone)]
pub struct TaggedFile {
    pub path: PathBuf,
    pub orig_name: String,
    /// Filename with the tag segment (and hide marker) stripped.
    pub base_name: String,
    pub stem: String,
    /// Extension including the leading dot; empty when the base name has none.
    pub extension: String,
    pub tags: HashSet<String>,
    pub content: String,
    pub group_order: u32,
    pub hidden: bool,
}

impl TaggedFile {
    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }
}

/// A candidate combination: one file per layer passed so far, plus the
/// accumulated tag set constraining the next layer.
#[derive(Debug, Clone)]
pub struct Branch<'a> {
    pub files: Vec<&'a TaggedFile>,
    pub tags: HashSet<String>,
}

impl<'a> Branch<'a> {
    pub fn seed(file: &'a TaggedFile) -> Self {
        Self {
            files: vec![file],
            tags: file.tags.clone(),
        }
    }

    /// Forks this branch with `file` appended. The accumulated set narrows to
    /// the intersection when one exists, resets to the file's own tags when
    /// the intersection is empty, and carries over unchanged for untagged
    /// files.
    pub fn extend_with(&self, file: &'a TaggedFile) -> Self {
        let tags = if file.is_tagged() {
            let shared: HashSet<String> = self.tags.intersection(&file.tags).cloned().collect();
            if shared.is_empty() {
                file.tags.clone()
            } else {
                shared
            }
        } else {
            self.tags.clone()
        };

        let mut files = self.files.clone();
        files.push(file);
        Self { files, tags }
    }

    /// Chain of source filenames, for logs.
    pub fn chain(&self) -> String {
        self.files
            .iter()
            .map(|f| f.orig_name.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    }

    /// Accumulated tags in sorted order, for stable log and report output.
    pub fn sorted_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.tags.iter().cloned().collect();
        tags.sort();
        tags
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// No candidate matched in some layer; the branch stopped there.
    NoMatch,
    /// The branch survived every layer.
    Exhausted,
}

/// A finished branch, handed to output composition exactly once.
#[derive(Debug)]
pub struct TerminalBranch<'a> {
    pub branch: Branch<'a>,
    pub termination: Termination,
}
