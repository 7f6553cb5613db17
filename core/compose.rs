use std::collections::HashSet;

use indexmap::IndexMap;

use crate::branch::{Branch, TaggedFile};
use crate::config::{Config, ExtensionMode};

/// A finished branch rendered into a writable output: the derived filename,
/// the joined content, and any tag-continuity warnings.
#[derive(Debug, Clone)]
pub struct Composed {
    pub filename: String,
    pub content: String,
    pub warnings: Vec<String>,
}

pub fn compose(branch: &Branch<'_>, config: &Config) -> Composed {
    let files = &branch.files;
    Composed {
        filename: output_filename(files, config),
        content: combined_content(files, &config.content.separator),
        warnings: discontinuity_warnings(&tag_spans(files)),
    }
}

/// Joins the name parts of the non-hidden files and appends the resolved
/// extension. If every file is hidden the first file names the output, so a
/// branch never produces an empty filename.
fn output_filename(files: &[&TaggedFile], config: &Config) -> String {
    let visible: Vec<&TaggedFile> = files.iter().copied().filter(|f| !f.hidden).collect();
    let named: Vec<&TaggedFile> = if visible.is_empty() {
        files.first().copied().into_iter().collect()
    } else {
        visible
    };

    let parts: Vec<&str> = named
        .iter()
        .map(|f| {
            if config.naming.include_extension {
                f.base_name.as_str()
            } else {
                f.stem.as_str()
            }
        })
        .collect();

    format!(
        "{}{}",
        parts.join(&config.naming.separator),
        resolve_extension(files, config)
    )
}

/// Extension policy over the full (unfiltered) sequence.
fn resolve_extension(files: &[&TaggedFile], config: &Config) -> String {
    match config.naming.extension_mode {
        ExtensionMode::First => files.first().map(|f| f.extension.clone()).unwrap_or_default(),
        ExtensionMode::Last => files.last().map(|f| f.extension.clone()).unwrap_or_default(),
        ExtensionMode::None => String::new(),
        ExtensionMode::Custom => {
            let ext = config.naming.custom_extension.trim();
            if ext.is_empty() || ext.starts_with('.') {
                ext.to_string()
            } else {
                format!(".{}", ext)
            }
        }
    }
}

/// Hidden files still contribute content; hiding only affects the name.
fn combined_content(files: &[&TaggedFile], separator: &str) -> String {
    files
        .iter()
        .map(|f| f.content.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Per tag, the group orders where it appeared in the sequence. Tags are
/// visited in sorted order per file so the mapping is stable across runs.
pub fn tag_spans(files: &[&TaggedFile]) -> IndexMap<String, Vec<u32>> {
    let mut spans: IndexMap<String, Vec<u32>> = IndexMap::new();
    for file in files {
        let mut file_tags: Vec<&String> = file.tags.iter().collect();
        file_tags.sort();
        for tag in file_tags {
            spans.entry(tag.clone()).or_default().push(file.group_order);
        }
    }
    spans
}

/// A tag whose occurrences leave a gap between its first and last group is
/// reported; informational only, the output is still produced.
pub fn discontinuity_warnings(spans: &IndexMap<String, Vec<u32>>) -> Vec<String> {
    let mut warnings = Vec::new();
    for (tag, orders) in spans {
        if orders.len() < 2 {
            continue;
        }
        let present: HashSet<u32> = orders.iter().copied().collect();
        let (Some(&min), Some(&max)) = (orders.iter().min(), orders.iter().max()) else {
            continue;
        };
        let missing: Vec<u32> = (min..=max).filter(|o| !present.contains(o)).collect();
        if !missing.is_empty() {
            warnings.push(format!(
                "tag '{}' is missing from groups {:?}",
                tag, missing
            ));
        }
    }
    warnings
}
