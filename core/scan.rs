use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use crate::branch::TaggedFile;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::tags;

/// Group folders follow the `(<number>)-<name>` convention; whitespace after
/// the dash is tolerated.
static GROUP_DIR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(([0-9]+)\)-\s*(.+)$").expect("literal pattern compiles"));

#[derive(Debug, Clone)]
pub struct Group {
    pub order: u32,
    pub name: String,
    pub path: PathBuf,
    pub files: Vec<TaggedFile>,
}

/// Scans `source_dir` for group folders and loads their files. Returns the
/// groups sorted ascending by parsed order. Folders not matching the naming
/// convention are skipped with a warning; unreadable files are skipped
/// per-file without aborting the group.
pub fn scan_groups(source_dir: &Path, config: &Config) -> Result<Vec<Group>> {
    if !source_dir.is_dir() {
        return Err(AppError::GroupLayout(format!(
            "Source directory not found: {}",
            source_dir.display()
        )));
    }

    let mut groups = Vec::new();
    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let folder_name = entry.file_name().to_string_lossy().into_owned();

        let Some(caps) = GROUP_DIR_PATTERN.captures(&folder_name) else {
            log::warn!(
                "Skipping folder '{}': expected naming convention '(<number>)-<name>'",
                folder_name
            );
            continue;
        };
        let Ok(order) = caps[1].parse::<u32>() else {
            log::warn!("Skipping folder '{}': order is out of range", folder_name);
            continue;
        };
        let name = caps[2].trim().to_string();

        let files = scan_group_files(entry.path(), order, config)?;
        log::info!("Found group [{}] {}: {} files", order, name, files.len());
        groups.push(Group {
            order,
            name,
            path: entry.path().to_path_buf(),
            files,
        });
    }

    groups.sort_by_key(|g| g.order);
    Ok(groups)
}

fn scan_group_files(folder: &Path, group_order: u32, config: &Config) -> Result<Vec<TaggedFile>> {
    let marker = &config.naming.hide_marker;
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let orig_name = entry.file_name().to_string_lossy().into_owned();

        let hidden = !marker.is_empty() && orig_name.contains(marker.as_str());
        let clean_name = if hidden {
            log::debug!(
                "File '{}' carries the hide marker; it will not appear in output names",
                orig_name
            );
            orig_name.replace(marker.as_str(), "")
        } else {
            orig_name.clone()
        };

        let tag_set = tags::extract_tags(&clean_name, config.matching.brackets);
        let base_name = tags::strip_tags(&clean_name, config.matching.brackets);
        let (stem, extension) = split_extension(&base_name);

        let content = match fs::read_to_string(entry.path()) {
            Ok(content) => content,
            Err(e) => {
                log::error!("Failed to read '{}': {}. Skipping file.", orig_name, e);
                continue;
            }
        };

        files.push(TaggedFile {
            path: entry.path().to_path_buf(),
            orig_name,
            base_name,
            stem,
            extension,
            tags: tag_set,
            content,
            group_order,
            hidden,
        });
    }

    Ok(files)
}

/// Splits `base` at the last extension boundary. Leading-dot names and names
/// without a dot have no extension; a returned extension keeps its dot.
fn split_extension(base: &str) -> (String, String) {
    let path = Path::new(base);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(base)
                .to_string();
            (stem, format!(".{}", ext))
        }
        None => (base.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn split_extension_cases() {
        assert_eq!(split_extension("A.md"), ("A".into(), ".md".into()));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar".into(), ".gz".into()));
        assert_eq!(split_extension("README"), ("README".into(), String::new()));
        assert_eq!(split_extension(".gitignore"), (".gitignore".into(), String::new()));
    }

    #[test]
    fn missing_source_dir_is_fatal() {
        let result = scan_groups(Path::new("/nonexistent/xcombine-test"), &Config::default());
        assert!(matches!(result, Err(AppError::GroupLayout(_))));
    }

    #[test]
    fn groups_are_parsed_and_sorted_by_order() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("(2)-style")).unwrap();
        fs::create_dir(root.join("(1)-base")).unwrap();
        fs::create_dir(root.join("unrelated")).unwrap();
        write(&root.join("(1)-base"), "(x) A.md", "alpha");
        write(&root.join("(2)-style"), "B.md", "bravo");

        let groups = scan_groups(root, &Config::default()).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].order, 1);
        assert_eq!(groups[0].name, "base");
        assert_eq!(groups[1].order, 2);
        assert_eq!(groups[1].name, "style");
    }

    #[test]
    fn file_records_carry_tags_name_parts_and_content() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("(1)-base")).unwrap();
        fs::create_dir(root.join("(2)-style")).unwrap();
        write(&root.join("(1)-base"), "(x,y) A.md", "alpha");
        write(&root.join("(2)-style"), "B.md", "bravo");

        let groups = scan_groups(root, &Config::default()).unwrap();
        let a = &groups[0].files[0];
        assert_eq!(a.orig_name, "(x,y) A.md");
        assert_eq!(a.base_name, "A.md");
        assert_eq!(a.stem, "A");
        assert_eq!(a.extension, ".md");
        assert_eq!(a.content, "alpha");
        assert_eq!(a.group_order, 1);
        assert!(a.tags.contains("x") && a.tags.contains("y"));
        assert!(!a.hidden);

        let b = &groups[1].files[0];
        assert!(b.tags.is_empty());
        assert_eq!(b.stem, "B");
    }

    #[test]
    fn hide_marker_is_stripped_before_tag_parsing() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("(1)-base")).unwrap();
        fs::create_dir(root.join("(2)-style")).unwrap();
        write(&root.join("(1)-base"), "(x) A[hide].md", "alpha");
        write(&root.join("(2)-style"), "B.md", "bravo");

        let groups = scan_groups(root, &Config::default()).unwrap();
        let a = &groups[0].files[0];
        assert!(a.hidden);
        assert_eq!(a.base_name, "A.md");
        assert!(a.tags.contains("x"));
    }

    #[test]
    fn subdirectories_inside_groups_are_ignored() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("(1)-base")).unwrap();
        fs::create_dir(root.join("(1)-base").join("nested")).unwrap();
        write(&root.join("(1)-base"), "A.md", "alpha");

        let groups = scan_groups(root, &Config::default()).unwrap();
        assert_eq!(groups[0].files.len(), 1);
    }
}
