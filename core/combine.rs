use crate::branch::{Branch, TaggedFile, TerminalBranch, Termination};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::scan::Group;

/// Runs the layer-by-layer traversal over `groups` (already sorted by order)
/// and returns every terminal branch, in emission order: branches that found
/// no continuation in a layer appear as that layer is processed, survivors of
/// the final layer come last.
///
/// Fewer than two groups is a caller error; a layer with zero files simply
/// terminates every branch that reaches it.
pub fn combine<'g>(groups: &'g [Group], config: &Config) -> Result<Vec<TerminalBranch<'g>>> {
    if groups.len() < 2 {
        return Err(AppError::GroupLayout(format!(
            "At least two group folders are required, found {}",
            groups.len()
        )));
    }

    let mut active: Vec<Branch<'g>> = groups[0].files.iter().map(Branch::seed).collect();
    for branch in &active {
        log::debug!(
            "Seeded branch: {} [tags: {:?}]",
            branch.chain(),
            branch.sorted_tags()
        );
    }

    let mut terminals = Vec::new();

    for group in &groups[1..] {
        log::debug!(
            "Matching {} branches against group [{}] {}",
            active.len(),
            group.order,
            group.name
        );

        let mut survivors = Vec::new();
        for branch in active {
            let candidates = candidates_for(&branch, group, config);
            if candidates.is_empty() {
                log::warn!(
                    "Branch terminated early: {} (no match in group [{}] {})",
                    branch.chain(),
                    group.order,
                    group.name
                );
                terminals.push(TerminalBranch {
                    branch,
                    termination: Termination::NoMatch,
                });
                continue;
            }
            for file in candidates {
                let child = branch.extend_with(file);
                log::debug!(
                    "Matched: {} [tags: {:?}]",
                    child.chain(),
                    child.sorted_tags()
                );
                survivors.push(child);
            }
        }

        active = survivors;
        if active.is_empty() {
            log::warn!("All branches terminated before the last group");
            break;
        }
    }

    terminals.extend(active.into_iter().map(|branch| TerminalBranch {
        branch,
        termination: Termination::Exhausted,
    }));
    Ok(terminals)
}

/// Candidate files of `group` for extending `branch`. Tagged files that
/// match take priority; untagged files are the fallback only when no tagged
/// file matched.
fn candidates_for<'g>(
    branch: &Branch<'g>,
    group: &'g Group,
    config: &Config,
) -> Vec<&'g TaggedFile> {
    let matched_tagged: Vec<&TaggedFile> = group
        .files
        .iter()
        .filter(|f| f.is_tagged() && accepts(branch, f, config))
        .collect();
    if !matched_tagged.is_empty() {
        return matched_tagged;
    }
    group.files.iter().filter(|f| !f.is_tagged()).collect()
}

fn accepts(branch: &Branch<'_>, file: &TaggedFile, config: &Config) -> bool {
    if !config.matching.enabled {
        return true;
    }
    if branch.tags.is_empty() {
        return true;
    }
    branch.tags.intersection(&file.tags).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BracketStyle;
    use crate::tags;
    use std::path::PathBuf;

    fn file(name: &str, order: u32, content: &str) -> TaggedFile {
        let tag_set = tags::extract_tags(name, BracketStyle::Both);
        let base_name = tags::strip_tags(name, BracketStyle::Both);
        TaggedFile {
            path: PathBuf::from(name),
            orig_name: name.to_string(),
            stem: base_name.clone(),
            base_name,
            extension: String::new(),
            tags: tag_set,
            content: content.to_string(),
            group_order: order,
            hidden: false,
        }
    }

    fn group(order: u32, names: &[&str]) -> Group {
        Group {
            order,
            name: format!("group-{}", order),
            path: PathBuf::new(),
            files: names.iter().map(|n| file(n, order, n)).collect(),
        }
    }

    fn chains(terminals: &[TerminalBranch<'_>]) -> Vec<String> {
        terminals.iter().map(|t| t.branch.chain()).collect()
    }

    #[test]
    fn fewer_than_two_groups_is_an_error() {
        let single = vec![group(1, &["A"])];
        assert!(matches!(
            combine(&single, &Config::default()),
            Err(AppError::GroupLayout(_))
        ));
        assert!(matches!(
            combine(&[], &Config::default()),
            Err(AppError::GroupLayout(_))
        ));
    }

    #[test]
    fn shared_tag_is_preferred_over_untagged_fallback() {
        let groups = vec![group(1, &["(x) A.md"]), group(2, &["(x) B.md", "C.md"])];
        let terminals = combine(&groups, &Config::default()).unwrap();
        assert_eq!(chains(&terminals), vec!["(x) A.md → (x) B.md"]);
        assert_eq!(terminals[0].termination, Termination::Exhausted);
    }

    #[test]
    fn untagged_files_are_the_fallback_when_nothing_matches() {
        let groups = vec![group(1, &["(x) A.md"]), group(2, &["(y) B.md", "C.md"])];
        let terminals = combine(&groups, &Config::default()).unwrap();
        assert_eq!(chains(&terminals), vec!["(x) A.md → C.md"]);
    }

    #[test]
    fn no_match_and_no_fallback_terminates_early() {
        let groups = vec![group(1, &["(x) A.md"]), group(2, &["(y) B.md"])];
        let terminals = combine(&groups, &Config::default()).unwrap();
        assert_eq!(terminals.len(), 1);
        assert_eq!(terminals[0].termination, Termination::NoMatch);
        assert_eq!(terminals[0].branch.chain(), "(x) A.md");
    }

    #[test]
    fn untagged_branch_matches_any_tagged_file() {
        let groups = vec![group(1, &["A.md"]), group(2, &["(y) B.md", "(z) C.md"])];
        let terminals = combine(&groups, &Config::default()).unwrap();
        assert_eq!(terminals.len(), 2);
    }

    #[test]
    fn disabled_matching_accepts_every_tagged_file() {
        let groups = vec![group(1, &["(x) A.md"]), group(2, &["(y) B.md", "(z) C.md"])];
        let mut config = Config::default();
        config.matching.enabled = false;
        let terminals = combine(&groups, &config).unwrap();
        assert_eq!(terminals.len(), 2);
    }

    #[test]
    fn branches_fork_multiplicatively_across_layers() {
        let groups = vec![
            group(1, &["(x) A.md"]),
            group(2, &["(x) B1.md", "(x) B2.md"]),
            group(3, &["(x) C1.md", "(x) C2.md"]),
        ];
        let terminals = combine(&groups, &Config::default()).unwrap();
        assert_eq!(terminals.len(), 4);
        assert!(
            terminals
                .iter()
                .all(|t| t.termination == Termination::Exhausted)
        );
    }

    #[test]
    fn every_seed_accounts_for_at_least_one_terminal_branch() {
        let groups = vec![
            group(1, &["(x) A.md", "(q) Q.md", "P.md"]),
            group(2, &["(x) B.md"]),
            group(3, &["(z) C.md"]),
        ];
        let terminals = combine(&groups, &Config::default()).unwrap();
        // Seed Q finds no match in layer 2; seeds A and P extend to B, then
        // both die in layer 3 (tag z never intersects, no untagged fallback).
        assert_eq!(terminals.len(), 3);
        let first_files: Vec<&str> = terminals
            .iter()
            .map(|t| t.branch.files[0].orig_name.as_str())
            .collect();
        assert!(first_files.contains(&"(x) A.md"));
        assert!(first_files.contains(&"(q) Q.md"));
        assert!(first_files.contains(&"P.md"));
        assert!(
            terminals
                .iter()
                .all(|t| t.termination == Termination::NoMatch)
        );
    }

    #[test]
    fn empty_layer_terminates_all_branches_early() {
        let groups = vec![group(1, &["(x) A.md", "B.md"]), group(2, &[])];
        let terminals = combine(&groups, &Config::default()).unwrap();
        assert_eq!(terminals.len(), 2);
        assert!(
            terminals
                .iter()
                .all(|t| t.termination == Termination::NoMatch)
        );
    }

    #[test]
    fn tag_reset_lets_an_unconstrained_branch_specialize() {
        // P starts with no tag constraint, so (z) B matches; the extension
        // resets the lineage to {z}, which then rules out (w) E in layer 3.
        let groups = vec![
            group(1, &["P.md"]),
            group(2, &["(z) B.md"]),
            group(3, &["(z) D.md", "(w) E.md"]),
        ];
        let terminals = combine(&groups, &Config::default()).unwrap();
        assert_eq!(chains(&terminals), vec!["P.md → (z) B.md → (z) D.md"]);
        assert_eq!(terminals[0].termination, Termination::Exhausted);
    }

    #[test]
    fn accumulated_tags_never_collapse_to_empty_on_tagged_files() {
        let groups = vec![
            group(1, &["(x) A.md"]),
            group(2, &["(z) B.md"]),
            group(3, &["(z) C.md"]),
        ];
        let mut config = Config::default();
        config.matching.enabled = false;
        let terminals = combine(&groups, &config).unwrap();
        for t in &terminals {
            assert!(!t.branch.tags.is_empty());
        }
    }
}
