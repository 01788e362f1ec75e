//! Cheap lexical pre-grouping of signals ahead of the LLM clustering call.

use std::collections::HashSet;
use std::path::Path;

use sift_core::model::Signal;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "if",
    "in", "into", "is", "it", "its", "no", "not", "of", "on", "or", "so", "such", "that", "the",
    "their", "then", "there", "these", "they", "this", "to", "was", "will", "with",
];

/// Signals the pre-filter believes are about the same thing.
#[derive(Debug, Clone)]
pub struct SignalGroup<'a> {
    pub representative: &'a Signal,
    pub members: Vec<&'a Signal>,
    /// Positions of `members` in the input slice, ascending.
    pub member_indices: Vec<usize>,
}

/// Greedily partition `signals` into groups.
///
/// For each unassigned signal in input order a new group is opened, then every
/// later unassigned signal joins it when it comes from the same source and
/// either lives in the same (non-root) directory or has a title whose
/// similarity is at least `threshold`. Every index lands in exactly one group.
pub fn pre_filter(signals: &[Signal], threshold: f64) -> Vec<SignalGroup<'_>> {
    let tokens: Vec<HashSet<String>> = signals.iter().map(|s| tokenize(&s.title)).collect();
    let dirs: Vec<Option<&str>> = signals.iter().map(|s| parent_dir(&s.file_path)).collect();
    let mut assigned = vec![false; signals.len()];
    let mut groups = Vec::new();

    for i in 0..signals.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let mut member_indices = vec![i];

        for j in (i + 1)..signals.len() {
            if assigned[j] || signals[i].source != signals[j].source {
                continue;
            }
            let same_dir = matches!((dirs[i], dirs[j]), (Some(a), Some(b)) if a == b);
            if same_dir || jaccard(&tokens[i], &tokens[j]) >= threshold {
                assigned[j] = true;
                member_indices.push(j);
            }
        }

        groups.push(SignalGroup {
            representative: &signals[i],
            members: member_indices.iter().map(|&k| &signals[k]).collect(),
            member_indices,
        });
    }

    tracing::debug!(
        "Pre-filter grouped {} signals into {} groups",
        signals.len(),
        groups.len()
    );
    groups
}

/// Jaccard index over normalized title tokens. 0.0 when either side is empty.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    jaccard(&tokenize(a), &tokenize(b))
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let inter = a.intersection(b).count();
    if inter == 0 {
        return 0.0;
    }
    let union = a.union(b).count();
    inter as f64 / union as f64
}

/// Lower-case, turn every non-alphanumeric character (punctuation of any
/// script, symbols) into a separator, split, then drop stop words
/// and tokens shorter than two characters.
fn tokenize(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() >= 2 && !STOP_WORDS.contains(t))
        .map(String::from)
        .collect()
}

/// Parent directory of `path`, or `None` for root-level and empty paths.
fn parent_dir(path: &str) -> Option<&str> {
    let parent = Path::new(path).parent()?.to_str()?;
    match parent {
        "" | "." | "/" => None,
        dir => Some(dir),
    }
}
