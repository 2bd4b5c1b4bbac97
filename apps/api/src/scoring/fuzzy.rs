//! Approximate string matching between item lists.

/// Default minimum similarity (0–100) for two items to count as a match.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 80.0;

/// Edit similarity of two strings on a 0–100 integer scale (case-insensitive).
///
/// Indel ratio: `2·LCS / (|a| + |b|)`, counted in chars, so insertions and deletions
/// each cost one and a substitution costs two. Halves round to even. Empty strings
/// never match anything.
pub fn edit_similarity(a: &str, b: &str) -> u32 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    let ratio = (2 * longest_common_subsequence(&a, &b)) as f64 / total as f64;
    (ratio * 100.0).round_ties_even() as u32
}

/// Length of the longest common subsequence, two-row dynamic programming.
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            current[j + 1] = if x == y {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Percentage of `items` that have at least one counterpart in `targets` whose edit
/// similarity reaches `threshold`. Either side empty gives 0.0.
pub fn fuzzy_match_rate(items: &[String], targets: &[String], threshold: f64) -> f64 {
    if items.is_empty() || targets.is_empty() {
        return 0.0;
    }

    let matched = items
        .iter()
        .filter(|item| {
            targets
                .iter()
                .any(|target| f64::from(edit_similarity(item, target)) >= threshold)
        })
        .count();

    matched as f64 / items.len() as f64 * 100.0
}
