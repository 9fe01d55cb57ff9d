//! Edit distance and normalized similarity
//!
//! Distances are counted over Unicode scalar values, not bytes, so accented
//! keywords compare the same way they read.

/// Classic Levenshtein distance (insert, delete, substitute all cost 1)
///
/// Complexity: O(n·m) time, O(m) space
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Normalized similarity in [0, 1]: `1 - distance / max(len)`
///
/// Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_identical_strings() {
        assert_eq!(levenshtein("jakarta", "jakarta"), 0);
        assert_eq!(similarity("jakarta", "jakarta"), 1.0);
    }

    #[test]
    fn test_known_distances() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("brezil", "brazil"), 1);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        assert_eq!(levenshtein("mbappé", "mbappe"), 1);
        assert!((similarity("mbappé", "mbappe") - (1.0 - 1.0 / 6.0)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_similarity() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "ai"), 0.0);
    }

    #[test]
    fn test_typo_clears_default_threshold() {
        assert!(similarity("bitcoyn", "bitcoin") >= 0.65);
        assert!(similarity("weather", "bitcoin") < 0.65);
    }

    #[quickcheck]
    fn prop_similarity_bounded(a: String, b: String) -> bool {
        let s = similarity(&a, &b);
        (0.0..=1.0).contains(&s)
    }

    #[quickcheck]
    fn prop_distance_symmetric(a: String, b: String) -> bool {
        levenshtein(&a, &b) == levenshtein(&b, &a)
    }

    #[quickcheck]
    fn prop_distance_to_self_is_zero(a: String) -> bool {
        levenshtein(&a, &a) == 0
    }
}
