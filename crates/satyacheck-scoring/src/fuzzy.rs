//! Local fuzzy string similarity for entity names.

/// Normalized insertion/deletion similarity in `[0, 100]`.
///
/// `100 * (1 - indel / (len(a) + len(b)))` over Unicode scalar values, where
/// `indel = len(a) + len(b) - 2 * lcs(a, b)`. Two empty strings score 100.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    let lcs = longest_common_subsequence(&a, &b);
    let indel = total - 2 * lcs;
    100.0 * (1.0 - indel as f64 / total as f64)
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let n = b.len();
    let mut prev: Vec<usize> = vec![0; n + 1];
    let mut curr: Vec<usize> = vec![0; n + 1];

    for &ca in a {
        for j in 1..=n {
            curr[j] = if ca == b[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identical_and_disjoint() {
        assert_abs_diff_eq!(ratio("රනිල්", "රනිල්"), 100.0);
        assert_abs_diff_eq!(ratio("abc", "xyz"), 0.0);
        assert_abs_diff_eq!(ratio("", ""), 100.0);
        assert_abs_diff_eq!(ratio("abc", ""), 0.0);
    }

    #[test]
    fn matches_indel_normalization() {
        // lcs("this is a test", "this is a test!") = 14, total = 29.
        assert_abs_diff_eq!(ratio("this is a test", "this is a test!"), 100.0 * 28.0 / 29.0, epsilon = 1e-9);
        // "kitten" / "sitting": lcs = 4 ("ittn"), total = 13.
        assert_abs_diff_eq!(ratio("kitten", "sitting"), 100.0 * 8.0 / 13.0, epsilon = 1e-9);
    }

    #[test]
    fn symmetric() {
        assert_abs_diff_eq!(
            ratio("මහින්ද රාජපක්ෂ", "මහින්ද"),
            ratio("මහින්ද", "මහින්ද රාජපක්ෂ")
        );
    }
}
