//! Trigram-based similarity check of generated text against crawl snippets.
//!
//! Texts are normalized, decomposed into character trigram frequency
//! vectors, and compared pairwise by cosine similarity. The reported score
//! is the worst (highest) match across all sources, not the average.

use std::collections::HashMap;

/// A draft fails the check at this similarity percentage or above.
const PASS_THRESHOLD: i32 = 70;

/// Sources scoring strictly above this percentage are listed as compared.
const COMPARED_THRESHOLD: i32 = 10;

/// One candidate source to compare the generated text against.
#[derive(Debug, Clone)]
pub struct SourceSnippet {
    pub id: String,
    pub snippet_text: String,
}

/// Result of a plagiarism check.
#[derive(Debug, Clone, PartialEq)]
pub struct PlagiarismResult {
    /// Highest percentage similarity across all sources, 0-100.
    pub similarity_score: i32,
    /// True iff `similarity_score` is strictly below the pass threshold.
    pub passed: bool,
    /// Ids of sources whose similarity exceeded the comparison threshold.
    pub compared_source_ids: Vec<String>,
}

/// Compare generated text against a set of source snippets.
///
/// With no sources there is nothing to compare: the check trivially passes
/// with a score of 0. A generated text shorter than 3 characters yields an
/// empty trigram vector and scores 0 against everything; that is a known
/// property of the method, not a defect.
pub fn check_plagiarism(generated_text: &str, sources: &[SourceSnippet]) -> PlagiarismResult {
    if sources.is_empty() {
        return PlagiarismResult {
            similarity_score: 0,
            passed: true,
            compared_source_ids: Vec::new(),
        };
    }

    let generated_trigrams = trigrams(generated_text);
    let mut max_similarity = 0;
    let mut compared_source_ids = Vec::new();

    for source in sources {
        let source_trigrams = trigrams(&source.snippet_text);
        let similarity = cosine_similarity(&generated_trigrams, &source_trigrams);
        let similarity_pct = to_percent(similarity);

        if similarity_pct > COMPARED_THRESHOLD {
            compared_source_ids.push(source.id.clone());
        }

        if similarity_pct > max_similarity {
            max_similarity = similarity_pct;
        }
    }

    PlagiarismResult {
        similarity_score: max_similarity,
        passed: max_similarity < PASS_THRESHOLD,
        compared_source_ids,
    }
}

/// Lowercase, collapse whitespace runs to single spaces, and trim.
fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut in_whitespace = false;

    for c in lower.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }

    out.trim().to_string()
}

/// Character trigram frequency vector over the normalized text.
/// Strings shorter than 3 characters produce an empty vector.
fn trigrams(text: &str) -> HashMap<String, u32> {
    let normalized = normalize(text);
    let chars: Vec<char> = normalized.chars().collect();
    let mut counts: HashMap<String, u32> = HashMap::new();

    if chars.len() < 3 {
        return counts;
    }

    for window in chars.windows(3) {
        let trigram: String = window.iter().collect();
        *counts.entry(trigram).or_insert(0) += 1;
    }

    counts
}

/// Cosine similarity of two frequency vectors, in [0, 1].
/// Returns 0 when either vector is empty.
fn cosine_similarity(a: &HashMap<String, u32>, b: &HashMap<String, u32>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut dot_product = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (key, &val_a) in a {
        let val_a = val_a as f64;
        norm_a += val_a * val_a;
        if let Some(&val_b) = b.get(key) {
            dot_product += val_a * val_b as f64;
        }
    }

    for &val_b in b.values() {
        let val_b = val_b as f64;
        norm_b += val_b * val_b;
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    dot_product / denominator
}

fn to_percent(similarity: f64) -> i32 {
    (similarity * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str, text: &str) -> SourceSnippet {
        SourceSnippet {
            id: id.to_string(),
            snippet_text: text.to_string(),
        }
    }

    #[test]
    fn test_no_sources_passes_with_zero() {
        let result = check_plagiarism("Any generated text at all.", &[]);
        assert_eq!(result.similarity_score, 0);
        assert!(result.passed);
        assert!(result.compared_source_ids.is_empty());
    }

    #[test]
    fn test_identical_text_fails() {
        let text = "The cafe near the station serves excellent hand-drip coffee.";
        let result = check_plagiarism(text, &[source("s1", text)]);
        assert_eq!(result.similarity_score, 100);
        assert!(!result.passed);
        assert_eq!(result.compared_source_ids, vec!["s1".to_string()]);
    }

    #[test]
    fn test_disjoint_text_scores_zero() {
        let result = check_plagiarism(
            "aaaa bbbb cccc dddd",
            &[source("s1", "xxxx yyyy zzzz wwww")],
        );
        assert_eq!(result.similarity_score, 0);
        assert!(result.passed);
        assert!(result.compared_source_ids.is_empty());
    }

    #[test]
    fn test_short_text_always_passes() {
        // Fewer than 3 characters -> empty trigram vector -> 0 everywhere.
        let result = check_plagiarism("ab", &[source("s1", "ab ab ab ab ab ab ab")]);
        assert_eq!(result.similarity_score, 0);
        assert!(result.passed);
    }

    #[test]
    fn test_normalization_collapses_whitespace_and_case() {
        let result = check_plagiarism(
            "Seoul   Forest\tPark\n\nreview",
            &[source("s1", "seoul forest park review")],
        );
        assert_eq!(result.similarity_score, 100);
    }

    #[test]
    fn test_max_not_average() {
        let text = "the quiet bakery on the corner sells sourdough every morning";
        let sources = vec![
            source("high", "the quiet bakery on the corner sells sourdough every morning"),
            source("mid", "a quiet bakery on a corner that sells bread most mornings"),
            source("low", "zzz qqq vvv kkk jjj www"),
        ];
        let result = check_plagiarism(text, &sources);
        assert_eq!(result.similarity_score, 100);
        assert!(result.compared_source_ids.contains(&"high".to_string()));
        assert!(result.compared_source_ids.contains(&"mid".to_string()));
        assert!(!result.compared_source_ids.contains(&"low".to_string()));
    }

    #[test]
    fn test_pass_threshold_is_strict() {
        // Hand-built vectors hitting exactly 0.7: dot = 49, |a| = 7,
        // |b| = 10 -> 49 / 70 = 0.7 -> 70%, which must fail.
        let mut a = HashMap::new();
        a.insert("aaa".to_string(), 7u32);
        let mut b = HashMap::new();
        b.insert("aaa".to_string(), 7u32);
        b.insert("bbb".to_string(), 5u32);
        b.insert("ccc".to_string(), 5u32);
        b.insert("ddd".to_string(), 1u32);

        let pct = to_percent(cosine_similarity(&a, &b));
        assert_eq!(pct, 70);
        assert!(!(pct < PASS_THRESHOLD), "exactly 70 must not pass");
        assert!(69 < PASS_THRESHOLD, "69 must pass");
    }

    #[test]
    fn test_compared_threshold_excludes_boundary() {
        // Vectors hitting exactly 0.1: dot = 1, |a| = 1, |b| = 10.
        // A 10% match is not listed; only strictly greater similarities are.
        let mut a = HashMap::new();
        a.insert("aaa".to_string(), 1u32);
        let mut b = HashMap::new();
        b.insert("aaa".to_string(), 1u32);
        b.insert("bbb".to_string(), 7u32);
        b.insert("ccc".to_string(), 7u32);
        b.insert("ddd".to_string(), 1u32);

        let pct = to_percent(cosine_similarity(&a, &b));
        assert_eq!(pct, 10);
        assert!(!(pct > COMPARED_THRESHOLD), "exactly 10 is excluded");
    }
}
