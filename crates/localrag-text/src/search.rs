use localrag_core::types::{Passage, SearchResult, SourceKind};

pub const EXACT_MATCH_SCORE: f32 = 1.0;
pub const PARTIAL_MATCH_SCORE: f32 = 0.5;

/// Scores one passage against a lower-cased question.
///
/// The whole question as a substring scores [`EXACT_MATCH_SCORE`]; any
/// whitespace-separated token as a substring scores [`PARTIAL_MATCH_SCORE`];
/// anything else is `None`. No stemming, no stop words.
pub fn keyword_score(question_lower: &str, content_lower: &str) -> Option<f32> {
    if content_lower.contains(question_lower) {
        Some(EXACT_MATCH_SCORE)
    } else if question_lower.split_whitespace().any(|word| content_lower.contains(word)) {
        Some(PARTIAL_MATCH_SCORE)
    } else {
        None
    }
}

/// Ranks passages by [`keyword_score`], best first, keeping at most `k`.
/// Passages with equal scores keep their input order.
/// A blank question matches nothing, although every text contains the empty string.
pub fn keyword_search<'a, I>(passages: I, question: &str, k: usize) -> Vec<SearchResult>
where
    I: IntoIterator<Item = (&'a Passage, &'a str)>,
{
    if k == 0 || question.trim().is_empty() {
        return Vec::new();
    }
    let question_lower = question.to_lowercase();
    let mut results: Vec<SearchResult> = passages
        .into_iter()
        .filter_map(|(passage, content_lower)| {
            keyword_score(&question_lower, content_lower)
                .map(|score| SearchResult { passage: passage.clone(), score, origin: SourceKind::Lexical })
        })
        .collect();
    tracing::debug!(question, matches = results.len(), "keyword search");
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(k);
    results
}
