//! Textual relevance scoring

/// Tokenize text into lowercase alphanumeric terms
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Fraction of query tokens present in the candidate text
///
/// Returns 0.0 for an empty query.
pub fn lexical_overlap_score(query: &str, text: &str) -> f64 {
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() {
        return 0.0;
    }

    let text_tokens = tokenize(text);

    let mut hits = 0usize;
    for token in &query_tokens {
        if text_tokens.iter().any(|candidate| candidate == token) {
            hits += 1;
        }
    }
    hits as f64 / query_tokens.len() as f64
}
