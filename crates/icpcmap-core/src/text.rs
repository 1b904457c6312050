//! Text normalization and similarity helpers

use std::collections::HashMap;

/// Lowercase and trim a keyword or term before comparison.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Bigram (Sorensen-Dice) similarity in `[0, 1]`, whitespace ignored.
///
/// Bigrams and lengths are counted in characters, not bytes, so `æøå` weigh
/// the same as ASCII letters. Repeated bigrams are matched at most as often
/// as they occur in both strings.
///
/// Identical strings score 1.0; strings shorter than two characters score 0.0
/// unless identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_default() += 1;
    }

    let mut shared = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1]))
            && *count > 0
        {
            *count -= 1;
            shared += 1;
        }
    }

    (2 * shared) as f64 / (a.len() + b.len() - 2) as f64
}
