//! Token-overlap scoring used to pair tables and folders by name.

use std::collections::HashSet;

/// A reference token set that candidates are scored against.
///
/// Comparison is case-insensitive. A candidate's score is the number of its
/// tokens found in the reference set, so a repeated token counts once per
/// occurrence.
#[derive(Debug, Clone, Default)]
pub struct TokenMatcher {
    tokens: HashSet<String>,
}

impl TokenMatcher {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Build from a delimited name, e.g. a dotted package.
    pub fn from_split(text: &str, separator: char) -> Self {
        Self::new(text.split(separator))
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn score<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> usize {
        tokens
            .into_iter()
            .filter(|t| self.tokens.contains(&t.to_lowercase()))
            .count()
    }

    /// The candidate whose tokens score highest against this matcher.
    pub fn best<T, F>(&self, candidates: impl IntoIterator<Item = T>, tokenize: F) -> Option<T>
    where
        F: Fn(&T) -> Vec<String>,
    {
        highest_scoring(candidates, |candidate| {
            let tokens = tokenize(candidate);
            self.score(tokens.iter().map(String::as_str))
        })
    }
}

/// The candidate with the highest score.
///
/// Candidates are visited in order and only a strictly greater score
/// replaces the current pick, so ties (zero included) go to the first.
pub fn highest_scoring<T>(
    candidates: impl IntoIterator<Item = T>,
    score: impl Fn(&T) -> usize,
) -> Option<T> {
    let mut best: Option<(usize, T)> = None;
    for candidate in candidates {
        let value = score(&candidate);
        if best.as_ref().is_none_or(|(max, _)| value > *max) {
            best = Some((value, candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
}
