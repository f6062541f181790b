//! Ant-style path patterns.
//!
//! Supported wildcards:
//!
//! - `?` matches exactly one character within a segment
//! - `*` matches zero or more characters within a segment
//! - `**` as a whole segment matches zero or more segments
//!
//! Patterns and paths are split on `/`; a pattern only matches a path with
//! the same leading separator (absolute against absolute, relative against
//! relative).

/// A parsed Ant pattern that can be matched against many paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntPattern {
    raw: String,
    absolute: bool,
    segments: Vec<String>,
}

impl AntPattern {
    /// Parse a pattern.
    pub fn new(pattern: &str) -> Self {
        Self {
            raw: pattern.to_string(),
            absolute: pattern.starts_with('/'),
            segments: split(pattern).map(str::to_string).collect(),
        }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if the pattern contains any wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.raw.contains(['*', '?'])
    }

    /// Check whether the whole path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        if self.absolute != path.starts_with('/') {
            return false;
        }
        let dirs: Vec<&str> = split(path).collect();
        let segments: Vec<&str> = self.segments.iter().map(String::as_str).collect();
        match_segments(&segments, &dirs)
    }
}

/// Match a path against a pattern without keeping the parsed form around.
pub fn ant_match(pattern: &str, path: &str) -> bool {
    AntPattern::new(pattern).matches(path)
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_segments(pattern: &[&str], dirs: &[&str]) -> bool {
    match pattern.split_first() {
        None => dirs.is_empty(),
        Some((&"**", rest)) => (0..=dirs.len()).any(|skip| match_segments(rest, &dirs[skip..])),
        Some((segment, rest)) => match dirs.split_first() {
            Some((dir, dirs_rest)) => match_segment(segment, dir) && match_segments(rest, dirs_rest),
            None => false,
        },
    }
}

fn match_segment(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();

    // Greedy star matching with a single backtrack point.
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((star_pi, star_ti)) = star {
            pi = star_pi + 1;
            ti = star_ti + 1;
            star = Some((star_pi, star_ti + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == '*')
}
