/// Decides whether a whole path matches a whole pattern.
///
/// The filter only ever talks to this capability, so a regular-expression or
/// full glob engine can stand in for [`Fnmatch`] without touching scanning or
/// diffing.
pub trait PatternMatcher {
    fn matches(&self, pattern: &str, path: &str) -> bool;
}

impl<F> PatternMatcher for F
where
    F: Fn(&str, &str) -> bool,
{
    fn matches(&self, pattern: &str, path: &str) -> bool {
        self(pattern, path)
    }
}

/// Minimal anchored glob matcher.
///
/// Supports `*` (any run of characters, `/` included), `?` (one character)
/// and bracket classes such as `[a-z]`, `[!.]` or `[^0-9]`. There is no escape
/// character and no `**` or brace syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fnmatch;

impl PatternMatcher for Fnmatch {
    fn matches(&self, pattern: &str, path: &str) -> bool {
        let pattern: Vec<char> = pattern.chars().collect();
        let text: Vec<char> = path.chars().collect();
        match_from(&pattern, &text)
    }
}

/// Iterative matcher keeping a single backtrack point: the text position the
/// most recent `*` would resume from. Runs in O(pattern × text).
fn match_from(pattern: &[char], text: &[char]) -> bool {
    let mut p = 0;
    let mut s = 0;
    let mut backtrack: Option<(usize, usize)> = None;

    while s < text.len() {
        let advanced = match pattern.get(p) {
            Some('*') => {
                p += 1;
                backtrack = Some((p, s));
                continue;
            }
            Some('?') => {
                p += 1;
                true
            }
            Some('[') => {
                let (class_matches, next) = match_class(pattern, p + 1, Some(text[s]));
                if class_matches {
                    p = next;
                }
                class_matches
            }
            Some(&literal) => {
                if literal == text[s] {
                    p += 1;
                }
                literal == text[s]
            }
            None => false,
        };

        if advanced {
            s += 1;
            continue;
        }

        // Let the last star swallow one more character and retry
        let Some((star_p, star_s)) = backtrack else {
            return false;
        };
        p = star_p;
        s = star_s + 1;
        backtrack = Some((star_p, s));
    }

    pattern[p..].iter().all(|&token| token == '*')
}

/// Evaluates the class starting right after `[` against `candidate` and
/// returns the verdict with the pattern index just past the closing `]`.
/// An unterminated class swallows the rest of the pattern.
fn match_class(pattern: &[char], start: usize, candidate: Option<char>) -> (bool, usize) {
    let mut p = start;
    let negate = matches!(pattern.get(p), Some('!' | '^'));
    if negate {
        p += 1;
    }

    let mut matched = false;
    let mut first = true;
    let mut range_start: Option<char> = None;

    while let Some(&c) = pattern.get(p) {
        if c == ']' {
            break;
        }

        let is_range = !first
            && c == '-'
            && pattern.get(p + 1).is_some_and(|&next| next != ']');
        if is_range {
            let range_end = pattern[p + 1];
            let low = range_start.unwrap_or('\0');
            if candidate.is_some_and(|ch| low <= ch && ch <= range_end) {
                matched = true;
            }
            range_start = None;
            p += 2;
        } else {
            if candidate == Some(c) {
                matched = true;
            }
            range_start = Some(c);
            first = false;
            p += 1;
        }
    }

    if pattern.get(p) == Some(&']') {
        p += 1;
    }

    (matched != negate, p)
}
