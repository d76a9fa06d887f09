//! Minimal glob matching for entry names

/// Match `text` against a pattern with `*` (any run) and `?` (one char).
/// Literal characters compare ASCII case-insensitively.
pub fn matches_glob(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // last `*` seen and the text position it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some('?') => {
                p += 1;
                t += 1;
            }
            Some(c) if c.eq_ignore_ascii_case(&text[t]) => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    t = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_and_case() {
        assert!(matches_glob("config.blk", "CONFIG.BLK"));
        assert!(!matches_glob("config.blk", "config.blkx"));
    }

    #[test]
    fn test_wildcards() {
        assert!(matches_glob("*.blk", "a.blk"));
        assert!(matches_glob("*", ""));
        assert!(matches_glob("a*b*c", "axxbyyc"));
        assert!(matches_glob("a?c", "abc"));
        assert!(!matches_glob("a?c", "ac"));
        assert!(!matches_glob("*.blk", "a.blk.bak"));
        assert!(matches_glob("levels/*/*.bin", "levels/x/map.bin"));
    }
}
