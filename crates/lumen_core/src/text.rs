//! Line tokenizing shared by the config and scene readers.
//!
//! Both formats are line oriented: blank lines and `#` comments are skipped,
//! every other line is a key (or entity tag) followed by whitespace separated
//! values.

use std::str::SplitWhitespace;

use lumen_math::Vec3;

/// Iterate over the meaningful lines of a file, with 1-based line numbers.
pub(crate) fn content_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Split a trimmed line into a lowercase key and the remaining values.
///
/// The key ends at the first `:` (or `=` when `allow_equals` is set), or at
/// the first whitespace otherwise. Trailing colons on the key are dropped.
pub(crate) fn split_key(line: &str, allow_equals: bool) -> (String, &str) {
    let separator = line
        .find(':')
        .or_else(|| if allow_equals { line.find('=') } else { None });

    let (key, rest) = match separator {
        Some(pos) => (&line[..pos], &line[pos + 1..]),
        None => match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], &line[pos..]),
            None => (line, ""),
        },
    };

    let key = key.trim().trim_end_matches(':').trim().to_ascii_lowercase();
    (key, rest.trim())
}

/// Whitespace separated value reader.
pub(crate) struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(values: &'a str) -> Self {
        Self {
            inner: values.split_whitespace(),
        }
    }

    /// Next raw token.
    pub(crate) fn word(&mut self) -> Option<&'a str> {
        self.inner.next()
    }

    /// Next finite number. `nan` and `inf` are rejected.
    pub(crate) fn f64(&mut self) -> Option<f64> {
        self.inner.next()?.parse().ok().filter(|x: &f64| x.is_finite())
    }

    pub(crate) fn i32(&mut self) -> Option<i32> {
        self.inner.next()?.parse().ok()
    }

    pub(crate) fn vec3(&mut self) -> Option<Vec3> {
        Some(Vec3::new(self.f64()?, self.f64()?, self.f64()?))
    }

    /// Everything not consumed yet, joined by single spaces.
    pub(crate) fn rest(&mut self) -> String {
        self.inner.by_ref().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_lines_skips_comments() {
        let lines: Vec<_> = content_lines("# header\n\n  a: 1\n   # x\nb 2\n").collect();
        assert_eq!(lines, vec![(3, "a: 1"), (5, "b 2")]);
    }

    #[test]
    fn test_split_key_forms() {
        assert_eq!(split_key("Image_Width: 800", true), ("image_width".to_string(), "800"));
        assert_eq!(split_key("gamma = 2.2", true), ("gamma".to_string(), "2.2"));
        assert_eq!(split_key("max_depth 5", true), ("max_depth".to_string(), "5"));
        assert_eq!(split_key("sphere", false), ("sphere".to_string(), ""));
    }

    #[test]
    fn test_split_key_ignores_equals_when_disabled() {
        let (key, rest) = split_key("matte a=b 1 1 1", false);
        assert_eq!(key, "matte");
        assert_eq!(rest, "a=b 1 1 1");
    }

    #[test]
    fn test_tokens() {
        let mut tokens = Tokens::new("1 2.5 -3 4 5 6 name tail end");
        assert_eq!(tokens.i32(), Some(1));
        assert_eq!(tokens.f64(), Some(2.5));
        assert_eq!(tokens.vec3(), Some(Vec3::new(-3.0, 4.0, 5.0)));
        assert_eq!(tokens.i32(), Some(6));
        assert_eq!(tokens.word(), Some("name"));
        assert_eq!(tokens.rest(), "tail end");
        assert_eq!(tokens.rest(), "");
    }

    #[test]
    fn test_tokens_invalid_number() {
        let mut tokens = Tokens::new("abc 1.5");
        assert_eq!(tokens.f64(), None);
        assert_eq!(Tokens::new("1.5").i32(), None);
    }

    #[test]
    fn test_tokens_reject_non_finite() {
        for text in ["nan", "NaN", "inf", "-inf", "infinity"] {
            assert_eq!(Tokens::new(text).f64(), None, "{text}");
        }
        assert_eq!(Tokens::new("1 inf 2").vec3(), None);
    }
}
