//! URL slug derivation for event titles.

/// Derives a URL-safe slug from an event title.
///
/// The title is lowercased and trimmed, every character other than ASCII
/// word characters (`[a-z0-9_]`), whitespace and `-` is dropped, each run
/// of whitespace and hyphens becomes a single `-`, and leading/trailing
/// hyphens are removed.
///
/// An empty or all-punctuation title yields an empty slug; callers enforce
/// non-empty titles separately.
///
/// ```
/// use devevents_gateway::domain::slug::generate_slug;
///
/// assert_eq!(generate_slug("  RustConf 2026: Day #1  "), "rustconf-2026-day-1");
/// ```
#[must_use]
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for c in lowered.trim().chars() {
        if c.is_whitespace() || c == '-' {
            pending_separator = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(generate_slug("Hello World"), "hello-world");
    }

    #[test]
    fn strips_special_characters() {
        assert_eq!(generate_slug("Rust & WebAssembly: Live!"), "rust-webassembly-live");
        assert_eq!(generate_slug("C++ Meetup"), "c-meetup");
    }

    #[test]
    fn collapses_whitespace_and_hyphen_runs() {
        assert_eq!(generate_slug("a   -  b"), "a-b");
        assert_eq!(generate_slug("a---b"), "a-b");
        assert_eq!(generate_slug("tab\tand\nnewline"), "tab-and-newline");
    }

    #[test]
    fn strips_leading_and_trailing_hyphens() {
        assert_eq!(generate_slug("--edge case--"), "edge-case");
        assert_eq!(generate_slug("! leading bang"), "leading-bang");
    }

    #[test]
    fn keeps_underscores_and_digits() {
        assert_eq!(generate_slug("snake_case 101"), "snake_case-101");
    }

    #[test]
    fn drops_non_ascii_letters() {
        assert_eq!(generate_slug("Café Night"), "caf-night");
    }

    #[test]
    fn empty_and_punctuation_only_yield_empty() {
        assert_eq!(generate_slug(""), "");
        assert_eq!(generate_slug("   "), "");
        assert_eq!(generate_slug("?!*"), "");
    }

    #[test]
    fn is_idempotent() {
        let titles = [
            "Hello World",
            "  --Rust__Conf 2026!!  ",
            "Ünïcödé   Tïtle",
            "a - b - c",
            "already-a-slug",
            "",
            "___",
        ];
        for title in titles {
            let once = generate_slug(title);
            assert_eq!(generate_slug(&once), once, "title: {title:?}");
        }
    }
}
