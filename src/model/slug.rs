//! Slug Derivation
//!
//! Organizations and blog posts get URL slugs derived from their names
//! when none is supplied explicitly.

/// Lowercase, alphanumerics kept, everything else collapsed into single
/// hyphens, no leading or trailing hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Delhi Public School"), "delhi-public-school");
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("St. Mary's  High!"), "st-mary-s-high");
        assert_eq!(slugify("--Edge--Case--"), "edge-case");
    }

    #[test]
    fn test_slugify_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
