use scraper::ElementRef;

pub fn extract_text(node: ElementRef) -> String {
    node.text().collect::<String>()
}

/// Trim and collapse every run of whitespace (newlines, nbsp included) into a
/// single space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn extract_normalized_text(node: ElementRef) -> String {
    normalize_whitespace(&extract_text(node))
}

pub fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

/// The section code is the last path segment of a profile link, e.g.
/// `https://course-profiles.uq.edu.au/course-profiles/CSSE2002-20512-7620`.
pub fn section_code_from_href(href: &str) -> Option<&str> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.rsplit('/')
        .next()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_inner_whitespace() {
        assert_eq!(normalize_whitespace("  Report\n  1 "), "Report 1");
        assert_eq!(normalize_whitespace("Week\u{a0}\u{a0}6\t Friday"), "Week 6 Friday");
        assert_eq!(normalize_whitespace(" \n "), "");
    }

    #[test]
    fn section_code_is_last_segment() {
        assert_eq!(
            section_code_from_href("https://course-profiles.uq.edu.au/course-profiles/CSSE2002-20512-7620"),
            Some("CSSE2002-20512-7620")
        );
        assert_eq!(
            section_code_from_href("https://archive.course-profiles.uq.edu.au/profile?id=1#x"),
            Some("profile")
        );
        assert_eq!(section_code_from_href("/course-profiles/118735"), Some("118735"));
        assert_eq!(section_code_from_href("118735"), Some("118735"));
    }

    #[test]
    fn section_code_missing() {
        assert_eq!(section_code_from_href("https://example.com/profiles/"), None);
        assert_eq!(section_code_from_href(""), None);
    }
}
