use regex::Regex;

lazy_static::lazy_static! {
    /// Optional single space, `(`, one or more ASCII digits, `)`.
    static ref MARKER: Regex = Regex::new(r" ?\([0-9]+\)").unwrap();
}

/// Strip every disambiguation marker (`" (1)"`, `"(23)"`, ...) from `name`.
///
/// All occurrences are removed wherever they appear, and every other character
/// is left untouched. Removing a nested marker can expose a new one
/// (`"((1)2)"` becomes `"(2)"`), so replacement repeats until none is left;
/// this keeps `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(name: &str) -> String {
    let mut current = MARKER.replace_all(name, "").into_owned();
    while MARKER.is_match(&current) {
        current = MARKER.replace_all(&current, "").into_owned();
    }
    current
}

/// True when `name` still carries at least one disambiguation marker.
pub fn is_marked(name: &str) -> bool {
    MARKER.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_all_markers() {
        assert_eq!(normalize("a (1) (2).jpg"), "a.jpg");
        assert_eq!(normalize("photo (1).jpg"), "photo.jpg");
        assert_eq!(normalize("photo(12).jpg"), "photo.jpg");
        assert_eq!(normalize("(3)report.pdf"), "report.pdf");
        assert_eq!(normalize("clip (7).mp4.xmp"), "clip.mp4.xmp");
    }

    #[test]
    fn test_leaves_non_markers_alone() {
        assert_eq!(normalize("plain.jpg"), "plain.jpg");
        assert_eq!(normalize("a (x).jpg"), "a (x).jpg");
        assert_eq!(normalize("a ().jpg"), "a ().jpg");
        assert_eq!(normalize("a  (1).jpg"), "a .jpg");
        // Only ASCII digits count; Arabic-Indic digits are not a marker.
        assert_eq!(normalize("a (\u{0661}).jpg"), "a (\u{0661}).jpg");
    }

    #[test]
    fn test_idempotent() {
        for name in [
            "a (1) (2).jpg",
            "a ((1)).jpg",
            "a ((1)2).jpg",
            "a ( (1)1).jpg",
            "a (1)(2)(3)",
            "x (1)y (22).png",
            "",
            "no markers",
        ] {
            let once = normalize(name);
            assert_eq!(normalize(&once), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn test_nested_marker_exposed_by_removal() {
        assert_eq!(normalize("a ((1)2).jpg"), "a.jpg");
    }

    #[test]
    fn test_is_marked() {
        assert!(is_marked("a (1).jpg"));
        assert!(!is_marked("a.jpg"));
        assert!(!is_marked("a (b).jpg"));
    }
}
