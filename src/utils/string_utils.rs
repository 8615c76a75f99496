/// String utility functions
pub struct StringUtils;

impl StringUtils {
    /// Trim and collapse internal whitespace runs to single spaces
    pub fn normalize(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Check if string is empty or whitespace only
    pub fn is_blank(s: &str) -> bool {
        s.trim().is_empty()
    }

    /// Length in characters, not bytes
    pub fn char_len(s: &str) -> usize {
        s.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(StringUtils::normalize("  Senior\n   Pricing\tActuary "), "Senior Pricing Actuary");
        assert_eq!(StringUtils::normalize(" \n "), "");
        assert!(StringUtils::is_blank("\t"));
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(StringUtils::char_len("Zürich"), 6);
    }
}
