/// Trims a raw tag value; empty or whitespace-only values become `None`.
pub fn sanitize(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::absent(None, None)]
    #[case::empty(Some(""), None)]
    #[case::spaces(Some("   "), None)]
    #[case::mixed_whitespace(Some(" \t\r\n "), None)]
    #[case::untouched(Some("Blue Train"), Some("Blue Train"))]
    #[case::padded(Some("  Blue Train \n"), Some("Blue Train"))]
    #[case::inner_space_kept(Some(" a  b "), Some("a  b"))]
    fn test_sanitize(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(
            sanitize(raw.map(str::to_string)),
            expected.map(str::to_string)
        );
    }
}
