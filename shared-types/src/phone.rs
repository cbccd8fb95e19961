/// Reduce a phone number to its digits, keeping a plus sign only when it leads.
///
/// `"+1 (555) 123-4567"` becomes `"+15551234567"`. Everything other than ASCII digits is
/// dropped, including pluses that appear after the first kept character.
pub fn normalize_number(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());

    for c in raw.chars() {
        if c.is_ascii_digit() {
            normalized.push(c);
        } else if c == '+' && normalized.is_empty() {
            normalized.push(c);
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_formatting() {
        assert_eq!(normalize_number("+1 (555) 123-4567"), "+15551234567");
        assert_eq!(normalize_number("5551234567"), "5551234567");
        assert_eq!(normalize_number("555.123.4567"), "5551234567");
    }

    #[test]
    fn test_plus_only_when_leading() {
        assert_eq!(normalize_number("  +44 20 7946 0958"), "+442079460958");
        assert_eq!(normalize_number("12+34"), "1234");
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(normalize_number("Unknown"), "");
        assert_eq!(normalize_number(""), "");
        assert_eq!(normalize_number("+"), "+");
    }
}
