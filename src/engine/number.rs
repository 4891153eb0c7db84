//! Lenient text-to-number coercion shared by the filter and aggregate stages.
//!
//! Cell values are free text, so numbers are read the way a spreadsheet user
//! expects: leading whitespace is ignored and the longest numeric prefix wins
//! (`"12kg"` reads as `12.0`). Anything without a numeric prefix is `None`.

/// Parse the longest decimal prefix of `text` as an `f64`.
pub fn parse_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            Some(f64::NEG_INFINITY)
        } else {
            Some(f64::INFINITY)
        };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Numeric contribution of a cell: unparsable text counts as zero.
pub fn number_or_zero(text: &str) -> f64 {
    match parse_number(text) {
        Some(n) if !n.is_nan() => n,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("-3.5"), Some(-3.5));
        assert_eq!(parse_number("+7"), Some(7.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("5."), Some(5.0));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("0.021"), Some(0.021));
    }

    #[test]
    fn takes_longest_numeric_prefix() {
        assert_eq!(parse_number("  12kg"), Some(12.0));
        assert_eq!(parse_number("3.14.15"), Some(3.14));
        assert_eq!(parse_number("2e"), Some(2.0));
        assert_eq!(parse_number("2e+x"), Some(2.0));
        assert_eq!(parse_number("2024-01-08"), Some(2024.0));
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number("$10"), None);
    }

    #[test]
    fn infinity_is_recognised() {
        assert_eq!(parse_number("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn zero_fallback() {
        assert_eq!(number_or_zero("n/a"), 0.0);
        assert_eq!(number_or_zero("15200"), 15200.0);
    }
}
