//! Engineering size labels: parsing, ordering and display.
//!
//! Labels are free text written by catalog editors: `1/2"`, `1 1/4`,
//! `1.1/2`, `2`, `DN50`, `1" x 1/2"`. They are ordered by the numeric value
//! of the first recognizable quantity; labels with no digits at all are
//! unorderable and always sort after every orderable label.

use std::cmp::Ordering;

/// Parse a size label into a comparable number of inches (or nominal units).
///
/// Returns `None` when the label carries no number at all. A branch whose
/// denominator is zero is skipped and parsing continues with the next rule,
/// so `"1/0"` falls back to the first embedded number.
pub fn parse_size(label: &str) -> Option<f64> {
    let raw: String = label.chars().filter(|c| !is_inch_mark(*c)).collect();
    let raw = raw.trim();

    if raw.is_empty() {
        return None;
    }

    mixed_number(raw)
        .or_else(|| fraction(raw))
        .or_else(|| plain_number(raw))
        .or_else(|| first_number(raw))
        .filter(|v| !v.is_nan())
}

/// Compare two labels by parsed size; unorderable labels compare greater.
pub fn compare_sizes(a: &str, b: &str) -> Ordering {
    match (parse_size(a), parse_size(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Return the labels in ascending size order.
///
/// The sort is stable: equal sizes and unorderable labels keep their input
/// order.
pub fn sort_sizes<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let mut sorted: Vec<String> = labels.iter().map(|s| s.as_ref().to_string()).collect();
    sorted.sort_by(|a, b| compare_sizes(a, b));
    sorted
}

/// Stable in-place sort of arbitrary items by a size label they carry.
pub fn sort_by_size<T, F>(items: &mut [T], label: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| compare_sizes(label(a), label(b)));
}

/// The first label of the ascending order, if any.
pub fn smallest_size<'a, I>(labels: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    // min_by keeps the first of equal elements, matching the stable sort.
    labels.into_iter().min_by(|a, b| compare_sizes(a, b))
}

/// Display form of a label: append an inch mark unless one is present.
pub fn format_size(label: &str) -> String {
    if label.chars().any(is_inch_mark) {
        label.to_string()
    } else {
        format!("{}\"", label)
    }
}

fn is_inch_mark(c: char) -> bool {
    c == '"' || c == '\u{2033}'
}

/// `<int><sep>+<int>/<int>` where sep is whitespace or `.`.
fn mixed_number(raw: &str) -> Option<f64> {
    let (whole, rest) = split_digits(raw)?;
    let after_sep = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '.');
    if after_sep.len() == rest.len() {
        return None;
    }
    let fraction = fraction(after_sep)?;
    Some(number(whole)? + fraction)
}

/// `<int>/<int>`, rejecting a zero denominator.
fn fraction(raw: &str) -> Option<f64> {
    let (num, rest) = split_digits(raw)?;
    let rest = rest.strip_prefix('/')?;
    let (den, tail) = split_digits(rest)?;
    if !tail.is_empty() {
        return None;
    }
    let den = number(den)?;
    if den == 0.0 {
        return None;
    }
    Some(number(num)? / den)
}

/// `<int>` or `<int>.<int>` spanning the whole label.
fn plain_number(raw: &str) -> Option<f64> {
    let (literal, tail) = leading_decimal(raw)?;
    if tail.is_empty() {
        number(literal)
    } else {
        None
    }
}

/// The first `<int>` or `<int>.<int>` anywhere in the label.
fn first_number(raw: &str) -> Option<f64> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let (literal, _) = leading_decimal(&raw[start..])?;
    number(literal)
}

/// Split a non-empty run of leading ASCII digits off `s`.
fn split_digits(s: &str) -> Option<(&str, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        None
    } else {
        Some(s.split_at(end))
    }
}

/// Split a leading `<int>` or `<int>.<int>` literal off `s`.
fn leading_decimal(s: &str) -> Option<(&str, &str)> {
    let (int, rest) = split_digits(s)?;
    let len = match rest.strip_prefix('.').and_then(split_digits) {
        Some((frac, _)) => int.len() + 1 + frac.len(),
        None => int.len(),
    };
    Some(s.split_at(len))
}

fn number(literal: &str) -> Option<f64> {
    literal.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fractions_and_mixed_numbers() {
        assert_eq!(parse_size("1/2"), Some(0.5));
        assert_eq!(parse_size("3/4"), Some(0.75));
        assert_eq!(parse_size("1 1/4"), Some(1.25));
        assert_eq!(parse_size("1.1/2"), Some(1.5));
        assert_eq!(parse_size("2"), Some(2.0));
        assert_eq!(parse_size("2.5"), Some(2.5));
    }

    #[test]
    fn test_parse_strips_inch_marks_and_whitespace() {
        assert_eq!(parse_size("  1/2\" "), Some(0.5));
        assert_eq!(parse_size("2\""), Some(2.0));
        assert_eq!(parse_size("1  1/2\u{2033}"), Some(1.5));
    }

    #[test]
    fn test_parse_embedded_number() {
        assert_eq!(parse_size("DN50"), Some(50.0));
        assert_eq!(parse_size("1\" x 1/2\""), Some(1.0));
        assert_eq!(parse_size("PN 2.5 bar"), Some(2.5));
    }

    #[test]
    fn test_parse_unorderable() {
        assert_eq!(parse_size("abc"), None);
        assert_eq!(parse_size(""), None);
        assert_eq!(parse_size("\"\""), None);
    }

    #[test]
    fn test_zero_denominator_falls_through() {
        assert_eq!(parse_size("1/0"), Some(1.0));
        assert_eq!(parse_size("2 3/0"), Some(2.0));
        assert_eq!(parse_size("0/0"), Some(0.0));
    }

    #[test]
    fn test_sort_sizes() {
        let sorted = sort_sizes(&["2", "1/2", "1", "3/4", "1 1/4"]);
        assert_eq!(sorted, vec!["1/2", "3/4", "1", "1 1/4", "2"]);
    }

    #[test]
    fn test_sort_pushes_unorderable_last_in_input_order() {
        let sorted = sort_sizes(&["zeta", "2", "alpha", "1/2", "beta"]);
        assert_eq!(sorted, vec!["1/2", "2", "zeta", "alpha", "beta"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_values() {
        let sorted = sort_sizes(&["1\"", "1/2", "1", "DN1"]);
        assert_eq!(sorted, vec!["1/2", "1\"", "1", "DN1"]);
    }

    #[test]
    fn test_sort_by_size_on_structs() {
        let mut items = vec![("b", "2\""), ("a", "1/2\""), ("c", "1\"")];
        sort_by_size(&mut items, |item| item.1);
        let names: Vec<&str> = items.iter().map(|i| i.0).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_smallest_size() {
        assert_eq!(smallest_size(["2", "1/2", "1"]), Some("1/2"));
        assert_eq!(smallest_size(["x", "y"]), Some("x"));
        assert_eq!(smallest_size(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size("1/2"), "1/2\"");
        assert_eq!(format_size("1/2\""), "1/2\"");
        assert_eq!(format_size(&format_size("DN50")), format_size("DN50"));
    }
}
