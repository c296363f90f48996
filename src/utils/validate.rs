use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("Invalid numeric input regex"));

/// Whether a score input box should accept `text`: digits only, no sign,
/// no decimal point.
pub fn is_numeric_input(text: &str) -> bool {
    NUMERIC_RE.is_match(text)
}
