//! Redaction of card numbers in free-form diagnostic text.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Replaces the middle digits of a masked run.
pub const MASK_TOKEN: &str = "****";

// 6 + at least 3 + 4 ASCII digits: the shortest card numbers are 13 long.
// `\d` would also match other scripts' digits.
static CARD_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{6})[0-9]{3,}([0-9]{4})").expect("card number pattern is valid")
});

/// Masks every card-number-like digit run, keeping the first 6 and last 4
/// digits. Anything else in `text` is returned untouched.
pub fn mask_card_numbers(text: &str) -> Cow<'_, str> {
    CARD_NUMBER_REGEX.replace_all(text, format!("${{1}}{MASK_TOKEN}${{2}}").as_str())
}
