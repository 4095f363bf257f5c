//! Compiled-once patterns for sensitive-value heuristics.
//!
//! These only run on strings longer than [`PATTERN_MIN_LEN`]; shorter
//! strings are never pattern-matched. That is a cost-control heuristic,
//! not a correctness guarantee: short secrets are an accepted
//! false-negative unless caught by field name.

use once_cell::sync::Lazy;
use regex::Regex;

/// Strings at or under this length skip value-pattern matching.
pub const PATTERN_MIN_LEN: usize = 100;

/// Whole string looks like standard base64 payload data.
pub static BASE64_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/]{96,}={0,2}$").expect("base64 pattern"));

/// Whole string looks like URL-safe base64 (no padding alphabet).
pub static BASE64_URL_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{96,}$").expect("base64url pattern"));

/// Credit-card-like digit run (13–19 digits, optional space/dash groups).
pub static CARD_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:\d[ -]?){12,18}\d\b").expect("card pattern"));

/// SSN-like digit group.
pub static SSN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("ssn pattern"));

/// Email address.
pub static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email pattern")
});
