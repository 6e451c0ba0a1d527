use std::{borrow::Cow, sync::OnceLock};

use regex::Regex;

pub fn remove_excess_whitespace<'a>(s: &'a str) -> Cow<'a, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\s\s+").expect("regex should be valid"));
    let out: Cow<'a, str> = Regex::replace_all(re, s.trim(), " ");
    out
}

/// Removes every whitespace character, including the non-breaking spaces the hours page pads times with.
pub fn remove_all_whitespace(s: &str) -> Cow<'_, str> {
    if s.chars().any(char::is_whitespace) {
        Cow::Owned(s.chars().filter(|c| !c.is_whitespace()).collect())
    } else {
        Cow::Borrowed(s)
    }
}
