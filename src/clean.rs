use std::sync::OnceLock;

use regex::Regex;

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn split_clock_time() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d)\s*:\s*(\d)").unwrap())
}

/// Clean rendered page text before it is embedded in the extraction prompt.
///
/// Rendering engines produce irregular whitespace and sometimes break a
/// clock time across lines ("6\n:30\npm"). Applied in order:
/// 1. collapse whitespace runs (including newlines) to single spaces
/// 2. insert a space after any comma that lacks one
/// 3. rejoin digit:digit sequences split by stray whitespace
///
/// Idempotent; empty input yields empty output.
pub fn clean_text(raw: &str) -> String {
    let collapsed = whitespace_runs().replace_all(raw, " ");
    // Insert after every comma unconditionally, then re-collapse the doubled
    // spaces. A conditional insert would skip the second of two adjacent
    // commas and break idempotence.
    let comma_spaced = collapsed.replace(',', ", ");
    let spaced = whitespace_runs().replace_all(&comma_spaced, " ");
    split_clock_time()
        .replace_all(&spaced, "$1:$2")
        .trim()
        .to_string()
}
