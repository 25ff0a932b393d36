/// The extraction rules and output schema sent to the model.
///
/// Loaded from `prompt.txt` at compile time with `include_str!` so the
/// rules can be edited without dealing with Rust string syntax. The jummah
/// rules live here, not in the normalizer: jummah slot assignment is done
/// by the model under these instructions and is not re-validated locally.
pub const EXTRACTION_PROMPT: &str = include_str!("prompt.txt");

/// Build the complete instruction string for one page.
///
/// Deterministic: the same cleaned text always produces the same prompt.
pub fn build_extraction_prompt(page_text: &str) -> String {
    format!("{}\n\nPage text:\n\n{}", EXTRACTION_PROMPT, page_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_embedded() {
        assert!(!EXTRACTION_PROMPT.is_empty());
        assert!(EXTRACTION_PROMPT.contains("JSON object"));
        assert!(EXTRACTION_PROMPT.contains("verbatim"));
    }

    #[test]
    fn test_prompt_names_all_fields() {
        for prayer in ["fajr", "zuhr", "asr", "maghrib", "isha"] {
            assert!(EXTRACTION_PROMPT.contains(&format!("{prayer}_start")));
            assert!(EXTRACTION_PROMPT.contains(&format!("{prayer}_iqamah")));
        }
        for slot in 1..=3 {
            assert!(EXTRACTION_PROMPT.contains(&format!("jummah{slot}_start")));
            assert!(EXTRACTION_PROMPT.contains(&format!("jummah{slot}_iqamah")));
        }
    }

    #[test]
    fn test_prompt_contains_aliasing_and_jummah_rules() {
        assert!(EXTRACTION_PROMPT.contains("Khutbah"));
        assert!(EXTRACTION_PROMPT.contains("Salah"));
        assert!(EXTRACTION_PROMPT.contains("12:00 PM"));
        assert!(EXTRACTION_PROMPT.contains("5:00 PM"));
    }

    #[test]
    fn test_build_prompt_embeds_page_text() {
        let prompt = build_extraction_prompt("Fajr 5:30 AM");
        assert!(prompt.starts_with(EXTRACTION_PROMPT));
        assert!(prompt.ends_with("Fajr 5:30 AM"));
    }
}
