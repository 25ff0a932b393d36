use chrono::NaiveTime;

/// Parse a 12-hour clock string ("5:30 AM") into a time of day.
///
/// Absence markers (missing, empty, "null", "none") and anything that does
/// not parse both map to None. Model output is unreliable, so parse
/// failures are swallowed rather than propagated; every consumer of a time
/// field must tolerate absence anyway.
pub fn parse_time(raw: Option<&str>) -> Option<NaiveTime> {
    let trimmed = raw?.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
    {
        return None;
    }

    NaiveTime::parse_from_str(&trimmed.to_uppercase(), "%I:%M %p").ok()
}

/// Repair a (start, iqamah) pair for one daily prayer.
///
/// The model sometimes mislabels which slot holds which time. Physically
/// the adhan precedes the iqamah, and a site listing a single time for a
/// prayer is listing the iqamah. So:
/// - both parse and start is not strictly earlier: swap the raw strings
/// - only start parses: move it to the iqamah slot
/// - otherwise: leave the pair as-is
///
/// Operates on the raw strings; the verbatim text is preserved through any
/// reordering.
pub fn normalize_pair(
    start: Option<String>,
    iqamah: Option<String>,
) -> (Option<String>, Option<String>) {
    let parsed_start = parse_time(start.as_deref());
    let parsed_iqamah = parse_time(iqamah.as_deref());

    match (parsed_start, parsed_iqamah) {
        (Some(s), Some(i)) if s >= i => (iqamah, start),
        (Some(_), None) => (None, start),
        _ => (start, iqamah),
    }
}
