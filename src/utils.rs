use chrono::Utc;

/// Current Unix time in seconds. Token expiry bookkeeping is done in whole
/// seconds against this clock.
pub fn epoch() -> u64 {
    Utc::now().timestamp() as u64
}

/// Scans a flattened response-header block for a `Retry-After` line and
/// returns the advertised delay in seconds.
///
/// Header names are matched case-insensitively since HTTP clients may
/// lowercase them. A missing header or a non-numeric value yields 0, which
/// callers treat as "no suppression".
pub fn extract_retry_after(headers: &str) -> u64 {
    for line in headers.lines() {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("retry-after") {
            return value.trim().parse::<u64>().unwrap_or(0);
        }
    }
    0
}

/// Splits a `YYYY[-MM[-DD]]` release date into its numeric components,
/// assigned strictly by position. An empty string leaves all three unset;
/// a component that fails to parse as a number is left unset as well.
pub fn split_release_date(date: &str) -> (Option<u32>, Option<u32>, Option<u32>) {
    if date.is_empty() {
        return (None, None, None);
    }

    let mut parts = date.split('-');
    let year = parts.next().and_then(|p| p.parse().ok());
    let month = parts.next().and_then(|p| p.parse().ok());
    let day = parts.next().and_then(|p| p.parse().ok());
    (year, month, day)
}
