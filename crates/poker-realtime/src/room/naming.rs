//! Display-name and room-name normalization.

/// Room name used when a create request carries a blank one.
pub const DEFAULT_ROOM_NAME: &str = "Planning Room";

/// Trims a raw name, substitutes `fallback` when nothing usable is left,
/// and keeps at most `max_chars` characters.
pub fn sanitize_name(raw: Option<&str>, max_chars: usize, fallback: &str) -> String {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    let source = if trimmed.is_empty() { fallback } else { trimmed };
    let truncated: String = source.chars().take(max_chars.max(1)).collect();
    let name = truncated.trim_end();
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}

/// Returns `base`, or `"{base} - N"` with the smallest N ≥ 2 not yet taken.
pub fn dedupe_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut counter = 2u32;
    loop {
        let candidate = format!("{base} - {counter}");
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
