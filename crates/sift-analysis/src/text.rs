/// At most `max` characters of `s`, cut on a char boundary.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Single-line rendering of free text for prompts, capped at `max` characters.
pub(crate) fn prompt_snippet(s: &str, max: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    let cut = truncate_chars(&flat, max);
    if cut.len() < flat.len() {
        format!("{cut}...")
    } else {
        flat
    }
}
