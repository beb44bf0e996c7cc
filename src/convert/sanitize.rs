/// Prepended when a name would otherwise not start with a letter.
pub const NAME_PREFIX: &str = "c_";

/// Map a free-text column label to `[A-Za-z][A-Za-z0-9_]*`.
///
/// Every character outside `[A-Za-z0-9_]` becomes a single `_`. If the result
/// does not start with an ASCII letter (including the empty string) it gets
/// [`NAME_PREFIX`] in front, so `""` maps to `"c_"`.
pub fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    match cleaned.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => cleaned,
        _ => format!("{}{}", NAME_PREFIX, cleaned),
    }
}
