/// Normalize a raw SSO identity token into a directory lookup key.
///
/// Dots and hyphens are stripped and surrounding whitespace trimmed, so
/// `"19.224.666-K"` and `"19-224-666-K"` both become `"19224666K"`.
/// Returns `None` when nothing usable remains.
pub fn normalize_identity_token(raw: &str) -> Option<String> {
    let stripped: String = raw.chars().filter(|c| *c != '.' && *c != '-').collect();
    let key = stripped.trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}
