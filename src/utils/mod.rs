/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Name an uploaded file is stored under, or `None` if nothing usable is left.
///
/// Browsers may send a full client-side path; only the last component is kept.
pub fn upload_filename(original: &str) -> Option<String> {
    let base = original.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(original);
    let name = sanitize_filename(base);
    match name.trim_matches('.') {
        "" => None,
        _ => Some(name),
    }
}
