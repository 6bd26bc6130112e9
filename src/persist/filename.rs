use url::Url;

/// Maximum combined length of the prefix, separator and sanitized URL in a
/// derived filename, excluding the extension. Existing mirrors were written
/// with this constant, so changing it breaks filename interoperability.
pub const MAX_FILE_NAME_LENGTH: usize = 126;

/// Derives the on-disk filename for a saved page.
///
/// The stem is `prefix + "_"` followed by the sanitized source URL: host
/// with `.` replaced by `_`, then the path with its trailing slash stripped
/// and inner slashes replaced by `__`. When the sanitized part would push
/// the stem past the length cap it is cut from its left, keeping the most
/// specific path segments; the prefix and separator are never truncated.
pub fn file_name(url: &Url, content_type: &str, prefix: &str) -> String {
    let host = url.host_str().unwrap_or_default().replace('.', "_");
    let path = url.path().trim_end_matches('/').replace('/', "__");
    let sanitized = format!("{host}{path}");

    let keep = MAX_FILE_NAME_LENGTH.saturating_sub(prefix.chars().count());
    let chars: Vec<char> = sanitized.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(keep)..].iter().collect();

    let name = format!("{prefix}_{tail}");
    let stem = strip_dot_suffix(&name);
    format!("{stem}.{ext}", ext = extension(content_type))
}

/// Drops an existing dot-suffix from the derived name, so the mapped
/// extension replaces it instead of stacking on top. URL paths keep their
/// dots through sanitization (`/paper.pdf` becomes `__paper.pdf`), and
/// existing mirrors were written with the suffix replaced.
///
/// A dot only counts as a suffix separator when it is neither the first nor
/// the last character of the name.
fn strip_dot_suffix(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i > 0 && i < name.len() - 1 => &name[..i],
        _ => name,
    }
}

/// Maps a Content-Type value to a filename extension, dropping any
/// parameters after `;`. Types missing from the MIME table fall back to
/// `bin`.
fn extension(content_type: &str) -> &'static str {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    mime2ext::mime2ext(essence).unwrap_or("bin")
}
