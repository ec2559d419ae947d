use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("valid filename regex"));

/// Reduces an uploaded filename to `[A-Za-z0-9_.-]` with no path components.
///
/// Accented letters are decomposed (NFKD) and keep their base letter. Separators and whitespace
/// become `_`, everything else outside the safe set is dropped and leading/trailing dots or
/// underscores are trimmed. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename.nfkd().filter(char::is_ascii).collect();
    let flattened = ascii.replace(['/', '\\'], " ");
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_CHARS.replace_all(&joined, "");
    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Lowercased text after the last `.`, if any.
pub fn file_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
