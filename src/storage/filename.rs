//! Filesystem-safe file names derived from recipe names.

/// Keeps ASCII letters, digits, `-`, `_`, `(`, `)` and spaces, then turns
/// spaces into underscores.
pub fn format_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '(' | ')' | ' '))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}
