//! Word boundary splitting for field names.

/// Splits an identifier into words at case boundaries.
///
/// A boundary falls before an uppercase letter that follows a lowercase
/// letter, and before an uppercase letter that follows another uppercase
/// letter when the character after it is lowercase. That keeps acronyms
/// together: `HTTPServer` becomes `HTTP`, `Server` and `UserID` becomes
/// `User`, `ID`. The last character never starts a word of its own.
///
/// The returned slices borrow from `s` and concatenate back to it exactly.
///
/// ```
/// use qcl::split_words;
///
/// assert_eq!(split_words("MaxIdleConns"), ["Max", "Idle", "Conns"]);
/// assert_eq!(split_words("HTTPServer"), ["HTTP", "Server"]);
/// assert!(split_words("").is_empty());
/// ```
pub fn split_words(s: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut words = Vec::new();
    let mut start = 0;

    for i in 1..chars.len().saturating_sub(1) {
        let (offset, c) = chars[i];
        if !c.is_uppercase() {
            continue;
        }
        let prev = chars[i - 1].1;
        let next = chars[i + 1].1;
        if prev.is_lowercase() || (prev.is_uppercase() && next.is_lowercase()) {
            words.push(&s[start..offset]);
            start = offset;
        }
    }

    if !s.is_empty() {
        words.push(&s[start..]);
    }
    words
}

/// Splits a Rust field identifier into words.
///
/// Snake case pieces are split on `_` first, then each piece goes through
/// [`split_words`]. A raw identifier prefix is ignored.
pub(crate) fn identifier_words(ident: &str) -> Vec<&str> {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    ident
        .split('_')
        .filter(|piece| !piece.is_empty())
        .flat_map(split_words)
        .collect()
}
