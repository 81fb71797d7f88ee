//! Property key derivation for view members
//!
//! Member names can't contain `.`, so the configuration key a member reads
//! is derived from its name by an escaping convention, scanned left to
//! right:
//!
//! | In member name | In property key |
//! |----------------|-----------------|
//! | `$$`           | `$`             |
//! | `$`            | (removed)       |
//! | `__`           | `_`             |
//! | `_`            | `.`             |
//!
//! A run of N equal characters therefore collapses pairwise to N/2 copies,
//! and an odd trailing one takes the single-character mapping
//! (`foo___` → `foo_.`).

/// Derive the property key for a declared member name
pub fn fixup(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => {
                if chars.peek() == Some(&'$') {
                    chars.next();
                    key.push('$');
                }
            }
            '_' => {
                if chars.peek() == Some(&'_') {
                    chars.next();
                    key.push('_');
                } else {
                    key.push('.');
                }
            }
            other => key.push(other),
        }
    }

    key
}
