use std::collections::BTreeSet;

use crate::error::CoreError;

/// 10 chiffres — charset par défaut du shell.
pub const CHARSET_DIGITS: &str = "0123456789";

/// 10 caractères — compact, bon contraste.
pub const CHARSET_COMPACT: &str = " .:-=+*#%@";

/// Paul Bourke extended, bon équilibre.
pub const CHARSET_STANDARD: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// First printable ASCII character accepted by charset editing.
pub const MIN_PRINTABLE: char = ' ';

/// Last printable ASCII character accepted by charset editing.
pub const MAX_PRINTABLE: char = '~';

const ALL_KEYWORD: &str = "all";
const SPACE_KEYWORD: &str = "space";
const RANGE_SEPARATOR: char = '-';

/// Preset lookup by name: `digits`, `compact` or `standard`.
///
/// # Example
/// ```
/// use texel_core::charset::{charset_preset, CHARSET_COMPACT};
/// assert_eq!(charset_preset("compact"), Some(CHARSET_COMPACT));
/// assert_eq!(charset_preset("dense"), None);
/// ```
#[must_use]
pub fn charset_preset(name: &str) -> Option<&'static str> {
    match name {
        "digits" => Some(CHARSET_DIGITS),
        "compact" => Some(CHARSET_COMPACT),
        "standard" => Some(CHARSET_STANDARD),
        _ => None,
    }
}

/// Dédoublonne et trie un charset.
///
/// # Example
/// ```
/// use texel_core::charset::charset_from_str;
/// let set = charset_from_str("baab");
/// assert_eq!(set.into_iter().collect::<String>(), "ab");
/// ```
#[must_use]
pub fn charset_from_str(charset: &str) -> BTreeSet<char> {
    charset.chars().collect()
}

#[inline]
fn is_printable(ch: char) -> bool {
    (MIN_PRINTABLE..=MAX_PRINTABLE).contains(&ch)
}

/// Parse l'argument d'une commande `add` / `remove`.
///
/// Accepts `all` (every printable ASCII char), `space`, a single printable
/// char, or an inclusive range `x-y` in either direction.
///
/// # Errors
/// Returns [`CoreError::InvalidCharSpec`] for any other shape or for
/// characters outside `' '..='~'`.
///
/// # Example
/// ```
/// use texel_core::charset::parse_char_spec;
/// assert_eq!(parse_char_spec("c-a").unwrap(), vec!['a', 'b', 'c']);
/// assert_eq!(parse_char_spec("space").unwrap(), vec![' ']);
/// assert!(parse_char_spec("ab").is_err());
/// ```
pub fn parse_char_spec(spec: &str) -> Result<Vec<char>, CoreError> {
    match spec {
        ALL_KEYWORD => return Ok((MIN_PRINTABLE..=MAX_PRINTABLE).collect()),
        SPACE_KEYWORD => return Ok(vec![' ']),
        _ => {}
    }

    let chars: Vec<char> = spec.chars().collect();
    match chars.as_slice() {
        [c] if is_printable(*c) => Ok(vec![*c]),
        [start, RANGE_SEPARATOR, end] if is_printable(*start) && is_printable(*end) => {
            let (lo, hi) = if start <= end {
                (*start, *end)
            } else {
                (*end, *start)
            };
            Ok((lo..=hi).collect())
        }
        _ => Err(CoreError::InvalidCharSpec(spec.to_string())),
    }
}
