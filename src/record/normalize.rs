//! Text normalization for extracted fields
//!
//! Listing markup is full of layout whitespace, and the site renders mixed
//! Chinese/Latin strings without spacing. Normalizing strips newlines and
//! ASCII spaces, then inserts a single space at every CJK/Latin boundary.

/// Strips newlines and spaces, then applies CJK/Latin spacing
///
/// # Example
///
/// ```
/// use rent_scout::record::normalize_text;
///
/// assert_eq!(normalize_text("  近捷運\n  2房 陽台 "), "近捷運 2 房陽台");
/// ```
pub fn normalize_text(text: &str) -> String {
    let collapsed: String = text
        .chars()
        .filter(|c| !matches!(c, '\n' | ' '))
        .collect();

    spacing_text(&collapsed)
}

/// Inserts a space wherever a CJK character touches an ASCII letter or digit
pub fn spacing_text(text: &str) -> String {
    let mut spaced = String::with_capacity(text.len() + 8);
    let mut prev: Option<char> = None;

    for c in text.chars() {
        if let Some(p) = prev {
            if (is_cjk(p) && is_latin(c)) || (is_latin(p) && is_cjk(c)) {
                spaced.push(' ');
            }
        }
        spaced.push(c);
        prev = Some(c);
    }

    spaced
}

/// Returns the first whitespace-delimited word, or an empty string
pub fn first_word(text: &str) -> String {
    text.split_whitespace().next().unwrap_or_default().to_string()
}

fn is_latin(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

// CJK radicals, kana, bopomofo, enclosed CJK, unified ideographs (+ ext. A)
// and compatibility ideographs
fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{2e80}'..='\u{2eff}'
        | '\u{2f00}'..='\u{2fdf}'
        | '\u{3040}'..='\u{309f}'
        | '\u{30a0}'..='\u{30fa}'
        | '\u{30fc}'..='\u{30ff}'
        | '\u{3100}'..='\u{312f}'
        | '\u{3200}'..='\u{32ff}'
        | '\u{3400}'..='\u{4dbf}'
        | '\u{4e00}'..='\u{9fff}'
        | '\u{f900}'..='\u{faff}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_between_cjk_and_digits() {
        assert_eq!(spacing_text("28坪"), "28 坪");
        assert_eq!(spacing_text("2房1廳"), "2 房 1 廳");
    }

    #[test]
    fn test_spacing_between_cjk_and_letters() {
        assert_eq!(spacing_text("近MRT站"), "近 MRT 站");
    }

    #[test]
    fn test_no_spacing_for_fullwidth_punctuation() {
        assert_eq!(spacing_text("樓層：5/7"), "樓層：5/7");
    }

    #[test]
    fn test_spacing_is_idempotent() {
        let once = spacing_text("台中市西區3樓");
        assert_eq!(spacing_text(&once), once);
    }

    #[test]
    fn test_normalize_strips_layout_whitespace() {
        assert_eq!(normalize_text("\n   整層住家 \n"), "整層住家");
        assert_eq!(normalize_text("12,000 元/月"), "12,000 元/月");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n "), "");
    }

    #[test]
    fn test_normalize_keeps_other_whitespace() {
        // Only newlines and ASCII spaces are layout whitespace
        assert_eq!(normalize_text("整層\t住家"), "整層\t住家");
        assert_eq!(normalize_text("a b\r\n"), "ab\r");
    }

    #[test]
    fn test_first_word() {
        assert_eq!(first_word(" 28 坪"), "28");
        assert_eq!(first_word("整層住家"), "整層住家");
        assert_eq!(first_word("   "), "");
    }
}
