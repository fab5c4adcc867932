/// Escape special characters for a quoted .pbxproj string.
///
/// - Standard escapes: \a \b \f \r \t \v \n \" \\
/// - Other control chars → \Uxxxx
pub fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\x07' => result.push_str("\\a"),
            '\x08' => result.push_str("\\b"),
            '\x0C' => result.push_str("\\f"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\x0B' => result.push_str("\\v"),
            '\n' => result.push_str("\\n"),
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            c if (c as u32) < 0x20 => {
                result.push_str(&format!("\\U{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result
}

/// True if the token already carries its own delimiters.
pub fn is_quoted(token: &str) -> bool {
    token.len() >= 2
        && ((token.starts_with('"') && token.ends_with('"')) || (token.starts_with('\'') && token.ends_with('\'')))
}

/// True if the token can be written without quotes.
/// Hyphen is left out even though the lexer accepts it bare; Xcode quotes it.
pub fn is_safe_unquoted(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'$' | b'/' | b':' | b'.'))
}

/// Render a scalar for output.
///
/// Tokens read from a file are already in source form and pass through
/// untouched. Values created in code (`$(inherited)`, `-ObjC`) get quoted.
pub fn format_scalar(token: &str) -> String {
    if is_quoted(token) || is_safe_unquoted(token) {
        token.to_string()
    } else {
        format!("\"{}\"", escape(token))
    }
}

/// Format binary data as a hex data literal.
pub fn format_data(data: &[u8]) -> String {
    let hex: String = data.iter().map(|b| format!("{:02X}", b)).collect();
    format!("<{}>", hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("hello"), "hello");
        assert_eq!(escape("hello\nworld"), "hello\\nworld");
        assert_eq!(escape(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape("back\\slash"), "back\\\\slash");
        assert_eq!(escape("\x01"), "\\U0001");
    }

    #[test]
    fn test_format_scalar_passes_source_tokens_through() {
        assert_eq!(format_scalar("\"-lc++\""), "\"-lc++\"");
        assert_eq!(format_scalar("'single'"), "'single'");
        assert_eq!(format_scalar("Debug"), "Debug");
        assert_eq!(format_scalar("path/to/file.swift"), "path/to/file.swift");
    }

    #[test]
    fn test_format_scalar_quotes_new_values() {
        assert_eq!(format_scalar("$(inherited)"), "\"$(inherited)\"");
        assert_eq!(format_scalar("-ObjC"), "\"-ObjC\"");
        assert_eq!(format_scalar(""), "\"\"");
        assert_eq!(format_scalar("\""), "\"\\\"\"");
    }

    #[test]
    fn test_format_data() {
        assert_eq!(format_data(&[0xAB, 0xCD, 0x12, 0x34]), "<ABCD1234>");
        assert_eq!(format_data(&[]), "<>");
    }
}
