use indexmap::IndexMap;

use super::lexer::{Lexer, Spanned, Token};
use crate::types::PbxValue;

/// Recursive descent parser for .pbxproj (Old-Style Plist) files.
///
/// Grammar:
/// ```text
/// head       = object | array
/// object     = '{' objectItem* '}'
/// array      = '(' (value ','?)* ')'
/// objectItem = scalar '=' value ';'
/// value      = object | array | data | scalar
/// ```
///
/// Scalars are stored as raw tokens; no type inference happens here.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Spanned<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(text),
            peeked: None,
        }
    }

    fn peek(&mut self) -> Result<Option<&Token<'a>>, String> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref().map(|s| &s.token))
    }

    fn bump(&mut self) -> Result<Option<Spanned<'a>>, String> {
        match self.peeked.take() {
            Some(spanned) => Ok(Some(spanned)),
            None => self.lexer.next_token(),
        }
    }

    fn expect(&mut self, expected: Token<'a>, context: &str) -> Result<(), String> {
        match self.bump()? {
            Some(spanned) if spanned.token == expected => Ok(()),
            Some(spanned) => Err(format!(
                "Expected {:?} {}, got {:?} at offset {}",
                expected, context, spanned.token, spanned.offset
            )),
            None => Err(format!("Expected {:?} {}, got end of input", expected, context)),
        }
    }

    /// Parse the whole document and reject trailing tokens.
    pub fn parse_document(&mut self) -> Result<PbxValue, String> {
        let head = match self.peek()? {
            Some(Token::OpenBrace) => self.parse_object()?,
            Some(Token::OpenParen) => self.parse_array()?,
            Some(tok) => return Err(format!("Expected '{{' or '(' at start, got {:?}", tok)),
            None => return Err("Empty input".to_string()),
        };
        if let Some(extra) = self.bump()? {
            return Err(format!("Unexpected {:?} after document at offset {}", extra.token, extra.offset));
        }
        Ok(head)
    }

    fn parse_object(&mut self) -> Result<PbxValue, String> {
        self.expect(Token::OpenBrace, "to open object")?;
        let mut map = IndexMap::new();

        loop {
            match self.peek()? {
                Some(Token::CloseBrace) => {
                    self.bump()?;
                    return Ok(PbxValue::Object(map));
                }
                None => return Err("Unterminated object".to_string()),
                _ => {
                    let key = self.parse_key()?;
                    self.expect(Token::Equals, "after key")?;
                    let value = self.parse_value()?;
                    self.expect(Token::Semicolon, "after value")?;
                    map.insert(key, value);
                }
            }
        }
    }

    fn parse_array(&mut self) -> Result<PbxValue, String> {
        self.expect(Token::OpenParen, "to open array")?;
        let mut items = Vec::new();

        loop {
            match self.peek()? {
                Some(Token::CloseParen) => {
                    self.bump()?;
                    return Ok(PbxValue::Array(items));
                }
                None => return Err("Unterminated array".to_string()),
                _ => {
                    items.push(self.parse_value()?);
                    if let Some(Token::Comma) = self.peek()? {
                        self.bump()?;
                    }
                }
            }
        }
    }

    fn parse_value(&mut self) -> Result<PbxValue, String> {
        match self.peek()? {
            Some(Token::OpenBrace) => self.parse_object(),
            Some(Token::OpenParen) => self.parse_array(),
            _ => match self.bump()? {
                Some(Spanned { token: Token::Bare(s) | Token::Quoted(s), .. }) => Ok(PbxValue::String(s.to_string())),
                Some(Spanned { token: Token::Data(bytes), .. }) => Ok(PbxValue::Data(bytes)),
                Some(spanned) => Err(format!(
                    "Unexpected {:?} in value at offset {}",
                    spanned.token, spanned.offset
                )),
                None => Err("Unexpected end of input in value".to_string()),
            },
        }
    }

    fn parse_key(&mut self) -> Result<String, String> {
        match self.bump()? {
            Some(Spanned { token: Token::Bare(s) | Token::Quoted(s), .. }) => Ok(s.to_string()),
            Some(spanned) => Err(format!(
                "Expected key, got {:?} at offset {}",
                spanned.token, spanned.offset
            )),
            None => Err("Expected key, got end of input".to_string()),
        }
    }
}

/// Parse a .pbxproj string into a PbxValue.
pub fn parse(text: &str) -> Result<PbxValue, String> {
    Parser::new(text).parse_document()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_object() {
        let result = parse("{ key = value; }").unwrap();
        assert_eq!(result.get("key").and_then(|v| v.as_str()), Some("value"));
    }

    #[test]
    fn test_parse_nested_object() {
        let result = parse("{ outer = { inner = 42; }; }").unwrap();
        let inner = result.get("outer").and_then(|v| v.get("inner"));
        assert_eq!(inner.and_then(|v| v.as_str()), Some("42"));
    }

    #[test]
    fn test_parse_array_with_trailing_comma() {
        let result = parse(r#"{ flags = ("$(inherited)", "-lc++", ); }"#).unwrap();
        let flags = result.get("flags").and_then(|v| v.as_array()).unwrap();
        assert_eq!(flags.len(), 2);
        assert_eq!(flags[0].as_str(), Some("\"$(inherited)\""));
        assert_eq!(flags[1].as_str(), Some("\"-lc++\""));
    }

    #[test]
    fn test_quoted_keys_kept_raw() {
        let result = parse(r#"{ "CODE_SIGN_IDENTITY[sdk=iphoneos*]" = "iPhone Developer"; }"#).unwrap();
        let obj = result.as_object().unwrap();
        assert_eq!(
            obj.get("\"CODE_SIGN_IDENTITY[sdk=iphoneos*]\"").and_then(|v| v.as_str()),
            Some("\"iPhone Developer\"")
        );
    }

    #[test]
    fn test_parse_data_literal() {
        let result = parse("{ data = <ABCD1234>; }").unwrap();
        assert_eq!(result.get("data"), Some(&PbxValue::Data(vec![0xAB, 0xCD, 0x12, 0x34])));
    }

    #[test]
    fn test_parse_with_comments() {
        let input = r#"// !$*UTF8*$!
{
    /* comment */ archiveVersion = 1; // line comment
    rootObject = 83CBB9F71A601CBA00E9B192 /* Project object */;
}"#;
        let result = parse(input).unwrap();
        assert_eq!(result.get("archiveVersion").and_then(|v| v.as_str()), Some("1"));
        assert_eq!(
            result.get("rootObject").and_then(|v| v.as_str()),
            Some("83CBB9F71A601CBA00E9B192")
        );
    }

    #[test]
    fn test_parse_empty_containers() {
        assert!(parse("{}").unwrap().as_object().unwrap().is_empty());
        assert!(parse("()").unwrap().as_array().unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("").is_err());
        assert!(parse("{ key = value }").is_err());
        assert!(parse("{ key = value;").is_err());
        assert!(parse("{ key value; }").is_err());
        assert!(parse("{} extra").is_err());
        assert!(parse("value").is_err());
    }
}
