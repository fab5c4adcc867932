/// Byte classes allowed in an unquoted scalar: `[A-Za-z0-9_$/:.-]`.
static IS_BARE_CHAR: [bool; 256] = {
    let mut t = [false; 256];
    let mut i: u8 = b'a';
    while i <= b'z' {
        t[i as usize] = true;
        i += 1;
    }
    i = b'A';
    while i <= b'Z' {
        t[i as usize] = true;
        i += 1;
    }
    i = b'0';
    while i <= b'9' {
        t[i as usize] = true;
        i += 1;
    }
    t[b'_' as usize] = true;
    t[b'$' as usize] = true;
    t[b'/' as usize] = true;
    t[b':' as usize] = true;
    t[b'.' as usize] = true;
    t[b'-' as usize] = true;
    t
};

/// Tokens produced by the lexer. Scalars borrow the source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    Equals,
    Semicolon,
    Comma,
    /// An unquoted scalar.
    Bare(&'a str),
    /// A quoted scalar, delimiters and escapes included.
    Quoted(&'a str),
    Data(Vec<u8>),
}

/// A token together with the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub offset: usize,
}

/// On-demand tokenizer for .pbxproj text.
///
/// Comments and whitespace are dropped. Quoted strings are returned
/// verbatim so the model can keep the exact source token.
pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Lexer { text, pos: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    fn skip_trivia(&mut self) {
        let bytes = self.bytes();
        let len = bytes.len();

        while self.pos < len {
            match bytes[self.pos] {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b'/' if bytes.get(self.pos + 1) == Some(&b'/') => {
                    self.pos += 2;
                    while self.pos < len && bytes[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                b'/' if bytes.get(self.pos + 1) == Some(&b'*') => {
                    self.pos += 2;
                    while self.pos < len && !bytes[self.pos..].starts_with(b"*/") {
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(len);
                }
                _ => return,
            }
        }
    }

    fn read_quoted(&mut self) -> Result<Token<'a>, String> {
        let bytes = self.bytes();
        let start = self.pos;
        let quote = bytes[start];
        let mut end = start + 1;

        while end < bytes.len() && bytes[end] != quote {
            end += if bytes[end] == b'\\' { 2 } else { 1 };
        }
        if end >= bytes.len() {
            return Err(format!("Unterminated string at offset {}", start));
        }

        self.pos = end + 1;
        Ok(Token::Quoted(&self.text[start..self.pos]))
    }

    fn read_data(&mut self) -> Result<Token<'a>, String> {
        let start = self.pos;
        let close = self.text[start..]
            .find('>')
            .map(|i| start + i)
            .ok_or_else(|| format!("Unterminated data literal at offset {}", start))?;

        let mut digits = Vec::with_capacity(close - start);
        for &b in &self.bytes()[start + 1..close] {
            if b.is_ascii_hexdigit() {
                digits.push(b);
            } else if !b.is_ascii_whitespace() {
                return Err(format!("Invalid character '{}' in data literal at offset {}", b as char, start));
            }
        }
        self.pos = close + 1;

        let data = digits
            .chunks(2)
            .map(|pair| {
                let hex = std::str::from_utf8(pair).map_err(|e| e.to_string())?;
                u8::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex in data literal: {}", e))
            })
            .collect::<Result<Vec<u8>, String>>()?;
        Ok(Token::Data(data))
    }

    fn read_bare(&mut self) -> Token<'a> {
        let start = self.pos;
        let bytes = self.bytes();
        while self.pos < bytes.len() && IS_BARE_CHAR[bytes[self.pos] as usize] {
            self.pos += 1;
        }
        Token::Bare(&self.text[start..self.pos])
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Spanned<'a>>, String> {
        self.skip_trivia();
        let offset = self.pos;
        let Some(&b) = self.bytes().get(offset) else {
            return Ok(None);
        };

        let punct = match b {
            b'{' => Some(Token::OpenBrace),
            b'}' => Some(Token::CloseBrace),
            b'(' => Some(Token::OpenParen),
            b')' => Some(Token::CloseParen),
            b'=' => Some(Token::Equals),
            b';' => Some(Token::Semicolon),
            b',' => Some(Token::Comma),
            _ => None,
        };

        let token = if let Some(token) = punct {
            self.pos += 1;
            token
        } else {
            match b {
                b'"' | b'\'' => self.read_quoted()?,
                b'<' => self.read_data()?,
                _ if IS_BARE_CHAR[b as usize] => self.read_bare(),
                _ => {
                    let ch = self.text[offset..].chars().next().unwrap_or('?');
                    return Err(format!("Unexpected character '{}' at offset {}", ch, offset));
                }
            }
        };

        Ok(Some(Spanned { token, offset }))
    }
}
